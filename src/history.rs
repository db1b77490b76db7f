use std::io::Write;
use serde::{Deserialize, Serialize};
use crate::action::ActionKind;
use crate::card::{Card, Character};
use crate::error::{CoupError, ExportError};
use crate::player::PlayerId;
use crate::provider::PublicPlayer;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeOutcome {
    // claimant showed the card
    Upheld,
    // claimant could not or would not show it
    Refuted,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    pub challenger: PlayerId,
    pub claimant: PlayerId,
    pub claim: Character,
    pub outcome: ChallengeOutcome,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub blocker: PlayerId,
    pub claim: Character,
    pub challenge: Option<ChallengeRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionResult {
    Performed,
    Blocked,
    ChallengeLost,
    // the target was knocked out before the effect could land
    TargetEliminated,
    // the last opponent fell mid-protocol
    GameEnded,
    Failed(CoupError),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEvent {
    pub player: PlayerId,
    pub card: Card,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub round: u32,
    pub actor: PlayerId,
    pub action: ActionKind,
    pub target: Option<PlayerId>,
    pub challenge: Option<ChallengeRecord>,
    pub block: Option<BlockRecord>,
    pub result: ActionResult,
    pub revealed: Vec<CardEvent>,
    pub lost: Vec<CardEvent>,
    pub eliminated: Vec<PlayerId>,
    // public table state once the turn settled
    pub snapshot: Vec<PublicPlayer>,
}

impl TurnRecord {
    pub(crate) fn new(turn: u32, round: u32, actor: PlayerId, action: ActionKind, target: Option<PlayerId>) -> Self {
        Self {
            turn,
            round,
            actor,
            action,
            target,
            challenge: None,
            block: None,
            result: ActionResult::Performed,
            revealed: Vec::new(),
            lost: Vec::new(),
            eliminated: Vec::new(),
            snapshot: Vec::new(),
        }
    }

    pub fn lost_by(&self, player: PlayerId) -> impl Iterator<Item=Card> + '_ {
        self.lost.iter().filter(move |e| e.player == player).map(|e| e.card)
    }
}

// flat rendering of a record for csv
#[derive(Serialize)]
struct CsvRow {
    turn: u32,
    round: u32,
    actor: usize,
    action: ActionKind,
    target: Option<usize>,
    challenger: Option<usize>,
    challenge_outcome: Option<ChallengeOutcome>,
    blocker: Option<usize>,
    block_claim: Option<Character>,
    block_challenge_outcome: Option<ChallengeOutcome>,
    result: String,
    revealed: String,
    lost: String,
    eliminated: String,
}

fn join_events(events: &[CardEvent]) -> String {
    events.iter()
        .map(|e| format!("{}:{}", e.player.0, e.card))
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<&TurnRecord> for CsvRow {
    fn from(record: &TurnRecord) -> Self {
        let result = match &record.result {
            ActionResult::Failed(err) => format!("failed: {err}"),
            other => format!("{:?}", other),
        };

        Self {
            turn: record.turn,
            round: record.round,
            actor: record.actor.0,
            action: record.action,
            target: record.target.map(|t| t.0),
            challenger: record.challenge.as_ref().map(|c| c.challenger.0),
            challenge_outcome: record.challenge.as_ref().map(|c| c.outcome),
            blocker: record.block.as_ref().map(|b| b.blocker.0),
            block_claim: record.block.as_ref().map(|b| b.claim),
            block_challenge_outcome: record.block.as_ref().and_then(|b| b.challenge.as_ref()).map(|c| c.outcome),
            result,
            revealed: join_events(&record.revealed),
            lost: join_events(&record.lost),
            eliminated: record.eliminated.iter().map(|p| p.0.to_string()).collect::<Vec<_>>().join(" "),
        }
    }
}

/// Append-only history of every completed turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLog {
    entries: Vec<TurnRecord>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn log(&mut self, entry: TurnRecord) {
        self.entries.push(entry);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[TurnRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TurnRecord> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item=&TurnRecord> {
        self.entries.iter()
    }

    pub fn by_actor(&self, actor: PlayerId) -> impl Iterator<Item=&TurnRecord> {
        self.entries.iter().filter(move |e| e.actor == actor)
    }

    /// Every character `player` has claimed so far, through actions or blocks.
    pub fn claims_by(&self, player: PlayerId) -> Vec<Character> {
        self.entries.iter()
            .filter_map(|e| {
                if e.actor == player {
                    e.action.meta().ok().and_then(|meta| meta.claim)
                } else {
                    e.block.as_ref().filter(|b| b.blocker == player).map(|b| b.claim)
                }
            })
            .collect()
    }

    /// One JSON object per line.
    pub fn write_json_lines<W: Write>(&self, mut writer: W) -> Result<(), ExportError> {
        for entry in &self.entries {
            serde_json::to_writer(&mut writer, entry)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        let mut wtr = csv::Writer::from_writer(writer);
        for entry in &self.entries {
            wtr.serialize(CsvRow::from(entry))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::action::ActionKind;
    use crate::card::Card;
    use crate::card::Character::{Captain, Contessa, Duke};
    use crate::player::PlayerId;
    use super::*;

    fn sample() -> ActionLog {
        let mut log = ActionLog::new();

        let mut tax = TurnRecord::new(0, 1, PlayerId(0), ActionKind::Tax, None);
        tax.challenge = Some(ChallengeRecord {
            challenger: PlayerId(1),
            claimant: PlayerId(0),
            claim: Duke,
            outcome: ChallengeOutcome::Refuted,
        });
        tax.result = ActionResult::ChallengeLost;
        tax.lost.push(CardEvent { player: PlayerId(0), card: Card::new(Contessa) });
        log.log(tax);

        let mut steal = TurnRecord::new(1, 1, PlayerId(1), ActionKind::Steal, Some(PlayerId(0)));
        steal.block = Some(BlockRecord { blocker: PlayerId(0), claim: Captain, challenge: None });
        steal.result = ActionResult::Blocked;
        log.log(steal);

        log
    }

    #[test]
    fn queries() {
        let log = sample();
        assert_eq!(log.len(), 2);
        assert_eq!(log.by_actor(PlayerId(1)).count(), 1);
        assert_eq!(log.last().unwrap().result, ActionResult::Blocked);
        assert_eq!(log.claims_by(PlayerId(0)), vec![Duke, Captain]);
        assert_eq!(log.entries()[0].lost_by(PlayerId(0)).collect::<Vec<_>>(), vec![Card::new(Contessa)]);
    }

    #[test]
    fn json_lines_export() {
        let mut out = Vec::new();
        sample().write_json_lines(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: TurnRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.action, ActionKind::Tax);
        assert_eq!(first.result, ActionResult::ChallengeLost);
    }

    #[test]
    fn csv_export() {
        let mut out = Vec::new();
        sample().write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("turn,round,actor,action,target,challenger"));
        assert!(lines.next().unwrap().contains("ChallengeLost"));
        assert!(lines.next().unwrap().contains("Blocked"));
        assert!(lines.next().is_none());
    }
}
