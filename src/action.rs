use std::fmt::{Debug, Display, Formatter};
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::card::{Card, Character};
use crate::card::Character::{Ambassador, Assassin, Captain, Contessa, Duke};
use crate::deck::Deck;
use crate::error::CoupError;
use crate::player::{Player, PlayerId};
use crate::provider::DecisionProvider;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Income,
    ForeignAid,
    Coup,
    Tax,
    Assassinate,
    Steal,
    Exchange,
}

impl ActionKind {
    pub const ALL: [ActionKind; 7] = [
        ActionKind::Income,
        ActionKind::ForeignAid,
        ActionKind::Coup,
        ActionKind::Tax,
        ActionKind::Assassinate,
        ActionKind::Steal,
        ActionKind::Exchange,
    ];

    pub fn meta(self) -> Result<&'static ActionMeta, CoupError> {
        CATALOG
            .iter()
            .find(|meta| meta.kind == self)
            .ok_or(CoupError::NotImplementedEffect(self))
    }
}

/// Static rules for one kind of action.
#[derive(Debug, PartialEq, Eq)]
pub struct ActionMeta {
    pub kind: ActionKind,
    pub cost: u32,
    pub claim: Option<Character>,
    pub blocked_by: &'static [Character],
    pub targeted: bool,
}

pub static CATALOG: [ActionMeta; 7] = [
    ActionMeta { kind: ActionKind::Income, cost: 0, claim: None, blocked_by: &[], targeted: false },
    ActionMeta { kind: ActionKind::ForeignAid, cost: 0, claim: None, blocked_by: &[Duke], targeted: false },
    ActionMeta { kind: ActionKind::Coup, cost: 7, claim: None, blocked_by: &[], targeted: true },
    ActionMeta { kind: ActionKind::Tax, cost: 0, claim: Some(Duke), blocked_by: &[], targeted: false },
    ActionMeta { kind: ActionKind::Assassinate, cost: 3, claim: Some(Assassin), blocked_by: &[Contessa], targeted: true },
    ActionMeta { kind: ActionKind::Steal, cost: 0, claim: Some(Captain), blocked_by: &[Captain, Ambassador], targeted: true },
    ActionMeta { kind: ActionKind::Exchange, cost: 0, claim: Some(Ambassador), blocked_by: &[], targeted: false },
];

// most coins a single steal can take
const STEAL_LIMIT: u32 = 2;

/// A declared action. Only shape is checked here (target present exactly when
/// the kind needs one); affordability and target eligibility are the engine's
/// job.
#[derive(Clone, PartialEq, Eq)]
pub struct Action {
    kind: ActionKind,
    actor: PlayerId,
    target: Option<PlayerId>,
    meta: &'static ActionMeta,
}

/// What applying an action did. Influence losses go into the turn record,
/// the rest is only logged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Gained(u32),
    Stole(u32),
    InfluenceLost { target: PlayerId, card: Card },
    Exchanged { drawn: usize },
}

pub(crate) struct EffectContext<'a, R: Rng> {
    pub players: &'a mut [Player],
    pub providers: &'a mut [Box<dyn DecisionProvider>],
    pub deck: &'a mut Deck,
    pub rng: &'a mut R,
    pub exchange_draw: usize,
}

impl Action {
    pub fn new(kind: ActionKind, actor: PlayerId, target: Option<PlayerId>) -> Result<Self, CoupError> {
        let meta = kind.meta()?;
        if meta.targeted != target.is_some() || target == Some(actor) {
            return Err(CoupError::InvalidTarget(target));
        }

        Ok(Self { kind, actor, target, meta })
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn actor(&self) -> PlayerId {
        self.actor
    }

    pub fn target(&self) -> Option<PlayerId> {
        self.target
    }

    pub fn cost(&self) -> u32 {
        self.meta.cost
    }

    pub fn blockable(&self) -> bool {
        !self.meta.blocked_by.is_empty()
    }

    pub fn blocking_characters(&self) -> &'static [Character] {
        self.meta.blocked_by
    }

    pub fn claimed_character(&self) -> Option<Character> {
        self.meta.claim
    }

    /// Runs the effect. Costs were already paid on declaration, so this only
    /// covers what the action does once it survives challenges and blocks.
    pub(crate) fn apply<R: Rng>(&self, ctx: EffectContext<'_, R>) -> Result<Effect, CoupError> {
        let actor = self.actor.0;

        match self.kind {
            ActionKind::Income => {
                ctx.players[actor].gain_coins(1);
                Ok(Effect::Gained(1))
            }
            ActionKind::ForeignAid => {
                ctx.players[actor].gain_coins(2);
                Ok(Effect::Gained(2))
            }
            ActionKind::Tax => {
                ctx.players[actor].gain_coins(3);
                Ok(Effect::Gained(3))
            }
            ActionKind::Coup | ActionKind::Assassinate => {
                let target = self.target.ok_or(CoupError::InvalidTarget(None))?;
                let card = ctx.players[target.0].lose_influence(ctx.providers[target.0].as_mut())?;
                Ok(Effect::InfluenceLost { target, card })
            }
            ActionKind::Steal => {
                let target = self.target.ok_or(CoupError::InvalidTarget(None))?;
                let amount = ctx.players[target.0].coins().min(STEAL_LIMIT);
                ctx.players[target.0].lose_coins(amount)?;
                ctx.players[actor].gain_coins(amount);
                Ok(Effect::Stole(amount))
            }
            ActionKind::Exchange => {
                if ctx.deck.is_empty() {
                    return Err(CoupError::EmptyDeck);
                }
                let drawn = ctx.deck.draw_up_to(ctx.exchange_draw);

                match ctx.players[actor].exchange(&drawn, ctx.providers[actor].as_mut()) {
                    Ok(returned) => {
                        for card in returned {
                            ctx.deck.return_card(card, &mut *ctx.rng);
                        }
                        Ok(Effect::Exchanged { drawn: drawn.len() })
                    }
                    Err(err) => {
                        // the hand was left untouched, put the drawn cards back
                        for card in drawn {
                            ctx.deck.return_card(card, &mut *ctx.rng);
                        }
                        Err(err)
                    }
                }
            }
        }
    }
}

impl Debug for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let player_idx = self.actor.0;
        let target_player_idx = self.target.map(|t| t.0).unwrap_or_default();

        match self.kind {
            ActionKind::Income => {
                f.write_fmt(format_args!("Player {player_idx} takes Income"))
            }
            ActionKind::ForeignAid => {
                f.write_fmt(format_args!("Player {player_idx} gets foreign aid"))
            }
            ActionKind::Coup => {
                f.write_fmt(format_args!("Player {player_idx} coups {target_player_idx}"))
            }
            ActionKind::Tax => {
                f.write_fmt(format_args!("Player {player_idx} gets Taxes"))
            }
            ActionKind::Assassinate => {
                f.write_fmt(format_args!("Player {player_idx} assassinates {target_player_idx}"))
            }
            ActionKind::Steal => {
                f.write_fmt(format_args!("Player {player_idx} steals from {target_player_idx}"))
            }
            ActionKind::Exchange => {
                f.write_fmt(format_args!("Player {player_idx} exchanges with the deck"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::card::Character::{Ambassador, Assassin, Captain, Contessa, Duke};
    use crate::error::CoupError;
    use crate::player::PlayerId;
    use super::{Action, ActionKind, CATALOG};

    #[test]
    fn every_kind_has_a_catalog_entry() {
        for kind in ActionKind::ALL {
            assert_eq!(kind.meta().unwrap().kind, kind);
        }
        assert_eq!(CATALOG.len(), ActionKind::ALL.len());
    }

    #[test]
    fn catalog_rows() {
        let steal = Action::new(ActionKind::Steal, PlayerId(0), Some(PlayerId(1))).unwrap();
        assert_eq!(steal.cost(), 0);
        assert!(steal.blockable());
        assert_eq!(steal.blocking_characters(), &[Captain, Ambassador]);
        assert_eq!(steal.claimed_character(), Some(Captain));

        let assassinate = Action::new(ActionKind::Assassinate, PlayerId(0), Some(PlayerId(1))).unwrap();
        assert_eq!(assassinate.cost(), 3);
        assert_eq!(assassinate.blocking_characters(), &[Contessa]);
        assert_eq!(assassinate.claimed_character(), Some(Assassin));

        let coup = Action::new(ActionKind::Coup, PlayerId(0), Some(PlayerId(1))).unwrap();
        assert_eq!(coup.cost(), 7);
        assert!(!coup.blockable());
        assert_eq!(coup.claimed_character(), None);

        let aid = Action::new(ActionKind::ForeignAid, PlayerId(0), None).unwrap();
        assert_eq!(aid.blocking_characters(), &[Duke]);
        assert_eq!(aid.claimed_character(), None);

        let exchange = Action::new(ActionKind::Exchange, PlayerId(0), None).unwrap();
        assert!(!exchange.blockable());
        assert_eq!(exchange.claimed_character(), Some(Ambassador));
    }

    #[test]
    fn target_shape() {
        assert_eq!(
            Action::new(ActionKind::Coup, PlayerId(0), None),
            Err(CoupError::InvalidTarget(None))
        );
        assert_eq!(
            Action::new(ActionKind::Income, PlayerId(0), Some(PlayerId(1))),
            Err(CoupError::InvalidTarget(Some(PlayerId(1))))
        );
        assert_eq!(
            Action::new(ActionKind::Steal, PlayerId(2), Some(PlayerId(2))),
            Err(CoupError::InvalidTarget(Some(PlayerId(2))))
        );
    }

    #[test]
    fn display() {
        let action = Action::new(ActionKind::Steal, PlayerId(0), Some(PlayerId(2))).unwrap();
        assert_eq!(action.to_string(), "Player 0 steals from 2");
    }
}
