use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use crate::card::{Card, Character};
use crate::error::CoupError;
use crate::provider::DecisionProvider;

pub const HAND_SIZE: usize = 2;

// hand + at most two drawn cards during an exchange
pub const MAX_EXCHANGE_HAND: usize = 4;

/// Seat index. Stable for the lifetime of an engine, including across resets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub usize);

impl Display for PlayerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("Player {}", self.0))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    coins: u32,
    hand: Vec<Card>,
    eliminated: bool,
    lost_influences: Vec<Card>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            coins: 0,
            hand: Vec::with_capacity(MAX_EXCHANGE_HAND),
            eliminated: false,
            lost_influences: Vec::new(),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn influence(&self) -> usize {
        self.hand.len()
    }

    pub fn is_eliminated(&self) -> bool {
        self.eliminated
    }

    pub fn lost_influences(&self) -> &[Card] {
        &self.lost_influences
    }

    pub fn holds(&self, character: Character) -> Option<usize> {
        self.hand.iter().position(|card| card.is(character))
    }

    pub fn gain_coins(&mut self, n: u32) {
        self.coins += n;
    }

    pub fn lose_coins(&mut self, n: u32) -> Result<(), CoupError> {
        if n > self.coins {
            return Err(CoupError::InsufficientFunds { required: n, available: self.coins });
        }
        self.coins -= n;
        Ok(())
    }

    pub fn add_card(&mut self, card: Card) -> Result<(), CoupError> {
        if self.eliminated {
            return Err(CoupError::PlayerEliminated(self.id));
        }
        if self.hand.len() >= HAND_SIZE {
            return Err(CoupError::HandFull);
        }
        self.hand.push(card);
        Ok(())
    }

    /// Surrenders one influence. With a single card left there is nothing to
    /// choose, otherwise the provider picks which card is turned face up.
    pub fn lose_influence(&mut self, provider: &mut dyn DecisionProvider) -> Result<Card, CoupError> {
        if self.eliminated {
            return Err(CoupError::PlayerEliminated(self.id));
        }

        let card_idx = match self.hand.len() {
            0 => return Err(CoupError::InvalidCardIndex { index: 0, len: 0 }),
            1 => 0,
            _ => provider.choose_influence_to_die(&self.hand),
        };

        self.lose_card(card_idx)
    }

    // the only place a player becomes eliminated
    fn lose_card(&mut self, card_idx: usize) -> Result<Card, CoupError> {
        if card_idx >= self.hand.len() {
            return Err(CoupError::InvalidCardIndex { index: card_idx, len: self.hand.len() });
        }

        let card = self.hand.remove(card_idx);
        self.lost_influences.push(card);

        if self.hand.is_empty() {
            self.eliminated = true;
        }

        Ok(card)
    }

    /// Puts `card` in place of the card at `card_idx` and hands back the old one.
    pub fn replace_card(&mut self, card_idx: usize, card: Card) -> Result<Card, CoupError> {
        match self.hand.get_mut(card_idx) {
            Some(slot) => Ok(std::mem::replace(slot, card)),
            None => Err(CoupError::InvalidCardIndex { index: card_idx, len: self.hand.len() }),
        }
    }

    /// Ambassador exchange. The provider sees hand + drawn and picks which
    /// cards to keep; the hand returns to its previous size and the rejected
    /// cards are handed back for the deck. Nothing changes if the selection is
    /// invalid.
    pub fn exchange(&mut self, drawn: &[Card], provider: &mut dyn DecisionProvider) -> Result<Vec<Card>, CoupError> {
        if self.eliminated {
            return Err(CoupError::PlayerEliminated(self.id));
        }

        let keep = self.hand.len();
        let combined: Vec<Card> = self.hand.iter().chain(drawn.iter()).copied().collect();
        if combined.len() > MAX_EXCHANGE_HAND {
            return Err(CoupError::HandOverflow(combined.len()));
        }

        let mut kept_idxs = provider.select_exchange_cards(&combined, keep);
        if let Some(&index) = kept_idxs.iter().find(|&&idx| idx >= combined.len()) {
            return Err(CoupError::InvalidCardIndex { index, len: combined.len() });
        }
        kept_idxs.sort_unstable();
        kept_idxs.dedup();
        if kept_idxs.len() != keep {
            return Err(CoupError::InvalidSelection { expected: keep, got: kept_idxs.len() });
        }

        let (kept, returned): (Vec<(usize, Card)>, Vec<(usize, Card)>) = combined
            .into_iter()
            .enumerate()
            .partition(|(idx, _)| kept_idxs.binary_search(idx).is_ok());

        self.hand = kept.into_iter().map(|(_, card)| card).collect();
        Ok(returned.into_iter().map(|(_, card)| card).collect())
    }

    pub fn reset(&mut self, coins: u32) {
        self.coins = coins;
        self.hand.clear();
        self.eliminated = false;
        self.lost_influences.clear();
    }

    // test setup only, bypasses the hand cap
    #[cfg(test)]
    pub(crate) fn hand_mut(&mut self) -> &mut Vec<Card> {
        &mut self.hand
    }

    #[cfg(test)]
    pub(crate) fn set_coins(&mut self, coins: u32) {
        self.coins = coins;
    }
}

#[cfg(test)]
mod tests {
    use crate::bots::ScriptedBot;
    use crate::card::Character::{Ambassador, Assassin, Captain, Contessa, Duke};
    use crate::card::Card;
    use crate::error::CoupError;
    use super::{Player, PlayerId};

    fn player(cards: &[crate::card::Character]) -> Player {
        let mut player = Player::new(PlayerId(0), "p0");
        player.reset(2);
        for &c in cards {
            player.add_card(Card::new(c)).unwrap();
        }
        player
    }

    #[test]
    fn coins() {
        let mut p = player(&[Duke, Duke]);
        p.gain_coins(3);
        assert_eq!(p.coins(), 5);
        assert_eq!(p.lose_coins(6), Err(CoupError::InsufficientFunds { required: 6, available: 5 }));
        assert_eq!(p.coins(), 5);
        p.lose_coins(5).unwrap();
        assert_eq!(p.coins(), 0);
    }

    #[test]
    fn hand_is_capped() {
        let mut p = player(&[Duke, Captain]);
        assert_eq!(p.add_card(Card::new(Contessa)), Err(CoupError::HandFull));
        assert_eq!(p.influence(), 2);
    }

    #[test]
    fn provider_chooses_which_influence_dies() {
        let mut p = player(&[Duke, Captain]);
        let mut bot = ScriptedBot::default().discarding([1]);

        assert_eq!(p.lose_influence(&mut bot).unwrap(), Card::new(Captain));
        assert_eq!(p.hand(), &[Card::new(Duke)]);
        assert!(!p.is_eliminated());

        // last card goes without asking
        assert_eq!(p.lose_influence(&mut bot).unwrap(), Card::new(Duke));
        assert!(p.is_eliminated());
        assert!(p.hand().is_empty());
        assert_eq!(p.lost_influences(), &[Card::new(Captain), Card::new(Duke)]);
    }

    #[test]
    fn eliminated_player_cannot_lose_or_gain_cards() {
        let mut p = player(&[Duke]);
        let mut bot = ScriptedBot::default();
        p.lose_influence(&mut bot).unwrap();
        assert_eq!(p.lose_influence(&mut bot), Err(CoupError::PlayerEliminated(PlayerId(0))));
        assert_eq!(p.add_card(Card::new(Duke)), Err(CoupError::PlayerEliminated(PlayerId(0))));
    }

    #[test]
    fn bad_discard_index_is_a_hard_error() {
        let mut p = player(&[Duke, Captain]);
        let mut bot = ScriptedBot::default().discarding([5]);
        assert_eq!(p.lose_influence(&mut bot), Err(CoupError::InvalidCardIndex { index: 5, len: 2 }));
        assert_eq!(p.influence(), 2);
        assert!(p.lost_influences().is_empty());
    }

    #[test]
    fn exchange_keeps_selected_cards() {
        let mut p = player(&[Duke, Captain]);
        let mut bot = ScriptedBot::default().keeping([vec![2, 3]]);

        let returned = p.exchange(&[Card::new(Assassin), Card::new(Contessa)], &mut bot).unwrap();
        assert_eq!(p.hand(), &[Card::new(Assassin), Card::new(Contessa)]);
        assert_eq!(returned, vec![Card::new(Duke), Card::new(Captain)]);
    }

    #[test]
    fn exchange_with_one_card() {
        let mut p = player(&[Duke]);
        let mut bot = ScriptedBot::default().keeping([vec![1]]);

        let returned = p.exchange(&[Card::new(Ambassador)], &mut bot).unwrap();
        assert_eq!(p.hand(), &[Card::new(Ambassador)]);
        assert_eq!(returned, vec![Card::new(Duke)]);
    }

    #[test]
    fn exchange_rejects_bad_selection() {
        let mut p = player(&[Duke, Captain]);
        let mut bot = ScriptedBot::default().keeping([vec![0, 0], vec![1, 9]]);

        let drawn = [Card::new(Assassin), Card::new(Contessa)];
        assert_eq!(p.exchange(&drawn, &mut bot), Err(CoupError::InvalidSelection { expected: 2, got: 1 }));
        assert_eq!(p.exchange(&drawn, &mut bot), Err(CoupError::InvalidCardIndex { index: 9, len: 4 }));
        assert_eq!(p.hand(), &[Card::new(Duke), Card::new(Captain)]);
    }

    #[test]
    fn exchange_overflow() {
        let mut p = player(&[Duke, Captain]);
        let mut bot = ScriptedBot::default();
        let drawn = [Card::new(Assassin), Card::new(Contessa), Card::new(Duke)];
        assert_eq!(p.exchange(&drawn, &mut bot), Err(CoupError::HandOverflow(5)));
    }

    #[test]
    fn reset_restores_start_values() {
        let mut p = player(&[Duke]);
        let mut bot = ScriptedBot::default();
        p.lose_influence(&mut bot).unwrap();
        p.reset(2);
        assert_eq!(p.coins(), 2);
        assert!(!p.is_eliminated());
        assert!(p.hand().is_empty());
        assert!(p.lost_influences().is_empty());
        assert_eq!(p.id(), PlayerId(0));
    }
}
