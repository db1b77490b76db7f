use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::card::{Card, CHARACTER_VARIANTS, COPIES_PER_CHARACTER};
use crate::error::CoupError;

/// The court deck. Cards are drawn from the end of the vec, and the order is
/// re-randomized every time a card goes back in so it never leaks information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Three of each character, shuffled.
    pub fn standard<R: Rng>(rng: &mut R) -> Self {
        let mut deck = Self {
            cards: CHARACTER_VARIANTS.iter()
                .flat_map(|&character| std::iter::repeat(Card::new(character)).take(COPIES_PER_CHARACTER))
                .collect(),
        };
        deck.shuffle(rng);
        deck
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn draw(&mut self) -> Result<Card, CoupError> {
        self.cards.pop().ok_or(CoupError::EmptyDeck)
    }

    pub fn draw_up_to(&mut self, n: usize) -> Vec<Card> {
        let n = n.min(self.cards.len());
        self.cards.split_off(self.cards.len() - n)
    }

    pub fn return_card<R: Rng>(&mut self, card: Card, rng: &mut R) {
        self.cards.push(card);
        self.shuffle(rng);
    }

    /// Trades `card` for a fresh one. The fresh card is drawn before `card`
    /// goes back, so the caller always receives a different physical card
    /// unless the deck is empty.
    pub fn swap<R: Rng>(&mut self, card: Card, rng: &mut R) -> Card {
        match self.cards.pop() {
            Some(fresh) => {
                self.return_card(card, rng);
                fresh
            }
            None => card,
        }
    }

    pub fn count(&self, card: Card) -> usize {
        self.cards.iter().filter(|&&c| c == card).count()
    }

    // pull a specific card out, used to rig hands in tests
    #[cfg(test)]
    pub(crate) fn take(&mut self, card: Card) -> Option<Card> {
        let idx = self.cards.iter().position(|&c| c == card)?;
        Some(self.cards.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use crate::card::Character::{Ambassador, Contessa, Duke};
    use crate::card::{Card, CHARACTER_VARIANTS, TOTAL_CARDS};
    use crate::error::CoupError;
    use super::Deck;

    fn rng() -> Pcg64 {
        Pcg64::seed_from_u64(11)
    }

    #[test]
    fn standard_deck() {
        let deck = Deck::standard(&mut rng());
        assert_eq!(deck.len(), TOTAL_CARDS);
        for character in CHARACTER_VARIANTS {
            assert_eq!(deck.count(Card::new(character)), 3);
        }
    }

    #[test]
    fn draw_until_empty() {
        let mut deck = Deck::standard(&mut rng());
        for _ in 0..TOTAL_CARDS {
            deck.draw().unwrap();
        }
        assert!(deck.is_empty());
        assert_eq!(deck.draw(), Err(CoupError::EmptyDeck));
    }

    #[test]
    fn draw_up_to_stops_at_available() {
        let mut rng = rng();
        let mut deck = Deck::standard(&mut rng);
        assert_eq!(deck.draw_up_to(2).len(), 2);
        assert_eq!(deck.len(), 13);

        let mut deck = Deck { cards: vec![Card::new(Duke)] };
        assert_eq!(deck.draw_up_to(2), vec![Card::new(Duke)]);
        assert!(deck.draw_up_to(2).is_empty());
    }

    #[test]
    fn return_card_keeps_count() {
        let mut rng = rng();
        let mut deck = Deck::standard(&mut rng);
        let card = deck.draw().unwrap();
        deck.return_card(card, &mut rng);
        assert_eq!(deck.len(), TOTAL_CARDS);
        assert_eq!(deck.count(card), 3);
    }

    #[test]
    fn swap_gives_a_different_card() {
        let mut rng = rng();
        let mut deck = Deck { cards: vec![Card::new(Contessa), Card::new(Ambassador)] };
        let fresh = deck.swap(Card::new(Duke), &mut rng);
        assert_ne!(fresh, Card::new(Duke));
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.count(Card::new(Duke)), 1);
    }

    #[test]
    fn swap_with_empty_deck_returns_same_card() {
        let mut rng = rng();
        let mut deck = Deck { cards: vec![] };
        assert_eq!(deck.swap(Card::new(Duke), &mut rng), Card::new(Duke));
        assert!(deck.is_empty());
    }
}
