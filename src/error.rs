use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::action::ActionKind;
use crate::card::Character;
use crate::player::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CoupError {
    #[error("needs {required} coins but only has {available}")]
    InsufficientFunds { required: u32, available: u32 },

    #[error("invalid target {0:?}")]
    InvalidTarget(Option<PlayerId>),

    #[error("the deck is empty")]
    EmptyDeck,

    #[error("hand is already full")]
    HandFull,

    #[error("exchange would leave {0} cards in hand")]
    HandOverflow(usize),

    #[error("{0} is eliminated")]
    PlayerEliminated(PlayerId),

    #[error("card index {index} is out of bounds for a hand of {len}")]
    InvalidCardIndex { index: usize, len: usize },

    #[error("expected {expected} distinct cards to keep, got {got}")]
    InvalidSelection { expected: usize, got: usize },

    #[error("{0} may not block this action")]
    InvalidBlockClaim(Character),

    #[error("no catalog entry for {0:?}")]
    NotImplementedEffect(ActionKind),

    #[error("{0} players cannot be dealt from a single deck")]
    InvalidPlayerCount(usize),

    #[error("a forced coup at {threshold} coins cannot pay the {cost} coin cost")]
    InvalidCoupThreshold { threshold: u32, cost: u32 },

    #[error("the game is already over")]
    GameOver,
}

impl CoupError {
    /// Errors raised before anything was mutated. The acting player can simply
    /// be asked again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CoupError::InsufficientFunds { .. }
                | CoupError::InvalidTarget(_)
                | CoupError::EmptyDeck
                | CoupError::HandFull
                | CoupError::HandOverflow(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::CoupError;
    use crate::action::ActionKind;

    #[test]
    fn recoverable_family() {
        assert!(CoupError::InsufficientFunds { required: 7, available: 2 }.is_recoverable());
        assert!(CoupError::InvalidTarget(None).is_recoverable());
        assert!(CoupError::EmptyDeck.is_recoverable());
        assert!(!CoupError::InvalidCardIndex { index: 4, len: 2 }.is_recoverable());
        assert!(!CoupError::NotImplementedEffect(ActionKind::Tax).is_recoverable());
        assert!(!CoupError::InvalidCoupThreshold { threshold: 6, cost: 7 }.is_recoverable());
    }

    #[test]
    fn messages() {
        let err = CoupError::InsufficientFunds { required: 3, available: 1 };
        assert_eq!(err.to_string(), "needs 3 coins but only has 1");
    }
}
