use serde::{Deserialize, Serialize};

/// Table rules and run settings. Every field has a default, so a config file
/// only needs the values it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub starting_coins: u32,
    // at or above this a player must coup
    pub forced_coup_threshold: u32,
    // cards drawn by an ambassador exchange, fewer if the deck runs short
    pub exchange_draw: usize,
    // play_game gives up without a winner past this round
    pub max_rounds: Option<u32>,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_coins: 2,
            forced_coup_threshold: 10,
            exchange_draw: 2,
            max_rounds: Some(100),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: Option<u32>) -> Self {
        self.max_rounds = max_rounds;
        self
    }
}
