pub mod action;
pub mod bots;
pub mod card;
pub mod config;
pub mod deck;
pub mod engine;
pub mod error;
pub mod history;
pub mod player;
pub mod provider;
pub mod state;

pub use action::{Action, ActionKind, ActionMeta, CATALOG};
pub use bots::{RandomBot, ScriptedBot};
pub use card::{Card, Character, CHARACTER_VARIANTS, TOTAL_CARDS};
pub use config::GameConfig;
pub use deck::Deck;
pub use engine::{GameSummary, TurnEngine};
pub use error::{CoupError, ExportError};
pub use history::{ActionLog, ActionResult, BlockRecord, CardEvent, ChallengeOutcome, ChallengeRecord, TurnRecord};
pub use player::{Player, PlayerId};
pub use provider::{DecisionProvider, GameView, PublicPlayer};
pub use state::GameState;
