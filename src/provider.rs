//! The seam between the engine and whoever makes decisions for a seat.
//!
//! The engine never reads input or retries on its own. Every choice is a
//! synchronous call on the seat's [`DecisionProvider`], which only ever sees a
//! read-only [`GameView`] or a plain slice of its own cards.

use serde::{Deserialize, Serialize};
use crate::action::{Action, ActionKind};
use crate::card::{Card, Character};
use crate::history::ActionLog;
use crate::player::{Player, PlayerId};
use crate::state::GameState;

/// Everything about a player that is visible face up on the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPlayer {
    pub id: PlayerId,
    pub name: String,
    pub coins: u32,
    pub influence: usize,
    pub eliminated: bool,
    pub lost_influences: Vec<Card>,
}

impl From<&Player> for PublicPlayer {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id(),
            name: player.name().to_string(),
            coins: player.coins(),
            influence: player.influence(),
            eliminated: player.is_eliminated(),
            lost_influences: player.lost_influences().to_vec(),
        }
    }
}

/// The game from one seat's point of view.
pub struct GameView<'a> {
    pub viewer: PlayerId,
    pub current_player: PlayerId,
    pub round: u32,
    pub deck_size: usize,
    pub players: Vec<PublicPlayer>,
    pub hand: &'a [Card],
    pub log: &'a ActionLog,
}

impl<'a> GameView<'a> {
    pub fn new(state: &'a GameState, viewer: PlayerId) -> Self {
        Self {
            viewer,
            current_player: state.current_player(),
            round: state.round(),
            deck_size: state.deck().len(),
            players: state.public_players(),
            hand: state.player(viewer).map(|p| p.hand()).unwrap_or_default(),
            log: state.log(),
        }
    }

    pub fn me(&self) -> &PublicPlayer {
        &self.players[self.viewer.0]
    }

    pub fn player(&self, id: PlayerId) -> Option<&PublicPlayer> {
        self.players.get(id.0)
    }

    /// Living opponents in seat order after the viewer.
    pub fn opponents(&self) -> Vec<PlayerId> {
        let n = self.players.len();
        (1..n)
            .map(|offset| PlayerId((self.viewer.0 + offset) % n))
            .filter(|id| !self.players[id.0].eliminated)
            .collect()
    }
}

pub trait DecisionProvider {
    /// Only consulted when the seat is not forced to coup. Returning something
    /// unaffordable gets the turn rejected, not retried.
    fn choose_action(&mut self, view: &GameView) -> ActionKind;

    /// `candidates` are living opponents in seat order and never empty.
    fn choose_target(&mut self, view: &GameView, candidates: &[PlayerId]) -> PlayerId;

    fn wants_to_challenge(&mut self, view: &GameView, claim: Character, claimant: PlayerId) -> bool;

    fn wants_to_block(&mut self, view: &GameView, action: &Action) -> bool;

    fn get_block_choice(&mut self, view: &GameView, options: &[Character]) -> Character;

    /// Only called with two or more cards in hand.
    fn choose_influence_to_die(&mut self, hand: &[Card]) -> usize;

    /// Indices into `combined` of the `keep` cards to hold on to.
    fn select_exchange_cards(&mut self, combined: &[Card], keep: usize) -> Vec<usize>;

    /// Only called when the hand really holds `character`.
    fn prompt_show_card(&mut self, character: Character) -> bool;
}
