use crate::card::TOTAL_CARDS;
use crate::deck::Deck;
use crate::history::ActionLog;
use crate::player::{Player, PlayerId};
use crate::provider::PublicPlayer;

/// Everything the engine mutates during a game. Owned by the
/// [`TurnEngine`](crate::engine::TurnEngine); everyone else gets `&GameState`.
#[derive(Clone, Debug)]
pub struct GameState {
    pub(crate) players: Vec<Player>,
    pub(crate) current_player_idx: usize,
    pub(crate) deck: Deck,
    pub(crate) round: u32,
    pub(crate) turn: u32,
    pub(crate) game_over: bool,
    pub(crate) log: ActionLog,
}

impl GameState {
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.0)
    }

    pub fn current_player(&self) -> PlayerId {
        PlayerId(self.current_player_idx)
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    pub fn players_remaining(&self) -> usize {
        self.players.iter().filter(|p| !p.is_eliminated()).count()
    }

    pub fn winner(&self) -> Option<PlayerId> {
        if self.players_remaining() != 1 {
            return None;
        }
        self.players.iter().find(|p| !p.is_eliminated()).map(|p| p.id())
    }

    pub fn public_players(&self) -> Vec<PublicPlayer> {
        self.players.iter().map(PublicPlayer::from).collect()
    }

    /// Cards in the deck, in hands and face up. Always [`TOTAL_CARDS`].
    pub fn card_count(&self) -> usize {
        self.deck.len()
            + self.players.iter()
                .map(|p| p.hand().len() + p.lost_influences().len())
                .sum::<usize>()
    }

    pub fn is_consistent(&self) -> bool {
        self.card_count() == TOTAL_CARDS
            && self.players.iter().all(|p| p.is_eliminated() == p.hand().is_empty())
    }

    pub(crate) fn is_alive(&self, id: PlayerId) -> bool {
        self.player(id).map_or(false, |p| !p.is_eliminated())
    }

    /// Living players other than `exclude_idx`, in seat order after it.
    pub(crate) fn other_player_indexes(&self, exclude_idx: usize) -> Vec<PlayerId> {
        (1..self.players.len())
            .map(|n| (exclude_idx + n) % self.players.len())
            .filter(|&player_idx| !self.players[player_idx].is_eliminated())
            .map(PlayerId)
            .collect()
    }

    // next living seat after the current one, bumping the round on wraparound
    pub(crate) fn go_next_turn(&mut self) {
        self.turn += 1;

        let n = self.players.len();
        let mut idx = self.current_player_idx;
        loop {
            idx = (idx + 1) % n;
            if idx == 0 {
                self.round += 1;
            }
            if !self.players[idx].is_eliminated() || idx == self.current_player_idx {
                break;
            }
        }

        self.current_player_idx = idx;
    }
}
