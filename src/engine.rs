//! Turn resolution.
//!
//! One call to [`TurnEngine::play_turn`] walks a single turn through
//!
//! ```text
//! forced coup check -> declaration -> challenge window -> block window
//!     -> counter-challenge -> resolution -> next seat
//! ```
//!
//! Declaration is validated before anything is mutated, so a rejected action
//! leaves the game exactly as it was and the same seat is still to act. Once
//! the action is declared the turn always runs to an end state; losses taken
//! in challenges stand even when the effect itself never lands. A provider
//! that breaks its contract mid-turn still gets the turn logged as
//! `Failed` and the seat advanced before the error is returned.

use rand::{thread_rng, Rng, SeedableRng};
use rand_pcg::Pcg64;
use crate::action::{Action, ActionKind, Effect, EffectContext};
use crate::card::{Card, Character, TOTAL_CARDS};
use crate::config::GameConfig;
use crate::deck::Deck;
use crate::error::CoupError;
use crate::history::{ActionLog, ActionResult, BlockRecord, CardEvent, ChallengeOutcome, ChallengeRecord, TurnRecord};
use crate::player::{Player, PlayerId, HAND_SIZE};
use crate::provider::{DecisionProvider, GameView};
use crate::state::GameState;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSummary {
    pub winner: Option<PlayerId>,
    pub rounds: u32,
    pub turns: usize,
}

pub struct TurnEngine {
    config: GameConfig,
    state: GameState,
    providers: Vec<Box<dyn DecisionProvider>>,
    rng: Pcg64,
}

impl TurnEngine {
    /// Seats players in the given order and deals the opening hands. At least
    /// one card has to stay in the deck for reveals to swap against.
    pub fn new(config: GameConfig, seats: Vec<(String, Box<dyn DecisionProvider>)>) -> Result<Self, CoupError> {
        let num_players = seats.len();
        if num_players < 2 || num_players * HAND_SIZE >= TOTAL_CARDS {
            return Err(CoupError::InvalidPlayerCount(num_players));
        }

        let coup_cost = ActionKind::Coup.meta()?.cost;
        if config.forced_coup_threshold < coup_cost {
            return Err(CoupError::InvalidCoupThreshold { threshold: config.forced_coup_threshold, cost: coup_cost });
        }

        let seed = config.seed.unwrap_or_else(|| thread_rng().gen());
        let mut rng = Pcg64::seed_from_u64(seed);

        let (names, providers): (Vec<String>, Vec<Box<dyn DecisionProvider>>) = seats.into_iter().unzip();
        let players = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| Player::new(PlayerId(idx), name))
            .collect();

        let deck = Deck::standard(&mut rng);

        let mut engine = Self {
            config,
            state: GameState {
                players,
                current_player_idx: 0,
                deck,
                round: 1,
                turn: 0,
                game_over: false,
                log: ActionLog::new(),
            },
            providers,
            rng,
        };
        engine.reset()?;

        log::info!("seated {num_players} players, seed {seed}");
        Ok(engine)
    }

    /// Back to a fresh deal. Seats, names and providers stay where they are.
    pub fn reset(&mut self) -> Result<(), CoupError> {
        self.state.deck = Deck::standard(&mut self.rng);

        for player in &mut self.state.players {
            player.reset(self.config.starting_coins);
        }
        for _ in 0..HAND_SIZE {
            for player in &mut self.state.players {
                player.add_card(self.state.deck.draw()?)?;
            }
        }

        self.state.current_player_idx = 0;
        self.state.round = 1;
        self.state.turn = 0;
        self.state.game_over = false;
        self.state.log.clear();

        Ok(())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.state.winner()
    }

    /// Plays turns until someone wins or the round limit runs out.
    pub fn play_game(&mut self) -> Result<GameSummary, CoupError> {
        while !self.state.game_over {
            if let Some(max_rounds) = self.config.max_rounds {
                if self.state.round > max_rounds {
                    log::warn!("stopping after {max_rounds} rounds without a winner");
                    break;
                }
            }
            self.play_turn()?;
        }

        Ok(GameSummary {
            winner: self.state.winner(),
            rounds: self.state.round,
            turns: self.state.log.len(),
        })
    }

    pub fn play_turn(&mut self) -> Result<TurnRecord, CoupError> {
        if self.state.game_over {
            return Err(CoupError::GameOver);
        }

        let actor = self.state.current_player();
        let action = self.declare(actor)?;
        log::debug!("T{}: {:?}", self.state.turn, action);

        let mut record = TurnRecord::new(self.state.turn, self.state.round, actor, action.kind(), action.target());

        // pay on declaration, nothing is refunded later
        self.state.players[actor.0].lose_coins(action.cost())?;

        // the cost is gone, so a broken provider answer still ends the turn
        let resolved = self.resolve(&action, &mut record);
        record.result = match &resolved {
            Ok(result) => result.clone(),
            Err(err) => {
                log::warn!("{:?} aborted: {err}", action);
                ActionResult::Failed(err.clone())
            }
        };
        record.snapshot = self.state.public_players();
        log::info!("{:?} -> {:?}", action, record.result);

        self.state.log.log(record.clone());

        if self.state.game_over {
            log::info!("game over, winner is {:?}", self.state.winner());
        } else {
            self.state.go_next_turn();
        }

        resolved.map(|_| record)
    }

    fn ask<T>(&mut self, seat: PlayerId, f: impl FnOnce(&mut dyn DecisionProvider, &GameView) -> T) -> T {
        log::trace!("prompting {seat}");
        let view = GameView::new(&self.state, seat);
        f(self.providers[seat.0].as_mut(), &view)
    }

    fn declare(&mut self, actor: PlayerId) -> Result<Action, CoupError> {
        let coins = self.state.players[actor.0].coins();

        let kind = if coins >= self.config.forced_coup_threshold {
            log::debug!("{actor} has {coins} coins and must coup");
            ActionKind::Coup
        } else {
            self.ask(actor, |p, view| p.choose_action(view))
        };

        let meta = kind.meta()?;
        if meta.cost > coins {
            return Err(CoupError::InsufficientFunds { required: meta.cost, available: coins });
        }

        let target = if meta.targeted {
            let candidates = self.state.other_player_indexes(actor.0);
            if candidates.is_empty() {
                return Err(CoupError::InvalidTarget(None));
            }

            let target = self.ask(actor, |p, view| p.choose_target(view, &candidates));
            if !candidates.contains(&target) {
                return Err(CoupError::InvalidTarget(Some(target)));
            }
            Some(target)
        } else {
            None
        };

        Action::new(kind, actor, target)
    }

    fn resolve(&mut self, action: &Action, record: &mut TurnRecord) -> Result<ActionResult, CoupError> {
        let actor = action.actor();

        if let Some(claim) = action.claimed_character() {
            if let Some(challenger) = self.challenge_window(actor, claim) {
                let upheld = self.resolve_challenge(actor, challenger, claim, record)?;
                record.challenge = Some(challenge_record(challenger, actor, claim, upheld));

                if !upheld {
                    return Ok(ActionResult::ChallengeLost);
                }
                if let Some(result) = self.interrupted(action) {
                    return Ok(result);
                }
            }
        }

        if action.blockable() {
            if let Some((blocker, claim)) = self.block_window(action)? {
                log::debug!("{blocker} blocks with {claim}");

                let mut block = BlockRecord { blocker, claim, challenge: None };
                let challenged = self.ask(actor, |p, view| p.wants_to_challenge(view, claim, blocker));
                if !challenged {
                    record.block = Some(block);
                    return Ok(ActionResult::Blocked);
                }

                let upheld = self.resolve_challenge(blocker, actor, claim, record)?;
                block.challenge = Some(challenge_record(actor, blocker, claim, upheld));
                record.block = Some(block);

                if upheld {
                    return Ok(ActionResult::Blocked);
                }
                if let Some(result) = self.interrupted(action) {
                    return Ok(result);
                }
            }
        }

        let ctx = EffectContext {
            players: &mut self.state.players,
            providers: &mut self.providers,
            deck: &mut self.state.deck,
            rng: &mut self.rng,
            exchange_draw: self.config.exchange_draw,
        };

        match action.apply(ctx) {
            Ok(effect) => {
                log::debug!("{:?}", effect);
                if let Effect::InfluenceLost { target, card } = effect {
                    self.record_loss(target, card, record);
                }
                Ok(ActionResult::Performed)
            }
            Err(err) if err.is_recoverable() => {
                log::warn!("{:?} failed: {err}", action);
                Ok(ActionResult::Failed(err))
            }
            Err(err) => Err(err),
        }
    }

    // ends the turn early when a challenge loss finished the game or the target
    fn interrupted(&self, action: &Action) -> Option<ActionResult> {
        if self.state.game_over {
            return Some(ActionResult::GameEnded);
        }
        match action.target() {
            Some(target) if !self.state.is_alive(target) => Some(ActionResult::TargetEliminated),
            _ => None,
        }
    }

    fn challenge_window(&mut self, actor: PlayerId, claim: Character) -> Option<PlayerId> {
        for challenger in self.state.other_player_indexes(actor.0) {
            if self.ask(challenger, |p, view| p.wants_to_challenge(view, claim, actor)) {
                log::debug!("{challenger} challenges {actor}'s {claim}");
                return Some(challenger);
            }
        }
        None
    }

    fn block_window(&mut self, action: &Action) -> Result<Option<(PlayerId, Character)>, CoupError> {
        let options = action.blocking_characters();

        match action.target() {
            // untargeted: anyone may block, and there is only one character to claim
            None => {
                let Some(&claim) = options.first() else {
                    return Ok(None);
                };
                for blocker in self.state.other_player_indexes(action.actor().0) {
                    if self.ask(blocker, |p, view| p.wants_to_block(view, action)) {
                        return Ok(Some((blocker, claim)));
                    }
                }
                Ok(None)
            }
            Some(target) => {
                if !self.ask(target, |p, view| p.wants_to_block(view, action)) {
                    return Ok(None);
                }
                let claim = self.ask(target, |p, view| p.get_block_choice(view, options));
                if !options.contains(&claim) {
                    return Err(CoupError::InvalidBlockClaim(claim));
                }
                Ok(Some((target, claim)))
            }
        }
    }

    /// True when the claimant proves the claim. The proven card goes back to
    /// the deck for a fresh one and the challenger pays; otherwise the
    /// claimant pays.
    fn resolve_challenge(&mut self, claimant: PlayerId, challenger: PlayerId, claim: Character, record: &mut TurnRecord) -> Result<bool, CoupError> {
        if let Some(card_idx) = self.state.players[claimant.0].holds(claim) {
            if self.providers[claimant.0].prompt_show_card(claim) {
                let shown = self.state.players[claimant.0].hand()[card_idx];
                let fresh = self.state.deck.swap(shown, &mut self.rng);
                self.state.players[claimant.0].replace_card(card_idx, fresh)?;
                record.revealed.push(CardEvent { player: claimant, card: shown });
                log::debug!("{claimant} shows {shown}");

                self.lose_influence(challenger, record)?;
                return Ok(true);
            }
        }

        self.lose_influence(claimant, record)?;
        Ok(false)
    }

    fn lose_influence(&mut self, seat: PlayerId, record: &mut TurnRecord) -> Result<(), CoupError> {
        let card = self.state.players[seat.0].lose_influence(self.providers[seat.0].as_mut())?;
        self.record_loss(seat, card, record);
        Ok(())
    }

    fn record_loss(&mut self, seat: PlayerId, card: Card, record: &mut TurnRecord) {
        log::info!("{seat} loses {card}");
        record.lost.push(CardEvent { player: seat, card });

        if !self.state.is_alive(seat) {
            log::info!("{seat} is eliminated");
            record.eliminated.push(seat);
        }
        if self.state.players_remaining() <= 1 {
            self.state.game_over = true;
        }
    }
}

fn challenge_record(challenger: PlayerId, claimant: PlayerId, claim: Character, upheld: bool) -> ChallengeRecord {
    ChallengeRecord {
        challenger,
        claimant,
        claim,
        outcome: if upheld { ChallengeOutcome::Upheld } else { ChallengeOutcome::Refuted },
    }
}
