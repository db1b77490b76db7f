//! Ready-made decision providers.
//!
//! [`RandomBot`] plays uniformly random legal moves and is what the benchmarks
//! and property tests pit against each other. [`ScriptedBot`] replays queued
//! answers so a test can drive one exact line of play.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use crate::action::{Action, ActionKind};
use crate::card::{Card, Character};
use crate::player::PlayerId;
use crate::provider::{DecisionProvider, GameView};

pub struct RandomBot {
    rng: Pcg64,
    challenge_rate: f64,
    block_rate: f64,
}

impl RandomBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
            challenge_rate: 0.15,
            block_rate: 0.3,
        }
    }

    pub fn with_rates(mut self, challenge_rate: f64, block_rate: f64) -> Self {
        self.challenge_rate = challenge_rate.clamp(0.0, 1.0);
        self.block_rate = block_rate.clamp(0.0, 1.0);
        self
    }
}

impl DecisionProvider for RandomBot {
    fn choose_action(&mut self, view: &GameView) -> ActionKind {
        let coins = view.me().coins;

        let mut actions = vec![
            ActionKind::Income,
            ActionKind::ForeignAid,
            ActionKind::Tax,
            ActionKind::Exchange,
        ];
        if !view.opponents().is_empty() {
            actions.push(ActionKind::Steal);
            if coins >= 3 {
                actions.push(ActionKind::Assassinate);
            }
            if coins >= 7 {
                actions.push(ActionKind::Coup);
            }
        }

        actions.choose(&mut self.rng).copied().unwrap_or(ActionKind::Income)
    }

    fn choose_target(&mut self, view: &GameView, candidates: &[PlayerId]) -> PlayerId {
        // an empty list is an engine bug, answering with ourselves gets rejected
        candidates.choose(&mut self.rng).copied().unwrap_or(view.viewer)
    }

    fn wants_to_challenge(&mut self, _view: &GameView, _claim: Character, _claimant: PlayerId) -> bool {
        self.rng.gen_bool(self.challenge_rate)
    }

    fn wants_to_block(&mut self, _view: &GameView, _action: &Action) -> bool {
        self.rng.gen_bool(self.block_rate)
    }

    fn get_block_choice(&mut self, _view: &GameView, options: &[Character]) -> Character {
        options.choose(&mut self.rng).copied().unwrap_or(Character::Duke)
    }

    fn choose_influence_to_die(&mut self, hand: &[Card]) -> usize {
        self.rng.gen_range(0..hand.len().max(1))
    }

    fn select_exchange_cards(&mut self, combined: &[Card], keep: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.rng, combined.len(), keep.min(combined.len())).into_vec()
    }

    fn prompt_show_card(&mut self, _character: Character) -> bool {
        true
    }
}

/// Answers from queues. An empty queue falls back to the passive choice:
/// Income, first candidate, never challenge or block, always show, discard
/// the first card, keep the current hand.
#[derive(Default)]
pub struct ScriptedBot {
    actions: VecDeque<ActionKind>,
    targets: VecDeque<PlayerId>,
    challenges: VecDeque<bool>,
    blocks: VecDeque<Option<Character>>,
    shows: VecDeque<bool>,
    discards: VecDeque<usize>,
    keeps: VecDeque<Vec<usize>>,
    pending_block: Option<Character>,
    prompts: Rc<Cell<usize>>,
}

impl ScriptedBot {
    pub fn acting(mut self, actions: impl IntoIterator<Item=ActionKind>) -> Self {
        self.actions.extend(actions);
        self
    }

    pub fn targeting(mut self, targets: impl IntoIterator<Item=PlayerId>) -> Self {
        self.targets.extend(targets);
        self
    }

    pub fn challenging(mut self, answers: impl IntoIterator<Item=bool>) -> Self {
        self.challenges.extend(answers);
        self
    }

    /// `Some(character)` blocks claiming that character, `None` lets it through.
    pub fn blocking(mut self, answers: impl IntoIterator<Item=Option<Character>>) -> Self {
        self.blocks.extend(answers);
        self
    }

    pub fn showing(mut self, answers: impl IntoIterator<Item=bool>) -> Self {
        self.shows.extend(answers);
        self
    }

    pub fn discarding(mut self, card_idxs: impl IntoIterator<Item=usize>) -> Self {
        self.discards.extend(card_idxs);
        self
    }

    pub fn keeping(mut self, selections: impl IntoIterator<Item=Vec<usize>>) -> Self {
        self.keeps.extend(selections);
        self
    }

    /// Shared count of challenge and block prompts this bot has received.
    pub fn prompts(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.prompts)
    }

    fn prompted(&self) {
        self.prompts.set(self.prompts.get() + 1);
    }
}

impl DecisionProvider for ScriptedBot {
    fn choose_action(&mut self, _view: &GameView) -> ActionKind {
        self.actions.pop_front().unwrap_or(ActionKind::Income)
    }

    fn choose_target(&mut self, view: &GameView, candidates: &[PlayerId]) -> PlayerId {
        self.targets.pop_front()
            .or_else(|| candidates.first().copied())
            .unwrap_or(view.viewer)
    }

    fn wants_to_challenge(&mut self, _view: &GameView, _claim: Character, _claimant: PlayerId) -> bool {
        self.prompted();
        self.challenges.pop_front().unwrap_or(false)
    }

    fn wants_to_block(&mut self, _view: &GameView, _action: &Action) -> bool {
        self.prompted();
        self.pending_block = self.blocks.pop_front().flatten();
        self.pending_block.is_some()
    }

    fn get_block_choice(&mut self, _view: &GameView, options: &[Character]) -> Character {
        self.pending_block.take()
            .or_else(|| options.first().copied())
            .unwrap_or(Character::Duke)
    }

    fn choose_influence_to_die(&mut self, _hand: &[Card]) -> usize {
        self.discards.pop_front().unwrap_or(0)
    }

    fn select_exchange_cards(&mut self, _combined: &[Card], keep: usize) -> Vec<usize> {
        self.keeps.pop_front().unwrap_or_else(|| (0..keep).collect())
    }

    fn prompt_show_card(&mut self, _character: Character) -> bool {
        self.shows.pop_front().unwrap_or(true)
    }
}
