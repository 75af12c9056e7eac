//! Move sources the turn driver can seat at the table.

use crate::engine::config::EngineConfig;
use crate::engine::eval::HeuristicEvaluator;
use crate::engine::search::NegamaxEngine;
use crate::engine::{Evaluator, Searcher};
use crate::logic::board::Coord;
use crate::logic::game::GameState;
use crate::logic::piece::Piece;
use log::warn;
use rand::rngs::StdRng;
use rand::seq::{IteratorRandom, SliceRandom};
use rand::{Rng, SeedableRng};

/// Anything that can take a turn. `state` is a copy of the live position;
/// players never mutate the game themselves.
///
/// Returning `None` means the player gives up (for instance a closed console).
pub trait Player {
    fn name(&self) -> String;
    fn choose_piece(&mut self, state: &GameState) -> Option<Piece>;
    fn place_piece(&mut self, state: &GameState) -> Option<Coord>;
}

/// Uniform choice among the legal pieces and cells.
pub struct RandomPlayer<R = StdRng> {
    rng: R,
}

impl RandomPlayer {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomPlayer<R> {
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Player for RandomPlayer<R> {
    fn name(&self) -> String {
        "random".to_string()
    }

    fn choose_piece(&mut self, state: &GameState) -> Option<Piece> {
        state.available_pieces().iter().choose(&mut self.rng)
    }

    fn place_piece(&mut self, state: &GameState) -> Option<Coord> {
        state.available_placements().choose(&mut self.rng).copied()
    }
}

/// Plays the best move found by a [`NegamaxEngine`], falling back to a random
/// legal move when the engine has no candidate.
pub struct SearchPlayer<E = HeuristicEvaluator, R = StdRng> {
    engine: NegamaxEngine<E, R>,
    fallback: RandomPlayer,
}

impl SearchPlayer {
    /// Engine and fallback both derive their randomness from `seed`.
    pub fn seeded(config: EngineConfig, seed: u64) -> Self {
        Self::with_engine(
            NegamaxEngine::seeded(config, seed),
            RandomPlayer::seeded(seed.wrapping_add(1)),
        )
    }
}

impl<E: Evaluator, R: Rng> SearchPlayer<E, R> {
    pub const fn with_engine(engine: NegamaxEngine<E, R>, fallback: RandomPlayer) -> Self {
        Self { engine, fallback }
    }

    pub const fn engine(&self) -> &NegamaxEngine<E, R> {
        &self.engine
    }
}

impl<E: Evaluator, R: Rng> Player for SearchPlayer<E, R> {
    fn name(&self) -> String {
        let config = self.engine.config();
        format!("negamax-{}(d{})", config.policy, config.depth)
    }

    fn choose_piece(&mut self, state: &GameState) -> Option<Piece> {
        if let Some(piece) = self.engine.best_piece(state) {
            return Some(piece);
        }
        warn!("{}: search found no piece, choosing at random", self.name());
        self.fallback.choose_piece(state)
    }

    fn place_piece(&mut self, state: &GameState) -> Option<Coord> {
        if let Some(cell) = self.engine.best_placement(state) {
            return Some(cell);
        }
        warn!("{}: search found no cell, placing at random", self.name());
        self.fallback.place_piece(state)
    }
}
