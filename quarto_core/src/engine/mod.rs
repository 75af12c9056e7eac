use crate::logic::board::Coord;
use crate::logic::game::GameState;
use crate::logic::piece::Piece;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod eval;
pub mod search;

pub type Score = f64;

/// Terminal win magnitude. Far above anything the heuristics can add up to.
pub const WIN_SCORE: Score = 10_000.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u32,
    pub time_ms: u64,
}

pub trait Evaluator {
    /// Non-negative magnitude for the side to act in `state`. `depth` is the
    /// search depth still remaining when the horizon was reached.
    fn evaluate(&self, state: &GameState, depth: u8) -> Score;
}

pub trait Searcher {
    /// Piece to hand the opponent, `None` when there is nothing to choose from.
    fn best_piece(&mut self, state: &GameState) -> Option<Piece>;
    /// Cell for the pending piece, `None` when no piece is pending.
    fn best_placement(&mut self, state: &GameState) -> Option<Coord>;
}
