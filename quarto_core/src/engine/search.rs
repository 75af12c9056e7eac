use crate::engine::config::EngineConfig;
use crate::engine::eval::HeuristicEvaluator;
use crate::engine::{Evaluator, Score, SearchStats, Searcher};
use crate::logic::board::Coord;
use crate::logic::game::{GameState, Phase};
use crate::logic::piece::Piece;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::{IteratorRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Which phases the search branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPolicy {
    /// Every placement and every piece.
    #[default]
    Complete,
    /// Every placement, one random piece per selection node.
    PlacementSpecialized,
    /// Every piece, one random cell per placement node.
    SelectionSpecialized,
}

impl SearchPolicy {
    pub const ALL: [Self; 3] = [
        Self::Complete,
        Self::PlacementSpecialized,
        Self::SelectionSpecialized,
    ];

    const fn samples_placement(self) -> bool {
        matches!(self, Self::SelectionSpecialized)
    }

    const fn samples_selection(self) -> bool {
        matches!(self, Self::PlacementSpecialized)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::PlacementSpecialized => "placement",
            Self::SelectionSpecialized => "selection",
        }
    }
}

impl fmt::Display for SearchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Depth-limited negamax over the select/place turn structure.
///
/// A placement hands the move to a selection by the same player, so the
/// value and the window pass through unchanged. A selection hands the move
/// to the opponent's placement, so the value is negated and the window
/// becomes `(-beta, -alpha)`.
pub struct NegamaxEngine<E = HeuristicEvaluator, R = StdRng> {
    config: Arc<EngineConfig>,
    evaluator: E,
    rng: R,
    nodes_searched: u32,
    stats: SearchStats,
}

impl NegamaxEngine {
    pub fn seeded(config: EngineConfig, seed: u64) -> Self {
        Self::new(Arc::new(config), StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> NegamaxEngine<HeuristicEvaluator, R> {
    pub fn new(config: Arc<EngineConfig>, rng: R) -> Self {
        Self::with_evaluator(HeuristicEvaluator::new(config.clone()), config, rng)
    }
}

impl<E: Evaluator, R: Rng> NegamaxEngine<E, R> {
    pub const fn with_evaluator(evaluator: E, config: Arc<EngineConfig>, rng: R) -> Self {
        Self {
            config,
            evaluator,
            rng,
            nodes_searched: 0,
            stats: SearchStats {
                depth: 0,
                nodes: 0,
                time_ms: 0,
            },
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Statistics of the last root decision.
    pub const fn last_stats(&self) -> SearchStats {
        self.stats
    }

    /// Value of `state` for the player to act, searched `depth` plies deep.
    pub fn negamax(&mut self, state: &GameState, depth: u8, alpha: Score, beta: Score) -> Score {
        self.nodes_searched = self.nodes_searched.saturating_add(1);
        if depth == 0 || state.is_terminal() {
            return self.evaluator.evaluate(state, depth);
        }
        match state.phase() {
            Phase::AwaitingPlacement(_) => self.placement_node(state, depth, alpha, beta),
            Phase::AwaitingSelection => self.selection_node(state, depth, alpha, beta),
            Phase::Terminal(_) => self.evaluator.evaluate(state, depth),
        }
    }

    fn placement_node(
        &mut self,
        state: &GameState,
        depth: u8,
        mut alpha: Score,
        beta: Score,
    ) -> Score {
        let mut cells = state.available_placements();
        if self.config.policy.samples_placement() {
            cells = cells.choose(&mut self.rng).copied().into_iter().collect();
        }

        let mut best = Score::NEG_INFINITY;
        for cell in cells {
            let Ok(child) = state.after_placement(cell) else {
                continue;
            };
            let value = self.negamax(&child, depth - 1, alpha, beta);
            best = best.max(value);
            if self.config.alpha_beta {
                alpha = alpha.max(best);
                if alpha >= beta {
                    break;
                }
            }
        }
        best
    }

    fn selection_node(
        &mut self,
        state: &GameState,
        depth: u8,
        mut alpha: Score,
        beta: Score,
    ) -> Score {
        let available = state.available_pieces();
        let pieces: Vec<Piece> = if self.config.policy.samples_selection() {
            available.iter().choose(&mut self.rng).into_iter().collect()
        } else {
            available.iter().collect()
        };

        let mut best = Score::NEG_INFINITY;
        for piece in pieces {
            let Ok(child) = state.after_selection(piece) else {
                continue;
            };
            let value = -self.negamax(&child, depth - 1, -beta, -alpha);
            best = best.max(value);
            if self.config.alpha_beta {
                alpha = alpha.max(best);
                if alpha >= beta {
                    break;
                }
            }
        }
        best
    }

    /// Every empty cell for the pending piece with its score, best first.
    /// Equal scores keep row-major order.
    pub fn rank_placements(&mut self, state: &GameState) -> Vec<(Coord, Score)> {
        if state.pending().is_none() {
            return Vec::new();
        }
        let depth = self.config.depth;
        debug_assert!(depth > 0, "root search needs a depth of at least 1");

        let mut ranked = Vec::new();
        for cell in state.available_placements() {
            let Ok(child) = state.after_placement(cell) else {
                continue;
            };
            let score = self.negamax(&child, depth, Score::NEG_INFINITY, Score::INFINITY);
            debug!("placement {cell}: {score:.2}");
            ranked.push((cell, score));
        }
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    /// Every available piece with its score for the selecting player, best
    /// first. Equal scores keep id order.
    pub fn rank_pieces(&mut self, state: &GameState) -> Vec<(Piece, Score)> {
        if state.phase() != Phase::AwaitingSelection {
            return Vec::new();
        }
        let depth = self.config.depth;
        debug_assert!(depth > 0, "root search needs a depth of at least 1");

        let mut ranked = Vec::new();
        for piece in state.available_pieces() {
            let Ok(child) = state.after_selection(piece) else {
                continue;
            };
            let score = -self.negamax(&child, depth, Score::NEG_INFINITY, Score::INFINITY);
            debug!("piece {piece}: {score:.2}");
            ranked.push((piece, score));
        }
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    fn is_opening(&self, state: &GameState) -> bool {
        self.config.opening_shortcut && state.turn() == 1 && state.board().piece_count() == 0
    }

    fn timed<T>(&mut self, search: impl FnOnce(&mut Self) -> T) -> T {
        self.nodes_searched = 0;
        let start = Instant::now();
        let result = search(self);
        self.stats = SearchStats {
            depth: self.config.depth,
            nodes: self.nodes_searched,
            time_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        trace!(
            "searched {} nodes in {} ms at depth {}",
            self.stats.nodes,
            self.stats.time_ms,
            self.stats.depth
        );
        result
    }
}

impl<E: Evaluator, R: Rng> Searcher for NegamaxEngine<E, R> {
    fn best_piece(&mut self, state: &GameState) -> Option<Piece> {
        if self.is_opening(state) {
            return Piece::new(0);
        }
        let ranked = self.timed(|engine| engine.rank_pieces(state));
        let best = ranked.first().map(|&(piece, _)| piece);
        if let Some(piece) = best {
            debug!("{} engine hands over {piece}", self.config.policy);
        }
        best
    }

    fn best_placement(&mut self, state: &GameState) -> Option<Coord> {
        if self.is_opening(state) && state.pending().is_some() {
            return Some(Coord::new(0, 0));
        }
        let ranked = self.timed(|engine| engine.rank_placements(state));
        let best = ranked.first().map(|&(cell, _)| cell);
        if let Some(cell) = best {
            debug!("{} engine places at {cell}", self.config.policy);
        }
        best
    }
}
