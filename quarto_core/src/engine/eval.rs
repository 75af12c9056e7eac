use crate::engine::config::EngineConfig;
use crate::engine::{Evaluator, Score};
use crate::logic::board::{lines_through, Board, LINES};
use crate::logic::game::{GameState, Phase};
use crate::logic::lines::{best_coherence, empty_cells, is_alive, is_one_away};
use crate::logic::piece::{Attribute, Piece, PieceSet};
use std::sync::Arc;

/// Weighted positional heuristics for both phases of a turn.
pub struct HeuristicEvaluator {
    config: Arc<EngineConfig>,
}

impl Default for HeuristicEvaluator {
    fn default() -> Self {
        Self::new(Arc::new(EngineConfig::default()))
    }
}

impl HeuristicEvaluator {
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    /// Value of having to place `piece` on `board`.
    #[allow(clippy::cast_precision_loss)]
    pub fn placement_score(&self, board: &Board, piece: Piece) -> Score {
        let c = &self.config;
        let mut score = c.w_immediate_win * immediate_wins(board, piece) as f64
            + c.w_mobility * board.empty_count() as f64
            + c.w_block * blocking_placements(board, piece) as f64;
        // Fork-aware terms, skipped when unweighted.
        if c.w_fork > 0.0 {
            score += c.w_fork * fork_placements(board, piece) as f64;
        }
        if c.w_coherence > 0.0 {
            score += c.w_coherence * f64::from(best_alive_coherence(board));
        }
        score
    }

    /// Value of having to hand a piece over on `board`.
    pub fn selection_score(&self, board: &Board) -> Score {
        let terms = selection_terms(board);
        self.config.w_safe_max * terms.safe_max
            + self.config.w_safe_avg * terms.safe_avg
            + self.config.w_diversity * terms.diversity
    }
}

impl Evaluator for HeuristicEvaluator {
    fn evaluate(&self, state: &GameState, depth: u8) -> Score {
        if state.winner().is_some() {
            return self.config.win_score + f64::from(depth);
        }
        if state.finished() {
            return 0.0;
        }
        let score = match state.phase() {
            Phase::AwaitingPlacement(piece) => self.placement_score(state.board(), piece),
            Phase::AwaitingSelection => self.selection_score(state.board()),
            Phase::Terminal(_) => 0.0,
        };
        score.max(0.0)
    }
}

/// Empty cells where `piece` completes a winning line.
pub fn immediate_wins(board: &Board, piece: Piece) -> usize {
    board
        .empty_cells()
        .filter(|&cell| {
            board
                .with_piece(cell, piece)
                .is_some_and(|next| next.wins_through(cell))
        })
        .count()
}

/// Empty cells whose occupation by `piece` leaves fewer one-away lines.
pub fn blocking_placements(board: &Board, piece: Piece) -> usize {
    let threats = board.one_away_lines();
    if threats == 0 {
        return 0;
    }
    board
        .empty_cells()
        .filter_map(|cell| board.with_piece(cell, piece))
        .filter(|next| next.one_away_lines() < threats)
        .count()
}

/// Non-winning placements of `piece` that leave two or more one-away lines
/// through the cell just filled.
pub fn fork_placements(board: &Board, piece: Piece) -> usize {
    board
        .empty_cells()
        .filter(|&cell| {
            let Some(next) = board.with_piece(cell, piece) else {
                return false;
            };
            if next.wins_through(cell) {
                return false;
            }
            lines_through(cell)
                .filter(|line| is_one_away(&next.line_values(line)))
                .count()
                >= 2
        })
        .count()
}

/// Highest coherence over lines that are alive and not yet full.
pub fn best_alive_coherence(board: &Board) -> u8 {
    LINES
        .iter()
        .map(|line| board.line_values(line))
        .filter(|values| empty_cells(values) > 0 && is_alive(values))
        .map(|values| best_coherence(&values))
        .max()
        .unwrap_or(0)
}

/// Number of immediate winning replies the opponent gets when handed `piece`.
pub fn toxicity(board: &Board, piece: Piece) -> usize {
    immediate_wins(board, piece)
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SelectionTerms {
    pub safe_max: f64,
    pub safe_avg: f64,
    pub diversity: f64,
}

/// Safety of the worst and of the average available piece, plus the
/// diversity of the remaining pool.
#[allow(clippy::cast_precision_loss)]
pub fn selection_terms(board: &Board) -> SelectionTerms {
    let available = board.placed().complement();
    if available.is_empty() {
        return SelectionTerms::default();
    }
    let empties = board.empty_count() as f64;

    let mut tox_max = 0;
    let mut tox_sum = 0;
    for piece in available {
        let tox = toxicity(board, piece);
        tox_max = tox_max.max(tox);
        tox_sum += tox;
    }
    let tox_avg = tox_sum as f64 / available.len() as f64;

    SelectionTerms {
        safe_max: (empties - tox_max as f64).max(0.0),
        safe_avg: (empties - tox_avg).max(0.0),
        diversity: attribute_entropy(available),
    }
}

/// Sum over the four attributes of the base-2 entropy of that attribute
/// within `pieces`. Ranges from 0 to 4.
#[allow(clippy::cast_precision_loss)]
pub fn attribute_entropy(pieces: PieceSet) -> f64 {
    let total = pieces.len();
    if total == 0 {
        return 0.0;
    }
    let mut entropy = 0.0;
    for attribute in Attribute::ALL {
        let with = pieces.iter().filter(|p| p.has(attribute)).count();
        for n in [with, total - with] {
            if n > 0 {
                let p = n as f64 / total as f64;
                entropy -= p * p.log2();
            }
        }
    }
    entropy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::board::Coord;

    fn piece(id: u8) -> Piece {
        Piece::new(id).unwrap()
    }

    fn board_with(cells: &[(u8, u8, u8)]) -> Board {
        let mut board = Board::new();
        for &(x, y, id) in cells {
            board = board.with_piece(Coord::new(x, y), piece(id)).unwrap();
        }
        board
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_board_placement_is_mobility() {
        let mut state = GameState::new();
        state.select(piece(6)).unwrap();
        let score = HeuristicEvaluator::default().evaluate(&state, 1);
        assert!(close(score, 16.0));

        let fork = HeuristicEvaluator::new(Arc::new(EngineConfig::fork_aware()));
        assert!(close(fork.evaluate(&state, 1), 16.0));
    }

    #[test]
    fn test_empty_board_selection() {
        let state = GameState::new();
        // Nothing is toxic yet and every attribute is split evenly.
        let score = HeuristicEvaluator::default().evaluate(&state, 2);
        assert!(close(score, 70.0 * 16.0 + 15.0 * 16.0 + 3.0 * 4.0));
    }

    #[test]
    fn test_win_overrides_heuristics() {
        let mut state = GameState::new();
        for (x, id) in [8, 13, 14, 9].into_iter().enumerate() {
            state.select(piece(id)).unwrap();
            state.switch_player();
            state.place(Coord::new(x as u8, 0)).unwrap();
        }
        assert!(state.winner().is_some());
        let heavy = EngineConfig {
            w_mobility: 500.0,
            ..EngineConfig::default()
        };
        for config in [EngineConfig::default(), heavy] {
            let eval = HeuristicEvaluator::new(Arc::new(config));
            assert!(close(eval.evaluate(&state, 0), 10_000.0));
            assert!(close(eval.evaluate(&state, 3), 10_003.0));
        }
    }

    #[test]
    fn test_full_board_draw_scores_zero() {
        // No row, column or diagonal shares an attribute.
        let layout: [[u8; 4]; 4] = [
            [0, 11, 13, 6],
            [7, 12, 10, 1],
            [14, 5, 3, 8],
            [9, 2, 4, 15],
        ];
        let mut state = GameState::new();
        for (y, row) in layout.iter().enumerate() {
            for (x, &id) in row.iter().enumerate() {
                state.select(piece(id)).unwrap();
                state.switch_player();
                state.place(Coord::new(x as u8, y as u8)).unwrap();
            }
        }
        assert!(state.finished());
        assert_eq!(state.winner(), None);

        for config in [EngineConfig::default(), EngineConfig::fork_aware()] {
            let eval = HeuristicEvaluator::new(Arc::new(config));
            for depth in [0, 1, 3, 8] {
                assert!(close(eval.evaluate(&state, depth), 0.0), "depth {depth}");
            }
        }
    }

    #[test]
    fn test_threat_counts() {
        // Only the tall bit is shared by 8, 13 and 14.
        let board = board_with(&[(0, 0, 8), (1, 0, 13), (2, 0, 14)]);
        assert_eq!(immediate_wins(&board, piece(15)), 1);
        assert_eq!(immediate_wins(&board, piece(7)), 0);
        assert_eq!(toxicity(&board, piece(9)), 1);

        // Any piece dropped into the hole ends the threat.
        assert_eq!(blocking_placements(&board, piece(7)), 1);
        assert_eq!(best_alive_coherence(&board), 3);
    }

    #[test]
    fn test_fork_detection() {
        // 10, 13 on row 0 and 14, 12 on column 0 all share the tall bit.
        let board = board_with(&[(1, 0, 10), (2, 0, 13), (0, 1, 14), (0, 2, 12)]);
        // 8 at (0, 0) leaves both the row and the column one piece short.
        assert_eq!(fork_placements(&board, piece(8)), 1);
        // 0 kills the row at (0, 0), only the column stays one-away.
        assert_eq!(fork_placements(&board, piece(0)), 0);
    }

    #[test]
    fn test_selection_terms_penalise_toxic_pool() {
        let quiet = Board::new();
        let threatened = board_with(&[(0, 0, 8), (1, 0, 13), (2, 0, 14)]);
        let q = selection_terms(&quiet);
        let t = selection_terms(&threatened);
        assert!(close(q.safe_max, 16.0));
        assert!(close(t.safe_max, 12.0));
        assert!(t.safe_avg < 13.0);
        assert!(t.safe_avg > t.safe_max);
    }

    #[test]
    fn test_entropy_bounds() {
        assert!(close(attribute_entropy(PieceSet::FULL), 4.0));
        assert!(close(attribute_entropy(PieceSet::EMPTY), 0.0));
        let single: PieceSet = [piece(5)].into_iter().collect();
        assert!(close(attribute_entropy(single), 0.0));
        // 0 and 1 differ only in the solid bit.
        let pair: PieceSet = [piece(0), piece(1)].into_iter().collect();
        assert!(close(attribute_entropy(pair), 1.0));
    }
}
