use crate::logic::board::{Board, Coord};
use crate::logic::piece::{Piece, PieceSet};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    First,
    Second,
}

impl PlayerId {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.index())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won(PlayerId),
    Draw,
}

/// Where the turn stands.
///
/// `AwaitingSelection` → (`select`) → `AwaitingPlacement` → (`place`) →
/// `AwaitingSelection` or `Terminal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// The current player must hand a piece to the opponent.
    AwaitingSelection,
    /// The current player must place the pending piece.
    AwaitingPlacement(Piece),
    Terminal(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    InvalidPiece,
    PieceAlreadyPlaced,
    OutOfBounds,
    CellOccupied,
    NoPiecePending,
    GameOver,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::InvalidPiece => "piece id must be in 0..16",
            Self::PieceAlreadyPlaced => "piece is already on the board",
            Self::OutOfBounds => "coordinates must be in 0..4",
            Self::CellOccupied => "cell is already occupied",
            Self::NoPiecePending => "no piece has been selected",
            Self::GameOver => "the game is over",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for MoveError {}

/// Complete position: board, phase, side to act and turn number.
///
/// The state is `Copy`. Search branches take their own copy before mutating,
/// so siblings never see each other's moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    phase: Phase,
    current: PlayerId,
    turn: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            phase: Phase::AwaitingSelection,
            current: PlayerId::First,
            turn: 1,
        }
    }

    pub const fn board(&self) -> &Board {
        &self.board
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn current_player(&self) -> PlayerId {
        self.current
    }

    /// Starts at 1, incremented by every accepted placement.
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    pub const fn pending(&self) -> Option<Piece> {
        match self.phase {
            Phase::AwaitingPlacement(piece) => Some(piece),
            _ => None,
        }
    }

    /// Records `piece` as the piece the opponent must place. Selecting again
    /// before the placement replaces the pending piece.
    pub fn select(&mut self, piece: Piece) -> Result<(), MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }
        if self.board.placed().contains(piece) {
            return Err(MoveError::PieceAlreadyPlaced);
        }
        self.phase = Phase::AwaitingPlacement(piece);
        Ok(())
    }

    /// Puts the pending piece on `coord` and settles the outcome.
    pub fn place(&mut self, coord: Coord) -> Result<(), MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }
        if !coord.in_bounds() {
            return Err(MoveError::OutOfBounds);
        }
        let Some(piece) = self.pending() else {
            return Err(MoveError::NoPiecePending);
        };
        if !self.board.put(coord, piece) {
            return Err(MoveError::CellOccupied);
        }

        self.turn += 1;
        self.phase = if self.board.wins_through(coord) {
            Phase::Terminal(Outcome::Won(self.current))
        } else if self.board.is_full() {
            Phase::Terminal(Outcome::Draw)
        } else {
            Phase::AwaitingSelection
        };
        Ok(())
    }

    /// Hands the move to the other player. Called by the turn driver once a
    /// selection was accepted; `select` and `place` never rotate turns.
    pub fn switch_player(&mut self) {
        self.current = self.current.opposite();
    }

    /// Copy of the state after `piece` was handed to the opponent.
    pub fn after_selection(&self, piece: Piece) -> Result<Self, MoveError> {
        let mut next = *self;
        next.select(piece)?;
        next.switch_player();
        Ok(next)
    }

    /// Copy of the state after the pending piece was placed on `coord`.
    pub fn after_placement(&self, coord: Coord) -> Result<Self, MoveError> {
        let mut next = *self;
        next.place(coord)?;
        Ok(next)
    }

    /// The player who completed a winning line, if any.
    pub const fn winner(&self) -> Option<PlayerId> {
        match self.phase {
            Phase::Terminal(Outcome::Won(player)) => Some(player),
            _ => None,
        }
    }

    /// No empty cell remains.
    pub const fn finished(&self) -> bool {
        self.board.is_full()
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self.phase, Phase::Terminal(_))
    }

    /// Empty cells in row-major order.
    pub fn available_placements(&self) -> Vec<Coord> {
        self.board.empty_cells().collect()
    }

    /// Pieces not on the board, in id order.
    pub const fn available_pieces(&self) -> PieceSet {
        self.board.placed().complement()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.to_grid(),
            available: self.available_pieces().iter().map(Piece::id).collect(),
            pending: self.pending().map(Piece::id),
            current_player: self.current,
            turn: self.turn,
        }
    }
}

/// Read-only view for display and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: [[Option<u8>; 4]; 4],
    pub available: Vec<u8>,
    pub pending: Option<u8>,
    pub current_player: PlayerId,
    pub turn: u32,
}
