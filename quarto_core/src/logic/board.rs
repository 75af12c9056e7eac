use crate::logic::lines::{is_one_away, is_winning_line, LineValues};
use crate::logic::piece::{Piece, PieceSet};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const BOARD_SIDE: usize = 4;
pub const CELL_COUNT: usize = BOARD_SIDE * BOARD_SIDE;
pub const LINE_COUNT: usize = 10;

/// A cell address. `x` is the column, `y` the row, (0, 0) is the top left.
///
/// Out-of-range values are representable on purpose: callers such as a
/// console prompt hand raw input to `GameState::place`, which rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    pub const fn in_bounds(self) -> bool {
        (self.x as usize) < BOARD_SIDE && (self.y as usize) < BOARD_SIDE
    }

    /// Row-major index. Only meaningful for in-bounds coordinates.
    pub const fn index(self) -> usize {
        self.y as usize * BOARD_SIDE + self.x as usize
    }

    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_index(index: usize) -> Self {
        Self {
            x: (index % BOARD_SIDE) as u8,
            y: (index / BOARD_SIDE) as u8,
        }
    }

    /// Every cell in row-major order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..CELL_COUNT).map(Self::from_index)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

pub type Line = [Coord; BOARD_SIDE];

/// Rows, then columns, then the main and anti diagonal.
pub const LINES: [Line; LINE_COUNT] = build_lines();

#[allow(clippy::cast_possible_truncation)]
const fn build_lines() -> [Line; LINE_COUNT] {
    let mut lines = [[Coord::new(0, 0); BOARD_SIDE]; LINE_COUNT];
    let mut i = 0;
    while i < BOARD_SIDE {
        let mut j = 0;
        while j < BOARD_SIDE {
            lines[i][j] = Coord::new(j as u8, i as u8);
            lines[BOARD_SIDE + i][j] = Coord::new(i as u8, j as u8);
            j += 1;
        }
        lines[2 * BOARD_SIDE][i] = Coord::new(i as u8, i as u8);
        lines[2 * BOARD_SIDE + 1][i] = Coord::new(i as u8, (BOARD_SIDE - 1 - i) as u8);
        i += 1;
    }
    lines
}

/// Lines passing through `coord` (two or three of them).
pub fn lines_through(coord: Coord) -> impl Iterator<Item = &'static Line> {
    LINES.iter().filter(move |line| line.contains(&coord))
}

/// 4x4 grid of optional pieces plus the set of pieces already on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [Option<Piece>; CELL_COUNT],
    placed: PieceSet,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, coord: Coord) -> Option<Piece> {
        if !coord.in_bounds() {
            return None;
        }
        self.cells.get(coord.index()).copied().flatten()
    }

    pub fn is_empty_at(&self, coord: Coord) -> bool {
        coord.in_bounds() && self.get(coord).is_none()
    }

    /// Writes `piece` into an empty in-bounds cell. Returns false and leaves
    /// the board untouched otherwise, or when `piece` is already on the board.
    pub(crate) fn put(&mut self, coord: Coord, piece: Piece) -> bool {
        if !self.is_empty_at(coord) || self.placed.contains(piece) {
            return false;
        }
        match self.cells.get_mut(coord.index()) {
            Some(cell) => {
                *cell = Some(piece);
                self.placed.insert(piece);
                true
            }
            None => false,
        }
    }

    pub const fn placed(&self) -> PieceSet {
        self.placed
    }

    pub const fn piece_count(&self) -> usize {
        self.placed.len()
    }

    pub const fn is_full(&self) -> bool {
        self.placed.len() == CELL_COUNT
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        Coord::all().filter(|&coord| self.get(coord).is_none())
    }

    pub fn empty_count(&self) -> usize {
        CELL_COUNT - self.piece_count()
    }

    pub fn line_values(&self, line: &Line) -> LineValues {
        line.map(|coord| self.get(coord))
    }

    pub fn has_winning_line(&self) -> bool {
        LINES.iter().any(|line| is_winning_line(&self.line_values(line)))
    }

    /// Whether one of the lines through `coord` is complete and shares an attribute.
    pub fn wins_through(&self, coord: Coord) -> bool {
        lines_through(coord).any(|line| is_winning_line(&self.line_values(line)))
    }

    /// Number of lines that one well-chosen piece would complete.
    pub fn one_away_lines(&self) -> usize {
        LINES
            .iter()
            .filter(|line| is_one_away(&self.line_values(line)))
            .count()
    }

    /// Copy of the board with `piece` at `coord`, or `None` if that is illegal.
    pub fn with_piece(&self, coord: Coord, piece: Piece) -> Option<Self> {
        let mut next = *self;
        next.put(coord, piece).then_some(next)
    }

    /// Rows of raw piece ids, `None` for empty cells.
    pub fn to_grid(&self) -> [[Option<u8>; BOARD_SIDE]; BOARD_SIDE] {
        let mut grid = [[None; BOARD_SIDE]; BOARD_SIDE];
        for coord in Coord::all() {
            if let Some(row) = grid.get_mut(coord.y as usize) {
                if let Some(cell) = row.get_mut(coord.x as usize) {
                    *cell = self.get(coord).map(Piece::id);
                }
            }
        }
        grid
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "   0    1    2    3")?;
        for (i, coord) in Coord::all().enumerate() {
            if i % BOARD_SIDE == 0 {
                write!(f, "{} ", coord.y)?;
            }
            match self.get(coord) {
                Some(piece) => write!(f, " {}", piece.label())?,
                None => write!(f, " ....")?,
            }
            if i % BOARD_SIDE == BOARD_SIDE - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
