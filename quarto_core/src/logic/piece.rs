use crate::logic::game::MoveError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PIECE_COUNT: usize = 16;
pub const ATTRIBUTE_COUNT: usize = 4;

/// Mask covering the four attribute bits of a piece id.
pub const ATTRIBUTE_MASK: u8 = 0x0F;

/// One of the four binary traits of a piece. The discriminant is the bit
/// index inside the piece id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Solid = 0,
    Round = 1,
    Dark = 2,
    Tall = 3,
}

impl Attribute {
    pub const ALL: [Self; ATTRIBUTE_COUNT] = [Self::Solid, Self::Round, Self::Dark, Self::Tall];

    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// A Quarto piece. The id is its own 4-bit attribute vector, so line checks
/// reduce to AND-ing ids together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Piece(u8);

impl Piece {
    #[must_use]
    pub const fn new(id: u8) -> Option<Self> {
        if (id as usize) < PIECE_COUNT {
            Some(Self(id))
        } else {
            None
        }
    }

    pub const fn id(self) -> u8 {
        self.0
    }

    pub const fn has(self, attribute: Attribute) -> bool {
        self.0 & attribute.bit() != 0
    }

    /// All 16 pieces in id order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..PIECE_COUNT as u8).map(Self)
    }

    /// Four-letter code: height, color, shape, fill. Upper case marks a set bit.
    pub fn label(self) -> String {
        [
            (Attribute::Tall, 'T', 's'),
            (Attribute::Dark, 'D', 'l'),
            (Attribute::Round, 'R', 'q'),
            (Attribute::Solid, 'S', 'h'),
        ]
        .iter()
        .map(|&(attribute, set, clear)| if self.has(attribute) { set } else { clear })
        .collect()
    }
}

impl TryFrom<u8> for Piece {
    type Error = MoveError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::new(id).ok_or(MoveError::InvalidPiece)
    }
}

impl From<Piece> for u8 {
    fn from(piece: Piece) -> Self {
        piece.0
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:2}:{}", self.0, self.label())
    }
}

/// Inventory of pieces as a 16-bit set, bit `i` standing for piece `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PieceSet(u16);

impl PieceSet {
    pub const EMPTY: Self = Self(0);
    pub const FULL: Self = Self(u16::MAX);

    pub const fn contains(self, piece: Piece) -> bool {
        self.0 & (1 << piece.0) != 0
    }

    pub fn insert(&mut self, piece: Piece) {
        self.0 |= 1 << piece.0;
    }

    pub fn remove(&mut self, piece: Piece) {
        self.0 &= !(1 << piece.0);
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn complement(self) -> Self {
        Self(!self.0)
    }

    /// Pieces in ascending id order.
    pub const fn iter(self) -> PieceSetIter {
        PieceSetIter { bits: self.0 }
    }
}

impl FromIterator<Piece> for PieceSet {
    fn from_iter<I: IntoIterator<Item = Piece>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for piece in iter {
            set.insert(piece);
        }
        set
    }
}

impl IntoIterator for PieceSet {
    type Item = Piece;
    type IntoIter = PieceSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct PieceSetIter {
    bits: u16,
}

impl Iterator for PieceSetIter {
    type Item = Piece;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        let id = self.bits.trailing_zeros() as u8;
        self.bits &= self.bits - 1;
        Some(Piece(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for PieceSetIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sixteen_distinct_pieces() {
        let all: PieceSet = Piece::all().collect();
        assert_eq!(all, PieceSet::FULL);
        assert_eq!(all.len(), PIECE_COUNT);
    }

    #[test]
    fn test_piece_bounds() {
        assert!(Piece::new(15).is_some());
        assert!(Piece::new(16).is_none());
        assert_eq!(Piece::try_from(42), Err(MoveError::InvalidPiece));
    }

    #[test]
    fn test_attributes_follow_bits() {
        let piece = Piece::new(0b1010).unwrap();
        assert!(piece.has(Attribute::Tall));
        assert!(!piece.has(Attribute::Dark));
        assert!(piece.has(Attribute::Round));
        assert!(!piece.has(Attribute::Solid));
        assert_eq!(piece.label(), "TlRh");
    }

    #[test]
    fn test_piece_set_iteration_order() {
        let mut set = PieceSet::EMPTY;
        for id in [9, 3, 12] {
            set.insert(Piece::new(id).unwrap());
        }
        let ids: Vec<u8> = set.iter().map(Piece::id).collect();
        assert_eq!(ids, vec![3, 9, 12]);

        set.remove(Piece::new(9).unwrap());
        assert_eq!(set.len(), 2);
        assert!(!set.contains(Piece::new(9).unwrap()));
        assert_eq!(set.complement().len(), 14);
    }

    #[test]
    fn test_piece_serde_rejects_out_of_range() {
        let piece: Piece = serde_json::from_str("7").unwrap();
        assert_eq!(piece.id(), 7);
        assert!(serde_json::from_str::<Piece>("16").is_err());
    }
}
