//! Pure predicates over the four cells of one line.

use crate::logic::piece::{Attribute, Piece, ATTRIBUTE_MASK};

pub type LineValues = [Option<Piece>; 4];

/// Attribute bits on which every given piece agrees, whether all set or all
/// clear. With no pieces every bit trivially agrees.
fn shared_attributes(pieces: impl Iterator<Item = Piece>) -> u8 {
    let mut all_set = ATTRIBUTE_MASK;
    let mut all_clear = ATTRIBUTE_MASK;
    for piece in pieces {
        all_set &= piece.id();
        all_clear &= !piece.id();
    }
    (all_set | all_clear) & ATTRIBUTE_MASK
}

fn filled(values: &LineValues) -> impl Iterator<Item = Piece> + '_ {
    values.iter().flatten().copied()
}

pub fn empty_cells(values: &LineValues) -> usize {
    values.iter().filter(|v| v.is_none()).count()
}

/// Complete line whose four pieces share at least one attribute.
pub fn is_winning_line(values: &LineValues) -> bool {
    empty_cells(values) == 0 && shared_attributes(filled(values)) != 0
}

/// The occupants still leave a way to complete the line into a win.
pub fn is_alive(values: &LineValues) -> bool {
    filled(values).count() <= 1 || shared_attributes(filled(values)) != 0
}

/// Largest number of occupants agreeing on a single attribute value.
pub fn best_coherence(values: &LineValues) -> u8 {
    let mut best = 0;
    for attribute in Attribute::ALL {
        let with = filled(values).filter(|p| p.has(attribute)).count();
        let without = filled(values).count() - with;
        best = best.max(with).max(without);
    }
    u8::try_from(best).unwrap_or(u8::MAX)
}

/// Three coherent occupants and one hole: the right piece wins here.
pub fn is_one_away(values: &LineValues) -> bool {
    empty_cells(values) == 1 && is_alive(values) && best_coherence(values) == 3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: u8) -> Option<Piece> {
        Piece::new(id)
    }

    fn permutations(values: LineValues) -> Vec<LineValues> {
        let mut out = Vec::new();
        for a in 0..4 {
            for b in 0..4 {
                for c in 0..4 {
                    for d in 0..4 {
                        let idx = [a, b, c, d];
                        let mut seen = [false; 4];
                        if idx.iter().all(|&i| !std::mem::replace(&mut seen[i], true)) {
                            out.push(idx.map(|i| values[i]));
                        }
                    }
                }
            }
        }
        out
    }

    #[test]
    fn test_winning_line_every_permutation() {
        // 8, 9, 12, 15 are all tall.
        let line = [p(8), p(9), p(12), p(15)];
        let perms = permutations(line);
        assert_eq!(perms.len(), 24);
        for perm in perms {
            assert!(is_winning_line(&perm));
        }
    }

    #[test]
    fn test_shared_clear_bit_wins() {
        // 0, 1, 2, 3 are all short and light.
        assert!(is_winning_line(&[p(0), p(1), p(2), p(3)]));
    }

    #[test]
    fn test_complementary_pieces_do_not_win() {
        // 0 and 15 disagree on every attribute.
        assert!(!is_winning_line(&[p(0), p(15), p(1), p(14)]));
        assert!(!is_alive(&[p(0), p(15), None, None]));
    }

    #[test]
    fn test_empty_cell_never_wins() {
        assert!(!is_winning_line(&[p(8), p(9), None, p(15)]));
        assert!(!is_winning_line(&[None; 4]));
    }

    #[test]
    fn test_alive_lines() {
        assert!(is_alive(&[None; 4]));
        assert!(is_alive(&[None, p(0), None, None]));
        assert!(is_alive(&[p(8), None, p(9), None]));
        assert!(!is_alive(&[p(0), p(15), None, None]));
    }

    #[test]
    fn test_coherence_grows_with_shared_bit() {
        let mut line: LineValues = [None; 4];
        assert_eq!(best_coherence(&line), 0);
        let mut last = 0;
        for (slot, id) in [8, 9, 12].into_iter().enumerate() {
            line[slot] = p(id);
            let coherence = best_coherence(&line);
            assert!(coherence >= last);
            last = coherence;
        }
        assert_eq!(last, 3);
        assert!(is_one_away(&line));
    }

    #[test]
    fn test_tall_row_scenario() {
        let line = [p(8), p(10), p(13), None];
        assert_eq!(best_coherence(&line), 3);
        assert!(is_one_away(&line));

        // A short piece that matches none of the other shared bits.
        let mut completed = line;
        completed[3] = p(0b0001);
        assert!(!is_winning_line(&completed));

        completed[3] = p(0b1111);
        assert!(is_winning_line(&completed));
    }

    #[test]
    fn test_dead_line_not_one_away() {
        // Three pieces, no attribute shared by all of them.
        let line = [p(0), p(15), p(3), None];
        assert!(!is_alive(&line));
        assert!(!is_one_away(&line));
    }
}
