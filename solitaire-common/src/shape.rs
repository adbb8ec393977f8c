//! Fixed board geometry of the two variants.
//!
//! Board positions are numbered row by row from the top. A position is
//! *covered* by the (at most two) positions of the next row that overlap it and
//! can only be played once all of them are gone.

use std::fmt;

pub const BOARD_SIZE: usize = 28;
pub const STOCK_SIZE: usize = 24;
pub const DECK_SIZE: usize = BOARD_SIZE + STOCK_SIZE;
pub const STOCK_START: u8 = BOARD_SIZE as u8;
/// Stock pointer value meaning the stock is exhausted.
pub const EMPTY_STOCK: u8 = DECK_SIZE as u8;
pub const BOARD_MASK: u64 = (1 << BOARD_SIZE) - 1;
pub const DECK_MASK: u64 = (1 << DECK_SIZE) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Pyramid,
    TriPeaks,
}

impl Variant {
    pub fn shape(&self) -> Shape {
        match self {
            Variant::Pyramid => Shape::pyramid(),
            Variant::TriPeaks => Shape::tri_peaks(),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Pyramid => write!(f, "Pyramid"),
            Variant::TriPeaks => write!(f, "TriPeaks"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    variant: Variant,
    rows: Vec<Vec<u8>>,
    covered_by: [u64; BOARD_SIZE],
}

impl Shape {
    /// Seven rows of 1..=7 cards, each card resting on the two cards below it.
    pub fn pyramid() -> Self {
        let mut rows = Vec::with_capacity(7);
        let mut covered_by = [0; BOARD_SIZE];
        let mut start = 0;
        for len in 1..=7u8 {
            rows.push((start..start + len).collect::<Vec<_>>());
            if len < 7 {
                for col in 0..len {
                    let below = start + len + col;
                    covered_by[(start + col) as usize] = (1 << below) | (1 << (below + 1));
                }
            }
            start += len;
        }
        Self {
            variant: Variant::Pyramid,
            rows,
            covered_by,
        }
    }

    /// Three peaks of 3, 6 and 9 cards sharing a bottom row of 10.
    pub fn tri_peaks() -> Self {
        let rows: Vec<Vec<u8>> = vec![
            (0..3).collect(),
            (3..9).collect(),
            (9..18).collect(),
            (18..28).collect(),
        ];
        let mut covered_by = [0; BOARD_SIZE];
        for peak in 0..3u8 {
            covered_by[peak as usize] = (1 << (3 + 2 * peak)) | (1 << (4 + 2 * peak));
        }
        for i in 0..6u8 {
            let below = 9 + 3 * (i / 2) + i % 2;
            covered_by[(3 + i) as usize] = (1 << below) | (1 << (below + 1));
        }
        for i in 0..9u8 {
            covered_by[(9 + i) as usize] = (1 << (18 + i)) | (1 << (19 + i));
        }
        Self {
            variant: Variant::TriPeaks,
            rows,
            covered_by,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    pub fn row_mask(&self, row: usize) -> u64 {
        self.rows[row].iter().fold(0, |mask, &p| mask | (1 << p))
    }

    /// Mask of the positions directly covering `position`.
    pub fn covered_by(&self, position: u8) -> u64 {
        self.covered_by[position as usize]
    }

    pub fn is_uncovered(&self, position: u8, present: u64) -> bool {
        present & self.covered_by(position) == 0
    }

    /// Mask of the uncovered positions among `present`.
    pub fn uncovered(&self, present: u64) -> u64 {
        (0..BOARD_SIZE as u8)
            .filter(|&p| present & (1 << p) != 0 && self.is_uncovered(p, present))
            .fold(0, |mask, p| mask | (1 << p))
    }

    /// The position itself plus every position covering it or covered by it, transitively.
    pub fn related(&self, position: u8) -> u64 {
        let mut related = 1 << position;
        let mut frontier = related;
        while frontier != 0 {
            let mut next = 0;
            for p in 0..BOARD_SIZE as u8 {
                if frontier & (1 << p) != 0 {
                    next |= self.covered_by(p);
                }
            }
            next &= !related;
            related |= next;
            frontier = next;
        }
        let mut frontier = 1u64 << position;
        while frontier != 0 {
            let mut next = 0;
            for p in 0..BOARD_SIZE as u8 {
                if self.covered_by(p) & frontier != 0 {
                    next |= 1 << p;
                }
            }
            next &= !related;
            related |= next;
            frontier = next;
        }
        related
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pyramid_shape() {
        let shape = Shape::pyramid();
        assert_eq!(shape.rows().len(), 7);
        assert_eq!(shape.covered_by(0), 0b110);
        assert_eq!(shape.covered_by(4), (1 << 7) | (1 << 8));
        assert_eq!(shape.covered_by(21), 0);
        assert_eq!(shape.uncovered(BOARD_MASK), 0b1111111 << 21);
        // the apex relates to every pyramid card
        assert_eq!(shape.related(0), BOARD_MASK);
        // a bottom corner relates to its diagonal only
        assert_eq!(
            shape.related(21),
            (1 << 21) | (1 << 15) | (1 << 10) | (1 << 6) | (1 << 3) | (1 << 1) | 1
        );
    }

    #[test]
    fn test_tri_peaks_shape() {
        let shape = Shape::tri_peaks();
        assert_eq!(shape.rows().len(), 4);
        assert_eq!(shape.covered_by(0), (1 << 3) | (1 << 4));
        assert_eq!(shape.covered_by(2), (1 << 7) | (1 << 8));
        assert_eq!(shape.covered_by(4), (1 << 10) | (1 << 11));
        assert_eq!(shape.covered_by(5), (1 << 12) | (1 << 13));
        assert_eq!(shape.covered_by(17), (1 << 26) | (1 << 27));
        assert_eq!(shape.uncovered(BOARD_MASK), 0b11_1111_1111 << 18);
        assert_eq!(shape.row_mask(0), 0b111);
    }
}
