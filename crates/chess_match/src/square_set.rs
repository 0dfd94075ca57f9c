//! Set of grid cells packed into a 64-bit integer.
//!
//! Bit `row * 8 + column` stands for the cell at `(row, column)`, so any grid
//! up to 8x8 fits. Move generation returns these sets.

use std::ops::{BitOr, BitOrAssign};

use crate::coords::GridPos;

const STRIDE: i8 = 8;

/// A set of grid cells, e.g. the destinations a piece can reach.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SquareSet(pub u64);

impl SquareSet {
    pub const EMPTY: SquareSet = SquareSet(0);

    #[inline(always)]
    fn bit(pos: GridPos) -> Option<u64> {
        if (0..STRIDE).contains(&pos.row) && (0..STRIDE).contains(&pos.column) {
            Some(1u64 << (pos.row * STRIDE + pos.column) as u32)
        } else {
            None
        }
    }

    /// Create a set with a single cell.
    pub fn from_pos(pos: GridPos) -> Self {
        SquareSet(Self::bit(pos).unwrap_or(0))
    }

    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub fn contains(self, pos: GridPos) -> bool {
        Self::bit(pos).is_some_and(|b| self.0 & b != 0)
    }

    /// Add a cell. Cells outside the 8x8 frame are ignored.
    #[inline(always)]
    pub fn insert(&mut self, pos: GridPos) {
        if let Some(b) = Self::bit(pos) {
            self.0 |= b;
        }
    }

    #[inline(always)]
    pub fn remove(&mut self, pos: GridPos) {
        if let Some(b) = Self::bit(pos) {
            self.0 &= !b;
        }
    }

    /// Number of cells in the set.
    #[inline(always)]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Get and remove the lowest cell (row-major order).
    #[inline(always)]
    pub fn pop_first(&mut self) -> Option<GridPos> {
        if self.0 == 0 {
            None
        } else {
            let idx = self.0.trailing_zeros() as i8;
            self.0 &= self.0 - 1;
            Some(GridPos::new(idx / STRIDE, idx % STRIDE))
        }
    }

    /// Boolean-matrix view sized `rows x columns`.
    pub fn to_matrix(self, rows: usize, columns: usize) -> Vec<Vec<bool>> {
        (0..rows)
            .map(|r| {
                (0..columns)
                    .map(|c| self.contains(GridPos::new(r as i8, c as i8)))
                    .collect()
            })
            .collect()
    }
}

impl BitOr for SquareSet {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self::Output {
        SquareSet(self.0 | rhs.0)
    }
}

impl BitOrAssign for SquareSet {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Iterates cells in row-major order, consuming the set.
impl Iterator for SquareSet {
    type Item = GridPos;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.pop_first()
    }
}

impl FromIterator<GridPos> for SquareSet {
    fn from_iter<I: IntoIterator<Item = GridPos>>(iter: I) -> Self {
        let mut set = SquareSet::EMPTY;
        for pos in iter {
            set.insert(pos);
        }
        set
    }
}

#[cfg(test)]
#[path = "square_set_tests.rs"]
mod square_set_tests;
