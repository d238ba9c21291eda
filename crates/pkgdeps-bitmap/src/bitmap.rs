//! Dual-orientation bit matrix.
//!
//! A [`BitMap`] stores an `R x C` boolean relation twice, packed into `u64`
//! words:
//!
//! - row-major: bit offset `row * cols + col`
//! - column-major: bit offset `col * rows + row`
//!
//! Every mutation writes both copies, so `row_major[row, col]` always mirrors
//! `col_major[col, row]`. In exchange for twice the memory, [`BitMap::row`]
//! and [`BitMap::column`] are both plain word-shift copies with no
//! transposition at read time.
//!
//! Slices use the same bit order as the backing storage: bit `i` of a slice
//! lives in word `i / 64` at position `i % 64` (least significant first).

use std::fmt;

use crate::error::{Error, Result};

/// Width of a storage word in bits.
pub const WORD_BITS: usize = u64::BITS as usize;

/// Number of words needed to hold `bits` bits.
fn words_for(bits: usize) -> usize {
    bits.div_ceil(WORD_BITS)
}

/// Split a bit offset into `(word index, bit index)`.
fn locate(offset: usize) -> (usize, usize) {
    (offset / WORD_BITS, offset % WORD_BITS)
}

/// Copy `len` bits starting at bit `start` of `words` into a fresh,
/// word-aligned vector.
///
/// A slice generally does not start on a word boundary, so each destination
/// word is stitched from two adjacent source words: the low part shifted
/// right, the next word's low bits shifted left into the high part. The last
/// destination word is masked so bits past `len` never leak in from the
/// neighbouring row or column.
fn extract(words: &[u64], start: usize, len: usize) -> Vec<u64> {
    let mut out = vec![0u64; words_for(len)];
    let (first, shift) = locate(start);

    for (i, dst) in out.iter_mut().enumerate() {
        let src = first + i;
        let low = words[src] >> shift;
        let high = if shift == 0 {
            0
        } else {
            words.get(src + 1).map_or(0, |w| w << (WORD_BITS - shift))
        };
        *dst = low | high;
    }

    let tail = len % WORD_BITS;
    if tail != 0 {
        if let Some(last) = out.last_mut() {
            *last &= (1u64 << tail) - 1;
        }
    }

    out
}

/// Iterate the positions of set bits in a packed slice, in ascending order.
pub fn ones(words: &[u64]) -> impl Iterator<Item = usize> + '_ {
    words.iter().enumerate().flat_map(|(w, &word)| {
        let mut rest = word;
        std::iter::from_fn(move || {
            if rest == 0 {
                return None;
            }
            let bit = rest.trailing_zeros() as usize;
            rest &= rest - 1;
            Some(w * WORD_BITS + bit)
        })
    })
}

/// Boolean relation stored in row-major and column-major orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMap {
    row_major: Vec<u64>,
    col_major: Vec<u64>,
    rows: usize,
    cols: usize,
}

impl BitMap {
    /// Allocate an empty `rows x cols` matrix.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        let size = words_for(rows * cols);
        Self {
            row_major: vec![0; size],
            col_major: vec![0; size],
            rows,
            cols,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    fn check(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::OutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Word/bit positions of a cell in both orientations.
    fn indices(&self, row: usize, col: usize) -> ((usize, usize), (usize, usize)) {
        (
            locate(row * self.cols + col),
            locate(col * self.rows + row),
        )
    }

    /// Check whether `(row, col)` is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if the cell lies outside the matrix.
    pub fn is_set(&self, row: usize, col: usize) -> Result<bool> {
        self.check(row, col)?;
        let ((word, bit), _) = self.indices(row, col);
        Ok(self.row_major[word] & (1 << bit) != 0)
    }

    /// Set `(row, col)` in both orientations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if the cell lies outside the matrix.
    pub fn set(&mut self, row: usize, col: usize) -> Result<()> {
        self.check(row, col)?;
        let ((rc_word, rc_bit), (cr_word, cr_bit)) = self.indices(row, col);
        self.row_major[rc_word] |= 1 << rc_bit;
        self.col_major[cr_word] |= 1 << cr_bit;
        Ok(())
    }

    /// Clear `(row, col)` in both orientations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if the cell lies outside the matrix.
    pub fn clear(&mut self, row: usize, col: usize) -> Result<()> {
        self.check(row, col)?;
        let ((rc_word, rc_bit), (cr_word, cr_bit)) = self.indices(row, col);
        self.row_major[rc_word] &= !(1 << rc_bit);
        self.col_major[cr_word] &= !(1 << cr_bit);
        Ok(())
    }

    /// Packed bits of one row; bit `c` is set when `(row, c)` is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `row` is not a valid row.
    pub fn row(&self, row: usize) -> Result<Vec<u64>> {
        if row >= self.rows {
            return Err(Error::OutOfRange {
                row,
                col: 0,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(extract(&self.row_major, row * self.cols, self.cols))
    }

    /// Packed bits of one column; bit `r` is set when `(r, col)` is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `col` is not a valid column.
    pub fn column(&self, col: usize) -> Result<Vec<u64>> {
        if col >= self.cols {
            return Err(Error::OutOfRange {
                row: 0,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(extract(&self.col_major, col * self.rows, self.rows))
    }
}

/// Renders the row-major copy as comma-terminated `0`/`1` cells, one line per
/// row. Diagnostics only.
impl fmt::Display for BitMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let ((word, bit), _) = self.indices(row, col);
                let cell = u8::from(self.row_major[word] & (1 << bit) != 0);
                write!(f, "{cell},")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
