//! Tileable threshold matrices for ordered dithering.
//!
//! Thresholds are 16-bit values in `1..=65535`: a value of zero would print
//! a dot even on blank paper, so every constructor maps ranks into that range.

use crate::{error::Error, INK_MAX};

/// Largest matrix side accepted by [`DitherMatrix::iterated`].
const MAX_ITERATED_SIZE: usize = 4096;

/// A position-indexed threshold table, repeated across the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DitherMatrix {
    width: usize,
    height: usize,
    thresholds: Vec<u16>,
    x_offset: usize,
    y_offset: usize,
}

impl DitherMatrix {
    /// Build a matrix from explicit thresholds, row-major.
    pub fn new(width: usize, height: usize, thresholds: Vec<u16>) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidMatrix(format!(
                "empty matrix {}x{}",
                width, height
            )));
        }
        if thresholds.len() != width * height {
            return Err(Error::InvalidMatrix(format!(
                "{} thresholds for a {}x{} matrix",
                thresholds.len(),
                width,
                height
            )));
        }
        if thresholds.contains(&0) {
            return Err(Error::InvalidMatrix("threshold of zero".to_string()));
        }
        Ok(DitherMatrix {
            width,
            height,
            thresholds,
            x_offset: 0,
            y_offset: 0,
        })
    }

    /// Build a matrix from dot ranks.
    ///
    /// Rank `r` out of `n = max + 1` levels becomes the threshold at the
    /// centre of its slot, `(2r + 1) / 2n` of full scale.
    pub fn from_ranks(width: usize, height: usize, ranks: &[u32]) -> Result<Self, Error> {
        let levels = u64::from(ranks.iter().copied().max().unwrap_or(0)) + 1;
        let thresholds = ranks
            .iter()
            .map(|&rank| {
                let t = (2 * u64::from(rank) + 1) * u64::from(INK_MAX) / (2 * levels);
                t.max(1) as u16
            })
            .collect();
        Self::new(width, height, thresholds)
    }

    /// Build a `size^exponent` square matrix by recursively tiling `base`.
    ///
    /// `base` holds `size x size` ranks. The finest level of the recursion
    /// carries the most significant weight, so neighbouring pixels get ranks
    /// far apart. With the 2x2 base `[0, 2, 3, 1]` this yields the Bayer
    /// matrices.
    pub fn iterated(base: &[u32], size: usize, exponent: u32) -> Result<Self, Error> {
        if size < 2 || base.len() != size * size || exponent == 0 {
            return Err(Error::InvalidMatrix(format!(
                "cannot iterate a {}-entry base of size {} {} times",
                base.len(),
                size,
                exponent
            )));
        }
        let side = size
            .checked_pow(exponent)
            .filter(|&side| side <= MAX_ITERATED_SIZE)
            .ok_or_else(|| {
                Error::InvalidMatrix(format!("{}^{} is too large", size, exponent))
            })?;
        let step = (size * size) as u64;

        let mut ranks = Vec::with_capacity(side * side);
        for y in 0..side {
            for x in 0..side {
                let (mut xs, mut ys) = (x, y);
                let mut rank = 0u64;
                for _ in 0..exponent {
                    rank = rank * step + u64::from(base[(ys % size) * size + xs % size]);
                    xs /= size;
                    ys /= size;
                }
                ranks.push(rank as u32);
            }
        }
        Self::from_ranks(side, side, &ranks)
    }

    /// Bayer matrix of side `2^exponent`.
    pub fn bayer(exponent: u32) -> Result<Self, Error> {
        Self::iterated(&[0, 2, 3, 1], 2, exponent)
    }

    /// The same matrix viewed from another origin.
    ///
    /// Giving each channel a different offset keeps their dot patterns from
    /// landing on the same pixels.
    pub fn shifted(&self, dx: usize, dy: usize) -> Self {
        DitherMatrix {
            x_offset: (self.x_offset + dx) % self.width,
            y_offset: (self.y_offset + dy) % self.height,
            ..self.clone()
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn threshold(&self, x: usize, y: usize) -> u16 {
        self.row(y).at(x)
    }

    pub(crate) fn row(&self, y: usize) -> MatrixRow<'_> {
        let start = ((y + self.y_offset) % self.height) * self.width;
        MatrixRow {
            values: &self.thresholds[start..start + self.width],
            x_offset: self.x_offset,
        }
    }
}

/// One matrix row, fixed for the duration of a scanline.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MatrixRow<'a> {
    values: &'a [u16],
    x_offset: usize,
}

impl MatrixRow<'_> {
    #[inline]
    pub(crate) fn at(&self, x: usize) -> u16 {
        self.values[(x + self.x_offset) % self.values.len()]
    }
}
