//! Pixel-exact opacity masks used for collision tests.
//!
//! A mask stores one flag per sprite pixel. Two masks collide when at least one
//! opaque pixel of each lands on the same spot, so transparent sprite corners
//! never register a hit.

use ndarray::{Array2, s};

/// Opacity mask indexed as `(row, column)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    bits: Array2<bool>,
}

impl Mask {
    /// Builds a mask by asking `opaque(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, opaque: impl Fn(usize, usize) -> bool) -> Self {
        Self {
            bits: Array2::from_shape_fn((height, width), |(y, x)| opaque(x, y)),
        }
    }

    /// A fully opaque rectangle.
    pub fn filled(width: usize, height: usize) -> Self {
        Self {
            bits: Array2::from_elem((height, width), true),
        }
    }

    /// Mask width in pixels.
    pub fn width(&self) -> usize {
        self.bits.ncols()
    }

    /// Mask height in pixels.
    pub fn height(&self) -> usize {
        self.bits.nrows()
    }

    /// Whether the pixel at `(x, y)` is opaque. Out of range reads as transparent.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bits.get((y, x)).copied().unwrap_or(false)
    }

    /// Number of opaque pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&bit| bit).count()
    }

    /// Returns the mask mirrored top to bottom.
    pub fn flipped_vertically(&self) -> Self {
        Self {
            bits: self.bits.slice(s![..;-1, ..]).to_owned(),
        }
    }

    /// Finds the first opaque pixel shared with `other` placed at `offset`.
    ///
    /// `offset` is the position of `other`'s top-left corner relative to this
    /// mask's top-left corner. The returned point is in this mask's coordinates.
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(usize, usize)> {
        let (dx, dy) = offset;

        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (self.width() as i32).min(dx + other.width() as i32);
        let y1 = (self.height() as i32).min(dy + other.height() as i32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }

        let ours = self.bits.slice(s![y0..y1, x0..x1]);
        let theirs = other
            .bits
            .slice(s![(y0 - dy)..(y1 - dy), (x0 - dx)..(x1 - dx)]);

        ours.indexed_iter()
            .zip(theirs.iter())
            .find(|((_, a), b)| **a && **b)
            .map(|(((y, x), _), _)| (x0 as usize + x, y0 as usize + y))
    }

    /// Whether any opaque pixels are shared with `other` placed at `offset`.
    pub fn overlaps(&self, other: &Mask, offset: (i32, i32)) -> bool {
        self.overlap(other, offset).is_some()
    }
}
