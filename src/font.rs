//! Font collaborators used by layout and painting.
//!
//! Layout only needs [`FontMetrics`]; painting only needs
//! [`GlyphRasterizer`]. Anything implementing both is a [`Face`] and can be
//! placed in a font pool.

mod face;

pub use face::SizedFont;

/// Per-text measurements reported by a font at a fixed pixel size.
pub trait FontMetrics {
    /// Horizontal advance of `text`, rounded to whole pixels.
    fn advance_width(&self, text: &str) -> u32;

    /// Height of the box `text` occupies when drawn from its top-left origin.
    ///
    /// The value may depend on the content: text with descenders reaches
    /// further below the baseline than text without.
    fn line_height(&self, text: &str) -> u32;
}

/// Produces glyph coverage for a run of text.
pub trait GlyphRasterizer {
    /// Rasterizes `text` with its draw origin at `(0, 0)`.
    ///
    /// The returned [`Coverage`] records where its top-left pixel sits
    /// relative to that origin, which may be negative for glyphs overhanging
    /// the left edge.
    fn rasterize(&self, text: &str) -> Coverage;
}

/// A font usable by both the layout and the painting stages.
pub trait Face: FontMetrics + GlyphRasterizer {}

impl<T: FontMetrics + GlyphRasterizer + ?Sized> Face for T {}

/// Simple L8 coverage bitmap positioned relative to a draw origin.
///
/// Pixels are arranged in row-major order. `0` is empty and `255` is fully
/// covered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coverage {
    pub left: i32,
    pub top: i32,
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl Coverage {
    /// Creates a zeroed bitmap of the given size placed at `(left, top)`.
    pub fn new(left: i32, top: i32, width: usize, height: usize) -> Self {
        Self {
            left,
            top,
            width,
            height,
            data: vec![0; width.saturating_mul(height)],
        }
    }

    pub fn empty() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Coverage at local `(col, row)`; out of range reads as empty.
    pub fn get(&self, col: usize, row: usize) -> u8 {
        if col >= self.width || row >= self.height {
            return 0;
        }
        self.data[row * self.width + col]
    }

    /// Adds `value` to the pixel at local `(col, row)`, saturating at 255.
    pub fn accumulate(&mut self, col: usize, row: usize, value: u8) {
        if col >= self.width || row >= self.height {
            return;
        }
        let idx = row * self.width + col;
        self.data[idx] = self.data[idx].saturating_add(value);
    }
}
