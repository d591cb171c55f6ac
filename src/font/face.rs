use std::sync::Arc;

use super::{Coverage, FontMetrics, GlyphRasterizer};

/// A `fontdue` font bound to one pixel size.
///
/// Glyphs are placed on a baseline sitting `ascent` pixels below the draw
/// origin, so the origin is the top-left corner of the text's line box.
#[derive(Clone)]
pub struct SizedFont {
    font: Arc<fontdue::Font>,
    size: f32,
}

/// One glyph placed relative to the draw origin. **Y-axis goes down.**
struct PlacedGlyph {
    x: f32,
    y: f32,
    metrics: fontdue::Metrics,
    bitmap: Vec<u8>,
}

impl SizedFont {
    pub fn new(font: Arc<fontdue::Font>, size: f32) -> Self {
        Self { font, size }
    }

    pub fn font(&self) -> &Arc<fontdue::Font> {
        &self.font
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    fn ascent(&self) -> f32 {
        self.font
            .horizontal_line_metrics(self.size)
            .map(|metrics| metrics.ascent)
            .unwrap_or(self.size)
    }

    /// Walks the glyphs of `text`, calling `f` with each glyph index, its
    /// metrics and the pen position of its origin.
    ///
    /// Kerning is applied between neighbouring glyphs of this font.
    fn walk(&self, text: &str, mut f: impl FnMut(u16, &fontdue::Metrics, f32)) -> f32 {
        let mut pen = 0.0;
        let mut prev: Option<u16> = None;

        for ch in text.chars() {
            let glyph_idx = self.font.lookup_glyph_index(ch);
            if glyph_idx == 0 && !ch.is_whitespace() {
                log::warn!("font has no glyph for {:?} (U+{:04X})", ch, ch as u32);
            }
            if let Some(prev_idx) = prev {
                pen += self
                    .font
                    .horizontal_kern_indexed(prev_idx, glyph_idx, self.size)
                    .unwrap_or(0.0);
            }
            let metrics = self.font.metrics_indexed(glyph_idx, self.size);
            f(glyph_idx, &metrics, pen);
            pen += metrics.advance_width;
            prev = Some(glyph_idx);
        }

        pen
    }
}

impl std::fmt::Debug for SizedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SizedFont")
            .field("name", &self.font.name())
            .field("size", &self.size)
            .finish()
    }
}

impl FontMetrics for SizedFont {
    fn advance_width(&self, text: &str) -> u32 {
        let advance = self.walk(text, |_, _, _| {});
        advance.round().max(0.0) as u32
    }

    fn line_height(&self, text: &str) -> u32 {
        let mut descent: f32 = 0.0;
        self.walk(text, |_, metrics, _| {
            // ymin is the bitmap's bottom edge measured upwards from the baseline.
            if metrics.height > 0 {
                descent = descent.max(-(metrics.ymin as f32));
            }
        });
        (self.ascent() + descent).ceil().max(1.0) as u32
    }
}

impl GlyphRasterizer for SizedFont {
    fn rasterize(&self, text: &str) -> Coverage {
        let ascent = self.ascent();

        let mut glyphs: Vec<PlacedGlyph> = Vec::new();
        self.walk(text, |glyph_idx, metrics, pen| {
            if metrics.width == 0 || metrics.height == 0 {
                return;
            }
            let (metrics, bitmap) = self.font.rasterize_indexed(glyph_idx, self.size);
            glyphs.push(PlacedGlyph {
                x: pen + metrics.xmin as f32,
                y: ascent - (metrics.ymin as f32 + metrics.height as f32),
                metrics,
                bitmap,
            });
        });

        if glyphs.is_empty() {
            return Coverage::empty();
        }

        let left = glyphs
            .iter()
            .map(|g| g.x.floor() as i32)
            .min()
            .unwrap_or(0);
        let top = glyphs
            .iter()
            .map(|g| g.y.floor() as i32)
            .min()
            .unwrap_or(0);
        let right = glyphs
            .iter()
            .map(|g| g.x.floor() as i32 + g.metrics.width as i32)
            .max()
            .unwrap_or(0);
        let bottom = glyphs
            .iter()
            .map(|g| g.y.floor() as i32 + g.metrics.height as i32)
            .max()
            .unwrap_or(0);

        let mut coverage = Coverage::new(
            left,
            top,
            (right - left).max(0) as usize,
            (bottom - top).max(0) as usize,
        );

        for glyph in &glyphs {
            let origin_x = (glyph.x.floor() as i32 - left) as usize;
            let origin_y = (glyph.y.floor() as i32 - top) as usize;
            let glyph_width = glyph.metrics.width;

            for row in 0..glyph.metrics.height {
                for col in 0..glyph_width {
                    let src_alpha = glyph.bitmap[row * glyph_width + col];
                    if src_alpha == 0 {
                        continue;
                    }
                    // Overlapping glyphs (combining marks) add up and saturate.
                    coverage.accumulate(origin_x + col, origin_y + row, src_alpha);
                }
            }
        }

        coverage
    }
}
