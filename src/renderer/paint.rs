use image::{Rgb, RgbImage, RgbaImage};

use crate::font::{Coverage, GlyphRasterizer};

/// Coverage at or above this value counts as inside the glyph when
/// antialiasing is off.
const BINARY_THRESHOLD: u8 = 128;

/// How a run of text is painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextStyle {
    pub fill: Rgb<u8>,
    pub stroke: Rgb<u8>,
    /// Outline radius in pixels; `0` draws no outline.
    pub stroke_width: u32,
    /// When off, coverage is thresholded so every touched pixel is either
    /// fully painted or left alone.
    pub antialias: bool,
}

/// Pixel buffer a [`TextStyle`] can be painted into.
pub trait Canvas {
    fn dimensions(&self) -> (u32, u32);

    /// Paints `color` at `(x, y)` with the given coverage. Callers guarantee
    /// the coordinates are inside the canvas.
    fn paint(&mut self, x: u32, y: u32, color: Rgb<u8>, coverage: u8);
}

/// Straight-alpha "source over" compositing onto a transparent canvas.
impl Canvas for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        image::GenericImageView::dimensions(self)
    }

    fn paint(&mut self, x: u32, y: u32, color: Rgb<u8>, coverage: u8) {
        let dst = self.get_pixel_mut(x, y);
        let src_a = coverage as f32 / 255.0;
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return;
        }

        for channel in 0..3 {
            let src = color[channel] as f32;
            let under = dst[channel] as f32;
            let value = (src * src_a + under * dst_a * (1.0 - src_a)) / out_a;
            dst[channel] = value.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

/// Opaque canvas; any covered pixel is overwritten with the flat color.
impl Canvas for RgbImage {
    fn dimensions(&self) -> (u32, u32) {
        image::GenericImageView::dimensions(self)
    }

    fn paint(&mut self, x: u32, y: u32, color: Rgb<u8>, coverage: u8) {
        if coverage >= BINARY_THRESHOLD {
            self.put_pixel(x, y, color);
        }
    }
}

/// Draws `text` with its top-left origin at `origin`.
///
/// The outline (when requested) is painted first and the fill on top of it.
/// Pixels falling outside the canvas are clipped.
pub fn draw_text<C, R>(canvas: &mut C, origin: [i64; 2], text: &str, face: &R, style: &TextStyle)
where
    C: Canvas + ?Sized,
    R: GlyphRasterizer + ?Sized,
{
    let mut coverage = face.rasterize(text);
    if coverage.is_empty() {
        return;
    }

    if !style.antialias {
        threshold(&mut coverage);
    }

    if style.stroke_width > 0 {
        let outline = dilate(&coverage, style.stroke_width);
        blit(canvas, origin, &outline, style.stroke);
    }
    blit(canvas, origin, &coverage, style.fill);
}

/// Snaps every coverage value to `0` or `255`.
fn threshold(coverage: &mut Coverage) {
    for value in &mut coverage.data {
        *value = if *value >= BINARY_THRESHOLD { 255 } else { 0 };
    }
}

/// Grows the covered area by a disc of `radius` pixels.
///
/// Each output pixel takes the maximum coverage found within the disc, so a
/// binary input stays binary.
fn dilate(coverage: &Coverage, radius: u32) -> Coverage {
    let r = radius as i64;
    let offsets: Vec<(i64, i64)> = (-r..=r)
        .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
        .filter(|(dx, dy)| dx * dx + dy * dy <= r * r)
        .collect();

    let pad = radius as usize;
    let mut out = Coverage::new(
        coverage.left - radius as i32,
        coverage.top - radius as i32,
        coverage.width + 2 * pad,
        coverage.height + 2 * pad,
    );

    for row in 0..coverage.height {
        for col in 0..coverage.width {
            let value = coverage.get(col, row);
            if value == 0 {
                continue;
            }
            for &(dx, dy) in &offsets {
                let x = (col as i64 + r + dx) as usize;
                let y = (row as i64 + r + dy) as usize;
                let idx = y * out.width + x;
                out.data[idx] = out.data[idx].max(value);
            }
        }
    }

    out
}

fn blit<C: Canvas + ?Sized>(canvas: &mut C, origin: [i64; 2], coverage: &Coverage, color: Rgb<u8>) {
    let (width, height) = canvas.dimensions();
    let base_x = origin[0] + coverage.left as i64;
    let base_y = origin[1] + coverage.top as i64;

    for row in 0..coverage.height {
        let y = base_y + row as i64;
        if y < 0 || y >= height as i64 {
            continue;
        }
        for col in 0..coverage.width {
            let value = coverage.get(col, row);
            if value == 0 {
                continue;
            }
            let x = base_x + col as i64;
            if x < 0 || x >= width as i64 {
                continue;
            }
            canvas.paint(x as u32, y as u32, color, value);
        }
    }
}
