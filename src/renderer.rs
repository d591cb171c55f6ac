//! Paints a resolved [`TextLayout`] onto the visible image and the mask.
//!
//! Both canvases are driven by the same position list; only the styles
//! differ. The image gets per-piece colors with antialiasing, the mask gets
//! the piece's index color in binary mode.

pub mod color;
pub mod finalize;
pub mod paint;

use image::{Rgb, RgbImage, RgbaImage};

use crate::font::Face;
use crate::text::{Piece, TextLayout};

pub use color::{MAX_MASK_INDEX, check_mask_capacity, decode_mask_color, encode_mask_index};
pub use finalize::{PixelRect, crop_to_visible, piece_bounding_boxes};
pub use paint::{Canvas, TextStyle, draw_text};

/// Colors used for one piece on the visible canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PieceColors {
    pub fill: Rgb<u8>,
    pub stroke: Rgb<u8>,
}

/// Renders the visible image: transparent background, every piece in its
/// own colors.
///
/// `colors` is indexed like `pieces`.
pub fn render_image<F: Face>(
    layout: &TextLayout,
    pieces: &[Piece],
    fonts: &[F],
    colors: &[PieceColors],
    stroke_width: u32,
) -> RgbaImage {
    let mut image = RgbaImage::new(layout.width, layout.height);

    for position in layout.positions() {
        let piece = &pieces[position.index];
        let piece_colors = colors[position.index];
        let style = TextStyle {
            fill: piece_colors.fill,
            stroke: piece_colors.stroke,
            stroke_width,
            antialias: true,
        };
        draw_text(
            &mut image,
            [position.x as i64, position.y as i64],
            &piece.text,
            &fonts[piece.font],
            &style,
        );
    }

    image
}

/// Renders the mask: black background, piece `i` painted with the encoding
/// of `i + 1`, outline included.
///
/// At most [`MAX_MASK_INDEX`] pieces get distinct colors; run
/// [`check_mask_capacity`] on the piece count before rendering.
pub fn render_mask<F: Face>(
    layout: &TextLayout,
    pieces: &[Piece],
    fonts: &[F],
    stroke_width: u32,
) -> RgbImage {
    let mut mask = RgbImage::new(layout.width, layout.height);

    for position in layout.positions() {
        let piece = &pieces[position.index];
        let index_color = encode_mask_index(position.index as u32 + 1);
        let style = TextStyle {
            fill: index_color,
            stroke: index_color,
            stroke_width,
            antialias: false,
        };
        draw_text(
            &mut mask,
            [position.x as i64, position.y as i64],
            &piece.text,
            &fonts[piece.font],
            &style,
        );
    }

    mask
}

/// Paints the image and the mask from one layout.
pub fn render_dual<F: Face>(
    layout: &TextLayout,
    pieces: &[Piece],
    fonts: &[F],
    colors: &[PieceColors],
    stroke_width: u32,
) -> (RgbaImage, RgbImage) {
    log::debug!(
        "rendering {} pieces on a {}x{} canvas",
        pieces.len(),
        layout.width,
        layout.height
    );
    let image = render_image(layout, pieces, fonts, colors, stroke_width);
    let mask = render_mask(layout, pieces, fonts, stroke_width);
    (image, mask)
}
