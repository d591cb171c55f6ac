use image::Rgb;
use palette::{FromColor, Hsl, Srgb};
use rand::Rng;

use crate::error::GenerateError;

/// Base of the per-channel digits used by the mask encoding.
const MASK_BASE: u32 = 255;

/// Largest piece index the three mask channels can represent.
pub const MAX_MASK_INDEX: u32 = MASK_BASE * MASK_BASE * MASK_BASE - 1;

/// Fails when `piece_count` pieces cannot each get a distinct mask color.
pub fn check_mask_capacity(piece_count: usize) -> Result<(), GenerateError> {
    if piece_count > MAX_MASK_INDEX as usize {
        return Err(GenerateError::TooManyPieces(piece_count));
    }
    Ok(())
}

/// Encodes a 1-based piece index as three big-endian base-255 digits.
///
/// Index `0` is the background, so the first piece is painted with `1`.
/// Indices above [`MAX_MASK_INDEX`] would alias other pieces; callers check
/// with [`check_mask_capacity`] first.
pub fn encode_mask_index(index: u32) -> Rgb<u8> {
    debug_assert!(index <= MAX_MASK_INDEX, "mask index {index} out of range");
    Rgb([
        (index / (MASK_BASE * MASK_BASE)) as u8,
        ((index / MASK_BASE) % MASK_BASE) as u8,
        (index % MASK_BASE) as u8,
    ])
}

/// Inverse of [`encode_mask_index`]; background decodes to `0`.
pub fn decode_mask_color(color: Rgb<u8>) -> u32 {
    let [a, b, c] = color.0;
    a as u32 * MASK_BASE * MASK_BASE + b as u32 * MASK_BASE + c as u32
}

/// Samples a text color from HLS space with lightness capped at `0.7`,
/// which keeps glyphs away from near-white.
pub fn sample_text_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb<u8> {
    let hue: f32 = rng.gen_range(0.0..=1.0);
    let lightness: f32 = rng.gen_range(0.0..=0.7);
    let saturation: f32 = rng.gen_range(0.0..=1.0);

    let hsl: Hsl = Hsl::new(hue * 360.0, saturation, lightness);
    let rgb: Srgb = Srgb::from_color(hsl);
    Rgb([
        channel_to_u8(rgb.red),
        channel_to_u8(rgb.green),
        channel_to_u8(rgb.blue),
    ])
}

fn channel_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

/// Parses a single `#rgb` or `#rrggbb` color.
pub fn parse_color(spec: &str) -> Result<Rgb<u8>, GenerateError> {
    let rgb: Srgb<u8> = spec
        .trim()
        .parse()
        .map_err(|_| GenerateError::InvalidColor(spec.to_string()))?;
    Ok(Rgb([rgb.red, rgb.green, rgb.blue]))
}

/// Parses a comma-separated gradient spec into its two endpoint colors.
///
/// Only the first and last entries matter; a single color yields the same
/// endpoint twice.
pub fn parse_gradient(spec: &str) -> Result<(Rgb<u8>, Rgb<u8>), GenerateError> {
    let colors = spec
        .split(',')
        .map(parse_color)
        .collect::<Result<Vec<_>, _>>()?;

    match (colors.first(), colors.last()) {
        (Some(&first), Some(&last)) => Ok((first, last)),
        _ => Err(GenerateError::InvalidColor(spec.to_string())),
    }
}

/// Draws every channel uniformly between the two endpoints, inclusive.
pub fn sample_between<R: Rng + ?Sized>(rng: &mut R, from: Rgb<u8>, to: Rgb<u8>) -> Rgb<u8> {
    let mut out = [0u8; 3];
    for (channel, slot) in out.iter_mut().enumerate() {
        let (a, b) = (from[channel], to[channel]);
        *slot = rng.gen_range(a.min(b)..=a.max(b));
    }
    Rgb(out)
}
