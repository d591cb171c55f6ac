use rand::Rng;

use crate::font::FontMetrics;
use crate::text::{AdvanceOverride, Piece, split_pieces};

/// Upper bound on the number of lines a multi-line sample is split into.
pub const MAX_LINES: usize = 4;

/// Configuration knobs used by the horizontal layout pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Multiplier applied to the font's own space advance.
    pub space_width: f32,
    /// Extra pixels between consecutive pieces; ignored in word-split mode.
    pub character_spacing: u32,
    pub word_split: bool,
    pub multi_line: bool,
    /// Characters per line above which more lines are forced.
    pub line_max: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            space_width: 1.0,
            character_spacing: 0,
            word_split: false,
            multi_line: false,
            line_max: 32,
        }
    }
}

/// Final layout output: where every piece is drawn and how big the canvas is.
///
/// Both the image and the mask are painted from this one value, so their
/// glyph placements cannot disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextLayout {
    pub width: u32,
    pub height: u32,
    pub lines: Vec<TextLayoutLine>,
}

/// A single row of positioned pieces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextLayoutLine {
    pub line_width: u32,
    pub line_height: u32,
    pub top: u32,
    pub pieces: Vec<PiecePosition>,
}

/// **Y-axis goes down.** `(x, y)` is the top-left draw origin of the piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PiecePosition {
    /// Index of the piece in the piece list.
    pub index: usize,
    pub x: u32,
    pub y: u32,
}

impl TextLayout {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// All positions in piece order.
    pub fn positions(&self) -> impl Iterator<Item = &PiecePosition> {
        self.lines.iter().flat_map(|line| line.pieces.iter())
    }
}

/// Picks a font for each of `piece_count` pieces, uniformly and with
/// replacement, so neighbouring pieces may or may not share a font.
pub fn assign_fonts<R: Rng + ?Sized>(
    rng: &mut R,
    piece_count: usize,
    pool_size: usize,
) -> Vec<usize> {
    debug_assert!(pool_size > 0, "font pool must not be empty");
    (0..piece_count).map(|_| rng.gen_range(0..pool_size)).collect()
}

/// Width used for every space piece of one sample.
///
/// This is the widest scaled space among the fonts actually assigned, so a
/// line mixing fonts keeps uniform word gaps.
pub fn space_advance<F: FontMetrics>(fonts: &[F], assigned: &[usize], space_width: f32) -> u32 {
    let mut used: Vec<usize> = assigned.to_vec();
    used.sort_unstable();
    used.dedup();

    used.into_iter()
        .map(|font| {
            let scaled = fonts[font].advance_width(" ") as f32 * space_width;
            scaled.round().max(0.0) as u32
        })
        .max()
        .unwrap_or(0)
}

/// Measures every piece with its assigned font.
///
/// Spaces take the shared [`space_advance`]; single-character pieces the
/// override accepts take the forced width; everything else takes the font's
/// advance. Heights always come from the font for the exact piece text.
pub fn measure_pieces<F: FontMetrics, O: AdvanceOverride + ?Sized>(
    texts: Vec<String>,
    assigned: &[usize],
    fonts: &[F],
    space_width: f32,
    overrides: &O,
) -> Vec<Piece> {
    let space = space_advance(fonts, assigned, space_width);

    texts
        .into_iter()
        .zip(assigned.iter().copied())
        .map(|(text, font)| {
            let face = &fonts[font];
            let width = if text == " " {
                space
            } else {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => overrides
                        .advance_override(ch)
                        .unwrap_or_else(|| face.advance_width(&text)),
                    _ => face.advance_width(&text),
                }
            };
            let height = face.line_height(&text);
            Piece {
                text,
                font,
                width,
                height,
            }
        })
        .collect()
}

/// Draws how many lines a multi-line sample uses.
///
/// `len` is the character count of the text. A count in `1..=4` is drawn
/// uniformly. When that would leave `line_max` or more characters per line,
/// the count is raised to `ceil(len / line_max)`, and the result never
/// exceeds [`MAX_LINES`].
pub fn draw_line_count<R: Rng + ?Sized>(rng: &mut R, len: usize, line_max: usize) -> usize {
    let line_max = line_max.max(1);
    let mut line_count = rng.gen_range(1..=MAX_LINES);

    if len as f64 / line_count as f64 >= line_max as f64 {
        line_count = len.div_ceil(line_max);
    }

    if line_count > MAX_LINES {
        log::warn!(
            "{} characters need {} lines at line_max {}, clamping to {}",
            len,
            line_count,
            line_max,
            MAX_LINES
        );
        line_count = MAX_LINES;
    }

    line_count.max(1)
}

/// Number of pieces on each line.
///
/// Text shorter than the requested line count stays on one line; otherwise
/// see [`split_evenly`].
pub fn partition_lines(len: usize, line_count: usize) -> Vec<usize> {
    if line_count > 1 && len >= line_count {
        split_evenly(len, line_count)
    } else {
        vec![len]
    }
}

/// Splits `num` into `n` parts differing by at most one, larger parts first.
pub fn split_evenly(num: usize, n: usize) -> Vec<usize> {
    let quotient = num / n;
    let remainder = num % n;
    (0..n).map(|i| quotient + usize::from(i < remainder)).collect()
}

/// Resolves draw origins and canvas size for left-to-right text.
///
/// `line_sizes` gives the number of consecutive pieces on each line and must
/// sum to `pieces.len()`. Inside a line the origin advances by each piece's
/// width plus `character_spacing`, except in word-split mode where the space
/// pieces already carry the gaps. Lines stack top to bottom, each as tall as
/// its tallest piece.
pub fn resolve_horizontal(
    pieces: &[Piece],
    line_sizes: &[usize],
    character_spacing: u32,
    word_split: bool,
) -> TextLayout {
    debug_assert_eq!(line_sizes.iter().sum::<usize>(), pieces.len());

    let spacing = if word_split { 0 } else { character_spacing };

    let mut lines = Vec::with_capacity(line_sizes.len());
    let mut start = 0usize;
    let mut cursor_y = 0u32;
    let mut max_line_width = 0u32;

    for &size in line_sizes {
        let line_pieces = &pieces[start..start + size];

        let mut cursor_x = 0u32;
        let mut positions = Vec::with_capacity(size);
        for (offset, piece) in line_pieces.iter().enumerate() {
            if offset > 0 {
                cursor_x += spacing;
            }
            positions.push(PiecePosition {
                index: start + offset,
                x: cursor_x,
                y: cursor_y,
            });
            cursor_x += piece.width;
        }

        let line_height = line_pieces.iter().map(|p| p.height).max().unwrap_or(0);
        max_line_width = max_line_width.max(cursor_x);

        lines.push(TextLayoutLine {
            line_width: cursor_x,
            line_height,
            top: cursor_y,
            pieces: positions,
        });

        cursor_y += line_height;
        start += size;
    }

    TextLayout {
        width: max_line_width,
        height: cursor_y,
        lines,
    }
}

/// Runs the full left-to-right pipeline: font assignment, metrics, line
/// partitioning and geometry.
///
/// Returns the measured pieces alongside the layout that places them.
pub fn layout_horizontal<F, O, R>(
    rng: &mut R,
    text: &str,
    fonts: &[F],
    config: &LayoutConfig,
    overrides: &O,
) -> (Vec<Piece>, TextLayout)
where
    F: FontMetrics,
    O: AdvanceOverride + ?Sized,
    R: Rng + ?Sized,
{
    let texts = split_pieces(text, config.word_split);
    let assigned = assign_fonts(rng, texts.len(), fonts.len());
    let pieces = measure_pieces(texts, &assigned, fonts, config.space_width, overrides);

    let line_sizes = if config.multi_line {
        // line_max bounds characters per line, even when pieces are words
        let line_count = draw_line_count(rng, text.chars().count(), config.line_max);
        partition_lines(pieces.len(), line_count)
    } else {
        vec![pieces.len()]
    };

    let layout = resolve_horizontal(
        &pieces,
        &line_sizes,
        config.character_spacing,
        config.word_split,
    );
    (pieces, layout)
}

/// Measures the characters of a top-to-bottom sample, all with `font`.
///
/// Spaces are `space_width` times the height of a space.
pub fn measure_vertical<F: FontMetrics>(
    text: &str,
    font: usize,
    face: &F,
    space_width: f32,
) -> Vec<Piece> {
    let space_height = (face.line_height(" ") as f32 * space_width).max(0.0) as u32;

    text.chars()
        .map(|ch| {
            let text = ch.to_string();
            let height = if ch == ' ' {
                space_height
            } else {
                face.line_height(&text)
            };
            Piece {
                width: face.advance_width(&text),
                height,
                text,
                font,
            }
        })
        .collect()
}

/// Resolves a single column: one character per row, each followed by
/// `character_spacing` pixels.
pub fn resolve_vertical(pieces: &[Piece], character_spacing: u32) -> TextLayout {
    let mut cursor_y = 0u32;
    let mut positions = Vec::with_capacity(pieces.len());

    for (index, piece) in pieces.iter().enumerate() {
        positions.push(PiecePosition {
            index,
            x: 0,
            y: cursor_y,
        });
        cursor_y += piece.height + character_spacing;
    }

    let width = pieces.iter().map(|p| p.width).max().unwrap_or(0);

    TextLayout {
        width,
        height: cursor_y,
        lines: vec![TextLayoutLine {
            line_width: width,
            line_height: cursor_y,
            top: 0,
            pieces: positions,
        }],
    }
}
