use image::{RgbImage, RgbaImage};
use rand::Rng;

use crate::{
    error::GenerateError,
    font::{Face, SizedFont},
    font_storage::FontStorage,
    renderer::{
        PieceColors,
        color::{parse_gradient, sample_between, sample_text_color},
        check_mask_capacity, crop_to_visible, render_dual,
    },
    text::{
        AdvanceOverride, LayoutConfig, Piece, TextLayout, ZeroAdvanceMarks,
        layout::{layout_horizontal, measure_vertical, resolve_vertical},
    },
};

const MATRIX_BEGIN: &str = r"\begin{matrix}";
const MATRIX_END: &str = r"\end{matrix}";
const LINE_BREAK: &str = r"\\";

/// Direction text is laid out in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Left to right, optionally over several lines.
    #[default]
    Horizontal,
    /// Top to bottom, one character per row, single font.
    Vertical,
}

impl TryFrom<u8> for Orientation {
    type Error = GenerateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Horizontal),
            1 => Ok(Self::Vertical),
            other => Err(GenerateError::UnsupportedOrientation(other)),
        }
    }
}

/// Parameters of one generated sample.
///
/// All fields are honored during a single `generate` call; nothing is carried
/// over between calls.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
    /// Pixel size used when building a pool from a [`FontStorage`].
    pub font_size: f32,
    /// Text color or comma-separated gradient; used by the vertical path.
    pub text_color: String,
    pub orientation: Orientation,
    /// Multiplier applied to the fonts' own space advance (or height, vertically).
    pub space_width: f32,
    pub character_spacing: u32,
    /// Crop image and mask to the visible ink.
    pub fit: bool,
    /// Lay out whole words instead of single characters.
    pub word_split: bool,
    pub stroke_width: u32,
    /// Outline color or gradient; used by the vertical path.
    pub stroke_fill: String,
    pub multi_line: bool,
    pub line_max: usize,
}

impl GeneratorConfig {
    /// The subset of settings the horizontal layout stage reads.
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            space_width: self.space_width,
            character_spacing: self.character_spacing,
            word_split: self.word_split,
            multi_line: self.multi_line,
            line_max: self.line_max,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            font_size: 32.0,
            text_color: "#282828".to_string(),
            orientation: Orientation::Horizontal,
            space_width: 1.0,
            character_spacing: 0,
            fit: false,
            word_split: false,
            stroke_width: 0,
            stroke_fill: "#282828".to_string(),
            multi_line: false,
            line_max: 32,
        }
    }
}

/// A rendered sample.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedText {
    /// Transparent RGBA image with the visible text.
    pub image: RgbaImage,
    /// Same-sized mask; piece `i` is painted with the encoding of `i + 1`.
    pub mask: RgbImage,
    pub line_count: usize,
    /// Line-annotated text for horizontal, non-fit samples.
    pub transcript: Option<String>,
    /// Pieces in mask-index order.
    pub pieces: Vec<Piece>,
}

/// Produces image/mask pairs from text and a font pool.
///
/// The generator itself holds only configuration; all randomness comes from
/// the `rng` handed to each call, so a seeded generator reproduces samples.
pub struct TextGenerator {
    config: GeneratorConfig,
    advance_override: Box<dyn AdvanceOverride + Send + Sync>,
}

impl TextGenerator {
    /// Creates a generator forcing Thai combining marks to zero advance.
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            advance_override: Box::new(ZeroAdvanceMarks::thai()),
        }
    }

    /// Replaces the predicate deciding forced advance widths.
    pub fn with_advance_override(
        mut self,
        advance_override: impl AdvanceOverride + Send + Sync + 'static,
    ) -> Self {
        self.advance_override = Box::new(advance_override);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Builds a pool of `ids` at the configured font size and generates from it.
    pub fn generate_from_storage<R: Rng + ?Sized>(
        &self,
        text: &str,
        storage: &mut FontStorage,
        ids: &[fontdb::ID],
        rng: &mut R,
    ) -> Result<GeneratedText, GenerateError> {
        let fonts: Vec<SizedFont> = storage.sized_pool(ids, self.config.font_size)?;
        self.generate(text, &fonts, rng)
    }

    /// Renders `text` with fonts drawn from `fonts`.
    pub fn generate<F: Face, R: Rng + ?Sized>(
        &self,
        text: &str,
        fonts: &[F],
        rng: &mut R,
    ) -> Result<GeneratedText, GenerateError> {
        if text.is_empty() {
            return Err(GenerateError::EmptyText);
        }
        if fonts.is_empty() {
            return Err(GenerateError::EmptyFontPool);
        }

        match self.config.orientation {
            Orientation::Horizontal => self.generate_horizontal(text, fonts, rng),
            Orientation::Vertical => self.generate_vertical(text, fonts, rng),
        }
    }

    fn generate_horizontal<F: Face, R: Rng + ?Sized>(
        &self,
        text: &str,
        fonts: &[F],
        rng: &mut R,
    ) -> Result<GeneratedText, GenerateError> {
        let config = &self.config;

        let (pieces, layout) = layout_horizontal(
            rng,
            text,
            fonts,
            &config.layout_config(),
            &*self.advance_override,
        );
        log::debug!(
            "laid out {} pieces on {} line(s), canvas {}x{}",
            pieces.len(),
            layout.line_count(),
            layout.width,
            layout.height
        );
        check_mask_capacity(pieces.len())?;

        let colors: Vec<PieceColors> = pieces
            .iter()
            .map(|_| PieceColors {
                fill: sample_text_color(rng),
                stroke: sample_text_color(rng),
            })
            .collect();

        let (image, mask) = render_dual(&layout, &pieces, fonts, &colors, config.stroke_width);
        let line_count = layout.line_count();

        if config.fit {
            let (image, mask) = crop_to_visible(image, mask);
            return Ok(GeneratedText {
                image,
                mask,
                line_count,
                transcript: None,
                pieces,
            });
        }

        Ok(GeneratedText {
            image,
            mask,
            line_count,
            transcript: Some(annotate_transcript(text, &pieces, &layout)),
            pieces,
        })
    }

    fn generate_vertical<F: Face, R: Rng + ?Sized>(
        &self,
        text: &str,
        fonts: &[F],
        rng: &mut R,
    ) -> Result<GeneratedText, GenerateError> {
        let config = &self.config;

        let (fill_from, fill_to) = parse_gradient(&config.text_color)?;
        let (stroke_from, stroke_to) = parse_gradient(&config.stroke_fill)?;

        let font = rng.gen_range(0..fonts.len());
        let pieces = measure_vertical(text, font, &fonts[font], config.space_width);
        let layout = resolve_vertical(&pieces, config.character_spacing);
        log::debug!(
            "laid out {} characters vertically, canvas {}x{}",
            pieces.len(),
            layout.width,
            layout.height
        );
        check_mask_capacity(pieces.len())?;

        let piece_colors = PieceColors {
            fill: sample_between(rng, fill_from, fill_to),
            stroke: sample_between(rng, stroke_from, stroke_to),
        };
        let colors = vec![piece_colors; pieces.len()];

        let (image, mask) = render_dual(&layout, &pieces, fonts, &colors, config.stroke_width);
        let (image, mask) = if config.fit {
            crop_to_visible(image, mask)
        } else {
            (image, mask)
        };

        Ok(GeneratedText {
            image,
            mask,
            line_count: 1,
            transcript: None,
            pieces,
        })
    }
}

/// Convenience wrapper running a [`TextGenerator`] built from `config`.
pub fn generate<F: Face, R: Rng + ?Sized>(
    text: &str,
    fonts: &[F],
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<GeneratedText, GenerateError> {
    TextGenerator::new(config.clone()).generate(text, fonts, rng)
}

/// Rebuilds the text with explicit line breaks.
///
/// Single-line layouts return `text` unchanged. Otherwise the pieces are
/// joined with spaces, a `\\` token opens every line after the first, and
/// the result is wrapped in a `matrix` environment.
pub fn annotate_transcript(text: &str, pieces: &[Piece], layout: &TextLayout) -> String {
    if layout.line_count() <= 1 {
        return text.to_string();
    }

    let mut tokens: Vec<&str> = Vec::with_capacity(pieces.len() + layout.line_count());
    for (line_idx, line) in layout.lines.iter().enumerate() {
        if line_idx > 0 {
            tokens.push(LINE_BREAK);
        }
        tokens.extend(line.pieces.iter().map(|p| pieces[p.index].text.as_str()));
    }

    // A space piece joined by spaces would leave a triple space.
    let body = tokens.join(" ").replace("   ", " ");
    format!("{MATRIX_BEGIN} {body} {MATRIX_END}")
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::test_face::BlockFace;
    use crate::renderer::{decode_mask_color, piece_bounding_boxes};
    use crate::text::layout::resolve_horizontal;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::BTreeSet;

    fn mask_indices(mask: &RgbImage) -> BTreeSet<u32> {
        mask.pixels()
            .map(|p| decode_mask_color(*p))
            .filter(|&i| i != 0)
            .collect()
    }

    #[test]
    fn test_orientation_from_selector() {
        assert_eq!(Orientation::try_from(0).unwrap(), Orientation::Horizontal);
        assert_eq!(Orientation::try_from(1).unwrap(), Orientation::Vertical);
        assert_eq!(
            Orientation::try_from(2).unwrap_err(),
            GenerateError::UnsupportedOrientation(2)
        );
    }

    #[test]
    fn test_preconditions() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = GeneratorConfig::default();
        let fonts = [BlockFace::new(5, 10)];
        assert_eq!(
            generate("", &fonts, &config, &mut rng).unwrap_err(),
            GenerateError::EmptyText
        );
        let none: [BlockFace; 0] = [];
        assert_eq!(
            generate("a", &none, &config, &mut rng).unwrap_err(),
            GenerateError::EmptyFontPool
        );
    }

    #[test]
    fn test_two_characters_single_line() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = GeneratorConfig {
            character_spacing: 3,
            ..Default::default()
        };
        let fonts = [BlockFace::new(7, 12)];
        let sample = generate("AB", &fonts, &config, &mut rng).unwrap();

        assert_eq!(sample.image.dimensions(), (7 + 7 + 3, 12));
        assert_eq!(sample.mask.dimensions(), sample.image.dimensions());
        assert_eq!(sample.line_count, 1);
        assert_eq!(sample.transcript.as_deref(), Some("AB"));
        assert_eq!(mask_indices(&sample.mask), BTreeSet::from([1, 2]));

        let boxes = piece_bounding_boxes(&sample.mask);
        assert_eq!(boxes[&1].x, 1);
        assert_eq!(boxes[&2].x, 7 + 3 + 1);
    }

    #[test]
    fn test_word_split_pieces() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = GeneratorConfig {
            word_split: true,
            character_spacing: 9,
            ..Default::default()
        };
        let fonts = [BlockFace::new(5, 10)];
        let sample = generate("a b", &fonts, &config, &mut rng).unwrap();

        let texts: Vec<_> = sample.pieces.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["a", " ", "b"]);
        assert_eq!(texts.concat(), "a b");
        // natural space width only, no character spacing
        assert_eq!(sample.image.width(), 15);
        // the space paints nothing, so only pieces 1 and 3 appear
        assert_eq!(mask_indices(&sample.mask), BTreeSet::from([1, 3]));
    }

    #[test]
    fn test_multi_line_invariants() {
        let fonts = [BlockFace::new(4, 8), BlockFace::new(6, 9)];
        let config = GeneratorConfig {
            multi_line: true,
            line_max: 8,
            character_spacing: 1,
            ..Default::default()
        };
        let text = "abcdefghijklmnopqrstuvwxyz";

        let mut line_counts = BTreeSet::new();
        for seed in 0..40 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sample = generate(text, &fonts, &config, &mut rng).unwrap();

            assert!((1..=4).contains(&sample.line_count));
            // 26 characters at 8 per line need at least four lines
            assert_eq!(sample.line_count, 4);
            assert_eq!(sample.image.dimensions(), sample.mask.dimensions());
            assert_eq!(
                mask_indices(&sample.mask),
                (1..=26).collect::<BTreeSet<u32>>()
            );
            line_counts.insert(sample.line_count);
        }
        assert_eq!(line_counts.len(), 1);
    }

    #[test]
    fn test_word_split_long_sentence_wraps() {
        let fonts = [BlockFace::new(4, 8)];
        let config = GeneratorConfig {
            word_split: true,
            multi_line: true,
            line_max: 32,
            ..Default::default()
        };
        let text = vec!["abcdefhik"; 20].join(" ");

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sample = generate(&text, &fonts, &config, &mut rng).unwrap();

            assert_eq!(sample.pieces.len(), 39);
            assert_eq!(sample.line_count, 4);
            assert_eq!(sample.image.height(), 8 * 4);
            let transcript = sample.transcript.unwrap();
            assert_eq!(transcript.matches(r"\\").count(), 3);
            // only the words paint, spaces sit at even piece numbers
            assert_eq!(
                mask_indices(&sample.mask),
                (1..=39).step_by(2).collect::<BTreeSet<u32>>()
            );
        }
    }

    #[test]
    fn test_multi_line_transcript() {
        let fonts = [BlockFace::new(4, 8)];
        let config = GeneratorConfig {
            multi_line: true,
            ..Default::default()
        };

        let mut saw_multi_line = false;
        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sample = generate("abcdefgh", &fonts, &config, &mut rng).unwrap();
            let transcript = sample.transcript.unwrap();
            match sample.line_count {
                1 => assert_eq!(transcript, "abcdefgh"),
                2 => {
                    saw_multi_line = true;
                    assert_eq!(
                        transcript,
                        r"\begin{matrix} a b c d \\ e f g h \end{matrix}"
                    );
                    assert_eq!(sample.image.height(), 16);
                }
                n => {
                    saw_multi_line = true;
                    assert_eq!(transcript.matches(r"\\").count(), n - 1);
                    assert_eq!(sample.image.height(), 8 * n as u32);
                }
            }
        }
        assert!(saw_multi_line);
    }

    #[test]
    fn test_transcript_collapses_space_pieces() {
        let pieces: Vec<Piece> = ["a", " ", "b", "c"]
            .iter()
            .map(|t| Piece {
                text: t.to_string(),
                font: 0,
                width: 1,
                height: 1,
            })
            .collect();
        let layout = resolve_horizontal(&pieces, &[2, 2], 0, false);
        assert_eq!(
            annotate_transcript("a bc", &pieces, &layout),
            r"\begin{matrix} a \\ b c \end{matrix}"
        );
    }

    #[test]
    fn test_fit_crops_both_canvases() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = GeneratorConfig {
            fit: true,
            ..Default::default()
        };
        let fonts = [BlockFace::new(6, 10)];
        let sample = generate("ab", &fonts, &config, &mut rng).unwrap();

        // blocks are inset by one pixel on every side
        assert_eq!(sample.image.dimensions(), (10, 8));
        assert_eq!(sample.mask.dimensions(), (10, 8));
        assert_eq!(sample.transcript, None);
        assert_eq!(mask_indices(&sample.mask), BTreeSet::from([1, 2]));
    }

    #[test]
    fn test_thai_marks_take_no_width() {
        let mut rng = StdRng::seed_from_u64(4);
        let fonts = [BlockFace::new(6, 10)];
        let config = GeneratorConfig::default();
        let sample = generate("ก\u{0E48}ข", &fonts, &config, &mut rng).unwrap();
        assert_eq!(sample.pieces[1].width, 0);
        assert_eq!(sample.image.width(), 12);

        let plain = TextGenerator::new(GeneratorConfig::default())
            .with_advance_override(ZeroAdvanceMarks::empty());
        let sample = plain.generate("ก\u{0E48}ข", &fonts, &mut rng).unwrap();
        assert_eq!(sample.image.width(), 18);
    }

    #[test]
    fn test_same_seed_same_sample() {
        let fonts = [BlockFace::new(4, 8), BlockFace::new(7, 11), BlockFace::new(5, 9)];
        let config = GeneratorConfig {
            multi_line: true,
            stroke_width: 1,
            ..Default::default()
        };
        let a = generate("reproducible", &fonts, &config, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = generate("reproducible", &fonts, &config, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_vertical_column() {
        let mut rng = StdRng::seed_from_u64(5);
        let config = GeneratorConfig {
            orientation: Orientation::Vertical,
            character_spacing: 2,
            text_color: "#000000,#ffffff".to_string(),
            ..Default::default()
        };
        let fonts = [BlockFace::new(6, 10)];
        let sample = generate("abc", &fonts, &config, &mut rng).unwrap();

        assert_eq!(sample.image.dimensions(), (6, 3 * 10 + 3 * 2));
        assert_eq!(sample.mask.dimensions(), sample.image.dimensions());
        assert_eq!(sample.line_count, 1);
        assert_eq!(sample.transcript, None);

        let boxes = piece_bounding_boxes(&sample.mask);
        assert_eq!(boxes[&1].y, 1);
        assert_eq!(boxes[&2].y, 12 + 1);
        assert_eq!(boxes[&3].y, 24 + 1);

        // one color for the whole column
        let colors: BTreeSet<_> = sample
            .image
            .pixels()
            .filter(|p| p[3] == 255)
            .map(|p| [p[0], p[1], p[2]])
            .collect();
        assert_eq!(colors.len(), 1);
    }

    #[test]
    fn test_vertical_rejects_bad_color() {
        let mut rng = StdRng::seed_from_u64(6);
        let config = GeneratorConfig {
            orientation: Orientation::Vertical,
            text_color: "blue-ish".to_string(),
            ..Default::default()
        };
        let fonts = [BlockFace::new(6, 10)];
        assert_eq!(
            generate("abc", &fonts, &config, &mut rng).unwrap_err(),
            GenerateError::InvalidColor("blue-ish".to_string())
        );
    }
}
