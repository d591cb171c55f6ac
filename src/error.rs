/// Errors produced while generating a text sample.
///
/// Failures from font loading surface here unchanged in meaning; nothing is
/// retried and no partially rendered canvas is ever returned.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    /// Orientation selector other than `0` (horizontal) or `1` (vertical).
    #[error("unknown orientation {0}")]
    UnsupportedOrientation(u8),

    #[error("text to render is empty")]
    EmptyText,

    #[error("font pool is empty")]
    EmptyFontPool,

    #[error("font size must be positive, got {0}")]
    InvalidFontSize(f32),

    /// A color spec that is not `#rgb` / `#rrggbb` (optionally comma separated).
    #[error("invalid color spec: {0:?}")]
    InvalidColor(String),

    #[error("failed to load font: {0}")]
    FontLoad(String),

    /// More pieces than the three mask channels can index.
    #[error("{0} pieces do not fit in the mask's index range")]
    TooManyPieces(usize),

    /// The requested face id is not registered in the font database.
    #[error("no face registered under the requested id")]
    UnknownFace,
}
