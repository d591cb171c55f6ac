/// Pieces and word-split tokenization.
pub mod data;
/// Metrics pass, line partitioning and geometry resolution.
pub mod layout;
/// Characters whose advance is forced regardless of the font.
pub mod marks;

pub use data::{Piece, split_pieces};
pub use layout::{LayoutConfig, PiecePosition, TextLayout, TextLayoutLine};
pub use marks::{AdvanceOverride, ZeroAdvanceMarks};
