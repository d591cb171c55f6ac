/// Atomic unit of layout: one character, or one word / space token when
/// word splitting is enabled.
///
/// A piece is measured with exactly one font from the pool, and that same
/// font is used to paint it on both the image and the mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub text: String,
    /// Index into the font pool.
    pub font: usize,
    pub width: u32,
    pub height: u32,
}

impl Piece {
    pub fn is_space(&self) -> bool {
        self.text == " "
    }
}

/// Splits `text` into the pieces laid out one by one.
///
/// Without word splitting every `char` is its own piece. With word splitting
/// the text is cut on `' '` and each space is re-inserted as its own piece,
/// so concatenating the pieces always gives back `text`. Consecutive spaces
/// produce empty word pieces between them.
pub fn split_pieces(text: &str, word_split: bool) -> Vec<String> {
    if !word_split {
        return text.chars().map(String::from).collect();
    }

    let mut pieces = Vec::new();
    for (i, word) in text.split(' ').enumerate() {
        if i > 0 {
            pieces.push(" ".to_string());
        }
        pieces.push(word.to_string());
    }
    pieces
}
