use std::collections::HashSet;

/// Decides, per code point, whether a single-character piece gets a forced
/// advance width instead of the one its font reports.
///
/// Combining marks that stack on the preceding base character report a
/// non-zero advance in many fonts; forcing them to zero keeps them from
/// pushing the next character to the right.
pub trait AdvanceOverride {
    fn advance_override(&self, ch: char) -> Option<u32>;
}

impl<F> AdvanceOverride for F
where
    F: Fn(char) -> Option<u32>,
{
    fn advance_override(&self, ch: char) -> Option<u32> {
        self(ch)
    }
}

/// Thai vowel and tone marks drawn above or below the base consonant.
const THAI_COMBINING_MARKS: &[char] = &[
    // upper vowels
    '\u{0E31}', '\u{0E34}', '\u{0E35}', '\u{0E36}', '\u{0E37}',
    // lower vowels
    '\u{0E38}', '\u{0E39}', '\u{0E3A}',
    // tone marks and other upper signs
    '\u{0E47}', '\u{0E48}', '\u{0E49}', '\u{0E4A}', '\u{0E4B}', '\u{0E4C}', '\u{0E4D}',
    '\u{0E4E}',
];

/// Set of characters whose advance is forced to zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZeroAdvanceMarks {
    chars: HashSet<char, fxhash::FxBuildHasher>,
}

impl Default for ZeroAdvanceMarks {
    fn default() -> Self {
        Self::thai()
    }
}

impl ZeroAdvanceMarks {
    /// A set that overrides nothing.
    pub fn empty() -> Self {
        Self {
            chars: HashSet::default(),
        }
    }

    /// The Thai combining vowel and tone marks.
    pub fn thai() -> Self {
        let mut marks = Self::empty();
        marks.extend(THAI_COMBINING_MARKS.iter().copied());
        marks
    }

    /// Adds one character to the set.
    pub fn insert(&mut self, ch: char) {
        self.chars.insert(ch);
    }

    /// Adds every character of `chars` to the set.
    pub fn extend(&mut self, chars: impl IntoIterator<Item = char>) {
        self.chars.extend(chars);
    }

    /// Whether `ch` gets a zero advance.
    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }
}

impl AdvanceOverride for ZeroAdvanceMarks {
    fn advance_override(&self, ch: char) -> Option<u32> {
        self.contains(ch).then_some(0)
    }
}
