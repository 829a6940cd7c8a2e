//! Assembled text lines and their style keys.

use serde::{Deserialize, Serialize};

use super::PositionedWord;

/// A (font size, boldness) pair used to group and rank lines.
///
/// The size is kept in tenths of a point so the key can be hashed and
/// compared exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleKey {
    /// Font size in tenths of a point
    pub size_tenths: i32,
    /// Bold face
    pub bold: bool,
}

impl StyleKey {
    /// Build a key from a size in points, rounded to one decimal.
    pub fn new(size: f32, bold: bool) -> Self {
        Self {
            size_tenths: (size * 10.0).round() as i32,
            bold,
        }
    }

    /// Font size in points.
    pub fn size(&self) -> f32 {
        self.size_tenths as f32 / 10.0
    }

    /// Whether this style stands out from `body`: strictly larger, or bold
    /// where the body is not.
    pub fn dominates(&self, body: &StyleKey) -> bool {
        self.size_tenths > body.size_tenths || (self.bold && !body.bold)
    }
}

impl std::fmt::Display for StyleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.1}pt{}",
            self.size(),
            if self.bold { " bold" } else { "" }
        )
    }
}

/// A line of text assembled from words sharing a vertical band.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Words ordered left to right
    pub words: Vec<PositionedWord>,
    /// Words joined by single spaces, trimmed
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Vertical band (rounded `top`)
    pub top: i64,
    /// Left edge of the first word
    pub x0: f32,
    /// Largest word size, rounded to one decimal
    pub size: f32,
    /// Whether any word is bold
    pub bold: bool,
}

impl Line {
    /// Build a line from the words of one band.
    ///
    /// Words are sorted by `x0`. Returns `None` for an empty band.
    pub fn from_words(page: u32, top: i64, mut words: Vec<PositionedWord>) -> Option<Self> {
        if words.is_empty() {
            return None;
        }
        words.sort_by(|a, b| a.x0.total_cmp(&b.x0));

        let text = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();
        let max_size = words.iter().map(|w| w.size).fold(f32::MIN, f32::max);
        let size = (max_size * 10.0).round() / 10.0;
        let bold = words.iter().any(PositionedWord::is_bold);
        let x0 = words[0].x0;

        Some(Self {
            words,
            text,
            page,
            top,
            x0,
            size,
            bold,
        })
    }

    /// The line's style key.
    pub fn style(&self) -> StyleKey {
        StyleKey::new(self.size, self.bold)
    }

    /// Whether all cased characters are uppercase (and there is at least one).
    pub fn is_all_caps(&self) -> bool {
        let mut cased = self.text.chars().filter(|c| c.is_alphabetic()).peekable();
        cased.peek().is_some() && cased.all(|c| !c.is_lowercase())
    }

    /// Whether the text ends with a colon.
    pub fn ends_with_colon(&self) -> bool {
        self.text.ends_with(':')
    }

    /// Text length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
