//! Document outline types.

use serde::{Deserialize, Serialize};

/// Heading hierarchy level (H1 is the top level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    /// Top-level heading.
    pub const H1: HeadingLevel = HeadingLevel(1);
    /// Second-level heading.
    pub const H2: HeadingLevel = HeadingLevel(2);
    /// Third-level heading.
    pub const H3: HeadingLevel = HeadingLevel(3);

    /// Create a level from its depth (1 = H1). Depth 0 is clamped to 1.
    pub fn new(depth: u8) -> Self {
        Self(depth.max(1))
    }

    /// Level for a zero-based rank (rank 0 = H1), saturating at `u8::MAX`.
    pub fn from_rank(rank: usize) -> Self {
        Self::new(u8::try_from(rank + 1).unwrap_or(u8::MAX))
    }

    /// Depth of the level (1 for H1).
    pub fn depth(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "H{}", self.0)
    }
}

impl From<HeadingLevel> for String {
    fn from(level: HeadingLevel) -> Self {
        level.to_string()
    }
}

impl TryFrom<String> for HeadingLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .strip_prefix('H')
            .or_else(|| value.strip_prefix('h'))
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| *n > 0)
            .map(HeadingLevel)
            .ok_or_else(|| format!("invalid heading level: {}", value))
    }
}

/// One heading of the outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Heading text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Vertical band of the heading line; ordering key only
    #[serde(skip)]
    pub top: i64,
}

impl OutlineEntry {
    /// Create a new entry.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32, top: i64) -> Self {
        Self {
            level,
            text: text.into(),
            page,
            top,
        }
    }
}

/// Title and ordered headings of one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentOutline {
    /// Document title, empty when none was detected
    pub title: String,
    /// Headings ordered by (page, vertical position)
    pub outline: Vec<OutlineEntry>,
}

impl DocumentOutline {
    /// An outline with no title and no headings.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if nothing was detected.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.outline.is_empty()
    }

    /// Number of headings at the given level.
    pub fn count_level(&self, level: HeadingLevel) -> usize {
        self.outline.iter().filter(|e| e.level == level).count()
    }
}
