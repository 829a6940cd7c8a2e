//! Titled content sections.

use serde::{Deserialize, Serialize};

/// A contiguous span of document content under one heading-like block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section title
    pub title: String,
    /// Accumulated body text, space-joined and trimmed
    pub content: String,
    /// Page on which the section starts (1-indexed)
    #[serde(rename = "page_number")]
    pub start_page: u32,
}

impl Section {
    /// Create a new section.
    pub fn new(title: impl Into<String>, content: impl Into<String>, start_page: u32) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            start_page,
        }
    }
}

/// A section tagged with its source document and relevance score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSection {
    /// Source document identifier
    pub document: String,
    /// The section
    pub section: Section,
    /// Cosine similarity to the query, in [-1, 1]
    pub score: f32,
}

/// A section that made the ranked cut.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSection {
    /// Source document identifier
    pub document: String,
    /// The section
    pub section: Section,
    /// Relevance score
    pub score: f32,
    /// Importance rank (1 = most relevant)
    pub rank: usize,
}
