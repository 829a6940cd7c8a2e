//! Line assembly from positioned words.

use std::collections::BTreeMap;

use regex::Regex;

use crate::model::{DocumentContent, Line, PageContent, PositionedWord};

/// Recognizes pagination artifacts and separator rules that must never
/// become lines, headings or section text.
#[derive(Debug, Clone)]
pub struct GarbageFilter {
    separator_run: Regex,
    page_footer: Regex,
    bare_number: Regex,
}

impl GarbageFilter {
    /// Create the filter.
    pub fn new() -> Self {
        Self {
            separator_run: Regex::new(r"^[.\-\u{2013}=_* ]{5,}$").unwrap(),
            page_footer: Regex::new(r"(?i)^page\s+\d+(\s+of\s+\d+)?$").unwrap(),
            bare_number: Regex::new(r"^\d+$").unwrap(),
        }
    }

    /// Check if `text` is garbage.
    pub fn is_garbage(&self, text: &str) -> bool {
        let trimmed = text.trim();
        trimmed.chars().count() < 2
            || self.separator_run.is_match(trimmed)
            || self.page_footer.is_match(trimmed)
            || self.bare_number.is_match(trimmed)
    }
}

impl Default for GarbageFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Groups words into lines by rounded vertical position.
#[derive(Debug, Clone, Default)]
pub struct LineAssembler {
    garbage: GarbageFilter,
}

impl LineAssembler {
    /// Create a new assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble the lines of a whole document, page by page.
    pub fn assemble(&self, doc: &DocumentContent) -> Vec<Line> {
        doc.pages
            .iter()
            .flat_map(|page| self.assemble_page(page))
            .collect()
    }

    /// Assemble the lines of one page, top to bottom.
    pub fn assemble_page(&self, page: &PageContent) -> Vec<Line> {
        self.assemble_words(page.number, &page.words)
    }

    /// Assemble words of one page into lines.
    ///
    /// Words whose `top` rounds to the same integer share a line. Empty and
    /// garbage lines are dropped.
    pub fn assemble_words(&self, page: u32, words: &[PositionedWord]) -> Vec<Line> {
        let mut bands: BTreeMap<i64, Vec<PositionedWord>> = BTreeMap::new();
        for word in words {
            bands
                .entry(word.top.round() as i64)
                .or_default()
                .push(word.clone());
        }

        let lines: Vec<Line> = bands
            .into_iter()
            .filter_map(|(top, band)| Line::from_words(page, top, band))
            .filter(|line| !line.text.is_empty() && !self.garbage.is_garbage(&line.text))
            .collect();

        log::debug!(
            "Page {}: {} words -> {} lines",
            page,
            words.len(),
            lines.len()
        );
        lines
    }
}
