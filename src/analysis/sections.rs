//! Block-level section segmentation.

use super::lines::GarbageFilter;
use super::options::SegmentOptions;
use super::style::most_common;
use crate::model::{DocumentContent, Section, TextBlock};

/// Splits a document's text blocks into titled sections.
#[derive(Debug, Clone, Default)]
pub struct SectionSegmenter {
    options: SegmentOptions,
    garbage: GarbageFilter,
}

/// Section being accumulated.
struct OpenSection {
    title: String,
    content: String,
    start_page: u32,
}

impl OpenSection {
    fn new(title: String, start_page: u32) -> Self {
        Self {
            title,
            content: String::new(),
            start_page,
        }
    }

    fn append(&mut self, text: &str) {
        if !self.content.is_empty() {
            self.content.push(' ');
        }
        self.content.push_str(text);
    }

    fn finish(self) -> Option<Section> {
        let content = self.content.trim();
        if content.is_empty() {
            None
        } else {
            Some(Section::new(self.title, content, self.start_page))
        }
    }
}

impl SectionSegmenter {
    /// Create a segmenter with the given options.
    pub fn new(options: SegmentOptions) -> Self {
        Self {
            options,
            garbage: GarbageFilter::new(),
        }
    }

    /// Body font size: most common integer-rounded span size.
    pub fn body_size(&self, doc: &DocumentContent) -> i32 {
        let sizes = doc
            .pages
            .iter()
            .flat_map(|p| &p.blocks)
            .flat_map(|b| &b.spans)
            .map(|s| s.size.round() as i32);
        most_common(sizes).unwrap_or(self.options.default_body_size)
    }

    fn is_header(&self, block: &TextBlock, text: &str, threshold: f32) -> bool {
        let size = match block.leading_size() {
            Some(size) => size.round(),
            None => return false,
        };
        size > threshold && text.chars().count() < self.options.max_header_chars
    }

    /// Segment the document into sections.
    ///
    /// Content before the first header belongs to a section with the default
    /// title starting on page 1. Sections without content are not emitted.
    pub fn segment(&self, doc: &DocumentContent) -> Vec<Section> {
        let body = self.body_size(doc);
        let threshold = body as f32 * self.options.heading_ratio;

        let mut sections = Vec::new();
        let mut current = OpenSection::new(self.options.default_title.clone(), 1);

        for page in &doc.pages {
            for block in &page.blocks {
                let text = block.text();
                if text.is_empty() || self.garbage.is_garbage(&text) {
                    continue;
                }

                if self.is_header(block, &text, threshold) {
                    let next = OpenSection::new(text, page.number);
                    if let Some(section) = std::mem::replace(&mut current, next).finish() {
                        sections.push(section);
                    }
                } else {
                    current.append(&text);
                }
            }
        }
        sections.extend(current.finish());

        log::debug!(
            "{}: body size {}, {} sections",
            doc.id,
            body,
            sections.len()
        );
        sections
    }
}
