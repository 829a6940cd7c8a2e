//! Outline extraction pipeline.

use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use super::heading::HeadingClassifier;
use super::lines::LineAssembler;
use super::options::OutlineOptions;
use super::style::StyleProfiler;
use super::title::TitleDetector;
use crate::embed::Embedder;
use crate::error::Result;
use crate::model::{DocumentContent, DocumentOutline, StyleKey};

/// Layout statistics of one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutProfile {
    /// Document identifier
    pub id: String,
    /// Number of pages
    pub pages: u32,
    /// Number of words
    pub words: usize,
    /// Number of assembled lines
    pub lines: usize,
    /// Body style, if the document has any lines
    pub body_style: Option<StyleKey>,
    /// Detected title (empty if none)
    pub title: String,
    /// Number of heading candidates after title removal
    pub heading_candidates: usize,
}

/// Runs lines → body style → title → headings for a document.
pub struct OutlineExtractor {
    assembler: LineAssembler,
    title: TitleDetector,
    classifier: HeadingClassifier,
}

impl OutlineExtractor {
    /// Create an extractor.
    ///
    /// Exemplar headings are embedded here, so an embedder failure surfaces
    /// before any document is processed.
    pub fn new(embedder: Arc<dyn Embedder>, options: OutlineOptions) -> Result<Self> {
        Ok(Self {
            assembler: LineAssembler::new(),
            title: TitleDetector::new(
                options.header_zone,
                options.title_size_weight,
                options.title_bold_bonus,
            ),
            classifier: HeadingClassifier::new(embedder, &options)?,
        })
    }

    /// Extract the outline of one document.
    ///
    /// A document without lines yields an empty outline.
    pub fn extract(&self, doc: &DocumentContent) -> Result<DocumentOutline> {
        let mut lines = self.assembler.assemble(doc);
        let body = match StyleProfiler::body_style(&lines) {
            Some(body) => body,
            None => {
                log::debug!("{}: no text lines", doc.id);
                return Ok(DocumentOutline::empty());
            }
        };

        let title = self.title.extract(&mut lines, &body);
        let outline = self.classifier.classify(&lines, &body)?;
        log::debug!(
            "{}: title {:?}, {} headings",
            doc.id,
            title,
            outline.len()
        );

        Ok(DocumentOutline { title, outline })
    }

    /// Extract outlines of many documents in parallel.
    ///
    /// Results are in input order; a failed document does not affect the
    /// others.
    pub fn extract_batch(&self, docs: &[DocumentContent]) -> Vec<Result<DocumentOutline>> {
        docs.par_iter().map(|doc| self.extract(doc)).collect()
    }

    /// Layout statistics of a document.
    pub fn profile(&self, doc: &DocumentContent) -> LayoutProfile {
        let mut lines = self.assembler.assemble(doc);
        let line_count = lines.len();
        let body_style = StyleProfiler::body_style(&lines);

        let (title, heading_candidates) = match &body_style {
            Some(body) => {
                let title = self.title.extract(&mut lines, body);
                (title, self.classifier.candidates(&lines, body).len())
            }
            None => (String::new(), 0),
        };

        LayoutProfile {
            id: doc.id.clone(),
            pages: doc.page_count(),
            words: doc.word_count(),
            lines: line_count,
            body_style,
            title,
            heading_candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::HashingEmbedder;
    use crate::model::{HeadingLevel, PageContent, PositionedWord};

    fn extractor() -> OutlineExtractor {
        let embedder: Arc<dyn Embedder> = Arc::new(HashingEmbedder::new(128).unwrap());
        OutlineExtractor::new(embedder, OutlineOptions::default()).unwrap()
    }

    fn add_line(page: &mut PageContent, text: &str, top: f32, size: f32, font: &str) {
        for (i, w) in text.split_whitespace().enumerate() {
            page.push_word(PositionedWord::new(w, 0, top, 50.0 + i as f32 * 45.0, size, font));
        }
    }

    fn sample() -> DocumentContent {
        let mut p1 = PageContent::letter(1);
        add_line(&mut p1, "Project Report", 60.0, 24.0, "Helvetica-Bold");
        add_line(&mut p1, "1. Introduction", 150.0, 16.0, "Helvetica-Bold");
        for i in 0..6 {
            add_line(&mut p1, "plain body text line", 180.0 + i as f32 * 14.0, 10.0, "Helvetica");
        }
        add_line(&mut p1, "Page 1 of 2", 760.0, 10.0, "Helvetica");

        let mut p2 = PageContent::letter(2);
        add_line(&mut p2, "1.1 Scope 4", 60.0, 13.0, "Helvetica-Bold");
        for i in 0..6 {
            add_line(&mut p2, "more body text here", 90.0 + i as f32 * 14.0, 10.0, "Helvetica");
        }

        let mut doc = DocumentContent::new("report.pdf");
        doc.add_page(p1);
        doc.add_page(p2);
        doc
    }

    #[test]
    fn test_extract_outline() {
        let outline = extractor().extract(&sample()).unwrap();
        assert_eq!(outline.title, "Project Report");
        assert_eq!(outline.outline.len(), 2);
        assert_eq!(outline.outline[0].text, "1. Introduction");
        assert_eq!(outline.outline[0].level, HeadingLevel::H1);
        assert_eq!(outline.outline[1].text, "1.1 Scope");
        assert_eq!(outline.outline[1].level, HeadingLevel::H2);
        assert_eq!(outline.outline[1].page, 2);
    }

    #[test]
    fn test_empty_document() {
        let outline = extractor().extract(&DocumentContent::new("blank.pdf")).unwrap();
        assert_eq!(outline, DocumentOutline::empty());
    }

    #[test]
    fn test_extract_is_idempotent() {
        let extractor = extractor();
        let doc = sample();
        let first = serde_json::to_string(&extractor.extract(&doc).unwrap()).unwrap();
        let second = serde_json::to_string(&extractor.extract(&doc).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_batch_keeps_order() {
        let docs = vec![sample(), DocumentContent::new("blank.pdf"), sample()];
        let results = extractor().extract_batch(&docs);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().title, "Project Report");
        assert!(results[1].as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_profile() {
        let profile = extractor().profile(&sample());
        assert_eq!(profile.pages, 2);
        assert_eq!(profile.lines, 15);
        assert_eq!(profile.body_style, Some(StyleKey::new(10.0, false)));
        assert_eq!(profile.title, "Project Report");
        assert_eq!(profile.heading_candidates, 2);
    }
}
