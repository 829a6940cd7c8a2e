//! Reader for pre-extracted layout documents.

use std::fs;
use std::path::Path;

use super::options::{PageSelection, ReadOptions};
use super::DocumentReader;
use crate::error::{Error, Result};
use crate::model::DocumentContent;

/// Reads a [`DocumentContent`] serialized as JSON.
///
/// Page selection applies as for PDFs. A document without an `id` takes the
/// file name of its path.
#[derive(Debug, Clone, Default)]
pub struct LayoutJsonReader;

impl LayoutJsonReader {
    /// Create a new layout reader.
    pub fn new() -> Self {
        Self
    }

    fn finish(&self, mut doc: DocumentContent, options: &ReadOptions) -> Result<DocumentContent> {
        if let PageSelection::Range(range) = &options.pages {
            let last = doc.pages.iter().map(|p| p.number).max().unwrap_or(0);
            if *range.start() > last {
                return Err(Error::PageOutOfRange(*range.start(), last));
            }
        }

        doc.pages.retain(|p| options.pages.includes(p.number));
        for page in &mut doc.pages {
            if page.number == 0 {
                return Err(Error::PdfParse(format!("{}: page number 0", doc.id)));
            }
            for word in &mut page.words {
                word.page = page.number;
            }
        }
        Ok(doc)
    }
}

impl DocumentReader for LayoutJsonReader {
    fn name(&self) -> &str {
        "layout-json"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn read(&self, path: &Path, options: &ReadOptions) -> Result<DocumentContent> {
        let data = fs::read(path)?;
        let mut doc: DocumentContent = serde_json::from_slice(&data)?;
        if doc.id.is_empty() {
            doc.id = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
        }
        self.finish(doc, options)
    }

    fn read_bytes(&self, bytes: &[u8], options: &ReadOptions) -> Result<DocumentContent> {
        let doc: DocumentContent = serde_json::from_slice(bytes)?;
        self.finish(doc, options)
    }
}
