//! PDF reader backed by lopdf.

use std::collections::HashMap;
use std::path::Path;

use super::backend::{LopdfBackend, PageId, PdfBackend};
use super::interpreter::ContentInterpreter;
use super::layout::layout_page;
use super::options::{ErrorMode, ReadOptions};
use super::DocumentReader;
use crate::detect::{detect_format_from_bytes, detect_format_from_path};
use crate::error::{Error, Result};
use crate::model::{DocumentContent, PageContent};

/// Reads positioned text from PDF files.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new PDF reader.
    pub fn new() -> Self {
        Self
    }

    /// Read every selected page of an opened backend.
    pub fn read_backend<B: PdfBackend>(
        &self,
        backend: &B,
        id: &str,
        options: &ReadOptions,
    ) -> Result<DocumentContent> {
        let mut doc = DocumentContent::new(id);
        let pages = backend.pages();
        let total = pages.len() as u32;

        if let super::PageSelection::Range(range) = &options.pages {
            if *range.start() > total {
                return Err(Error::PageOutOfRange(*range.start(), total));
            }
        }

        for (&number, &page_id) in &pages {
            if !options.pages.includes(number) {
                continue;
            }
            match read_page(backend, number, page_id) {
                Ok(page) => doc.add_page(page),
                Err(e) if options.error_mode == ErrorMode::Lenient => {
                    log::warn!("{}: skipping page {}: {}", id, number, e);
                }
                Err(e) => return Err(e),
            }
        }

        log::debug!(
            "{}: read {} of {} pages, {} words",
            id,
            doc.page_count(),
            total,
            doc.word_count()
        );
        Ok(doc)
    }
}

fn read_page<B: PdfBackend>(backend: &B, number: u32, page_id: PageId) -> Result<PageContent> {
    let (width, height) = backend.page_size(page_id);
    let fonts: HashMap<Vec<u8>, String> = backend
        .page_fonts(page_id)?
        .into_iter()
        .map(|f| (f.name, f.base_font))
        .collect();

    let content = backend.page_content(page_id)?;
    let ops = backend.decode_content(&content)?;
    let runs = ContentInterpreter::new(&fonts).run(&ops, |font, bytes| {
        backend.decode_text(page_id, font, bytes)
    });

    Ok(layout_page(number, width, height, runs))
}

fn document_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

impl DocumentReader for PdfReader {
    fn name(&self) -> &str {
        "pdf"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn read(&self, path: &Path, options: &ReadOptions) -> Result<DocumentContent> {
        if !detect_format_from_path(path)?.is_pdf() {
            return Err(Error::UnknownFormat);
        }
        let backend = LopdfBackend::load_file(path)?;
        log::debug!("{}: PDF {}", path.display(), backend.version());
        self.read_backend(&backend, &document_id(path), options)
    }

    fn read_bytes(&self, bytes: &[u8], options: &ReadOptions) -> Result<DocumentContent> {
        if !detect_format_from_bytes(bytes)?.is_pdf() {
            return Err(Error::UnknownFormat);
        }
        let backend = LopdfBackend::load_bytes(bytes)?;
        self.read_backend(&backend, "document.pdf", options)
    }
}
