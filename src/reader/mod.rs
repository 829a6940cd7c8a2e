//! Document readers producing positioned text.
//!
//! Readers turn a source file into a [`DocumentContent`]: per page, the
//! positioned words used for outline extraction and the text blocks used for
//! section segmentation. Readers are registered by file extension in a
//! [`ReaderRegistry`].
//!
//! # Example
//!
//! ```no_run
//! use pdf_outline::reader::{ReadOptions, ReaderRegistry};
//! use std::path::Path;
//!
//! fn main() -> pdf_outline::Result<()> {
//!     let registry = ReaderRegistry::with_defaults();
//!     let doc = registry.read(Path::new("report.pdf"), &ReadOptions::default())?;
//!     println!("{} pages, {} words", doc.page_count(), doc.word_count());
//!     Ok(())
//! }
//! ```

pub mod backend;
mod interpreter;
mod json;
mod layout;
mod options;
mod pdf;

pub use interpreter::{ContentInterpreter, GlyphRun};
pub use json::LayoutJsonReader;
pub use layout::{group_lines_into_blocks, group_runs_into_lines, layout_page, TextLine};
pub use options::{ErrorMode, PageSelection, ReadOptions};
pub use pdf::PdfReader;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::DocumentContent;

/// A source of positioned text.
pub trait DocumentReader: Send + Sync {
    /// Name of this reader.
    fn name(&self) -> &str;

    /// Supported file extensions, lowercase without the leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// Read a file.
    fn read(&self, path: &Path, options: &ReadOptions) -> Result<DocumentContent>;

    /// Read from bytes.
    fn read_bytes(&self, bytes: &[u8], options: &ReadOptions) -> Result<DocumentContent>;

    /// Check if this reader supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext)
    }
}

/// Extension → reader dispatch.
pub struct ReaderRegistry {
    readers: HashMap<String, Arc<dyn DocumentReader>>,
}

impl ReaderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            readers: HashMap::new(),
        }
    }

    /// Create a registry with the PDF and layout-JSON readers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfReader::new()));
        registry.register(Arc::new(LayoutJsonReader::new()));
        registry
    }

    /// Register a reader for all its extensions.
    pub fn register(&mut self, reader: Arc<dyn DocumentReader>) {
        for ext in reader.supported_extensions() {
            self.readers.insert(ext.to_lowercase(), reader.clone());
        }
    }

    /// Reader for an extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentReader>> {
        self.readers.get(&ext.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.readers.contains_key(&ext.to_lowercase())
    }

    /// Check if a path has a supported extension.
    pub fn supports_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.supports(e))
    }

    /// Supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.readers.keys().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }

    /// Read a file with the reader registered for its extension.
    pub fn read(&self, path: &Path, options: &ReadOptions) -> Result<DocumentContent> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::Other(format!("{}: file has no extension", path.display())))?;
        let reader = self.get_by_extension(ext).ok_or(Error::UnknownFormat)?;
        reader.read(path, options)
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_with_defaults() {
        let registry = ReaderRegistry::with_defaults();
        assert!(registry.supports("pdf"));
        assert!(registry.supports("PDF"));
        assert!(registry.supports("json"));
        assert!(!registry.supports("docx"));
        assert_eq!(registry.supported_extensions(), vec!["json", "pdf"]);
    }

    #[test]
    fn test_registry_dispatch() {
        let registry = ReaderRegistry::with_defaults();
        assert_eq!(registry.get_by_extension("Pdf").unwrap().name(), "pdf");
        assert_eq!(registry.get_by_extension("json").unwrap().name(), "layout-json");
        assert!(registry.supports_path(Path::new("a/b/report.PDF")));
        assert!(!registry.supports_path(Path::new("README")));
    }

    #[test]
    fn test_read_unknown_extension() {
        let registry = ReaderRegistry::with_defaults();
        let result = registry.read(Path::new("notes.txt"), &ReadOptions::default());
        assert!(matches!(result, Err(Error::UnknownFormat)));
        let result = registry.read(Path::new("Makefile"), &ReadOptions::default());
        assert!(matches!(result, Err(Error::Other(_))));
    }
}
