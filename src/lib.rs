//! # pdf_outline
//!
//! Document structure inference and persona-driven section ranking for PDFs.
//!
//! The library reads positioned words out of PDF pages, infers a title and a
//! three-level heading outline from their layout, and, for a ranking request,
//! splits documents into titled sections and picks the ones most relevant to
//! a persona's task.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_outline::{extract_outline, render, EmbedderConfig};
//!
//! fn main() -> pdf_outline::Result<()> {
//!     let embedder = EmbedderConfig::default().build()?;
//!     let outline = extract_outline("document.pdf", embedder)?;
//!     println!("{}", render::to_json(&outline, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Outline extraction**: title plus H1-H3 headings from font style,
//!   numbering and semantic similarity
//! - **Section ranking**: cross-document relevance ranking with extractive
//!   summaries
//! - **Pluggable inputs**: lopdf-backed PDF reader or pre-extracted layout JSON
//! - **Parallel processing**: one rayon task per document

pub mod analysis;
pub mod detect;
pub mod embed;
pub mod error;
pub mod model;
pub mod rank;
pub mod reader;
pub mod render;

// Re-export commonly used types
pub use analysis::{LayoutProfile, OutlineExtractor, OutlineOptions, SegmentOptions};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, SourceFormat};
pub use embed::{cosine_similarity, Embedder, EmbedderConfig, EmbeddingProvider, HashingEmbedder};
#[cfg(feature = "onnx")]
pub use embed::OnnxEmbedder;
pub use error::{Error, Result};
pub use model::{
    DocumentContent, DocumentOutline, HeadingLevel, OutlineEntry, PageContent, PositionedWord,
    RankingRequest, RankingResult, Section, TextBlock, TextSpan,
};
pub use rank::{RankOptions, RankingPipeline};
pub use reader::{DocumentReader, ErrorMode, PageSelection, ReadOptions, ReaderRegistry};
pub use render::JsonFormat;

use std::path::Path;
use std::sync::Arc;

/// Read a document (PDF or layout JSON) with default options.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::read_document;
///
/// let doc = read_document("document.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<DocumentContent> {
    read_document_with_options(path, &ReadOptions::default())
}

/// Read a document with custom options.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::{read_document_with_options, PageSelection, ReadOptions};
///
/// let options = ReadOptions::new()
///     .lenient()
///     .with_pages(PageSelection::Range(1..=5));
/// let doc = read_document_with_options("document.pdf", &options).unwrap();
/// ```
pub fn read_document_with_options<P: AsRef<Path>>(
    path: P,
    options: &ReadOptions,
) -> Result<DocumentContent> {
    ReaderRegistry::with_defaults().read(path.as_ref(), options)
}

/// Extract the title and heading outline of a document.
pub fn extract_outline<P: AsRef<Path>>(
    path: P,
    embedder: Arc<dyn Embedder>,
) -> Result<DocumentOutline> {
    let doc = read_document(path)?;
    OutlineExtractor::new(embedder, OutlineOptions::default())?.extract(&doc)
}

/// Run a ranking request file against the documents in `doc_dir`.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::{rank_collection, EmbedderConfig};
///
/// let embedder = EmbedderConfig::default().build()?;
/// let result = rank_collection(
///     "collection1/challenge1b_input.json",
///     "collection1/PDFs",
///     embedder,
/// )?;
/// println!("{} sections", result.extracted_sections.len());
/// # Ok::<(), pdf_outline::Error>(())
/// ```
pub fn rank_collection<P: AsRef<Path>, D: AsRef<Path>>(
    request_path: P,
    doc_dir: D,
    embedder: Arc<dyn Embedder>,
) -> Result<RankingResult> {
    let request = RankingRequest::from_json(&std::fs::read_to_string(request_path)?)?;
    RankingPipeline::new(embedder, RankOptions::default()).run(&request, doc_dir.as_ref())
}
