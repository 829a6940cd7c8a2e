//! Source format detection.
//!
//! Documents reach the core either as PDF files or as layout JSON dumps of
//! already-extracted positioned text. Both are recognized from their first
//! bytes so that a misnamed file is still routed to the right reader.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Detected source format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFormat {
    /// A PDF file with its header version (e.g., "1.7").
    Pdf {
        /// PDF version from the `%PDF-x.y` header
        version: String,
    },
    /// A layout JSON document.
    LayoutJson,
}

impl SourceFormat {
    /// Whether this is a PDF source.
    pub fn is_pdf(&self) -> bool {
        matches!(self, SourceFormat::Pdf { .. })
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Pdf { version } => write!(f, "PDF {}", version),
            SourceFormat::LayoutJson => write!(f, "layout JSON"),
        }
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"
const SNIFF_LEN: usize = 64;

/// Detect the source format of a file.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<SourceFormat> {
    let mut file = File::open(path)?;
    let mut header = Vec::with_capacity(SNIFF_LEN);
    file.by_ref().take(SNIFF_LEN as u64).read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the source format from the leading bytes of a document.
///
/// Returns `Error::UnknownFormat` for anything that is neither a PDF header
/// nor a JSON object, and `Error::UnsupportedVersion` for a malformed PDF
/// version.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<SourceFormat> {
    if data.starts_with(PDF_MAGIC) {
        if data.len() < PDF_MAGIC_LEN + VERSION_LEN {
            return Err(Error::UnknownFormat);
        }
        let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
        let version = String::from_utf8_lossy(version_bytes).to_string();
        if !is_valid_version(&version) {
            return Err(Error::UnsupportedVersion(version));
        }
        return Ok(SourceFormat::Pdf { version });
    }

    // Skip whitespace and a UTF-8 byte order mark
    let first = data
        .iter()
        .find(|b| !(b.is_ascii_whitespace() || matches!(**b, 0xEF | 0xBB | 0xBF)));
    match first {
        Some(b'{') => Ok(SourceFormat::LayoutJson),
        _ => Err(Error::UnknownFormat),
    }
}

fn is_valid_version(version: &str) -> bool {
    let chars: Vec<char> = version.chars().collect();
    chars.len() == 3 && chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}

/// Check if a file is a PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    matches!(detect_format_from_path(path), Ok(SourceFormat::Pdf { .. }))
}

/// Check if bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    matches!(detect_format_from_bytes(data), Ok(SourceFormat::Pdf { .. }))
}
