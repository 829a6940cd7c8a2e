//! JSON rendering of outlines and ranking results.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed with 4-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a value to JSON. Non-ASCII text is written as is.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let bytes = to_json_bytes(value, format)?;
    String::from_utf8(bytes).map_err(|e| Error::Render(format!("JSON is not UTF-8: {}", e)))
}

fn to_json_bytes<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let result = match format {
        JsonFormat::Pretty => {
            let formatter = PrettyFormatter::with_indent(b"    ");
            value.serialize(&mut Serializer::with_formatter(&mut out, formatter))
        }
        JsonFormat::Compact => value.serialize(&mut Serializer::new(&mut out)),
    };
    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?;
    Ok(out)
}

/// Write a value as JSON to `path`, replacing any existing file.
///
/// The JSON goes to a temporary file in the same directory first and is
/// renamed into place, so `path` never holds a partial result.
pub fn write_json_atomic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    format: JsonFormat,
) -> Result<()> {
    let bytes = to_json_bytes(value, format)?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(&bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| Error::Io(e.error))?;
    log::debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
