//! Reading and writing association documents.
//!
//! Writes go to a temporary file in the target directory which is then
//! renamed over the destination, so a reader never sees a partial document.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use jwst_asn_core::{AsnError, Association};

use crate::Result;

/// Reads a document as raw JSON, without checking its shape.
pub fn read_document(path: impl AsRef<Path>) -> Result<Value> {
    let contents = fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&contents)?)
}

/// Reads a typed association.
///
/// Fails with a JSON error when the document does not fit the data model;
/// use [`read_document`] with [`jwst_asn_core::validate_document`] to get
/// every schema violation instead.
pub fn read_association(path: impl AsRef<Path>) -> Result<Association> {
    let contents = fs::read_to_string(path.as_ref())?;
    Ok(Association::from_json_str(&contents)?)
}

/// Serializes an association to JSON text, pretty or compact.
pub fn to_json(asn: &Association, pretty: bool) -> Result<String> {
    let text = if pretty {
        asn.to_json_pretty()?
    } else {
        asn.to_json()?
    };
    Ok(text)
}

/// Writes an association atomically.
pub fn write_association(path: impl AsRef<Path>, asn: &Association, pretty: bool) -> Result<()> {
    let path = path.as_ref();
    let mut text = to_json(asn, pretty)?;
    text.push('\n');
    write_atomic(path, text.as_bytes())?;
    info!(event = "written", path = %path.display(), products = asn.products.len() as u64);
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::result::Result<(), AsnError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| AsnError::Io(err.error))?;

    debug!(path = %path.display(), bytes = bytes.len() as u64, "replaced file");
    Ok(())
}
