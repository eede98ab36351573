pub mod resolve;
pub mod validate;

use launchspec_core::errors::{ExError, ExErrorKind};
use std::path::Path;

/// Read a document from disk, naming the file on failure
pub(crate) fn read_document(path: &Path, op: &str) -> Result<String, ExError> {
    std::fs::read_to_string(path).map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op(op)
            .with_message(format!("cannot read {}: {}", path.display(), e))
    })
}

/// Parse JSON text, naming the file on failure
pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(
    text: &str,
    path: &Path,
    op: &str,
) -> Result<T, ExError> {
    serde_json::from_str(text).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op(op)
            .with_message(format!("{} is not a valid document: {}", path.display(), e))
    })
}
