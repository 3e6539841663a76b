//! Export error taxonomy.

use thiserror::Error;

use crate::spec::EnumFormatKind;

/// Boxed lower-level cause carried by [`ExportError::ExportFailure`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ExportError {
    /// Record type is unset or not marked exportable. Raised at construction time.
    #[error("Invalid record type {type_name:?}: {reason}")]
    InvalidRecordType { type_name: String, reason: String },

    /// Formatting directive incompatible with the runtime value kind.
    #[error("Unsupported format {format_kind:?} for {value_kind} value in column {column:?}")]
    UnsupportedFormat {
        column: String,
        format_kind: EnumFormatKind,
        value_kind: &'static str,
    },

    /// Failure while rendering or serializing a document.
    #[error("Export failed: {message}")]
    ExportFailure {
        message: String,
        #[source]
        source: BoxError,
    },

    /// Filesystem failure while persisting an exported buffer.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Wrap a lower-level cause as [`ExportError::ExportFailure`].
    pub fn failure(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ExportFailure {
            message: message.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_failure_keeps_source() {
        let err = ExportError::failure("Failed to write buffer", "disk full");
        assert_eq!(err.to_string(), "Export failed: Failed to write buffer");
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("disk full"));
    }

    #[test]
    fn test_io_error_is_transparent() {
        let err = ExportError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.to_string(), "denied");
        assert!(matches!(
            err,
            ExportError::Io(ref e) if e.kind() == std::io::ErrorKind::PermissionDenied
        ));
    }
}
