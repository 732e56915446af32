//! Central error types for the composer (thiserror-based).

use thiserror::Error;

use crate::types::ZoneId;

/// Top-level composer error.
#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("Timeline error: {0}")]
    Store(#[from] StoreError),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),
}

/// Rejections raised by the timeline store. A rejected call leaves the
/// document and its history untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Zone {zone} is out of range for a device with {zone_count} zones")]
    InvalidZone { zone: ZoneId, zone_count: usize },
}

/// Device registry errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("Unknown device: {id}")]
    UnknownDevice { id: String },

    #[error("Device {device} has no macro group at index {index}")]
    UnknownMacro { device: String, index: usize },
}

/// Export encoder errors. No artifact is produced when one of these occurs.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Timeline has no glyph blocks to export")]
    EmptyTimeline,

    #[error("Invalid audio duration: {millis} ms")]
    InvalidDuration { millis: f64 },

    #[error("Invalid bucket size: {millis} ms")]
    InvalidBucket { millis: f64 },

    #[error("Sampling needs {requested} buckets, the limit is {max}")]
    TooManyBuckets { requested: f64, max: usize },

    #[error("Document has {rows} zone rows, the limit is {max}")]
    TooManyZones { rows: usize, max: usize },

    #[error("Malformed payload at line {line}: {reason}")]
    MalformedPayload { line: usize, reason: String },

    #[error("Export worker failed: {reason}")]
    Worker { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while importing user files (watermarks, documents).
///
/// Callers recover from these locally: the previous in-memory state is kept.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Import format error: {reason}")]
    Format { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Format {
            reason: err.to_string(),
        }
    }
}

/// Convenience Result type for composer operations.
pub type ComposerResult<T> = Result<T, ComposerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = StoreError::InvalidZone {
            zone: 7,
            zone_count: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains('7') && msg.contains('5'));

        let err = DeviceError::UnknownDevice { id: "NP9".into() };
        assert!(err.to_string().contains("NP9"));

        let err = ExportError::InvalidDuration { millis: -1.0 };
        assert!(err.to_string().contains("-1"));

        let err = ExportError::TooManyBuckets {
            requested: 1e27,
            max: 1024,
        };
        assert!(err.to_string().contains("1024"));

        let err = ExportError::MalformedPayload {
            line: 3,
            reason: "bad token".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains('3') && msg.contains("bad token"));
    }

    #[test]
    fn json_error_becomes_import_format_error() {
        let result: Result<Vec<String>, _> = serde_json::from_str("not json");
        let import_err: ImportError = result.unwrap_err().into();
        assert!(matches!(import_err, ImportError::Format { .. }));
    }

    #[test]
    fn conversions_into_composer_error() {
        let err: ComposerError = StoreError::InvalidZone {
            zone: 1,
            zone_count: 0,
        }
        .into();
        assert!(matches!(err, ComposerError::Store(_)));

        let err: ComposerError = ExportError::EmptyTimeline.into();
        assert!(matches!(err, ComposerError::Export(ExportError::EmptyTimeline)));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ComposerError = ImportError::from(io_err).into();
        assert!(matches!(err, ComposerError::Import(ImportError::Io(_))));
    }
}
