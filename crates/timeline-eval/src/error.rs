//! Error types for timeline evaluation.

use gc_common::ExportError;
use thiserror::Error;

/// Errors that can occur while sampling a timeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineEvalError {
    #[error("Bucket size must be a positive number of milliseconds, got {millis}")]
    InvalidBucket { millis: f64 },

    #[error("Audio duration must be a positive number of milliseconds, got {millis}")]
    InvalidDuration { millis: f64 },

    #[error("Sampling needs {requested} buckets, the limit is {max}")]
    TooManyBuckets { requested: f64, max: usize },

    #[error("Document has {rows} zone rows, the limit is {max}")]
    TooManyZones { rows: usize, max: usize },
}

impl From<TimelineEvalError> for ExportError {
    fn from(err: TimelineEvalError) -> Self {
        match err {
            TimelineEvalError::InvalidBucket { millis } => ExportError::InvalidBucket { millis },
            TimelineEvalError::InvalidDuration { millis } => ExportError::InvalidDuration { millis },
            TimelineEvalError::TooManyBuckets { requested, max } => {
                ExportError::TooManyBuckets { requested, max }
            }
            TimelineEvalError::TooManyZones { rows, max } => ExportError::TooManyZones { rows, max },
        }
    }
}
