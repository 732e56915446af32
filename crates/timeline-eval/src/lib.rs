//! `gc-timeline-eval` -- Timeline evaluation for the glyph composer.
//!
//! This crate turns a [`TimelineDocument`](gc_common::TimelineDocument) into
//! what the device actually shows. It handles:
//!
//! - **Overlap resolution**: last write wins within a zone, by `(start, id)`
//! - **Point evaluation**: the effect each zone emits at time T
//! - **Bucket sampling**: a zone-by-bucket grid for export
//!
//! # Usage
//!
//! ```rust
//! use gc_common::TimelineDocument;
//! use gc_timeline_eval::sample_document;
//!
//! let doc = TimelineDocument::new("NP1", 5, 3_000.0);
//! let grid = sample_document(&doc, 1_000.0).unwrap();
//! assert!(grid.is_silent());
//! ```

pub mod error;
pub mod evaluator;
pub mod resolve;
pub mod types;

// Re-export primary API
pub use error::TimelineEvalError;
pub use evaluator::{bucket_count, evaluate, sample_at, sample_document, MAX_BUCKETS};
pub use resolve::resolve_zone;
pub use types::{ActiveInterval, BucketSample, SampleGrid};
