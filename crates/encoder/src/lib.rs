//! `gc-encoder` -- Composition export.
//!
//! Turns a timeline document into a [`CompositionArtifact`] the device
//! firmware tooling can consume.
//!
//! # Architecture
//!
//! - [`export`] -- `ExportEncoder` and the background export thread
//! - [`codec`] -- `ZoneCodec` trait and the line-oriented text codec
//! - [`transform`] -- `TextTransform` trait for the watermark attachment
//! - [`artifact`] -- The artifact type and its atomic on-disk save
//!
//! # Export Pipeline
//!
//! ```text
//! TimelineDocument
//!   --> sample_document (one sample per zone per bucket)
//!     --> ZoneCodec::encode --> payload
//! WatermarkMatrix
//!   --> coordinate_string --> TextTransform::apply --> watermark
//! ```
//!
//! # Usage
//!
//! ```rust
//! use gc_common::TimelineDocument;
//! use gc_encoder::{ExportConfig, ExportEncoder, EmptyPolicy};
//!
//! let doc = TimelineDocument::new("NP1", 5, 2_000.0);
//! let encoder = ExportEncoder::new(ExportConfig {
//!     empty_policy: EmptyPolicy::AllowSilent,
//!     ..ExportConfig::default()
//! });
//! let artifact = encoder.encode(&doc, None).unwrap();
//! assert_eq!(artifact.bucket_count, 2);
//! ```

pub mod artifact;
pub mod codec;
pub mod export;
pub mod transform;

// Re-export primary API
pub use artifact::{save_artifact, CompositionArtifact};
pub use codec::{LineCodec, ZoneCodec};
pub use export::{
    spawn_export, EmptyPolicy, ExportConfig, ExportEncoder, ExportHandle, DEFAULT_BUCKET_MILLIS,
};
pub use transform::{Base64Transform, TextTransform};
