//! `gc-common` -- Shared types, errors, and configuration for the glyph composer core.
//!
//! This crate is the foundation that all other composer crates depend on.
//! It defines the core abstractions:
//!
//! - **Types**: `BlockId`, `ZoneId`, brightness limits (newtypes for safety)
//! - **Glyph model**: `GlyphBlock`, the timed lighting instruction
//! - **Effects**: `EffectId` with the known effect catalogue
//! - **Document**: `TimelineDocument`, the export-facing snapshot of a composition
//! - **Errors**: `StoreError`, `DeviceError`, `ExportError`, `ImportError` (thiserror-based)
//! - **Config**: `ComposerConfig`

pub mod config;
pub mod document;
pub mod effect;
pub mod error;
pub mod glyph;
pub mod types;

// Re-export commonly used items at crate root
pub use config::ComposerConfig;
pub use document::{TimelineDocument, MAX_ZONE_ROWS};
pub use effect::EffectId;
pub use error::{
    ComposerError, ComposerResult, DeviceError, ExportError, ImportError, StoreError,
};
pub use glyph::GlyphBlock;
pub use types::{BlockId, ZoneId, MAX_BRIGHTNESS};
