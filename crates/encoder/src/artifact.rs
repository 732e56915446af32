//! The exported composition artifact and its on-disk form.

use std::path::Path;

use gc_common::ExportError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything an export produces, saved unchanged by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionArtifact {
    /// Device profile the composition targets.
    pub device_id: String,
    /// Name of the codec that produced `payload`.
    pub codec: String,
    pub bucket_millis: f64,
    /// Zone rows in the payload.
    pub zone_count: usize,
    pub bucket_count: usize,
    /// Encoded zone stream.
    pub payload: String,
    /// Transformed watermark, kept apart from the zone stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark: Option<String>,
    /// Name of the transform applied to the watermark.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark_transform: Option<String>,
}

impl CompositionArtifact {
    pub fn to_json_string(&self) -> Result<String, ExportError> {
        let json = serde_json::to_string_pretty(self)?;
        debug!(device = %self.device_id, json_len = json.len(), "Serialized artifact");
        Ok(json)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read an artifact file.
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Write `artifact` to `path` atomically.
///
/// The JSON goes to a sibling temp file that is then renamed over `path`, so
/// readers never observe a partially written artifact.
pub fn save_artifact(artifact: &CompositionArtifact, path: &Path) -> Result<(), ExportError> {
    let json = artifact.to_json_string()?;

    let temp_path = path.with_extension("json.tmp");

    std::fs::write(&temp_path, json.as_bytes()).map_err(|e| {
        tracing::error!(path = %temp_path.display(), error = %e, "Failed to write temp file");
        ExportError::Io(e)
    })?;

    std::fs::rename(&temp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        tracing::error!(
            from = %temp_path.display(),
            to = %path.display(),
            error = %e,
            "Failed to rename temp file to target"
        );
        ExportError::Io(e)
    })?;

    info!(
        device = %artifact.device_id,
        path = %path.display(),
        "Artifact saved"
    );
    Ok(())
}
