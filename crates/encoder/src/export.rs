//! Export encoder: turns a timeline document into a composition artifact.
//!
//! The encoder reads one owned [`TimelineDocument`] and runs these steps:
//! 1. Validate the configuration and the document
//! 2. Sample every zone once per bucket
//! 3. Encode the sample grid with the configured [`ZoneCodec`]
//! 4. Transform the watermark coordinates and attach them separately
//!
//! Any failure returns an error and no artifact. Exports can also run on a
//! background thread via [`spawn_export`]; the result comes back over a
//! crossbeam channel.
//!
//! ```text
//! spawn_export()
//!   |
//!   +-- Spawn "glyph-export" thread
//!   |     |
//!   |     +-- encoder.encode(doc, watermark)
//!   |     +-- send Result via channel
//!   |
//!   +-- Returns ExportHandle (wait / try_result)
//! ```

use std::sync::Arc;

use crossbeam::channel::{self, Receiver, TryRecvError};
use gc_common::{ExportError, TimelineDocument};
use gc_timeline_eval::{sample_document, SampleGrid};
use gc_watermark::WatermarkMatrix;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::artifact::CompositionArtifact;
use crate::codec::{LineCodec, ZoneCodec};
use crate::transform::{Base64Transform, TextTransform};

/// Default bucket width: one sample per second.
pub const DEFAULT_BUCKET_MILLIS: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Export configuration
// ---------------------------------------------------------------------------

/// What to do with a document that has no blocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmptyPolicy {
    /// Fail with [`ExportError::EmptyTimeline`].
    #[default]
    Reject,
    /// Export an all-idle grid.
    AllowSilent,
}

/// Configuration for an export operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportConfig {
    /// Sampling interval in milliseconds.
    pub bucket_millis: f64,
    pub empty_policy: EmptyPolicy,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            bucket_millis: DEFAULT_BUCKET_MILLIS,
            empty_policy: EmptyPolicy::default(),
        }
    }
}

impl ExportConfig {
    pub fn validate(&self) -> Result<(), ExportError> {
        if !self.bucket_millis.is_finite() || self.bucket_millis <= 0.0 {
            return Err(ExportError::InvalidBucket {
                millis: self.bucket_millis,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// Stateless export encoder. Cloning shares the codec and transform.
#[derive(Clone)]
pub struct ExportEncoder {
    config: ExportConfig,
    codec: Arc<dyn ZoneCodec>,
    transform: Arc<dyn TextTransform>,
}

impl std::fmt::Debug for ExportEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportEncoder")
            .field("config", &self.config)
            .field("codec", &self.codec.name())
            .field("transform", &self.transform.name())
            .finish()
    }
}

impl Default for ExportEncoder {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}

impl ExportEncoder {
    /// Encoder with the line codec and base64 watermark transform.
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config,
            codec: Arc::new(LineCodec),
            transform: Arc::new(Base64Transform),
        }
    }

    pub fn with_codec(mut self, codec: Arc<dyn ZoneCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_transform(mut self, transform: Arc<dyn TextTransform>) -> Self {
        self.transform = transform;
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Encode `doc` into an artifact.
    ///
    /// The watermark is attached only when given and non-empty.
    pub fn encode(
        &self,
        doc: &TimelineDocument,
        watermark: Option<&WatermarkMatrix>,
    ) -> Result<CompositionArtifact, ExportError> {
        self.config.validate()?;

        if doc.is_empty() && self.config.empty_policy == EmptyPolicy::Reject {
            warn!(device = %doc.device_id, "Refusing to export an empty timeline");
            return Err(ExportError::EmptyTimeline);
        }
        let duration = doc.audio_duration_millis;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(ExportError::InvalidDuration { millis: duration });
        }

        let grid = sample_document(doc, self.config.bucket_millis)?;
        let payload = self.codec.encode(&grid);
        debug!(
            codec = self.codec.name(),
            payload_len = payload.len(),
            "Zone stream encoded"
        );

        let (watermark, watermark_transform) = match watermark.filter(|m| !m.is_empty()) {
            Some(matrix) => (
                Some(self.transform.apply(&matrix.coordinate_string())),
                Some(self.transform.name().to_string()),
            ),
            None => (None, None),
        };

        info!(
            device = %doc.device_id,
            zones = grid.zone_count(),
            buckets = grid.bucket_count,
            blocks = doc.total_blocks(),
            watermarked = watermark.is_some(),
            "Export complete"
        );

        Ok(CompositionArtifact {
            device_id: doc.device_id.clone(),
            codec: self.codec.name().to_string(),
            bucket_millis: grid.bucket_millis,
            zone_count: grid.zone_count(),
            bucket_count: grid.bucket_count,
            payload,
            watermark,
            watermark_transform,
        })
    }

    /// Decode an artifact's zone stream back into a sample grid.
    pub fn decode(&self, artifact: &CompositionArtifact) -> Result<SampleGrid, ExportError> {
        if artifact.codec != self.codec.name() {
            return Err(ExportError::MalformedPayload {
                line: 0,
                reason: format!(
                    "artifact uses codec {:?}, encoder has {:?}",
                    artifact.codec,
                    self.codec.name()
                ),
            });
        }
        self.codec.decode(&artifact.payload)
    }
}

// ---------------------------------------------------------------------------
// Background export
// ---------------------------------------------------------------------------

/// Handle to an export running on its own thread.
#[derive(Debug)]
pub struct ExportHandle {
    result_rx: Receiver<Result<CompositionArtifact, ExportError>>,
}

impl ExportHandle {
    /// Block until the export finishes.
    pub fn wait(self) -> Result<CompositionArtifact, ExportError> {
        self.result_rx.recv().map_err(|_| ExportError::Worker {
            reason: "export thread exited without a result".to_string(),
        })?
    }

    /// The result if the export has finished, `None` while it is running.
    pub fn try_result(&self) -> Option<Result<CompositionArtifact, ExportError>> {
        match self.result_rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ExportError::Worker {
                reason: "export thread exited without a result".to_string(),
            })),
        }
    }
}

/// Run `encoder.encode` on a background thread.
///
/// The document and watermark are moved into the thread, so later edits to
/// the application state cannot affect the export.
pub fn spawn_export(
    encoder: ExportEncoder,
    doc: TimelineDocument,
    watermark: Option<WatermarkMatrix>,
) -> Result<ExportHandle, ExportError> {
    let (result_tx, result_rx) = channel::bounded(1);

    info!(device = %doc.device_id, blocks = doc.total_blocks(), "Starting export");

    std::thread::Builder::new()
        .name("glyph-export".to_string())
        .spawn(move || {
            let result = encoder.encode(&doc, watermark.as_ref());
            if let Err(e) = &result {
                warn!(error = %e, "Export failed");
            }
            let _ = result_tx.send(result);
        })
        .map_err(|e| ExportError::Worker {
            reason: format!("Failed to spawn export thread: {e}"),
        })?;

    Ok(ExportHandle { result_rx })
}
