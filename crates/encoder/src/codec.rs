//! Zone stream codecs.
//!
//! A codec turns a [`SampleGrid`] into the artifact payload and back. The
//! round trip is exact: `decode(encode(grid)) == grid`.
//!
//! # Line format
//!
//! ```text
//! bucket_ms=1000;zones=3;buckets=4
//! 0:4095,0:4095,-,-
//! -,-,-,-
//! 3:2048:7,-,-,-
//! ```
//!
//! One header line, then one line per zone with a comma-separated token per
//! bucket: `-` when idle, otherwise the effect id followed by `:<param>` for
//! each effect parameter.

use gc_common::{EffectId, ExportError};
use gc_timeline_eval::{BucketSample, SampleGrid};

/// Serializes sampled zone activity.
pub trait ZoneCodec: Send + Sync {
    /// Identifier stored in the artifact.
    fn name(&self) -> &'static str;

    fn encode(&self, grid: &SampleGrid) -> String;

    fn decode(&self, payload: &str) -> Result<SampleGrid, ExportError>;
}

/// Token for an idle bucket.
const IDLE: &str = "-";

/// The default line-oriented text codec.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineCodec;

impl LineCodec {
    pub const NAME: &'static str = "line-v1";

    fn encode_sample(sample: Option<&BucketSample>) -> String {
        match sample {
            None => IDLE.to_string(),
            Some(sample) => {
                let mut token = sample.effect_id.0.to_string();
                for param in &sample.effect_data {
                    token.push(':');
                    token.push_str(&param.to_string());
                }
                token
            }
        }
    }

    fn decode_sample(token: &str, line: usize) -> Result<Option<BucketSample>, ExportError> {
        if token == IDLE {
            return Ok(None);
        }
        let malformed = |reason: String| ExportError::MalformedPayload { line, reason };

        let mut parts = token.split(':');
        let effect = parts.next().unwrap_or_default();
        let effect_id = effect
            .parse::<u32>()
            .map(EffectId)
            .map_err(|_| malformed(format!("bad effect id {effect:?}")))?;
        let effect_data = parts
            .map(|p| p.parse::<i32>().map_err(|_| malformed(format!("bad parameter {p:?}"))))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(BucketSample {
            effect_id,
            effect_data,
        }))
    }

    fn parse_header(header: &str) -> Result<(f64, usize, usize), ExportError> {
        let malformed = |reason: String| ExportError::MalformedPayload { line: 1, reason };

        let (mut bucket_ms, mut zones, mut buckets) = (None, None, None);
        for field in header.split(';') {
            let (key, value) = field
                .split_once('=')
                .ok_or_else(|| malformed(format!("bad header field {field:?}")))?;
            match key {
                "bucket_ms" => bucket_ms = value.parse::<f64>().ok(),
                "zones" => zones = value.parse::<usize>().ok(),
                "buckets" => buckets = value.parse::<usize>().ok(),
                other => return Err(malformed(format!("unknown header field {other:?}"))),
            }
        }

        match (bucket_ms, zones, buckets) {
            (Some(b), Some(z), Some(n)) if b.is_finite() && b > 0.0 => Ok((b, z, n)),
            _ => Err(malformed(format!("incomplete header {header:?}"))),
        }
    }
}

impl ZoneCodec for LineCodec {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn encode(&self, grid: &SampleGrid) -> String {
        let mut lines = Vec::with_capacity(grid.zone_count() + 1);
        lines.push(format!(
            "bucket_ms={};zones={};buckets={}",
            grid.bucket_millis,
            grid.zone_count(),
            grid.bucket_count
        ));
        for row in &grid.zones {
            let tokens: Vec<String> = row.iter().map(|s| Self::encode_sample(s.as_ref())).collect();
            lines.push(tokens.join(","));
        }
        lines.join("\n")
    }

    fn decode(&self, payload: &str) -> Result<SampleGrid, ExportError> {
        // `split` rather than `lines`: a grid with zero buckets has empty zone lines.
        let mut lines = payload.split('\n');
        let header = lines.next().unwrap_or_default();
        let (bucket_millis, zone_count, bucket_count) = Self::parse_header(header)?;

        // The header is untrusted; rows grow with the lines actually present.
        let mut zones = Vec::new();
        for (index, text) in lines.enumerate() {
            let line = index + 2;
            if index >= zone_count {
                return Err(ExportError::MalformedPayload {
                    line,
                    reason: format!("more than {zone_count} zone lines"),
                });
            }

            let row = if bucket_count == 0 && text.is_empty() {
                Vec::new()
            } else {
                text.split(',')
                    .map(|token| Self::decode_sample(token, line))
                    .collect::<Result<Vec<_>, _>>()?
            };
            if row.len() != bucket_count {
                return Err(ExportError::MalformedPayload {
                    line,
                    reason: format!("expected {bucket_count} buckets, found {}", row.len()),
                });
            }
            zones.push(row);
        }

        if zones.len() != zone_count {
            return Err(ExportError::MalformedPayload {
                line: zones.len() + 2,
                reason: format!("expected {zone_count} zone lines, found {}", zones.len()),
            });
        }

        Ok(SampleGrid {
            bucket_millis,
            bucket_count,
            zones,
        })
    }
}
