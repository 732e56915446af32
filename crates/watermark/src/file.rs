//! Watermark file I/O.
//!
//! The file is a JSON array of `"x-y"` strings. Imports are all-or-nothing:
//! a file that fails to parse or validate leaves the current matrix as it was.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use gc_common::ImportError;
use tracing::{debug, info, warn};

use crate::matrix::WatermarkMatrix;

/// Parse a watermark file's contents.
pub fn from_json_str(json: &str) -> Result<WatermarkMatrix, ImportError> {
    let coordinates: Vec<String> = serde_json::from_str(json)?;
    let matrix = WatermarkMatrix::from_coordinates(&coordinates)?;
    debug!(cells = matrix.len(), "Parsed watermark");
    Ok(matrix)
}

/// Serialize to the pretty-printed file form.
pub fn to_json_string(matrix: &WatermarkMatrix) -> Result<String, ImportError> {
    Ok(serde_json::to_string_pretty(&matrix.to_coordinates())?)
}

/// Replace `matrix` with the contents of the file at `path`.
///
/// On any failure the error is logged and returned, and `matrix` is untouched.
/// Returns the number of imported cells.
pub fn import_file(matrix: &mut WatermarkMatrix, path: &Path) -> Result<usize, ImportError> {
    let imported = std::fs::read_to_string(path)
        .map_err(ImportError::from)
        .and_then(|json| from_json_str(&json))
        .map_err(|e| {
            warn!(path = %path.display(), error = %e, "Watermark import failed, keeping current matrix");
            e
        })?;

    *matrix = imported;
    info!(path = %path.display(), cells = matrix.len(), "Watermark imported");
    Ok(matrix.len())
}

/// File name for an export made at `at`: `watermark_export_<YYYY-MM-DD_HH-MM-SS>.json`.
pub fn export_file_name(at: DateTime<Local>) -> String {
    format!("watermark_export_{}.json", at.format("%Y-%m-%d_%H-%M-%S"))
}

/// Write `matrix` into `dir` under a timestamped name. Returns the file path.
pub fn save_export(matrix: &WatermarkMatrix, dir: &Path) -> Result<PathBuf, ImportError> {
    let path = dir.join(export_file_name(Local::now()));
    let json = to_json_string(matrix)?;
    std::fs::write(&path, json.as_bytes()).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Failed to write watermark export");
        ImportError::Io(e)
    })?;

    info!(path = %path.display(), cells = matrix.len(), "Watermark exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::WatermarkCell;
    use chrono::TimeZone;

    fn sample() -> WatermarkMatrix {
        [
            WatermarkCell::new(0, 1).unwrap(),
            WatermarkCell::new(1000, 3).unwrap(),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn json_shape() {
        let json = to_json_string(&sample()).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec!["0-1", "1000-3"]);
        assert!(json.contains('\n'));
    }

    #[test]
    fn export_then_import_reproduces_the_set() {
        let dir = std::env::temp_dir().join("gc_watermark_roundtrip_test");
        let _ = std::fs::create_dir_all(&dir);

        let path = save_export(&sample(), &dir).expect("save");
        let mut matrix = WatermarkMatrix::new();
        let count = import_file(&mut matrix, &path).expect("import");

        assert_eq!(count, 2);
        assert_eq!(matrix, sample());

        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_dir(&dir);
    }

    #[test]
    fn failed_import_keeps_current_matrix() {
        let dir = std::env::temp_dir().join("gc_watermark_bad_import_test");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("bad.json");

        let mut matrix = sample();
        for contents in [r#"{ "not": "an array" }"#, r#"["0-1", "1500-2"]"#, r#"["0-9"]"#, "[1, 2]", "garbage"] {
            std::fs::write(&path, contents).expect("write");
            let err = import_file(&mut matrix, &path).unwrap_err();
            assert!(matches!(err, ImportError::Format { .. }), "{contents}");
            assert_eq!(matrix, sample());
        }

        let missing = dir.join("missing.json");
        assert!(matches!(
            import_file(&mut matrix, &missing),
            Err(ImportError::Io(_))
        ));
        assert_eq!(matrix, sample());

        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_dir(&dir);
    }

    #[test]
    fn export_file_name_format() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(export_file_name(at), "watermark_export_2024-03-09_07-05-01.json");
    }

    #[test]
    fn empty_array_imports_as_empty_matrix() {
        assert!(from_json_str("[]").unwrap().is_empty());
    }
}
