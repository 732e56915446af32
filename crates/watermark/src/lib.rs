//! `gc-watermark` -- The watermark matrix.
//!
//! A watermark is a sparse grid of marked cells: one column per second of
//! audio, five rows per column. The export encoder folds the marked cells
//! into a transformed string attached to the composition.
//!
//! - **`WatermarkCell`** / **`WatermarkMatrix`**: the ordered cell set
//! - **`file`**: JSON import/export of the `["x-y", ...]` file format

pub mod file;
pub mod matrix;

pub use file::{export_file_name, from_json_str, import_file, save_export, to_json_string};
pub use matrix::{WatermarkCell, WatermarkMatrix, COLUMN_MILLIS, ROWS_PER_COLUMN};
