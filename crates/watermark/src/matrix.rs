//! Watermark cells and the ordered cell set.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use gc_common::ImportError;

/// Width of one watermark column in milliseconds.
pub const COLUMN_MILLIS: u64 = 1000;

/// Rows in each column.
pub const ROWS_PER_COLUMN: u8 = 5;

/// One marked cell. Orders by column, then row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WatermarkCell {
    /// Column start; a multiple of [`COLUMN_MILLIS`].
    pub column_millis: u64,
    /// Row inside the column, below [`ROWS_PER_COLUMN`].
    pub row: u8,
}

impl WatermarkCell {
    /// Create a cell, checking the column alignment and row range.
    pub fn new(column_millis: u64, row: u8) -> Result<Self, ImportError> {
        if column_millis % COLUMN_MILLIS != 0 {
            return Err(ImportError::Format {
                reason: format!(
                    "column {column_millis} is not a multiple of {COLUMN_MILLIS} ms"
                ),
            });
        }
        if row >= ROWS_PER_COLUMN {
            return Err(ImportError::Format {
                reason: format!("row {row} is outside 0..{ROWS_PER_COLUMN}"),
            });
        }
        Ok(Self { column_millis, row })
    }

    /// Column index (0 for the first second of audio).
    pub fn column_index(&self) -> u64 {
        self.column_millis / COLUMN_MILLIS
    }
}

/// Formats as `x-y`, the coordinate form used in files and payloads.
impl fmt::Display for WatermarkCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.column_millis, self.row)
    }
}

impl FromStr for WatermarkCell {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ImportError::Format {
            reason: format!("expected \"x-y\", got {s:?}"),
        };
        let (x, y) = s.split_once('-').ok_or_else(malformed)?;
        let column_millis: u64 = x.trim().parse().map_err(|_| malformed())?;
        let row: u8 = y.trim().parse().map_err(|_| malformed())?;
        Self::new(column_millis, row)
    }
}

/// The set of marked cells, kept in `(column, row)` order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WatermarkMatrix {
    cells: BTreeSet<WatermarkCell>,
}

impl WatermarkMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a cell. Returns `true` if the cell is now marked.
    pub fn toggle(&mut self, cell: WatermarkCell) -> bool {
        if self.cells.remove(&cell) {
            false
        } else {
            self.cells.insert(cell);
            true
        }
    }

    /// Mark a cell. Returns `false` if it was already marked.
    pub fn insert(&mut self, cell: WatermarkCell) -> bool {
        self.cells.insert(cell)
    }

    pub fn remove(&mut self, cell: &WatermarkCell) -> bool {
        self.cells.remove(cell)
    }

    pub fn contains(&self, cell: &WatermarkCell) -> bool {
        self.cells.contains(cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Marked cells in `(column, row)` order.
    pub fn iter(&self) -> impl Iterator<Item = &WatermarkCell> {
        self.cells.iter()
    }

    /// Number of columns shown for audio of `duration_millis`.
    pub fn columns_for(duration_millis: f64) -> u64 {
        if !duration_millis.is_finite() || duration_millis <= 0.0 {
            return 0;
        }
        (duration_millis / COLUMN_MILLIS as f64).ceil() as u64
    }

    /// Cells as `x-y` strings, in order.
    pub fn to_coordinates(&self) -> Vec<String> {
        self.cells.iter().map(WatermarkCell::to_string).collect()
    }

    /// Comma-joined coordinates, the plaintext the encoder transforms.
    pub fn coordinate_string(&self) -> String {
        self.to_coordinates().join(",")
    }

    /// Build a matrix from `x-y` strings. Duplicates collapse.
    pub fn from_coordinates<S: AsRef<str>>(coordinates: &[S]) -> Result<Self, ImportError> {
        let cells = coordinates
            .iter()
            .map(|c| c.as_ref().parse::<WatermarkCell>())
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { cells })
    }
}

impl FromIterator<WatermarkCell> for WatermarkMatrix {
    fn from_iter<I: IntoIterator<Item = WatermarkCell>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(x: u64, y: u8) -> WatermarkCell {
        WatermarkCell::new(x, y).unwrap()
    }

    #[test]
    fn parse_and_display() {
        let c: WatermarkCell = "3000-4".parse().unwrap();
        assert_eq!(c, cell(3000, 4));
        assert_eq!(c.to_string(), "3000-4");
        assert_eq!(c.column_index(), 3);
    }

    #[test]
    fn parse_rejects_bad_cells() {
        for bad in ["", "12", "a-1", "1000-x", "1500-1", "1000-5", "-1-2", "1000-1-2"] {
            assert!(
                matches!(bad.parse::<WatermarkCell>(), Err(ImportError::Format { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn toggle_flips_membership() {
        let mut m = WatermarkMatrix::new();
        assert!(m.toggle(cell(0, 1)));
        assert!(m.contains(&cell(0, 1)));
        assert!(!m.toggle(cell(0, 1)));
        assert!(m.is_empty());
    }

    #[test]
    fn coordinates_are_ordered_by_column_then_row() {
        let m: WatermarkMatrix = [cell(2000, 0), cell(0, 3), cell(0, 1), cell(1000, 4)]
            .into_iter()
            .collect();
        assert_eq!(m.coordinate_string(), "0-1,0-3,1000-4,2000-0");
    }

    #[test]
    fn from_coordinates_collapses_duplicates() {
        let m = WatermarkMatrix::from_coordinates(&["0-1", "1000-3", "0-1"]).unwrap();
        assert_eq!(m.len(), 2);
        assert!(WatermarkMatrix::from_coordinates(&["0-1", "oops"]).is_err());
    }

    #[test]
    fn columns_for_duration() {
        assert_eq!(WatermarkMatrix::columns_for(0.0), 0);
        assert_eq!(WatermarkMatrix::columns_for(1.0), 1);
        assert_eq!(WatermarkMatrix::columns_for(3000.0), 3);
        assert_eq!(WatermarkMatrix::columns_for(3000.5), 4);
        assert_eq!(WatermarkMatrix::columns_for(f64::NAN), 0);
    }
}
