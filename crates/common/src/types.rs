//! Core types with newtype pattern for type safety.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest brightness value a glyph zone accepts.
pub const MAX_BRIGHTNESS: i32 = 4095;

/// Index of a physical lighting zone on the active device.
pub type ZoneId = usize;

/// Glyph block identifier.
///
/// Ids are handed out by a monotonically increasing counter, so comparing two
/// ids also compares their insertion order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u64);

impl BlockId {
    pub const FIRST: Self = Self(1);

    /// The id allocated after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}
