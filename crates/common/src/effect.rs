//! Lighting effect identifiers and the known effect catalogue.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label shown for effect ids that are not part of the catalogue.
pub const UNKNOWN_EFFECT_NAME: &str = "Unknown / Imported";

/// Lighting effect identifier.
///
/// Any `u32` is accepted so that effects imported from other tools survive a
/// load/export cycle untouched; only the catalogue ids below have a name.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectId(pub u32);

impl EffectId {
    pub const STATIC: Self = Self(0);
    pub const FADE_IN: Self = Self(1);
    pub const FADE_OUT: Self = Self(2);
    pub const PULSE: Self = Self(3);
    pub const STROBE: Self = Self(4);
    pub const BREATHE: Self = Self(5);

    /// Every effect the editor knows by name, in menu order.
    pub const CATALOGUE: [Self; 6] = [
        Self::STATIC,
        Self::FADE_IN,
        Self::FADE_OUT,
        Self::PULSE,
        Self::STROBE,
        Self::BREATHE,
    ];

    pub fn is_known(self) -> bool {
        Self::CATALOGUE.contains(&self)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::STATIC => "Static",
            Self::FADE_IN => "Fade In",
            Self::FADE_OUT => "Fade Out",
            Self::PULSE => "Pulse",
            Self::STROBE => "Strobe",
            Self::BREATHE => "Breathe",
            _ => UNKNOWN_EFFECT_NAME,
        }
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.0)
    }
}
