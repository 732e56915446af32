//! Device profile and macro group descriptors.

use gc_common::ZoneId;
use serde::Serialize;

/// Zones targeted by one macro group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ZoneSpan {
    /// A single zone.
    Single { zone: ZoneId },
    /// An inclusive run of zones.
    Range { from: ZoneId, to: ZoneId },
    /// An arbitrary list of zones.
    List { zones: Vec<ZoneId> },
}

impl ZoneSpan {
    /// Every zone covered by this span, in order.
    pub fn zones(&self) -> Vec<ZoneId> {
        match self {
            Self::Single { zone } => vec![*zone],
            Self::Range { from, to } => (*from..=*to).collect(),
            Self::List { zones } => zones.clone(),
        }
    }

    /// Number of zones covered.
    pub fn len(&self) -> usize {
        match self {
            Self::Single { .. } => 1,
            Self::Range { from, to } => to.saturating_sub(*from) + 1,
            Self::List { zones } => zones.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highest zone index covered, if any.
    pub fn max_zone(&self) -> Option<ZoneId> {
        match self {
            Self::Single { zone } => Some(*zone),
            Self::Range { to, .. } => Some(*to),
            Self::List { zones } => zones.iter().copied().max(),
        }
    }
}

/// A named shortcut that places blocks in a predefined set of zones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MacroGroup {
    /// Button label shown to the user.
    pub label: String,
    /// Zones filled when the macro runs.
    pub span: ZoneSpan,
}

impl MacroGroup {
    pub fn single(label: impl Into<String>, zone: ZoneId) -> Self {
        Self {
            label: label.into(),
            span: ZoneSpan::Single { zone },
        }
    }

    pub fn range(label: impl Into<String>, from: ZoneId, to: ZoneId) -> Self {
        Self {
            label: label.into(),
            span: ZoneSpan::Range { from, to },
        }
    }

    pub fn list(label: impl Into<String>, zones: Vec<ZoneId>) -> Self {
        Self {
            label: label.into(),
            span: ZoneSpan::List { zones },
        }
    }
}

/// Static description of one supported device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeviceProfile {
    /// Registry key (e.g. `"NP2"`).
    pub id: String,
    /// Human-readable model name.
    pub display_name: String,
    /// Number of addressable zones.
    pub zone_count: usize,
    /// Macro groups in display order.
    pub macro_groups: Vec<MacroGroup>,
    /// Warning to surface when the device is selected.
    pub caution: Option<String>,
}

impl DeviceProfile {
    /// Returns `true` if `zone` is addressable on this device.
    pub fn is_valid_zone(&self, zone: ZoneId) -> bool {
        zone < self.zone_count
    }

    /// Macro group at `index` in display order.
    ///
    /// Groups are addressed by position because labels repeat on some
    /// devices (a single-zone "4" next to a ranged "4").
    pub fn macro_group(&self, index: usize) -> Option<&MacroGroup> {
        self.macro_groups.get(index)
    }
}
