//! Device registry -- by-id lookup of the built-in device profiles.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use gc_common::DeviceError;
use tracing::info;

use crate::profile::{DeviceProfile, MacroGroup};

/// Device selected when a session starts.
pub const DEFAULT_DEVICE_ID: &str = "NP1";

/// Immutable table of device profiles keyed by device id.
#[derive(Clone, Debug, Default)]
pub struct DeviceRegistry {
    profiles: BTreeMap<String, DeviceProfile>,
}

impl DeviceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared registry holding every built-in profile.
    pub fn builtin() -> &'static DeviceRegistry {
        static BUILTIN: OnceLock<DeviceRegistry> = OnceLock::new();
        BUILTIN.get_or_init(Self::with_builtins)
    }

    /// Create a registry with all built-in devices registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(phone_1());
        registry.register(phone_1_fifteen_zone());
        registry.register(phone_2());
        registry.register(phone_2a());

        info!(count = registry.profiles.len(), "Registered built-in device profiles");
        registry
    }

    /// Register a profile. Overwrites any previous profile with the same id.
    pub fn register(&mut self, profile: DeviceProfile) {
        self.profiles.insert(profile.id.clone(), profile);
    }

    /// Look up a profile by id.
    pub fn get(&self, id: &str) -> Result<&DeviceProfile, DeviceError> {
        self.profiles
            .get(id)
            .ok_or_else(|| DeviceError::UnknownDevice { id: id.to_string() })
    }

    /// Returns `true` if a profile with this id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.profiles.contains_key(id)
    }

    /// All profiles, sorted by id.
    pub fn list(&self) -> impl Iterator<Item = &DeviceProfile> {
        self.profiles.values()
    }

    /// Number of registered profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Single-zone macros labelled "1", "2", ... for zones `0..count`.
fn numbered_singles(count: usize) -> impl Iterator<Item = MacroGroup> {
    (0..count).map(|zone| MacroGroup::single((zone + 1).to_string(), zone))
}

fn phone_1() -> DeviceProfile {
    let mut macro_groups: Vec<MacroGroup> = numbered_singles(5).collect();
    macro_groups.push(MacroGroup::range("All", 0, 4));

    DeviceProfile {
        id: "NP1".into(),
        display_name: "Nothing Phone (1)".into(),
        zone_count: 5,
        macro_groups,
        caution: None,
    }
}

fn phone_1_fifteen_zone() -> DeviceProfile {
    let mut macro_groups: Vec<MacroGroup> = numbered_singles(6).collect();
    macro_groups.extend([
        MacroGroup::single("3.1", 4),
        MacroGroup::single("3.2", 5),
        MacroGroup::single("3.3", 2),
        MacroGroup::single("3.4", 3),
        MacroGroup::range("4", 7, 14),
        MacroGroup::range("4.1", 7, 8),
        MacroGroup::range("4.2", 9, 11),
        MacroGroup::range("4.3", 12, 14),
        MacroGroup::single("5", 6),
        MacroGroup::range("All", 0, 14),
    ]);

    DeviceProfile {
        id: "NP1_15".into(),
        display_name: "Nothing Phone (1) - 15 Zone Mode".into(),
        zone_count: 15,
        macro_groups,
        caution: Some(
            "15 zone mode is poorly supported by the Phone (1) firmware: pausing playback \
             midway can leave the glyphs stuck on until the glyph torch is toggled."
                .into(),
        ),
    }
}

fn phone_2() -> DeviceProfile {
    let mut macro_groups: Vec<MacroGroup> = numbered_singles(15).collect();
    macro_groups.extend([
        MacroGroup::range("4", 3, 7),
        MacroGroup::range("5", 8, 14),
        MacroGroup::range("6", 15, 18),
        MacroGroup::single("7", 19),
        MacroGroup::single("8", 20),
        MacroGroup::single("9", 21),
        MacroGroup::single("10", 22),
        MacroGroup::single("11", 23),
        MacroGroup::range("12", 25, 27),
        MacroGroup::range("13", 28, 30),
        MacroGroup::range("14", 31, 32),
        MacroGroup::single("15", 24),
        MacroGroup::range("All", 0, 32),
        MacroGroup::range("Top Right", 3, 18),
        MacroGroup::range("Battery", 25, 32),
    ]);

    DeviceProfile {
        id: "NP2".into(),
        display_name: "Nothing Phone (2)".into(),
        zone_count: 33,
        macro_groups,
        caution: None,
    }
}

fn phone_2a() -> DeviceProfile {
    DeviceProfile {
        id: "NP2a".into(),
        display_name: "Nothing Phone (2a)".into(),
        zone_count: 26,
        macro_groups: vec![
            MacroGroup::range("1", 0, 23),
            MacroGroup::range("1.1", 0, 7),
            MacroGroup::range("1.2", 8, 15),
            MacroGroup::range("1.3", 16, 23),
            MacroGroup::single("2", 24),
            MacroGroup::single("3", 25),
            MacroGroup::range("All", 0, 25),
        ],
        caution: None,
    }
}
