//! `gc-device` -- Device profiles for the glyph composer.
//!
//! Each supported phone is described by a [`DeviceProfile`]: how many zones it
//! exposes and which named macro groups ("buttons") fill which zones. Profiles
//! are plain data; callers consume macro groups generically instead of
//! branching per device.
//!
//! ```rust
//! use gc_device::DeviceRegistry;
//!
//! let np1 = DeviceRegistry::builtin().get("NP1").unwrap();
//! assert_eq!(np1.zone_count, 5);
//! ```

pub mod profile;
pub mod registry;

pub use profile::{DeviceProfile, MacroGroup, ZoneSpan};
pub use registry::{DeviceRegistry, DEFAULT_DEVICE_ID};
