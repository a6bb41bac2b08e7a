// ── Domain model ──
//
// Canonical types built from the raw wire models of `daisy-api`.
// Devices are split into a fixed variant set at fetch time.

pub mod device;
pub mod installation;
pub mod room;

pub use device::{Cover, CoverState, Device, DeviceInfo, DeviceType, Light, LightState, Rgb};
pub use installation::Installation;
pub use room::Room;
