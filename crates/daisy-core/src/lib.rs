//! Domain layer between `daisy-api` and its consumers (the `daisy` CLI).
//!
//! - **[`Hub`]**: facade owning the HTTP client and the current session.
//!   [`login()`](Hub::login) authenticates, [`refresh()`](Hub::refresh)
//!   fetches installations, rooms and devices into the [`Directory`], and
//!   action methods (`turn_on`, `open_cover`, ...) build and dispatch
//!   command batches, resolving them through the acknowledgment poller.
//!
//! - **[`Directory`]**: `DashMap`-backed registry of the fetched hierarchy,
//!   indexed by installation id and installation-device id.
//!
//! - **Domain model** ([`model`]): [`Installation`], [`Room`] and the
//!   [`Device`] tagged union over [`Light`] and [`Cover`], selected once
//!   from the device-type code.
//!
//! - **[`codec`]**: status-item decoding and the `A###R###G###B###` color
//!   string.
//!
//! - **[`command`]**: pure command tables keyed by device type and action.

pub mod codec;
pub mod command;
pub mod config;
pub mod convert;
pub mod directory;
pub mod error;
pub mod hub;
pub mod model;

// ── Primary re-exports ──────────────────────────────────────────────
pub use codec::{
    ClosedState, Color, StatusCode, StatusItem, StatusUpdate, decode_color, decode_status_list,
    encode_color,
};
pub use command::{
    Action, Channel, CommandAction, CommandBatch, CommandSpec, CommandTable, DeviceCommand,
    LevelStep,
};
pub use config::{Credentials, HubConfig, TlsVerification, WhiteLedCommandSet};
pub use directory::Directory;
pub use error::CoreError;
pub use hub::Hub;
pub use model::{
    Cover, CoverState, Device, DeviceInfo, DeviceType, Installation, Light, LightState, Rgb, Room,
};

// Ack types travel through the core API unchanged.
pub use daisy_api::{AckMode, AckOutcome, AckPolicy, Session};
