// daisy-api: Async Rust client for the Teleco Daisy (tmate) cloud API

pub mod ack;
pub mod auth;
pub mod client;
pub mod commands;
pub mod error;
pub mod installations;
pub mod models;
pub mod rooms;
pub mod session;
pub mod status;
pub mod transport;

pub use ack::{AckMode, AckOutcome, AckPolicy, AckText};
pub use auth::{ServiceCredentials, Session};
pub use client::{DEFAULT_BASE_URL, DaisyClient};
pub use error::Error;
pub use models::{ActionReference, CommandRequest, RawDevice, RawInstallation, RawRoom, RawStatusItem};
pub use transport::{TlsMode, TransportConfig};
