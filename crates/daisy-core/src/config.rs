// ── Runtime connection configuration ──
//
// These types describe *how* to reach the Daisy cloud and how commands
// behave. They carry credential data and tuning, but never touch disk.
// The CLI constructs a `HubConfig` and hands it in.

use std::time::Duration;

use daisy_api::{AckMode, AckPolicy};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

/// User credentials for `account-login`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// Bundled root store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification. Only for debugging proxies.
    DangerAcceptInvalid,
}

/// Which command ids white-LED power on/off uses.
///
/// Two generations of the vendor client disagree: the older one sends
/// 40/41, the newer one 146/147. Both are kept; `Tmate` is the default.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum WhiteLedCommandSet {
    #[default]
    Tmate,
    Legacy,
}

/// Configuration for one hub (one user session).
///
/// Built by the CLI, passed to `Hub` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Service root (e.g. `https://tmate.telecoautomation.com/`).
    pub base_url: Url,
    /// Account credentials.
    pub credentials: Credentials,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Bounds of acknowledgment polling.
    pub ack_policy: AckPolicy,
    /// Default acknowledgment mode for action methods.
    pub ack_mode: AckMode,
    /// White-LED power command ids.
    pub white_led: WhiteLedCommandSet,
}

impl HubConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: Url::parse(daisy_api::DEFAULT_BASE_URL).expect("static base URL is valid"),
            credentials,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            ack_policy: AckPolicy::default(),
            ack_mode: AckMode::default(),
            white_led: WhiteLedCommandSet::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }
}
