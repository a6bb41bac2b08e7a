//! Shared configuration for the Daisy CLI.
//!
//! TOML profiles, password resolution (env + keyring + plaintext), and
//! translation to `daisy_core::HubConfig`. The CLI layers its global
//! flags on top of what this crate produces.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use daisy_core::{AckMode, AckPolicy, Credentials, HubConfig, TlsVerification, WhiteLedCommandSet};

/// Keyring service name for stored passwords.
pub const KEYRING_SERVICE: &str = "daisy";

/// Environment variable consulted first for the account password.
pub const PASSWORD_ENV: &str = "DAISY_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use when none is given.
    pub fn default_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }

    /// Look up a profile, falling back to the default profile.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name.unwrap_or_else(|| self.default_profile_name());
        self.profiles
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Wait for device acknowledgment after a command.
    #[serde(default = "default_true")]
    pub wait_for_ack: bool,

    /// Delay between acknowledgment polls, in milliseconds.
    #[serde(default = "default_ack_interval_ms")]
    pub ack_interval_ms: u64,

    #[serde(default = "default_ack_max_attempts")]
    pub ack_max_attempts: u32,

    /// Wall-clock bound of acknowledgment polling, in seconds. 0 disables it.
    #[serde(default = "default_ack_deadline")]
    pub ack_deadline: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            wait_for_ack: true,
            ack_interval_ms: default_ack_interval_ms(),
            ack_max_attempts: default_ack_max_attempts(),
            ack_deadline: default_ack_deadline(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_true() -> bool {
    true
}
fn default_ack_interval_ms() -> u64 {
    500
}
fn default_ack_max_attempts() -> u32 {
    40
}
fn default_ack_deadline() -> u64 {
    30
}

/// A named account profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Profile {
    /// Account e-mail used for `account-login`.
    pub email: Option<String>,

    /// Password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Override the cloud base URL.
    pub base_url: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// White-LED power command ids: "tmate" (146/147) or "legacy" (40/41).
    pub white_led: Option<WhiteLedCommandSet>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "daisy", "daisy").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("daisy");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, then `DAISY_` environment overrides.
///
/// Nested keys use a double underscore: `DAISY_DEFAULTS__TIMEOUT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("DAISY_").ignore(&["PASSWORD"]).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/password"),
    )?)
}

/// Resolve the account password: env var, then keyring, then plaintext.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env, else DAISY_PASSWORD
    let env_name = profile.password_env.as_deref().unwrap_or(PASSWORD_ENV);
    if let Ok(val) = std::env::var(env_name) {
        return Ok(SecretString::from(val));
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a password in the system keyring for `profile_name`.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password)?;
    Ok(())
}

/// Resolve e-mail + password for a profile.
pub fn resolve_credentials(profile: &Profile, profile_name: &str) -> Result<Credentials, ConfigError> {
    let email = profile
        .email
        .clone()
        .or_else(|| std::env::var("DAISY_EMAIL").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;
    let password = resolve_password(profile, profile_name)?;
    Ok(Credentials { email, password })
}

/// Acknowledgment bounds from the global defaults.
pub fn ack_policy(defaults: &Defaults) -> AckPolicy {
    AckPolicy {
        interval: Duration::from_millis(defaults.ack_interval_ms),
        max_attempts: defaults.ack_max_attempts,
        deadline: (defaults.ack_deadline > 0).then(|| Duration::from_secs(defaults.ack_deadline)),
    }
}

/// Build a `HubConfig` from a profile with already-resolved credentials.
pub fn profile_to_hub_config_with(
    profile: &Profile,
    defaults: &Defaults,
    credentials: Credentials,
) -> Result<HubConfig, ConfigError> {
    let mut config = HubConfig::new(credentials);

    if let Some(ref raw) = profile.base_url {
        config.base_url = raw.parse().map_err(|_| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
    }

    config.tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.ack_policy = ack_policy(defaults);
    config.ack_mode = if defaults.wait_for_ack {
        AckMode::Wait
    } else {
        AckMode::FireAndForget
    };
    config.white_led = profile.white_led.unwrap_or_default();
    Ok(config)
}

/// Build a `HubConfig` from a profile, resolving its credentials.
pub fn profile_to_hub_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<HubConfig, ConfigError> {
    let credentials = resolve_credentials(profile, profile_name)?;
    profile_to_hub_config_with(profile, defaults, credentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    fn creds() -> Credentials {
        Credentials {
            email: "me@example.com".into(),
            password: SecretString::from("pw".to_owned()),
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile_name(), "default");
        assert_eq!(cfg.defaults.ack_max_attempts, 40);
        assert!(cfg.defaults.wait_for_ack);
    }

    #[test]
    fn loads_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "home"

[defaults]
timeout = 12
ack_deadline = 0

[profiles.home]
email = "me@example.com"
password = "secret"
white_led = "legacy"
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        let (name, profile) = cfg.profile(None).unwrap();
        assert_eq!(name, "home");
        assert_eq!(profile.email.as_deref(), Some("me@example.com"));
        assert_eq!(profile.white_led, Some(WhiteLedCommandSet::Legacy));
        assert_eq!(cfg.defaults.timeout, 12);
        assert_eq!(ack_policy(&cfg.defaults).deadline, None);
        assert!(matches!(
            cfg.profile(Some("work")),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn save_then_load_preserves_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                email: Some("a@b.c".into()),
                timeout: Some(5),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles, cfg.profiles);
    }

    #[test]
    fn hub_config_applies_profile_and_defaults() {
        let profile = Profile {
            base_url: Some("http://127.0.0.1:9000/".into()),
            insecure: Some(true),
            white_led: Some(WhiteLedCommandSet::Legacy),
            ..Profile::default()
        };
        let defaults = Defaults {
            wait_for_ack: false,
            ..Defaults::default()
        };

        let hub = profile_to_hub_config_with(&profile, &defaults, creds()).unwrap();
        assert_eq!(hub.base_url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(hub.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(hub.ack_mode, AckMode::FireAndForget);
        assert_eq!(hub.white_led, WhiteLedCommandSet::Legacy);
        assert_eq!(hub.ack_policy.interval, Duration::from_millis(500));
        assert_eq!(hub.credentials.password.expose_secret(), "pw");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let profile = Profile {
            base_url: Some("not a url".into()),
            ..Profile::default()
        };
        let err = profile_to_hub_config_with(&profile, &Defaults::default(), creds()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "base_url"));
    }

    #[test]
    fn plaintext_password_is_last_resort() {
        let profile = Profile {
            password: Some("plain".into()),
            password_env: Some("DAISY_TEST_UNSET_PASSWORD_VAR".into()),
            ..Profile::default()
        };
        // No env var and (in CI) no keyring entry for this profile name.
        let pw = resolve_password(&profile, "daisy-config-test-profile").unwrap();
        assert_eq!(pw.expose_secret(), "plain");
    }
}
