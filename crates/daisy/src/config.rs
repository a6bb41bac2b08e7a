//! CLI configuration -- thin wrapper around `daisy_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` overrides (--email,
//! --base-url, --timeout, --insecure, --no-wait).

use std::time::Duration;

use daisy_core::{AckMode, Credentials, HubConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use daisy_config::{
    Config, Defaults, Profile, config_path, load_config, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `HubConfig` from the config file, active profile and flags.
///
/// Without a matching profile the hub is built from flags and
/// environment alone; the e-mail is then mandatory.
pub fn resolve_hub_config(global: &GlobalOpts) -> Result<HubConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(p) => p.clone(),
        None if global.email.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
            names.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    resolve_profile(&profile, &profile_name, &cfg.defaults, global)
}

/// Translate a `Profile` + global flags into a `HubConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<HubConfig, CliError> {
    // 1. Credentials (flag > env > profile)
    let email = global
        .email
        .clone()
        .or_else(|| profile.email.clone())
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.into(),
        })?;
    let password = daisy_config::resolve_password(profile, profile_name)?;

    let mut hub =
        daisy_config::profile_to_hub_config_with(profile, defaults, Credentials { email, password })?;

    // 2. Base URL
    if let Some(ref raw) = global.base_url {
        hub.base_url = raw.parse().map_err(|_| CliError::Validation {
            field: "base-url".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
    }

    // 3. TLS
    if global.insecure {
        hub.tls = TlsVerification::DangerAcceptInvalid;
    }

    // 4. Timeout
    if let Some(secs) = global.timeout {
        hub.timeout = Duration::from_secs(secs);
    }

    // 5. Acknowledgment
    if global.no_wait {
        hub.ack_mode = AckMode::FireAndForget;
    }

    Ok(hub)
}
