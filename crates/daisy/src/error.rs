//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use daisy_config::ConfigError;
use daisy_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Daisy cloud: {reason}")]
    #[diagnostic(
        code(daisy::connection_failed),
        help(
            "Check your network connection.\n\
             Use --base-url to point at a different endpoint, or -vv for request logs."
        )
    )]
    ConnectionFailed { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(daisy::auth_failed),
        help(
            "Verify the e-mail and password of profile '{profile}'.\n\
             Run: daisy config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(daisy::no_credentials),
        help(
            "Configure credentials with: daisy config init\n\
             Or set DAISY_EMAIL and DAISY_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(daisy::not_found),
        help("Run: daisy {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(
        code(daisy::unsupported),
        help("Use `daisy lights` for lights and `daisy covers` for covers.")
    )]
    Unsupported { message: String },

    // ── Commands ─────────────────────────────────────────────────────
    #[error("Command rejected by the cloud ({message_id})")]
    #[diagnostic(code(daisy::command_rejected), help("Server response: {message}"))]
    CommandRejected { message_id: String, message: String },

    #[error("Device reported a failure: {message_text}")]
    #[diagnostic(code(daisy::device_failed))]
    DeviceFailed { message_text: String },

    #[error("Device did not acknowledge after {attempts} polls ({elapsed_ms} ms)")]
    #[diagnostic(
        code(daisy::ack_timeout),
        help(
            "The command may still run. Raise `ack_max_attempts` / `ack_deadline`\n\
             in the config, or use --no-wait to skip acknowledgment."
        )
    )]
    AckTimeout { attempts: u32, elapsed_ms: u128 },

    #[error("Interrupted")]
    #[diagnostic(code(daisy::cancelled))]
    Cancelled,

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(daisy::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(daisy::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(daisy::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: daisy config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No configuration found")]
    #[diagnostic(
        code(daisy::no_config),
        help(
            "Create one with: daisy config init\n\
             Expected at: {path}\n\
             Or pass --email and set DAISY_PASSWORD."
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(daisy::config))]
    Config { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::AckTimeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::Unsupported { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                profile: "current".into(),
                message,
            },

            CoreError::NotLoggedIn => CliError::AuthFailed {
                profile: "current".into(),
                message: "no session".into(),
            },

            CoreError::Transport { reason } => CliError::ConnectionFailed { reason },

            CoreError::InstallationNotFound { identifier } => CliError::NotFound {
                resource_type: "installation".into(),
                identifier,
                list_command: "installations list".into(),
            },

            CoreError::DeviceNotFound { identifier } => CliError::NotFound {
                resource_type: "device".into(),
                identifier,
                list_command: "devices list".into(),
            },

            err @ CoreError::UnsupportedDeviceType { .. } => CliError::Unsupported {
                message: err.to_string(),
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::CommandRejected {
                message_id,
                message,
            } => CliError::CommandRejected {
                message_id,
                message,
            },

            CoreError::AckProtocol { message_id } => CliError::ApiError {
                code: message_id,
                message: "unexpected acknowledgment reply".into(),
            },

            CoreError::AckTimeout {
                attempts,
                elapsed_ms,
            } => CliError::AckTimeout {
                attempts,
                elapsed_ms,
            },

            CoreError::Cancelled => CliError::Cancelled,

            CoreError::Api { message, code } => CliError::ApiError {
                code: code.unwrap_or_default(),
                message,
            },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
