// ── Core error types ──
//
// User-facing errors from daisy-core. Consumers never see HTTP status
// codes or JSON parse failures directly. The `From<daisy_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not logged in -- call login() first")]
    NotLoggedIn,

    // ── Transport errors ─────────────────────────────────────────────
    #[error("Transport error: {reason}")]
    Transport { reason: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Installation not found: {identifier}")]
    InstallationNotFound { identifier: String },

    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    // ── Command errors ───────────────────────────────────────────────
    #[error("Device type {type_code} does not support {action}")]
    UnsupportedDeviceType { type_code: i64, action: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Command rejected ({message_id}): {message}")]
    CommandRejected { message_id: String, message: String },

    #[error("Acknowledgment protocol error: unexpected MessageID {message_id}")]
    AckProtocol { message_id: String },

    #[error("No acknowledgment after {attempts} polls ({elapsed_ms} ms)")]
    AckTimeout { attempts: u32, elapsed_ms: u128 },

    #[error("Operation cancelled")]
    Cancelled,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// The service result code (`codEsito`), if any.
        code: Option<String>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<daisy_api::Error> for CoreError {
    fn from(err: daisy_api::Error) -> Self {
        match err {
            daisy_api::Error::Authentication { code, payload } => CoreError::AuthenticationFailed {
                message: format!("login rejected (codEsito={code}): {payload}"),
            },
            daisy_api::Error::Transport(e) => CoreError::Transport {
                reason: e.to_string(),
            },
            daisy_api::Error::Http { status, path, body } => CoreError::Transport {
                reason: format!("HTTP {status} from {path}: {body}"),
            },
            daisy_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            daisy_api::Error::Tls(msg) => CoreError::Transport {
                reason: format!("TLS error: {msg}"),
            },
            daisy_api::Error::Api {
                path,
                code,
                payload,
            } => CoreError::Api {
                message: format!("{path} failed: {payload}"),
                code: Some(code),
            },
            daisy_api::Error::CommandRejected {
                message_id,
                payload,
            } => CoreError::CommandRejected {
                message_id,
                message: payload,
            },
            daisy_api::Error::AckProtocol { message_id } => CoreError::AckProtocol { message_id },
            daisy_api::Error::AckTimeout {
                attempts,
                elapsed_ms,
            } => CoreError::AckTimeout {
                attempts,
                elapsed_ms,
            },
            daisy_api::Error::Cancelled => CoreError::Cancelled,
            daisy_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
