use thiserror::Error;

/// Top-level error type for the `daisy-api` crate.
///
/// Covers every failure mode of the cloud API: authentication, transport,
/// query envelopes, command submission and acknowledgment polling.
/// `daisy-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected. Carries the raw server payload.
    #[error("Authentication failed (codEsito={code}): {payload}")]
    Authentication { code: String, payload: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx HTTP status from the service.
    #[error("HTTP {status} from {path}: {body}")]
    Http {
        status: u16,
        path: String,
        body: String,
    },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Query API ───────────────────────────────────────────────────
    /// A query endpoint answered with a non-success result code.
    #[error("API error on {path} (codEsito={code}): {payload}")]
    Api {
        path: String,
        code: String,
        payload: String,
    },

    // ── Command API ─────────────────────────────────────────────────
    /// The command batch was not accepted.
    #[error("Command batch rejected (MessageID={message_id}): {payload}")]
    CommandRejected { message_id: String, payload: String },

    /// The acknowledgment endpoint answered with an unexpected message id.
    #[error("Unexpected acknowledgment MessageID {message_id} (expected WS-300)")]
    AckProtocol { message_id: String },

    /// Acknowledgment polling exceeded its attempt or time bound.
    #[error("No acknowledgment after {attempts} polls ({elapsed_ms} ms)")]
    AckTimeout { attempts: u32, elapsed_ms: u128 },

    /// The caller cancelled acknowledgment polling.
    #[error("Acknowledgment polling cancelled")]
    Cancelled,

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if logging in again might resolve this error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The server result code, if the error carries one.
    pub fn result_code(&self) -> Option<&str> {
        match self {
            Self::Authentication { code, .. } | Self::Api { code, .. } => Some(code),
            Self::CommandRejected { message_id, .. } | Self::AckProtocol { message_id } => {
                Some(message_id)
            }
            _ => None,
        }
    }
}
