use secrecy::{ExposeSecret, SecretString};

/// Service-level Basic-Auth credential sent with every request.
///
/// This is a fixed credential of the tmate cloud, not the user's login.
/// The user's email and password travel in the body of `account-login`.
#[derive(Debug, Clone)]
pub struct ServiceCredentials {
    pub username: String,
    pub password: SecretString,
}

impl Default for ServiceCredentials {
    fn default() -> Self {
        Self {
            username: "teleco".into(),
            password: SecretString::from("tmate20".to_owned()),
        }
    }
}

impl ServiceCredentials {
    pub(crate) fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.basic_auth(&self.username, Some(self.password.expose_secret()))
    }
}

/// An authenticated user session.
///
/// Produced by [`DaisyClient::login`](crate::DaisyClient::login) and passed
/// explicitly to every other call. Never persisted; a new login yields a
/// new session and leaves previously fetched ids valid for command
/// construction.
#[derive(Debug, Clone)]
pub struct Session {
    pub account_id: i64,
    pub session_id: SecretString,
}

impl Session {
    pub fn new(account_id: i64, session_id: impl Into<String>) -> Self {
        Self {
            account_id,
            session_id: SecretString::from(session_id.into()),
        }
    }

    pub(crate) fn id(&self) -> &str {
        self.session_id.expose_secret()
    }
}
