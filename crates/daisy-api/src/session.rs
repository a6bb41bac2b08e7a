// Account login
//
// The only endpoint that takes user credentials. Success yields the
// account id and session id every other call needs.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::auth::Session;
use crate::client::{DaisyClient, parse_body};
use crate::error::Error;
use crate::models::{LoginResult, QUERY_SUCCESS, QueryResponse};

pub(crate) const LOGIN_PATH: &str = "account-login";

impl DaisyClient {
    /// Authenticate with email and password.
    ///
    /// `POST teleco/services/account-login` with `{"email", "pwd"}`.
    /// Any `codEsito` other than `"S"` is [`Error::Authentication`] carrying
    /// the raw server payload. No retry is attempted.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session, Error> {
        debug!(email, "logging in");

        let body = json!({
            "email": email,
            "pwd": password.expose_secret(),
        });
        let text = self.post_text(LOGIN_PATH, &body).await?;
        let envelope: QueryResponse<LoginResult> = parse_body(&text)?;

        if envelope.cod_esito != QUERY_SUCCESS {
            return Err(Error::Authentication {
                code: envelope.cod_esito,
                payload: text,
            });
        }

        let result = envelope.val_risultato.ok_or_else(|| Error::Authentication {
            code: QUERY_SUCCESS.into(),
            payload: text.clone(),
        })?;

        debug!(account_id = result.id_account, "login successful");
        Ok(Session::new(result.id_account, result.id_session))
    }
}
