// tmate cloud HTTP client
//
// Wraps `reqwest::Client` with service Basic-Auth, URL construction under
// `teleco/services/`, HTTP status checking and `codEsito` envelope
// unwrapping. Endpoint groups (session, installations, rooms, status,
// commands) are inherent methods in separate files so this module stays
// focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::ServiceCredentials;
use crate::error::Error;
use crate::models::{QUERY_SUCCESS, QueryResponse};
use crate::session::LOGIN_PATH;
use crate::transport::TransportConfig;

/// Default public endpoint of the tmate cloud.
pub const DEFAULT_BASE_URL: &str = "https://tmate.telecoautomation.com/";

const SERVICES_PREFIX: &str = "teleco/services/";

/// Raw HTTP client for the Daisy cloud API.
///
/// Stateless with respect to the user: the [`Session`](crate::Session) is
/// passed into each call, so one client can serve several sessions.
#[derive(Debug, Clone)]
pub struct DaisyClient {
    http: reqwest::Client,
    base_url: Url,
    service: ServiceCredentials,
}

impl DaisyClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the service root (e.g. [`DEFAULT_BASE_URL`]); a
    /// missing trailing slash is added.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url),
            service: ServiceCredentials::default(),
        }
    }

    /// Replace the service Basic-Auth credential.
    pub fn with_service_credentials(mut self, service: ServiceCredentials) -> Self {
        self.service = service;
        self
    }

    /// The service root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}teleco/services/{path}`
    pub(crate) fn service_url(&self, path: &str) -> Result<Url, Error> {
        let url = self.base_url.join(SERVICES_PREFIX)?.join(path)?;
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// POST a JSON body and return the raw response text.
    ///
    /// Any non-2xx status becomes [`Error::Http`].
    pub(crate) async fn post_text(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<String, Error> {
        let url = self.service_url(path)?;
        debug!("POST {}", url);

        let builder = self
            .http
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body);
        let resp = self
            .service
            .apply(builder)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        let text = resp.text().await.map_err(Error::Transport)?;
        trace!(%status, body = %traced_body(path, &text), "response");

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                path: path.to_owned(),
                body: preview(&text).to_owned(),
            });
        }
        Ok(text)
    }

    /// POST and deserialize the body as `T` (no envelope check).
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let text = self.post_text(path, body).await?;
        parse_body(&text)
    }

    /// POST to a query endpoint and unwrap `valRisultato`.
    ///
    /// A `codEsito` other than `"S"` becomes [`Error::Api`] carrying the
    /// raw payload.
    pub(crate) async fn query<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let text = self.post_text(path, body).await?;
        let envelope: QueryResponse<T> = parse_body(&text)?;

        if envelope.cod_esito != QUERY_SUCCESS {
            return Err(Error::Api {
                path: path.to_owned(),
                code: envelope.cod_esito,
                payload: text,
            });
        }

        envelope.val_risultato.ok_or_else(|| Error::Deserialization {
            message: format!("{path}: success envelope without valRisultato"),
            body: text,
        })
    }
}

pub(crate) fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, Error> {
    serde_json::from_str(text).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(text)),
        body: text.to_owned(),
    })
}

/// Response body as it may appear in trace output. The login reply
/// carries the session id and is never echoed.
fn traced_body<'a>(path: &str, text: &'a str) -> &'a str {
    if path == LOGIN_PATH {
        "<withheld>"
    } else {
        preview(text)
    }
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(200) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
