// MagicInfo REST HTTP client
//
// Wraps `reqwest::Client` with v2.0 URL construction, the token gate, and
// envelope unwrapping. Endpoint groups (auth, dashboard, devices, display)
// are inherent methods in sibling files so this module stays focused on
// transport mechanics.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{AuthSession, Credentials, TOKEN_TTL};
use crate::error::Error;
use crate::rest::models::ApiResponse;
use crate::transport::TransportConfig;

/// Path prefix shared by every REST v2.0 endpoint.
pub(crate) const API_PREFIX: &str = "MagicInfo/restapi/v2.0";

/// Header carrying the bearer token on every authenticated request.
pub(crate) const API_KEY_HEADER: &str = "api_key";

/// Raw HTTP client for a MagicInfo Server.
///
/// Every public endpoint method first passes the token gate: if no token is
/// held, or the held one is older than the configured TTL, a synchronous
/// `POST auth` happens before the actual request. The envelope is stripped
/// before the caller sees the payload.
pub struct MagicInfoClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    token_ttl: Duration,
    session: Mutex<Option<AuthSession>>,
}

impl MagicInfoClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the server root (e.g. `https://magicinfo.local:7001`);
    /// the `MagicInfo/restapi/v2.0/` prefix is appended per request.
    pub fn new(
        base_url: Url,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, credentials))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, credentials: Credentials) -> Self {
        Self {
            http,
            base_url,
            credentials,
            token_ttl: TOKEN_TTL,
            session: Mutex::new(None),
        }
    }

    /// Override the token lifetime (defaults to [`TOKEN_TTL`]).
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── Token gate ───────────────────────────────────────────────────

    /// Make sure a non-expired token is held, exchanging credentials if not.
    ///
    /// Fails with [`Error::MissingCredentials`] before any network traffic
    /// when the username or password is empty.
    pub async fn ensure_token(&self) -> Result<(), Error> {
        self.token().await.map(|_| ())
    }

    /// Forget the held token; the next call re-authenticates.
    pub async fn invalidate_token(&self) {
        if self.session.lock().await.take().is_some() {
            debug!("token discarded");
        }
    }

    /// Current token, refreshed through `POST auth` when absent or expired.
    async fn token(&self) -> Result<SecretString, Error> {
        if !self.credentials.is_complete() {
            return Err(Error::MissingCredentials);
        }

        let mut session = self.session.lock().await;
        if let Some(active) = session.as_ref().filter(|s| s.is_valid()) {
            return Ok(active.token().clone());
        }

        trace!("token absent or expired, re-authenticating");
        let token = self.login().await?;
        *session = Some(AuthSession::new(token.clone(), self.token_ttl));
        Ok(token)
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL: `{base}/MagicInfo/restapi/v2.0/{path}`.
    ///
    /// `path` may carry a query string (`rms/devices?pageSize=1000`).
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{API_PREFIX}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send an authenticated GET and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let token = self.token().await?;
        let url = self.api_url(path)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .header(API_KEY_HEADER, token.expose_secret())
            .send()
            .await
            .map_err(Error::Transport)?;

        self.parse_envelope(resp).await
    }

    /// Send an authenticated POST with JSON body and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let token = self.token().await?;
        let url = self.api_url(path)?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .header(API_KEY_HEADER, token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        self.parse_envelope(resp).await
    }

    /// Send an authenticated PUT with JSON body and unwrap the envelope.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let token = self.token().await?;
        let url = self.api_url(path)?;
        debug!("PUT {}", url);

        let resp = self
            .http
            .put(url)
            .header(API_KEY_HEADER, token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        self.parse_envelope(resp).await
    }

    /// Parse the `{ status, items }` envelope, returning `items` on success
    /// or an `Error::Api` if `status != "Success"`.
    ///
    /// A 401 drops the held token so the next call goes through `POST auth`.
    async fn parse_envelope<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.invalidate_token().await;
            return Err(Error::Authentication {
                message: "token rejected by server".into(),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                message: format!("HTTP {status}: {}", preview(&body)),
                status: Some(status.as_u16()),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        let envelope: ApiResponse = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })?;

        if !envelope.is_success() {
            return Err(Error::Api {
                message: envelope
                    .error_message
                    .or(envelope.error_code)
                    .unwrap_or_else(|| format!("status={}", envelope.status)),
                status: None,
            });
        }

        serde_json::from_value(envelope.items).map_err(|e| Error::Deserialization {
            message: format!("unexpected items shape: {e}"),
            body,
        })
    }
}

/// First 200 characters of a body, cut on a char boundary.
pub(crate) fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
