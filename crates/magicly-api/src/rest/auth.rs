// Token exchange
//
// `POST auth` trades username/password for a bearer token. The response is
// the only one not wrapped in the `{status, items}` envelope.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::rest::client::{MagicInfoClient, preview};
use crate::rest::models::TokenResponse;

impl MagicInfoClient {
    /// Exchange the configured credentials for a fresh token.
    ///
    /// Does not store the token; the token gate in the client does that.
    /// Any transport or parse failure is reported as
    /// [`Error::Authentication`], since it leaves the adapter without a token.
    pub async fn login(&self) -> Result<SecretString, Error> {
        let url = self.api_url("auth")?;
        debug!("logging in at {}", url);

        let credentials = self.credentials();
        let body = json!({
            "username": credentials.username,
            "password": credentials.password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Authentication {
                message: format!("token request failed: {e}"),
            })?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {}", preview(&text)),
            });
        }

        let parsed: TokenResponse =
            serde_json::from_str(&text).map_err(|e| Error::Authentication {
                message: format!("unreadable token response: {e}"),
            })?;

        match parsed.token.filter(|t| !t.is_empty()) {
            Some(token) => {
                debug!("login successful");
                Ok(SecretString::from(token))
            }
            None => Err(Error::Authentication {
                message: "token missing from auth response".into(),
            }),
        }
    }
}
