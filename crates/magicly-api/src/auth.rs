use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tokio::time::Instant;

/// How long a MagicInfo token is trusted before a fresh exchange is forced.
pub const TOKEN_TTL: Duration = Duration::from_secs(1500);

/// Username/password pair exchanged for a bearer token at `POST auth`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// Both halves present. An incomplete pair never reaches the server.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.expose_secret().is_empty()
    }
}

/// A bearer token together with the instant it was issued.
///
/// Validity is purely local: the server is never asked whether a token
/// is still good, it is simply replaced once `ttl` has elapsed.
#[derive(Debug, Clone)]
pub struct AuthSession {
    token: SecretString,
    issued_at: Instant,
    ttl: Duration,
}

impl AuthSession {
    pub fn new(token: SecretString, ttl: Duration) -> Self {
        Self {
            token,
            issued_at: Instant::now(),
            ttl,
        }
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    /// `now - issued_at < ttl`.
    pub fn is_valid(&self) -> bool {
        self.issued_at.elapsed() < self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_credentials() {
        let empty_user = Credentials::new("", SecretString::from("pw".to_string()));
        let empty_pass = Credentials::new("admin", SecretString::from(String::new()));
        let full = Credentials::new("admin", SecretString::from("pw".to_string()));
        assert!(!empty_user.is_complete());
        assert!(!empty_pass.is_complete());
        assert!(full.is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn session_expires_after_ttl() {
        let session = AuthSession::new(SecretString::from("t".to_string()), TOKEN_TTL);
        assert!(session.is_valid());

        tokio::time::advance(TOKEN_TTL - Duration::from_secs(1)).await;
        assert!(session.is_valid());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!session.is_valid());
    }
}
