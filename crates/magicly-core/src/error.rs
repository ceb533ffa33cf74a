// ── Core error types ──
//
// Adapter-facing errors from magicly-core. Callers never see HTTP status
// codes or JSON parse failures directly: the `From<magicly_api::Error>` impl
// translates transport-layer errors into the adapter taxonomy.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Credential errors ────────────────────────────────────────────
    #[error("Username and password must be configured")]
    MissingCredentials,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Transport errors ─────────────────────────────────────────────
    #[error("Cannot reach {target}: {reason}")]
    TransportTimeout { target: String, reason: String },

    // ── Fleet errors ─────────────────────────────────────────────────
    #[error("Device identity resolution failed: {message}")]
    IdentityResolution { message: String },

    #[error("Device detail fetch failed: {message}")]
    DetailFetch { message: String },

    // ── Control errors ───────────────────────────────────────────────
    #[error("Device not found: {device_id}")]
    UnknownDevice { device_id: String },

    #[error("Property '{property}' is not controllable")]
    UnsupportedProperty { property: String },

    #[error("Device {device_id} is disconnected")]
    DeviceDisconnected { device_id: String },

    #[error("Invalid value '{value}' for {property}: {reason}")]
    InvalidValue {
        property: String,
        value: String,
        reason: String,
    },

    #[error("Device {device_id} did not apply {property}: {reason}")]
    ControlConfirmationFailure {
        device_id: String,
        property: String,
        reason: String,
    },

    #[error("No confirmation for {property} on {device_id} after {attempts} attempts")]
    ControlConfirmationTimeout {
        device_id: String,
        property: String,
        attempts: u32,
    },

    // ── Lifecycle errors ─────────────────────────────────────────────
    #[error("Adapter stopped")]
    AdapterStopped,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Credential or token errors, fatal for the current statistics cycle.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::MissingCredentials | Self::AuthenticationFailed { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<magicly_api::Error> for CoreError {
    fn from(err: magicly_api::Error) -> Self {
        match err {
            magicly_api::Error::MissingCredentials => CoreError::MissingCredentials,
            magicly_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            magicly_api::Error::Transport(ref e) if e.is_timeout() || e.is_connect() => {
                CoreError::TransportTimeout {
                    target: e
                        .url()
                        .map_or_else(|| "<unknown>".into(), ToString::to_string),
                    reason: e.to_string(),
                }
            }
            magicly_api::Error::Transport(e) => CoreError::Api {
                message: e.to_string(),
                status: e.status().map(|s| s.as_u16()),
            },
            magicly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            magicly_api::Error::Timeout { timeout_secs } => CoreError::TransportTimeout {
                target: String::new(),
                reason: format!("no response after {timeout_secs}s"),
            },
            magicly_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            magicly_api::Error::Api { message, status } => CoreError::Api { message, status },
            magicly_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
