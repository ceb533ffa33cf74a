//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use magicly_config::ConfigError;
use magicly_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    #[allow(dead_code)]
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const DEVICE: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the MagicInfo server at {target}")]
    #[diagnostic(
        code(magicly::connection_failed),
        help(
            "Check that the server is running and reachable.\n\
             Reason: {reason}\n\
             Try: magicly ping"
        )
    )]
    ConnectionFailed { target: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(magicly::auth_failed),
        help("Check the username and password for profile '{profile}'.")
    )]
    AuthFailed { profile: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(magicly::no_credentials),
        help(
            "Set username in the profile and provide a password via:\n\
             - --password flag or MAGICLY_PASSWORD\n\
             - password_env in the profile\n\
             - magicly config set-password\n\
             - password in the config file (plaintext)"
        )
    )]
    NoCredentials { profile: String },

    // ── Devices ──────────────────────────────────────────────────────

    #[error("Device '{device_id}' not found")]
    #[diagnostic(
        code(magicly::not_found),
        help("Run: magicly devices list")
    )]
    DeviceNotFound { device_id: String },

    #[error("Property '{property}' cannot be controlled")]
    #[diagnostic(
        code(magicly::unsupported_property),
        help("Run: magicly devices get <device> to see the available controls")
    )]
    UnsupportedProperty { property: String },

    #[error("Device '{device_id}' is disconnected")]
    #[diagnostic(
        code(magicly::device_disconnected),
        help("The server cannot reach this display; controls are refused until it reconnects.")
    )]
    DeviceDisconnected { device_id: String },

    #[error("Device '{device_id}' did not apply {property}: {reason}")]
    #[diagnostic(code(magicly::control_rejected))]
    ControlRejected {
        device_id: String,
        property: String,
        reason: String,
    },

    #[error("No confirmation for {property} on '{device_id}' after {attempts} attempts")]
    #[diagnostic(
        code(magicly::control_timeout),
        help("The write may still apply; check again with: magicly devices get {device_id}")
    )]
    ControlTimeout {
        device_id: String,
        property: String,
        attempts: u32,
    },

    #[error("{applied} of {total} control changes applied")]
    #[diagnostic(
        code(magicly::batch_incomplete),
        help("Re-run with -v to see why individual changes failed.")
    )]
    BatchIncomplete { applied: usize, total: usize },

    // ── API ──────────────────────────────────────────────────────────

    #[error("MagicInfo API error: {message}")]
    #[diagnostic(code(magicly::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(magicly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(magicly::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No server configured")]
    #[diagnostic(
        code(magicly::no_config),
        help(
            "Pass --server, set MAGICLY_SERVER, or add a profile to\n\
             {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(magicly::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(magicly::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(magicly::output))]
    Render(String),

    #[error("Failed to write config: {0}")]
    #[diagnostic(code(magicly::config_write))]
    ConfigWrite(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::DeviceNotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::UnsupportedProperty { .. } => exit_code::UNSUPPORTED,
            Self::DeviceDisconnected { .. }
            | Self::ControlRejected { .. }
            | Self::BatchIncomplete { .. } => exit_code::DEVICE,
            Self::ControlTimeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingCredentials => CliError::NoCredentials {
                profile: "current".into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                profile: "current".into(),
                message,
            },

            CoreError::TransportTimeout { target, reason } => {
                CliError::ConnectionFailed { target, reason }
            }

            CoreError::UnknownDevice { device_id } => CliError::DeviceNotFound { device_id },

            CoreError::UnsupportedProperty { property } => {
                CliError::UnsupportedProperty { property }
            }

            CoreError::DeviceDisconnected { device_id } => {
                CliError::DeviceDisconnected { device_id }
            }

            CoreError::InvalidValue {
                property,
                value,
                reason,
            } => CliError::Validation {
                field: property,
                reason: format!("'{value}': {reason}"),
            },

            CoreError::ControlConfirmationFailure {
                device_id,
                property,
                reason,
            } => CliError::ControlRejected {
                device_id,
                property,
                reason,
            },

            CoreError::ControlConfirmationTimeout {
                device_id,
                property,
                attempts,
            } => CliError::ControlTimeout {
                device_id,
                property,
                attempts,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            other @ (CoreError::IdentityResolution { .. }
            | CoreError::DetailFetch { .. }
            | CoreError::AdapterStopped
            | CoreError::Api { .. }
            | CoreError::Internal(_)) => CliError::ApiError {
                message: other.to_string(),
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
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
            ConfigError::Serialization(e) => CliError::ConfigWrite(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_failures_map_to_device_exit_codes() {
        let rejected: CliError = CoreError::ControlConfirmationFailure {
            device_id: "d1".into(),
            property: "Sound#Volume".into(),
            reason: "failList".into(),
        }
        .into();
        assert_eq!(rejected.exit_code(), exit_code::DEVICE);

        let timeout: CliError = CoreError::ControlConfirmationTimeout {
            device_id: "d1".into(),
            property: "Sound#Volume".into(),
            attempts: 30,
        }
        .into();
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);
    }

    #[test]
    fn auth_and_lookup_errors() {
        let auth: CliError = CoreError::MissingCredentials.into();
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let unknown: CliError = CoreError::UnknownDevice {
            device_id: "nope".into(),
        }
        .into();
        assert_eq!(unknown.exit_code(), exit_code::NOT_FOUND);

        let invalid: CliError = CoreError::InvalidValue {
            property: "Sound#Volume".into(),
            value: "loud".into(),
            reason: "not a number".into(),
        }
        .into();
        assert_eq!(invalid.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn fetch_errors_are_general() {
        let err: CliError = CoreError::DetailFetch {
            message: "boom".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::GENERAL);
        assert!(err.to_string().contains("boom"));
    }
}
