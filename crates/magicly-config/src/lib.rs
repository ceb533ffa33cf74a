//! Shared configuration for the magicly CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `magicly_core::AdapterConfig`. The CLI layers its
//! `GlobalOpts` flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use magicly_core::config::split_csv;
use magicly_core::{
    AdapterConfig, Credentials, DeviceFilters, PingConfig, RefreshTuning, TlsVerification,
};

/// Keyring service name; entries are `{profile}/password`.
pub const KEYRING_SERVICE: &str = "magicly";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named MagicInfo server profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Server base URL (e.g., "https://magicinfo.local:7001").
    pub server: String,

    pub username: Option<String>,

    /// Password (plaintext; prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,

    #[serde(default)]
    pub filters: FilterSettings,

    /// Comma-separated property names reported as time series.
    pub historical_properties: Option<String>,

    #[serde(default)]
    pub refresh: RefreshSettings,

    #[serde(default)]
    pub ping: PingSettings,
}

/// Device selection, comma-separated labels per dimension.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FilterSettings {
    #[serde(default)]
    pub device_types: String,
    #[serde(default)]
    pub sources: String,
    #[serde(default)]
    pub functions: String,
}

/// Optional refresh pacing overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RefreshSettings {
    pub tick_ms: Option<u64>,
    pub cooldown_secs: Option<u64>,
    pub inactivity_secs: Option<u64>,
    pub confirm_attempts: Option<u32>,
    pub confirm_interval_ms: Option<u64>,
}

impl RefreshSettings {
    fn apply(&self, tuning: &mut RefreshTuning) {
        if let Some(ms) = self.tick_ms {
            tuning.tick = Duration::from_millis(ms.max(1));
        }
        if let Some(secs) = self.cooldown_secs {
            tuning.cooldown = Duration::from_secs(secs);
        }
        if let Some(secs) = self.inactivity_secs {
            tuning.inactivity_timeout = Duration::from_secs(secs);
        }
        if let Some(n) = self.confirm_attempts {
            tuning.confirm_attempts = n.max(1);
        }
        if let Some(ms) = self.confirm_interval_ms {
            tuning.confirm_interval = Duration::from_millis(ms);
        }
    }
}

/// Optional TCP ping overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PingSettings {
    pub port: Option<u16>,
    pub attempts: Option<u32>,
    pub timeout_ms: Option<u64>,
}

impl PingSettings {
    fn to_ping_config(&self) -> PingConfig {
        let defaults = PingConfig::default();
        PingConfig {
            port: self.port,
            attempts: self.attempts.unwrap_or(defaults.attempts),
            timeout: self
                .timeout_ms
                .map_or(defaults.timeout, Duration::from_millis),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "magicly", "magicly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("magicly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, then `MAGICLY_` environment overrides.
///
/// Nested keys use a double underscore
/// (`MAGICLY_DEFAULTS__TIMEOUT=60`), since field names contain single ones.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MAGICLY_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Parse a server base URL.
pub fn parse_server_url(raw: &str) -> Result<url::Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the password through the credential chain:
/// `password_env` → `MAGICLY_PASSWORD` → keyring → plaintext.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile-named env var
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Global env var
    if let Ok(pw) = std::env::var("MAGICLY_PASSWORD") {
        return Ok(SecretString::from(pw));
    }

    // 3. Keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve username + password without CLI flags.
pub fn resolve_credentials(profile: &Profile, profile_name: &str) -> Result<Credentials, ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("MAGICLY_USERNAME").ok())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;
    let password = resolve_password(profile, profile_name)?;
    Ok(Credentials::new(username, password))
}

/// Store a password in the system keyring for `profile_name`.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
        .and_then(|entry| entry.set_password(password))
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

/// Build an `AdapterConfig` from a profile (no CLI flag overrides).
pub fn profile_to_adapter_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<AdapterConfig, ConfigError> {
    let url = parse_server_url(&profile.server)?;

    let credentials = resolve_credentials(profile, profile_name)?;
    Ok(build_adapter_config(profile, url, credentials))
}

/// Build an `AdapterConfig` from a profile with already-resolved
/// credentials and server URL.
pub fn build_adapter_config(
    profile: &Profile,
    url: url::Url,
    credentials: Credentials,
) -> AdapterConfig {
    let mut config = AdapterConfig::new(url, credentials);

    // Unset `insecure` keeps the self-signed default of on-prem servers.
    config.tls = match (profile.insecure, &profile.ca_cert) {
        (Some(true), _) => TlsVerification::DangerAcceptInvalid,
        (_, Some(ca_path)) => TlsVerification::CustomCa(ca_path.clone()),
        (Some(false), None) => TlsVerification::SystemDefaults,
        (None, None) => TlsVerification::default(),
    };
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout));
    config.filters = DeviceFilters::from_csv(
        &profile.filters.device_types,
        &profile.filters.sources,
        &profile.filters.functions,
    );
    if let Some(ref names) = profile.historical_properties {
        config.historical_properties = split_csv(names);
    }
    profile.refresh.apply(&mut config.refresh);
    config.ping = profile.ping.to_ping_config();
    config
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "lobby"

[defaults]
output = "json"

[profiles.lobby]
server = "https://magicinfo.local:7001"
username = "admin"
password = "plain"
password_env = "MAGICLY_TEST_PASSWORD_THAT_IS_NEVER_SET"
timeout = 10
historical_properties = "Temperature, Volume"

[profiles.lobby.filters]
sources = "HDMI1,DVI"
functions = "Video Wall"

[profiles.lobby.refresh]
cooldown_secs = 45
confirm_attempts = 5

[profiles.lobby.ping]
port = 7002
attempts = 3
"#;

    fn load_sample() -> Config {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        load_config_from(&path).unwrap()
    }

    #[test]
    fn loads_profiles_and_defaults() {
        let cfg = load_sample();
        assert_eq!(cfg.default_profile.as_deref(), Some("lobby"));
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.color, "auto");
        assert_eq!(cfg.defaults.timeout, 30);

        let lobby = &cfg.profiles["lobby"];
        assert_eq!(lobby.server, "https://magicinfo.local:7001");
        assert_eq!(lobby.filters.sources, "HDMI1,DVI");
        assert_eq!(lobby.refresh.cooldown_secs, Some(45));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn profile_translates_to_adapter_config() {
        let cfg = load_sample();
        let adapter = profile_to_adapter_config(&cfg.profiles["lobby"], "lobby").unwrap();

        assert_eq!(adapter.url.as_str(), "https://magicinfo.local:7001/");
        assert_eq!(adapter.credentials.username, "admin");
        assert_eq!(adapter.timeout, Duration::from_secs(10));
        assert_eq!(adapter.filters.sources, vec!["HDMI1", "DVI"]);
        assert_eq!(adapter.filters.functions, vec!["Video Wall"]);
        assert_eq!(adapter.historical_properties, vec!["Temperature", "Volume"]);
        assert_eq!(adapter.refresh.cooldown, Duration::from_secs(45));
        assert_eq!(adapter.refresh.confirm_attempts, 5);
        assert_eq!(adapter.refresh.inactivity_timeout, Duration::from_secs(180));
        assert_eq!(adapter.ping.port, Some(7002));
        assert_eq!(adapter.ping.attempts, 3);
        assert_eq!(adapter.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn plaintext_password_is_last_resort() {
        if std::env::var("MAGICLY_PASSWORD").is_ok() {
            return;
        }
        let profile = Profile {
            server: "https://x".into(),
            username: Some("admin".into()),
            password: Some("plain".into()),
            ..Profile::default()
        };
        let creds = resolve_credentials(&profile, "magicly-test-no-keyring-entry").unwrap();
        assert_eq!(creds.password.expose_secret(), "plain");
    }

    #[test]
    fn invalid_server_url_is_validation_error() {
        let profile = Profile {
            server: "not a url".into(),
            username: Some("admin".into()),
            password: Some("x".into()),
            ..Profile::default()
        };
        let err = profile_to_adapter_config(&profile, "bad").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "server"));
    }

    #[test]
    fn config_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                server: "https://m.local".into(),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles["default"].server, "https://m.local");
    }
}
