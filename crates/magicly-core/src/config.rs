// ── Runtime adapter configuration ──
//
// These types describe *how* to reach a MagicInfo server and how the
// adapter paces itself. They carry credential data and tuning, but never
// touch disk. The CLI builds an `AdapterConfig` and hands it in.

use std::time::Duration;

use magicly_api::Credentials;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs). Default for on-prem servers.
    #[default]
    DangerAcceptInvalid,
}

/// Which devices the adapter monitors.
///
/// All empty means the whole fleet. Values are the human labels
/// (`HDMI1`, `Video Wall`), translated to server codes by the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceFilters {
    pub device_types: Vec<String>,
    pub sources: Vec<String>,
    pub functions: Vec<String>,
}

impl DeviceFilters {
    /// Parse the comma-separated form used in profiles and CLI flags.
    pub fn from_csv(device_types: &str, sources: &str, functions: &str) -> Self {
        Self {
            device_types: split_csv(device_types),
            sources: split_csv(sources),
            functions: split_csv(functions),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.device_types.is_empty() && self.sources.is_empty() && self.functions.is_empty()
    }
}

/// Split `"a, b,,c"` into `["a", "b", "c"]`.
pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Background refresh pacing and control confirmation limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTuning {
    /// Scheduler wake-up interval.
    pub tick: Duration,
    /// Minimum gap between the end of one bulk fetch and the start of the next.
    pub cooldown: Duration,
    /// Without a host poll for this long, bulk fetching pauses.
    pub inactivity_timeout: Duration,
    /// Confirmation polls before a control write is declared timed out.
    pub confirm_attempts: u32,
    /// Spacing between confirmation polls.
    pub confirm_interval: Duration,
}

impl Default for RefreshTuning {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(500),
            cooldown: Duration::from_secs(30),
            inactivity_timeout: Duration::from_secs(180),
            confirm_attempts: 30,
            confirm_interval: Duration::from_secs(1),
        }
    }
}

/// Raw TCP reachability probe settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingConfig {
    /// Port to connect to. `None` uses the server URL's port.
    pub port: Option<u16>,
    pub attempts: u32,
    pub timeout: Duration,
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            port: None,
            attempts: 1,
            timeout: Duration::from_millis(2500),
        }
    }
}

/// Configuration for polling a single MagicInfo server.
///
/// Built by the CLI, passed to `Adapter`; core never reads config files.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Server URL (e.g., `https://magicinfo.local:7001`).
    pub url: Url,
    pub credentials: Credentials,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    pub filters: DeviceFilters,
    /// Property names reported as time-series values instead of plain properties.
    pub historical_properties: Vec<String>,
    pub refresh: RefreshTuning,
    pub ping: PingConfig,
    /// Token lifetime override (defaults to the server's 1500 s).
    pub token_ttl: Duration,
}

impl AdapterConfig {
    pub fn new(url: Url, credentials: Credentials) -> Self {
        Self {
            url,
            credentials,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            filters: DeviceFilters::default(),
            historical_properties: vec![crate::presentation::TEMPERATURE.into()],
            refresh: RefreshTuning::default(),
            ping: PingConfig::default(),
            token_ttl: magicly_api::TOKEN_TTL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_split_trims_and_skips_empty() {
        assert_eq!(split_csv(" HDMI1, ,DVI ,"), vec!["HDMI1", "DVI"]);
        assert!(split_csv("").is_empty());
    }

    #[test]
    fn filters_from_csv() {
        let f = DeviceFilters::from_csv("S6PLAYER", "HDMI1,AAA", "");
        assert_eq!(f.device_types, vec!["S6PLAYER"]);
        assert_eq!(f.sources, vec!["HDMI1", "AAA"]);
        assert!(f.functions.is_empty());
        assert!(!f.is_empty());
        assert!(DeviceFilters::default().is_empty());
    }

    #[test]
    fn default_tuning_matches_server_pacing() {
        let t = RefreshTuning::default();
        assert_eq!(t.tick, Duration::from_millis(500));
        assert_eq!(t.cooldown, Duration::from_secs(30));
        assert_eq!(t.inactivity_timeout, Duration::from_secs(180));
        assert_eq!(t.confirm_attempts, 30);
    }
}
