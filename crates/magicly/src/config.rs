//! CLI configuration: thin wrapper around `magicly_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--server, --username, --password, --insecure, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use magicly_core::{AdapterConfig, Credentials};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use magicly_config::{Config, Profile, config_path, load_config_or_default, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build an `AdapterConfig` from the config file, profile, and CLI overrides.
pub fn build_adapter_config(global: &GlobalOpts) -> Result<AdapterConfig, CliError> {
    let mut cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.remove(&profile_name) {
        Some(profile) => profile,
        // An explicitly named profile must exist.
        None if global.profile.is_some() => {
            let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        None if global.server.is_none() => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
        None => Profile::default(),
    };

    resolve_profile(profile, &profile_name, global)
}

/// Translate a `Profile` + global flags into an `AdapterConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    mut profile: Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<AdapterConfig, CliError> {
    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    if global.username.is_some() {
        profile.username.clone_from(&global.username);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }

    let url = magicly_config::parse_server_url(&profile.server)?;
    let credentials = resolve_credentials(&profile, profile_name, global)?;

    let mut adapter = magicly_config::build_adapter_config(&profile, url, credentials);
    if let Some(secs) = global.timeout {
        adapter.timeout = Duration::from_secs(secs);
    }
    Ok(adapter)
}

/// Password flag first, then the shared credential chain.
fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<Credentials, CliError> {
    if let Some(ref password) = global.password {
        let username = profile
            .username
            .clone()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| CliError::NoCredentials {
                profile: profile_name.into(),
            })?;
        return Ok(Credentials::new(
            username,
            SecretString::from(password.clone()),
        ));
    }
    Ok(magicly_config::resolve_credentials(profile, profile_name)?)
}
