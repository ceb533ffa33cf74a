//! Shared helpers for command handlers.

use std::path::Path;
use std::time::Duration;

use magicly_core::{Adapter, ControlEntry, PresentedDevice};
use tracing::debug;

use crate::error::CliError;

/// List the fleet, waiting for the first bulk fetch when the cache is cold.
///
/// A fresh adapter answers its first listing from an empty cache; the
/// refresh worker it starts fills it shortly after.
pub async fn listing(adapter: &Adapter) -> Result<Vec<PresentedDevice>, CliError> {
    let mut version = adapter.snapshot().subscribe();
    let devices = adapter.list_aggregated().await?;
    if !devices.is_empty() || adapter.target_ids().await.is_empty() {
        return Ok(devices);
    }

    let wait = adapter.config().timeout;
    debug!(?wait, "cache is cold, waiting for the first fetch");
    match tokio::time::timeout(wait, version.changed()).await {
        Ok(Ok(())) => Ok(adapter.list_aggregated().await?),
        Ok(Err(_)) | Err(_) => Err(CliError::ConnectionFailed {
            target: adapter.config().url.to_string(),
            reason: format!("no device details arrived within {}s", wait.as_secs()),
        }),
    }
}

/// Find one presented device by id.
pub fn find_device<'a>(
    devices: &'a [PresentedDevice],
    device_id: &str,
) -> Result<&'a PresentedDevice, CliError> {
    devices
        .iter()
        .find(|d| d.id.as_str() == device_id)
        .ok_or_else(|| CliError::DeviceNotFound {
            device_id: device_id.into(),
        })
}

/// Read and parse a batch control file.
pub fn read_control_file(path: &Path) -> Result<Vec<ControlEntry>, CliError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Clamp a user-supplied interval to at least one second.
pub fn interval_secs(secs: u64) -> Duration {
    Duration::from_secs(secs.max(1))
}
