// ── Control command protocol ──
//
// Host write → connectivity precheck → validated vendor payload → write →
// bounded confirmation. The caller owns cache patching and the dirty flag;
// `send` returns the raw fields to patch once the write is known applied.

pub mod confirm;
pub mod payload;

use magicly_api::MagicInfoClient;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::RefreshTuning;
use crate::error::CoreError;
use crate::fetcher::entry_device_id;
use crate::model::{DeviceId, DeviceRecord};
use crate::registry::{PropertySpec, WritePath};

use self::confirm::PendingControl;

/// One entry of a batch control request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlEntry {
    pub device_id: DeviceId,
    pub property: String,
    pub value: String,
}

impl ControlEntry {
    pub fn new(
        device_id: impl Into<DeviceId>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            property: property.into(),
            value: value.into(),
        }
    }
}

/// Ask the server whether `device` is reachable right now.
pub(crate) async fn is_connected(
    client: &MagicInfoClient,
    device: &DeviceId,
) -> Result<bool, CoreError> {
    let result = client.check_connections(&[device.to_string()]).await?;
    let listed = |list: &[serde_json::Value]| {
        list.iter()
            .any(|e| entry_device_id(e).as_deref() == Some(device.as_str()))
    };
    Ok(listed(&result.success_list) && !listed(&result.fail_list))
}

/// Apply one property write to a live device.
///
/// Returns the raw field updates to patch into the cache.
pub(crate) async fn send(
    client: &MagicInfoClient,
    record: &DeviceRecord,
    spec: &'static PropertySpec,
    input: &str,
    tuning: &RefreshTuning,
    cancel: &CancellationToken,
) -> Result<Vec<(String, String)>, CoreError> {
    let device = &record.id;

    if !is_connected(client, device).await? {
        return Err(CoreError::DeviceDisconnected {
            device_id: device.to_string(),
        });
    }

    let plan = payload::plan(spec, record, input)?;
    let ids = [device.to_string()];

    if let WritePath::QuickControl(menu) = spec.path {
        client.quick_control(&ids, menu, &plan.value).await?;
        info!(%device, property = spec.name, menu, "quick control sent");
        // Restart has no readable state to patch.
        let patch = if spec.field.is_empty() {
            Vec::new()
        } else {
            plan.fields
        };
        return Ok(patch);
    }

    let body = plan.display_info(spec.group);
    let request_id = client.update_display(&ids, &body).await?;
    debug!(%device, property = spec.name, %request_id, "display update queued");

    if spec.needs_confirmation() {
        let pending = PendingControl {
            device: device.clone(),
            property: spec.grouped_name(),
            request_id,
            expected: plan.fields.clone(),
        };
        confirm::await_confirmation(
            client,
            &pending,
            tuning.confirm_attempts,
            tuning.confirm_interval,
            cancel,
        )
        .await?;
        info!(%device, property = spec.name, value = %plan.value, "control applied");
        Ok(plan.fields)
    } else {
        info!(%device, property = spec.name, "action sent");
        Ok(Vec::new())
    }
}
