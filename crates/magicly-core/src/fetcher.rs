// ── Fleet detail fetcher ──
//
// Two bulk reads per refresh (general-info, display-info), zipped by
// position against the requested id order and merged into one flat raw
// bag per device.

use magicly_api::MagicInfoClient;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{DeviceId, DeviceRecord, RawProperties};

/// Leaf key carrying the device id in both detail categories.
pub(crate) const DEVICE_ID_FIELD: &str = "deviceId";

/// Fetch and merge details for `ids`.
///
/// Either bulk call failing fails the whole fetch, so callers never write a
/// partial cycle over a good one.
pub async fn fetch_details(
    client: &MagicInfoClient,
    ids: &[DeviceId],
) -> Result<Vec<DeviceRecord>, CoreError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let wire_ids: Vec<String> = ids.iter().map(ToString::to_string).collect();

    let general = client
        .get_general_info(&wire_ids)
        .await
        .map_err(|e| detail_error("general-info", e))?;
    let display = client
        .get_display_info(&wire_ids)
        .await
        .map_err(|e| detail_error("display-info", e))?;

    let records = merge(ids, &general.success_list, &display.success_list);
    debug!(
        requested = ids.len(),
        merged = records.len(),
        "fleet details fetched"
    );
    Ok(records)
}

fn detail_error(category: &str, err: magicly_api::Error) -> CoreError {
    match CoreError::from(err) {
        e if e.is_auth() => e,
        e => CoreError::DetailFetch {
            message: format!("{category}: {e}"),
        },
    }
}

/// Zip both categories with the requested id order.
///
/// A position whose general-info entry names a different device is skipped.
/// Where both categories carry a field, display-info wins.
pub fn merge(ids: &[DeviceId], general: &[Value], display: &[Value]) -> Vec<DeviceRecord> {
    let mut records = Vec::with_capacity(ids.len());

    for (index, id) in ids.iter().enumerate() {
        let Some(general_entry) = general.get(index) else {
            break;
        };
        let mut raw = flatten(general_entry);

        if raw.get(DEVICE_ID_FIELD).map(String::as_str) != Some(id.as_str()) {
            warn!(
                device_id = %id,
                position = index,
                reported = raw.get(DEVICE_ID_FIELD).map_or("<none>", String::as_str),
                "general-info entry out of order, skipping"
            );
            continue;
        }

        if let Some(display_entry) = display.get(index) {
            raw.extend(flatten(display_entry));
        }
        // Display-info may omit or echo the id; keep the verified one.
        raw.insert(DEVICE_ID_FIELD.to_owned(), id.to_string());

        records.push(DeviceRecord::new(id.clone(), raw));
    }

    records
}

/// Flatten a vendor JSON object into leaf-key → text.
///
/// Nested objects are walked recursively and their leaf keys kept as-is.
/// Nulls are dropped, scalars stringified, arrays kept as JSON text.
pub fn flatten(value: &Value) -> RawProperties {
    let mut out = RawProperties::new();
    flatten_into(value, &mut out);
    out
}

fn flatten_into(value: &Value, out: &mut RawProperties) {
    let Value::Object(map) = value else {
        return;
    };
    for (key, v) in map {
        match v {
            Value::Object(_) => flatten_into(v, out),
            Value::Null => {}
            Value::String(s) => {
                out.insert(key.clone(), s.clone());
            }
            Value::Bool(_) | Value::Number(_) | Value::Array(_) => {
                out.insert(key.clone(), v.to_string());
            }
        }
    }
}

/// Device id of a batch-result entry: a bare id string or an object
/// carrying `deviceId` at any depth.
pub fn entry_device_id(entry: &Value) -> Option<String> {
    match entry {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => flatten(entry).remove(DEVICE_ID_FIELD),
        _ => None,
    }
}
