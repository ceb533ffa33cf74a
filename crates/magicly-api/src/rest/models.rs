// MagicInfo REST response and request types
//
// Every v2.0 endpoint except `auth` wraps its payload in the
// `ApiResponse` envelope. The server is loose about scalar types (numbers
// arrive as strings on some firmware and as numbers on others), so fields
// that callers only display go through `lenient_string`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard MagicInfo response envelope.
///
/// ```json
/// { "apiVersion": "2.0", "status": "Success", "items": { ... } }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status: String,
    #[serde(default)]
    pub items: Value,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

/// Body returned by `POST auth`. Not enveloped.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,
}

// ── Dashboard ────────────────────────────────────────────────────────

/// `items` of `GET ems/dashboard/devices`.
#[derive(Debug, Default, Deserialize)]
pub struct DeviceDashboard {
    #[serde(default)]
    pub status: Option<DashboardStatus>,
}

/// Device counters by connection health.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DashboardStatus {
    #[serde(default, deserialize_with = "lenient_string")]
    pub connected: Option<String>,
    #[serde(default, rename = "disConnected", deserialize_with = "lenient_string")]
    pub disconnected: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub warning: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub error: Option<String>,
}

// ── Device catalog ───────────────────────────────────────────────────

/// `items` of `GET rms/devices/device-types`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTypeCatalog {
    #[serde(default)]
    pub device_list: Vec<DeviceType>,
}

/// One supported device model family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceType {
    #[serde(default, deserialize_with = "lenient_string")]
    pub device_full_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub device_type_version: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub device_type: Option<String>,
}

/// Entry of the device list (paged listing or filter result).
///
/// Only the id is relied on; the rest is carried for logging.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSummary {
    pub device_id: String,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
}

// ── Requests ─────────────────────────────────────────────────────────

/// Body of `POST rms/devices/filter`. Empty dimensions are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceFilterRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub device_type: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub input_source: Vec<u16>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub function_type: Vec<String>,
    pub page_size: u32,
    pub start_index: u32,
}

/// `{ "ids": [...] }` body shared by the bulk detail and connectivity endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct IdList<'a> {
    pub ids: &'a [String],
}

/// Body of `PUT rms/devices/current-display-info`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayUpdateRequest<'a> {
    pub device_ids: &'a [String],
    pub display_info: &'a Map<String, Value>,
}

/// Body of `POST rms/devices/current-display-info` (result lookup).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayResultRequest<'a> {
    pub device_ids: &'a [String],
    pub request_id: &'a str,
}

/// Body of `PUT rms/devices/quick-control`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickControlRequest<'a> {
    pub device_ids: &'a [String],
    pub menu: &'a str,
    pub value: &'a str,
}

// ── Batch results ────────────────────────────────────────────────────

/// `{ successList, failList }` shape returned by every bulk endpoint.
///
/// Entries stay as raw JSON: the detail endpoints return deeply nested
/// per-device documents that core flattens itself.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    #[serde(default)]
    pub success_list: Vec<Value>,
    #[serde(default)]
    pub fail_list: Vec<Value>,
}

/// Ticket returned when the server accepts an asynchronous display update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestTicket {
    #[serde(deserialize_with = "required_string")]
    pub request_id: String,
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Accept a string, number, or bool and keep it as text. `null` → `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }))
}

fn required_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer)?.ok_or_else(|| serde::de::Error::custom("expected a string id"))
}
