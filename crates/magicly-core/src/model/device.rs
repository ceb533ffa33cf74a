// ── Device domain types ──
//
// `DeviceRecord` is what the refresh worker stores; `PresentedDevice` is
// what the host receives. The raw bag stays flat and stringly typed so the
// control protocol can patch single fields without knowing the vendor's
// nesting.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable device identifier (the server's MAC-derived `deviceId`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Flat field → value map merged from general-info and display-info.
pub type RawProperties = BTreeMap<String, String>;

/// One device as of the last refresh that included it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceRecord {
    pub id: DeviceId,
    pub raw: RawProperties,
    pub online: bool,
}

impl DeviceRecord {
    pub fn new(id: DeviceId, raw: RawProperties) -> Self {
        Self {
            id,
            raw,
            online: true,
        }
    }

    /// Non-empty raw value for a vendor field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.raw
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// What a host control widget looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlKind {
    /// `"1"` on, `"0"` off.
    Switch,
    Numeric { min: i64, max: i64 },
    Dropdown { options: Vec<String> },
    Text,
    Button { label: String },
}

/// A control exposed on a presented device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlAffordance {
    /// Grouped name as the host addresses it (`Sound#Mode`).
    pub name: String,
    pub kind: ControlKind,
    pub value: String,
}

/// Host-facing projection of a `DeviceRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresentedDevice {
    pub id: DeviceId,
    pub name: String,
    pub online: bool,
    pub properties: BTreeMap<String, String>,
    pub controls: Vec<ControlAffordance>,
    /// Time-series values (numeric, historical property names only).
    pub dynamic: BTreeMap<String, String>,
}

impl PresentedDevice {
    pub fn control(&self, name: &str) -> Option<&ControlAffordance> {
        self.controls.iter().find(|c| c.name == name)
    }
}
