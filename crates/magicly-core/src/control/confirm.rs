// Bounded confirmation polling for queued display writes

use std::time::Duration;

use magicly_api::{BatchResult, MagicInfoClient};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::CoreError;
use crate::fetcher::{entry_device_id, flatten};
use crate::model::DeviceId;

/// Outcome of inspecting one result poll for a device.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Verdict {
    /// Not reported yet.
    Pending,
    Applied,
    Rejected(String),
}

/// A queued write awaiting the server's verdict.
#[derive(Debug, Clone)]
pub(crate) struct PendingControl {
    pub device: DeviceId,
    pub property: String,
    pub request_id: String,
    /// Field → value pairs the device must report once applied.
    pub expected: Vec<(String, String)>,
}

/// Poll the request until the device is reported, at most `attempts` times.
pub(crate) async fn await_confirmation(
    client: &MagicInfoClient,
    pending: &PendingControl,
    attempts: u32,
    interval: Duration,
    cancel: &CancellationToken,
) -> Result<(), CoreError> {
    let PendingControl {
        device,
        property,
        request_id,
        expected,
    } = pending;
    let ids = [device.to_string()];

    for attempt in 1..=attempts {
        if attempt > 1 {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(CoreError::AdapterStopped),
                () = tokio::time::sleep(interval) => {}
            }
        }

        let result = client.get_display_result(&ids, request_id).await?;
        match inspect(&result, device, expected) {
            Verdict::Pending => trace!(%device, attempt, "control not applied yet"),
            Verdict::Applied => {
                debug!(%device, property = %property, attempt, "control confirmed");
                return Ok(());
            }
            Verdict::Rejected(reason) => {
                return Err(CoreError::ControlConfirmationFailure {
                    device_id: device.to_string(),
                    property: property.clone(),
                    reason,
                });
            }
        }
    }

    Err(CoreError::ControlConfirmationTimeout {
        device_id: device.to_string(),
        property: property.clone(),
        attempts,
    })
}

/// Judge one result poll.
///
/// Fields the device does not echo back are not compared; numeric text is
/// compared by value (`"050"` equals `"50"`) and boolean echoes stand for
/// switch codes (`true` equals `"1"`).
pub(crate) fn inspect(result: &BatchResult, device: &DeviceId, expected: &[(String, String)]) -> Verdict {
    let mine = |entry: &&serde_json::Value| entry_device_id(entry).as_deref() == Some(device.as_str());

    if result.fail_list.iter().any(|e| mine(&e)) {
        return Verdict::Rejected("server reported the device in its fail list".into());
    }
    let Some(entry) = result.success_list.iter().find(mine) else {
        return Verdict::Pending;
    };

    let reported = flatten(entry);
    for (field, want) in expected {
        if let Some(got) = reported.get(field) {
            if !same_value(got, want) {
                return Verdict::Rejected(format!("{field} reads {got}, expected {want}"));
            }
        }
    }
    Verdict::Applied
}

fn same_value(a: &str, b: &str) -> bool {
    let (a, b) = (as_switch_code(a.trim()), as_switch_code(b.trim()));
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x == y,
        _ => a == b,
    }
}

fn as_switch_code(value: &str) -> &str {
    if value.eq_ignore_ascii_case("true") {
        "1"
    } else if value.eq_ignore_ascii_case("false") {
        "0"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn batch(success: serde_json::Value, fail: serde_json::Value) -> BatchResult {
        serde_json::from_value(json!({"successList": success, "failList": fail}))
            .unwrap_or_default()
    }

    fn expected() -> Vec<(String, String)> {
        vec![("basicVolume".to_owned(), "50".to_owned())]
    }

    #[test]
    fn pending_until_device_listed() {
        let r = batch(json!([{"deviceId": "other"}]), json!([]));
        assert_eq!(inspect(&r, &DeviceId::from("aa"), &expected()), Verdict::Pending);
    }

    #[test]
    fn applied_when_value_matches() {
        let r = batch(
            json!([{"deviceId": "aa", "displayConf": {"basicVolume": "050"}}]),
            json!([]),
        );
        assert_eq!(inspect(&r, &DeviceId::from("aa"), &expected()), Verdict::Applied);
    }

    #[test]
    fn mismatch_is_rejected() {
        let r = batch(json!([{"deviceId": "aa", "basicVolume": 10}]), json!([]));
        assert!(matches!(
            inspect(&r, &DeviceId::from("aa"), &expected()),
            Verdict::Rejected(_)
        ));
    }

    #[test]
    fn fail_list_is_rejected() {
        let r = batch(json!([]), json!(["aa"]));
        assert!(matches!(
            inspect(&r, &DeviceId::from("aa"), &expected()),
            Verdict::Rejected(_)
        ));
    }

    #[test]
    fn boolean_echo_confirms_switch_code() {
        let r = batch(
            json!([{"deviceId": "aa", "displayConf": {"basicMute": true}}]),
            json!([]),
        );
        let on = vec![("basicMute".to_owned(), "1".to_owned())];
        assert_eq!(inspect(&r, &DeviceId::from("aa"), &on), Verdict::Applied);

        let off = vec![("basicMute".to_owned(), "0".to_owned())];
        assert!(matches!(
            inspect(&r, &DeviceId::from("aa"), &off),
            Verdict::Rejected(_)
        ));
    }
}
