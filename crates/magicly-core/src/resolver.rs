// ── Device identity resolver ──
//
// Turns the configured filters into the set of device ids the adapter
// monitors. Filter labels are translated to server codes first; a label
// that cannot be translated matches nothing, and since the dimensions are
// intersected the whole set is then empty.

use magicly_api::{DeviceFilterRequest, MagicInfoClient};
use magicly_api::rest::devices::DEVICE_PAGE_SIZE;
use tracing::debug;

use crate::config::DeviceFilters;
use crate::error::CoreError;
use crate::model::DeviceId;
use crate::tables;

/// Translate filters into a vendor filter body.
///
/// `None` means some value has no server code and nothing can match.
pub fn build_filter(filters: &DeviceFilters) -> Option<DeviceFilterRequest> {
    let input_source = filters
        .sources
        .iter()
        .map(|label| {
            tables::SOURCE
                .code_of(label)
                .and_then(|code| u16::try_from(code).ok())
        })
        .collect::<Option<Vec<u16>>>()?;

    let function_type = filters
        .functions
        .iter()
        .map(|label| tables::function_key(label).map(String::from))
        .collect::<Option<Vec<String>>>()?;

    Some(DeviceFilterRequest {
        device_type: filters.device_types.clone(),
        input_source,
        function_type,
        page_size: DEVICE_PAGE_SIZE,
        start_index: 1,
    })
}

/// Resolve the monitored id set.
///
/// Empty filters list the whole fleet. Errors are returned as
/// [`CoreError::IdentityResolution`]; credential failures pass through.
pub async fn resolve_target_ids(
    client: &MagicInfoClient,
    filters: &DeviceFilters,
) -> Result<Vec<DeviceId>, CoreError> {
    let devices = if filters.is_empty() {
        client.list_devices().await
    } else {
        let Some(request) = build_filter(filters) else {
            debug!(?filters, "untranslatable filter value, no devices match");
            return Ok(Vec::new());
        };
        client.filter_devices(&request).await
    };

    let devices = devices.map_err(|e| match CoreError::from(e) {
        e if e.is_auth() => e,
        e => CoreError::IdentityResolution {
            message: e.to_string(),
        },
    })?;

    Ok(devices
        .into_iter()
        .map(|d| DeviceId::new(d.device_id))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_labels_to_codes() {
        let filters = DeviceFilters::from_csv("S6PLAYER", "HDMI1,DVI", "Video Wall");
        let request = build_filter(&filters);
        let Some(request) = request else {
            panic!("filter should translate");
        };
        assert_eq!(request.device_type, vec!["S6PLAYER"]);
        assert_eq!(request.input_source, vec![33, 24]);
        assert_eq!(request.function_type, vec!["is_videowall"]);
        assert_eq!(request.page_size, DEVICE_PAGE_SIZE);
        assert_eq!(request.start_index, 1);
    }

    #[test]
    fn unknown_source_fails_closed() {
        let filters = DeviceFilters::from_csv("", "HDMI1,AAA", "");
        assert!(build_filter(&filters).is_none());
    }

    #[test]
    fn unknown_function_fails_closed() {
        let filters = DeviceFilters::from_csv("", "", "Kiosk");
        assert!(build_filter(&filters).is_none());
    }
}
