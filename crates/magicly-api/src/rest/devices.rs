// Device listing, filtering, bulk detail, and connectivity endpoints

use tracing::debug;

use crate::error::Error;
use crate::rest::client::MagicInfoClient;
use crate::rest::models::{BatchResult, DeviceFilterRequest, DeviceSummary, IdList};

/// Largest page the server accepts; the fleet is read in one page.
pub const DEVICE_PAGE_SIZE: u32 = 1000;

impl MagicInfoClient {
    /// Every registered device, first page of [`DEVICE_PAGE_SIZE`].
    pub async fn list_devices(&self) -> Result<Vec<DeviceSummary>, Error> {
        let path = format!("rms/devices?pageSize={DEVICE_PAGE_SIZE}&startIndex=1");
        let devices: Vec<DeviceSummary> = self.get(&path).await?;
        debug!(count = devices.len(), "device list loaded");
        Ok(devices)
    }

    /// Devices matching a structured filter (`POST rms/devices/filter`).
    pub async fn filter_devices(
        &self,
        filter: &DeviceFilterRequest,
    ) -> Result<Vec<DeviceSummary>, Error> {
        let devices: Vec<DeviceSummary> = self.post("rms/devices/filter", filter).await?;
        debug!(count = devices.len(), "filtered device list loaded");
        Ok(devices)
    }

    /// Bulk general information (`POST rms/devices/general-info`).
    ///
    /// `successList` is positionally aligned with `ids`.
    pub async fn get_general_info(&self, ids: &[String]) -> Result<BatchResult, Error> {
        self.post("rms/devices/general-info", &IdList { ids }).await
    }

    /// Bulk display settings (`POST rms/devices/display-info`).
    ///
    /// `successList` is positionally aligned with `ids`.
    pub async fn get_display_info(&self, ids: &[String]) -> Result<BatchResult, Error> {
        self.post("rms/devices/display-info", &IdList { ids }).await
    }

    /// Ask the server which of `ids` are currently reachable.
    pub async fn check_connections(&self, ids: &[String]) -> Result<BatchResult, Error> {
        self.post("rms/devices/connections-checked", &IdList { ids })
            .await
    }
}
