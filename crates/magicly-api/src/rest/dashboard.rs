// Server-wide dashboard and device catalog endpoints

use tracing::debug;

use crate::error::Error;
use crate::rest::client::MagicInfoClient;
use crate::rest::models::{DashboardStatus, DeviceDashboard, DeviceType, DeviceTypeCatalog};

impl MagicInfoClient {
    /// Device counters by health from `GET ems/dashboard/devices`.
    ///
    /// A dashboard without a `status` object yields all-`None` counters.
    pub async fn get_dashboard(&self) -> Result<DashboardStatus, Error> {
        let items: DeviceDashboard = self.get("ems/dashboard/devices").await?;
        Ok(items.status.unwrap_or_default())
    }

    /// Supported device model families from `GET rms/devices/device-types`.
    pub async fn list_device_types(&self) -> Result<Vec<DeviceType>, Error> {
        let catalog: DeviceTypeCatalog = self.get("rms/devices/device-types").await?;
        debug!(count = catalog.device_list.len(), "device types loaded");
        Ok(catalog.device_list)
    }
}
