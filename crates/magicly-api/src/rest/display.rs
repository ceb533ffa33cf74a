// Display control endpoints
//
// Writes are asynchronous on the server side: `PUT current-display-info`
// only queues the change and hands back a request id, whose outcome is read
// with `POST current-display-info`. Quick control is fire-and-forget.

use serde_json::{Map, Value};

use crate::error::Error;
use crate::rest::client::MagicInfoClient;
use crate::rest::models::{
    BatchResult, DisplayResultRequest, DisplayUpdateRequest, QuickControlRequest, RequestTicket,
};

const DISPLAY_PATH: &str = "rms/devices/current-display-info";

impl MagicInfoClient {
    /// Queue a display settings change for `ids`; returns the request id.
    pub async fn update_display(
        &self,
        ids: &[String],
        display_info: &Map<String, Value>,
    ) -> Result<String, Error> {
        let body = DisplayUpdateRequest {
            device_ids: ids,
            display_info,
        };
        let ticket: RequestTicket = self.put(DISPLAY_PATH, &body).await?;
        Ok(ticket.request_id)
    }

    /// Read the outcome of a queued display change.
    ///
    /// Devices still applying the change appear in neither list.
    pub async fn get_display_result(
        &self,
        ids: &[String],
        request_id: &str,
    ) -> Result<BatchResult, Error> {
        let body = DisplayResultRequest {
            device_ids: ids,
            request_id,
        };
        self.post(DISPLAY_PATH, &body).await
    }

    /// Send a quick-control command (power, restart, ...).
    pub async fn quick_control(&self, ids: &[String], menu: &str, value: &str) -> Result<(), Error> {
        let body = QuickControlRequest {
            device_ids: ids,
            menu,
            value,
        };
        let _: Value = self.put("rms/devices/quick-control", &body).await?;
        Ok(())
    }
}
