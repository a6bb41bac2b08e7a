use serde_json::json;
use tracing::debug;

use crate::auth::Session;
use crate::client::DaisyClient;
use crate::error::Error;
use crate::models::{RawStatusItem, StatusItemList};

impl DaisyClient {
    /// Fetch the status items of a single device.
    ///
    /// `POST teleco/services/status-device-list`
    pub async fn device_status(
        &self,
        session: &Session,
        installation_id: i64,
        installation_device_id: i64,
    ) -> Result<Vec<RawStatusItem>, Error> {
        debug!(installation_id, installation_device_id, "fetching device status");
        let list: StatusItemList = self
            .query(
                "status-device-list",
                &json!({
                    "idSession": session.id(),
                    "idAccount": session.account_id,
                    "idInstallation": installation_id,
                    "idInstallationDevice": installation_device_id,
                }),
            )
            .await?;
        Ok(list.statusitem_list)
    }
}
