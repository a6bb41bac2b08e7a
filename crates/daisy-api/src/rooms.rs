use serde_json::json;
use tracing::debug;

use crate::auth::Session;
use crate::client::DaisyClient;
use crate::error::Error;
use crate::models::{RawRoom, RoomList};

impl DaisyClient {
    /// List the rooms of an installation, each with its raw device entries.
    ///
    /// `POST teleco/services/room-list`. Devices are returned untyped;
    /// variant selection by `idDevicetype` happens in `daisy-core`.
    pub async fn list_rooms(&self, session: &Session, installation_id: i64) -> Result<Vec<RawRoom>, Error> {
        debug!(installation_id, "listing rooms");
        let list: RoomList = self
            .query(
                "room-list",
                &json!({
                    "idSession": session.id(),
                    "idAccount": session.account_id,
                    "idInstallation": installation_id,
                }),
            )
            .await?;
        Ok(list.room_list)
    }
}
