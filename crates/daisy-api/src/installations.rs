// Installation endpoints
//
// Installations are account-scoped. `idInstallation` addresses them in
// queries; the separate `instCode` is only used by the command endpoints.

use serde_json::json;
use tracing::debug;

use crate::auth::Session;
use crate::client::DaisyClient;
use crate::error::Error;
use crate::models::{InstallationList, NodeStatus, RawInstallation};

impl DaisyClient {
    /// List all installations of the logged-in account.
    ///
    /// `POST teleco/services/account-installation-list`
    pub async fn list_installations(&self, session: &Session) -> Result<Vec<RawInstallation>, Error> {
        debug!("listing installations");
        let list: InstallationList = self
            .query(
                "account-installation-list",
                &json!({
                    "idSession": session.id(),
                    "idAccount": session.account_id,
                }),
            )
            .await?;
        Ok(list.installation_list)
    }

    /// Probe whether the installation's node is online.
    ///
    /// `POST teleco/services/tmate20/nodestatus`. This endpoint has no
    /// `codEsito` envelope.
    pub async fn node_status(&self, session: &Session, installation_id: i64) -> Result<bool, Error> {
        debug!(installation_id, "probing node status");
        let status: NodeStatus = self
            .post_json(
                "tmate20/nodestatus",
                &json!({
                    "idSession": session.id(),
                    "idInstallation": installation_id,
                }),
            )
            .await?;
        Ok(status.node_active)
    }
}
