// ── Hub ──
//
// The session-owning facade consumers talk to. Holds the HTTP client, the
// current session (swapped atomically on login, read lock-free by every
// call), the directory registry and the command table. Action methods
// resolve the device, build the batch without I/O, then dispatch it.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use futures_util::future::join_all;
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use daisy_api::transport::{TlsMode, TransportConfig};
use daisy_api::{AckMode, AckOutcome, DaisyClient, Session};

use crate::codec::{StatusItem, decode_status_list};
use crate::command::{CommandBatch, CommandTable};
use crate::config::{HubConfig, TlsVerification};
use crate::convert::room_from_raw;
use crate::directory::Directory;
use crate::error::CoreError;
use crate::model::{Cover, Device, Installation, Light, Rgb, Room};

/// Cheaply cloneable handle to one user session against the cloud.
#[derive(Clone)]
pub struct Hub {
    inner: Arc<HubInner>,
}

struct HubInner {
    config: HubConfig,
    client: DaisyClient,
    session: ArcSwapOption<Session>,
    directory: Directory,
    table: CommandTable,
    cancel: CancellationToken,
}

impl Hub {
    /// Build a hub from configuration. Does not log in.
    pub fn new(config: HubConfig) -> Result<Self, CoreError> {
        let tls = match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        let transport = TransportConfig {
            tls,
            timeout: config.timeout,
        };
        let client = DaisyClient::new(config.base_url.clone(), &transport)?;
        Ok(Self::with_client(config, client))
    }

    /// Build a hub around an existing client.
    pub fn with_client(config: HubConfig, client: DaisyClient) -> Self {
        let table = CommandTable::new(config.white_led);
        Self {
            inner: Arc::new(HubInner {
                config,
                client,
                session: ArcSwapOption::empty(),
                directory: Directory::new(),
                table,
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.inner.config
    }

    pub fn directory(&self) -> &Directory {
        &self.inner.directory
    }

    pub fn command_table(&self) -> &CommandTable {
        &self.inner.table
    }

    /// Token cancelled by [`shutdown`](Self::shutdown). Polls started with
    /// [`send`](Self::send) use a child of it.
    pub fn cancel_token(&self) -> CancellationToken {
        self.inner.cancel.child_token()
    }

    /// Cancel every in-flight acknowledgment poll.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Log in with the configured credentials.
    pub async fn login(&self) -> Result<Arc<Session>, CoreError> {
        let creds = &self.inner.config.credentials;
        self.login_with(&creds.email, &creds.password).await
    }

    /// Log in with explicit credentials and make the result the current
    /// session. In-flight calls keep the session they started with.
    pub async fn login_with(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Arc<Session>, CoreError> {
        let session = Arc::new(self.inner.client.login(email, password).await?);
        self.inner.session.store(Some(Arc::clone(&session)));
        info!(account_id = session.account_id, "logged in");
        Ok(session)
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner.session.load().is_some()
    }

    /// The current session, or [`CoreError::NotLoggedIn`].
    pub fn session(&self) -> Result<Arc<Session>, CoreError> {
        self.inner.session.load_full().ok_or(CoreError::NotLoggedIn)
    }

    // ── Directory ────────────────────────────────────────────────────

    /// Fetch installations and store them in the directory.
    pub async fn list_installations(&self) -> Result<Vec<Installation>, CoreError> {
        let session = self.session()?;
        let raw = self.inner.client.list_installations(&session).await?;
        let installations: Vec<Installation> = raw.into_iter().map(Installation::from).collect();
        self.inner
            .directory
            .replace_installations(installations.clone());
        Ok(installations)
    }

    /// Fetch the rooms (with devices) of one installation and index them.
    pub async fn list_rooms(&self, installation_id: i64) -> Result<Vec<Room>, CoreError> {
        let session = self.session()?;
        let rooms = self.fetch_rooms(&session, installation_id).await?;
        self.inner
            .directory
            .replace_rooms(installation_id, rooms.clone());
        Ok(rooms)
    }

    pub async fn is_installation_active(&self, installation_id: i64) -> Result<bool, CoreError> {
        let session = self.session()?;
        Ok(self
            .inner
            .client
            .node_status(&session, installation_id)
            .await?)
    }

    /// Full fetch: installations, then the rooms of each installation.
    ///
    /// The directory is only replaced once every request succeeded; on
    /// error it keeps the previous fetch.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let session = self.session()?;
        let installations: Vec<Installation> = self
            .inner
            .client
            .list_installations(&session)
            .await?
            .into_iter()
            .map(Installation::from)
            .collect();

        let mut fetched = Vec::with_capacity(installations.len());
        for inst in &installations {
            let rooms = self.fetch_rooms(&session, inst.id).await?;
            debug!(
                installation = inst.id,
                rooms = rooms.len(),
                "installation fetched"
            );
            fetched.push((inst.id, rooms));
        }

        let count = installations.len();
        self.inner.directory.replace_all(installations, fetched);
        info!(
            installations = count,
            devices = self.inner.directory.device_count(),
            "directory refreshed"
        );
        Ok(())
    }

    async fn fetch_rooms(
        &self,
        session: &Session,
        installation_id: i64,
    ) -> Result<Vec<Room>, CoreError> {
        let raw = self.inner.client.list_rooms(session, installation_id).await?;
        Ok(raw
            .into_iter()
            .map(|r| room_from_raw(installation_id, r))
            .collect())
    }

    // ── Status ───────────────────────────────────────────────────────

    /// Fetch and apply the status of one device. Returns its new state.
    pub async fn update_state(&self, device_id: i64) -> Result<Device, CoreError> {
        let session = self.session()?;
        let device = self.require_device(device_id)?;
        let raw = self
            .inner
            .client
            .device_status(&session, device.installation_id(), device_id)
            .await?;
        let items: Vec<StatusItem> = raw
            .iter()
            .map(|r| StatusItem::from_raw(device_id, r))
            .collect();
        let update = decode_status_list(&items);
        self.inner
            .directory
            .apply_status(device_id, &update)
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: device_id.to_string(),
            })
    }

    /// Refresh every known device concurrently.
    ///
    /// Per-device failures are logged and skipped; returns how many
    /// devices were updated.
    pub async fn update_all(&self) -> Result<usize, CoreError> {
        self.session()?;
        let ids: Vec<i64> = self
            .inner
            .directory
            .devices()
            .iter()
            .map(Device::id)
            .collect();
        let results = join_all(ids.iter().map(|id| self.update_state(*id))).await;

        let mut updated = 0;
        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(_) => updated += 1,
                Err(e) => warn!(device_id = id, error = %e, "status refresh failed"),
            }
        }
        Ok(updated)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Dispatch a batch with the configured acknowledgment mode.
    pub async fn send(&self, batch: &CommandBatch) -> Result<AckOutcome, CoreError> {
        let cancel = self.cancel_token();
        self.send_with(batch, self.inner.config.ack_mode, &cancel)
            .await
    }

    /// Dispatch a batch with an explicit mode and cancellation token.
    pub async fn send_with(
        &self,
        batch: &CommandBatch,
        mode: AckMode,
        cancel: &CancellationToken,
    ) -> Result<AckOutcome, CoreError> {
        let session = self.session()?;
        let installation = self
            .inner
            .directory
            .installation(batch.installation_id)
            .ok_or_else(|| CoreError::InstallationNotFound {
                identifier: batch.installation_id.to_string(),
            })?;

        debug!(
            installation = %installation.inst_code,
            commands = batch.commands.len(),
            ?mode,
            "dispatching batch"
        );
        let outcome = self
            .inner
            .client
            .send_commands(
                &session,
                &installation.inst_code,
                &batch.requests(),
                mode,
                &self.inner.config.ack_policy,
                cancel,
            )
            .await?;
        debug!(%outcome, "batch resolved");
        Ok(outcome)
    }

    pub async fn turn_on(&self, device_id: i64) -> Result<AckOutcome, CoreError> {
        let batch = self.require_light(device_id)?.turn_on(&self.inner.table)?;
        self.send(&batch).await
    }

    pub async fn turn_off(&self, device_id: i64) -> Result<AckOutcome, CoreError> {
        let batch = self.require_light(device_id)?.turn_off(&self.inner.table)?;
        self.send(&batch).await
    }

    /// Set color and/or brightness; omitted values keep the last known ones.
    pub async fn set_color(
        &self,
        device_id: i64,
        rgb: Option<Rgb>,
        brightness: Option<u8>,
    ) -> Result<AckOutcome, CoreError> {
        let batch = self
            .require_light(device_id)?
            .set_color(&self.inner.table, rgb, brightness)?;
        self.send(&batch).await
    }

    /// Open fully, or to 33/66 %.
    pub async fn open_cover(
        &self,
        device_id: i64,
        percent: Option<u8>,
    ) -> Result<AckOutcome, CoreError> {
        let batch = self
            .require_cover(device_id)?
            .open(&self.inner.table, percent)?;
        self.send(&batch).await
    }

    pub async fn close_cover(&self, device_id: i64) -> Result<AckOutcome, CoreError> {
        let batch = self.require_cover(device_id)?.close(&self.inner.table)?;
        self.send(&batch).await
    }

    pub async fn stop_cover(&self, device_id: i64) -> Result<AckOutcome, CoreError> {
        let batch = self.require_cover(device_id)?.stop(&self.inner.table)?;
        self.send(&batch).await
    }

    /// Move to the level step nearest to `percent`.
    pub async fn set_cover_position(
        &self,
        device_id: i64,
        percent: u8,
    ) -> Result<AckOutcome, CoreError> {
        let batch = self
            .require_cover(device_id)?
            .set_position(&self.inner.table, percent)?;
        self.send(&batch).await
    }

    // ── Lookup helpers ───────────────────────────────────────────────

    fn require_device(&self, device_id: i64) -> Result<Device, CoreError> {
        self.inner
            .directory
            .device(device_id)
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: device_id.to_string(),
            })
    }

    fn require_light(&self, device_id: i64) -> Result<Light, CoreError> {
        match self.require_device(device_id)? {
            Device::Light(light) => Ok(light),
            Device::Cover(cover) => Err(CoreError::UnsupportedDeviceType {
                type_code: cover.info.device_type.code(),
                action: "light control".into(),
            }),
        }
    }

    fn require_cover(&self, device_id: i64) -> Result<Cover, CoreError> {
        match self.require_device(device_id)? {
            Device::Cover(cover) => Ok(cover),
            Device::Light(light) => Err(CoreError::UnsupportedDeviceType {
                type_code: light.info.device_type.code(),
                action: "cover control".into(),
            }),
        }
    }
}
