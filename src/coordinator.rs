use crate::{
    api::jullix::{Client, Snapshot},
    entity::PollState,
    prelude::*,
};

/// Outcome of a single refresh.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Refresh {
    /// Fresh snapshot has been fetched.
    Updated,

    /// The fetch failed and the previous snapshot is kept.
    Failed,
}

/// Polls the device and keeps the latest successfully fetched snapshot.
pub struct Coordinator {
    client: Client,
    snapshot: Snapshot,
    last_update_success: bool,
}

impl Coordinator {
    /// Perform the first refresh, which must succeed for the device to be usable.
    #[instrument(skip_all)]
    pub async fn try_new(client: Client) -> Result<Self> {
        let snapshot = client.fetch_all().await.context("the device is not ready")?;
        info!(
            meter_connected = snapshot.is_meter_connected(),
            inverter_running = snapshot.is_inverter_running(),
            "connected",
        );
        Ok(Self { client, snapshot, last_update_success: true })
    }

    #[instrument(skip_all)]
    pub async fn refresh(&mut self) -> Refresh {
        match self.client.fetch_all().await {
            Ok(snapshot) => {
                if !self.last_update_success {
                    info!("the device is back");
                }
                self.snapshot = snapshot;
                self.last_update_success = true;
                Refresh::Updated
            }
            Err(error) => {
                warn!("failed to refresh: {:#}", Error::from(error));
                self.last_update_success = false;
                Refresh::Failed
            }
        }
    }

    pub const fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub const fn poll_state(&self) -> PollState<'_> {
        PollState { snapshot: &self.snapshot, last_update_success: self.last_update_success }
    }
}
