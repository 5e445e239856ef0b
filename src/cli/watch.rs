use std::{io::Write, path::PathBuf, pin::pin, time::Duration};

use bon::Builder;
use chrono::{DateTime, Utc};
use clap::Parser;
use tokio::time::{MissedTickBehavior, interval};

use crate::{
    cli::DeviceArgs,
    coordinator::{Coordinator, Refresh},
    entity::Entities,
    prelude::*,
    state::StateFile,
};

#[derive(Parser)]
pub struct WatchArgs {
    #[clap(long, env = "SCAN_INTERVAL", default_value = "10s")]
    scan_interval: humantime::Duration,

    /// Where the battery energy totals are kept between the runs.
    #[clap(long, env = "STATE_FILE", default_value = "jullix-state.toml")]
    state_file: PathBuf,

    /// Identifier of this device instance, it prefixes the inverter entity IDs.
    #[clap(long, env = "INSTANCE_ID", default_value = "jullix")]
    instance_id: String,

    /// Also print the entities that are disabled by default.
    #[clap(long)]
    include_disabled: bool,
}

impl WatchArgs {
    pub async fn run(self, device: &DeviceArgs) -> Result {
        let scan_interval = self.scan_interval()?;
        let mut state_file = StateFile::load(&self.state_file)?;
        let coordinator = Coordinator::try_new(device.new_client()?).await?;
        let entities =
            start_entities(&coordinator, &self.instance_id, &mut state_file, Utc::now());

        Watcher::builder()
            .coordinator(coordinator)
            .entities(entities)
            .state_file(state_file)
            .interval(scan_interval)
            .include_disabled(self.include_disabled)
            .build()
            .run()
            .await
    }

    fn scan_interval(&self) -> Result<Duration> {
        ensure!(!self.scan_interval.is_zero(), "the scan interval must be positive");
        Ok(self.scan_interval.into())
    }
}

/// Build the entities, restore their totals, and take the start-up snapshot as the baseline.
fn start_entities(
    coordinator: &Coordinator,
    instance_id: &str,
    state_file: &mut StateFile,
    now: DateTime<Utc>,
) -> Entities {
    let mut entities = Entities::new(coordinator.snapshot(), instance_id);
    entities.restore(state_file);
    entities.handle_update(coordinator.snapshot(), now, state_file);
    entities
}

#[derive(Builder)]
struct Watcher {
    coordinator: Coordinator,
    entities: Entities,
    state_file: StateFile,

    #[builder(into)]
    interval: Duration,

    include_disabled: bool,
}

impl Watcher {
    async fn run(mut self) -> Result {
        let mut shutdown = pin!(shutdown_signal());
        let mut interval = interval(self.interval);
        interval.reset_after(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval = ?self.interval, "watching…");
        self.report()?;

        loop {
            tokio::select! {
                result = &mut shutdown => {
                    result?;
                    info!("shutting down…");
                    break;
                }
                _ = interval.tick() => {
                    self.tick().await?;
                }
            }
        }

        self.state_file.save()
    }

    async fn tick(&mut self) -> Result {
        let _ = self.poll(Utc::now()).await;
        self.report()
    }

    /// Refresh the snapshot and feed it into the battery totals, stale snapshots are never fed.
    async fn poll(&mut self, now: DateTime<Utc>) -> Refresh {
        let refresh = self.coordinator.refresh().await;
        if refresh == Refresh::Updated {
            self.entities.handle_update(self.coordinator.snapshot(), now, &mut self.state_file);
            if let Err(error) = self.state_file.save() {
                warn!("failed to save the state: {error:#}");
            }
        }
        refresh
    }

    fn report(&self) -> Result {
        let report = self.entities.report(self.coordinator.poll_state(), self.include_disabled);
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer(&mut stdout, &report)?;
        writeln!(stdout)?;
        Ok(())
    }
}

async fn shutdown_signal() -> Result {
    let ctrl_c = async { tokio::signal::ctrl_c().await.context("failed to listen for Ctrl+C") };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .context("failed to install the signal handler")?
            .recv()
            .await;
        Ok::<_, Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result>();

    tokio::select! {
        result = ctrl_c => result,
        result = terminate => result,
    }
}
