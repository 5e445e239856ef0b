mod probe;
mod show;
mod watch;

use clap::{Parser, Subcommand};

pub use self::{probe::ProbeArgs, show::ShowArgs, watch::WatchArgs};
use crate::{api::jullix, prelude::*};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    pub device: DeviceArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: poll the device and print the entity states every scan interval.
    #[clap(name = "watch")]
    Watch(Box<WatchArgs>),

    /// Check whether the device is reachable and answers with valid readings.
    #[clap(name = "probe")]
    Probe(ProbeArgs),

    /// Fetch the readings once and print them as a table.
    #[clap(name = "show")]
    Show(ShowArgs),
}

impl Command {
    pub async fn run(self, device: &DeviceArgs) -> Result {
        match self {
            Self::Watch(args) => args.run(device).await,
            Self::Probe(args) => args.run(device).await,
            Self::Show(args) => args.run(device).await,
        }
    }
}

#[derive(Parser)]
pub struct DeviceArgs {
    /// Jullix device host name or IP address, optionally with a port.
    #[clap(long = "host", env = "JULLIX_HOST")]
    pub host: String,
}

impl DeviceArgs {
    pub fn new_client(&self) -> Result<jullix::Client> {
        jullix::Client::new(&self.host)
    }
}
