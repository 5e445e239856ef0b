use clap::Parser;

use crate::{api::jullix, cli::DeviceArgs, prelude::*};

#[derive(Parser)]
pub struct ProbeArgs {}

impl ProbeArgs {
    /// Validate the connection the same way the device would be set up, but without keeping it.
    pub async fn run(self, device: &DeviceArgs) -> Result {
        let client = device.new_client()?;
        match client.fetch_all().await {
            Ok(snapshot) => {
                info!(
                    meter_connected = snapshot.is_meter_connected(),
                    inverter_running = snapshot.is_inverter_running(),
                    "the device is reachable",
                );
                let meter_id = snapshot.meter_id().unwrap_or_else(|| "unknown".to_string());
                println!("ok: Jullix ({}), meter {meter_id}", device.host);
                Ok(())
            }
            Err(error) => {
                let failure = ProbeFailure::from(&error);
                error!("{:#}", Error::from(error));
                bail!("{}: {failure}", failure.code())
            }
        }
    }
}

/// User-facing classification of a failed probe.
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum ProbeFailure {
    #[display("failed to connect to the device, check the host")]
    CannotConnect,

    #[display("the device did not respond in time")]
    Timeout,

    #[display("unexpected response from the device")]
    Unknown,
}

impl ProbeFailure {
    pub const fn code(self) -> &'static str {
        match self {
            Self::CannotConnect => "cannot_connect",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        }
    }
}

impl From<&jullix::Error> for ProbeFailure {
    fn from(error: &jullix::Error) -> Self {
        match error {
            jullix::Error::Connection { .. } => Self::CannotConnect,
            jullix::Error::Timeout { .. } => Self::Timeout,
            jullix::Error::Api { .. } => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use mockito::Server;

    use super::*;

    async fn probe(host: String) -> Result<ProbeFailure> {
        let error = jullix::Client::new(&host)?
            .fetch_all()
            .await
            .err()
            .context("the probe unexpectedly succeeded")?;
        Ok(ProbeFailure::from(&error))
    }

    #[tokio::test]
    async fn test_cannot_connect() -> Result {
        let address = std::net::TcpListener::bind("127.0.0.1:0")?.local_addr()?;
        assert_eq!(probe(address.to_string()).await?, ProbeFailure::CannotConnect);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown() -> Result {
        let mut server = Server::new_async().await;
        let _meter = server.mock("GET", "/api/dsmr/status").with_status(500).create_async().await;
        let _inverter =
            server.mock("GET", "/api/inverter/status/A").with_status(500).create_async().await;
        assert_eq!(probe(server.host_with_port()).await?, ProbeFailure::Unknown);
        Ok(())
    }

    #[test]
    fn test_codes() {
        assert_eq!(ProbeFailure::CannotConnect.code(), "cannot_connect");
        assert_eq!(ProbeFailure::Timeout.code(), "timeout");
        assert_eq!(ProbeFailure::Unknown.code(), "unknown");
    }
}
