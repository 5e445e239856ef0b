mod snapshot;

use std::time::Duration;

use reqwest::Url;
use tokio::try_join;

pub use self::snapshot::{Document, Reading, Snapshot};
use crate::prelude::*;

/// Device request failure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to connect to `{url}`")]
    Connection {
        url: Url,

        #[source]
        source: reqwest::Error,
    },

    #[error("timed out while requesting `{url}`")]
    Timeout { url: Url },

    #[error("failed to fetch `{url}`")]
    Api {
        url: Url,

        #[source]
        source: reqwest::Error,
    },
}

impl Error {
    fn from_reqwest(url: &Url, source: reqwest::Error) -> Self {
        let url = url.clone();
        if source.is_timeout() {
            Self::Timeout { url }
        } else if source.is_connect() {
            Self::Connection { url, source }
        } else {
            Self::Api { url, source }
        }
    }
}

/// Local Jullix API client.
///
/// The device exposes the P1 meter and the inverter readings on two unauthenticated endpoints.
pub struct Client {
    inner: reqwest::Client,
    meter_url: Url,
    inverter_url: Url,
}

impl Client {
    pub const TIMEOUT: Duration = Duration::from_secs(10);

    const METER_PATH: &'static str = "/api/dsmr/status";
    const INVERTER_PATH: &'static str = "/api/inverter/status/A";

    pub fn new(host: &str) -> Result<Self> {
        Self::with_timeout(host, Self::TIMEOUT)
    }

    #[instrument(skip_all, fields(host = host))]
    pub fn with_timeout(host: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(&format!("http://{host}"))
            .with_context(|| format!("invalid device host `{host}`"))?;
        let inner = reqwest::Client::builder().user_agent("jullix").timeout(timeout).build()?;
        Ok(Self {
            inner,
            meter_url: base_url.join(Self::METER_PATH)?,
            inverter_url: base_url.join(Self::INVERTER_PATH)?,
        })
    }

    pub async fn fetch_meter_reading(&self) -> Result<Document, Error> {
        Self::get(&self.inner, &self.meter_url).await
    }

    pub async fn fetch_inverter_reading(&self) -> Result<Document, Error> {
        Self::get(&self.inner, &self.inverter_url).await
    }

    /// Fetch both documents concurrently, failing as soon as either request fails.
    #[instrument(skip_all)]
    pub async fn fetch_all(&self) -> Result<Snapshot, Error> {
        let (meter, inverter) =
            try_join!(self.fetch_meter_reading(), self.fetch_inverter_reading())?;
        debug!("fetched the snapshot");
        Ok(Snapshot { meter, inverter })
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(url = %url))]
    async fn get(client: &reqwest::Client, url: &Url) -> Result<Document, Error> {
        debug!("fetching…");
        client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|error| Error::from_reqwest(url, error))?
            .json::<Document>()
            .await
            .map_err(|error| Error::from_reqwest(url, error))
    }
}
