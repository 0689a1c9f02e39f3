use anyhow::{Context, Result};
use reqwest::{Client, Url};
use tokio::{sync::mpsc::Sender, task::JoinHandle};
use tracing::{debug, error, info};

use crate::{
    holding::{Holding, HoldingsResponse},
    AppEvent,
};

pub const DEFAULT_URL: &str = "https://canopy-frontend-task.now.sh/api/holdings";

/// Shown for every fetch failure, whatever the cause.
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching holdings data.";

#[derive(Debug, Clone)]
pub struct HoldingsClient {
    client: Client,
    url: Url,
}

impl HoldingsClient {
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url).with_context(|| format!("Invalid holdings url {}", url))?;
        let client = Client::builder().build()?;
        Ok(Self { client, url })
    }

    pub async fn fetch_holdings(&self) -> Result<Vec<Holding>> {
        info!("Fetching holdings from {}", self.url);
        let res = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .context("Holdings request failed")?
            .error_for_status()
            .context("Holdings endpoint returned an error status")?;

        let body = res.text().await.context("Could not read holdings body")?;
        debug!("Holdings response : {}", body);

        let response: HoldingsResponse =
            serde_json::de::from_str(body.as_str()).context("Malformed holdings response")?;
        info!("Received {} holdings", response.payload.len());

        Ok(response.payload)
    }
}

/// Observable state of the single holdings fetch.
#[derive(Debug, Clone, Default)]
pub struct LoadState {
    pub loading: bool,
    pub error: Option<String>,
    pub holdings: Vec<Holding>,
}

impl LoadState {
    pub fn begin(&mut self) {
        self.loading = true;
    }

    fn succeed(&mut self, holdings: Vec<Holding>) {
        self.holdings = holdings;
        self.loading = false;
    }

    fn fail(&mut self) {
        self.error = Some(FETCH_ERROR_MESSAGE.to_string());
        self.loading = false;
    }

    pub fn finish(&mut self, result: Result<Vec<Holding>>) {
        match result {
            Ok(holdings) => self.succeed(holdings),
            Err(err) => {
                error!("Failed to fetch holdings: {:#}", err);
                self.fail();
            }
        }
    }
}

/// Aborts the fetch task when dropped, so a response that arrives after the
/// view is gone is never delivered.
#[derive(Debug)]
pub struct FetchHandle {
    task: JoinHandle<()>,
}

impl FetchHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for FetchHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Runs the fetch once on its own task and reports the outcome on `tx`.
pub fn spawn_fetch(client: HoldingsClient, tx: Sender<AppEvent>) -> FetchHandle {
    let task = tokio::task::spawn(async move {
        let event = AppEvent::HoldingsFetched(client.fetch_holdings().await);
        if tx.send(event).await.is_err() {
            debug!("View closed before holdings arrived");
        }
    });
    FetchHandle { task }
}
