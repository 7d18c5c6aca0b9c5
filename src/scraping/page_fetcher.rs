//! Fetches one month of the daily-data archive per request.

use crate::scraping::error::ScrapeError;
use crate::types::month::Month;
use bon::Builder;
use log::{info, warn};
use reqwest::Client;
use std::time::Duration;

/// Winnipeg Richardson Int'l A.
pub const DEFAULT_STATION_ID: u32 = 27174;
pub const DEFAULT_BASE_URL: &str = "https://climate.weather.gc.ca/climate_data/daily_data_e.html";
/// Fixed `StartYear` query parameter; it does not move with the scan.
pub const DEFAULT_START_YEAR: i32 = 1840;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = concat!("climate_scrape/", env!("CARGO_PKG_VERSION"));
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Anything that can hand back the raw markup of a month page.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch_page(&self, month: Month) -> Result<String, ScrapeError>;
}

/// Where and how pages are requested.
///
/// ```
/// use climate_scrape::FetchConfig;
/// use std::time::Duration;
///
/// let config = FetchConfig::builder()
///     .timeout(Duration::from_secs(10))
///     .retries(1)
///     .build();
/// assert_eq!(config.station_id, 27174);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct FetchConfig {
    #[builder(default = DEFAULT_STATION_ID)]
    pub station_id: u32,
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    #[builder(default = DEFAULT_START_YEAR)]
    pub start_year: i32,
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
    /// Extra attempts after a failed request. Zero means a failure is final.
    #[builder(default)]
    pub retries: u32,
    #[builder(into, default = DEFAULT_USER_AGENT.to_string())]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl FetchConfig {
    pub fn page_url(&self, month: Month) -> String {
        format!(
            "{}?StationID={}&timeframe=2&StartYear={}&EndYear={}&Day=1&Year={}&Month={}#",
            self.base_url,
            self.station_id,
            self.start_year,
            month.year(),
            month.year(),
            month.month()
        )
    }
}

/// [`PageSource`] backed by the live archive.
pub struct HttpPageFetcher {
    config: FetchConfig,
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(ScrapeError::ClientBuild)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    async fn fetch_once(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    ScrapeError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    ScrapeError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        response
            .text()
            .await
            .map_err(|e| ScrapeError::BodyRead(url.to_string(), e))
    }
}

impl PageSource for HttpPageFetcher {
    async fn fetch_page(&self, month: Month) -> Result<String, ScrapeError> {
        let url = self.config.page_url(month);
        info!("Fetching {} from {}", month, url);

        let mut attempt = 0;
        loop {
            match self.fetch_once(&url).await {
                Ok(html) => return Ok(html),
                Err(e) if attempt < self.config.retries && is_retryable(&e) => {
                    attempt += 1;
                    warn!("Retrying {} ({}/{}): {}", url, attempt, self.config.retries, e);
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Client errors (4xx) will not improve on a second try.
fn is_retryable(error: &ScrapeError) -> bool {
    match error {
        ScrapeError::HttpStatus { status, .. } => !status.is_client_error(),
        ScrapeError::ClientBuild(_) => false,
        ScrapeError::NetworkRequest(..) | ScrapeError::BodyRead(..) => true,
    }
}
