//! Full reloads and incremental updates of a [`WeatherStore`].

use crate::climate_scraper::ClimateScraper;
use crate::error::ClimateError;
use crate::scraping::page_fetcher::PageSource;
use crate::scraping::pagination::{ScrapeSession, StopReason};
use crate::storage::store::WeatherStore;
use log::{info, warn};

/// Outcome of [`ClimateScraper::install_all`] or [`ClimateScraper::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub pages_fetched: usize,
    pub records_scraped: usize,
    pub records_inserted: usize,
    pub stop_reason: Option<StopReason>,
}

impl<S: PageSource> ClimateScraper<S> {
    /// Replaces everything in `store` with a fresh scrape of the whole history.
    ///
    /// The store is only purged once the scrape has produced records, so a
    /// network failure or a scrape that found nothing leaves the previous data
    /// in place. `store` must be initialized.
    pub async fn install_all<St: WeatherStore>(
        &self,
        store: &mut St,
    ) -> Result<SyncReport, ClimateError> {
        let session = self.scrape().call().await?;
        if session.weather().is_empty() {
            warn!(
                "Scrape ended ({:?}) without any records, keeping the stored data",
                session.stop_reason()
            );
        } else {
            store.purge_all().await?;
        }
        commit(session, store).await
    }

    /// Adds the days newer than the latest one in `store`.
    ///
    /// An empty store gets the whole history. `store` must be initialized.
    pub async fn update<St: WeatherStore>(
        &self,
        store: &mut St,
    ) -> Result<SyncReport, ClimateError> {
        let latest = store.latest_date().await?;
        match latest {
            Some(date) => info!("Updating store from {}", date),
            None => info!("Store is empty, scraping full history"),
        }
        let session = self.scrape().maybe_resume_after(latest).call().await?;
        commit(session, store).await
    }
}

async fn commit<St: WeatherStore>(
    session: ScrapeSession,
    store: &mut St,
) -> Result<SyncReport, ClimateError> {
    let pages_fetched = session.pages_processed();
    let stop_reason = session.stop_reason();
    let weather = session.into_weather();
    let records_inserted = store.save(&weather).await?;

    Ok(SyncReport {
        pages_fetched,
        records_scraped: weather.len(),
        records_inserted,
        stop_reason,
    })
}
