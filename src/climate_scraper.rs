//! Main entry point: walks the climate archive backwards from the current month
//! and collects one [`DailyRecord`](crate::DailyRecord) per day until history runs out.

use crate::error::ClimateError;
use crate::scraping::page_fetcher::{FetchConfig, HttpPageFetcher, PageSource};
use crate::scraping::pagination::{PaginationController, ScrapeSession, ScrapeSettings};
use crate::types::month::Month;
use bon::bon;
use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;

/// Scrapes daily temperatures for one station.
///
/// Create one with [`ClimateScraper::new()`] for the default station and archive,
/// or [`ClimateScraper::with_config()`] to point it elsewhere. Tests and other
/// data feeds can plug in any [`PageSource`] through [`ClimateScraper::from_source()`].
///
/// # Examples
///
/// ```no_run
/// # use climate_scrape::{ClimateScraper, ClimateError};
/// # #[tokio::main]
/// # async fn main() -> Result<(), ClimateError> {
/// let scraper = ClimateScraper::new()?;
/// let session = scraper.scrape().call().await?;
/// println!(
///     "{} days, stopped because of {:?}",
///     session.weather().len(),
///     session.stop_reason()
/// );
/// # Ok(())
/// # }
/// ```
pub struct ClimateScraper<S: PageSource = HttpPageFetcher> {
    source: S,
    settings: ScrapeSettings,
}

impl ClimateScraper<HttpPageFetcher> {
    /// Scraper for the default station (27174) on the live archive.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::Scrape`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, ClimateError> {
        Self::with_config(FetchConfig::default())
    }

    pub fn with_config(config: FetchConfig) -> Result<Self, ClimateError> {
        Ok(Self::from_source(HttpPageFetcher::new(config)?))
    }
}

#[bon]
impl<S: PageSource> ClimateScraper<S> {
    pub fn from_source(source: S) -> Self {
        Self {
            source,
            settings: ScrapeSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ScrapeSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn settings(&self) -> ScrapeSettings {
        self.settings
    }

    /// Runs one scraping session.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.resume_after(NaiveDate)`: Optional. The newest date already held elsewhere. Only
    ///   strictly newer days are collected, and the walk ends with the page holding this date.
    /// * `.start_month(Month)`: Optional. Where the walk begins. Defaults to the current month.
    /// * `.cancellation(CancellationToken)`: Optional. Checked before every page request; once
    ///   cancelled the session ends with what it has.
    /// * `.page_limit(usize)`: Optional. Overrides [`ScrapeSettings::page_limit`].
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::Scrape`] on the first page that cannot be fetched. Records
    /// gathered before the failure are discarded with the session.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use climate_scrape::{ClimateScraper, ClimateError};
    /// # use chrono::NaiveDate;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), ClimateError> {
    /// let scraper = ClimateScraper::new()?;
    /// let session = scraper
    ///     .scrape()
    ///     .resume_after(NaiveDate::from_ymd_opt(1996, 11, 5).unwrap())
    ///     .call()
    ///     .await?;
    /// assert!(session.weather().earliest_date() > NaiveDate::from_ymd_opt(1996, 11, 5));
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn scrape(
        &self,
        resume_after: Option<NaiveDate>,
        start_month: Option<Month>,
        cancellation: Option<CancellationToken>,
        page_limit: Option<usize>,
    ) -> Result<ScrapeSession, ClimateError> {
        let settings = ScrapeSettings {
            page_limit: page_limit.or(self.settings.page_limit),
            ..self.settings
        };
        let start = start_month.unwrap_or_else(Month::current);

        let session = PaginationController::new(&self.source, settings)
            .run(start, resume_after, cancellation.as_ref())
            .await?;
        Ok(session)
    }
}
