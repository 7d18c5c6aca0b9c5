//! The backward month-by-month walk and its termination rules.

use crate::scraping::error::ScrapeError;
use crate::scraping::page_fetcher::PageSource;
use crate::scraping::record_assembler::{PageRecords, RecordAssembler};
use crate::scraping::tag_recorder::TagRecorder;
use crate::types::month::Month;
use crate::types::weather_set::WeatherSet;
use chrono::NaiveDate;
use log::{debug, info};
use std::fmt;
use tokio_util::sync::CancellationToken;

/// Why a session stopped walking back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A date already collected in this session came up again: history is exhausted.
    DuplicateDate(NaiveDate),
    /// The page holding the resume boundary has been processed.
    ResumeBoundary(NaiveDate),
    /// This many consecutive pages carried no dates at all.
    EmptyPages(usize),
    /// The configured page cap was reached.
    PageLimit(usize),
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::DuplicateDate(date) => write!(f, "date {date} seen twice"),
            StopReason::ResumeBoundary(date) => write!(f, "reached resume boundary {date}"),
            StopReason::EmptyPages(n) => write!(f, "{n} consecutive pages without dates"),
            StopReason::PageLimit(n) => write!(f, "page limit of {n} reached"),
            StopReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeState {
    Active,
    Terminated(StopReason),
}

/// Limits on how far a session may walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeSettings {
    /// Consecutive date-less pages tolerated before giving up.
    pub empty_page_limit: usize,
    /// Upper bound on pages fetched, if any.
    pub page_limit: Option<usize>,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            empty_page_limit: 1,
            page_limit: None,
        }
    }
}

/// Everything one scraping run has accumulated.
#[derive(Debug, Clone)]
pub struct ScrapeSession {
    weather: WeatherSet,
    resume_after: Option<NaiveDate>,
    state: ScrapeState,
    pages_processed: usize,
    empty_streak: usize,
    settings: ScrapeSettings,
}

impl ScrapeSession {
    pub fn new(resume_after: Option<NaiveDate>, settings: ScrapeSettings) -> Self {
        Self {
            weather: WeatherSet::new(),
            resume_after,
            state: ScrapeState::Active,
            pages_processed: 0,
            empty_streak: 0,
            settings,
        }
    }

    pub fn weather(&self) -> &WeatherSet {
        &self.weather
    }

    pub fn into_weather(self) -> WeatherSet {
        self.weather
    }

    pub fn resume_after(&self) -> Option<NaiveDate> {
        self.resume_after
    }

    pub fn state(&self) -> ScrapeState {
        self.state
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.state, ScrapeState::Terminated(_))
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        match self.state {
            ScrapeState::Active => None,
            ScrapeState::Terminated(reason) => Some(reason),
        }
    }

    pub fn pages_processed(&self) -> usize {
        self.pages_processed
    }

    /// Runs one page of markup through the pipeline and merges the result.
    ///
    /// A terminated session ignores further pages.
    pub fn process_page(&mut self, html: &str) -> ScrapeState {
        if self.is_terminated() {
            return self.state;
        }
        let tokens = TagRecorder::record_page(html);
        let page = RecordAssembler::new(&self.weather, self.resume_after).assemble(&tokens);
        self.merge(page)
    }

    fn merge(&mut self, page: PageRecords) -> ScrapeState {
        self.pages_processed += 1;
        let mut stop = page.stop;

        let mut added = 0;
        for record in page.records {
            if let Err(rejected) = self.weather.insert_new(record) {
                stop = Some(StopReason::DuplicateDate(rejected.date));
                break;
            }
            added += 1;
        }
        debug!(
            "Page {} gave {} new records from {} date tokens",
            self.pages_processed, added, page.date_tokens
        );

        if page.date_tokens == 0 {
            self.empty_streak += 1;
            if stop.is_none() && self.empty_streak >= self.settings.empty_page_limit {
                stop = Some(StopReason::EmptyPages(self.empty_streak));
            }
        } else {
            self.empty_streak = 0;
        }

        if stop.is_none() {
            if let Some(limit) = self.settings.page_limit {
                if self.pages_processed >= limit {
                    stop = Some(StopReason::PageLimit(limit));
                }
            }
        }

        if let Some(reason) = stop {
            self.terminate(reason);
        }
        self.state
    }

    pub(crate) fn terminate(&mut self, reason: StopReason) {
        if !self.is_terminated() {
            info!(
                "Scraping stopped after {} pages with {} records: {}",
                self.pages_processed,
                self.weather.len(),
                reason
            );
            self.state = ScrapeState::Terminated(reason);
        }
    }
}

/// Drives a [`PageSource`] backwards one month at a time until the session terminates.
pub struct PaginationController<'a, S: PageSource> {
    source: &'a S,
    settings: ScrapeSettings,
}

impl<'a, S: PageSource> PaginationController<'a, S> {
    pub fn new(source: &'a S, settings: ScrapeSettings) -> Self {
        Self { source, settings }
    }

    /// Walks back from `start`.
    ///
    /// # Errors
    ///
    /// The first fetch failure aborts the run; nothing collected so far is returned.
    pub async fn run(
        &self,
        start: Month,
        resume_after: Option<NaiveDate>,
        cancellation: Option<&CancellationToken>,
    ) -> Result<ScrapeSession, ScrapeError> {
        let mut session = ScrapeSession::new(resume_after, self.settings);
        let mut month = start;

        while !session.is_terminated() {
            if cancellation.is_some_and(CancellationToken::is_cancelled) {
                session.terminate(StopReason::Cancelled);
                break;
            }
            let html = self.source.fetch_page(month).await?;
            if session.process_page(&html) == ScrapeState::Active {
                month = month.previous();
            }
        }

        Ok(session)
    }
}
