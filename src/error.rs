use crate::scraping::error::ScrapeError;
use crate::storage::error::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClimateError {
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
