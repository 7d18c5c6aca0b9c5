mod climate_scraper;
mod error;
mod scraping;
mod storage;
mod sync;
mod types;
mod utils;

#[cfg(test)]
mod test_support;

pub use climate_scraper::ClimateScraper;
pub use error::ClimateError;
pub use sync::SyncReport;

pub use scraping::error::ScrapeError;
pub use scraping::markup;
pub use scraping::markup::MarkupSink;
pub use scraping::page_fetcher::{
    FetchConfig, HttpPageFetcher, PageSource, DEFAULT_BASE_URL, DEFAULT_START_YEAR,
    DEFAULT_STATION_ID,
};
pub use scraping::pagination::{
    PaginationController, ScrapeSession, ScrapeSettings, ScrapeState, StopReason,
};
pub use scraping::record_assembler::{PageRecords, RecordAssembler};
pub use scraping::tag_recorder::TagRecorder;
pub use scraping::token_classifier::{classify, TokenKind};

pub use storage::error::StoreError;
pub use storage::file_store::FileStore;
pub use storage::memory_store::MemoryStore;
pub use storage::store::{TableSchema, WeatherStore, DEFAULT_LOCATION, DEFAULT_TABLE_NAME};

pub use types::daily_record::DailyRecord;
pub use types::month::Month;
pub use types::weather_set::WeatherSet;

pub use utils::get_store_dir;
