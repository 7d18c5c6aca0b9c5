//! The contract between the scraper and whatever keeps its results.

use crate::storage::error::StoreError;
use crate::types::daily_record::DailyRecord;
use crate::types::weather_set::WeatherSet;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TABLE_NAME: &str = "weather";
pub const DEFAULT_LOCATION: &str = "Winnipeg, MB";

/// Names a table and the location its samples were taken at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub table_name: String,
    pub location: String,
}

impl TableSchema {
    pub fn new(table_name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            location: location.into(),
        }
    }
}

impl Default for TableSchema {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_NAME, DEFAULT_LOCATION)
    }
}

/// Persistent home for scraped records.
///
/// `save` inserts each date at most once: passing dates the store already
/// holds is harmless and leaves the stored values as they were.
#[allow(async_fn_in_trait)]
pub trait WeatherStore {
    /// Creates the table if needed. Must be called before anything else.
    async fn initialize(&mut self, schema: &TableSchema) -> Result<(), StoreError>;

    /// Returns how many records were actually inserted.
    async fn save(&mut self, weather: &WeatherSet) -> Result<usize, StoreError>;

    /// Records of `year`, oldest first.
    async fn fetch_by_year(&self, year: i32) -> Result<Vec<DailyRecord>, StoreError>;

    /// Records of one month, oldest first.
    async fn fetch_by_month(&self, year: i32, month: u32) -> Result<Vec<DailyRecord>, StoreError>;

    async fn purge_all(&mut self) -> Result<(), StoreError>;

    async fn latest_date(&self) -> Result<Option<NaiveDate>, StoreError>;
}

/// One table's worth of data; shared by the store implementations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct StoredTable {
    pub(crate) schema: TableSchema,
    pub(crate) records: WeatherSet,
}

impl StoredTable {
    pub(crate) fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            records: WeatherSet::new(),
        }
    }

    pub(crate) fn insert_missing(&mut self, weather: &WeatherSet) -> usize {
        let mut inserted = 0;
        for record in weather.iter() {
            if self.records.insert_new(*record).is_ok() {
                inserted += 1;
            }
        }
        inserted
    }

    pub(crate) fn by_month(&self, year: i32, month: u32) -> Vec<DailyRecord> {
        self.records
            .iter()
            .filter(|r| r.date.year() == year && r.date.month() == month)
            .copied()
            .collect()
    }
}
