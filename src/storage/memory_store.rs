use crate::storage::error::StoreError;
use crate::storage::store::{StoredTable, TableSchema, WeatherStore};
use crate::types::daily_record::DailyRecord;
use crate::types::weather_set::WeatherSet;
use chrono::NaiveDate;

/// Keeps everything in process memory. Useful for tests and one-off runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: Option<StoredTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> Result<&StoredTable, StoreError> {
        self.table.as_ref().ok_or(StoreError::NotInitialized)
    }

    fn table_mut(&mut self) -> Result<&mut StoredTable, StoreError> {
        self.table.as_mut().ok_or(StoreError::NotInitialized)
    }
}

impl WeatherStore for MemoryStore {
    async fn initialize(&mut self, schema: &TableSchema) -> Result<(), StoreError> {
        if self.table.is_none() {
            self.table = Some(StoredTable::new(schema.clone()));
        }
        Ok(())
    }

    async fn save(&mut self, weather: &WeatherSet) -> Result<usize, StoreError> {
        Ok(self.table_mut()?.insert_missing(weather))
    }

    async fn fetch_by_year(&self, year: i32) -> Result<Vec<DailyRecord>, StoreError> {
        Ok(self.table()?.records.for_year(year))
    }

    async fn fetch_by_month(&self, year: i32, month: u32) -> Result<Vec<DailyRecord>, StoreError> {
        Ok(self.table()?.by_month(year, month))
    }

    async fn purge_all(&mut self) -> Result<(), StoreError> {
        self.table_mut()?.records = WeatherSet::new();
        Ok(())
    }

    async fn latest_date(&self) -> Result<Option<NaiveDate>, StoreError> {
        Ok(self.table()?.records.latest_date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(y: i32, m: u32, d: u32, mean: f64) -> DailyRecord {
        DailyRecord::from_triple(NaiveDate::from_ymd_opt(y, m, d).unwrap(), [mean + 5.0, mean - 5.0, mean])
    }

    #[tokio::test]
    async fn test_requires_initialize() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.latest_date().await,
            Err(StoreError::NotInitialized)
        ));
    }

    #[tokio::test]
    async fn test_save_is_idempotent_per_date() -> Result<(), StoreError> {
        let mut store = MemoryStore::new();
        store.initialize(&TableSchema::default()).await?;

        let first: WeatherSet = [record(2020, 1, 1, 1.0), record(2020, 1, 2, 2.0)]
            .into_iter()
            .collect();
        assert_eq!(store.save(&first).await?, 2);

        let again: WeatherSet = [record(2020, 1, 2, 99.0), record(2020, 1, 3, 3.0)]
            .into_iter()
            .collect();
        assert_eq!(store.save(&again).await?, 1);

        let january = store.fetch_by_month(2020, 1).await?;
        let means: Vec<f64> = january.iter().map(|r| r.mean_temp).collect();
        assert_eq!(means, [1.0, 2.0, 3.0]);
        Ok(())
    }

    #[tokio::test]
    async fn test_year_queries_latest_date_and_purge() -> Result<(), StoreError> {
        let mut store = MemoryStore::new();
        store.initialize(&TableSchema::default()).await?;
        let weather: WeatherSet = [
            record(1996, 12, 31, 1.0),
            record(1997, 1, 1, 2.0),
            record(1997, 2, 1, 3.0),
        ]
        .into_iter()
        .collect();
        store.save(&weather).await?;

        assert_eq!(store.fetch_by_year(1997).await?.len(), 2);
        assert_eq!(store.fetch_by_year(1995).await?.len(), 0);
        assert_eq!(
            store.latest_date().await?,
            NaiveDate::from_ymd_opt(1997, 2, 1)
        );

        store.purge_all().await?;
        assert_eq!(store.latest_date().await?, None);
        Ok(())
    }
}
