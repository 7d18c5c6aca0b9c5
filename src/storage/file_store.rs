//! A [`WeatherStore`] that keeps each table in a bincode file.

use crate::storage::error::StoreError;
use crate::storage::store::{StoredTable, TableSchema, WeatherStore};
use crate::types::daily_record::DailyRecord;
use crate::types::weather_set::WeatherSet;
use crate::utils::{ensure_dir_exists, get_store_dir};
use bincode::config::{Configuration, Fixint, LittleEndian};
use chrono::NaiveDate;
use log::{debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();
const TABLE_FILE_EXTENSION: &str = "bin";

struct OpenTable {
    path: PathBuf,
    data: StoredTable,
}

/// Stores tables under a folder, one `<table_name>.bin` file each.
///
/// The table is held in memory after [`WeatherStore::initialize`]; every
/// mutating call rewrites the whole file through a temporary file, so a crash
/// never leaves a half-written table behind.
pub struct FileStore {
    folder: PathBuf,
    table: Option<OpenTable>,
}

impl FileStore {
    /// Opens a store in the default data directory (e.g. `~/.local/share/climate_scrape` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StoreDirResolution`] if no data directory exists for this
    /// platform, or [`StoreError::StoreDirCreation`] if it cannot be created.
    pub async fn new() -> Result<Self, StoreError> {
        let folder = get_store_dir().ok_or(StoreError::StoreDirResolution)?;
        Self::with_folder(folder).await
    }

    /// Opens a store in `folder`, creating it if needed.
    pub async fn with_folder(folder: PathBuf) -> Result<Self, StoreError> {
        ensure_dir_exists(&folder)
            .await
            .map_err(|e| StoreError::StoreDirCreation(folder.clone(), e))?;
        Ok(Self {
            folder,
            table: None,
        })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    fn table_path(&self, table_name: &str) -> PathBuf {
        self.folder
            .join(format!("{table_name}.{TABLE_FILE_EXTENSION}"))
    }

    fn table(&self) -> Result<&StoredTable, StoreError> {
        self.table
            .as_ref()
            .map(|t| &t.data)
            .ok_or(StoreError::NotInitialized)
    }

    fn open_table_mut(&mut self) -> Result<&mut OpenTable, StoreError> {
        self.table.as_mut().ok_or(StoreError::NotInitialized)
    }

    async fn read_table(path: PathBuf) -> Result<StoredTable, StoreError> {
        tokio::task::spawn_blocking(move || {
            let bytes =
                std::fs::read(&path).map_err(|e| StoreError::StoreRead(path.clone(), e))?;
            let (table, _) =
                bincode::serde::decode_from_slice::<StoredTable, _>(&bytes, BINCODE_CONFIG)
                    .map_err(|e| StoreError::StoreDecode(path.clone(), Box::new(e)))?;
            Ok(table)
        })
        .await?
    }

    async fn write_table(folder: &Path, table: &OpenTable) -> Result<(), StoreError> {
        let data = table.data.clone();
        let folder = folder.to_path_buf();
        let path = table.path.clone();
        let written = tokio::task::spawn_blocking(move || {
            let bytes = bincode::serde::encode_to_vec(&data, BINCODE_CONFIG)
                .map_err(|e| StoreError::StoreEncode(Box::new(e)))?;
            let mut temp_file = NamedTempFile::new_in(&folder)
                .map_err(|e| StoreError::StoreWrite(path.clone(), e))?;
            temp_file
                .write_all(&bytes)
                .and_then(|_| temp_file.flush())
                .map_err(|e| StoreError::StoreWrite(path.clone(), e))?;
            temp_file
                .persist(&path)
                .map_err(|e| StoreError::StorePersist(path.clone(), e))?;
            Ok::<usize, StoreError>(bytes.len())
        })
        .await??;
        debug!("Wrote {} bytes to {}", written, table.path.display());
        Ok(())
    }

    async fn flush(&self) -> Result<(), StoreError> {
        let table = self.table.as_ref().ok_or(StoreError::NotInitialized)?;
        Self::write_table(&self.folder, table).await
    }
}

impl WeatherStore for FileStore {
    async fn initialize(&mut self, schema: &TableSchema) -> Result<(), StoreError> {
        let path = self.table_path(&schema.table_name);
        let data = if tokio::fs::try_exists(&path)
            .await
            .map_err(|e| StoreError::StoreRead(path.clone(), e))?
        {
            let data = Self::read_table(path.clone()).await?;
            info!(
                "Loaded {} records for table '{}' from {}",
                data.records.len(),
                schema.table_name,
                path.display()
            );
            data
        } else {
            info!("Creating table '{}' at {}", schema.table_name, path.display());
            StoredTable::new(schema.clone())
        };

        self.table = Some(OpenTable { path, data });
        self.flush().await
    }

    async fn save(&mut self, weather: &WeatherSet) -> Result<usize, StoreError> {
        let inserted = self.open_table_mut()?.data.insert_missing(weather);
        if inserted > 0 {
            self.flush().await?;
        }
        info!("Saved {} new of {} scraped records", inserted, weather.len());
        Ok(inserted)
    }

    async fn fetch_by_year(&self, year: i32) -> Result<Vec<DailyRecord>, StoreError> {
        Ok(self.table()?.records.for_year(year))
    }

    async fn fetch_by_month(&self, year: i32, month: u32) -> Result<Vec<DailyRecord>, StoreError> {
        Ok(self.table()?.by_month(year, month))
    }

    async fn purge_all(&mut self) -> Result<(), StoreError> {
        self.open_table_mut()?.data.records = WeatherSet::new();
        self.flush().await
    }

    async fn latest_date(&self) -> Result<Option<NaiveDate>, StoreError> {
        Ok(self.table()?.records.latest_date())
    }
}
