//! The date-keyed collection a scraping run accumulates.

use crate::types::daily_record::DailyRecord;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Daily records keyed by their date, at most one per date.
///
/// Records are never replaced: [`WeatherSet::insert_new`] refuses a date that is
/// already present and hands the rejected record back. Serializes as a map from
/// ISO 8601 date to record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherSet {
    records: BTreeMap<NaiveDate, DailyRecord>,
}

impl WeatherSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `record` if its date is new.
    ///
    /// # Errors
    ///
    /// Returns the record unchanged when its date is already present; the stored
    /// record is left untouched.
    pub fn insert_new(&mut self, record: DailyRecord) -> Result<(), DailyRecord> {
        match self.records.entry(record.date) {
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
            Entry::Occupied(_) => Err(record),
        }
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.records.contains_key(date)
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&DailyRecord> {
        self.records.get(date)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = &DailyRecord> {
        self.records.values()
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.records.keys().next_back().copied()
    }

    pub fn earliest_date(&self) -> Option<NaiveDate> {
        self.records.keys().next().copied()
    }

    /// Records for a single calendar year, oldest first.
    pub fn for_year(&self, year: i32) -> Vec<DailyRecord> {
        self.iter().filter(|r| r.date.year() == year).copied().collect()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl FromIterator<DailyRecord> for WeatherSet {
    /// Keeps the first record seen for each date.
    fn from_iter<T: IntoIterator<Item = DailyRecord>>(iter: T) -> Self {
        let mut set = WeatherSet::new();
        for record in iter {
            let _ = set.insert_new(record);
        }
        set
    }
}

impl IntoIterator for WeatherSet {
    type Item = DailyRecord;
    type IntoIter = std::collections::btree_map::IntoValues<NaiveDate, DailyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_values()
    }
}
