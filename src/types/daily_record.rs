use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of temperature readings, in degrees Celsius.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub max_temp: f64,
    pub min_temp: f64,
    pub mean_temp: f64,
}

impl DailyRecord {
    /// Builds a record from three values in page column order: max, min, mean.
    pub fn from_triple(date: NaiveDate, [max_temp, min_temp, mean_temp]: [f64; 3]) -> Self {
        Self {
            date,
            max_temp,
            min_temp,
            mean_temp,
        }
    }
}
