pub mod daily_record;
pub mod month;
pub mod weather_set;
