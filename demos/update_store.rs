use climate_scrape::{ClimateError, ClimateScraper, FileStore, TableSchema, WeatherStore};
use std::env;

#[tokio::main]
async fn main() -> Result<(), ClimateError> {
    env_logger::init();

    let mut store = FileStore::new().await?;
    store.initialize(&TableSchema::default()).await?;

    let scraper = ClimateScraper::new()?;
    // `--all` reloads everything; otherwise only the missing days are fetched.
    let report = if env::args().any(|arg| arg == "--all") {
        scraper.install_all(&mut store).await?
    } else {
        scraper.update(&mut store).await?
    };

    println!(
        "Fetched {} pages, scraped {} days, inserted {} into {}",
        report.pages_fetched,
        report.records_scraped,
        report.records_inserted,
        store.folder().display()
    );

    if let Some(latest) = store.latest_date().await? {
        use chrono::Datelike;
        for record in store.fetch_by_month(latest.year(), latest.month()).await? {
            println!(
                "{}  max {:>6.1}  min {:>6.1}  mean {:>6.1}",
                record.date, record.max_temp, record.min_temp, record.mean_temp
            );
        }
    }
    Ok(())
}
