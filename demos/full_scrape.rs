use chrono::NaiveDate;
use climate_scrape::{ClimateError, ClimateScraper, FetchConfig};
use std::env;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), ClimateError> {
    // Set RUST_LOG=info (or debug) to follow the walk page by page.
    env_logger::init();

    // Optional resume boundary as the first argument, e.g. 1996-11-05.
    let resume_after = env::args()
        .nth(1)
        .and_then(|arg| NaiveDate::parse_from_str(&arg, "%Y-%m-%d").ok());

    let scraper = ClimateScraper::with_config(
        FetchConfig::builder()
            .timeout(Duration::from_secs(20))
            .retries(1)
            .build(),
    )?;

    // Ctrl-C stops before the next page and keeps what was collected.
    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let session = scraper
        .scrape()
        .maybe_resume_after(resume_after)
        .cancellation(cancel)
        .call()
        .await?;

    println!(
        "Collected {} days ({:?} .. {:?}) in {} pages, stopped: {:?}",
        session.weather().len(),
        session.weather().earliest_date(),
        session.weather().latest_date(),
        session.pages_processed(),
        session.stop_reason(),
    );
    match session.weather().to_json_pretty() {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Could not render records: {e}"),
    }
    Ok(())
}
