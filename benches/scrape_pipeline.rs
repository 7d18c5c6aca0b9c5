use chrono::{Datelike, NaiveDate, TimeDelta};
use climate_scrape::{RecordAssembler, ScrapeSession, ScrapeSettings, TagRecorder, WeatherSet};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// A 31-row month page shaped like the archive's daily table.
fn month_page() -> String {
    let first = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let rows: String = (0..31)
        .map(|i| {
            let date = first + TimeDelta::days(i);
            format!(
                "<tr><th scope=\"row\"><abbr title=\"{}\">{:02}</abbr></th>\
                 <td>{:.1}</td><td>{:.1}<abbr title=\"Estimated\">E</abbr></td><td>{:.1}</td>\
                 <td>18.0</td><td>0.0</td><td>0.2</td><td>0.0</td><td>0</td><td></td><td>35</td></tr>",
                date.format("%B %-d, %Y"),
                date.day(),
                i as f64 * 0.5,
                i as f64 * -0.5,
                0.0,
            )
        })
        .collect();
    format!(
        "<html><body><table><thead><tr><th>Day</th><th>Max Temp</th></tr></thead>\
         <tbody>{rows}<tr><td>Sum</td><td>Legend</td></tr></tbody></table></body></html>"
    )
}

fn bench_pipeline(c: &mut Criterion) {
    let html = month_page();
    let tokens = TagRecorder::record_page(&html);
    let known = WeatherSet::new();

    c.bench_function("record_page", |b| {
        b.iter(|| TagRecorder::record_page(black_box(&html)))
    });
    c.bench_function("assemble", |b| {
        b.iter(|| RecordAssembler::new(&known, None).assemble(black_box(&tokens)))
    });
    c.bench_function("process_page", |b| {
        b.iter(|| {
            let mut session = ScrapeSession::new(None, ScrapeSettings::default());
            session.process_page(black_box(&html))
        })
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
