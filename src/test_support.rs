//! Synthetic archive pages for tests.

use crate::scraping::error::ScrapeError;
use crate::scraping::page_fetcher::PageSource;
use crate::types::month::Month;
use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;

/// Renders a daily-data table the way the archive does: a row header with the
/// date marker, then max, min, mean and one trailing column.
pub(crate) fn page(rows: &[(NaiveDate, [&str; 3])]) -> String {
    let body: String = rows
        .iter()
        .map(|(date, [max, min, mean])| {
            format!(
                "<tr><th scope=\"row\"><abbr title=\"{}\">{}</abbr></th>\
                 <td>{max}</td><td>{min}</td><td>{mean}</td><td>0.0</td></tr>",
                date.format("%B %-d, %Y"),
                date.format("%d"),
            )
        })
        .collect();
    format!(
        "<html><body><table><tbody>{body}\
         <tr><td><a href=\"#legend\">Legend</a></td></tr></tbody></table></body></html>"
    )
}

/// Serves canned pages; unknown months get the fallback, or a page without a table.
pub(crate) struct CannedPages {
    pages: HashMap<Month, String>,
    fallback: Option<String>,
    requested: RefCell<Vec<Month>>,
}

impl CannedPages {
    pub(crate) fn new(pages: impl IntoIterator<Item = (Month, String)>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            fallback: None,
            requested: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn with_fallback(mut self, html: String) -> Self {
        self.fallback = Some(html);
        self
    }

    pub(crate) fn requested(&self) -> Vec<Month> {
        self.requested.borrow().clone()
    }
}

impl PageSource for CannedPages {
    async fn fetch_page(&self, month: Month) -> Result<String, ScrapeError> {
        self.requested.borrow_mut().push(month);
        Ok(self
            .pages
            .get(&month)
            .or(self.fallback.as_ref())
            .cloned()
            .unwrap_or_else(|| "<html><body><p>No data</p></body></html>".to_string()))
    }
}
