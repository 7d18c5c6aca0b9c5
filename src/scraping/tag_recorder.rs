//! Collects table-cell text and inline date markers from one page.

use crate::scraping::markup::{self, MarkupSink};
use chrono::NaiveDate;

const CELL_TAG: &str = "td";
const DATE_MARKER_TAG: &str = "abbr";
/// Format of the long-form date carried by a date marker, e.g. `January 5, 2020`.
const MARKER_DATE_FORMAT: &str = "%B %d, %Y";
pub(crate) const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Records the token stream of a single page.
///
/// Text is kept only while inside at least one table cell. A cell that closes
/// without any text leaves an empty token, so a blank value still occupies its
/// column. Date markers are converted to ISO 8601 tokens regardless of cell
/// depth.
#[derive(Debug, Default)]
pub struct TagRecorder {
    depth: usize,
    cell_has_text: bool,
    tokens: Vec<String>,
}

impl TagRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a whole page and returns its tokens.
    pub fn record_page(html: &str) -> Vec<String> {
        let mut recorder = TagRecorder::new();
        markup::feed(html, &mut recorder);
        recorder.into_tokens()
    }

    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }

    fn record_date_marker(&mut self, attrs: &[(&str, &str)]) {
        let Some((_, value)) = attrs.first() else {
            return;
        };
        // Anything that is not a long-form date (e.g. a legend title) is skipped.
        if let Ok(date) = NaiveDate::parse_from_str(value.trim(), MARKER_DATE_FORMAT) {
            self.tokens.push(date.format(ISO_DATE_FORMAT).to_string());
        }
    }
}

impl MarkupSink for TagRecorder {
    fn start_tag(&mut self, name: &str, attrs: &[(&str, &str)]) {
        if name == DATE_MARKER_TAG {
            self.record_date_marker(attrs);
        }
        if name == CELL_TAG {
            self.depth += 1;
            self.cell_has_text = false;
        }
    }

    fn end_tag(&mut self, name: &str) {
        if name == CELL_TAG && self.depth > 0 {
            self.depth -= 1;
            if !self.cell_has_text {
                self.tokens.push(String::new());
                self.cell_has_text = true;
            }
        }
    }

    fn text(&mut self, data: &str) {
        if self.depth == 0 {
            return;
        }
        let data = data.trim();
        if !data.is_empty() {
            self.tokens.push(data.to_string());
            self.cell_has_text = true;
        }
    }
}
