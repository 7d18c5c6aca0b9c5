//! Groups classified tokens into daily records.

use crate::scraping::pagination::StopReason;
use crate::scraping::tag_recorder::ISO_DATE_FORMAT;
use crate::scraping::token_classifier::{classify, TokenKind};
use crate::types::daily_record::DailyRecord;
use crate::types::weather_set::WeatherSet;
use chrono::NaiveDate;
use log::debug;

/// What one page contributed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PageRecords {
    /// Completed records, in page order.
    pub records: Vec<DailyRecord>,
    /// Date tokens seen, including skipped and duplicate ones.
    pub date_tokens: usize,
    /// Set when the page hit a known date or the resume boundary.
    pub stop: Option<StopReason>,
}

/// Progress on the values for the current date cursor.
#[derive(Debug, Clone, Copy)]
enum Group {
    /// No cursor yet, or the cursor's date is not wanted.
    Idle,
    Collecting {
        date: NaiveDate,
        values: [f64; 3],
        count: usize,
    },
    /// Three values taken, or a malformed value dropped the row.
    Closed,
}

impl Group {
    fn push(self, text: &str) -> (Group, Option<DailyRecord>) {
        let Group::Collecting {
            date,
            mut values,
            count,
        } = self
        else {
            return (self, None);
        };

        let Some(value) = text.parse::<f64>().ok().filter(|v| v.is_finite()) else {
            debug!("Dropping {date}: '{text}' is not a temperature");
            return (Group::Closed, None);
        };

        values[count] = value;
        if count + 1 == values.len() {
            (Group::Closed, Some(DailyRecord::from_triple(date, values)))
        } else {
            let next = Group::Collecting {
                date,
                values,
                count: count + 1,
            };
            (next, None)
        }
    }
}

/// Turns one page's tokens into records, checking each date against what the
/// session already holds.
pub struct RecordAssembler<'a> {
    known: &'a WeatherSet,
    resume_after: Option<NaiveDate>,
}

impl<'a> RecordAssembler<'a> {
    pub fn new(known: &'a WeatherSet, resume_after: Option<NaiveDate>) -> Self {
        Self {
            known,
            resume_after,
        }
    }

    /// Assembles the records of one page.
    ///
    /// A date already in the session stops assembly on the spot; records
    /// completed before it are still returned. When the resume boundary is on
    /// the page, every token up to and including it is discarded, and any other
    /// row dated on or before it is skipped.
    pub fn assemble<T: AsRef<str>>(&self, tokens: &[T]) -> PageRecords {
        let mut page = PageRecords::default();
        let mut boundary_reached = None;
        let all: Vec<&str> = tokens.iter().map(|t| t.as_ref()).collect();
        let mut tokens = all.as_slice();

        if let Some(boundary) = self.resume_after {
            let boundary_token = boundary.format(ISO_DATE_FORMAT).to_string();
            if let Some(pos) = tokens.iter().position(|t| *t == boundary_token) {
                // Dropped dates still count as seen.
                page.date_tokens += tokens[..=pos]
                    .iter()
                    .filter(|t| matches!(classify(t), TokenKind::Date(_)))
                    .count();
                tokens = &tokens[pos + 1..];
                boundary_reached = Some(boundary);
            }
        }

        let mut group = Group::Idle;
        for token in tokens {
            match classify(token) {
                TokenKind::Date(date) => {
                    page.date_tokens += 1;
                    if self.known.contains(&date) {
                        page.stop = Some(StopReason::DuplicateDate(date));
                        return page;
                    }
                    group = match self.resume_after {
                        Some(boundary) if date <= boundary => {
                            boundary_reached = Some(boundary);
                            Group::Idle
                        }
                        _ => Group::Collecting {
                            date,
                            values: [0.0; 3],
                            count: 0,
                        },
                    };
                }
                TokenKind::Noise => {}
                TokenKind::NumericCandidate(text) => {
                    let (next, record) = group.push(text);
                    group = next;
                    page.records.extend(record);
                }
            }
        }

        page.stop = boundary_reached.map(StopReason::ResumeBoundary);
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const SAMPLE: [&str; 9] = [
        "2020-01-05", "1.1", "-3.3", "2.2", "Legend", "2020-01-04", "5.0", "-1.0", "2.0",
    ];

    #[test]
    fn test_two_days_from_fresh_session() {
        let known = WeatherSet::new();
        let page = RecordAssembler::new(&known, None).assemble(&SAMPLE);

        assert_eq!(
            page.records,
            [
                DailyRecord::from_triple(day(2020, 1, 5), [1.1, -3.3, 2.2]),
                DailyRecord::from_triple(day(2020, 1, 4), [5.0, -1.0, 2.0]),
            ]
        );
        assert_eq!(page.date_tokens, 2);
        assert_eq!(page.stop, None);
    }

    #[test]
    fn test_known_date_stops_without_touching_it() {
        let known: WeatherSet = [DailyRecord::from_triple(day(2020, 1, 4), [9.0, 8.0, 7.0])]
            .into_iter()
            .collect();
        let page = RecordAssembler::new(&known, None).assemble(&SAMPLE);

        assert_eq!(
            page.records,
            [DailyRecord::from_triple(day(2020, 1, 5), [1.1, -3.3, 2.2])]
        );
        assert_eq!(page.stop, Some(StopReason::DuplicateDate(day(2020, 1, 4))));
    }

    #[test]
    fn test_partial_groups_are_dropped() {
        let known = WeatherSet::new();
        let tokens = ["2020-01-03", "1.0", "2.0", "2020-01-02", "4.0", "5.0", "6.0"];
        let page = RecordAssembler::new(&known, None).assemble(&tokens);
        assert_eq!(
            page.records,
            [DailyRecord::from_triple(day(2020, 1, 2), [4.0, 5.0, 6.0])]
        );
    }

    #[test]
    fn test_malformed_value_drops_the_whole_day() {
        let known = WeatherSet::new();
        let tokens = [
            "2020-01-03", "1.0", "M", "3.0", "4.0", "2020-01-02", "4.0", "5.0", "6.0",
        ];
        let page = RecordAssembler::new(&known, None).assemble(&tokens);
        assert_eq!(
            page.records,
            [DailyRecord::from_triple(day(2020, 1, 2), [4.0, 5.0, 6.0])]
        );
    }

    #[test]
    fn test_blank_max_cell_drops_the_day_instead_of_shifting() {
        let known = WeatherSet::new();
        let tokens = [
            "2020-01-01", "", "-4.0", "-1.5", "18.0", "2020-01-02", "4.0", "5.0", "6.0",
        ];
        let page = RecordAssembler::new(&known, None).assemble(&tokens);
        assert_eq!(
            page.records,
            [DailyRecord::from_triple(day(2020, 1, 2), [4.0, 5.0, 6.0])]
        );
        assert_eq!(page.date_tokens, 2);
    }

    #[test]
    fn test_values_beyond_the_third_are_ignored() {
        let known = WeatherSet::new();
        let tokens = ["2020-01-03", "1.0", "2.0", "3.0", "17.3", "0.0", "oops", "E"];
        let page = RecordAssembler::new(&known, None).assemble(&tokens);
        assert_eq!(
            page.records,
            [DailyRecord::from_triple(day(2020, 1, 3), [1.0, 2.0, 3.0])]
        );
    }

    #[test]
    fn test_values_before_any_date_are_ignored() {
        let known = WeatherSet::new();
        let tokens = ["12.0", "13.0", "14.0", "2020-01-01", "1.0", "2.0", "3.0"];
        let page = RecordAssembler::new(&known, None).assemble(&tokens);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].date, day(2020, 1, 1));
    }

    #[test]
    fn test_non_finite_values_are_malformed() {
        let known = WeatherSet::new();
        let tokens = ["2020-01-01", "NaN", "2.0", "3.0"];
        let page = RecordAssembler::new(&known, None).assemble(&tokens);
        assert!(page.records.is_empty());
    }

    #[test]
    fn test_resume_boundary_trims_up_to_and_including_it() {
        let known = WeatherSet::new();
        let tokens = [
            "1996-11-04", "1.0", "2.0", "3.0", "1996-11-05", "4.0", "5.0", "6.0", "1996-11-06",
            "7.0", "8.0", "9.0", "1996-11-07", "10.0", "11.0", "12.0",
        ];
        let page = RecordAssembler::new(&known, Some(day(1996, 11, 5))).assemble(&tokens);

        let dates: Vec<_> = page.records.iter().map(|r| r.date).collect();
        assert_eq!(dates, [day(1996, 11, 6), day(1996, 11, 7)]);
        assert_eq!(page.stop, Some(StopReason::ResumeBoundary(day(1996, 11, 5))));
        assert_eq!(page.date_tokens, 4);
    }

    #[test]
    fn test_resume_boundary_missing_from_page_still_excludes_older_days() {
        let known = WeatherSet::new();
        let tokens = [
            "1996-11-04", "1.0", "2.0", "3.0", "1996-11-06", "7.0", "8.0", "9.0",
        ];
        let page = RecordAssembler::new(&known, Some(day(1996, 11, 5))).assemble(&tokens);

        let dates: Vec<_> = page.records.iter().map(|r| r.date).collect();
        assert_eq!(dates, [day(1996, 11, 6)]);
        assert_eq!(page.stop, Some(StopReason::ResumeBoundary(day(1996, 11, 5))));
    }

    #[test]
    fn test_page_newer_than_boundary_does_not_stop() {
        let known = WeatherSet::new();
        let tokens = ["1996-12-01", "1.0", "2.0", "3.0"];
        let page = RecordAssembler::new(&known, Some(day(1996, 11, 5))).assemble(&tokens);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.stop, None);
    }
}
