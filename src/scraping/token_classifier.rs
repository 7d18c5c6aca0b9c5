use crate::scraping::tag_recorder::ISO_DATE_FORMAT;
use chrono::NaiveDate;

/// Text of the legend cells interleaved with the data rows.
const LEGEND_MARKER: &str = "Legend";
/// Single-character annotations that sit next to a value in the same cell
/// (estimated, trace, accumulated). `M` (missing) is not one of them, so a
/// missing value drops the whole row.
const FLAG_MARKERS: [&str; 11] = ["E", "T", "A", "C", "F", "L", "N", "S", "Y", "^", "‡"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind<'a> {
    Date(NaiveDate),
    Noise,
    NumericCandidate(&'a str),
}

/// Labels a single token. Looks at nothing but the token itself.
///
/// An empty token comes from a blank cell and is a numeric candidate that will
/// fail to parse.
pub fn classify(token: &str) -> TokenKind<'_> {
    if let Ok(date) = NaiveDate::parse_from_str(token, ISO_DATE_FORMAT) {
        return TokenKind::Date(date);
    }
    if token.contains(LEGEND_MARKER) || FLAG_MARKERS.contains(&token) {
        return TokenKind::Noise;
    }
    TokenKind::NumericCandidate(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_dates() {
        assert_eq!(
            classify("2020-01-05"),
            TokenKind::Date(NaiveDate::from_ymd_opt(2020, 1, 5).unwrap())
        );
        // Not a real calendar day.
        assert_eq!(classify("2020-02-30"), TokenKind::NumericCandidate("2020-02-30"));
    }

    #[test]
    fn test_noise() {
        assert_eq!(classify("Legend"), TokenKind::Noise);
        assert_eq!(classify("LegendM"), TokenKind::Noise);
        assert_eq!(classify("E"), TokenKind::Noise);
        assert_eq!(classify("‡"), TokenKind::Noise);
    }

    #[test]
    fn test_everything_else_is_a_numeric_candidate() {
        assert_eq!(classify("-3.3"), TokenKind::NumericCandidate("-3.3"));
        assert_eq!(classify("7"), TokenKind::NumericCandidate("7"));
        assert_eq!(classify("M"), TokenKind::NumericCandidate("M"));
        assert_eq!(classify("Sum"), TokenKind::NumericCandidate("Sum"));
        assert_eq!(classify(""), TokenKind::NumericCandidate(""));
    }
}
