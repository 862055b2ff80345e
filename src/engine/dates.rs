//! Calendar date recognition for text cells.
//!
//! Regex patterns give a cheap shape check; chrono then validates that the
//! text names a real calendar day (so `2023-02-30` is rejected).

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

use crate::cell::CellValue;
use crate::options::DatePreference;

/// ISO 8601 dates (YYYY-MM-DD or YYYY/MM/DD).
static DATE_ISO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})$").expect("Invalid ISO date pattern")
});

/// Slash or dash dates with the year last (MM/DD/YYYY or DD/MM/YYYY).
static DATE_SLASH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})[-/](\d{1,2})[-/](\d{4})$").expect("Invalid slash date pattern")
});

/// European dotted dates (DD.MM.YYYY).
static DATE_EURO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})$").expect("Invalid Euro date pattern")
});

/// ISO 8601 datetimes, optional seconds, fraction and offset.
static DATETIME_ISO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4})-(\d{1,2})-(\d{1,2})[T ](\d{1,2}):(\d{2})(?::(\d{2}))?(?:\.\d+)?(Z|[+-]\d{2}:?\d{2})?$",
    )
    .expect("Invalid ISO datetime pattern")
});

/// Formats with month names, tried after the numeric patterns.
const NAMED_MONTH_FORMATS: &[&str] = &["%d %b %Y", "%d %B %Y", "%b %d, %Y", "%B %d, %Y", "%b %d %Y"];

/// Parse text as a calendar date or datetime.
///
/// Ambiguous `aa/bb/yyyy` forms are resolved by `pref`; if the preferred
/// reading is not a valid date the other order is tried.
pub fn parse_date(text: &str, pref: DatePreference) -> Option<NaiveDateTime> {
    let s = text.trim();
    // Every supported form is at least `d.m.yyyy` long.
    if s.len() < 8 {
        return None;
    }

    if let Some(c) = DATE_ISO_PATTERN.captures(s) {
        return ymd(&c[1], &c[2], &c[3]).map(midnight);
    }

    if let Some(c) = DATE_SLASH_PATTERN.captures(s) {
        let (first, second, year) = (&c[1], &c[2], &c[3]);
        let (month, day) = if pref.is_dmy() {
            (second, first)
        } else {
            (first, second)
        };
        return ymd(year, month, day)
            .or_else(|| ymd(year, day, month))
            .map(midnight);
    }

    if let Some(c) = DATE_EURO_PATTERN.captures(s) {
        return ymd(&c[3], &c[2], &c[1]).map(midnight);
    }

    if let Some(c) = DATETIME_ISO_PATTERN.captures(s) {
        if c.get(7).is_some() {
            return DateTime::parse_from_rfc3339(&s.replacen(' ', "T", 1))
                .ok()
                .map(|dt| dt.naive_utc());
        }
        let date = ymd(&c[1], &c[2], &c[3])?;
        let hour = c[4].parse().ok()?;
        let minute = c[5].parse().ok()?;
        let second = c.get(6).map_or(Some(0), |m| m.as_str().parse().ok())?;
        return NaiveTime::from_hms_opt(hour, minute, second).map(|t| date.and_time(t));
    }

    if !s.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return None;
    }
    NAMED_MONTH_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map(midnight)
        .or_else(|| DateTime::parse_from_rfc2822(s).ok().map(|dt| dt.naive_utc()))
}

/// True for `Date` cells and text that [`parse_date`] accepts.
pub fn is_date_like(v: &CellValue, pref: DatePreference) -> bool {
    match v {
        CellValue::Date(_) => true,
        CellValue::Text(s) => parse_date(s, pref).is_some(),
        CellValue::Null | CellValue::Number(_) => false,
    }
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn midnight(d: NaiveDate) -> NaiveDateTime {
    d.and_time(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        midnight(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_iso_dates() {
        let mdy = DatePreference::MdyFormat;
        assert_eq!(parse_date("2023-12-31", mdy), Some(date(2023, 12, 31)));
        assert_eq!(parse_date(" 2023/1/5 ", mdy), Some(date(2023, 1, 5)));
        assert_eq!(parse_date("2023-02-30", mdy), None);
    }

    #[test]
    fn test_ambiguous_slash_dates() {
        let mdy = DatePreference::MdyFormat;
        let dmy = DatePreference::DmyFormat;
        assert_eq!(parse_date("03/04/2022", mdy), Some(date(2022, 3, 4)));
        assert_eq!(parse_date("03/04/2022", dmy), Some(date(2022, 4, 3)));
        // only one reading is valid
        assert_eq!(parse_date("31/12/2022", mdy), Some(date(2022, 12, 31)));
    }

    #[test]
    fn test_other_forms() {
        let mdy = DatePreference::MdyFormat;
        assert_eq!(parse_date("24.12.2021", mdy), Some(date(2021, 12, 24)));
        assert_eq!(parse_date("5 Mar 2020", mdy), Some(date(2020, 3, 5)));
        assert_eq!(parse_date("March 5, 2020", mdy), Some(date(2020, 3, 5)));
        assert_eq!(
            parse_date("2023-12-31T12:30:45", mdy),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap().and_hms_opt(12, 30, 45)
        );
        assert_eq!(
            parse_date("2023-12-31T12:30:45Z", mdy),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap().and_hms_opt(12, 30, 45)
        );
    }

    #[test]
    fn test_rejects_non_dates() {
        let mdy = DatePreference::MdyFormat;
        for s in ["", "hello", "12345", "1.5", "12/13", "2023-13-01", "Alice Smith"] {
            assert_eq!(parse_date(s, mdy), None, "{s}");
        }
    }

    #[test]
    fn test_is_date_like() {
        let mdy = DatePreference::MdyFormat;
        assert!(is_date_like(&CellValue::from(date(2020, 1, 1)), mdy));
        assert!(is_date_like(&CellValue::from("2020-01-01"), mdy));
        assert!(!is_date_like(&CellValue::from(20200101.0), mdy));
        assert!(!is_date_like(&CellValue::Null, mdy));
    }
}
