use crate::errors::TrackerError;
use chrono::{Datelike, Duration, Local, NaiveDate};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn yesterday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(1)
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(value: &str) -> Result<NaiveDate, TrackerError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| TrackerError::Validation(format!("invalid date '{value}', expected YYYY-MM-DD")))
}

/// Short label used on charts and in the history list, e.g. `May 1`.
pub fn short_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// ISO-8601 `(year, week)`; the year is the one owning the week's Thursday.
pub fn iso_week(date: NaiveDate) -> (i32, u32) {
    let iso = date.iso_week();
    (iso.year(), iso.week())
}

pub fn week_label(year: i32, week: u32) -> String {
    format!("{year}-W{week:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn yesterday_crosses_month_and_year() {
        assert_eq!(yesterday_of(ymd(2024, 3, 1)), ymd(2024, 2, 29));
        assert_eq!(yesterday_of(ymd(2025, 1, 1)), ymd(2024, 12, 31));
    }

    #[test]
    fn parse_date_accepts_iso_and_rejects_garbage() {
        assert_eq!(parse_date("2024-05-01").unwrap(), ymd(2024, 5, 1));
        assert_eq!(parse_date(" 2024-05-01 ").unwrap(), ymd(2024, 5, 1));
        assert!(matches!(parse_date("05/01/2024"), Err(TrackerError::Validation(_))));
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn short_label_has_no_padding() {
        assert_eq!(short_label(ymd(2024, 5, 1)), "May 1");
        assert_eq!(short_label(ymd(2024, 12, 25)), "Dec 25");
    }

    #[test]
    fn iso_week_follows_thursday_rule() {
        assert_eq!(iso_week(ymd(2024, 1, 1)), (2024, 1));
        assert_eq!(iso_week(ymd(2024, 1, 3)), (2024, 1));
        // Friday 2021-01-01 belongs to the last week of 2020.
        assert_eq!(iso_week(ymd(2021, 1, 1)), (2020, 53));
        // Monday 2024-12-30 belongs to week 1 of 2025.
        assert_eq!(iso_week(ymd(2024, 12, 30)), (2025, 1));
        assert_eq!(week_label(2025, 1), "2025-W01");
    }
}
