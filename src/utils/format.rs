//! Display formatting for dates and times coming back from the API.
//!
//! Formatting never fails: anything that does not parse is shown as received.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DISPLAY_DATE: &str = "%d/%m/%Y";
const DISPLAY_TIME: &str = "%I:%M %p";

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// `2024-03-15` becomes `15/03/2024`.
pub fn format_date(value: &str) -> String {
    let trimmed = value.trim();
    match parse_date(trimmed) {
        Some(date) => date.format(DISPLAY_DATE).to_string(),
        None => value.to_string(),
    }
}

/// `14:05` becomes `02:05 PM`.
pub fn format_time(value: &str) -> String {
    let trimmed = value.trim();
    match parse_time(trimmed) {
        Some(time) => time.format(DISPLAY_TIME).to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-15"), "15/03/2024");
        assert_eq!(format_date("2024-03-15T10:30:00Z"), "15/03/2024");
        assert_eq!(format_date("2024-03-15T10:30:00.000"), "15/03/2024");
        assert_eq!(format_date(" 2024-12-01 "), "01/12/2024");
    }

    #[test]
    fn test_format_date_passthrough() {
        assert_eq!(format_date("next monday"), "next monday");
        assert_eq!(format_date(""), "");
        assert_eq!(format_date("2024-02-30"), "2024-02-30");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time("14:05"), "02:05 PM");
        assert_eq!(format_time("09:30"), "09:30 AM");
        assert_eq!(format_time("00:00"), "12:00 AM");
        assert_eq!(format_time("12:15:00"), "12:15 PM");
    }

    #[test]
    fn test_format_time_passthrough() {
        assert_eq!(format_time("25:00"), "25:00");
        assert_eq!(format_time("morning"), "morning");
    }
}
