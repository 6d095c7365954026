//! Time-bucketing helpers.
//!
//! Pure functions over UTC timestamps. Day-of-week numbering follows the
//! source data's convention: 0 = Sunday through 6 = Saturday.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hour of day, 0-23.
pub fn hour_of_day(timestamp: DateTime<Utc>) -> u32 {
    timestamp.hour()
}

/// Day of week, 0 = Sunday .. 6 = Saturday.
pub fn day_of_week(timestamp: DateTime<Utc>) -> u32 {
    timestamp.weekday().num_days_from_sunday()
}

/// Calendar date at day granularity.
pub fn calendar_date(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.date_naive()
}

/// True for Saturday and Sunday.
pub fn is_weekend(timestamp: DateTime<Utc>) -> bool {
    matches!(day_of_week(timestamp), 0 | 6)
}

/// Year-month bucket, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(timestamp: DateTime<Utc>) -> Self {
        YearMonth {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Weekend/weekday classification, usable as a composite grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayKind {
    Weekday,
    Weekend,
}

impl DayKind {
    pub fn of(timestamp: DateTime<Utc>) -> Self {
        if is_weekend(timestamp) {
            DayKind::Weekend
        } else {
            DayKind::Weekday
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn hour_extraction() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 17, 45, 0).unwrap();
        assert_eq!(hour_of_day(ts), 17);
    }

    #[test]
    fn sunday_is_zero_saturday_is_six() {
        // 2024-03-03 is a Sunday, 2024-03-02 a Saturday.
        let sunday = Utc.with_ymd_and_hms(2024, 3, 3, 12, 0, 0).unwrap();
        let saturday = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();
        let monday = Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap();
        assert_eq!(day_of_week(sunday), 0);
        assert_eq!(day_of_week(saturday), 6);
        assert_eq!(day_of_week(monday), 1);
    }

    #[test]
    fn weekend_classification() {
        let sunday = Utc.with_ymd_and_hms(2024, 3, 3, 12, 0, 0).unwrap();
        let wednesday = Utc.with_ymd_and_hms(2024, 3, 6, 12, 0, 0).unwrap();
        assert!(is_weekend(sunday));
        assert!(!is_weekend(wednesday));
        assert_eq!(DayKind::of(sunday), DayKind::Weekend);
        assert_eq!(DayKind::of(wednesday), DayKind::Weekday);
    }

    #[test]
    fn calendar_date_truncates_to_day() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 59).unwrap();
        assert_eq!(calendar_date(ts), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn year_month_orders_chronologically_and_formats() {
        let dec = YearMonth { year: 2023, month: 12 };
        let jan = YearMonth { year: 2024, month: 1 };
        assert!(dec < jan);
        assert_eq!(jan.to_string(), "2024-01");

        let ts = Utc.with_ymd_and_hms(2024, 7, 15, 0, 0, 0).unwrap();
        assert_eq!(YearMonth::of(ts), YearMonth { year: 2024, month: 7 });
    }
}
