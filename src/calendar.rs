use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};

pub const WEEKDAY_ABBREVS: [&str; 7] = ["S", "M", "T", "W", "Th", "F", "Sa"];

pub const MAX_DAYS: usize = 31;

// Folds an out-of-range zero-based month into (year, 1-based month).
fn roll_month(year: i32, month0: i32) -> (i32, u32) {
    let total = year as i64 * 12 + month0 as i64;
    let y = total.div_euclid(12) as i32;
    let m = total.rem_euclid(12) as u32 + 1;
    (y, m)
}

fn first_of_month(year: i32, month0: i32) -> Option<NaiveDate> {
    let (y, m) = roll_month(year, month0);
    NaiveDate::from_ymd_opt(y, m, 1)
}

/// Number of days in the month, computed as "day 0 of the next month".
pub fn days_in_month(year: i32, month0: i32) -> u32 {
    first_of_month(year, month0 + 1)
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(MAX_DAYS as u32)
}

pub fn month_label(year: i32, month0: i32) -> String {
    match first_of_month(year, month0) {
        Some(first) => format!("{} {}", first.format("%b"), year),
        None => format!("{year}"),
    }
}

pub fn weekday_abbrev(year: i32, month0: i32, day: u32) -> &'static str {
    first_of_month(year, month0)
        .and_then(|first| first.with_day(day))
        .map(|date| WEEKDAY_ABBREVS[date.weekday().num_days_from_sunday() as usize])
        .unwrap_or("")
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MonthParseError {
    #[error("expected YYYY-MM, got `{0}`")]
    Format(String),
    #[error("month must be between 01 and 12, got `{0}`")]
    MonthOutOfRange(String),
    #[error("year is outside the supported calendar range, got `{0}`")]
    YearOutOfRange(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self::new(today.year(), today.month())
    }

    pub fn month0(&self) -> i32 {
        self.month as i32 - 1
    }

    pub fn days(&self) -> u32 {
        days_in_month(self.year, self.month0())
    }

    pub fn label(&self) -> String {
        month_label(self.year, self.month0())
    }

    /// Previous month; the first supported month stays where it is.
    pub fn pred(&self) -> Self {
        if self.year <= NaiveDate::MIN.year() && self.month <= 1 {
            return *self;
        }
        let (year, month) = roll_month(self.year, self.month0() - 1);
        Self::new(year, month)
    }

    pub fn succ(&self) -> Self {
        if self.year >= NaiveDate::MAX.year() && self.month >= 12 {
            return *self;
        }
        let (year, month) = roll_month(self.year, self.month0() + 1);
        Self::new(year, month)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (year, month) = trimmed
            .split_once('-')
            .ok_or_else(|| MonthParseError::Format(trimmed.to_string()))?;
        let year: i32 = year
            .trim()
            .parse()
            .map_err(|_| MonthParseError::Format(trimmed.to_string()))?;
        let month: u32 = month
            .trim()
            .parse()
            .map_err(|_| MonthParseError::Format(trimmed.to_string()))?;
        if !(1..=12).contains(&month) {
            return Err(MonthParseError::MonthOutOfRange(trimmed.to_string()));
        }
        if !(NaiveDate::MIN.year()..=NaiveDate::MAX.year()).contains(&year) {
            return Err(MonthParseError::YearOutOfRange(trimmed.to_string()));
        }
        Ok(Self::new(year, month))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn february_follows_leap_years() {
        assert_eq!(days_in_month(2024, 1), 29);
        assert_eq!(days_in_month(2023, 1), 28);
        assert_eq!(days_in_month(1900, 1), 28);
        assert_eq!(days_in_month(2000, 1), 29);
    }

    #[test]
    fn month_lengths_match_calendar() {
        assert_eq!(days_in_month(2024, 0), 31);
        assert_eq!(days_in_month(2024, 3), 30);
        assert_eq!(days_in_month(2024, 11), 31);
    }

    #[test]
    fn out_of_range_months_roll_over() {
        // month0 = 12 is January of the next year.
        assert_eq!(days_in_month(2023, 12), 31);
        // month0 = -11 of 2025 is February 2024.
        assert_eq!(days_in_month(2025, -11), 29);
    }

    #[test]
    fn label_uses_short_month_name() {
        assert_eq!(month_label(2024, 2), "Mar 2024");
        assert_eq!(month_label(1999, 11), "Dec 1999");
    }

    #[test]
    fn weekday_abbrev_is_sunday_first() {
        // 2024-03-01 is a Friday, 2024-03-03 a Sunday.
        assert_eq!(weekday_abbrev(2024, 2, 1), "F");
        assert_eq!(weekday_abbrev(2024, 2, 2), "Sa");
        assert_eq!(weekday_abbrev(2024, 2, 3), "S");
        assert_eq!(weekday_abbrev(2024, 2, 7), "Th");
        assert_eq!(weekday_abbrev(2024, 1, 30), "");
    }

    #[test]
    fn month_key_parses_selector_text() {
        assert_eq!("2024-03".parse::<MonthKey>(), Ok(MonthKey::new(2024, 3)));
        assert_eq!(" 2024-3 ".parse::<MonthKey>(), Ok(MonthKey::new(2024, 3)));
        assert!(matches!(
            "2024-13".parse::<MonthKey>(),
            Err(MonthParseError::MonthOutOfRange(_))
        ));
        assert!(matches!(
            "march".parse::<MonthKey>(),
            Err(MonthParseError::Format(_))
        ));
        assert!(matches!(
            "2024-xx".parse::<MonthKey>(),
            Err(MonthParseError::Format(_))
        ));
    }

    #[test]
    fn years_outside_the_calendar_are_rejected() {
        assert!(matches!(
            "2147483647-12".parse::<MonthKey>(),
            Err(MonthParseError::YearOutOfRange(_))
        ));
        assert!(matches!(
            "300000-02".parse::<MonthKey>(),
            Err(MonthParseError::YearOutOfRange(_))
        ));
        let last = format!("{}-12", NaiveDate::MAX.year());
        assert!(last.parse::<MonthKey>().is_ok());
    }

    #[test]
    fn stepping_stops_at_calendar_bounds() {
        let last = MonthKey::new(NaiveDate::MAX.year(), 12);
        assert_eq!(last.succ(), last);
        assert_eq!(last.pred(), MonthKey::new(NaiveDate::MAX.year(), 11));
        let first = MonthKey::new(NaiveDate::MIN.year(), 1);
        assert_eq!(first.pred(), first);
        assert_eq!(first.succ(), MonthKey::new(NaiveDate::MIN.year(), 2));
        assert_eq!(first.days(), 31);
        assert_eq!(first.label(), format!("Jan {}", NaiveDate::MIN.year()));
    }

    #[test]
    fn month_key_steps_across_years() {
        let jan = MonthKey::new(2024, 1);
        assert_eq!(jan.pred(), MonthKey::new(2023, 12));
        assert_eq!(MonthKey::new(2023, 12).succ(), jan);
        assert_eq!(jan.to_string(), "2024-01");
        assert_eq!(MonthKey::new(2024, 2).days(), 29);
    }
}
