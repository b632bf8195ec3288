//! Date-range fields: defaults, validation, and picker presets.

use std::str::FromStr;

use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{QueryParams, END_DATE, START_DATE};

/// Format used for every date in the query string.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of "today". Injected so year-dependent defaults are testable.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Inclusive range of `YYYY-MM-DD` dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(format_date(start), format_date(end))
    }

    /// `start_date` / `end_date` params for this range.
    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with(START_DATE, self.start.as_str())
            .with(END_DATE, self.end.as_str())
    }
}

/// The current calendar year, computed from `clock` on every call.
pub fn default_date_range(clock: &dyn Clock) -> DateRange {
    let year = clock.today().year();
    DateRange::new(format!("{year}-01-01"), format!("{year}-12-31"))
}

/// Year bounds a date range must fall within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangePolicy {
    #[serde(default = "default_min_year")]
    pub min_year: i32,
    #[serde(default = "default_max_year")]
    pub max_year: i32,
}

fn default_min_year() -> i32 {
    2020
}

fn default_max_year() -> i32 {
    2030
}

impl Default for DateRangePolicy {
    fn default() -> Self {
        Self {
            min_year: default_min_year(),
            max_year: default_max_year(),
        }
    }
}

impl DateRangePolicy {
    /// True when both dates parse, `start <= end`, `start` is not before
    /// `min_year`, and `end` is not after `max_year`.
    pub fn accepts(&self, start: &str, end: &str) -> bool {
        let (Some(start), Some(end)) = (parse_date(start), parse_date(end)) else {
            return false;
        };
        start <= end && start.year() >= self.min_year && end.year() <= self.max_year
    }

    pub fn accepts_range(&self, range: &DateRange) -> bool {
        self.accepts(&range.start, &range.end)
    }
}

/// [`DateRangePolicy::accepts`] under the default 2020–2030 bounds.
pub fn is_valid_date_range(start: &str, end: &str) -> bool {
    DateRangePolicy::default().accepts(start, end)
}

/// Parse a strict `YYYY-MM-DD` date. Empty and malformed strings give `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if raw.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// =============================================================================
// Presets
// =============================================================================

/// Quick-pick ranges offered next to the date inputs. All end today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRangePreset {
    Today,
    Week,
    Month,
    Quarter,
    Year,
}

impl DateRangePreset {
    pub fn range(self, clock: &dyn Clock) -> DateRange {
        let today = clock.today();
        let start = match self {
            DateRangePreset::Today => today,
            DateRangePreset::Week => today.checked_sub_days(Days::new(7)).unwrap_or(today),
            DateRangePreset::Month => today.with_day(1).unwrap_or(today),
            DateRangePreset::Quarter => {
                let first_month = (today.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(today.year(), first_month, 1).unwrap_or(today)
            }
            DateRangePreset::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
        };
        DateRange::from_dates(start, today)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DateRangePreset::Today => "today",
            DateRangePreset::Week => "week",
            DateRangePreset::Month => "month",
            DateRangePreset::Quarter => "quarter",
            DateRangePreset::Year => "year",
        }
    }
}

impl FromStr for DateRangePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(DateRangePreset::Today),
            "week" => Ok(DateRangePreset::Week),
            "month" => Ok(DateRangePreset::Month),
            "quarter" => Ok(DateRangePreset::Quarter),
            "year" => Ok(DateRangePreset::Year),
            other => Err(format!("Unknown date preset: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(y: i32, m: u32, d: u32) -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_default_date_range_uses_clock_year() {
        let range = default_date_range(&clock(2027, 6, 15));
        assert_eq!(range, DateRange::new("2027-01-01", "2027-12-31"));

        let range = default_date_range(&clock(2024, 12, 31));
        assert_eq!(range.start, "2024-01-01");
        assert_eq!(range.end, "2024-12-31");
    }

    #[test]
    fn test_default_date_range_system_clock() {
        let year = Local::now().date_naive().year();
        let range = default_date_range(&SystemClock);
        assert_eq!(range.start, format!("{year}-01-01"));
        assert_eq!(range.end, format!("{year}-12-31"));
    }

    #[test]
    fn test_valid_date_ranges() {
        assert!(is_valid_date_range("2025-01-01", "2025-12-31"));
        assert!(is_valid_date_range("2023-06-15", "2023-06-20"));
        assert!(is_valid_date_range("2020-01-01", "2030-12-31"));
        assert!(is_valid_date_range("2025-03-03", "2025-03-03"));
    }

    #[test]
    fn test_invalid_date_ranges() {
        assert!(!is_valid_date_range("2025-12-31", "2025-01-01"));
        assert!(!is_valid_date_range("2019-01-01", "2019-12-31"));
        assert!(!is_valid_date_range("2031-01-01", "2031-12-31"));
        assert!(!is_valid_date_range("", "2025-12-31"));
        assert!(!is_valid_date_range("2025-01-01", ""));
    }

    #[test]
    fn test_malformed_dates_never_validate() {
        assert!(!is_valid_date_range("2025-02-30", "2025-12-31"));
        assert!(!is_valid_date_range("not-a-date", "2025-12-31"));
        assert!(!is_valid_date_range("2025-1-1", "2025-12-31"));
        assert!(!is_valid_date_range("2025-01-01T00:00", "2025-12-31"));
    }

    #[test]
    fn test_custom_policy_bounds() {
        let policy = DateRangePolicy {
            min_year: 2015,
            max_year: 2040,
        };
        assert!(policy.accepts("2016-01-01", "2035-01-01"));
        assert!(!policy.accepts("2014-12-31", "2016-01-01"));
        assert!(policy.accepts_range(&DateRange::new("2019-01-01", "2019-12-31")));
    }

    #[test]
    fn test_policy_deserializes_with_defaults() {
        let policy: DateRangePolicy = serde_json::from_str(r#"{"maxYear": 2035}"#).unwrap();
        assert_eq!(policy.min_year, 2020);
        assert_eq!(policy.max_year, 2035);
    }

    #[test]
    fn test_presets() {
        let c = clock(2025, 8, 20);
        assert_eq!(
            DateRangePreset::Today.range(&c),
            DateRange::new("2025-08-20", "2025-08-20")
        );
        assert_eq!(
            DateRangePreset::Week.range(&c),
            DateRange::new("2025-08-13", "2025-08-20")
        );
        assert_eq!(
            DateRangePreset::Month.range(&c),
            DateRange::new("2025-08-01", "2025-08-20")
        );
        assert_eq!(
            DateRangePreset::Quarter.range(&c),
            DateRange::new("2025-07-01", "2025-08-20")
        );
        assert_eq!(
            DateRangePreset::Year.range(&c),
            DateRange::new("2025-01-01", "2025-08-20")
        );
    }

    #[test]
    fn test_week_preset_crosses_year() {
        let range = DateRangePreset::Week.range(&clock(2025, 1, 3));
        assert_eq!(range, DateRange::new("2024-12-27", "2025-01-03"));
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("quarter".parse::<DateRangePreset>(), Ok(DateRangePreset::Quarter));
        assert!("fortnight".parse::<DateRangePreset>().is_err());
        assert_eq!(DateRangePreset::Month.as_str(), "month");
    }

    #[test]
    fn test_range_to_params() {
        let params = DateRange::new("2025-01-01", "2025-06-30").to_params();
        assert_eq!(
            crate::query_state::encode(&params),
            "start_date=2025-01-01&end_date=2025-06-30"
        );
    }
}
