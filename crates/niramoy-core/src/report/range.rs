//! Date-range resolution for reports.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Kind of report period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Daily => "daily",
            ReportType::Weekly => "weekly",
            ReportType::Monthly => "monthly",
            ReportType::Custom => "custom",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(ReportType::Daily),
            "weekly" => Some(ReportType::Weekly),
            "monthly" => Some(ReportType::Monthly),
            "custom" => Some(ReportType::Custom),
            _ => None,
        }
    }
}

/// A resolved report window, inclusive on both ends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ReportRange {
    /// Whether a business date falls inside the window.
    pub fn contains_day(&self, day: NaiveDate) -> bool {
        day >= self.start.date() && day <= self.end.date()
    }

    /// First calendar day of the window.
    pub fn start_day(&self) -> NaiveDate {
        self.start.date()
    }

    /// Last calendar day of the window.
    pub fn end_day(&self) -> NaiveDate {
        self.end.date()
    }
}

/// Resolve a report type and reference date into a concrete window.
///
/// Weeks run Sunday through Saturday; months follow the calendar. Custom
/// needs both bounds, in order. `None` means "no computable range" and is a
/// normal result (the caller shows an empty/prompt state), never an error.
pub fn resolve_range(
    report_type: ReportType,
    reference: NaiveDate,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
) -> Option<ReportRange> {
    match report_type {
        ReportType::Daily => Some(day_range(reference, reference)),
        ReportType::Weekly => {
            let offset = reference.weekday().num_days_from_sunday() as i64;
            let sunday = reference - Duration::days(offset);
            Some(day_range(sunday, sunday + Duration::days(6)))
        }
        ReportType::Monthly => {
            let first = reference.with_day(1).expect("day 1 is always valid");
            let next_month = if first.month() == 12 {
                NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
            }
            .expect("first of month is always valid");
            Some(day_range(first, next_month - Duration::days(1)))
        }
        ReportType::Custom => {
            let start = custom_start?;
            let end = custom_end?;
            if start > end {
                return None;
            }
            Some(day_range(start, end))
        }
    }
}

/// Resolve from raw form input. Malformed dates or an unknown report type
/// yield `None`, same as an incomplete custom range.
pub fn resolve_range_str(
    report_type: &str,
    reference: &str,
    custom_start: Option<&str>,
    custom_end: Option<&str>,
) -> Option<ReportRange> {
    let report_type = ReportType::parse(report_type)?;
    let reference = parse_day(reference)?;
    let custom_start = match custom_start {
        Some(s) => Some(parse_day(s)?),
        None => None,
    };
    let custom_end = match custom_end {
        Some(s) => Some(parse_day(s)?),
        None => None,
    };
    resolve_range(report_type, reference, custom_start, custom_end)
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn day_range(start: NaiveDate, end: NaiveDate) -> ReportRange {
    ReportRange {
        start: start.and_hms_opt(0, 0, 0).expect("midnight is always valid"),
        end: end.and_hms_opt(23, 59, 59).expect("23:59:59 is always valid"),
    }
}
