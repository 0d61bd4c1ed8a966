use crate::types::errors::PeriodError;
use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Format the Braintree search API accepts for `created_at` range bounds.
const FILTER_FORMAT: &str = "%m/%d/%Y %H:%M";

/// A calendar month to report on.
///
/// `start` is midnight on the first day and `end` is 23:59 on the last day;
/// both bounds are inclusive when handed to the search collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPeriod {
    /// Canonical `YYYY-MM` label, used in output filenames.
    pub label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime
}

impl ReportPeriod {
    /// Builds the period covering the month that contains `first_day`.
    fn for_month(first_day: NaiveDate) -> Result<Self, PeriodError> {
        let label = first_day.format("%Y-%m").to_string();

        let last_day = first_day
            .checked_add_months(Months::new(1))
            .and_then(|next_month| next_month.checked_sub_days(Days::new(1)))
            .ok_or_else(|| PeriodError::invalid_format(&label, "month end is out of range"))?;

        let start = first_day
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| PeriodError::invalid_format(&label, "invalid start of day"))?;
        let end = last_day
            .and_hms_opt(23, 59, 0)
            .ok_or_else(|| PeriodError::invalid_format(&label, "invalid end of day"))?;

        Ok(Self { label, start, end })
    }

    pub fn start_filter(&self) -> String {
        self.start.format(FILTER_FORMAT).to_string()
    }

    pub fn end_filter(&self) -> String {
        self.end.format(FILTER_FORMAT).to_string()
    }
}

impl Display for ReportPeriod {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} ({} - {})", self.label, self.start_filter(), self.end_filter())
    }
}

/// Resolves an optional `YYYY-MM` label into a report period.
///
/// Without a label the period is the month before `today`. Stepping back
/// `today.day()` days always lands on the last day of the previous month,
/// whatever the current day is.
///
/// # Errors
/// Returns `PeriodError` when the label is not a valid `YYYY-MM` month.
pub fn resolve_period(month: Option<&str>, today: NaiveDate) -> Result<ReportPeriod, PeriodError> {
    let first_day = match month {
        Some(label) => parse_month(label)?,
        None => {
            let previous = today
                .checked_sub_days(Days::new(u64::from(today.day())))
                .ok_or_else(|| PeriodError::invalid_format(&today.to_string(), "no previous month"))?;

            first_of_month(previous.year(), previous.month(), &previous.to_string())?
        }
    };

    ReportPeriod::for_month(first_day)
}

fn parse_month(label: &str) -> Result<NaiveDate, PeriodError> {
    let trimmed = label.trim();

    let (year, month) = trimmed
        .split_once('-')
        .ok_or_else(|| PeriodError::invalid_format(label, "missing '-' separator"))?;

    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return Err(PeriodError::invalid_format(label, "year must be four digits"));
    }

    if month.is_empty() || month.len() > 2 || !month.chars().all(|c| c.is_ascii_digit()) {
        return Err(PeriodError::invalid_format(label, "month must be one or two digits"));
    }

    let year = year.parse().map_err(|_| PeriodError::invalid_format(label, "year is out of range"))?;
    let month = month.parse().map_err(|_| PeriodError::invalid_format(label, "month is out of range"))?;

    first_of_month(year, month, label)
}

fn first_of_month(year: i32, month: u32, label: &str) -> Result<NaiveDate, PeriodError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| PeriodError::invalid_format(label, format!("month {month} is out of range")))
}
