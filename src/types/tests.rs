use super::errors::PeriodError;
use super::resolve_period;
use anyhow::Result;
use chrono::NaiveDate;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

#[test]
fn test_period_resolves_leap_and_common_february_end() -> Result<()> {
    let today = date(2024, 6, 15);

    assert_eq!(resolve_period(Some("2024-02"), today)?.end_filter(), "02/29/2024 23:59");
    assert_eq!(resolve_period(Some("2023-02"), today)?.end_filter(), "02/28/2023 23:59");

    Ok(())
}

#[test]
fn test_period_resolves_month_ends_of_every_length() -> Result<()> {
    let today = date(2024, 6, 15);
    let test_cases = vec![
        ("2024-01", "01/31/2024 23:59"),
        ("2024-04", "04/30/2024 23:59"),
        ("2024-12", "12/31/2024 23:59"),
        ("1900-02", "02/28/1900 23:59"),
        ("2000-02", "02/29/2000 23:59"),
    ];

    for (label, expected_end) in test_cases {
        assert_eq!(resolve_period(Some(label), today)?.end_filter(), expected_end);
    }

    Ok(())
}

#[test]
fn test_period_starts_at_midnight_on_the_first() -> Result<()> {
    let period = resolve_period(Some("2024-03"), date(2024, 6, 15))?;

    assert_eq!(period.start_filter(), "03/01/2024 00:00");
    assert_eq!(period.label, "2024-03");

    Ok(())
}

#[test]
fn test_period_defaults_to_previous_month() -> Result<()> {
    assert_eq!(resolve_period(None, date(2024, 6, 15))?.label, "2024-05");
    assert_eq!(resolve_period(None, date(2024, 6, 1))?.label, "2024-05");
    assert_eq!(resolve_period(None, date(2024, 6, 30))?.label, "2024-05");
    assert_eq!(resolve_period(None, date(2024, 3, 31))?.label, "2024-02");
    assert_eq!(resolve_period(None, date(2024, 1, 10))?.label, "2023-12");

    Ok(())
}

#[test]
fn test_period_default_resolves_full_window() -> Result<()> {
    let period = resolve_period(None, date(2024, 3, 31))?;

    assert_eq!(period.start_filter(), "02/01/2024 00:00");
    assert_eq!(period.end_filter(), "02/29/2024 23:59");

    Ok(())
}

#[test]
fn test_period_canonicalizes_single_digit_month() -> Result<()> {
    assert_eq!(resolve_period(Some(" 2024-3 "), date(2024, 6, 15))?.label, "2024-03");

    Ok(())
}

#[test]
fn test_period_rejects_malformed_labels() {
    let today = date(2024, 6, 15);

    for label in ["", "2024", "2024-13", "2024-00", "24-01", "2024-01-05", "abcd-ef", "2024/01", "2024-+1"] {
        assert!(
            matches!(resolve_period(Some(label), today), Err(PeriodError::InvalidFormat { .. })),
            "expected '{label}' to be rejected"
        );
    }
}
