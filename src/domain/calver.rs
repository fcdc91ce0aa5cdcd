//! Calendar version period formatting and rollover.
//!
//! Period strings are produced from a small format language: the literal
//! token `WW` stands for the zero-padded ISO week number, and `2006`/`YYYY`
//! both stand for the year. When `WW` is present the year token renders the
//! ISO week-year, which can differ from the calendar year in the first and
//! last days of a year.

use crate::domain::version::{Version, VersionKind};
use chrono::{DateTime, Datelike, Utc};

/// Format a point in time as a calver period string.
///
/// With `WW` in the format only the `WW`/`2006`/`YYYY` tokens are
/// substituted (week number and ISO week-year); everything else is kept
/// literal. Without `WW` the format is applied as a conventional date
/// format: the tokens `2006`/`YYYY`, `01`/`MM` and `02`/`DD` map to year,
/// month and day, and raw chrono `%` specifiers pass through untouched.
pub fn format_calver(now: DateTime<Utc>, format: &str) -> String {
    if format.contains("WW") {
        let iso = now.iso_week();
        let week = format!("{:02}", iso.week());
        let year = iso.year().to_string();
        return format
            .replace("WW", &week)
            .replace("2006", &year)
            .replace("YYYY", &year);
    }

    // Translate tokens on the layout first, then format in a single pass;
    // substituting rendered values directly can collide with digits already
    // present in the output (a year like 2025 contains "02").
    let layout = format
        .replace("2006", "%Y")
        .replace("YYYY", "%Y")
        .replace("01", "%m")
        .replace("MM", "%m")
        .replace("02", "%d")
        .replace("DD", "%d");

    now.format(&layout).to_string()
}

/// Whether a calver format renders ISO week periods.
pub fn is_week_format(format: &str) -> bool {
    format.contains("WW")
}

/// Compute the next calendar version for the given format and current time.
///
/// If the current version belongs to the same period, the sequence is
/// incremented. Otherwise the sequence starts at 1 for week-based formats
/// (week periods always carry an explicit build number for traceability
/// across the recurring cadence) and at 0, meaning omitted, for date-based
/// formats.
///
/// Prerelease/metadata overlays are not carried over; callers apply them as
/// a final step.
pub fn next_calver(current: Option<&Version>, format: &str, now: DateTime<Utc>) -> Version {
    let period_now = format_calver(now, format);

    let mut sequence = 0;
    match current.map(|v| &v.kind) {
        Some(VersionKind::CalVer {
            period,
            sequence: current_seq,
        }) if *period == period_now => {
            sequence = current_seq + 1;
        }
        _ => {
            if is_week_format(format) {
                sequence = 1;
            }
        }
    }

    Version::calver(period_now, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_format_calver_date() {
        assert_eq!(format_calver(at(2025, 10, 2), "2006.01.02"), "2025.10.02");
    }

    #[test]
    fn test_format_calver_date_letter_tokens() {
        assert_eq!(format_calver(at(2025, 10, 2), "YYYY.MM.DD"), "2025.10.02");
    }

    #[test]
    fn test_format_calver_strftime_passthrough() {
        assert_eq!(format_calver(at(2025, 10, 2), "%Y.%m.%d"), "2025.10.02");
    }

    #[test]
    fn test_format_calver_year_month() {
        assert_eq!(format_calver(at(2025, 11, 9), "2006.01"), "2025.11");
    }

    #[test]
    fn test_format_calver_week() {
        // 2025-10-02 falls in ISO week 40
        assert_eq!(format_calver(at(2025, 10, 2), "2006.WW"), "2025.40");
        assert_eq!(format_calver(at(2025, 10, 2), "YYYY.WW"), "2025.40");
    }

    #[test]
    fn test_format_calver_week_zero_padded() {
        // 2025-01-08 falls in ISO week 2
        assert_eq!(format_calver(at(2025, 1, 8), "2006.WW"), "2025.02");
    }

    #[test]
    fn test_format_calver_uses_iso_week_year() {
        // 2024-12-30 belongs to ISO week 1 of 2025
        assert_eq!(format_calver(at(2024, 12, 30), "2006.WW"), "2025.01");
        // 2027-01-01 belongs to ISO week 53 of 2026
        assert_eq!(format_calver(at(2027, 1, 1), "2006.WW"), "2026.53");
    }

    #[test]
    fn test_next_calver_first_release_week_format() {
        let next = next_calver(None, "2006.WW", at(2025, 10, 2));
        assert_eq!(next.to_string(), "2025.40.1");
    }

    #[test]
    fn test_next_calver_first_release_date_format() {
        let next = next_calver(None, "2006.01.02", at(2025, 10, 2));
        assert_eq!(next.to_string(), "2025.10.02");
    }

    #[test]
    fn test_next_calver_same_period_increments() {
        let current = Version::calver("2025.40", 1);
        let next = next_calver(Some(&current), "2006.WW", at(2025, 10, 2));
        assert_eq!(next.to_string(), "2025.40.2");
    }

    #[test]
    fn test_next_calver_same_day_increments_from_zero() {
        let current = Version::calver("2025.10.02", 0);
        let next = next_calver(Some(&current), "2006.01.02", at(2025, 10, 2));
        assert_eq!(next.to_string(), "2025.10.02.1");
    }

    #[test]
    fn test_next_calver_week_rollover_resets_to_one() {
        let current = Version::calver("2025.39", 7);
        let next = next_calver(Some(&current), "2006.WW", at(2025, 10, 2));
        assert_eq!(next.to_string(), "2025.40.1");
    }

    #[test]
    fn test_next_calver_date_rollover_omits_sequence() {
        let current = Version::calver("2025.10.01", 4);
        let next = next_calver(Some(&current), "2006.01.02", at(2025, 10, 2));
        assert_eq!(next.to_string(), "2025.10.02");
    }

    #[test]
    fn test_next_calver_semver_current_treated_as_new_period() {
        let current = Version::semver(1, 2, 3);
        let next = next_calver(Some(&current), "2006.WW", at(2025, 10, 2));
        assert_eq!(next.to_string(), "2025.40.1");
    }

    #[test]
    fn test_next_calver_ignores_overlays_on_current() {
        let current = Version::calver("2025.40", 1).with_prerelease("rc.1");
        let next = next_calver(Some(&current), "2006.WW", at(2025, 10, 2));
        assert_eq!(next.to_string(), "2025.40.2");
    }
}
