//! Date-axis tick generation.
//!
//! Grouped charts label their x-axis with an evenly spaced sequence of
//! calendar dates spanning the data range plus a fixed pad, so figures over
//! different model subsets stay visually comparable.

use chrono::{Duration, NaiveDate};

use crate::error::ChartError;

/// Two-week pad applied on both sides of the data range.
pub const AXIS_PAD_DAYS: i64 = 14;

/// Tick spacing for the grouped charts.
pub const TICK_STEP_DAYS: i64 = 7;

/// Lazy sequence of dates `start + k*step` for `k = 0, 1, ...` while strictly
/// below `end`.
#[derive(Debug, Clone)]
pub struct DateTicks {
    curr: NaiveDate,
    end: NaiveDate,
    step: Duration,
}

impl Iterator for DateTicks {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.curr >= self.end {
            return None;
        }
        let out = self.curr;
        self.curr += self.step;
        Some(out)
    }
}

/// Build the tick sequence, validating the range up front.
///
/// A reversed or empty range is an error rather than a silent empty sequence;
/// an axis with no ticks renders as a blank chart and is much harder to
/// diagnose downstream.
pub fn date_ticks(start: NaiveDate, end: NaiveDate, step_days: i64) -> Result<DateTicks, ChartError> {
    if start >= end {
        return Err(ChartError::invalid_range(format!(
            "Invalid tick range: start {start} must be before end {end}"
        )));
    }
    if step_days < 1 {
        return Err(ChartError::invalid_range(format!(
            "Invalid tick step: {step_days} days (must be >= 1)"
        )));
    }
    Ok(DateTicks {
        curr: start,
        end,
        step: Duration::days(step_days),
    })
}

/// Weekly ticks spanning `[first - 14d, last + 14d)`, the convention shared
/// by every grouped chart.
pub fn padded_ticks(first: NaiveDate, last: NaiveDate) -> Result<Vec<NaiveDate>, ChartError> {
    let start = first - Duration::days(AXIS_PAD_DAYS);
    let end = last + Duration::days(AXIS_PAD_DAYS);
    Ok(date_ticks(start, end, TICK_STEP_DAYS)?.collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn weekly_ticks_over_january() {
        let ticks: Vec<NaiveDate> =
            date_ticks(date("2021-01-01"), date("2021-02-01"), 7).unwrap().collect();
        let expected: Vec<NaiveDate> = [
            "2021-01-01",
            "2021-01-08",
            "2021-01-15",
            "2021-01-22",
            "2021-01-29",
        ]
        .iter()
        .map(|s| date(s))
        .collect();
        assert_eq!(ticks, expected);
    }

    #[test]
    fn end_is_exclusive() {
        let ticks: Vec<NaiveDate> =
            date_ticks(date("2021-01-01"), date("2021-01-08"), 7).unwrap().collect();
        assert_eq!(ticks, vec![date("2021-01-01")]);
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = date_ticks(date("2021-02-01"), date("2021-01-01"), 7).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);

        let err = date_ticks(date("2021-01-01"), date("2021-01-01"), 7).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);
    }

    #[test]
    fn zero_step_is_rejected() {
        let err = date_ticks(date("2021-01-01"), date("2021-02-01"), 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);
    }

    #[test]
    fn padded_ticks_extend_two_weeks_each_side() {
        let ticks = padded_ticks(date("2021-01-15"), date("2021-01-29")).unwrap();
        assert_eq!(ticks.first(), Some(&date("2021-01-01")));
        // Last tick stays strictly below last + 14d.
        assert!(*ticks.last().unwrap() < date("2021-02-12"));
        assert_eq!(ticks.len(), 6);
    }
}
