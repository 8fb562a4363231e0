//! Resolution of a drill-down selection into a concrete time window.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use types::TimeWindow;

/// A period selected from the calendar buckets, or a relative span ending
/// now. `All` leaves the window unbounded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Period {
    All,
    Year(i32),
    Month(i32, u32),
    /// Fixed-scheme week: week 0 starts January 1, each week spans seven
    /// days regardless of weekday.
    Week(i32, u32),
    Day(i32, u32, u32),
    LastDays(i64),
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + Duration::days(1) - Duration::seconds(1)
}

impl Period {
    /// Closed window covering the period. Returns `None` when the period
    /// names a date that does not exist (month 13, February 30, a week
    /// past the calendar's range).
    pub fn resolve(self, now: DateTime<Utc>) -> Option<TimeWindow> {
        match self {
            Period::All => Some(TimeWindow::unbounded()),
            Period::Year(year) => {
                let from = NaiveDate::from_ymd_opt(year, 1, 1)?;
                let to = NaiveDate::from_ymd_opt(year, 12, 31)?;
                Some(TimeWindow::between(start_of_day(from), end_of_day(to)))
            }
            Period::Month(year, month) => {
                let from = NaiveDate::from_ymd_opt(year, month, 1)?;
                let next_month = if month == 12 {
                    NaiveDate::from_ymd_opt(year + 1, 1, 1)?
                } else {
                    NaiveDate::from_ymd_opt(year, month + 1, 1)?
                };
                Some(TimeWindow::between(
                    start_of_day(from),
                    start_of_day(next_month) - Duration::seconds(1),
                ))
            }
            Period::Week(year, week) => {
                let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
                let week_start = jan1.checked_add_signed(Duration::days(7 * i64::from(week)))?;
                let week_end = week_start.checked_add_signed(Duration::days(6))?;
                Some(TimeWindow::between(
                    start_of_day(week_start),
                    end_of_day(week_end),
                ))
            }
            Period::Day(year, month, day) => {
                let date = NaiveDate::from_ymd_opt(year, month, day)?;
                Some(TimeWindow::between(start_of_day(date), end_of_day(date)))
            }
            Period::LastDays(days) => Some(TimeWindow::between(now - Duration::days(days), now)),
        }
    }
}
