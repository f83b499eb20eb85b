//! Period boundaries for reports and bulk deletion.
//!
//! All bounds are half-open: `start <= t < end`. Dates are taken in the configured
//! timezone and the resulting instants are returned in UTC, which is how transaction
//! dates are stored. Weeks start on Monday.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

/// A reporting period relative to "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    /// The current calendar day
    Today,
    /// The current Monday-anchored week
    Week,
    /// The current calendar month
    Month,
}

impl Period {
    /// Computes the bounds of this period around `now`, as seen in `tz`.
    #[must_use]
    pub fn bounds(self, now: DateTime<Utc>, tz: Tz) -> PeriodBounds {
        match self {
            Self::Today => day_bounds(now, tz),
            Self::Week => week_bounds(now, tz),
            Self::Month => month_bounds(now, tz),
        }
    }

    /// Heading used in reports
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Today => "Итоги за сегодня",
            Self::Week => "Итоги за неделю",
            Self::Month => "Итоги за месяц",
        }
    }
}

/// Half-open UTC interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodBounds {
    /// Inclusive lower bound
    pub start: DateTime<Utc>,
    /// Exclusive upper bound
    pub end: DateTime<Utc>,
}

impl PeriodBounds {
    /// Whether `instant` falls inside the interval.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Midnight of `date` in `tz`, as a UTC instant.
///
/// A few zones skip midnight on DST change days; the first valid local instant after
/// the gap is used then.
fn local_midnight(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + TimeDelta::hours(1))).earliest())
        .map_or_else(|| Utc.from_utc_datetime(&naive), |dt| dt.with_timezone(&Utc))
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

/// Today: local midnight until the next local midnight.
#[must_use]
pub fn day_bounds(now: DateTime<Utc>, tz: Tz) -> PeriodBounds {
    let today = now.with_timezone(&tz).date_naive();
    PeriodBounds {
        start: local_midnight(tz, today),
        end: local_midnight(tz, add_days(today, 1)),
    }
}

/// This week: the most recent Monday (today included) until the following Monday.
///
/// On a Sunday this walks back six days; it never lands on the upcoming Monday.
#[must_use]
pub fn week_bounds(now: DateTime<Utc>, tz: Tz) -> PeriodBounds {
    let today = now.with_timezone(&tz).date_naive();
    let since_monday = u64::from(today.weekday().num_days_from_monday());
    let monday = today
        .checked_sub_days(Days::new(since_monday))
        .unwrap_or(NaiveDate::MIN);
    PeriodBounds {
        start: local_midnight(tz, monday),
        end: local_midnight(tz, add_days(monday, 7)),
    }
}

/// This month: the 1st at midnight until the 1st of the next month.
#[must_use]
pub fn month_bounds(now: DateTime<Utc>, tz: Tz) -> PeriodBounds {
    let today = now.with_timezone(&tz).date_naive();
    let first = today.with_day(1).unwrap_or(today);
    let next_first = first
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDate::MAX);
    PeriodBounds {
        start: local_midnight(tz, first),
        end: local_midnight(tz, next_first),
    }
}
