//! Calendar arithmetic and the month grid.
//!
//! Months are 0-based (January = 0) and weekdays start on Sunday (= 0)
//! throughout. Every day lookup is done in UTC: an entry belongs to the
//! UTC calendar day of its instant, and a [`CalendarDate`] converts to an
//! instant at [`CANONICAL_HOUR`]:00 UTC.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::Entry;
use crate::error::CalendarError;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub const WEEKS: usize = 6;
pub const WEEKDAYS: usize = 7;

/// Hour of day (UTC) at which a calendar day is turned into an instant.
pub const CANONICAL_HOUR: i64 = 12;

/// A single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Builds a date from a raw triple, rolling overflowing months and days
    /// into neighbouring months/years (day 32 of January is February 1st,
    /// month -1 is December of the previous year, day 0 is the last day of
    /// the previous month).
    pub fn from_ymd_normalized(year: i64, month: i64, day: i64) -> Result<Self, CalendarError> {
        let invalid = || CalendarError::InvalidDate { year, month, day };

        let total_months = year
            .checked_mul(12)
            .and_then(|m| m.checked_add(month))
            .ok_or_else(invalid)?;
        let y = i32::try_from(total_months.div_euclid(12)).map_err(|_| invalid())?;
        let m = total_months.rem_euclid(12) as u32;

        let first = NaiveDate::from_ymd_opt(y, m + 1, 1).ok_or_else(invalid)?;
        let offset = day.checked_sub(1).ok_or_else(invalid)?;
        let date = if offset >= 0 {
            first.checked_add_days(Days::new(offset as u64))
        } else {
            first.checked_sub_days(Days::new(offset.unsigned_abs()))
        };
        date.map(Self).ok_or_else(invalid)
    }

    /// The UTC calendar day an instant falls on.
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self(instant.date_naive())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// 0-based month.
    pub fn month(&self) -> u32 {
        self.0.month0()
    }

    /// 1-based day of the month.
    pub fn day_of_month(&self) -> u32 {
        self.0.day()
    }

    /// 0 = Sunday .. 6 = Saturday.
    pub fn weekday(&self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    /// The day at the canonical hour, in UTC.
    pub fn as_instant(&self) -> DateTime<Utc> {
        let midnight = Utc.from_utc_datetime(&self.0.and_time(NaiveTime::default()));
        midnight + Duration::hours(CANONICAL_HOUR)
    }

    pub fn offset_days(&self, days: i64) -> Result<Self, CalendarError> {
        Self::from_ymd_normalized(
            self.year() as i64,
            self.month() as i64,
            (self.day_of_month() as i64).saturating_add(days),
        )
    }

    /// Replaces one component and re-normalizes, so setting the day to 31
    /// in a 30-day month moves to the 1st of the next month.
    pub fn with_field(&self, field: DateField, value: i64) -> Result<Self, CalendarError> {
        let (mut y, mut m, mut d) = (
            self.year() as i64,
            self.month() as i64,
            self.day_of_month() as i64,
        );
        match field {
            DateField::Year => y = value,
            DateField::Month => m = value,
            DateField::DayOfMonth => d = value,
        }
        Self::from_ymd_normalized(y, m, d)
    }

    /// Human label such as `2020 January 10`.
    pub fn label(&self) -> String {
        format!(
            "{} {} {}",
            self.year(),
            MONTH_NAMES[self.month() as usize],
            self.day_of_month()
        )
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Parses `YYYY-MM-DD` with a 1-based month, as written by humans.
impl FromStr for CalendarDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map(Self)
    }
}

/// Component of a [`CalendarDate`] that can be edited on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Year,
    Month,
    DayOfMonth,
}

/// Number of days in a month (0-based).
pub fn days_in_month(year: i32, month: u32) -> Result<u32, CalendarError> {
    let first = CalendarDate::from_ymd_normalized(year as i64, month as i64, 1)?;
    let last = CalendarDate::from_ymd_normalized(year as i64, month as i64 + 1, 0)?;
    Ok((last.0 - first.0).num_days() as u32 + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Month,
    Year,
}

/// Request to move the displayed month by `amount` months or years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavIntent {
    pub direction: NavDirection,
    pub amount: i32,
}

/// The month currently displayed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewMonth {
    pub year: i32,
    /// 0-based.
    pub month: u32,
}

impl ViewMonth {
    pub fn containing(date: CalendarDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn navigate(&self, intent: NavIntent) -> Result<Self, CalendarError> {
        let (dy, dm) = match intent.direction {
            NavDirection::Year => (intent.amount as i64, 0),
            NavDirection::Month => (0, intent.amount as i64),
        };
        let first =
            CalendarDate::from_ymd_normalized(self.year as i64 + dy, self.month as i64 + dm, 1)?;
        Ok(Self::containing(first))
    }

    pub fn title(&self) -> String {
        let name = MONTH_NAMES.get(self.month as usize).copied().unwrap_or("?");
        format!("{} {}", name, self.year)
    }

    pub fn grid(&self) -> Result<MonthGrid, CalendarError> {
        MonthGrid::build(self.year, self.month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub date: CalendarDate,
    /// The day belongs to the previous or next month.
    pub dimmed: bool,
    pub week: usize,
    pub weekday: usize,
}

/// Six weeks of seven days covering a month, Sunday first.
///
/// The grid always has six rows, even when the month fits in five.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    year: i32,
    month: u32,
    first_weekday: u32,
    cells: Vec<GridCell>,
}

impl MonthGrid {
    pub fn build(year: i32, month: u32) -> Result<Self, CalendarError> {
        if month >= 12 {
            return Err(CalendarError::InvalidMonth { month });
        }

        let first = CalendarDate::from_ymd_normalized(year as i64, month as i64, 1)?;
        let first_weekday = first.weekday();

        let mut cells = Vec::with_capacity(WEEKS * WEEKDAYS);
        for week in 0..WEEKS {
            for weekday in 0..WEEKDAYS {
                let offset = (week * WEEKDAYS + weekday) as i64 - first_weekday as i64;
                let date = first.offset_days(offset)?;
                cells.push(GridCell {
                    date,
                    dimmed: date.month() != month,
                    week,
                    weekday,
                });
            }
        }

        Ok(Self {
            year,
            month,
            first_weekday,
            cells,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Weekday (0 = Sunday) of the 1st of the month.
    pub fn first_weekday(&self) -> u32 {
        self.first_weekday
    }

    pub fn cell(&self, week: usize, weekday: usize) -> Option<&GridCell> {
        if week >= WEEKS || weekday >= WEEKDAYS {
            return None;
        }
        self.cells.get(week * WEEKDAYS + weekday)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(WEEKDAYS)
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }
}

/// Entries that fall on `date` (UTC), in input order.
///
/// The returned iterator is lazy and can be cloned to restart it.
pub fn entries_on(
    date: CalendarDate,
    entries: &[Entry],
) -> impl Iterator<Item = &Entry> + Clone {
    entries
        .iter()
        .filter(move |e| CalendarDate::from_instant(e.date) == date)
}

/// Entries grouped by UTC day, built once per render instead of scanning
/// the whole list for every cell.
#[derive(Debug, Default)]
pub struct EntryIndex<'a> {
    by_day: BTreeMap<CalendarDate, Vec<&'a Entry>>,
}

impl<'a> EntryIndex<'a> {
    pub fn build(entries: &'a [Entry]) -> Self {
        let mut by_day: BTreeMap<CalendarDate, Vec<&'a Entry>> = BTreeMap::new();
        for e in entries {
            by_day
                .entry(CalendarDate::from_instant(e.date))
                .or_default()
                .push(e);
        }
        Self { by_day }
    }

    pub fn on(&self, date: CalendarDate) -> &[&'a Entry] {
        self.by_day.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_entries(&self, date: CalendarDate) -> bool {
        self.by_day.contains_key(&date)
    }
}
