use thiserror::Error;

/// Failures surfaced by the calendar core.
///
/// None of these are recoverable inside the core: they are precondition
/// violations or logic defects and are handed straight back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// `MonthGrid::build` was given a month outside 0..=11.
    #[error("invalid month {month}: expected a 0-based month in 0..=11")]
    InvalidMonth { month: u32 },

    /// A report was requested before any day was selected.
    #[error("no day is selected")]
    NoSelection,

    /// One of the report aggregation invariants did not hold.
    #[error("report invariant violated: {0}")]
    InconsistentInvariant(String),

    /// Calendar arithmetic left the representable date range.
    #[error("date out of range: year {year}, month {month}, day {day}")]
    InvalidDate { year: i64, month: i64, day: i64 },
}
