//! Calendar core for browsing dated finance entries: month grids, day and
//! range selection, and income/expense reports over the selected days.

pub mod calendar;
pub mod domain;
pub mod error;
pub mod report;
pub mod selection;

pub use calendar::{
    CalendarDate, DateField, EntryIndex, GridCell, MonthGrid, NavDirection, NavIntent, ViewMonth,
    entries_on,
};
pub use domain::{Entry, NEW_ENTRY_ID};
pub use error::CalendarError;
pub use report::{Report, ReportWindow};
pub use selection::{ClickIntent, SelectionRange};
