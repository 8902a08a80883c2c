use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;
use crate::domain::Entry;
use crate::error::CalendarError;
use crate::report::{Report, ReportWindow};

/// A click on a day. `extend` is set when the click should grow the
/// current selection into a range (shift-click).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickIntent {
    pub date: CalendarDate,
    pub extend: bool,
}

impl ClickIntent {
    pub fn plain(date: CalendarDate) -> Self {
        Self {
            date,
            extend: false,
        }
    }

    pub fn extend(date: CalendarDate) -> Self {
        Self { date, extend: true }
    }
}

/// The selected days of the calendar.
///
/// `focus` is the most recently clicked day. `anchor` is the fixed end of
/// a range and only exists in the `Range` state; its order relative to
/// `focus` does not matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SelectionRange {
    #[default]
    Unset,
    SingleDay {
        focus: CalendarDate,
    },
    Range {
        anchor: CalendarDate,
        focus: CalendarDate,
    },
}

impl SelectionRange {
    /// Selection right after the calendar is shown: today, on its own.
    pub fn mounted(today: CalendarDate) -> Self {
        Self::SingleDay { focus: today }
    }

    pub fn anchor(&self) -> Option<CalendarDate> {
        match self {
            Self::Range { anchor, .. } => Some(*anchor),
            _ => None,
        }
    }

    pub fn focus(&self) -> Option<CalendarDate> {
        match self {
            Self::Unset => None,
            Self::SingleDay { focus } | Self::Range { focus, .. } => Some(*focus),
        }
    }

    /// Next state after a click.
    pub fn click(self, intent: ClickIntent) -> Self {
        let date = intent.date;
        match (self, intent.extend) {
            (Self::Unset, _) | (_, false) => Self::SingleDay { focus: date },
            (Self::SingleDay { focus }, true) => Self::Range {
                anchor: focus,
                focus: date,
            },
            (Self::Range { anchor, .. }, true) => Self::Range {
                anchor,
                focus: date,
            },
        }
    }

    /// Replaces the focus endpoint, keeping the state (used when the focus
    /// day is edited field by field).
    pub fn with_focus(self, date: CalendarDate) -> Self {
        match self {
            Self::Unset | Self::SingleDay { .. } => Self::SingleDay { focus: date },
            Self::Range { anchor, .. } => Self::Range {
                anchor,
                focus: date,
            },
        }
    }

    /// Order-normalized `(start, end)`. A single day has no start, which
    /// means "from the beginning".
    pub fn bounds(&self) -> Result<(Option<CalendarDate>, CalendarDate), CalendarError> {
        match *self {
            Self::Unset => Err(CalendarError::NoSelection),
            Self::SingleDay { focus } => Ok((None, focus)),
            Self::Range { anchor, focus } => {
                Ok((Some(anchor.min(focus)), anchor.max(focus)))
            }
        }
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        match *self {
            Self::Unset => false,
            Self::SingleDay { focus } => date == focus,
            Self::Range { anchor, focus } => {
                let (start, end) = (anchor.min(focus), anchor.max(focus));
                start <= date && date <= end
            }
        }
    }

    pub fn window(&self) -> Result<ReportWindow, CalendarError> {
        let (start, end) = self.bounds()?;
        Ok(ReportWindow::new(start, end))
    }

    pub fn report(&self, entries: &[Entry]) -> Result<Report, CalendarError> {
        Report::aggregate(self.window()?, entries)
    }
}
