use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::calendar::CalendarDate;
use crate::domain::Entry;
use crate::error::CalendarError;

/// Which entries a report covers.
///
/// Bounds are the canonical instants (12:00 UTC) of the selected days and
/// entries are compared by their own instant. The start bound is
/// exclusive. The end bound is pushed forward one day so that the last
/// selected day is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    /// `None` means from the beginning of time.
    pub start: Option<CalendarDate>,
    pub end: CalendarDate,
}

impl ReportWindow {
    pub fn new(start: Option<CalendarDate>, end: CalendarDate) -> Self {
        Self { start, end }
    }

    fn end_exclusive(&self) -> DateTime<Utc> {
        self.end.as_instant() + Duration::days(1)
    }

    pub fn includes(&self, entry: &Entry) -> bool {
        let at = entry.date;
        let after_start = match self.start {
            None => true,
            Some(start) => at > start.as_instant(),
        };
        after_start && at < self.end_exclusive()
    }
}

/// Income/expense totals over a [`ReportWindow`].
///
/// Expense totals are stored as positive magnitudes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub start: Option<CalendarDate>,
    pub end: CalendarDate,

    pub entry_count: usize,

    pub income_total: Decimal,
    pub expense_total: Decimal,
    pub matched_income_total: Decimal,
    pub matched_expense_total: Decimal,

    pub income_count: usize,
    pub expense_count: usize,
    pub unmatched_income_count: usize,
    pub unmatched_expense_count: usize,
}

impl Report {
    pub fn empty(window: ReportWindow) -> Self {
        Self {
            start: window.start,
            end: window.end,
            entry_count: 0,
            income_total: Decimal::ZERO,
            expense_total: Decimal::ZERO,
            matched_income_total: Decimal::ZERO,
            matched_expense_total: Decimal::ZERO,
            income_count: 0,
            expense_count: 0,
            unmatched_income_count: 0,
            unmatched_expense_count: 0,
        }
    }

    /// Aggregates every entry inside `window` and verifies the totals.
    pub fn aggregate(window: ReportWindow, entries: &[Entry]) -> Result<Self, CalendarError> {
        let mut report = Self::empty(window);

        for e in entries.iter().filter(|e| window.includes(e)) {
            report.entry_count += 1;
            if e.is_income() {
                report.income_count += 1;
                report.income_total += e.amount;
                if e.matched {
                    report.matched_income_total += e.amount;
                } else {
                    report.unmatched_income_count += 1;
                }
            } else {
                let magnitude = e.amount.abs();
                report.expense_count += 1;
                report.expense_total += magnitude;
                if e.matched {
                    report.matched_expense_total += magnitude;
                } else {
                    report.unmatched_expense_count += 1;
                }
            }
        }

        report.check_invariants()?;
        Ok(report)
    }

    pub fn balance(&self) -> Decimal {
        self.income_total - self.expense_total
    }

    pub fn matched_balance(&self) -> Decimal {
        self.matched_income_total - self.matched_expense_total
    }

    pub fn check_invariants(&self) -> Result<(), CalendarError> {
        let fail = |msg: String| Err(CalendarError::InconsistentInvariant(msg));

        if self.income_count + self.expense_count != self.entry_count {
            return fail(format!(
                "income_count ({}) + expense_count ({}) != entry_count ({})",
                self.income_count, self.expense_count, self.entry_count
            ));
        }
        if self.unmatched_income_count > self.income_count {
            return fail(format!(
                "unmatched_income_count ({}) > income_count ({})",
                self.unmatched_income_count, self.income_count
            ));
        }
        if self.unmatched_expense_count > self.expense_count {
            return fail(format!(
                "unmatched_expense_count ({}) > expense_count ({})",
                self.unmatched_expense_count, self.expense_count
            ));
        }
        if self.matched_income_total > self.income_total {
            return fail(format!(
                "matched_income_total ({}) > income_total ({})",
                self.matched_income_total, self.income_total
            ));
        }
        if self.matched_expense_total > self.expense_total {
            return fail(format!(
                "matched_expense_total ({}) > expense_total ({})",
                self.matched_expense_total, self.expense_total
            ));
        }
        Ok(())
    }
}
