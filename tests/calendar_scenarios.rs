use chrono::{DateTime, Utc};
use moneycal::calendar::days_in_month;
use moneycal::{
    CalendarDate, ClickIntent, Entry, MonthGrid, Report, SelectionRange, ViewMonth, entries_on,
};
use rust_decimal::Decimal;
use std::str::FromStr;

fn d(s: &str) -> CalendarDate {
    CalendarDate::from_str(s).expect("date")
}

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("rfc3339")
        .with_timezone(&Utc)
}

fn entry(id: i64, amount: i64, matched: bool, day: &str) -> Entry {
    Entry {
        id,
        name: format!("entry-{id}"),
        description: String::new(),
        amount: Decimal::from(amount),
        date: d(day).as_instant(),
        matched,
    }
}

fn sample_entries() -> Vec<Entry> {
    vec![
        entry(1, 100, true, "2020-01-05"),
        entry(2, -30, false, "2020-01-10"),
    ]
}

fn range(a: &str, b: &str) -> SelectionRange {
    SelectionRange::Unset
        .click(ClickIntent::plain(d(a)))
        .click(ClickIntent::extend(d(b)))
}

fn every_day_between(start: &str, days: i64) -> Vec<CalendarDate> {
    let first = d(start);
    (0..days).map(|i| first.offset_days(i).expect("in range")).collect()
}

#[test]
fn every_month_grid_has_42_cells_and_one_cell_per_day() {
    for year in [1900, 1999, 2000, 2015, 2019, 2020, 2021, 2024, 2100] {
        for month in 0..12 {
            let grid = MonthGrid::build(year, month).expect("valid month");
            assert_eq!(grid.cells().len(), 42, "{year}-{month}");

            let first = grid
                .cell(0, grid.first_weekday() as usize)
                .expect("first cell");
            assert_eq!(first.date.day_of_month(), 1);
            assert!(!first.dimmed);

            let in_month: Vec<_> = grid.cells().iter().filter(|c| !c.dimmed).collect();
            let n = days_in_month(year, month).expect("days");
            assert_eq!(in_month.len() as u32, n, "{year}-{month}");
            for (i, cell) in in_month.iter().enumerate() {
                assert_eq!(cell.date.day_of_month(), i as u32 + 1);
                assert_eq!(cell.date.month(), month);
                assert_eq!(cell.date.year(), year);
            }
        }
    }
}

#[test]
fn january_2020_starts_on_wednesday_after_dimmed_december_days() {
    let grid = MonthGrid::build(2020, 0).expect("grid");
    assert_eq!(grid.first_weekday(), 3);

    let first = grid.cell(0, 3).expect("cell");
    assert_eq!(first.date.day_of_month(), 1);
    assert!(!first.dimmed);

    for (weekday, day) in [(0, 29), (1, 30), (2, 31)] {
        let cell = grid.cell(0, weekday).expect("cell");
        assert!(cell.dimmed);
        assert_eq!(cell.date, d(&format!("2019-12-{day}")));
    }

    let last = grid.cell(5, 6).expect("cell");
    assert!(last.dimmed);
    assert_eq!(last.date, d("2020-02-08"));
}

#[test]
fn grid_from_navigated_view_matches_direct_build() {
    let view = ViewMonth { year: 2020, month: 0 }
        .navigate(moneycal::NavIntent {
            direction: moneycal::NavDirection::Month,
            amount: -1,
        })
        .expect("navigate");
    let grid = view.grid().expect("grid");
    assert_eq!((grid.year(), grid.month()), (2019, 11));
}

#[test]
fn plain_click_selects_exactly_that_day() {
    let day = d("2020-02-29");
    let sel = SelectionRange::mounted(d("2020-01-01")).click(ClickIntent::plain(day));
    for other in every_day_between("2020-01-15", 60) {
        assert_eq!(sel.contains(other), other == day, "{other}");
    }
}

#[test]
fn range_membership_does_not_depend_on_click_order() {
    let pairs = [
        ("2020-01-01", "2020-01-10"),
        ("2019-12-28", "2020-01-03"),
        ("2020-03-15", "2020-03-15"),
    ];
    for (a, b) in pairs {
        let forward = range(a, b);
        let backward = range(b, a);
        for day in every_day_between("2019-12-01", 120) {
            assert_eq!(forward.contains(day), backward.contains(day), "{a} {b} {day}");
        }
        assert_eq!(forward.bounds().unwrap(), backward.bounds().unwrap());
    }
}

#[test]
fn report_is_idempotent() {
    let entries = sample_entries();
    let sel = range("2020-01-01", "2020-01-10");
    let first = sel.report(&entries).expect("report");
    let second = sel.report(&entries).expect("report");
    assert_eq!(first, second);
}

#[test]
fn single_day_reports_from_the_beginning_through_that_day() {
    let sel = SelectionRange::Unset.click(ClickIntent::plain(d("2020-01-10")));
    let report = sel.report(&sample_entries()).expect("report");

    assert_eq!(report.start, None);
    assert_eq!(report.end, d("2020-01-10"));
    assert_eq!(report.expense_total, Decimal::from(30));
    assert_eq!(report.unmatched_expense_count, 1);
    // A single day reports from the beginning of time up to noon UTC of the
    // day after the focus, so the January 5th income is counted as well.
    assert_eq!(report.income_total, Decimal::from(100));
    assert_eq!(report.entry_count, 2);

    let before = SelectionRange::Unset.click(ClickIntent::plain(d("2020-01-09")));
    let report = before.report(&sample_entries()).expect("report");
    assert_eq!(report.expense_total, Decimal::ZERO);
    assert_eq!(report.income_total, Decimal::from(100));
}

#[test]
fn range_report_counts_interior_and_end_days() {
    let report = range("2020-01-01", "2020-01-10")
        .report(&sample_entries())
        .expect("report");

    assert_eq!(report.income_total, Decimal::from(100));
    assert_eq!(report.expense_total, Decimal::from(30));
    assert_eq!(report.balance(), Decimal::from(70));
    assert_eq!(report.matched_income_total, Decimal::from(100));
    assert_eq!(report.matched_expense_total, Decimal::ZERO);
    assert_eq!(report.matched_balance(), Decimal::from(100));
    assert_eq!(report.income_count, 1);
    assert_eq!(report.expense_count, 1);
    assert_eq!(report.unmatched_income_count, 0);
    assert_eq!(report.unmatched_expense_count, 1);
}

#[test]
fn reversed_range_report_is_identical() {
    let forward = range("2020-01-01", "2020-01-10")
        .report(&sample_entries())
        .expect("report");
    let backward = range("2020-01-10", "2020-01-01")
        .report(&sample_entries())
        .expect("report");
    assert_eq!(forward, backward);
}

#[test]
fn entry_on_the_start_day_is_left_out_of_the_report() {
    let sel = range("2020-01-05", "2020-01-10");
    assert!(sel.contains(d("2020-01-05")));

    let report = sel.report(&sample_entries()).expect("report");
    assert_eq!(report.income_total, Decimal::ZERO);
    assert_eq!(report.income_count, 0);
    assert_eq!(report.expense_total, Decimal::from(30));
}

#[test]
fn day_matching_uses_utc() {
    // 20:00 in New York on January 4th is already January 5th in UTC.
    let mut late = entry(9, 5, false, "2020-01-04");
    late.date = at("2020-01-04T20:00:00-05:00");
    let entries = vec![late];

    assert_eq!(entries_on(d("2020-01-05"), &entries).count(), 1);
    assert_eq!(entries_on(d("2020-01-04"), &entries).count(), 0);

    // 01:00 UTC is before noon of January 5th, the exclusive start bound of
    // a range starting that day.
    let report = range("2020-01-05", "2020-01-06").report(&entries).expect("report");
    assert_eq!(report.entry_count, 0);
    let report = range("2020-01-04", "2020-01-06").report(&entries).expect("report");
    assert_eq!(report.entry_count, 1);

    // 13:00 in New York is 18:00 UTC, after the start bound.
    let mut afternoon = entry(10, 7, false, "2020-01-05");
    afternoon.date = at("2020-01-05T13:00:00-05:00");
    let report = range("2020-01-05", "2020-01-06")
        .report(&[afternoon])
        .expect("report");
    assert_eq!(report.entry_count, 1);
}

#[test]
fn window_edges_compare_raw_instants() {
    let mut start_evening = entry(1, 7, false, "2020-01-05");
    start_evening.date = at("2020-01-05T18:00:00Z");
    let mut after_end = entry(2, 11, true, "2020-01-11");
    after_end.date = at("2020-01-11T00:00:00Z");
    let mut past_end_noon = entry(3, 13, true, "2020-01-11");
    past_end_noon.date = at("2020-01-11T12:00:00Z");

    let report = range("2020-01-05", "2020-01-10")
        .report(&[start_evening, after_end, past_end_noon])
        .expect("report");
    assert_eq!(report.entry_count, 2);
    assert_eq!(report.income_total, Decimal::from(18));
    assert_eq!(report.matched_income_total, Decimal::from(11));
}

#[test]
fn report_totals_satisfy_the_aggregation_invariants() {
    let mut entries = Vec::new();
    for i in 0..40 {
        let amount = if i % 3 == 0 { -(i * 7 + 1) } else { i * 11 };
        let day = format!("2020-01-{:02}", (i % 28) + 1);
        entries.push(entry(i, amount, i % 4 == 0, &day));
    }

    let report: Report = range("2019-12-31", "2020-01-31").report(&entries).expect("report");
    assert_eq!(report.income_count + report.expense_count, report.entry_count);
    assert_eq!(report.entry_count, entries.len());
    assert!(report.unmatched_income_count <= report.income_count);
    assert!(report.unmatched_expense_count <= report.expense_count);
    assert!(report.matched_income_total <= report.income_total);
    assert!(report.matched_expense_total <= report.expense_total);
    report.check_invariants().expect("consistent");
}
