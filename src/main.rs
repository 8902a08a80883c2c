mod cli;
mod config;
mod db;
mod remote;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use moneycal::{
    CalendarDate, ClickIntent, DateField, Entry, EntryIndex, MonthGrid, NavIntent, Report,
    SelectionRange, ViewMonth, calendar::WEEKDAY_NAMES, entries_on,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::{AppConfig, app_paths, load_or_init_config, now_utc, write_config};
use crate::db::Db;

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = app_paths(cli.home.clone())?;
    let (mut cfg, cfg_path) = load_or_init_config(&paths)?;

    let today = config::today(cli.today.as_deref())?;
    if cfg.mount(today) {
        debug!(%today, "mounted calendar");
        write_config(&cfg_path, &cfg)?;
    }

    match cli.command {
        Command::Config(args) => {
            if let Some(url) = args.server_url {
                cfg.server_url = Some(url);
                write_config(&cfg_path, &cfg)?;
            }
            println!(
                "server_url\t{}",
                cfg.server_url.as_deref().unwrap_or("<not set>")
            );
            if let Some(at) = cfg.last_fetch_at {
                println!("last_fetch_at\t{}", at.to_rfc3339());
            }
            println!("config\t{}", cfg_path.display());
            Ok(())
        }
        Command::Nav(args) => {
            let intent = NavIntent {
                direction: args.unit.into(),
                amount: args.amount,
            };
            let view = current_view(&cfg, today).navigate(intent)?;
            cfg.view = Some(view);
            write_config(&cfg_path, &cfg)?;
            println!("{}", view.title());
            Ok(())
        }
        Command::Click(args) => {
            let date = parse_date(&args.date, "date")?;
            cfg.selection = cfg.selection.click(ClickIntent {
                date,
                extend: args.extend,
            });
            cfg.view = Some(ViewMonth::containing(date));
            write_config(&cfg_path, &cfg)?;
            print_selection(&cfg.selection);
            Ok(())
        }
        Command::Focus(args) => {
            let field: DateField = args.field.into();
            let value = match field {
                DateField::Month => args.value - 1,
                _ => args.value,
            };
            let focus = cfg.selection.focus().unwrap_or(today);
            let updated = focus.with_field(field, value)?;
            cfg.selection = cfg.selection.with_focus(updated);
            cfg.view = Some(ViewMonth::containing(updated));
            write_config(&cfg_path, &cfg)?;
            print_selection(&cfg.selection);
            Ok(())
        }
        cmd => {
            let (mut db, db_path) = Db::open(&paths)?;

            match cmd {
                Command::Show(args) => {
                    if let (Some(year), Some(month)) = (args.year, args.month) {
                        cfg.view = Some(ViewMonth {
                            year,
                            month: month - 1,
                        });
                        write_config(&cfg_path, &cfg)?;
                    }
                    let view = current_view(&cfg, today);
                    let entries = db.list_entries()?;
                    let grid = view.grid()?;
                    print_grid(&view, &grid, &cfg.selection, &EntryIndex::build(&entries));
                    println!();
                    print_selection(&cfg.selection);
                    print_report(&cfg.selection.report(&entries)?);
                }
                Command::Report => {
                    let entries = db.list_entries()?;
                    print_report(&cfg.selection.report(&entries)?);
                }
                Command::Day(args) => {
                    let date = parse_date(&args.date, "date")?;
                    let entries = db.list_entries()?;
                    print_entries(date, &entries);
                }
                Command::Add(args) => {
                    let amount = Decimal::from_str(args.amount.trim())
                        .with_context(|| format!("Invalid amount: {}", args.amount))?;
                    let date = match args.date.as_deref() {
                        Some(raw) => parse_date(raw, "--date")?,
                        None => cfg.selection.focus().unwrap_or(today),
                    };
                    let mut entry = Entry::draft(args.name, amount, date.as_instant());
                    entry.description = args.description.unwrap_or_default();
                    entry.matched = args.matched;
                    db.insert_draft(&entry)?;
                    println!("Added draft {:?} on {} to {}", entry.name, date, db_path.display());
                }
                Command::Import(args) => {
                    let entries = remote::read_entries_file(&args.path)?;
                    let n = db.replace_remote_entries(&entries)?;
                    println!("imported\t{n}\t{}", args.path.display());
                }
                Command::Fetch(args) => {
                    let server = args
                        .server
                        .or_else(|| cfg.server_url.clone())
                        .ok_or_else(|| {
                            anyhow!(
                                "No server configured. Run: moneycal config --server-url <url> (or pass --server)."
                            )
                        })?;
                    let entries = remote::fetch_entries(&server)?;
                    let n = db.replace_remote_entries(&entries)?;
                    cfg.last_fetch_at = Some(now_utc());
                    write_config(&cfg_path, &cfg)?;
                    info!(n, "snapshot updated");
                    println!("fetched\t{n}\t{server}");
                }
                Command::Config(_)
                | Command::Nav(_)
                | Command::Click(_)
                | Command::Focus(_) => unreachable!(),
            }

            Ok(())
        }
    }
}

fn current_view(cfg: &AppConfig, today: CalendarDate) -> ViewMonth {
    cfg.view.unwrap_or_else(|| ViewMonth::containing(today))
}

fn parse_date(raw: &str, field: &'static str) -> Result<CalendarDate> {
    CalendarDate::from_str(raw).with_context(|| format!("Invalid {field} {raw:?}. Expected YYYY-MM-DD"))
}

fn format_cell(date: CalendarDate, dimmed: bool, selected: bool, has_entries: bool) -> String {
    let day = format!("{:>2}", date.day_of_month());
    let boxed = if selected {
        format!("[{day}]")
    } else if dimmed {
        format!("({day})")
    } else {
        format!(" {day} ")
    };
    let marker = if has_entries { '*' } else { ' ' };
    format!("{boxed}{marker}")
}

fn print_grid(view: &ViewMonth, grid: &MonthGrid, selection: &SelectionRange, index: &EntryIndex) {
    println!("{}", view.title());

    let mut header = String::from("Week");
    for name in WEEKDAY_NAMES {
        header.push_str(&format!(" {name:^5}"));
    }
    println!("{}", header.trim_end());

    for (week, row) in grid.rows().enumerate() {
        let mut line = format!("{:>4}", week + 1);
        for cell in row {
            line.push(' ');
            line.push_str(&format_cell(
                cell.date,
                cell.dimmed,
                selection.contains(cell.date),
                index.has_entries(cell.date),
            ));
        }
        println!("{}", line.trim_end());
    }
}

fn print_selection(selection: &SelectionRange) {
    match selection.bounds() {
        Ok((Some(start), end)) => println!("selected\t{start}..{end}"),
        Ok((None, end)) => println!("selected\t{end}"),
        Err(_) => println!("selected\t<nothing>"),
    }
}

fn print_report(report: &Report) {
    let from = report
        .start
        .map(|d| d.label())
        .unwrap_or_else(|| "beginning".to_string());
    println!("from\t{from}");
    println!("to\t{}", report.end.label());
    println!("entries\t{}", report.entry_count);
    println!(
        "income\t{}\tcount {}\tunmatched {}",
        report.income_total, report.income_count, report.unmatched_income_count
    );
    println!(
        "expense\t{}\tcount {}\tunmatched {}",
        report.expense_total, report.expense_count, report.unmatched_expense_count
    );
    println!("balance\t{}", report.balance());
    println!("matched income\t{}", report.matched_income_total);
    println!("matched expense\t{}", report.matched_expense_total);
    println!("matched balance\t{}", report.matched_balance());
}

fn print_entries(date: CalendarDate, entries: &[Entry]) {
    let mut on_day = entries_on(date, entries).peekable();
    if on_day.peek().is_none() {
        println!("(no entries on {date})");
        return;
    }
    for e in on_day {
        let id = if e.is_persisted() {
            e.id.to_string()
        } else {
            "draft".to_string()
        };
        let matched = if e.matched { "matched" } else { "unmatched" };
        println!("{id}\t{}\t{}\t{matched}\t{}", e.name, e.amount, e.description);
    }
}
