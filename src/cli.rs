use clap::{Args, Parser, Subcommand, ValueEnum};
use moneycal::{DateField, NavDirection};

#[derive(Debug, Parser)]
#[command(name = "moneycal")]
#[command(about = "Calendar view and range reports for personal finance entries", long_about = None)]
pub struct Cli {
    /// Override moneycal home directory (config/data subdirs will be created inside it).
    #[arg(long, env = "MONEYCAL_HOME")]
    pub home: Option<std::path::PathBuf>,

    /// Date used as "today" (YYYY-MM-DD). Defaults to the current UTC date.
    #[arg(long, env = "MONEYCAL_TODAY")]
    pub today: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Show(ShowArgs),
    Nav(NavArgs),
    Click(ClickArgs),
    Focus(FocusArgs),
    Report,
    Day(DayArgs),
    Add(AddArgs),
    Import(ImportArgs),
    Fetch(FetchArgs),
    Config(ConfigArgs),
}

/// Render a month grid with the current selection and its report.
#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(long, requires = "month")]
    pub year: Option<i32>,

    /// 1-based month.
    #[arg(long, requires = "year", value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum NavUnit {
    Month,
    Year,
}

impl From<NavUnit> for NavDirection {
    fn from(unit: NavUnit) -> Self {
        match unit {
            NavUnit::Month => NavDirection::Month,
            NavUnit::Year => NavDirection::Year,
        }
    }
}

/// Move the displayed month.
#[derive(Debug, Args)]
pub struct NavArgs {
    pub unit: NavUnit,

    #[arg(allow_negative_numbers = true)]
    pub amount: i32,
}

/// Select a day, or extend the selection to it with --extend.
#[derive(Debug, Args)]
pub struct ClickArgs {
    /// YYYY-MM-DD
    pub date: String,

    #[arg(long, short = 'x')]
    pub extend: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FocusField {
    Year,
    /// 1-based month.
    Month,
    Day,
}

impl From<FocusField> for DateField {
    fn from(field: FocusField) -> Self {
        match field {
            FocusField::Year => DateField::Year,
            FocusField::Month => DateField::Month,
            FocusField::Day => DateField::DayOfMonth,
        }
    }
}

/// Change one component of the focused day.
#[derive(Debug, Args)]
pub struct FocusArgs {
    pub field: FocusField,

    #[arg(allow_negative_numbers = true)]
    pub value: i64,
}

/// List the entries of one day.
#[derive(Debug, Args)]
pub struct DayArgs {
    /// YYYY-MM-DD
    pub date: String,
}

/// Add an entry by hand. It stays a local draft until the server knows it.
#[derive(Debug, Args)]
pub struct AddArgs {
    pub name: String,

    /// Signed amount; negative for an expense.
    #[arg(allow_negative_numbers = true)]
    pub amount: String,

    #[arg(long, short = 'm')]
    pub description: Option<String>,

    /// YYYY-MM-DD. Defaults to the focused day.
    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub matched: bool,
}

/// Replace the local snapshot with an entry list saved as JSON.
#[derive(Debug, Args)]
pub struct ImportArgs {
    pub path: std::path::PathBuf,
}

/// Replace the local snapshot with the server's entry list.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Defaults to the configured server URL.
    #[arg(long, env = "MONEYCAL_SERVER")]
    pub server: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[arg(long)]
    pub server_url: Option<String>,
}
