use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use moneycal::{CalendarDate, SelectionRange, ViewMonth};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the server entries are fetched from.
    #[serde(default)]
    pub server_url: Option<String>,

    /// Month shown by `show`. Follows the focus day when unset.
    #[serde(default)]
    pub view: Option<ViewMonth>,

    #[serde(default)]
    pub selection: SelectionRange,

    /// Timestamp of the last successful fetch.
    #[serde(default)]
    pub last_fetch_at: Option<DateTime<Utc>>,
}

impl AppConfig {
    /// Puts the calendar in its initial state when nothing was selected yet:
    /// today on its own, with today's month displayed.
    pub fn mount(&mut self, today: CalendarDate) -> bool {
        let mut changed = false;
        if self.selection == SelectionRange::Unset {
            self.selection = SelectionRange::mounted(today);
            changed = true;
        }
        if self.view.is_none() {
            let focus = self.selection.focus().unwrap_or(today);
            self.view = Some(ViewMonth::containing(focus));
            changed = true;
        }
        changed
    }
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

pub fn app_paths(override_home: Option<PathBuf>) -> Result<AppPaths> {
    if let Some(home) = override_home {
        return Ok(AppPaths {
            config_dir: home.join("config"),
            data_dir: home.join("data"),
        });
    }

    let proj = ProjectDirs::from("com", "moneycal", "moneycal")
        .context("Failed to resolve platform directories")?;

    Ok(AppPaths {
        config_dir: proj.config_dir().to_path_buf(),
        data_dir: proj.data_dir().to_path_buf(),
    })
}

pub fn load_or_init_config(paths: &AppPaths) -> Result<(AppConfig, PathBuf)> {
    fs::create_dir_all(&paths.config_dir)
        .with_context(|| format!("Failed to create config dir {}", paths.config_dir.display()))?;

    let cfg_path = paths.config_dir.join("config.json");
    if !cfg_path.exists() {
        debug!(path = %cfg_path.display(), "writing default config");
        let cfg = AppConfig::default();
        write_config(&cfg_path, &cfg)?;
        return Ok((cfg, cfg_path));
    }

    let raw = fs::read_to_string(&cfg_path)
        .with_context(|| format!("Failed to read {}", cfg_path.display()))?;
    let cfg: AppConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", cfg_path.display()))?;

    Ok((cfg, cfg_path))
}

pub fn write_config(path: &Path, cfg: &AppConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(cfg)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Today's date, or the `--today` override.
pub fn today(override_today: Option<&str>) -> Result<CalendarDate> {
    match override_today {
        Some(raw) => raw
            .parse::<CalendarDate>()
            .with_context(|| format!("Invalid --today {raw:?}. Expected YYYY-MM-DD")),
        None => Ok(CalendarDate::from_instant(now_utc())),
    }
}

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}
