use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use moneycal::Entry;
use moneycal::domain::EntriesResponse;
use reqwest::blocking::Client;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub const ENTRIES_PATH: &str = "/api/payments/list";

pub fn entries_url(server_url: &str) -> String {
    format!("{}{}", server_url.trim_end_matches('/'), ENTRIES_PATH)
}

/// Converts a list response into entries. A `null` list means no entries.
pub fn entries_from_response(resp: EntriesResponse) -> Result<Vec<Entry>> {
    if !resp.is_success() {
        let msg = resp.msg.as_deref().unwrap_or("no message");
        return Err(anyhow!(
            "Unexpected response kind {:?} ({msg})",
            resp.kind
        ));
    }

    let mut out = Vec::new();
    for wire in resp.entries.unwrap_or_default() {
        let (id, secs) = (wire.id, wire.date);
        let entry = wire
            .into_entry()
            .ok_or_else(|| anyhow!("Entry {id} has an out-of-range date {secs}"))?;
        out.push(entry);
    }
    Ok(out)
}

pub fn read_entries_file(path: &Path) -> Result<Vec<Entry>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let resp: EntriesResponse = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    entries_from_response(resp).with_context(|| format!("Invalid entry list in {}", path.display()))
}

pub fn fetch_entries(server_url: &str) -> Result<Vec<Entry>> {
    let url = entries_url(server_url);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .context("Invalid spinner template")?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb.set_message(format!("Fetching entries from {url}..."));

    let client = Client::builder()
        .build()
        .context("Failed to build HTTP client")?;
    let resp = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .with_context(|| format!("Failed to request {url}"))?;

    if !resp.status().is_success() {
        pb.finish_and_clear();
        warn!(status = %resp.status(), %url, "entry list request failed");
        return Err(anyhow!("Entry list request failed: HTTP {}", resp.status()));
    }

    let parsed = resp.json::<EntriesResponse>();
    pb.finish_and_clear();
    let parsed = parsed.context("Invalid entry list JSON")?;

    let entries = entries_from_response(parsed)?;
    info!(count = entries.len(), %url, "fetched entries");
    Ok(entries)
}
