use crate::config::AppPaths;
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use moneycal::{Entry, NEW_ENTRY_ID};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

/// Local copy of the entry list: the last snapshot received from the
/// server plus drafts added on this machine.
pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(paths: &AppPaths) -> Result<(Self, PathBuf)> {
        fs::create_dir_all(&paths.data_dir)
            .with_context(|| format!("Failed to create data dir {}", paths.data_dir.display()))?;

        let db_path = paths.data_dir.join("moneycal.sqlite3");
        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open DB {}", db_path.display()))?;

        let db = Self { conn };
        db.migrate()?;
        debug!(path = %db_path.display(), "opened entry store");
        Ok((db, db_path))
    }

    #[cfg(test)]
    fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS entries (
                row_id INTEGER PRIMARY KEY AUTOINCREMENT,
                id INTEGER NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                amount TEXT NOT NULL,
                date INTEGER NOT NULL,
                matched INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(date);
            "#,
        )?;
        Ok(())
    }

    fn insert(conn: &Connection, e: &Entry) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO entries (id, name, description, amount, date, matched)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                e.id,
                e.name,
                e.description,
                e.amount.to_string(),
                e.date.timestamp(),
                e.matched,
            ],
        )?;
        Ok(())
    }

    /// Stores an entry typed in by hand. It keeps the unsaved sentinel id.
    pub fn insert_draft(&self, entry: &Entry) -> Result<()> {
        let mut draft = entry.clone();
        draft.id = NEW_ENTRY_ID;
        Self::insert(&self.conn, &draft)
    }

    /// Swaps the persisted entries for `entries` in one transaction, so a
    /// reader sees either the old snapshot or the new one. Drafts are kept.
    pub fn replace_remote_entries(&mut self, entries: &[Entry]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM entries WHERE id >= 0", [])?;
        for e in entries {
            if !e.is_persisted() {
                return Err(anyhow!(
                    "Entry {:?} from the server has unsaved id {}",
                    e.name,
                    e.id
                ));
            }
            Self::insert(&tx, e)?;
        }
        tx.commit()?;
        info!(removed, inserted = entries.len(), "replaced entry snapshot");
        Ok(entries.len())
    }

    pub fn list_entries(&self) -> Result<Vec<Entry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, description, amount, date, matched
            FROM entries
            ORDER BY row_id ASC
            "#,
        )?;

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let id: i64 = row.get(0)?;
            let amount_raw: String = row.get(3)?;
            let secs: i64 = row.get(4)?;

            let amount = Decimal::from_str(&amount_raw)
                .with_context(|| format!("Invalid amount {amount_raw:?} in entries table"))?;
            let date = DateTime::<Utc>::from_timestamp(secs, 0)
                .ok_or_else(|| anyhow!("Invalid date {secs} in entries table"))?;

            out.push(Entry {
                id,
                name: row.get(1)?,
                description: row.get(2)?,
                amount,
                date,
                matched: row.get(5)?,
            });
        }
        Ok(out)
    }
}
