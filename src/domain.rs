use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Id carried by an entry that has not been persisted by the server yet.
pub const NEW_ENTRY_ID: i64 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Signed amount in major currency units: positive is income, negative is expense.
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    /// Whether the entry has been reconciled against a bank record.
    pub matched: bool,
}

impl Entry {
    pub fn draft(name: impl Into<String>, amount: Decimal, date: DateTime<Utc>) -> Self {
        Self {
            id: NEW_ENTRY_ID,
            name: name.into(),
            description: String::new(),
            amount,
            date,
            matched: false,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id >= 0
    }

    /// Zero counts as income so that every entry lands on exactly one side.
    pub fn is_income(&self) -> bool {
        !self.amount.is_sign_negative() || self.amount.is_zero()
    }
}

/// Entry as it travels over the wire, with `date` in seconds since the epoch.
#[derive(Debug, Clone, Deserialize)]
pub struct WireEntry {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub amount: Decimal,
    pub date: i64,
    #[serde(default)]
    pub matched: bool,
}

impl WireEntry {
    pub fn into_entry(self) -> Option<Entry> {
        let date = DateTime::<Utc>::from_timestamp(self.date, 0)?;
        Some(Entry {
            id: self.id,
            name: self.name,
            description: self.description,
            amount: self.amount,
            date,
            matched: self.matched,
        })
    }
}

/// Body of the entry-list endpoint. `entries` is `null` when there are none.
#[derive(Debug, Clone, Deserialize)]
pub struct EntriesResponse {
    pub kind: String,
    #[serde(default, alias = "payments")]
    pub entries: Option<Vec<WireEntry>>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl EntriesResponse {
    pub fn is_success(&self) -> bool {
        self.kind == "success"
    }
}
