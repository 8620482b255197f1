use serde_json::Value;

use crate::preview::short_preview;

/// One backend history record plus its derived list preview.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// The record exactly as the backend returned it.
    pub record: Value,
    /// Derived excerpt of the record's `result` field; never sent back.
    pub short_preview: String,
}

impl HistoryEntry {
    /// Wraps a raw backend record, deriving the preview from its `result`
    /// string. Records without a string `result` get an empty preview base.
    pub fn from_record(record: Value) -> Self {
        let result = record.get("result").and_then(Value::as_str).unwrap_or("");
        let short_preview = short_preview(result);
        Self {
            record,
            short_preview,
        }
    }
}

/// State holder for the history list. Replaced wholesale on every load.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryState {
    entries: Vec<HistoryEntry>,
}

impl HistoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Replaces the whole list; there is no incremental append.
    pub fn replace(&mut self, entries: Vec<HistoryEntry>) {
        self.entries = entries;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
