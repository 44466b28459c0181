// src/ingest/types.rs
use chrono::NaiveDate;
use std::collections::HashMap;

/// One source line keyed by header column name, values as read from the file.
pub type RawRow = HashMap<String, String>;

/// Canonical record every source is normalized into.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Record {
    pub source: String,   // e.g., "hansard", "cna"
    pub date: String,     // verbatim from the source
    pub content: String,  // never absent, "" when nothing usable
    pub names: Vec<String>,
    pub policies: Vec<String>,
    pub url: Option<String>,
    /// Best-effort calendar date derived from `date`; `None` when unparseable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_date: Option<NaiveDate>,
}

/// Per-source outcome of one load pass.
#[derive(Debug, Clone, Default, serde::Serialize, PartialEq, Eq)]
pub struct SourceLoadReport {
    pub source: String,
    pub missing: bool,
    pub rows_read: usize,
    pub rows_malformed: usize,
    pub records: usize,
}

#[derive(Debug, Clone, Default, serde::Serialize, PartialEq, Eq)]
pub struct LoadReport {
    pub sources: Vec<SourceLoadReport>,
}

impl LoadReport {
    pub fn total_records(&self) -> usize {
        self.sources.iter().map(|s| s.records).sum()
    }

    pub fn for_source(&self, name: &str) -> Option<&SourceLoadReport> {
        self.sources
            .iter()
            .find(|s| s.source.eq_ignore_ascii_case(name))
    }
}
