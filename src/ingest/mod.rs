// src/ingest/mod.rs
pub mod dates;
pub mod loader;
pub mod normalize;
pub mod types;

use anyhow::Result;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;

use crate::config::SourceDescriptor;
use crate::ingest::types::{LoadReport, Record, SourceLoadReport};

pub use normalize::{normalize, split_list};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "records_loaded_total",
            "Records normalized from all configured sources."
        );
        describe_counter!(
            "sources_missing_total",
            "Configured sources whose file did not exist at load time."
        );
        describe_counter!(
            "rows_malformed_total",
            "Rows skipped because they could not be decoded."
        );
        describe_gauge!("records_last_load_ts", "Unix ts of the last completed load.");
    });
}

/// Load every source in descriptor order and normalize its rows.
///
/// Missing files and undecodable rows degrade to fewer records; only an I/O
/// failure on an existing file is returned as an error.
pub fn load_sources(descriptors: &[SourceDescriptor]) -> Result<(Vec<Record>, LoadReport)> {
    ensure_metrics_described();

    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for desc in descriptors {
        let before = records.len();
        let stats = loader::stream_rows(&desc.path, |row| {
            records.push(normalize(&row, desc));
        })?;
        let kept = records.len() - before;

        if stats.missing {
            counter!("sources_missing_total").increment(1);
        }
        counter!("rows_malformed_total").increment(stats.malformed as u64);
        counter!("records_loaded_total").increment(kept as u64);

        tracing::info!(
            target: "ingest",
            source = %desc.name,
            missing = stats.missing,
            rows = stats.rows_read,
            malformed = stats.malformed,
            kept,
            "source loaded"
        );

        report.sources.push(SourceLoadReport {
            source: desc.name.clone(),
            missing: stats.missing,
            rows_read: stats.rows_read,
            rows_malformed: stats.malformed,
            records: kept,
        });
    }

    let now = chrono::Utc::now().timestamp().max(0) as f64;
    gauge!("records_last_load_ts").set(now);

    Ok((records, report))
}

/// Convenience wrapper returning only the records.
pub fn load_records(descriptors: &[SourceDescriptor]) -> Result<Vec<Record>> {
    load_sources(descriptors).map(|(records, _)| records)
}
