// src/ingest/loader.rs
//! Record Loader: streams a tabular source file as raw rows in file order.
//!
//! A missing file is not an error (the source simply contributes nothing).
//! Rows that fail to decode are skipped and counted; only I/O failures on a
//! file that exists are propagated.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::ingest::types::RawRow;

const UTF8_BOM: char = '\u{feff}';

/// Counters for one pass over a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowStats {
    pub missing: bool,
    pub rows_read: usize,
    pub malformed: usize,
}

/// Stream every row of the file at `path` into `on_row`.
pub fn stream_rows<F>(path: &Path, on_row: F) -> Result<RowStats>
where
    F: FnMut(RawRow),
{
    if !path.exists() {
        tracing::info!(target: "ingest", path = %path.display(), "source file missing, skipping");
        return Ok(RowStats {
            missing: true,
            ..RowStats::default()
        });
    }
    let file = File::open(path).with_context(|| format!("opening source {}", path.display()))?;
    stream_rows_from(file, on_row).with_context(|| format!("reading source {}", path.display()))
}

/// Same as [`stream_rows`] over any reader; first line is the header.
pub fn stream_rows_from<R, F>(reader: R, mut on_row: F) -> Result<RowStats>
where
    R: Read,
    F: FnMut(RawRow),
{
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut stats = RowStats::default();

    let headers: Vec<String> = match rdr.headers() {
        Ok(h) => h
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let col = if i == 0 {
                    col.trim_start_matches(UTF8_BOM)
                } else {
                    col
                };
                col.trim().to_string()
            })
            .collect(),
        Err(e) if e.is_io_error() => return Err(e.into()),
        Err(e) => {
            tracing::warn!(target: "ingest", error = %e, "unreadable header row, source skipped");
            stats.malformed += 1;
            return Ok(stats);
        }
    };

    for rec in rdr.records() {
        let rec = match rec {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                tracing::warn!(target: "ingest", error = %e, "malformed row skipped");
                stats.malformed += 1;
                continue;
            }
        };
        stats.rows_read += 1;

        // Short rows leave trailing columns absent; extra fields are dropped.
        let mut row = RawRow::with_capacity(headers.len());
        for (col, value) in headers.iter().zip(rec.iter()) {
            row.entry(col.clone()).or_insert_with(|| value.to_string());
        }
        on_row(row);
    }

    Ok(stats)
}
