// src/store.rs
//! Load-once record store shared by request handlers.
//!
//! Readers clone an `Arc` snapshot and scan it without holding any lock.
//! A reload builds the full sequence off to the side and then swaps it in.

use anyhow::Result;
use std::fs;
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::ingest::{self, types::LoadReport, types::Record};

pub const ENV_RECORDS_HOT_RELOAD: &str = "RECORDS_HOT_RELOAD";

#[derive(Clone)]
struct Snapshot {
    records: Arc<[Record]>,
    report: Arc<LoadReport>,
}

/// A threadsafe, cheaply cloneable handle to the loaded records.
#[derive(Clone)]
pub struct RecordStore {
    config: Arc<ServiceConfig>,
    inner: Arc<RwLock<Snapshot>>,
}

impl RecordStore {
    /// Load every configured source once.
    pub fn load(config: ServiceConfig) -> Result<Self> {
        let (records, report) = ingest::load_sources(&config.sources)?;
        info!(
            target: "store",
            sources = config.sources.len(),
            records = records.len(),
            "record store ready"
        );
        Ok(Self::with_snapshot(config, records, report))
    }

    /// Build a store around already-normalized records.
    pub fn from_records(config: ServiceConfig, records: Vec<Record>) -> Self {
        Self::with_snapshot(config, records, LoadReport::default())
    }

    fn with_snapshot(config: ServiceConfig, records: Vec<Record>, report: LoadReport) -> Self {
        Self {
            config: Arc::new(config),
            inner: Arc::new(RwLock::new(Snapshot {
                records: records.into(),
                report: Arc::new(report),
            })),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn current(&self) -> Snapshot {
        match self.inner.read() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Current record sequence, in load order.
    pub fn records(&self) -> Arc<[Record]> {
        self.current().records
    }

    pub fn report(&self) -> Arc<LoadReport> {
        self.current().report
    }

    /// Re-read every source and publish the new sequence atomically.
    /// On error the previous sequence stays in place.
    pub fn reload(&self) -> Result<LoadReport> {
        let (records, report) = ingest::load_sources(&self.config.sources)?;
        let fresh = Snapshot {
            records: records.into(),
            report: Arc::new(report.clone()),
        };
        match self.inner.write() {
            Ok(mut g) => *g = fresh,
            Err(poisoned) => *poisoned.into_inner() = fresh,
        }
        info!(target: "store", records = report.total_records(), "records reloaded");
        Ok(report)
    }

    fn source_mtimes(&self) -> Vec<Option<SystemTime>> {
        self.config
            .sources
            .iter()
            .map(|d| fs::metadata(&d.path).and_then(|m| m.modified()).ok())
            .collect()
    }
}

/// Returns true if we should enable hot reload (dev/local only).
fn hot_reload_enabled() -> bool {
    let want = std::env::var(ENV_RECORDS_HOT_RELOAD)
        .ok()
        .is_some_and(|v| v == "1");
    if !want {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("SHUTTLE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// One poll step: reload if any source mtime differs from `last`.
/// `last` only advances after a successful reload, so a failed one is retried
/// on the next poll. Returns true when a reload happened.
fn poll_once(store: &RecordStore, last: &mut Vec<Option<SystemTime>>) -> bool {
    let now = store.source_mtimes();
    if now == *last {
        return false;
    }
    match store.reload() {
        Ok(_) => {
            *last = now;
            true
        }
        Err(e) => {
            warn!(target: "store", error = ?e, "hot reload failed, keeping previous records");
            false
        }
    }
}

/// Poll source file mtimes every 2s and reload the store when any changes
/// (including a file appearing or disappearing).
pub fn start_hot_reload_thread(store: RecordStore) {
    if !hot_reload_enabled() {
        return;
    }

    thread::spawn(move || {
        let poll = Duration::from_secs(2);
        let mut last = store.source_mtimes();

        loop {
            thread::sleep(poll);
            poll_once(&store, &mut last);
        }
    });
}
