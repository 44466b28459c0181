// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod ingest;
pub mod metrics;
pub mod project;
pub mod search;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::{ServiceConfig, SourceDescriptor};
pub use crate::ingest::types::Record;
pub use crate::ingest::{load_records, load_sources};
pub use crate::project::{project, RecordView};
pub use crate::search::{list_distinct_policies, search, search_with, Query};
pub use crate::store::RecordStore;
