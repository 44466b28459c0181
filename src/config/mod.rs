// src/config/mod.rs
pub mod sources;

pub use sources::{
    ColumnMap, MatchMode, SearchSettings, ServiceConfig, SourceDescriptor, TermJoin,
    DEFAULT_SOURCES_CONFIG_PATH, ENV_DATA_DIR, ENV_SOURCES_CONFIG_PATH,
};
