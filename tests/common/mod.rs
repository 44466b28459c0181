// tests/common/mod.rs
// Shared on-disk fixtures: two heterogeneous sources mirroring the
// parliament transcript and news article layouts.
#![allow(dead_code)]

use policy_record_search::config::{ColumnMap, SearchSettings, ServiceConfig, SourceDescriptor};
use std::fs;
use tempfile::TempDir;

pub const HANSARD_CSV: &str = "\
Date,content,names,policies
2020-04-06,Jobs Support Scheme helps firms,Heng Swee Keat,\"Scheme, Grant\"
";

pub const CNA_CSV: &str = "\
source,date,headline,url,names,policies
cna,2020-04-07,Circuit Breaker begins,https://x/1,,Circuit Breaker
";

/// Writes both fixtures into a temp dir and returns a config pointing at them
/// (plus one descriptor whose file does not exist).
pub fn fixture_config() -> (TempDir, ServiceConfig) {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("hansard.csv"), HANSARD_CSV).expect("write hansard");
    fs::write(dir.path().join("cna.csv"), CNA_CSV).expect("write cna");

    let cfg = ServiceConfig {
        sources: vec![
            SourceDescriptor::new("hansard", dir.path().join("hansard.csv")),
            SourceDescriptor::new("cna", dir.path().join("cna.csv"))
                .aliases(["channelnewsasia"])
                .columns(ColumnMap::default().with_url(["url"])),
            SourceDescriptor::new("straitstimes", dir.path().join("missing.csv"))
                .aliases(["st", "str"])
                .columns(ColumnMap::default().with_url(["url"])),
        ],
        search: SearchSettings {
            url_sources: vec!["cna".into(), "straitstimes".into()],
            ..SearchSettings::default()
        },
    };
    (dir, cfg)
}
