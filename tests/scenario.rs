// tests/scenario.rs
//
// End-to-end over the core: load two sources with different layouts,
// search them, and project the matches.

mod common;

use policy_record_search::{load_sources, project, search};
use serde_json::Value;

#[test]
fn grant_matches_only_the_transcript_without_url() {
    let (_dir, cfg) = common::fixture_config();
    let (records, _) = load_sources(&cfg.sources).unwrap();

    let found = search(&records, &["grant"]);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].source, "hansard");
    assert_eq!(found[0].date, "2020-04-06");
    assert_eq!(found[0].policies, vec!["Scheme", "Grant"]);

    let v = serde_json::to_value(project(found[0], &cfg)).unwrap();
    assert!(v.get("url").is_none(), "url must be absent: {v}");
}

#[test]
fn circuit_matches_only_the_article_with_url() {
    let (_dir, cfg) = common::fixture_config();
    let (records, _) = load_sources(&cfg.sources).unwrap();

    let found = search(&records, &["circuit"]);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].source, "cna");
    assert_eq!(found[0].content, "Circuit Breaker begins");
    assert!(found[0].names.is_empty());

    let v = serde_json::to_value(project(found[0], &cfg)).unwrap();
    assert_eq!(v["url"], Value::from("https://x/1"));
}

#[test]
fn empty_query_returns_both_in_load_order() {
    let (_dir, cfg) = common::fixture_config();
    let (records, report) = load_sources(&cfg.sources).unwrap();

    let none: Vec<String> = Vec::new();
    let all = search(&records, &none);
    let sources: Vec<_> = all.iter().map(|r| r.source.as_str()).collect();
    assert_eq!(sources, vec!["hansard", "cna"]);

    let st = report.for_source("straitstimes").unwrap();
    assert!(st.missing);
    assert_eq!(st.records, 0);
}
