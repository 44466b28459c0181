// tests/properties.rs
//
// Invariants over normalized records and search behaviour.

mod common;

use policy_record_search::config::SourceDescriptor;
use policy_record_search::ingest::types::Record;
use policy_record_search::{list_distinct_policies, load_records, search};
use std::collections::BTreeSet;
use std::fs;

fn messy_records() -> Vec<Record> {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("messy.csv");
    fs::write(
        &p,
        "date,raw_text,names,policies\n\
         01-02-2021,Enactment debate,\" Ong Ye Kung , ,Indranee Rajah,\",\" Budget,, Grant ,Budget\"\n\
         ,,\"  \",\n\
         2021-03-05,Short row\n",
    )
    .unwrap();
    load_records(&[SourceDescriptor::new("news", &p)]).unwrap()
}

fn as_set<'a>(found: &[&'a Record]) -> BTreeSet<*const Record> {
    found.iter().map(|r| *r as *const Record).collect()
}

#[test]
fn missing_source_contributes_nothing_and_does_not_fail() {
    let dir = tempfile::tempdir().unwrap();
    let descs = vec![SourceDescriptor::new("ghost", dir.path().join("ghost.csv"))];
    let records = load_records(&descs).unwrap();
    assert!(records.is_empty());
}

#[test]
fn names_and_policies_are_trimmed_and_non_empty() {
    let records = messy_records();
    assert_eq!(records.len(), 3);
    for r in &records {
        assert!(!r.source.is_empty());
        for s in r.names.iter().chain(r.policies.iter()) {
            assert!(!s.trim().is_empty());
            assert_eq!(s, s.trim());
        }
    }
    assert_eq!(records[0].names, vec!["Ong Ye Kung", "Indranee Rajah"]);
    // No dedup within a record.
    assert_eq!(records[0].policies, vec!["Budget", "Grant", "Budget"]);
    assert_eq!(records[1].content, "");
    assert_eq!(records[2].content, "Short row");
}

#[test]
fn term_order_and_case_do_not_change_outcome() {
    let records = messy_records();
    assert_eq!(
        as_set(&search(&records, &["grant", "short"])),
        as_set(&search(&records, &["short", "grant"]))
    );
    assert_eq!(
        as_set(&search(&records, &["GRANT"])),
        as_set(&search(&records, &["grant"]))
    );
    // Substring, not word: "ran" sits inside "Grant" and "Indranee".
    let hits = search(&records, &["ran"]);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content, "Enactment debate");
}

#[test]
fn distinct_policies_sorted_without_duplicates() {
    let records = messy_records();
    let policies = list_distinct_policies(&records);
    assert_eq!(policies, vec!["Budget", "Grant"]);
}
