//! Result Projector: shapes a [`Record`] into the response view.
//!
//! `url` is only emitted for allow-listed sources with a non-empty URL, and is
//! left out of the JSON entirely otherwise (never `"url": null`).

use serde::Serialize;

use crate::config::{ServiceConfig, SourceDescriptor};
use crate::ingest::types::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordView<'a> {
    pub source: &'a str,
    pub date: &'a str,
    pub content: &'a str,
    pub names: &'a [String],
    pub policies: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'a str>,
}

/// True if `source` is allow-listed, either by name or because it and an
/// allow-list entry resolve to the same descriptor (name or alias).
pub fn is_url_source<S: AsRef<str>>(
    source: S,
    url_sources: &[String],
    descriptors: &[SourceDescriptor],
) -> bool {
    let s = source.as_ref().trim();
    let owner = descriptors.iter().find(|d| d.answers_to(s));
    url_sources.iter().map(|w| w.trim()).any(|w| {
        w.eq_ignore_ascii_case(s) || owner.is_some_and(|d| d.answers_to(w))
    })
}

pub fn project<'a>(record: &'a Record, config: &ServiceConfig) -> RecordView<'a> {
    let url = record
        .url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .filter(|_| is_url_source(&record.source, &config.search.url_sources, &config.sources));

    RecordView {
        source: &record.source,
        date: &record.date,
        content: &record.content,
        names: &record.names,
        policies: &record.policies,
        url,
    }
}

pub fn project_all<'a>(records: &[&'a Record], config: &ServiceConfig) -> Vec<RecordView<'a>> {
    records.iter().map(|&r| project(r, config)).collect()
}
