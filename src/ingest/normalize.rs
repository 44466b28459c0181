// src/ingest/normalize.rs
//! Schema Normalizer: maps a source-native row onto the canonical [`Record`].

use crate::config::SourceDescriptor;
use crate::ingest::dates::parse_date;
use crate::ingest::types::{RawRow, Record};

/// First candidate column present in the row, even if its value is blank.
fn first_present<'a>(row: &'a RawRow, candidates: &[String]) -> Option<&'a str> {
    candidates
        .iter()
        .find_map(|col| row.get(col.as_str()))
        .map(String::as_str)
}

/// First candidate column present with a non-blank value.
fn first_non_blank<'a>(row: &'a RawRow, candidates: &[String]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|col| row.get(col.as_str()))
        .map(String::as_str)
        .find(|v| !v.trim().is_empty())
}

/// Split a comma-delimited list, trimming pieces and dropping empty ones.
/// Order is preserved; duplicates are kept.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize one row. Never fails: absent columns degrade to empty values.
pub fn normalize(row: &RawRow, desc: &SourceDescriptor) -> Record {
    let cols = &desc.columns;

    let source = first_non_blank(row, &cols.source)
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| desc.name.clone());

    let date = first_present(row, &cols.date).unwrap_or_default().to_string();

    // Headline-only rows (full-text extraction failed) fall through to the headline.
    let content = first_non_blank(row, &cols.content)
        .unwrap_or_default()
        .to_string();

    let names = first_present(row, &cols.names)
        .map(split_list)
        .unwrap_or_default();
    let policies = first_present(row, &cols.policies)
        .map(split_list)
        .unwrap_or_default();

    let url = first_non_blank(row, &cols.url).map(|u| u.trim().to_string());

    let parsed_date = parse_date(&date);

    Record {
        source,
        date,
        content,
        names,
        policies,
        url,
        parsed_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnMap;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn split_list_trims_and_drops_empty() {
        assert_eq!(
            split_list(" Scheme, ,Grant ,, Scheme "),
            vec!["Scheme", "Grant", "Scheme"]
        );
        assert!(split_list("").is_empty());
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn hansard_row_uses_capitalized_date_and_descriptor_name() {
        let desc = SourceDescriptor::new("hansard", "h.csv");
        let r = normalize(
            &row(&[
                ("Date", "2020-04-06"),
                ("content", "Jobs Support Scheme helps firms"),
                ("names", "Heng Swee Keat"),
                ("policies", "Scheme, Grant"),
                ("speaker_notes", "ignored"),
            ]),
            &desc,
        );
        assert_eq!(r.source, "hansard");
        assert_eq!(r.date, "2020-04-06");
        assert_eq!(r.content, "Jobs Support Scheme helps firms");
        assert_eq!(r.names, vec!["Heng Swee Keat"]);
        assert_eq!(r.policies, vec!["Scheme", "Grant"]);
        assert_eq!(r.url, None);
        assert!(r.parsed_date.is_some());
    }

    #[test]
    fn content_falls_back_to_raw_text_then_headline() {
        let desc = SourceDescriptor::new("cna", "c.csv");
        let r = normalize(&row(&[("raw_text", "body"), ("headline", "h")]), &desc);
        assert_eq!(r.content, "body");
        let r = normalize(
            &row(&[("raw_text", "  "), ("headline", "Circuit Breaker begins")]),
            &desc,
        );
        assert_eq!(r.content, "Circuit Breaker begins");
        let r = normalize(&row(&[("date", "x")]), &desc);
        assert_eq!(r.content, "");
    }

    #[test]
    fn date_takes_first_present_column_even_if_blank() {
        let desc = SourceDescriptor::new("s", "s.csv")
            .columns(ColumnMap::default().with_date(["date", "Date"]));
        let r = normalize(&row(&[("date", ""), ("Date", "2020-01-01")]), &desc);
        assert_eq!(r.date, "");
        assert_eq!(r.parsed_date, None);
    }

    #[test]
    fn url_only_when_declared_and_non_empty() {
        let plain = SourceDescriptor::new("hansard", "h.csv");
        let with_url = SourceDescriptor::new("cna", "c.csv")
            .columns(ColumnMap::default().with_url(["url"]));

        let r = normalize(&row(&[("url", "https://x/1")]), &plain);
        assert_eq!(r.url, None);
        let r = normalize(&row(&[("url", "https://x/1")]), &with_url);
        assert_eq!(r.url.as_deref(), Some("https://x/1"));
        let r = normalize(&row(&[("url", "")]), &with_url);
        assert_eq!(r.url, None);
    }

    #[test]
    fn source_column_overrides_descriptor_name_when_filled() {
        let desc = SourceDescriptor::new("news", "n.csv");
        let r = normalize(&row(&[("source", "cna")]), &desc);
        assert_eq!(r.source, "cna");
        let r = normalize(&row(&[("source", " ")]), &desc);
        assert_eq!(r.source, "news");
    }
}
