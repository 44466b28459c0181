//! # Query Matcher
//! Boolean keyword matching over the in-memory record sequence.
//! No index, no scoring: a linear scan that keeps load order.
//!
//! A term matches a record if it occurs (case-insensitively) in the date,
//! any name, any policy, the source, or the content. By default a record is
//! returned if *any* term matches; `TermJoin::All` narrows that to every term.
//!
//! Field-scoped filters (source, date range, date substring, names, policies)
//! are ANDed with each other and with the term match.

use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeSet;

use crate::config::{MatchMode, SourceDescriptor, TermJoin};
use crate::ingest::types::Record;

/// Full query: terms plus optional filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub terms: Vec<String>,
    pub join: TermJoin,
    pub mode: MatchMode,
    /// Source name or alias; unknown identifiers match nothing.
    pub source: Option<String>,
    /// Inclusive bounds on the parsed record date.
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Substring of the raw date string.
    pub date: Option<String>,
    /// Record must carry at least one of these names, compared exactly.
    pub names: Vec<String>,
    /// Record must carry at least one of these policy tags, compared exactly.
    pub policies: Vec<String>,
}

impl Query {
    pub fn terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn join(mut self, join: TermJoin) -> Self {
        self.join = join;
        self
    }

    pub fn mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn date_contains(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn policies<I, S>(mut self, policies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.policies = policies.into_iter().map(Into::into).collect();
        self
    }
}

/// Split a comma-separated query string into trimmed, non-empty terms.
pub fn parse_terms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Searchable fields in match order: date, names, policies, source, content.
fn fields<'a>(r: &'a Record) -> impl Iterator<Item = &'a str> + 'a {
    std::iter::once(r.date.as_str())
        .chain(r.names.iter().map(String::as_str))
        .chain(r.policies.iter().map(String::as_str))
        .chain(std::iter::once(r.source.as_str()))
        .chain(std::iter::once(r.content.as_str()))
}

/// Lowercased copy of one record's searchable fields, same order as [`fields`].
/// Built once per record and shared by every substring term.
#[derive(Default)]
struct Folded(Vec<String>);

impl Folded {
    fn of(r: &Record) -> Self {
        Self(fields(r).map(str::to_lowercase).collect())
    }
}

enum TermMatcher {
    /// Already lowercased.
    Substring(String),
    Word(Regex),
}

impl TermMatcher {
    fn new(term: &str, mode: MatchMode) -> Self {
        let lowered = term.to_lowercase();
        match mode {
            MatchMode::Substring => Self::Substring(lowered),
            MatchMode::Word => {
                let pattern = format!(r"(?i)(?:^|\W){}(?:\W|$)", regex::escape(term));
                match Regex::new(&pattern) {
                    Ok(re) => Self::Word(re),
                    Err(e) => {
                        tracing::warn!(
                            target: "search",
                            error = %e,
                            "word pattern rejected, using substring"
                        );
                        Self::Substring(lowered)
                    }
                }
            }
        }
    }

    fn matches_record(&self, r: &Record, folded: &Folded) -> bool {
        match self {
            Self::Substring(t) => folded.0.iter().any(|f| f.contains(t.as_str())),
            Self::Word(re) => fields(r).any(|f| re.is_match(f)),
        }
    }
}

fn clean(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Empty `wanted` lets everything through; otherwise one exact hit is enough.
fn any_member(wanted: &[String], have: &[String]) -> bool {
    wanted.is_empty() || have.iter().any(|h| wanted.iter().any(|w| w == h.trim()))
}

/// A query compiled once and evaluated against many records.
pub struct Matcher<'q> {
    terms: Vec<TermMatcher>,
    join: TermJoin,
    fold: bool,
    source: Option<&'q SourceDescriptor>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    date: Option<String>,
    names: Vec<String>,
    policies: Vec<String>,
}

impl<'q> Matcher<'q> {
    /// Returns `None` when the query names a source absent from `descriptors`.
    pub fn compile(query: &Query, descriptors: &'q [SourceDescriptor]) -> Option<Self> {
        let source = match query.source.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Some(descriptors.iter().find(|d| d.answers_to(id))?),
            _ => None,
        };
        let terms: Vec<TermMatcher> = query
            .terms
            .iter()
            .filter(|t| !t.trim().is_empty())
            .map(|t| TermMatcher::new(t, query.mode))
            .collect();
        let fold = terms.iter().any(|t| matches!(t, TermMatcher::Substring(_)));
        let date = query
            .date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        Some(Self {
            terms,
            join: query.join,
            fold,
            source,
            from: query.from,
            to: query.to,
            date,
            names: clean(&query.names),
            policies: clean(&query.policies),
        })
    }

    fn in_date_range(&self, r: &Record) -> bool {
        if self.from.is_none() && self.to.is_none() {
            return true;
        }
        let Some(d) = r.parsed_date else {
            return false;
        };
        self.from.map_or(true, |from| d >= from) && self.to.map_or(true, |to| d <= to)
    }

    fn passes_field_filters(&self, r: &Record) -> bool {
        self.date.as_deref().map_or(true, |d| r.date.contains(d))
            && any_member(&self.names, &r.names)
            && any_member(&self.policies, &r.policies)
    }

    pub fn matches(&self, r: &Record) -> bool {
        if let Some(desc) = self.source {
            if !desc.answers_to(&r.source) {
                return false;
            }
        }
        if !self.in_date_range(r) || !self.passes_field_filters(r) {
            return false;
        }
        if self.terms.is_empty() {
            return true;
        }
        let folded = if self.fold { Folded::of(r) } else { Folded::default() };
        match self.join {
            TermJoin::Any => self.terms.iter().any(|t| t.matches_record(r, &folded)),
            TermJoin::All => self.terms.iter().all(|t| t.matches_record(r, &folded)),
        }
    }
}

/// Any-term, any-field, case-insensitive substring search in load order.
/// An empty term list returns every record.
pub fn search<'a, S: AsRef<str>>(records: &'a [Record], terms: &[S]) -> Vec<&'a Record> {
    let query = Query::terms(terms.iter().map(|t| t.as_ref().to_string()));
    search_with(records, &query, &[])
}

/// Search with join mode, match mode and filters applied.
pub fn search_with<'a>(
    records: &'a [Record],
    query: &Query,
    descriptors: &[SourceDescriptor],
) -> Vec<&'a Record> {
    let Some(matcher) = Matcher::compile(query, descriptors) else {
        tracing::debug!(target: "search", source = ?query.source, "unknown source filter");
        return Vec::new();
    };
    records.iter().filter(|r| matcher.matches(r)).collect()
}

/// All distinct non-empty policy tags, sorted.
pub fn list_distinct_policies(records: &[Record]) -> Vec<String> {
    distinct(records.iter().flat_map(|r| r.policies.iter()))
}

/// Distinct policies of one source (name or alias); unknown source → empty.
pub fn list_distinct_policies_for(
    records: &[Record],
    descriptors: &[SourceDescriptor],
    source: &str,
) -> Vec<String> {
    let Some(desc) = descriptors.iter().find(|d| d.answers_to(source)) else {
        return Vec::new();
    };
    distinct(
        records
            .iter()
            .filter(|r| desc.answers_to(&r.source))
            .flat_map(|r| r.policies.iter()),
    )
}

/// All distinct non-empty person names, sorted.
pub fn list_distinct_names(records: &[Record]) -> Vec<String> {
    distinct(records.iter().flat_map(|r| r.names.iter()))
}

fn distinct<'a>(items: impl Iterator<Item = &'a String>) -> Vec<String> {
    items
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
