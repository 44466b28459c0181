// src/config/sources.rs
//! # Source Descriptors
//!
//! Declarative table describing every tabular input: where the file lives and
//! which source columns feed each canonical record field.
//!
//! - Loads from TOML (`[[source]]` entries plus an optional `[search]` table).
//! - Fallback order: `$SOURCES_CONFIG_PATH` → `config/sources.toml` → built-in seed.
//! - Column lists are ordered; the first candidate present in a row wins.
//! - Adding a source is a table edit, never new normalization code.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_SOURCES_CONFIG_PATH: &str = "config/sources.toml";
pub const ENV_SOURCES_CONFIG_PATH: &str = "SOURCES_CONFIG_PATH";
pub const ENV_DATA_DIR: &str = "DATA_DIR";

fn default_source_cols() -> Vec<String> {
    vec!["source".into()]
}
fn default_date_cols() -> Vec<String> {
    vec!["date".into(), "Date".into()]
}
fn default_content_cols() -> Vec<String> {
    vec!["content".into(), "raw_text".into(), "headline".into()]
}
fn default_names_cols() -> Vec<String> {
    vec!["names".into()]
}
fn default_policies_cols() -> Vec<String> {
    vec!["policies".into()]
}

/// Canonical field → ordered candidate column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    #[serde(default = "default_source_cols")]
    pub source: Vec<String>,
    #[serde(default = "default_date_cols")]
    pub date: Vec<String>,
    #[serde(default = "default_content_cols")]
    pub content: Vec<String>,
    #[serde(default = "default_names_cols")]
    pub names: Vec<String>,
    #[serde(default = "default_policies_cols")]
    pub policies: Vec<String>,
    /// Empty means the source carries no URL column.
    #[serde(default)]
    pub url: Vec<String>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            source: default_source_cols(),
            date: default_date_cols(),
            content: default_content_cols(),
            names: default_names_cols(),
            policies: default_policies_cols(),
            url: Vec::new(),
        }
    }
}

impl ColumnMap {
    pub fn with_date<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date = cols.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_url<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.url = cols.into_iter().map(Into::into).collect();
        self
    }
}

/// Static description of one input source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub columns: ColumnMap,
}

impl SourceDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            aliases: Vec::new(),
            columns: ColumnMap::default(),
        }
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn columns(mut self, columns: ColumnMap) -> Self {
        self.columns = columns;
        self
    }

    /// True if `id` is this source's name or one of its aliases (case-insensitive).
    pub fn answers_to(&self, id: &str) -> bool {
        let id = id.trim();
        self.name.eq_ignore_ascii_case(id)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(id))
    }
}

/// How multiple query terms combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermJoin {
    /// A record matches if any term matches.
    #[default]
    Any,
    /// Every term must match somewhere in the record.
    All,
}

impl FromStr for TermJoin {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" | "or" => Ok(Self::Any),
            "all" | "and" => Ok(Self::All),
            other => Err(anyhow!("unknown term join '{other}' (expected any|all)")),
        }
    }
}

/// How a single term is compared against a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Case-insensitive substring containment ("act" matches "enactment").
    #[default]
    Substring,
    /// Case-insensitive match on word boundaries only.
    Word,
}

impl FromStr for MatchMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" | "sub" => Ok(Self::Substring),
            "word" | "words" => Ok(Self::Word),
            other => Err(anyhow!("unknown match mode '{other}' (expected substring|word)")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Sources whose records may expose `url` in responses.
    #[serde(default)]
    pub url_sources: Vec<String>,
    #[serde(default)]
    pub join: TermJoin,
    #[serde(default)]
    pub match_mode: MatchMode,
}

/// Full service configuration: ordered descriptor table plus search settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default, rename = "source")]
    pub sources: Vec<SourceDescriptor>,
    #[serde(default)]
    pub search: SearchSettings,
}

impl ServiceConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: ServiceConfig = toml::from_str(s).context("parsing sources config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from an explicit TOML path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading sources config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid sources config {}", path.display()))
    }

    /// Load using env var + fallbacks:
    /// 1) $SOURCES_CONFIG_PATH
    /// 2) config/sources.toml
    /// 3) built-in seed
    ///
    /// Relative descriptor paths are then rebased onto `$DATA_DIR` if set.
    pub fn load_default() -> Result<Self> {
        let cfg = if let Ok(p) = std::env::var(ENV_SOURCES_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                bail!("{ENV_SOURCES_CONFIG_PATH} points to non-existent path");
            }
            Self::load_from(&pb)?
        } else {
            let default_p = PathBuf::from(DEFAULT_SOURCES_CONFIG_PATH);
            if default_p.exists() {
                Self::load_from(&default_p)?
            } else {
                Self::default_seed()
            }
        };

        Ok(match std::env::var(ENV_DATA_DIR) {
            Ok(dir) if !dir.trim().is_empty() => cfg.with_data_dir(dir.trim()),
            _ => cfg,
        })
    }

    /// Rebase relative descriptor paths onto `dir`.
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        for d in &mut self.sources {
            if d.path.is_relative() {
                d.path = dir.as_ref().join(&d.path);
            }
        }
        self
    }

    /// Find the descriptor a source identifier refers to (name or alias).
    pub fn resolve_source(&self, id: &str) -> Option<&SourceDescriptor> {
        self.sources.iter().find(|d| d.answers_to(id))
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for d in &self.sources {
            let name = d.name.trim();
            if name.is_empty() {
                bail!("source descriptor with empty name (path {})", d.path.display());
            }
            for id in std::iter::once(name).chain(d.aliases.iter().map(|a| a.trim())) {
                if id.is_empty() {
                    bail!("source '{name}' has an empty alias");
                }
                if !seen.insert(id.to_ascii_lowercase()) {
                    bail!("duplicate source identifier '{id}'");
                }
            }
        }
        Ok(())
    }

    /// Built-in table for the known public-record sources, in load order.
    pub fn default_seed() -> Self {
        let hansard = SourceDescriptor::new("hansard", "golden_dataset/full_hansard_master.csv")
            .aliases(["parliament"])
            .columns(ColumnMap::default().with_date(["Date", "date"]));

        let cna = SourceDescriptor::new("cna", "golden_dataset/full_cna_articles.csv")
            .aliases(["channelnewsasia"])
            .columns(ColumnMap::default().with_url(["url"]));

        let straitstimes =
            SourceDescriptor::new("straitstimes", "golden_dataset/full_straits_times_articles.csv")
                .aliases(["str", "st"])
                .columns(ColumnMap::default().with_url(["url"]));

        let lawgazette = SourceDescriptor::new("lawgazette", "golden_dataset/lawgazette_master.csv")
            .columns(
                ColumnMap::default()
                    .with_date(["date of publish (DDMMYYYY)", "date", "Date"])
                    .with_url(["url"]),
            );

        Self {
            sources: vec![hansard, cna, straitstimes, lawgazette],
            search: SearchSettings {
                url_sources: vec!["cna".into(), "straitstimes".into(), "lawgazette".into()],
                ..SearchSettings::default()
            },
        }
    }
}
