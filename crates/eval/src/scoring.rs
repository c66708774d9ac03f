//! Scoring-function and analyzer labels used to describe a configuration

use rankdup_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use strum_macros::{Display, EnumString};

/// Default BM25F length-normalization parameter
pub const DEFAULT_BM25F_B: f64 = 0.75;

/// Default BM25F term-frequency saturation parameter
pub const DEFAULT_BM25F_K1: f64 = 1.2;

/// Weighting function handed to the search collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringKind {
    Frequency,
    TfIdf,
    Bm25f { b: f64, k1: f64 },
}

impl fmt::Display for ScoringKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frequency => write!(f, "frequency"),
            Self::TfIdf => write!(f, "tfidf"),
            Self::Bm25f { b, k1 } => write!(f, "bm25f({b},{k1})"),
        }
    }
}

/// Analyzer the external index was built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnalyzerKind {
    Simple,
    Standard,
    Stemming,
    Ngram,
}

impl AnalyzerKind {
    /// Parse an analyzer name, reporting the known names on failure
    pub fn parse(name: &str) -> Result<Self> {
        name.parse::<Self>().map_err(|_| {
            Error::config(format!(
                "Unknown analyzer '{name}'. Must be one of: simple, standard, stemming, ngram"
            ))
        })
    }
}

/// Tunable parameters available to scoring factories
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    pub b: f64,
    pub k1: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            b: DEFAULT_BM25F_B,
            k1: DEFAULT_BM25F_K1,
        }
    }
}

impl ScoringParams {
    /// Defaults overridden by whichever parameters are given
    pub fn with_overrides(b: Option<f64>, k1: Option<f64>) -> Self {
        let defaults = Self::default();
        Self {
            b: b.unwrap_or(defaults.b),
            k1: k1.unwrap_or(defaults.k1),
        }
    }
}

/// Builds a [`ScoringKind`] from parameters
pub type ScoringFactory = fn(&ScoringParams) -> ScoringKind;

/// Name -> factory lookup table, owned by whoever runs the evaluation
#[derive(Debug, Clone, Default)]
pub struct ScoringRegistry {
    factories: BTreeMap<String, ScoringFactory>,
}

impl ScoringRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `frequency`, `tfidf` and `bm25f`
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("frequency", |_| ScoringKind::Frequency);
        registry.register("tfidf", |_| ScoringKind::TfIdf);
        registry.register("bm25f", |params| ScoringKind::Bm25f {
            b: params.b,
            k1: params.k1,
        });
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, factory: ScoringFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Build the scoring function registered under `name`
    pub fn build(&self, name: &str, params: &ScoringParams) -> Result<ScoringKind> {
        let factory = self.factories.get(name).ok_or_else(|| {
            Error::config(format!(
                "Unknown scoring function '{name}'. Must be one of: {:?}",
                self.names().collect::<Vec<_>>()
            ))
        })?;
        Ok(factory(params))
    }
}
