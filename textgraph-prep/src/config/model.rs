//! Configuration data structures for the corpus → graph preparation pipeline.
//!
//! Groups:
//! - [`PrepConfig`]   : top-level container for all config groups
//! - [`CorpusConfig`] : label mode, empty-document policy, embedding dimension
//! - [`TextConfig`]   : optional cleaning of raw text before tokenizing
//! - [`StatsConfig`]  : PMI window and TF-IDF weighting options
//! - [`GraphOptions`] : corpus graph construction knobs
//! - [`ExportConfig`] : which artifacts to persist
//!
//! All structs are `serde`-friendly so they can be loaded from YAML/JSON.
//! Missing fields fall back to their defaults.

use crate::errors::{GraphPrepError, GraphPrepResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level configuration for the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    pub corpus: CorpusConfig,
    pub text: TextConfig,
    pub stats: StatsConfig,
    pub graph: GraphOptions,
    pub export: ExportConfig,
}

impl PrepConfig {
    /// Validate config sanity (no degenerate or absurd values).
    pub fn validate(&self) -> GraphPrepResult<()> {
        if self.stats.pmi_window == 0 {
            return Err(GraphPrepError::Config(
                "`pmi_window` must be greater than 0".into(),
            ));
        }
        if !self.stats.pmi_min_score.is_finite() {
            return Err(GraphPrepError::Config(
                "`pmi_min_score` must be finite".into(),
            ));
        }
        if !self.graph.self_loop_weight.is_finite() {
            return Err(GraphPrepError::Config(
                "`self_loop_weight` must be finite".into(),
            ));
        }
        if self.corpus.embedding_dim == Some(0) {
            return Err(GraphPrepError::Config(
                "`embedding_dim` must be greater than 0 when set".into(),
            ));
        }
        Ok(())
    }
}

/// What to do with documents that tokenize to nothing.
///
/// Their mean embedding is undefined, so one of these must be chosen explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyDocumentPolicy {
    /// Drop the document (and its label) before any id is assigned.
    #[default]
    Skip,
    /// Keep the document; its corpus-graph feature is the zero vector.
    ZeroVector,
    /// Abort with [`GraphPrepError::EmptyDocument`].
    Fail,
}

impl std::str::FromStr for EmptyDocumentPolicy {
    type Err = GraphPrepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "zero_vector" | "zero" => Ok(Self::ZeroVector),
            "fail" => Ok(Self::Fail),
            other => Err(GraphPrepError::Config(format!(
                "unknown empty document policy: {other}"
            ))),
        }
    }
}

/// Corpus-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Multi-label corpus: enables document-document IoU edges.
    pub multi_label: bool,
    /// Policy for zero-token documents.
    pub empty_documents: EmptyDocumentPolicy,
    /// Expected embedding dimension. When `None`, the first registered token fixes it.
    pub embedding_dim: Option<usize>,
}

/// Raw text cleaning applied before tokenizing (ignored for pre-parsed documents).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub normalize: bool,
    /// Transliterate to ASCII (`café` → `cafe`) before acronym expansion.
    pub transliterate: bool,
    pub lowercase: bool,
    /// Acronym → expansion, e.g. `ttyl` → `talk to you later`.
    pub acronyms: BTreeMap<String, String>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            normalize: true,
            transliterate: true,
            lowercase: true,
            acronyms: BTreeMap::new(),
        }
    }
}

/// Options for the built-in statistics providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Sliding window size (tokens) for PMI co-occurrence counting.
    pub pmi_window: usize,
    /// Only pairs with a PMI strictly above this value become edges.
    pub pmi_min_score: f32,
    pub tfidf_smooth_idf: bool,
    pub tfidf_sublinear_tf: bool,
    /// L2-normalize each document row.
    pub tfidf_normalize: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            pmi_window: 20,
            pmi_min_score: 0.0,
            tfidf_smooth_idf: true,
            tfidf_sublinear_tf: false,
            tfidf_normalize: true,
        }
    }
}

/// Corpus graph construction options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    /// Weight attached to every self-loop edge.
    pub self_loop_weight: f32,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            self_loop_weight: 1.0,
        }
    }
}

/// Artifact toggles for persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub graphml: bool,
    pub instance_graphs: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            graphml: true,
            instance_graphs: true,
        }
    }
}
