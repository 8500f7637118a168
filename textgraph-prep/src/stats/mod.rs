//! Statistics providers consumed by the corpus graph builder.
//!
//! The builder treats these as black boxes: it inserts exactly what a provider
//! emits and only checks that every reference resolves to a known word or
//! document. [`CorpusStatistics`] is the built-in implementation; tests and
//! callers may inject their own.

pub mod iou;
pub mod pmi;
pub mod tfidf;

use crate::config::model::StatsConfig;
use crate::core::registry::Vocabulary;
use crate::errors::GraphPrepResult;
use serde::{Deserialize, Serialize};

/// One word-pair association score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordPairScore {
    pub word1: String,
    pub word2: String,
    pub score: f32,
}

/// Documents × words table. Row `i` holds the emitted `(word, value)` cells of document `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TfIdfTable {
    pub rows: Vec<Vec<(String, f32)>>,
}

impl TfIdfTable {
    /// Cell lookup; `None` when the provider did not emit it.
    pub fn get(&self, doc: usize, word: &str) -> Option<f32> {
        self.rows
            .get(doc)?
            .iter()
            .find(|(w, _)| w == word)
            .map(|(_, v)| *v)
    }

    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

/// PMI, TF-IDF and IoU over a tokenized corpus.
///
/// `docs` are the documents' surface-form sequences in corpus order.
pub trait StatisticsProvider {
    /// Word-pair association scores, each unordered pair at most once.
    fn pmi(&self, docs: &[Vec<&str>]) -> GraphPrepResult<Vec<WordPairScore>>;

    /// Relevance of each vocabulary word for each document.
    fn tf_idf(&self, docs: &[Vec<&str>], vocab: &Vocabulary) -> GraphPrepResult<TfIdfTable>;

    /// Similarity of two label sets in `[0, 1]`.
    fn iou(&self, labels1: &[String], labels2: &[String]) -> f32;
}

/// Built-in providers configured from [`StatsConfig`].
#[derive(Debug, Clone, Default)]
pub struct CorpusStatistics {
    cfg: StatsConfig,
}

impl CorpusStatistics {
    pub fn new(cfg: StatsConfig) -> Self {
        Self { cfg }
    }
}

impl StatisticsProvider for CorpusStatistics {
    fn pmi(&self, docs: &[Vec<&str>]) -> GraphPrepResult<Vec<WordPairScore>> {
        Ok(pmi::sliding_window_pmi(
            docs,
            self.cfg.pmi_window,
            self.cfg.pmi_min_score,
        ))
    }

    fn tf_idf(&self, docs: &[Vec<&str>], vocab: &Vocabulary) -> GraphPrepResult<TfIdfTable> {
        Ok(tfidf::tf_idf_table(docs, vocab, &self.cfg))
    }

    fn iou(&self, labels1: &[String], labels2: &[String]) -> f32 {
        iou::label_iou(labels1, labels2)
    }
}
