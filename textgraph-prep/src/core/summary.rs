//! Pipeline summary: counters and timings collected during graph preparation.
//!
//! Serialized into `summary.json` by the persistence layer. Field names are
//! lowercase with underscores and should stay stable for downstream queries.
//!
//! ```ignore
//! let mut sw = SummaryStopwatch::start();
//! // ... tokenize ...
//! sw.lap(Phase::Tokenize);
//! // ... vocabulary pass ...
//! sw.lap(Phase::Vocabulary);
//! let summary = PipelineSummary::from_dataset(corpus_id, input, &vocab, &dataset)
//!     .with_timings(sw.timings());
//! ```

use crate::core::registry::Vocabulary;
use crate::model::graph::{CorpusGraph, GraphDataset};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

/// Counts and phase timings of one run, written as `summary.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// RFC3339 UTC creation time.
    pub generated_at: String,
    /// UUID v5 of the ordered input texts; equal corpora give equal ids.
    pub corpus_id: String,
    pub counts: Counts,
    pub timings_ms: TimingsMs,
}

/// Input accounting before graphs are built.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputCounts {
    pub documents_in: usize,
    pub documents_skipped: usize,
}

/// Sizes of the inputs and of every produced graph.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Counts {
    /// Documents read from the corpus.
    pub documents_in: usize,
    /// Zero-token documents dropped by the `skip` policy.
    pub documents_skipped: usize,
    pub vocabulary_size: usize,
    pub embedding_dim: usize,

    /// Corpus graph size.
    pub corpus_nodes: usize,
    pub corpus_edges: usize,
    pub corpus_edges_by_relation: BTreeMap<String, usize>,

    pub instance_graphs: usize,
    pub instance_edges: usize,
}

/// Millisecond timings for major pipeline phases. Unknown phases remain zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingsMs {
    pub tokenize: u128,
    pub vocabulary: u128,
    pub instance_graphs: u128,
    pub corpus_graph: u128,
    pub persist: u128,
    pub total: u128,
}

impl PipelineSummary {
    /// Counts taken from the built dataset; timings start at zero.
    pub fn from_dataset(
        corpus_id: String,
        input: InputCounts,
        vocab: &Vocabulary,
        dataset: &GraphDataset,
    ) -> Self {
        let counts = Counts {
            documents_in: input.documents_in,
            documents_skipped: input.documents_skipped,
            vocabulary_size: vocab.len(),
            embedding_dim: vocab.dim(),
            corpus_nodes: dataset.corpus_graph.node_count(),
            corpus_edges: dataset.corpus_graph.edge_count(),
            corpus_edges_by_relation: count_relations(&dataset.corpus_graph),
            instance_graphs: dataset.instance_graphs.len(),
            instance_edges: dataset.instance_graphs.iter().map(|g| g.edge_count()).sum(),
        };

        Self {
            generated_at: Utc::now().to_rfc3339(),
            corpus_id,
            counts,
            timings_ms: TimingsMs::default(),
        }
    }

    pub fn with_timings(mut self, timings: TimingsMs) -> Self {
        self.timings_ms = timings;
        self
    }
}

/// Edge counts keyed by snake_case relation label.
pub fn count_relations(graph: &CorpusGraph) -> BTreeMap<String, usize> {
    graph.edge_weights().fold(BTreeMap::new(), |mut acc, e| {
        *acc.entry(e.relation.to_string()).or_insert(0) += 1;
        acc
    })
}

/// Pipeline phase recorded by [`SummaryStopwatch::lap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Tokenize,
    Vocabulary,
    InstanceGraphs,
    CorpusGraph,
    Persist,
}

/// Lap timer over the pipeline phases; each lap measures from the previous one.
#[derive(Debug, Clone)]
pub struct SummaryStopwatch {
    started: Instant,
    lap_start: Instant,
    tm: TimingsMs,
}

impl SummaryStopwatch {
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            lap_start: now,
            tm: TimingsMs::default(),
        }
    }

    /// Close the current lap and book it under `phase`.
    pub fn lap(&mut self, phase: Phase) -> &mut Self {
        let now = Instant::now();
        let ms = (now - self.lap_start).as_millis();
        self.lap_start = now;
        let slot = match phase {
            Phase::Tokenize => &mut self.tm.tokenize,
            Phase::Vocabulary => &mut self.tm.vocabulary,
            Phase::InstanceGraphs => &mut self.tm.instance_graphs,
            Phase::CorpusGraph => &mut self.tm.corpus_graph,
            Phase::Persist => &mut self.tm.persist,
        };
        *slot = ms;
        self
    }

    /// Laps so far; `total` runs from [`SummaryStopwatch::start`].
    pub fn timings(&self) -> TimingsMs {
        TimingsMs {
            total: self.started.elapsed().as_millis(),
            ..self.tm.clone()
        }
    }
}
