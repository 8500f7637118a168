//! Writes one run's artifacts into a single directory.
//!
//! Layout:
//!   out_dir/
//!     corpus_nodes.jsonl
//!     corpus_edges.jsonl
//!     corpus_graph.graphml      (optional)
//!     instance_graphs.jsonl     (optional)
//!     labels.json
//!     vocabulary.jsonl
//!     summary.json
//!
//! The caller picks `out_dir` (normally `graphs_data/<timestamp>`); it is
//! created if missing.

use crate::{
    config::model::ExportConfig,
    core::{
        registry::Vocabulary,
        summary::{Phase, PipelineSummary, SummaryStopwatch},
    },
    export::{graphml::write_graphml, jsonl},
    model::graph::GraphDataset,
};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use std::{fs, io::BufWriter, path::Path};
use tracing::info;

/// File paths of the persisted artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct PersistFiles {
    pub corpus_nodes_jsonl: String,
    pub corpus_edges_jsonl: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corpus_graphml: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_graphs_jsonl: Option<String>,
    pub labels_json: String,
    pub vocabulary_jsonl: String,
    pub summary_json: String,
}

/// Paths plus run summary; the same value is serialized to `summary.json`.
#[derive(Debug, Clone, Serialize)]
pub struct PersistSummary {
    pub out_dir: String,
    pub files: PersistFiles,
    pub summary: PipelineSummary,
}

pub fn persist_all(
    out_dir: &Path,
    dataset: &GraphDataset,
    vocab: &Vocabulary,
    export: &ExportConfig,
    summary: PipelineSummary,
    sw: &mut SummaryStopwatch,
) -> Result<PersistSummary> {
    fs::create_dir_all(out_dir).with_context(|| format!("mkdir -p {}", out_dir.display()))?;

    let p_nodes = out_dir.join("corpus_nodes.jsonl");
    let p_edges = out_dir.join("corpus_edges.jsonl");
    let p_graphml = out_dir.join("corpus_graph.graphml");
    let p_instances = out_dir.join("instance_graphs.jsonl");
    let p_labels = out_dir.join("labels.json");
    let p_vocab = out_dir.join("vocabulary.jsonl");
    let p_summary = out_dir.join("summary.json");

    jsonl::write_corpus_graph_jsonl(&p_nodes, &p_edges, &dataset.corpus_graph)?;
    jsonl::write_vocabulary_jsonl(&p_vocab, vocab)?;

    if export.graphml {
        write_graphml(&p_graphml, &dataset.corpus_graph)?;
    }
    if export.instance_graphs {
        jsonl::write_instance_graphs_jsonl(&p_instances, &dataset.instance_graphs, &dataset.labels)?;
    }

    let labels_file = fs::File::create(&p_labels)
        .with_context(|| format!("create {}", p_labels.display()))?;
    serde_json::to_writer(BufWriter::new(labels_file), &json!({ "glabel": dataset.labels }))?;

    let files = PersistFiles {
        corpus_nodes_jsonl: lossy(&p_nodes),
        corpus_edges_jsonl: lossy(&p_edges),
        corpus_graphml: export.graphml.then(|| lossy(&p_graphml)),
        instance_graphs_jsonl: export.instance_graphs.then(|| lossy(&p_instances)),
        labels_json: lossy(&p_labels),
        vocabulary_jsonl: lossy(&p_vocab),
        summary_json: lossy(&p_summary),
    };
    // summary.json is last, so it can carry the persist lap and the final total
    sw.lap(Phase::Persist);
    let persist = PersistSummary {
        out_dir: lossy(out_dir),
        files,
        summary: summary.with_timings(sw.timings()),
    };

    let summary_file = fs::File::create(&p_summary)
        .with_context(|| format!("create {}", p_summary.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(summary_file), &persist)?;

    info!(dir = %out_dir.display(), "persist: artifacts written");
    Ok(persist)
}

fn lossy(p: &Path) -> String {
    p.to_string_lossy().into_owned()
}
