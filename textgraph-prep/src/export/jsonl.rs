//! JSONL writers for graph artifacts.
//!
//! Each writer outputs **one compact JSON object per line**, making the format
//! grep-friendly and easy to stream into a training loader. Node ids are the
//! graphs' own indices (global ids for the corpus graph, local ids for instance graphs).

use crate::core::registry::Vocabulary;
use crate::model::graph::{CorpusGraph, InstanceGraph};
use anyhow::{Context, Result};
use petgraph::visit::EdgeRef;
use serde_json::json;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::info;

/// Write corpus graph nodes/edges (`corpus_nodes.jsonl` + `corpus_edges.jsonl`).
///
/// Nodes:
/// ```json
/// { "id": 4, "kind": "document", "emb": [0.1, 0.2] }
/// ```
///
/// Edges:
/// ```json
/// { "src": 4, "dst": 0, "relation": "document_word", "weight": [0.31] }
/// ```
pub fn write_corpus_graph_jsonl(
    nodes_path: &Path,
    edges_path: &Path,
    graph: &CorpusGraph,
) -> Result<()> {
    {
        let f =
            File::create(nodes_path).with_context(|| format!("create {}", nodes_path.display()))?;
        let mut w = BufWriter::new(f);
        for nidx in graph.node_indices() {
            let n = &graph[nidx];
            let mut rec = json!({
                "id": nidx.index(),
                "item_id": n.item_id,
                "kind": n.kind,
                "emb": n.emb,
            });
            if let Some(label) = &n.label {
                rec["label"] = json!(label);
            }
            serde_json::to_writer(&mut w, &rec)?;
            w.write_all(b"\n")?;
        }
        w.flush()?;
    }

    {
        let f =
            File::create(edges_path).with_context(|| format!("create {}", edges_path.display()))?;
        let mut w = BufWriter::new(f);
        for e in graph.edge_references() {
            let rec = json!({
                "src": e.source().index(),
                "dst": e.target().index(),
                "relation": e.weight().relation,
                "weight": e.weight().weight,
            });
            serde_json::to_writer(&mut w, &rec)?;
            w.write_all(b"\n")?;
        }
        w.flush()?;
    }

    info!(
        "jsonl: wrote corpus graph -> {}, {}",
        nodes_path.display(),
        edges_path.display()
    );
    Ok(())
}

/// Write one instance graph per line, paired with its document's labels.
///
/// ```json
/// { "index": 0, "labels": ["food"], "nodes": [{"id": 0, "item_id": 3, "text": "pizza", "emb": [..]}],
///   "edges": [{"src": 1, "dst": 0, "relation": "dependency"}] }
/// ```
pub fn write_instance_graphs_jsonl(
    path: &Path,
    graphs: &[InstanceGraph],
    labels: &[Vec<String>],
) -> Result<()> {
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);

    for (i, g) in graphs.iter().enumerate() {
        let nodes: Vec<_> = g
            .node_indices()
            .map(|n| {
                json!({
                    "id": n.index(),
                    "item_id": g[n].item_id,
                    "text": g[n].text,
                    "emb": g[n].emb,
                })
            })
            .collect();
        let edges: Vec<_> = g
            .edge_references()
            .map(|e| {
                json!({
                    "src": e.source().index(),
                    "dst": e.target().index(),
                    "relation": e.weight(),
                })
            })
            .collect();
        let rec = json!({
            "index": i,
            "labels": labels.get(i).cloned().unwrap_or_default(),
            "nodes": nodes,
            "edges": edges,
        });
        serde_json::to_writer(&mut w, &rec)?;
        w.write_all(b"\n")?;
    }

    w.flush()?;
    info!("jsonl: wrote {} instance graphs -> {}", graphs.len(), path.display());
    Ok(())
}

/// Write the vocabulary as `{ "id": 0, "text": "the" }` lines in id order.
pub fn write_vocabulary_jsonl(path: &Path, vocab: &Vocabulary) -> Result<()> {
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    for e in vocab.entries() {
        serde_json::to_writer(&mut w, &json!({ "id": e.id, "text": e.text }))?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    info!("jsonl: wrote vocabulary -> {}", path.display());
    Ok(())
}
