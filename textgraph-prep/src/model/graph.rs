//! Graph-related types shared across graph builders and exporters.
//!
//! Edges carry a compact relation enum that serializes to snake_case strings,
//! making downstream processing (JSONL/GraphML) stable and grep-friendly.
//! Corpus-graph weights are rank-1 arrays so they can be read as edge feature vectors.

use crate::model::node::NodeKind;
use petgraph::graph::Graph;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Edge relation label used by both graph products.
///
/// Avoid renaming existing variants, as they are part of exported artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeRelation {
    /// word → word, weight = PMI.
    WordWord,
    /// document → document, weight = label IoU.
    DocumentDocument,
    /// document → word, weight = TF-IDF.
    DocumentWord,
    /// token → dependency child (instance graphs only).
    Dependency,
    SelfLoop,
}

impl Display for EdgeRelation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use EdgeRelation::*;
        let s = match self {
            WordWord => "word_word",
            DocumentDocument => "document_document",
            DocumentWord => "document_word",
            Dependency => "dependency",
            SelfLoop => "self_loop",
        };
        f.write_str(s)
    }
}

/// Corpus-graph edge payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedEdge {
    pub relation: EdgeRelation,
    pub weight: [f32; 1],
}

impl WeightedEdge {
    pub fn new(relation: EdgeRelation, weight: f32) -> Self {
        Self {
            relation,
            weight: [weight],
        }
    }

    pub fn value(&self) -> f32 {
        self.weight[0]
    }
}

/// Corpus-graph node payload. `item_id` equals the node's global id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusNode {
    pub item_id: usize,
    pub kind: NodeKind,
    /// Surface form for word nodes, `None` for documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub emb: Vec<f32>,
}

/// Instance-graph node payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceNode {
    /// Global vocabulary id of this token.
    pub item_id: usize,
    pub text: String,
    pub emb: Vec<f32>,
}

/// Heterogeneous word/document graph. `NodeIndex(i)` is global node id `i`.
pub type CorpusGraph = Graph<CorpusNode, WeightedEdge>;

/// Per-document dependency graph. `NodeIndex(i)` is local token id `i`.
pub type InstanceGraph = Graph<InstanceNode, EdgeRelation>;

/// Everything a training run consumes: the corpus graph plus (graph, labels) pairs.
#[derive(Debug, Clone)]
pub struct GraphDataset {
    pub corpus_graph: CorpusGraph,
    pub instance_graphs: Vec<InstanceGraph>,
    /// One label set per instance graph, same order.
    pub labels: Vec<Vec<String>>,
}
