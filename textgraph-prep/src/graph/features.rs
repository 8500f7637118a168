//! Node features of the corpus graph.

use crate::config::model::EmptyDocumentPolicy;
use crate::core::registry::Vocabulary;
use crate::errors::{GraphPrepError, GraphPrepResult};
use crate::model::graph::CorpusNode;
use crate::model::node::NodeKind;

/// Element-wise mean of the embeddings of document `doc_index`'s token ids.
///
/// Sums are accumulated in f64 in sequence order, then stored as f32.
/// An empty sequence yields the zero vector under [`EmptyDocumentPolicy::ZeroVector`]
/// and [`GraphPrepError::EmptyDocument`] otherwise (skipped documents never reach here).
pub fn document_embedding(
    vocab: &Vocabulary,
    doc_index: usize,
    policy: EmptyDocumentPolicy,
) -> GraphPrepResult<Vec<f32>> {
    let ids = vocab.document(doc_index).ok_or_else(|| {
        GraphPrepError::ProviderContract(format!("document {doc_index} is not in the corpus"))
    })?;

    if ids.is_empty() {
        return match policy {
            EmptyDocumentPolicy::ZeroVector => Ok(vec![0.0; vocab.dim()]),
            EmptyDocumentPolicy::Skip | EmptyDocumentPolicy::Fail => {
                Err(GraphPrepError::EmptyDocument { doc_index })
            }
        };
    }

    let mut acc = vec![0f64; vocab.dim()];
    for &id in ids {
        if let Some(entry) = vocab.entry(id) {
            for (a, v) in acc.iter_mut().zip(&entry.embedding) {
                *a += *v as f64;
            }
        }
    }
    let len = ids.len() as f64;
    Ok(acc.into_iter().map(|a| (a / len) as f32).collect())
}

/// Features for all `V + M` nodes, word nodes first.
pub fn corpus_node_features(
    vocab: &Vocabulary,
    policy: EmptyDocumentPolicy,
) -> GraphPrepResult<Vec<CorpusNode>> {
    let space = vocab.node_space();
    let mut nodes = Vec::with_capacity(space.total());

    for node in space.iter() {
        let item_id = space.global(node).ok_or_else(|| {
            GraphPrepError::ProviderContract(format!("node {node:?} outside node space"))
        })?;
        let feature = match node.kind {
            NodeKind::Word => {
                let entry = vocab.entry(node.offset).ok_or_else(|| {
                    GraphPrepError::ProviderContract(format!("word {} missing", node.offset))
                })?;
                CorpusNode {
                    item_id,
                    kind: NodeKind::Word,
                    label: Some(entry.text.clone()),
                    emb: entry.embedding.clone(),
                }
            }
            NodeKind::Document => CorpusNode {
                item_id,
                kind: NodeKind::Document,
                label: None,
                emb: document_embedding(vocab, node.offset, policy)?,
            },
        };
        nodes.push(feature);
    }
    Ok(nodes)
}
