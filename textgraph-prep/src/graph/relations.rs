//! Relation passes of the corpus graph.
//!
//! Each pass turns provider output into [`EdgeRecord`]s without touching the graph,
//! so every relation can be tested in isolation. A pass either returns all of its
//! edges or an error; it never yields a partial set.

use crate::core::registry::Vocabulary;
use crate::errors::{GraphPrepError, GraphPrepResult};
use crate::graph::edges::EdgeRecord;
use crate::model::graph::EdgeRelation;
use crate::model::node::{NodeRef, NodeSpace};
use crate::stats::{StatisticsProvider, TfIdfTable, WordPairScore};

/// word1 → word2 with the PMI score, one edge per emitted pair.
pub fn word_word_edges(
    vocab: &Vocabulary,
    scores: &[WordPairScore],
) -> GraphPrepResult<Vec<EdgeRecord>> {
    scores
        .iter()
        .map(|s| {
            let src = word_id(vocab, &s.word1, "pmi")?;
            let dst = word_id(vocab, &s.word2, "pmi")?;
            let weight = finite(s.score, "pmi")?;
            Ok(EdgeRecord::new(src, dst, EdgeRelation::WordWord, weight))
        })
        .collect()
}

/// For every document pair `i1 < i2`: `i1 → i2` and `i2 → i1`, both weighted by label IoU.
/// Zero-IoU pairs are kept.
pub fn document_document_edges<S>(
    space: NodeSpace,
    labels: &[Vec<String>],
    stats: &S,
) -> GraphPrepResult<Vec<EdgeRecord>>
where
    S: StatisticsProvider + ?Sized,
{
    if labels.len() != space.documents {
        return Err(GraphPrepError::Config(format!(
            "got {} label sets for {} documents",
            labels.len(),
            space.documents
        )));
    }

    let m = space.documents;
    let mut out = Vec::with_capacity(m.saturating_sub(1) * m);
    for i1 in 0..m {
        for i2 in (i1 + 1)..m {
            let weight = stats.iou(&labels[i1], &labels[i2]);
            if !(0.0..=1.0).contains(&weight) {
                return Err(GraphPrepError::ProviderContract(format!(
                    "iou({i1}, {i2}) = {weight} outside [0, 1]"
                )));
            }
            let d1 = document_id(space, i1)?;
            let d2 = document_id(space, i2)?;
            out.push(EdgeRecord::new(d1, d2, EdgeRelation::DocumentDocument, weight));
            out.push(EdgeRecord::new(d2, d1, EdgeRelation::DocumentDocument, weight));
        }
    }
    Ok(out)
}

/// document → word for every emitted TF-IDF cell. No filtering of zero cells.
pub fn document_word_edges(
    vocab: &Vocabulary,
    table: &TfIdfTable,
) -> GraphPrepResult<Vec<EdgeRecord>> {
    let space = vocab.node_space();
    let mut out = Vec::with_capacity(table.cell_count());
    for (row, cells) in table.rows.iter().enumerate() {
        let doc = document_id(space, row)?;
        for (word, value) in cells {
            let dst = word_id(vocab, word, "tf-idf")?;
            let weight = finite(*value, "tf-idf")?;
            out.push(EdgeRecord::new(doc, dst, EdgeRelation::DocumentWord, weight));
        }
    }
    Ok(out)
}

/// Exactly one self-loop per node, words and documents alike.
pub fn self_loop_edges(space: NodeSpace, weight: f32) -> Vec<EdgeRecord> {
    (0..space.total())
        .map(|id| EdgeRecord::new(id, id, EdgeRelation::SelfLoop, weight))
        .collect()
}

fn word_id(vocab: &Vocabulary, word: &str, provider: &str) -> GraphPrepResult<usize> {
    vocab.id_of(word).ok_or_else(|| {
        GraphPrepError::ProviderContract(format!("{provider}: word `{word}` not in vocabulary"))
    })
}

fn document_id(space: NodeSpace, index: usize) -> GraphPrepResult<usize> {
    space.global(NodeRef::document(index)).ok_or_else(|| {
        GraphPrepError::ProviderContract(format!(
            "document {index} outside corpus of {}",
            space.documents
        ))
    })
}

fn finite(value: f32, provider: &str) -> GraphPrepResult<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GraphPrepError::ProviderContract(format!(
            "{provider}: non-finite score {value}"
        )))
    }
}
