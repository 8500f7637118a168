//! Instance (per-document) dependency graphs.
//!
//! Nodes are the document's unique tokens in first-occurrence order (local ids
//! from 0, independent of the global vocabulary ids). Each node keeps its
//! embedding and global id. Edges are token → dependency child, followed by one
//! self-loop per node.

use crate::core::registry::Vocabulary;
use crate::core::tokenize::Tokenizer;
use crate::errors::{GraphPrepError, GraphPrepResult};
use crate::model::graph::{EdgeRelation, InstanceGraph, InstanceNode};
use crate::model::token::{Token, TokenizedDocument};
use petgraph::graph::NodeIndex;
use std::collections::HashMap;
use tracing::{debug, info};

pub struct InstanceGraphBuilder<'a, T: Tokenizer + ?Sized> {
    tokenizer: &'a T,
    vocab: &'a Vocabulary,
}

impl<'a, T: Tokenizer + ?Sized> InstanceGraphBuilder<'a, T> {
    /// `vocab` must come from a completed registry pass over the same tokenization.
    pub fn new(tokenizer: &'a T, vocab: &'a Vocabulary) -> Self {
        Self { tokenizer, vocab }
    }

    /// Tokenize `text` and build its graph. Empty text yields an empty graph.
    pub fn build(&self, text: &str) -> GraphPrepResult<InstanceGraph> {
        let tokens = self.tokenizer.tokenize(text)?;
        self.build_from_tokens(None, &tokens)
    }

    /// Build from already tokenized input; `doc_index` only enriches errors.
    ///
    /// # Errors
    /// - [`GraphPrepError::UnknownVocabulary`] for a token missing from the vocabulary;
    /// - [`GraphPrepError::Tokenizer`] for a dependency child outside the document.
    pub fn build_from_tokens(
        &self,
        doc_index: Option<usize>,
        tokens: &[Token],
    ) -> GraphPrepResult<InstanceGraph> {
        let mut g = InstanceGraph::new();
        let mut local: HashMap<&str, NodeIndex> = HashMap::new();

        for token in tokens {
            if local.contains_key(token.text.as_str()) {
                continue;
            }
            let item_id =
                self.vocab
                    .id_of(&token.text)
                    .ok_or_else(|| GraphPrepError::UnknownVocabulary {
                        doc_index,
                        token: token.text.clone(),
                    })?;
            let idx = g.add_node(InstanceNode {
                item_id,
                text: token.text.clone(),
                emb: token.embedding.clone(),
            });
            local.insert(token.text.as_str(), idx);
        }

        for (pos, token) in tokens.iter().enumerate() {
            let src = local[token.text.as_str()];
            for &child in &token.children {
                let child_token = tokens.get(child).ok_or_else(|| {
                    GraphPrepError::Tokenizer(format!(
                        "token {pos} (`{}`) has child {child} out of {}",
                        token.text,
                        tokens.len()
                    ))
                })?;
                g.add_edge(src, local[child_token.text.as_str()], EdgeRelation::Dependency);
            }
        }

        for idx in g.node_indices().collect::<Vec<_>>() {
            g.add_edge(idx, idx, EdgeRelation::SelfLoop);
        }

        Ok(g)
    }

    /// One graph per document plus the parallel label list.
    #[tracing::instrument(level = "info", skip_all, fields(documents = docs.len()))]
    pub fn build_all(
        &self,
        docs: &[TokenizedDocument],
        labels: &[Vec<String>],
    ) -> GraphPrepResult<(Vec<InstanceGraph>, Vec<Vec<String>>)> {
        if docs.len() != labels.len() {
            return Err(GraphPrepError::Config(format!(
                "got {} label sets for {} documents",
                labels.len(),
                docs.len()
            )));
        }

        let mut graphs = Vec::with_capacity(docs.len());
        for (i, doc) in docs.iter().enumerate() {
            let g = self.build_from_tokens(Some(i), &doc.tokens)?;
            debug!(doc = i, nodes = g.node_count(), edges = g.edge_count(), "instance graph");
            graphs.push(g);
        }
        info!(graphs = graphs.len(), "Built instance graphs");
        Ok((graphs, labels.to_vec()))
    }
}
