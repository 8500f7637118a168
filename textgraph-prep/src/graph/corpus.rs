//! Corpus (transductive) graph builder.
//!
//! Builds one heterogeneous graph over the frozen vocabulary and all documents:
//! 1. node features for `V` word nodes then `M` document nodes;
//! 2. word → word PMI edges;
//! 3. document ↔ document IoU edges (multi-label corpora only);
//! 4. document → word TF-IDF edges;
//! 5. one self-loop per node.
//!
//! Passes run in this order and append to one accumulator; the petgraph graph is
//! materialized once at the end.

use crate::config::model::{EmptyDocumentPolicy, PrepConfig};
use crate::core::registry::Vocabulary;
use crate::errors::GraphPrepResult;
use crate::graph::edges::EdgeAccumulator;
use crate::graph::{features, relations};
use crate::model::graph::CorpusGraph;
use crate::stats::StatisticsProvider;
use tracing::info;

/// Options that shape the corpus graph.
#[derive(Debug, Clone, Copy)]
pub struct CorpusGraphOptions {
    pub multi_label: bool,
    pub empty_documents: EmptyDocumentPolicy,
    pub self_loop_weight: f32,
}

impl Default for CorpusGraphOptions {
    fn default() -> Self {
        Self {
            multi_label: false,
            empty_documents: EmptyDocumentPolicy::default(),
            self_loop_weight: 1.0,
        }
    }
}

impl From<&PrepConfig> for CorpusGraphOptions {
    fn from(cfg: &PrepConfig) -> Self {
        Self {
            multi_label: cfg.corpus.multi_label,
            empty_documents: cfg.corpus.empty_documents,
            self_loop_weight: cfg.graph.self_loop_weight,
        }
    }
}

pub struct CorpusGraphBuilder<'a, S: StatisticsProvider + ?Sized> {
    stats: &'a S,
    opts: CorpusGraphOptions,
}

impl<'a, S: StatisticsProvider + ?Sized> CorpusGraphBuilder<'a, S> {
    pub fn new(stats: &'a S, opts: CorpusGraphOptions) -> Self {
        Self { stats, opts }
    }

    /// Build the corpus graph. `labels[i]` is the label set of document `i`
    /// (only read when the corpus is multi-label).
    ///
    /// # Errors
    /// - [`crate::errors::GraphPrepError::EmptyDocument`] for a zero-token document
    ///   unless the policy substitutes a zero vector;
    /// - [`crate::errors::GraphPrepError::ProviderContract`] when a provider references
    ///   an unknown word/document or emits a non-finite score.
    #[tracing::instrument(level = "info", skip_all, fields(words = vocab.len(), documents = vocab.document_count()))]
    pub fn build(&self, vocab: &Vocabulary, labels: &[Vec<String>]) -> GraphPrepResult<CorpusGraph> {
        let space = vocab.node_space();

        // 1) node features
        let nodes = features::corpus_node_features(vocab, self.opts.empty_documents)?;
        info!(nodes = nodes.len(), "Computed node features");

        let docs = vocab.document_words();
        let mut acc = EdgeAccumulator::new(space);

        // 2) word-word
        let pmi = self.stats.pmi(&docs)?;
        acc.append(relations::word_word_edges(vocab, &pmi)?)?;
        info!(edges = pmi.len(), "Added word-word edges");

        // 3) document-document
        if self.opts.multi_label {
            let pass = relations::document_document_edges(space, labels, self.stats)?;
            let added = pass.len();
            acc.append(pass)?;
            info!(edges = added, "Added document-document edges");
        }

        // 4) document-word
        let table = self.stats.tf_idf(&docs, vocab)?;
        let pass = relations::document_word_edges(vocab, &table)?;
        let added = pass.len();
        acc.append(pass)?;
        info!(edges = added, "Added document-word edges");

        // 5) self-loops
        acc.append(relations::self_loop_edges(space, self.opts.self_loop_weight))?;

        acc.materialize(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GraphPrepError;
    use crate::model::graph::EdgeRelation;
    use crate::model::node::NodeKind;
    use crate::model::token::{Token, TokenizedDocument};
    use crate::stats::{CorpusStatistics, TfIdfTable, WordPairScore};
    use petgraph::graph::NodeIndex;
    use petgraph::visit::EdgeRef;

    /// Provider returning canned output, to test the builder independently of the statistics.
    struct StubStats {
        pmi: Vec<WordPairScore>,
        tfidf: TfIdfTable,
    }

    impl StatisticsProvider for StubStats {
        fn pmi(&self, _docs: &[Vec<&str>]) -> GraphPrepResult<Vec<WordPairScore>> {
            Ok(self.pmi.clone())
        }

        fn tf_idf(&self, _docs: &[Vec<&str>], _vocab: &Vocabulary) -> GraphPrepResult<TfIdfTable> {
            Ok(self.tfidf.clone())
        }

        fn iou(&self, a: &[String], b: &[String]) -> f32 {
            crate::stats::iou::label_iou(a, b)
        }
    }

    fn emb(word: &str) -> Vec<f32> {
        match word {
            "the" => vec![1.0, 0.0],
            "cat" => vec![0.0, 2.0],
            "sat" => vec![4.0, 4.0],
            _ => vec![8.0, 0.5],
        }
    }

    fn corpus(texts: &[&str]) -> Vec<TokenizedDocument> {
        texts
            .iter()
            .map(|t| {
                t.split_whitespace()
                    .map(|w| Token::new(w, emb(w)))
                    .collect::<Vec<_>>()
                    .into()
            })
            .collect()
    }

    fn stub() -> StubStats {
        StubStats {
            pmi: vec![WordPairScore {
                word1: "cat".into(),
                word2: "sat".into(),
                score: 0.4,
            }],
            tfidf: TfIdfTable {
                rows: vec![
                    vec![("the".into(), 0.2), ("cat".into(), 0.7), ("sat".into(), 0.3)],
                    vec![("the".into(), 0.2), ("dog".into(), 0.7), ("sat".into(), 0.3)],
                ],
            },
        }
    }

    fn labels() -> Vec<Vec<String>> {
        vec![vec!["a".into()], vec!["a".into(), "b".into()]]
    }

    fn relation_count(g: &CorpusGraph, rel: EdgeRelation) -> usize {
        g.edge_indices().filter(|&e| g[e].relation == rel).count()
    }

    #[test]
    fn cat_dog_scenario() {
        let docs = corpus(&["the cat sat", "the dog sat"]);
        let vocab = Vocabulary::from_documents(&docs, None).unwrap();
        let stats = stub();
        let g = CorpusGraphBuilder::new(&stats, CorpusGraphOptions::default())
            .build(&vocab, &labels())
            .unwrap();

        assert_eq!(g.node_count(), 6);
        let doc0 = &g[NodeIndex::new(4)];
        assert_eq!(doc0.kind, NodeKind::Document);
        assert_eq!(doc0.item_id, 4);
        let expected: Vec<f32> = (0..2)
            .map(|k| (emb("the")[k] + emb("cat")[k] + emb("sat")[k]) / 3.0)
            .collect();
        assert_eq!(doc0.emb, expected);

        assert_eq!(relation_count(&g, EdgeRelation::DocumentDocument), 0);
        assert_eq!(relation_count(&g, EdgeRelation::WordWord), 1);
        assert_eq!(relation_count(&g, EdgeRelation::DocumentWord), 6);

        let e = g
            .find_edge(NodeIndex::new(4), NodeIndex::new(0))
            .unwrap();
        assert_eq!(g[e].weight, [0.2]);
        assert_eq!(g[e].relation, EdgeRelation::DocumentWord);
    }

    #[test]
    fn every_node_has_exactly_one_self_loop() {
        let docs = corpus(&["the cat sat", "the dog sat"]);
        let vocab = Vocabulary::from_documents(&docs, None).unwrap();
        let stats = stub();
        let g = CorpusGraphBuilder::new(&stats, CorpusGraphOptions::default())
            .build(&vocab, &labels())
            .unwrap();

        for n in g.node_indices() {
            let loops = g
                .edges_connecting(n, n)
                .filter(|e| e.weight().relation == EdgeRelation::SelfLoop)
                .count();
            assert_eq!(loops, 1);
        }
        assert_eq!(relation_count(&g, EdgeRelation::SelfLoop), g.node_count());
    }

    #[test]
    fn multi_label_adds_symmetric_document_edges() {
        let docs = corpus(&["the cat sat", "the dog sat"]);
        let vocab = Vocabulary::from_documents(&docs, None).unwrap();
        let stats = stub();
        let opts = CorpusGraphOptions {
            multi_label: true,
            ..CorpusGraphOptions::default()
        };
        let g = CorpusGraphBuilder::new(&stats, opts)
            .build(&vocab, &labels())
            .unwrap();

        assert_eq!(relation_count(&g, EdgeRelation::DocumentDocument), 2);
        let ab = g.find_edge(NodeIndex::new(4), NodeIndex::new(5)).unwrap();
        let ba = g.find_edge(NodeIndex::new(5), NodeIndex::new(4)).unwrap();
        assert_eq!(g[ab].weight, [0.5]);
        assert_eq!(g[ab].weight, g[ba].weight);
    }

    #[test]
    fn edges_appear_in_pass_order() {
        let docs = corpus(&["the cat sat", "the dog sat"]);
        let vocab = Vocabulary::from_documents(&docs, None).unwrap();
        let stats = stub();
        let opts = CorpusGraphOptions {
            multi_label: true,
            ..CorpusGraphOptions::default()
        };
        let g = CorpusGraphBuilder::new(&stats, opts)
            .build(&vocab, &labels())
            .unwrap();

        let order: Vec<EdgeRelation> = g.edge_indices().map(|e| g[e].relation).collect();
        let rank = |r: &EdgeRelation| match r {
            EdgeRelation::WordWord => 0,
            EdgeRelation::DocumentDocument => 1,
            EdgeRelation::DocumentWord => 2,
            EdgeRelation::SelfLoop => 3,
            EdgeRelation::Dependency => 4,
        };
        assert!(order.windows(2).all(|w| rank(&w[0]) <= rank(&w[1])));
    }

    #[test]
    fn provider_violation_aborts_build() {
        let docs = corpus(&["the cat sat", "the dog sat"]);
        let vocab = Vocabulary::from_documents(&docs, None).unwrap();
        let mut stats = stub();
        stats.tfidf.rows[1].push(("bird".into(), 0.1));

        let err = CorpusGraphBuilder::new(&stats, CorpusGraphOptions::default())
            .build(&vocab, &labels())
            .unwrap_err();
        assert!(matches!(err, GraphPrepError::ProviderContract(_)));
    }

    #[test]
    fn empty_document_is_guarded() {
        let docs = corpus(&["the cat", ""]);
        let vocab = Vocabulary::from_documents(&docs, None).unwrap();
        let stats = CorpusStatistics::default();

        let fail = CorpusGraphOptions {
            empty_documents: EmptyDocumentPolicy::Fail,
            ..CorpusGraphOptions::default()
        };
        let err = CorpusGraphBuilder::new(&stats, fail)
            .build(&vocab, &[vec![], vec![]])
            .unwrap_err();
        assert!(matches!(err, GraphPrepError::EmptyDocument { doc_index: 1 }));

        let zero = CorpusGraphOptions {
            empty_documents: EmptyDocumentPolicy::ZeroVector,
            ..CorpusGraphOptions::default()
        };
        let g = CorpusGraphBuilder::new(&stats, zero)
            .build(&vocab, &[vec![], vec![]])
            .unwrap();
        assert_eq!(g[NodeIndex::new(3)].emb, vec![0.0, 0.0]);
        assert!(g.node_weights().all(|n| n.emb.iter().all(|v| v.is_finite())));
    }
}
