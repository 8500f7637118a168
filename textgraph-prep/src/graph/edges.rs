//! Edge accumulator for the corpus graph.
//!
//! Relation passes produce `(src, dst, weight, relation)` records independently;
//! the accumulator appends whole passes and materializes the petgraph graph once.

use crate::errors::{GraphPrepError, GraphPrepResult};
use crate::model::graph::{CorpusGraph, CorpusNode, EdgeRelation, WeightedEdge};
use crate::model::node::NodeSpace;
use petgraph::graph::NodeIndex;
use tracing::debug;

/// One directed edge between global node ids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRecord {
    pub src: usize,
    pub dst: usize,
    pub edge: WeightedEdge,
}

impl EdgeRecord {
    pub fn new(src: usize, dst: usize, relation: EdgeRelation, weight: f32) -> Self {
        Self {
            src,
            dst,
            edge: WeightedEdge::new(relation, weight),
        }
    }
}

/// Growing edge set, bound to a fixed node space.
#[derive(Debug)]
pub struct EdgeAccumulator {
    space: NodeSpace,
    edges: Vec<EdgeRecord>,
}

impl EdgeAccumulator {
    pub fn new(space: NodeSpace) -> Self {
        Self {
            space,
            edges: Vec::new(),
        }
    }

    /// Append a complete pass. Nothing is appended if any endpoint is outside the node space.
    pub fn append(&mut self, pass: Vec<EdgeRecord>) -> GraphPrepResult<()> {
        let space = self.space;
        if let Some(bad) = pass
            .iter()
            .find(|e| space.resolve(e.src).is_none() || space.resolve(e.dst).is_none())
        {
            return Err(GraphPrepError::ProviderContract(format!(
                "{} edge {} -> {} outside node space of {}",
                bad.edge.relation,
                bad.src,
                bad.dst,
                space.total()
            )));
        }
        self.edges.extend(pass);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Build the graph: node `i` of `nodes` becomes `NodeIndex(i)`, edges keep insertion order.
    pub fn materialize(self, nodes: Vec<CorpusNode>) -> GraphPrepResult<CorpusGraph> {
        if nodes.len() != self.space.total() {
            return Err(GraphPrepError::Config(format!(
                "expected {} node features, got {}",
                self.space.total(),
                nodes.len()
            )));
        }

        let mut g = CorpusGraph::with_capacity(nodes.len(), self.edges.len());
        for n in nodes {
            g.add_node(n);
        }
        for e in self.edges {
            g.add_edge(NodeIndex::new(e.src), NodeIndex::new(e.dst), e.edge);
        }

        debug!(
            "corpus graph materialized: nodes={}, edges={}",
            g.node_count(),
            g.edge_count()
        );
        Ok(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::summary::count_relations;

    #[test]
    fn rejects_whole_pass_with_out_of_range_edge() {
        let mut acc = EdgeAccumulator::new(NodeSpace::new(2, 1));
        acc.append(vec![EdgeRecord::new(0, 1, EdgeRelation::WordWord, 0.5)])
            .unwrap();

        let err = acc
            .append(vec![
                EdgeRecord::new(2, 0, EdgeRelation::DocumentWord, 0.1),
                EdgeRecord::new(2, 3, EdgeRelation::DocumentWord, 0.1),
            ])
            .unwrap_err();
        assert!(matches!(err, GraphPrepError::ProviderContract(_)));
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn materialized_graph_keeps_every_appended_edge() {
        let mut acc = EdgeAccumulator::new(NodeSpace::new(2, 0));
        acc.append(vec![
            EdgeRecord::new(0, 1, EdgeRelation::WordWord, 0.5),
            EdgeRecord::new(0, 0, EdgeRelation::SelfLoop, 1.0),
            EdgeRecord::new(1, 1, EdgeRelation::SelfLoop, 1.0),
        ])
        .unwrap();
        let nodes = (0..2)
            .map(|i| CorpusNode {
                item_id: i,
                kind: crate::model::node::NodeKind::Word,
                label: None,
                emb: vec![],
            })
            .collect();

        let g = acc.materialize(nodes).unwrap();
        let counts = count_relations(&g);
        assert_eq!(counts["word_word"], 1);
        assert_eq!(counts["self_loop"], 2);
    }

    #[test]
    fn rejects_wrong_node_count() {
        let acc = EdgeAccumulator::new(NodeSpace::new(2, 1));
        assert!(matches!(acc.materialize(vec![]), Err(GraphPrepError::Config(_))));
    }
}
