//! Partitioned node index space of the corpus graph.
//!
//! Word nodes occupy `[0, V)` and document nodes `[V, V + M)`. Every call site
//! converts between (kind, local offset) and global ids through [`NodeSpace`]
//! instead of doing `V + i` arithmetic by hand.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The two disjoint node kinds of the corpus graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Word,
    Document,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            NodeKind::Word => "word",
            NodeKind::Document => "document",
        })
    }
}

/// A node reference: kind plus offset within that kind's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub kind: NodeKind,
    pub offset: usize,
}

impl NodeRef {
    pub fn word(id: usize) -> Self {
        Self {
            kind: NodeKind::Word,
            offset: id,
        }
    }

    pub fn document(index: usize) -> Self {
        Self {
            kind: NodeKind::Document,
            offset: index,
        }
    }
}

/// Sizes of both partitions; fixed once the vocabulary is frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpace {
    pub words: usize,
    pub documents: usize,
}

impl NodeSpace {
    pub fn new(words: usize, documents: usize) -> Self {
        Self { words, documents }
    }

    /// Total node count `V + M`.
    pub fn total(&self) -> usize {
        self.words + self.documents
    }

    /// Global id for `node`, or `None` when the offset is outside its partition.
    pub fn global(&self, node: NodeRef) -> Option<usize> {
        match node.kind {
            NodeKind::Word if node.offset < self.words => Some(node.offset),
            NodeKind::Document if node.offset < self.documents => Some(self.words + node.offset),
            _ => None,
        }
    }

    /// Inverse of [`NodeSpace::global`].
    pub fn resolve(&self, global: usize) -> Option<NodeRef> {
        if global < self.words {
            Some(NodeRef::word(global))
        } else if global < self.total() {
            Some(NodeRef::document(global - self.words))
        } else {
            None
        }
    }

    /// All global ids, words first.
    pub fn iter(&self) -> impl Iterator<Item = NodeRef> + '_ {
        (0..self.words)
            .map(NodeRef::word)
            .chain((0..self.documents).map(NodeRef::document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_follow_words() {
        let space = NodeSpace::new(4, 2);
        assert_eq!(space.total(), 6);
        assert_eq!(space.global(NodeRef::word(3)), Some(3));
        assert_eq!(space.global(NodeRef::document(0)), Some(4));
        assert_eq!(space.global(NodeRef::document(1)), Some(5));
        assert_eq!(space.global(NodeRef::document(2)), None);
        assert_eq!(space.global(NodeRef::word(4)), None);
    }

    #[test]
    fn resolve_inverts_global() {
        let space = NodeSpace::new(3, 2);
        for node in space.iter() {
            let g = space.global(node).unwrap();
            assert_eq!(space.resolve(g), Some(node));
        }
        assert_eq!(space.resolve(5), None);
    }
}
