//! Vocabulary registry: first-seen global ids for surface forms.
//!
//! Ids are dense and assigned in scan order (documents in corpus order, tokens in
//! document order), so they are reproducible only when the scan order is. The
//! registry is mutable while the corpus is scanned and then frozen into a
//! read-only [`Vocabulary`] before any graph is built.

use crate::errors::{GraphPrepError, GraphPrepResult};
use crate::model::node::NodeSpace;
use crate::model::token::{Token, TokenizedDocument};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, info};

/// One distinct surface form. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub id: usize,
    pub text: String,
    /// Embedding of the first occurrence; later occurrences never overwrite it.
    pub embedding: Vec<f32>,
}

/// Mutable lookup-or-insert registry used during the single scan pass.
#[derive(Debug, Default)]
pub struct VocabularyRegistry {
    word_to_id: HashMap<String, usize>,
    entries: Vec<VocabularyEntry>,
    documents: Vec<Vec<usize>>,
    dim: Option<usize>,
}

impl VocabularyRegistry {
    /// `dim` pins the corpus-wide embedding dimension; `None` lets the first token decide.
    pub fn new(dim: Option<usize>) -> Self {
        Self {
            dim,
            ..Self::default()
        }
    }

    /// Return the id of `token.text`, allocating the next id on first sight.
    ///
    /// # Errors
    /// [`GraphPrepError::DimensionMismatch`] if the embedding length differs from `D`.
    pub fn register(&mut self, token: &Token) -> GraphPrepResult<usize> {
        let got = token.embedding.len();
        match self.dim {
            Some(want) if want != got => {
                return Err(GraphPrepError::DimensionMismatch {
                    token: token.text.clone(),
                    got,
                    want,
                });
            }
            Some(_) => {}
            None => self.dim = Some(got),
        }

        match self.word_to_id.entry(token.text.clone()) {
            Entry::Occupied(e) => Ok(*e.get()),
            Entry::Vacant(e) => {
                let id = self.entries.len();
                e.insert(id);
                self.entries.push(VocabularyEntry {
                    id,
                    text: token.text.clone(),
                    embedding: token.embedding.clone(),
                });
                Ok(id)
            }
        }
    }

    /// Register every token of the next document and record its id sequence.
    /// Returns the document index.
    pub fn register_document(&mut self, doc: &TokenizedDocument) -> GraphPrepResult<usize> {
        let mut ids = Vec::with_capacity(doc.len());
        for token in &doc.tokens {
            ids.push(self.register(token)?);
        }
        self.documents.push(ids);
        Ok(self.documents.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freeze into a read-only vocabulary; node counts are fixed from here on.
    pub fn freeze(self) -> Vocabulary {
        let space = NodeSpace::new(self.entries.len(), self.documents.len());
        Vocabulary {
            word_to_id: self.word_to_id,
            entries: self.entries,
            documents: self.documents,
            dim: self.dim.unwrap_or(0),
            space,
        }
    }
}

/// Frozen vocabulary plus per-document id sequences.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    word_to_id: HashMap<String, usize>,
    entries: Vec<VocabularyEntry>,
    documents: Vec<Vec<usize>>,
    dim: usize,
    space: NodeSpace,
}

impl Vocabulary {
    /// Single left-to-right pass over `docs` in corpus order.
    #[tracing::instrument(level = "info", skip_all, fields(documents = docs.len()))]
    pub fn from_documents(docs: &[TokenizedDocument], dim: Option<usize>) -> GraphPrepResult<Self> {
        let mut registry = VocabularyRegistry::new(dim);
        for doc in docs {
            let idx = registry.register_document(doc)?;
            debug!(doc = idx, tokens = doc.len(), "registered document");
        }
        info!("Processed {} tokens.", registry.len());
        Ok(registry.freeze())
    }

    /// Vocabulary size `V`.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimension `D` (0 for an empty corpus).
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn id_of(&self, text: &str) -> Option<usize> {
        self.word_to_id.get(text).copied()
    }

    pub fn entry(&self, id: usize) -> Option<&VocabularyEntry> {
        self.entries.get(id)
    }

    /// Entries in id order.
    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    /// Number of scanned documents `M`.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Ordered global ids of document `index` (duplicates kept).
    pub fn document(&self, index: usize) -> Option<&[usize]> {
        self.documents.get(index).map(Vec::as_slice)
    }

    /// Surface-form sequences of every document, for statistics providers.
    pub fn document_words(&self) -> Vec<Vec<&str>> {
        self.documents
            .iter()
            .map(|ids| ids.iter().map(|&id| self.entries[id].text.as_str()).collect())
            .collect()
    }

    /// Node partition sizes `(V, M)`, computed once at freeze time.
    pub fn node_space(&self) -> NodeSpace {
        self.space
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(words: &[(&str, f32)]) -> TokenizedDocument {
        words
            .iter()
            .map(|(w, v)| Token::new(*w, vec![*v, *v]))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn ids_follow_scan_order() {
        let docs = vec![
            doc(&[("the", 1.0), ("cat", 2.0), ("sat", 3.0)]),
            doc(&[("the", 1.0), ("dog", 4.0), ("sat", 3.0)]),
        ];
        let vocab = Vocabulary::from_documents(&docs, None).unwrap();

        assert_eq!(vocab.len(), 4);
        assert_eq!(vocab.id_of("the"), Some(0));
        assert_eq!(vocab.id_of("cat"), Some(1));
        assert_eq!(vocab.id_of("sat"), Some(2));
        assert_eq!(vocab.id_of("dog"), Some(3));
        assert_eq!(vocab.document(1), Some(&[0, 3, 2][..]));
        assert_eq!(vocab.node_space().total(), 6);
        for (i, e) in vocab.entries().iter().enumerate() {
            assert_eq!(e.id, i);
        }
    }

    #[test]
    fn first_embedding_wins() {
        let docs = vec![doc(&[("cat", 1.0), ("cat", 9.0)])];
        let vocab = Vocabulary::from_documents(&docs, None).unwrap();
        assert_eq!(vocab.len(), 1);
        assert_eq!(vocab.entry(0).unwrap().embedding, vec![1.0, 1.0]);
        assert_eq!(vocab.document(0), Some(&[0, 0][..]));
    }

    #[test]
    fn rescanning_is_idempotent() {
        let docs = vec![
            doc(&[("b", 1.0), ("a", 2.0)]),
            doc(&[("c", 1.0), ("a", 2.0), ("b", 1.0)]),
        ];
        let v1 = Vocabulary::from_documents(&docs, None).unwrap();
        let v2 = Vocabulary::from_documents(&docs, None).unwrap();
        assert_eq!(v1.entries(), v2.entries());
        for i in 0..docs.len() {
            assert_eq!(v1.document(i), v2.document(i));
        }
    }

    #[test]
    fn dimension_mismatch_fails_fast() {
        let mut registry = VocabularyRegistry::new(None);
        registry.register(&Token::new("a", vec![1.0, 2.0])).unwrap();
        let err = registry.register(&Token::new("b", vec![1.0])).unwrap_err();
        assert!(matches!(
            err,
            GraphPrepError::DimensionMismatch { got: 1, want: 2, .. }
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn pinned_dimension_is_enforced() {
        let mut registry = VocabularyRegistry::new(Some(3));
        assert!(registry.register(&Token::new("a", vec![1.0, 2.0])).is_err());
    }

    #[test]
    fn empty_documents_still_count() {
        let docs = vec![doc(&[("a", 1.0)]), TokenizedDocument::default()];
        let vocab = Vocabulary::from_documents(&docs, None).unwrap();
        assert_eq!(vocab.document_count(), 2);
        assert_eq!(vocab.document(1), Some(&[][..]));
    }
}
