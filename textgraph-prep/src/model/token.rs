//! Token model produced by tokenization adapters.
//!
//! Tokens are ephemeral: they live from tokenization until both graph passes
//! have consumed them. `children` are indices into the same document's token list,
//! which is how dependency relations survive serialization.

use serde::{Deserialize, Serialize};

/// A single token with its embedding and dependency children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Surface text; the vocabulary key.
    pub text: String,
    /// Dense embedding vector (dimension fixed corpus-wide).
    #[serde(rename = "vector", alias = "embedding")]
    pub embedding: Vec<f32>,
    /// Positions of dependency children within the same document.
    #[serde(default)]
    pub children: Vec<usize>,
}

impl Token {
    pub fn new(text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            text: text.into(),
            embedding,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<usize>) -> Self {
        self.children = children;
        self
    }
}

/// Ordered tokens of one document, as returned by a [`crate::core::tokenize::Tokenizer`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenizedDocument {
    pub tokens: Vec<Token>,
}

impl TokenizedDocument {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl From<Vec<Token>> for TokenizedDocument {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}
