//! Tokenization adapters.
//!
//! The graph builders only depend on the [`Tokenizer`] contract: ordered tokens,
//! each with surface text, an embedding of corpus-wide dimension `D`, and
//! dependency children as positions within the same document.
//!
//! Two adapters ship with the crate:
//! - [`ParsedTokenizer`] serves parser output carried by the corpus records;
//! - [`WhitespaceTokenizer`] splits on whitespace and embeds by hashing (no dependencies).

use crate::core::ids::fnv1a64;
use crate::errors::{GraphPrepError, GraphPrepResult};
use crate::model::corpus::Corpus;
use crate::model::token::{Token, TokenizedDocument};
use std::collections::HashMap;
use tracing::{debug, info};

/// Turns document text into ordered tokens.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> GraphPrepResult<Vec<Token>>;
}

/// Serves pre-parsed tokens keyed by document text.
#[derive(Debug, Default)]
pub struct ParsedTokenizer {
    by_text: HashMap<String, Vec<Token>>,
}

impl ParsedTokenizer {
    /// Index the `tokens` of every record. The first record wins for duplicate texts.
    ///
    /// # Errors
    /// [`GraphPrepError::Tokenizer`] if a record has no tokens, carries tokens for
    /// empty text (empty text always tokenizes to nothing), or a child index is out
    /// of range.
    pub fn from_corpus(corpus: &Corpus) -> GraphPrepResult<Self> {
        let mut by_text = HashMap::with_capacity(corpus.len());
        for (i, rec) in corpus.records.iter().enumerate() {
            let tokens = rec.tokens.as_ref().ok_or_else(|| {
                GraphPrepError::Tokenizer(format!("document {i} has no parsed tokens"))
            })?;
            if rec.text.is_empty() && !tokens.is_empty() {
                return Err(GraphPrepError::Tokenizer(format!(
                    "document {i} has empty text but {} parsed tokens",
                    tokens.len()
                )));
            }
            check_children(i, tokens)?;
            by_text
                .entry(rec.text.clone())
                .or_insert_with(|| tokens.clone());
        }
        debug!(documents = by_text.len(), "parsed tokenizer indexed");
        Ok(Self { by_text })
    }
}

impl Tokenizer for ParsedTokenizer {
    fn tokenize(&self, text: &str) -> GraphPrepResult<Vec<Token>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        self.by_text
            .get(text)
            .cloned()
            .ok_or_else(|| GraphPrepError::Tokenizer(format!("no parse available for `{text}`")))
    }
}

fn check_children(doc_index: usize, tokens: &[Token]) -> GraphPrepResult<()> {
    for (pos, t) in tokens.iter().enumerate() {
        if let Some(&bad) = t.children.iter().find(|&&c| c >= tokens.len()) {
            return Err(GraphPrepError::Tokenizer(format!(
                "document {doc_index}: token {pos} (`{}`) has child {bad} out of {}",
                t.text,
                tokens.len()
            )));
        }
    }
    Ok(())
}

/// Whitespace tokenizer with deterministic hashed embeddings.
///
/// Surrounding punctuation is stripped; tokens that become empty are dropped.
/// The same surface form always maps to the same vector.
#[derive(Debug, Clone)]
pub struct WhitespaceTokenizer {
    dim: usize,
}

impl WhitespaceTokenizer {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    /// Pseudo-random vector in `[-1, 1)` seeded by the FNV-1a hash of `text`.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut state = fnv1a64(text.as_bytes());
        (0..self.dim)
            .map(|_| {
                let bits = splitmix64(&mut state) >> 40;
                (bits as f32 / (1u64 << 24) as f32) * 2.0 - 1.0
            })
            .collect()
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> GraphPrepResult<Vec<Token>> {
        Ok(text
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|w| !w.is_empty())
            .map(|w| Token::new(w, self.embed(w)))
            .collect())
    }
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e3779b97f4a7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Tokenize every text once, in corpus order.
#[tracing::instrument(level = "info", skip_all)]
pub fn tokenize_corpus<'a, T, I>(tokenizer: &T, texts: I) -> GraphPrepResult<Vec<TokenizedDocument>>
where
    T: Tokenizer + ?Sized,
    I: IntoIterator<Item = &'a str>,
{
    let docs = texts
        .into_iter()
        .map(|t| tokenizer.tokenize(t).map(TokenizedDocument::new))
        .collect::<GraphPrepResult<Vec<_>>>()?;
    info!(
        documents = docs.len(),
        tokens = docs.iter().map(TokenizedDocument::len).sum::<usize>(),
        "Tokenized corpus"
    );
    Ok(docs)
}
