//! Crate-wide error hierarchy for textgraph-prep.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type GraphPrepResult<T> = Result<T, GraphPrepError>;

/// Root error type for vocabulary, graph construction and persistence.
#[derive(Debug, Error)]
pub enum GraphPrepError {
    /// A zero-token document reached the document-embedding step.
    #[error("document {doc_index} has no tokens; its embedding is undefined")]
    EmptyDocument { doc_index: usize },

    /// A token was not registered during the vocabulary pass.
    #[error("token `{token}` is not in the vocabulary (document {doc_index:?})")]
    UnknownVocabulary {
        doc_index: Option<usize>,
        token: String,
    },

    /// Embedding length disagrees with the corpus-wide dimension.
    #[error("embedding for `{token}` has dimension {got}, want {want}")]
    DimensionMismatch {
        token: String,
        got: usize,
        want: usize,
    },

    /// A statistics provider referenced an unknown word/document or returned a non-finite score.
    #[error("statistics provider contract violated: {0}")]
    ProviderContract(String),

    /// Tokenization adapter failure (missing parse, dangling dependency child).
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// Invalid or inconsistent configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A corpus JSONL row could not be parsed.
    #[error("corpus line {line}: {source}")]
    CorpusLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// I/O or filesystem errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing / serialization errors.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML config parsing errors.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yml::Error),
}
