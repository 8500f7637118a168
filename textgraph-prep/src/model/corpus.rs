//! Corpus records and the JSONL reader.
//!
//! One document per line:
//! ```json
//! { "text": "the food was great", "labels": ["food", "positive"], "tokens": [ ... ] }
//! ```
//! `labels` may also be a single string. `tokens` is optional and, when present,
//! holds parser output (see [`crate::model::token::Token`]).

use crate::errors::{GraphPrepError, GraphPrepResult};
use crate::model::token::Token;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::{BufRead, BufReader};
use std::{fs::File, path::Path};
use tracing::{debug, info};

/// A single input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusRecord {
    pub text: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub labels: Vec<String>,
    /// Pre-parsed tokens from an external dependency parser.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<Token>>,
}

impl CorpusRecord {
    pub fn new(text: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            text: text.into(),
            labels,
            tokens: None,
        }
    }
}

/// Ordered document collection. Document index = position in `records`.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub records: Vec<CorpusRecord>,
}

impl Corpus {
    pub fn new(records: Vec<CorpusRecord>) -> Self {
        Self { records }
    }

    /// Reads a corpus JSONL file strictly. Empty lines are ignored.
    ///
    /// # Errors
    /// - [`GraphPrepError::Io`] if the file cannot be read.
    /// - [`GraphPrepError::CorpusLine`] naming the first malformed line (1-based).
    pub fn read_jsonl(path: impl AsRef<Path>) -> GraphPrepResult<Self> {
        info!("Reading corpus JSONL: {:?}", path.as_ref());

        let reader = BufReader::new(File::open(path.as_ref())?);
        let mut records = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let rec: CorpusRecord = serde_json::from_str(&line)
                .map_err(|source| GraphPrepError::CorpusLine { line: i + 1, source })?;
            records.push(rec);
        }

        debug!("Loaded {} corpus records", records.len());
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.text.as_str())
    }

    /// Label sets in document order.
    pub fn labels(&self) -> Vec<Vec<String>> {
        self.records.iter().map(|r| r.labels.clone()).collect()
    }

    /// Number of records carrying pre-parsed tokens.
    pub fn parsed_count(&self) -> usize {
        self.records.iter().filter(|r| r.tokens.is_some()).count()
    }

    /// True when every record carries pre-parsed tokens.
    pub fn is_preparsed(&self) -> bool {
        !self.records.is_empty() && self.parsed_count() == self.records.len()
    }
}

fn one_or_many<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(de)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_single_and_multi_labels() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, r#"{{"text": "the cat sat", "labels": "pets"}}"#).unwrap();
        writeln!(f).unwrap();
        writeln!(f, r#"{{"text": "the dog sat", "labels": ["pets", "dogs"]}}"#).unwrap();

        let corpus = Corpus::read_jsonl(f.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.records[0].labels, vec!["pets"]);
        assert_eq!(corpus.records[1].labels, vec!["pets", "dogs"]);
        assert!(!corpus.is_preparsed());
    }

    #[test]
    fn reads_preparsed_tokens() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            r#"{{"text": "cat sat", "labels": [], "tokens": [{{"text": "cat", "vector": [1.0]}}, {{"text": "sat", "vector": [2.0], "children": [0]}}]}}"#
        )
        .unwrap();

        let corpus = Corpus::read_jsonl(f.path()).unwrap();
        assert!(corpus.is_preparsed());
        let tokens = corpus.records[0].tokens.as_ref().unwrap();
        assert_eq!(tokens[1].children, vec![0]);
        assert_eq!(tokens[0].embedding, vec![1.0]);
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, r#"{{"text": "ok"}}"#).unwrap();
        writeln!(f, "not json").unwrap();

        let err = Corpus::read_jsonl(f.path()).unwrap_err();
        assert!(matches!(err, GraphPrepError::CorpusLine { line: 2, .. }));
    }
}
