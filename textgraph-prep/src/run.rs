//! High-level orchestration for turning a labelled corpus into GNN training graphs.
//!
//! The single public entry point is [`prepare_graph_data`]. It reads a JSONL
//! corpus, tokenizes every document once, freezes the vocabulary, builds one
//! instance graph per document plus the corpus graph, and exports everything
//! into `<out>/graphs_data/<timestamp>/`.

use crate::{
    config::model::{EmptyDocumentPolicy, PrepConfig},
    core::{
        ids::corpus_fingerprint,
        normalize::TextNormalizer,
        registry::Vocabulary,
        summary::{InputCounts, Phase, PipelineSummary, SummaryStopwatch},
        tokenize::{ParsedTokenizer, Tokenizer, WhitespaceTokenizer, tokenize_corpus},
    },
    errors::{GraphPrepError, GraphPrepResult},
    export::save_all,
    graph::{
        corpus::{CorpusGraphBuilder, CorpusGraphOptions},
        instance::InstanceGraphBuilder,
    },
    model::{corpus::Corpus, graph::GraphDataset, token::TokenizedDocument},
    stats::CorpusStatistics,
};
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Embedding width of the hashing tokenizer when the config does not pin one.
pub const DEFAULT_EMBEDDING_DIM: usize = 300;

/// Everything [`build_dataset`] produces, before persistence.
#[derive(Debug)]
pub struct PreparedDataset {
    pub vocabulary: Vocabulary,
    pub dataset: GraphDataset,
    pub input: InputCounts,
    /// Texts that made it into the graphs, in node order.
    pub texts: Vec<String>,
}

/// Main pipeline: corpus file in, persisted graph artifacts out.
///
/// # Steps
/// 1. **Read** the JSONL corpus.
/// 2. **Build** vocabulary, instance graphs and corpus graph ([`build_dataset`]).
/// 3. **Export** all artifacts into `<out_root>/graphs_data/<YYYYMMDD_HHMMSS>/`.
#[tracing::instrument(level = "info", skip_all, fields(corpus = %corpus_path.display()))]
pub fn prepare_graph_data(
    corpus_path: &Path,
    config: &PrepConfig,
    out_root: &Path,
) -> Result<save_all::PersistSummary> {
    let mut sw = SummaryStopwatch::start();

    let corpus = Corpus::read_jsonl(corpus_path)
        .with_context(|| format!("read corpus {}", corpus_path.display()))?;
    info!(documents = corpus.len(), "Corpus loaded");

    let prepared = build_dataset_timed(&corpus, config, &mut sw)?;

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
    let out_dir: PathBuf = out_root.join("graphs_data").join(timestamp);

    let corpus_id = corpus_fingerprint(prepared.texts.iter().map(String::as_str));
    let summary = PipelineSummary::from_dataset(
        corpus_id,
        prepared.input,
        &prepared.vocabulary,
        &prepared.dataset,
    );

    let persisted = save_all::persist_all(
        &out_dir,
        &prepared.dataset,
        &prepared.vocabulary,
        &config.export,
        summary,
        &mut sw,
    )?;

    info!(out_dir = %out_dir.display(), "Artifacts saved");
    Ok(persisted)
}

/// Build the in-memory dataset for `corpus` without touching the filesystem.
pub fn build_dataset(corpus: &Corpus, config: &PrepConfig) -> GraphPrepResult<PreparedDataset> {
    let mut sw = SummaryStopwatch::start();
    build_dataset_timed(corpus, config, &mut sw)
}

fn build_dataset_timed(
    corpus: &Corpus,
    config: &PrepConfig,
    sw: &mut SummaryStopwatch,
) -> GraphPrepResult<PreparedDataset> {
    let tokenizer = select_tokenizer(corpus, config)?;
    let texts = input_texts(corpus, config)?;

    // 1) tokenize once; both graph kinds reuse these tokens
    let docs = tokenize_corpus(tokenizer.as_ref(), texts.iter().map(String::as_str))?;
    sw.lap(Phase::Tokenize);

    // 2) empty-document policy
    let (docs, labels, texts, skipped) =
        apply_empty_policy(docs, corpus.labels(), texts, config.corpus.empty_documents);
    let input = InputCounts {
        documents_in: corpus.len(),
        documents_skipped: skipped,
    };

    // 3) vocabulary pass; ids and node count are fixed from here on
    let vocabulary = Vocabulary::from_documents(&docs, config.corpus.embedding_dim)?;
    sw.lap(Phase::Vocabulary);

    // 4) instance graphs
    let (instance_graphs, labels) =
        InstanceGraphBuilder::new(tokenizer.as_ref(), &vocabulary).build_all(&docs, &labels)?;
    sw.lap(Phase::InstanceGraphs);

    // 5) corpus graph
    let stats = CorpusStatistics::new(config.stats.clone());
    let corpus_graph =
        CorpusGraphBuilder::new(&stats, CorpusGraphOptions::from(config)).build(&vocabulary, &labels)?;
    sw.lap(Phase::CorpusGraph);

    info!(
        words = vocabulary.len(),
        documents = vocabulary.document_count(),
        nodes = corpus_graph.node_count(),
        edges = corpus_graph.edge_count(),
        "Built dataset"
    );

    Ok(PreparedDataset {
        vocabulary,
        dataset: GraphDataset {
            corpus_graph,
            instance_graphs,
            labels,
        },
        input,
        texts,
    })
}

/// Parser output when every record carries it, the hashing tokenizer when none does.
///
/// # Errors
/// [`GraphPrepError::Tokenizer`] for a corpus where only some records are parsed;
/// mixing both sources would put two embedding spaces in one vocabulary.
fn select_tokenizer(corpus: &Corpus, config: &PrepConfig) -> GraphPrepResult<Box<dyn Tokenizer>> {
    let parsed = corpus.parsed_count();
    if parsed > 0 && parsed < corpus.len() {
        return Err(GraphPrepError::Tokenizer(format!(
            "{parsed} of {} records carry parsed tokens; parse all of them or none",
            corpus.len()
        )));
    }
    if corpus.is_preparsed() {
        info!("Using pre-parsed tokens");
        return Ok(Box::new(ParsedTokenizer::from_corpus(corpus)?));
    }
    let dim = config.corpus.embedding_dim.unwrap_or(DEFAULT_EMBEDDING_DIM);
    info!(dim, "Using whitespace tokenizer");
    Ok(Box::new(WhitespaceTokenizer::new(dim)))
}

/// Pre-parsed tokens are keyed by the raw text, so only raw corpora are normalized.
fn input_texts(corpus: &Corpus, config: &PrepConfig) -> GraphPrepResult<Vec<String>> {
    if config.text.normalize && !corpus.is_preparsed() {
        let normalizer = TextNormalizer::from_config(&config.text)?;
        Ok(corpus.texts().map(|t| normalizer.process(t)).collect())
    } else {
        Ok(corpus.texts().map(str::to_owned).collect())
    }
}

fn apply_empty_policy(
    docs: Vec<TokenizedDocument>,
    labels: Vec<Vec<String>>,
    texts: Vec<String>,
    policy: EmptyDocumentPolicy,
) -> (Vec<TokenizedDocument>, Vec<Vec<String>>, Vec<String>, usize) {
    if policy != EmptyDocumentPolicy::Skip {
        return (docs, labels, texts, 0);
    }

    let total = docs.len();
    let mut kept_docs = Vec::with_capacity(total);
    let mut kept_labels = Vec::with_capacity(total);
    let mut kept_texts = Vec::with_capacity(total);
    for (i, ((doc, label), text)) in docs.into_iter().zip(labels).zip(texts).enumerate() {
        if doc.is_empty() {
            warn!(doc = i, "Skipping document with no tokens");
            continue;
        }
        kept_docs.push(doc);
        kept_labels.push(label);
        kept_texts.push(text);
    }
    let skipped = total - kept_docs.len();
    (kept_docs, kept_labels, kept_texts, skipped)
}
