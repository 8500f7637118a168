//! Graph preparation for graph-neural-network text classification.
//!
//! A labelled corpus becomes two kinds of graphs over one shared vocabulary:
//!
//! - an **instance graph** per document: token nodes, parser dependency edges
//!   and self-loops;
//! - one **corpus graph**: word nodes followed by document nodes, connected by
//!   PMI word-word edges, IoU document-document edges (multi-label only),
//!   TF-IDF document→word edges and self-loops.
//!
//! [`run::prepare_graph_data`] wires the whole pipeline; the builders in
//! [`graph`] can be used on their own with any [`core::tokenize::Tokenizer`]
//! and [`stats::StatisticsProvider`].

pub mod config;
pub mod core;
pub mod errors;
pub mod export;
pub mod graph;
pub mod model;
pub mod run;
pub mod stats;
pub mod telemetry;

pub use errors::{GraphPrepError, GraphPrepResult};
pub use run::{build_dataset, prepare_graph_data};
