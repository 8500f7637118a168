//! Graph builders: per-document instance graphs and the corpus graph.

pub mod corpus;
pub mod edges;
pub mod features;
pub mod instance;
pub mod relations;
