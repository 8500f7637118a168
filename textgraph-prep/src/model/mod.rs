pub mod corpus;
pub mod graph;
pub mod node;
pub mod token;
