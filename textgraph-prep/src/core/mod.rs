pub mod ids;
pub mod normalize;
pub mod registry;
pub mod summary;
pub mod tokenize;
