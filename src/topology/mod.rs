//! Poset topology: strong point ids, finite posets from cover relations,
//! and order embeddings.

pub mod embedding;
pub mod point;
pub mod poset;

pub use embedding::PosetEmbedding;
pub use point::PointId;
pub use poset::FinitePoset;
