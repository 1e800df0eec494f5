//! Exact linear algebra over ZZ: dense matrices, Smith normal form, free
//! modules, and cochain complexes with homology.

pub mod complex;
pub mod matrix;
pub mod module;
pub mod smith;

pub use complex::{CochainComplex, HomologyGroup};
pub use matrix::{Matrix, ZMatrix};
pub use module::FreeModule;
pub use smith::smith_invariants;
