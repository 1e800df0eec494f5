//! Sheaves of free ZZ-modules on finite posets: restriction data, validated
//! sheaves and morphisms, derived operations, the Godement resolution, sheaf
//! complexes, and the dualizing complex.

pub mod cohomology;
pub mod complex;
pub mod dualizing;
pub mod godement;
pub mod morphism;
pub mod ops;
pub mod restriction;
#[allow(clippy::module_inception)]
pub mod sheaf;

pub use complex::SheafComplex;
pub use dualizing::dualizing_complex;
pub use morphism::{SheafHomset, SheafMorphism};
pub use restriction::{RestrictionSpec, RestrictionTable};
pub use sheaf::Sheaf;
