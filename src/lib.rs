//! sheaf-sieve: finite locally free sheaves of modules on finite posets.
//!
//! A sheaf here is a finite poset together with a free ZZ-module of finite
//! rank at every point and a restriction matrix along every cover relation,
//! functorial along chains. On top of that the crate provides:
//!
//! - validated construction of sheaves and sheaf morphisms, with every
//!   axiom (cover structure, functoriality, naturality) checked up front;
//! - derived operations: restriction to an open set, extension by zero along
//!   an order embedding, pushforward of skyscrapers, direct sums;
//! - the discrete Godement resolution, sheaf cohomology with torsion (via
//!   integer Smith normal form), and Euler characteristics;
//! - bounded-below complexes of sheaves and the dualizing complex of a poset.
//!
//! Points are strong ids ([`topology::PointId`], non-zero `u64`); posets are
//! immutable once built and cache their chain enumeration. All fallible
//! operations return [`SheafSieveError`].
//!
//! ```
//! use sheaf_sieve::prelude::*;
//!
//! # fn main() -> Result<(), SheafSieveError> {
//! let a = PointId::new(1)?;
//! let b = PointId::new(2)?;
//! let c = PointId::new(3)?;
//! let poset = FinitePoset::from_covers([], [(a, b), (a, c)])?;
//! let sheaf = Sheaf::constant(&poset, 2);
//! assert_eq!(sheaf.global_sections()?.rank(), 2);
//! assert_eq!(sheaf.euler_characteristic()?, 2);
//! # Ok(())
//! # }
//! ```

pub mod algebra;
pub mod sheaf;
pub mod sheaf_error;
pub mod topology;

pub use sheaf_error::SheafSieveError;

/// Convenient re-exports of the types most callers need.
pub mod prelude {
    pub use crate::algebra::{
        CochainComplex, FreeModule, HomologyGroup, Matrix, ZMatrix, smith_invariants,
    };
    pub use crate::sheaf::{
        RestrictionSpec, RestrictionTable, Sheaf, SheafComplex, SheafHomset, SheafMorphism,
        dualizing_complex,
    };
    pub use crate::sheaf_error::SheafSieveError;
    pub use crate::topology::{FinitePoset, PointId, PosetEmbedding};
}
