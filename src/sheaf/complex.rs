//! Bounded-below complexes of sheaves on a single poset.
//!
//! Terms and differentials are stored sparsely; an absent degree is the zero
//! sheaf and an absent differential is the zero morphism. As with the matrix
//! complexes, construction rejects anything whose adjacent differentials do
//! not compose to zero.

use crate::sheaf::morphism::{SheafHomset, SheafMorphism};
use crate::sheaf::sheaf::Sheaf;
use crate::sheaf_error::SheafSieveError;
use crate::topology::poset::FinitePoset;
use std::collections::BTreeMap;

/// A complex of sheaves on one poset, graded over `i32` degrees.
#[derive(Clone, Debug)]
pub struct SheafComplex {
    poset: FinitePoset,
    zero: Sheaf,
    sheaves: BTreeMap<i32, Sheaf>,
    diffs: BTreeMap<i32, SheafMorphism>,
}

impl SheafComplex {
    /// Build and validate a complex of sheaves.
    ///
    /// # Errors
    /// - `SheafMismatch` if some term lives on a different poset.
    /// - `DifferentialMismatch` if a differential at degree `k` does not map
    ///   the degree-`k` term to the degree-`k+1` term.
    /// - `DifferentialSquareNonzero` if adjacent differentials fail to
    ///   compose to zero.
    pub fn new(
        poset: &FinitePoset,
        sheaves: BTreeMap<i32, Sheaf>,
        diffs: BTreeMap<i32, SheafMorphism>,
    ) -> Result<Self, SheafSieveError> {
        for sheaf in sheaves.values() {
            if sheaf.poset() != poset {
                return Err(SheafSieveError::SheafMismatch);
            }
        }
        let zero = Sheaf::zero(poset);
        let term_at = |k: i32| sheaves.get(&k).unwrap_or(&zero);
        for (&k, d) in &diffs {
            if d.source() != term_at(k) || d.target() != term_at(k + 1) {
                return Err(SheafSieveError::DifferentialMismatch { degree: k });
            }
        }
        for (&k, d) in &diffs {
            if let Some(next) = diffs.get(&(k + 1)) {
                if !d.then(next)?.is_zero() {
                    return Err(SheafSieveError::DifferentialSquareNonzero {
                        lower: k,
                        lower_plus_one: k + 1,
                    });
                }
            }
        }
        Ok(Self {
            poset: poset.clone(),
            zero,
            sheaves,
            diffs,
        })
    }

    /// The common domain poset.
    pub fn poset(&self) -> &FinitePoset {
        &self.poset
    }

    /// Smallest degree with an explicitly stored term, if any.
    pub fn lower_bound(&self) -> Option<i32> {
        self.sheaves.keys().next().copied()
    }

    /// Degrees with explicitly stored terms, ascending.
    pub fn degrees(&self) -> impl Iterator<Item = i32> + '_ {
        self.sheaves.keys().copied()
    }

    /// The term at `degree`; the zero sheaf when absent.
    pub fn sheaf_at(&self, degree: i32) -> &Sheaf {
        self.sheaves.get(&degree).unwrap_or(&self.zero)
    }

    /// The differential out of `degree`; the zero morphism when absent.
    ///
    /// # Errors
    /// Propagates homset construction failures (unreachable for a validated
    /// complex, where all terms share one poset).
    pub fn differential_at(&self, degree: i32) -> Result<SheafMorphism, SheafSieveError> {
        if let Some(d) = self.diffs.get(&degree) {
            return Ok(d.clone());
        }
        Ok(SheafHomset::new(self.sheaf_at(degree), self.sheaf_at(degree + 1))?.zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::matrix::ZMatrix;
    use crate::topology::point::PointId;

    fn pid(id: u64) -> PointId {
        PointId::new(id).unwrap()
    }

    fn chain2() -> FinitePoset {
        FinitePoset::from_covers([], [(pid(1), pid(2))]).unwrap()
    }

    #[test]
    fn empty_complex() {
        let p = chain2();
        let c = SheafComplex::new(&p, BTreeMap::new(), BTreeMap::new()).unwrap();
        assert_eq!(c.lower_bound(), None);
        assert_eq!(c.sheaf_at(0).total_rank(), 0);
        assert!(c.differential_at(0).unwrap().is_zero());
    }

    #[test]
    fn two_term_complex_with_zero_differential() {
        let p = chain2();
        let s = Sheaf::constant(&p, 1);
        let sheaves = BTreeMap::from([(-1, s.clone()), (0, s.clone())]);
        let d = SheafHomset::new(&s, &s).unwrap().zero();
        let c = SheafComplex::new(&p, sheaves, BTreeMap::from([(-1, d)])).unwrap();
        assert_eq!(c.lower_bound(), Some(-1));
        assert_eq!(c.sheaf_at(-1).total_rank(), 2);
        assert!(c.differential_at(-1).unwrap().is_zero());
    }

    #[test]
    fn misplaced_differential_rejected() {
        let p = chain2();
        let s = Sheaf::constant(&p, 1);
        let sheaves = BTreeMap::from([(0, s.clone())]);
        // Differential at degree 5 must map zero -> zero; this one does not.
        let d = SheafHomset::new(&s, &s).unwrap().zero();
        let e = SheafComplex::new(&p, sheaves, BTreeMap::from([(5, d)])).unwrap_err();
        assert_eq!(e, SheafSieveError::DifferentialMismatch { degree: 5 });
    }

    #[test]
    fn nonzero_square_rejected() {
        let p = chain2();
        let s = Sheaf::constant(&p, 1);
        let sheaves = BTreeMap::from([(0, s.clone()), (1, s.clone()), (2, s.clone())]);
        let hom = SheafHomset::new(&s, &s).unwrap();
        let id = hom
            .build(
                p.points()
                    .map(|q| (q, ZMatrix::identity(1)))
                    .collect(),
            )
            .unwrap();
        let e = SheafComplex::new(
            &p,
            sheaves,
            BTreeMap::from([(0, id.clone()), (1, id)]),
        )
        .unwrap_err();
        assert_eq!(
            e,
            SheafSieveError::DifferentialSquareNonzero {
                lower: 0,
                lower_plus_one: 1
            }
        );
    }

    #[test]
    fn foreign_poset_term_rejected() {
        let p = chain2();
        let q = FinitePoset::antichain([pid(1), pid(2)]);
        let sheaves = BTreeMap::from([(0, Sheaf::constant(&q, 1))]);
        let e = SheafComplex::new(&p, sheaves, BTreeMap::new()).unwrap_err();
        assert_eq!(e, SheafSieveError::SheafMismatch);
    }
}
