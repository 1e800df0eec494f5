//! Sheaf cohomology via the Godement complex.
//!
//! These are thin facades: build the matrix complex once and read homology
//! off it. `H⁰` is torsion-free (it is a kernel inside a free module), so
//! global sections come back as a [`FreeModule`].

use crate::algebra::complex::HomologyGroup;
use crate::algebra::module::FreeModule;
use crate::sheaf::sheaf::Sheaf;
use crate::sheaf_error::SheafSieveError;
use crate::topology::point::PointId;
use std::collections::{BTreeMap, BTreeSet};

impl Sheaf {
    /// Cohomology in every degree of the Godement complex.
    pub fn cohomology(&self) -> Result<BTreeMap<i32, HomologyGroup>, SheafSieveError> {
        Ok(self.godement_cochain_complex()?.homology_all())
    }

    /// Cohomology in a single degree.
    pub fn cohomology_at(&self, degree: i32) -> Result<HomologyGroup, SheafSieveError> {
        Ok(self.godement_cochain_complex()?.homology(degree))
    }

    /// The module of global sections, `H⁰`.
    pub fn global_sections(&self) -> Result<FreeModule, SheafSieveError> {
        Ok(FreeModule::new(self.cohomology_at(0)?.rank()))
    }

    /// Sections over an open (upward-closed) subset of the domain.
    ///
    /// # Errors
    /// `NotUpwardClosed` / `UnknownPoint` from the restriction step.
    pub fn sections(&self, open_set: &BTreeSet<PointId>) -> Result<FreeModule, SheafSieveError> {
        self.restrict_to(open_set)?.global_sections()
    }

    /// Alternating sum of the free cohomology ranks.
    pub fn euler_characteristic(&self) -> Result<i64, SheafSieveError> {
        Ok(self.godement_cochain_complex()?.euler_characteristic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::poset::FinitePoset;

    fn pid(id: u64) -> PointId {
        PointId::new(id).unwrap()
    }

    fn chain(ids: &[u64]) -> FinitePoset {
        let covers = ids.windows(2).map(|w| (pid(w[0]), pid(w[1])));
        FinitePoset::from_covers([], covers).unwrap()
    }

    #[test]
    fn constant_sheaf_on_a_chain_is_contractible() {
        let s = Sheaf::constant(&chain(&[1, 2, 3]), 1);
        let h = s.cohomology().unwrap();
        assert_eq!(h[&0], HomologyGroup::free(1));
        assert!(h[&1].is_trivial());
        assert!(h[&2].is_trivial());
        assert_eq!(s.euler_characteristic().unwrap(), 1);
        assert_eq!(s.global_sections().unwrap().rank(), 1);
    }

    #[test]
    fn antichain_global_sections_are_the_product() {
        let p = FinitePoset::antichain([pid(1), pid(2), pid(3)]);
        let s = Sheaf::constant(&p, 2);
        assert_eq!(s.global_sections().unwrap().rank(), 6);
        assert_eq!(s.euler_characteristic().unwrap(), 6);
    }

    #[test]
    fn sections_over_a_principal_open() {
        let p = chain(&[1, 2, 3]);
        let s = Sheaf::constant(&p, 1);
        let open = p.order_filter([pid(2)]).unwrap();
        assert_eq!(s.sections(&open).unwrap().rank(), 1);
    }

    #[test]
    fn zero_sheaf_has_no_cohomology() {
        let p = chain(&[1, 2]);
        let z = Sheaf::zero(&p);
        assert!(z.cohomology_at(0).unwrap().is_trivial());
        assert_eq!(z.euler_characteristic().unwrap(), 0);
    }
}
