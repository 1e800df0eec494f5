//! Finite locally free sheaves of ZZ-modules on finite posets.
//!
//! A sheaf assigns a free module (by rank) to every poset point and a
//! restriction map to every cover relation. The validating constructor
//! [`Sheaf::new`] infers the domain poset from the restriction keys, checks
//! an optionally supplied poset for isomorphism, shape-checks every
//! restriction, and runs the functoriality (sheaf-axiom) check before
//! returning. Derived operations always produce new instances; a constructed
//! sheaf never mutates.

use crate::algebra::matrix::ZMatrix;
use crate::algebra::module::FreeModule;
use crate::sheaf::restriction::{RestrictionSpec, RestrictionTable};
use crate::sheaf_error::SheafSieveError;
use crate::topology::point::PointId;
use crate::topology::poset::FinitePoset;
use std::collections::BTreeMap;
use std::fmt;

/// A finite locally free sheaf of ZZ-modules on a finite poset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sheaf {
    poset: FinitePoset,
    stalks: BTreeMap<PointId, usize>,
    restrictions: RestrictionTable,
}

impl Sheaf {
    /// Build and fully validate a sheaf from stalk-and-restriction data.
    ///
    /// The domain poset is inferred from the restriction keys (which must be
    /// genuine cover relations). When `domain_poset` is supplied it is only
    /// compared for isomorphism; internal lookups stay keyed by the data's
    /// own labels.
    ///
    /// # Errors
    /// - `MissingStalk` if a restriction endpoint has no stalk rank.
    /// - Poset construction errors (`CycleDetected`, `NotACoverRelation`,
    ///   `MalformedPosetData`).
    /// - `PosetMismatch` if the supplied poset is not isomorphic.
    /// - `RestrictionShape` / `IdentityRankMismatch` for ill-shaped specs.
    /// - `SheafAxiomViolation` if two maximal-length chains between the same
    ///   pair of points compose to different restrictions.
    pub fn new(
        stalks: BTreeMap<PointId, usize>,
        restrictions: BTreeMap<(PointId, PointId), RestrictionSpec>,
        domain_poset: Option<&FinitePoset>,
    ) -> Result<Self, SheafSieveError> {
        for &(x, y) in restrictions.keys() {
            for p in [x, y] {
                if !stalks.contains_key(&p) {
                    return Err(SheafSieveError::MissingStalk(p));
                }
            }
        }
        let poset = FinitePoset::from_covers(stalks.keys().copied(), restrictions.keys().copied())?;
        if let Some(supplied) = domain_poset {
            if !supplied.is_isomorphic(&poset) {
                return Err(SheafSieveError::PosetMismatch);
            }
        }

        for (&(x, y), spec) in &restrictions {
            let (from_rank, to_rank) = (stalks[&x], stalks[&y]);
            match spec {
                RestrictionSpec::Zero => {}
                RestrictionSpec::Identity => {
                    if from_rank != to_rank {
                        return Err(SheafSieveError::IdentityRankMismatch {
                            src: x,
                            dst: y,
                            from_rank,
                            to_rank,
                        });
                    }
                }
                RestrictionSpec::Explicit(m) => {
                    if m.rows() != to_rank || m.cols() != from_rank {
                        return Err(SheafSieveError::RestrictionShape {
                            src: x,
                            dst: y,
                            rows: to_rank,
                            cols: from_rank,
                            found_rows: m.rows(),
                            found_cols: m.cols(),
                        });
                    }
                }
            }
        }

        let sheaf = Self {
            poset,
            stalks,
            restrictions: RestrictionTable::from_specs(restrictions),
        };
        sheaf.validate()?;
        Ok(sheaf)
    }

    /// Assemble a sheaf from already-validated parts.
    ///
    /// Callers must guarantee that `stalks` covers every poset point, that
    /// `restrictions` covers every cover relation with correctly shaped
    /// specs, and that the data is functorial. Derived operations use this to
    /// avoid re-validating data that is correct by construction.
    pub fn from_parts_unchecked(
        poset: FinitePoset,
        stalks: BTreeMap<PointId, usize>,
        restrictions: RestrictionTable,
    ) -> Self {
        Self {
            poset,
            stalks,
            restrictions,
        }
    }

    /// The zero sheaf on `poset`.
    pub fn zero(poset: &FinitePoset) -> Self {
        let stalks = poset.points().map(|p| (p, 0)).collect();
        let mut table = RestrictionTable::default();
        for (x, y) in poset.cover_relations() {
            table.insert(x, y, RestrictionSpec::Zero);
        }
        Self::from_parts_unchecked(poset.clone(), stalks, table)
    }

    /// The constant sheaf of the given rank: identity restrictions everywhere.
    pub fn constant(poset: &FinitePoset, rank: usize) -> Self {
        let stalks = poset.points().map(|p| (p, rank)).collect();
        let mut table = RestrictionTable::default();
        for (x, y) in poset.cover_relations() {
            table.insert(x, y, RestrictionSpec::Identity);
        }
        Self::from_parts_unchecked(poset.clone(), stalks, table)
    }

    /// The domain poset.
    #[inline]
    pub fn poset(&self) -> &FinitePoset {
        &self.poset
    }

    /// Stalk rank at `p`.
    ///
    /// # Errors
    /// `UnknownPoint` if `p` is not in the domain poset.
    pub fn stalk_rank(&self, p: PointId) -> Result<usize, SheafSieveError> {
        self.stalks
            .get(&p)
            .copied()
            .ok_or(SheafSieveError::UnknownPoint(p))
    }

    /// The stalk at `p` as a free module with a fixed ordered basis.
    pub fn stalk(&self, p: PointId) -> Result<FreeModule, SheafSieveError> {
        Ok(FreeModule::new(self.stalk_rank(p)?))
    }

    /// `(point, stalk rank)` pairs in ascending point order.
    pub fn stalk_ranks(&self) -> impl Iterator<Item = (PointId, usize)> + '_ {
        self.stalks.iter().map(|(&p, &r)| (p, r))
    }

    /// Sum of all stalk ranks.
    pub fn total_rank(&self) -> usize {
        self.stalks.values().sum()
    }

    /// The restriction table (cover-relation specs).
    pub fn restriction_table(&self) -> &RestrictionTable {
        &self.restrictions
    }

    /// Resolved restriction matrix for the cover relation `(x, y)`.
    pub fn cover_restriction(&self, x: PointId, y: PointId) -> Result<ZMatrix, SheafSieveError> {
        let spec = self.restrictions.spec(x, y)?;
        Ok(spec.to_matrix(self.stalk_rank(y)?, self.stalk_rank(x)?))
    }

    /// Restriction map from the stalk at `from` to the stalk at `to`.
    ///
    /// Composes cover restrictions along a maximal-length saturated chain
    /// from `from` to `to`; the tie-break among equally long chains is the
    /// first in the deterministic enumeration order, which is harmless once
    /// the sheaf axiom holds (all of them agree).
    ///
    /// # Errors
    /// `NotComparable` unless `from < to` strictly.
    pub fn restriction(&self, from: PointId, to: PointId) -> Result<ZMatrix, SheafSieveError> {
        if !self.poset.is_less_than(from, to) {
            return Err(SheafSieveError::NotComparable { from, to });
        }
        let paths = self.poset.cover_paths(from, to);
        let longest = paths.iter().map(Vec::len).max().unwrap_or(0);
        let chain = paths
            .iter()
            .find(|c| c.len() == longest)
            .expect("a comparable pair has at least one cover path");
        let spec = self.restrictions.compose_path(chain)?;
        Ok(spec.to_matrix(self.stalk_rank(to)?, self.stalk_rank(from)?))
    }

    /// The authoritative sheaf-axiom check.
    ///
    /// For every strict relation `x < y`, composes the restriction along
    /// *every* maximal-length chain from `x` to `y` and verifies they agree
    /// pairwise.
    ///
    /// # Errors
    /// `SheafAxiomViolation` naming the first disagreeing pair; bookkeeping
    /// errors (missing covers, bad shapes) propagate as-is.
    ///
    /// # Complexity
    /// Proportional to the number of saturated chains of the poset.
    pub fn validate(&self) -> Result<(), SheafSieveError> {
        for (x, y) in self.poset.relations() {
            let paths = self.poset.cover_paths(x, y);
            let longest = paths.iter().map(Vec::len).max().unwrap_or(0);
            let mut reference: Option<ZMatrix> = None;
            let (rows, cols) = (self.stalk_rank(y)?, self.stalk_rank(x)?);
            for chain in paths.iter().filter(|c| c.len() == longest) {
                let composite = self.restrictions.compose_path(chain)?.to_matrix(rows, cols);
                match &reference {
                    None => reference = Some(composite),
                    Some(expected) if *expected == composite => {}
                    Some(_) => {
                        log::warn!(
                            "sheaf axiom fails between {x} and {y}: chain {chain:?} disagrees"
                        );
                        return Err(SheafSieveError::SheafAxiomViolation { from: x, to: y });
                    }
                }
            }
        }
        Ok(())
    }

    /// Whether the stalk/restriction data is functorial.
    pub fn is_valid(&self) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(e) => {
                log::debug!("sheaf validation failed: {e}");
                false
            }
        }
    }
}

impl fmt::Display for Sheaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "locally free sheaf of ZZ-modules on a poset with {} points",
            self.poset.len()
        )
    }
}
