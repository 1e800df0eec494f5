//! The discrete Godement resolution: its degree-0 sheaf with the unit
//! morphism, and the full complex of global sections as matrices.
//!
//! Degree `d` of the complex is indexed by the chains of `d + 1` points in
//! lexicographic order; a chain contributes the stalk rank at its maximal
//! point. The differential towards a chain `S` sums, over each deleted index
//! `i`, a signed block `(-1)^i`: an identity block when the deleted point is
//! not the maximum, and the restriction from the new maximum to `max(S)` when
//! it is. The complex constructor re-checks `d ∘ d = 0`, so a sheaf that got
//! through validation cannot produce a broken complex here.

use crate::algebra::complex::CochainComplex;
use crate::algebra::matrix::ZMatrix;
use crate::sheaf::morphism::{SheafHomset, SheafMorphism};
use crate::sheaf::restriction::{RestrictionSpec, RestrictionTable};
use crate::sheaf::sheaf::Sheaf;
use crate::sheaf_error::SheafSieveError;
use crate::topology::point::PointId;
use std::collections::BTreeMap;

/// Column/row layout for one graded degree: each chain's offset and width.
struct ChainLayout {
    offsets: BTreeMap<Vec<PointId>, (usize, usize)>,
    total: usize,
}

impl ChainLayout {
    fn new(sheaf: &Sheaf, chains: &[Vec<PointId>]) -> Result<Self, SheafSieveError> {
        let mut offsets = BTreeMap::new();
        let mut total = 0;
        for chain in chains {
            let max = *chain.last().expect("chains are non-empty");
            let width = sheaf.stalk_rank(max)?;
            offsets.insert(chain.clone(), (total, width));
            total += width;
        }
        Ok(Self { offsets, total })
    }
}

impl Sheaf {
    /// The degree-0 Godement sheaf `G⁰` together with the unit `ε: F → G⁰`.
    ///
    /// The stalk of `G⁰` at `p` is the product of the stalks of `F` over the
    /// open set generated by `p`; cover restrictions forget the components
    /// that leave the open set. `ε` stacks the restrictions of `F` into every
    /// point of that open set and is injective (its block at `p` itself is
    /// the identity). The unit is built through the validating homset, so its
    /// naturality is verified rather than assumed.
    pub fn godement_sheaf(&self) -> Result<(Sheaf, SheafMorphism), SheafSieveError> {
        let poset = self.poset();
        let mut filters: BTreeMap<PointId, Vec<PointId>> = BTreeMap::new();
        let mut stalks = BTreeMap::new();
        for p in poset.points() {
            let filter: Vec<PointId> = poset.order_filter([p])?.into_iter().collect();
            let mut rank = 0;
            for &q in &filter {
                rank += self.stalk_rank(q)?;
            }
            stalks.insert(p, rank);
            filters.insert(p, filter);
        }

        let offsets_of = |filter: &[PointId]| -> Result<BTreeMap<PointId, (usize, usize)>, SheafSieveError> {
            let mut out = BTreeMap::new();
            let mut at = 0;
            for &q in filter {
                let w = self.stalk_rank(q)?;
                out.insert(q, (at, w));
                at += w;
            }
            Ok(out)
        };

        let mut table = RestrictionTable::default();
        for (x, y) in poset.cover_relations() {
            let src = offsets_of(&filters[&x])?;
            let mut proj = ZMatrix::zeros(stalks[&y], stalks[&x]);
            let mut row = 0;
            for &q in &filters[&y] {
                let (col, w) = src[&q];
                for k in 0..w {
                    proj.set(row + k, col + k, 1);
                }
                row += w;
            }
            table.insert(x, y, RestrictionSpec::Explicit(proj));
        }
        let g0 = Sheaf::from_parts_unchecked(poset.clone(), stalks, table);

        let mut components = BTreeMap::new();
        for p in poset.points() {
            let mut blocks = Vec::new();
            for &q in &filters[&p] {
                let block = if q == p {
                    ZMatrix::identity(self.stalk_rank(p)?)
                } else {
                    self.restriction(p, q)?
                };
                blocks.push(block);
            }
            components.insert(p, ZMatrix::vstack(&blocks)?);
        }
        let unit = SheafHomset::new(self, &g0)?.build(components)?;
        Ok((g0, unit))
    }

    /// The Godement complex of global sections, as a cochain complex of free
    /// ZZ-modules in degrees `0 ..= height - 1`.
    ///
    /// An antichain degenerates to a single degree-0 term whose rank is the
    /// total stalk rank; the empty poset gives the empty complex.
    ///
    /// # Complexity
    /// Proportional to the number of chains of the poset times the stalk
    /// ranks involved.
    pub fn godement_cochain_complex(&self) -> Result<CochainComplex, SheafSieveError> {
        let poset = self.poset();
        let top = poset.height() as usize;

        let mut layouts = Vec::with_capacity(top);
        for d in 0..top {
            layouts.push(ChainLayout::new(self, &poset.chains_of_len(d + 1))?);
        }
        let ranks: BTreeMap<i32, usize> = layouts
            .iter()
            .enumerate()
            .map(|(d, l)| (d as i32, l.total))
            .collect();

        let mut diffs = BTreeMap::new();
        for d in 0..top.saturating_sub(1) {
            let cols = &layouts[d];
            let rows = &layouts[d + 1];
            let mut matrix = ZMatrix::zeros(rows.total, cols.total);
            for (target, &(row, height)) in &rows.offsets {
                for i in 0..target.len() {
                    let mut deleted = target.clone();
                    deleted.remove(i);
                    let &(col, width) = &cols.offsets[&deleted];
                    let sign: i64 = if i % 2 == 0 { 1 } else { -1 };
                    let block = if i + 1 == target.len() {
                        // Deleting the maximum changes the chain's stalk;
                        // restrict from the new maximum up to the old one.
                        self.restriction(deleted[deleted.len() - 1], target[i])?
                            .scaled(sign)
                    } else {
                        ZMatrix::identity(height).scaled(sign)
                    };
                    debug_assert_eq!((block.rows(), block.cols()), (height, width));
                    for r in 0..height {
                        for c in 0..width {
                            matrix.set(row + r, col + c, block[(r, c)]);
                        }
                    }
                }
            }
            diffs.insert(d as i32, matrix);
        }

        CochainComplex::new(ranks, diffs)
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
    fn degree_zero_sheaf_on_chain() {
        let p = chain(&[1, 2, 3]);
        let s = Sheaf::constant(&p, 1);
        let (g0, unit) = s.godement_sheaf().unwrap();
        // Open sets generated by 1, 2, 3 have 3, 2, 1 points.
        assert_eq!(g0.stalk_rank(pid(1)).unwrap(), 3);
        assert_eq!(g0.stalk_rank(pid(2)).unwrap(), 2);
        assert_eq!(g0.stalk_rank(pid(3)).unwrap(), 1);
        assert!(g0.is_valid());
        assert!(unit.is_injective());
        assert_eq!(unit.component(pid(3)).unwrap(), &ZMatrix::identity(1));
    }

    #[test]
    fn complex_ranks_on_chain() {
        let p = chain(&[1, 2, 3]);
        let s = Sheaf::constant(&p, 1);
        let c = s.godement_cochain_complex().unwrap();
        // Chains of 1, 2, 3 points: three points, {12, 13, 23}, {123}.
        assert_eq!(c.rank(0), 3);
        assert_eq!(c.rank(1), 3);
        assert_eq!(c.rank(2), 1);
        assert!(c.homology(0) == crate::algebra::complex::HomologyGroup::free(1));
        assert!(c.homology(1).is_trivial());
        assert!(c.homology(2).is_trivial());
    }

    #[test]
    fn antichain_degenerates() {
        let p = FinitePoset::antichain([pid(1), pid(2), pid(3)]);
        let s = Sheaf::constant(&p, 2);
        let c = s.godement_cochain_complex().unwrap();
        assert_eq!(c.rank(0), 6);
        assert_eq!(c.degrees().count(), 1);
        assert!(c.differential(0).is_none());
    }

    #[test]
    fn empty_poset_gives_empty_complex() {
        let p = FinitePoset::from_covers([], []).unwrap();
        let s = Sheaf::constant(&p, 1);
        let c = s.godement_cochain_complex().unwrap();
        assert_eq!(c.degrees().count(), 0);
    }

    #[test]
    fn diamond_complex_shapes() {
        // a < b, c < d.
        let (a, b, c, d) = (pid(1), pid(2), pid(3), pid(4));
        let p = FinitePoset::from_covers([], [(a, b), (a, c), (b, d), (c, d)]).unwrap();
        let s = Sheaf::constant(&p, 1);
        let cx = s.godement_cochain_complex().unwrap();
        // 4 points; 5 two-point chains; 2 three-point chains.
        assert_eq!(cx.rank(0), 4);
        assert_eq!(cx.rank(1), 5);
        assert_eq!(cx.rank(2), 2);
        assert_eq!(cx.homology(0).rank(), 1);
        assert!(cx.homology(1).is_trivial());
        assert!(cx.homology(2).is_trivial());
    }

    #[test]
    fn unit_naturality_on_diamond() {
        let (a, b, c, d) = (pid(1), pid(2), pid(3), pid(4));
        let p = FinitePoset::from_covers([], [(a, b), (a, c), (b, d), (c, d)]).unwrap();
        let s = Sheaf::constant(&p, 2);
        // Homset::build verifies naturality; reaching Ok is the assertion.
        let (_, unit) = s.godement_sheaf().unwrap();
        assert!(unit.is_injective());
    }
}
