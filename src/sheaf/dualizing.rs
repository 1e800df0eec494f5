//! The dualizing complex of a finite poset with free coefficients.
//!
//! Degrees run from `-(height - 1)` up to `0`. The term at degree `-p` is the
//! direct sum, over the chains of `p + 1` points in lexicographic order, of
//! the pushforward of a rank-`r` skyscraper along the inclusion of the
//! chain's maximal point. Each summand is supported on the order ideal of
//! that maximum, so the stalk at a point `x` collects the chains whose
//! maximum dominates `x`.
//!
//! The differential deletes one chain point at a time with sign `(-1)^i` and
//! an identity block on the coefficients; a deletion whose result is no
//! longer dominated by `x` simply lands in an absent summand. Differentials
//! go through the validating homset and the complex constructor, so both
//! naturality and `d ∘ d = 0` are checked rather than asserted.

use crate::algebra::matrix::ZMatrix;
use crate::sheaf::complex::SheafComplex;
use crate::sheaf::morphism::SheafHomset;
use crate::sheaf::sheaf::Sheaf;
use crate::sheaf_error::SheafSieveError;
use crate::topology::point::PointId;
use crate::topology::poset::FinitePoset;
use std::collections::BTreeMap;

/// Chains of a fixed length whose maximum dominates `x`, with their block
/// offsets in the stalk at `x`.
fn stalk_layout(
    poset: &FinitePoset,
    chains: &[Vec<PointId>],
    x: PointId,
    rank: usize,
) -> BTreeMap<Vec<PointId>, usize> {
    let mut offsets = BTreeMap::new();
    let mut at = 0;
    for chain in chains {
        let max = *chain.last().expect("chains are non-empty");
        if poset.is_less_equal(x, max) {
            offsets.insert(chain.clone(), at);
            at += rank;
        }
    }
    offsets
}

/// The dualizing complex of `poset` with coefficients of the given rank.
///
/// The empty poset yields the empty complex; an antichain yields the single
/// degree-0 term.
pub fn dualizing_complex(
    poset: &FinitePoset,
    rank: usize,
) -> Result<SheafComplex, SheafSieveError> {
    let top = poset.height() as usize;

    let mut chains_by_len = Vec::with_capacity(top);
    let mut terms = BTreeMap::new();
    for p in 0..top {
        let chains = poset.chains_of_len(p + 1);
        let mut term = Sheaf::zero(poset);
        for chain in &chains {
            let max = *chain.last().expect("chains are non-empty");
            let skyscraper = Sheaf::constant(&FinitePoset::singleton(max), rank);
            term = term.direct_sum(&skyscraper.pushforward(poset, max)?)?;
        }
        terms.insert(-(p as i32), term);
        chains_by_len.push(chains);
    }

    let mut diffs = BTreeMap::new();
    for p in 1..top {
        let source = &terms[&-(p as i32)];
        let target = &terms[&-(p as i32 - 1)];
        let mut components = BTreeMap::new();
        for x in poset.points() {
            let cols = stalk_layout(poset, &chains_by_len[p], x, rank);
            let rows = stalk_layout(poset, &chains_by_len[p - 1], x, rank);
            let mut matrix =
                ZMatrix::zeros(target.stalk_rank(x)?, source.stalk_rank(x)?);
            for (chain, &col) in &cols {
                for i in 0..chain.len() {
                    let mut deleted = chain.clone();
                    deleted.remove(i);
                    // Deleting the maximum can push the summand below x, in
                    // which case it has no block at this stalk.
                    let Some(&row) = rows.get(&deleted) else { continue };
                    let sign: i64 = if i % 2 == 0 { 1 } else { -1 };
                    for k in 0..rank {
                        matrix.set(row + k, col + k, sign);
                    }
                }
            }
            components.insert(x, matrix);
        }
        let d = SheafHomset::new(source, target)?.build(components)?;
        diffs.insert(-(p as i32), d);
    }

    SheafComplex::new(poset, terms, diffs)
}
