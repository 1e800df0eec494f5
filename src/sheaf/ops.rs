//! Derived sheaf operations: restriction to an open set, extension by zero
//! along an embedding, pushforward from a singleton, and direct sums.
//!
//! Every operation returns a fresh [`Sheaf`] assembled with
//! [`Sheaf::from_parts_unchecked`]; validity is inherited from the inputs
//! because open sets of a poset are upward-closed and therefore preserve all
//! saturated chains between their points.

use crate::algebra::matrix::ZMatrix;
use crate::sheaf::restriction::{RestrictionSpec, RestrictionTable};
use crate::sheaf::sheaf::Sheaf;
use crate::sheaf_error::SheafSieveError;
use crate::topology::embedding::PosetEmbedding;
use crate::topology::point::PointId;
use crate::topology::poset::FinitePoset;
use std::collections::{BTreeMap, BTreeSet};

impl Sheaf {
    /// Restriction of the sheaf to an open (upward-closed) subset of its
    /// domain.
    ///
    /// # Errors
    /// - `UnknownPoint` for a set member outside the domain poset.
    /// - `NotUpwardClosed` if `open_set` is not an order filter.
    pub fn restrict_to(&self, open_set: &BTreeSet<PointId>) -> Result<Sheaf, SheafSieveError> {
        let sub = self.poset().induced_filter(open_set)?;
        let mut stalks = BTreeMap::new();
        for p in sub.points() {
            stalks.insert(p, self.stalk_rank(p)?);
        }
        let mut table = RestrictionTable::default();
        for (x, y) in sub.cover_relations() {
            table.insert(x, y, self.restriction_table().spec(x, y)?.clone());
        }
        Ok(Sheaf::from_parts_unchecked(sub, stalks, table))
    }

    /// Extension by zero along an open embedding: the stalks and restrictions
    /// are carried onto the image, and everything off the image is zero.
    ///
    /// The embedding's domain must be the sheaf's own poset, and its image
    /// must be upward-closed in the codomain.
    ///
    /// # Errors
    /// - `PosetMismatch` if the embedding does not start from this sheaf's
    ///   poset.
    /// - `ImageNotUpwardClosed` if the image is not an order filter of the
    ///   codomain.
    pub fn extend_by_zero(&self, embedding: &PosetEmbedding) -> Result<Sheaf, SheafSieveError> {
        let codomain = embedding.codomain();
        let image = embedding.image();
        for p in self.poset().points() {
            embedding
                .apply(p)
                .map_err(|_| SheafSieveError::PosetMismatch)?;
        }
        if image.len() != self.poset().len() {
            return Err(SheafSieveError::PosetMismatch);
        }
        if codomain.order_filter(image.iter().copied())? != image {
            return Err(SheafSieveError::ImageNotUpwardClosed);
        }

        let mut stalks = BTreeMap::new();
        for q in codomain.points() {
            let rank = match embedding.preimage(q) {
                Some(p) => self.stalk_rank(p)?,
                None => 0,
            };
            stalks.insert(q, rank);
        }
        let mut table = RestrictionTable::default();
        for (x, y) in codomain.cover_relations() {
            let spec = match (embedding.preimage(x), embedding.preimage(y)) {
                // An upward-closed image keeps intervals intact, so covers
                // between image points pull back to covers in the domain.
                (Some(a), Some(b)) => self.restriction_table().spec(a, b)?.clone(),
                _ => RestrictionSpec::Zero,
            };
            table.insert(x, y, spec);
        }
        Ok(Sheaf::from_parts_unchecked(codomain.clone(), stalks, table))
    }

    /// Pushforward along the inclusion of a single point into `target`.
    ///
    /// Only singleton domains are supported; the result has the source's
    /// stalk rank on the order ideal of `image_point` (with identity
    /// restrictions inside it) and zero elsewhere.
    ///
    /// # Errors
    /// - `UnsupportedSheafOperation` for a non-singleton domain.
    /// - `UnknownPoint` if `image_point` is not in `target`.
    pub fn pushforward(
        &self,
        target: &FinitePoset,
        image_point: PointId,
    ) -> Result<Sheaf, SheafSieveError> {
        if self.poset().len() != 1 {
            return Err(SheafSieveError::UnsupportedSheafOperation(
                "pushforward is only implemented for singleton domains",
            ));
        }
        let rank = self.total_rank();
        let ideal = target.order_ideal([image_point])?;
        let stalks = target
            .points()
            .map(|q| (q, if ideal.contains(&q) { rank } else { 0 }))
            .collect();
        let mut table = RestrictionTable::default();
        for (x, y) in target.cover_relations() {
            // An order ideal is downward-closed, so y in the ideal forces x in.
            let spec = if ideal.contains(&y) {
                RestrictionSpec::Identity
            } else {
                RestrictionSpec::Zero
            };
            table.insert(x, y, spec);
        }
        Ok(Sheaf::from_parts_unchecked(target.clone(), stalks, table))
    }

    /// Pointwise direct sum of two sheaves on the same poset.
    ///
    /// Restriction specs combine block-diagonally, keeping the `Zero` and
    /// `Identity` tags whenever both summands carry the same tag.
    ///
    /// # Errors
    /// `SheafMismatch` if the sheaves live on different posets.
    pub fn direct_sum(&self, other: &Sheaf) -> Result<Sheaf, SheafSieveError> {
        if self.poset() != other.poset() {
            return Err(SheafSieveError::SheafMismatch);
        }
        let mut stalks = BTreeMap::new();
        for p in self.poset().points() {
            stalks.insert(p, self.stalk_rank(p)? + other.stalk_rank(p)?);
        }
        let mut table = RestrictionTable::default();
        for (x, y) in self.poset().cover_relations() {
            let lhs = self.restriction_table().spec(x, y)?;
            let rhs = other.restriction_table().spec(x, y)?;
            let spec = match (lhs, rhs) {
                (RestrictionSpec::Zero, RestrictionSpec::Zero) => RestrictionSpec::Zero,
                (RestrictionSpec::Identity, RestrictionSpec::Identity) => {
                    RestrictionSpec::Identity
                }
                _ => {
                    let a = lhs.to_matrix(self.stalk_rank(y)?, self.stalk_rank(x)?);
                    let b = rhs.to_matrix(other.stalk_rank(y)?, other.stalk_rank(x)?);
                    RestrictionSpec::Explicit(ZMatrix::block_diag(&[a, b]))
                }
            };
            table.insert(x, y, spec);
        }
        Ok(Sheaf::from_parts_unchecked(
            self.poset().clone(),
            stalks,
            table,
        ))
    }
}
