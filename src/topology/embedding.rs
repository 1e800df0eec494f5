//! Order embeddings between finite posets.
//!
//! A [`PosetEmbedding`] is an injective map that both preserves and reflects
//! the order; it is validated once at construction and immutable afterwards,
//! so consumers (extension by zero, in particular) never re-check it.

use crate::sheaf_error::SheafSieveError;
use crate::topology::point::PointId;
use crate::topology::poset::FinitePoset;
use std::collections::{BTreeMap, BTreeSet};

/// An injective, order-preserving and order-reflecting map of posets.
#[derive(Clone, Debug)]
pub struct PosetEmbedding {
    codomain: FinitePoset,
    map: BTreeMap<PointId, PointId>,
    inverse: BTreeMap<PointId, PointId>,
}

impl PosetEmbedding {
    /// Validate `map` as an order embedding of `domain` into `codomain`.
    ///
    /// # Errors
    /// `NotAnEmbedding` if some domain point is unmapped, the map is not
    /// injective, an image point is missing from the codomain, or the map
    /// fails to preserve and reflect strict comparability on any pair.
    pub fn new(
        domain: &FinitePoset,
        codomain: FinitePoset,
        map: BTreeMap<PointId, PointId>,
    ) -> Result<Self, SheafSieveError> {
        let mut inverse = BTreeMap::new();
        for p in domain.points() {
            let &q = map.get(&p).ok_or(SheafSieveError::NotAnEmbedding)?;
            if !codomain.contains(q) || inverse.insert(q, p).is_some() {
                return Err(SheafSieveError::NotAnEmbedding);
            }
        }
        for a in domain.points() {
            for b in domain.points() {
                if domain.is_less_than(a, b) != codomain.is_less_than(map[&a], map[&b]) {
                    return Err(SheafSieveError::NotAnEmbedding);
                }
            }
        }
        Ok(Self {
            codomain,
            map,
            inverse,
        })
    }

    /// Image of domain point `p`.
    pub fn apply(&self, p: PointId) -> Result<PointId, SheafSieveError> {
        self.map
            .get(&p)
            .copied()
            .ok_or(SheafSieveError::UnknownPoint(p))
    }

    /// Preimage of codomain point `q`, if it lies in the image.
    pub fn preimage(&self, q: PointId) -> Option<PointId> {
        self.inverse.get(&q).copied()
    }

    /// The set of image points.
    pub fn image(&self) -> BTreeSet<PointId> {
        self.inverse.keys().copied().collect()
    }

    /// The codomain poset.
    pub fn codomain(&self) -> &FinitePoset {
        &self.codomain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(id: u64) -> PointId {
        PointId::new(id).unwrap()
    }

    fn chain(ids: &[u64]) -> FinitePoset {
        let covers = ids.windows(2).map(|w| (pid(w[0]), pid(w[1])));
        FinitePoset::from_covers([], covers).unwrap()
    }

    #[test]
    fn valid_embedding() {
        let dom = chain(&[1, 2]);
        let cod = chain(&[10, 20, 30]);
        let map = BTreeMap::from([(pid(1), pid(20)), (pid(2), pid(30))]);
        let emb = PosetEmbedding::new(&dom, cod, map).unwrap();
        assert_eq!(emb.apply(pid(1)).unwrap(), pid(20));
        assert_eq!(emb.preimage(pid(30)), Some(pid(2)));
        assert_eq!(emb.image(), BTreeSet::from([pid(20), pid(30)]));
    }

    #[test]
    fn non_injective_rejected() {
        let dom = FinitePoset::antichain([pid(1), pid(2)]);
        let cod = chain(&[10, 20]);
        let map = BTreeMap::from([(pid(1), pid(10)), (pid(2), pid(10))]);
        assert_eq!(
            PosetEmbedding::new(&dom, cod, map).unwrap_err(),
            SheafSieveError::NotAnEmbedding
        );
    }

    #[test]
    fn order_not_reflected_rejected() {
        // Domain is an antichain, image points are comparable.
        let dom = FinitePoset::antichain([pid(1), pid(2)]);
        let cod = chain(&[10, 20]);
        let map = BTreeMap::from([(pid(1), pid(10)), (pid(2), pid(20))]);
        assert_eq!(
            PosetEmbedding::new(&dom, cod, map).unwrap_err(),
            SheafSieveError::NotAnEmbedding
        );
    }

    #[test]
    fn order_not_preserved_rejected() {
        let dom = chain(&[1, 2]);
        let cod = FinitePoset::antichain([pid(10), pid(20)]);
        let map = BTreeMap::from([(pid(1), pid(10)), (pid(2), pid(20))]);
        assert_eq!(
            PosetEmbedding::new(&dom, cod, map).unwrap_err(),
            SheafSieveError::NotAnEmbedding
        );
    }
}
