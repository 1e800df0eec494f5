//! Restriction maps along cover relations, and their composition along
//! chains.
//!
//! The original inputs allow the sentinels `0` and `1` for the zero and
//! identity maps; these are modelled as a tagged [`RestrictionSpec`] resolved
//! and shape-checked once at sheaf construction, never re-interpreted at use
//! sites. Composition of specs short-circuits through zero without touching
//! matrix arithmetic and elides identities.

use crate::algebra::matrix::ZMatrix;
use crate::sheaf_error::SheafSieveError;
use crate::topology::point::PointId;
use std::collections::BTreeMap;

/// A restriction map along a single cover relation.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RestrictionSpec {
    /// The zero map (any shape).
    Zero,
    /// The identity map; requires equal stalk ranks at both ends.
    Identity,
    /// An explicit matrix of shape `rank(target) x rank(source)`.
    Explicit(ZMatrix),
}

impl RestrictionSpec {
    /// Resolve to a concrete matrix of the given shape.
    ///
    /// Shapes were validated at sheaf construction; `rows == cols` holds
    /// whenever the spec is `Identity`.
    pub fn to_matrix(&self, rows: usize, cols: usize) -> ZMatrix {
        match self {
            RestrictionSpec::Zero => ZMatrix::zeros(rows, cols),
            RestrictionSpec::Identity => ZMatrix::identity(rows),
            RestrictionSpec::Explicit(m) => m.clone(),
        }
    }

    /// Whether this is the zero map.
    pub fn is_zero(&self) -> bool {
        match self {
            RestrictionSpec::Zero => true,
            RestrictionSpec::Identity => false,
            RestrictionSpec::Explicit(m) => m.is_zero(),
        }
    }

    /// Composite `later ∘ earlier`.
    ///
    /// Zero absorbs without matrix arithmetic; identities elide.
    pub fn compose(
        later: &RestrictionSpec,
        earlier: &RestrictionSpec,
    ) -> Result<RestrictionSpec, SheafSieveError> {
        use RestrictionSpec::*;
        Ok(match (later, earlier) {
            (Zero, _) | (_, Zero) => Zero,
            (Identity, f) => f.clone(),
            (f, Identity) => f.clone(),
            (Explicit(a), Explicit(b)) => Explicit(a.mul(b)?),
        })
    }
}

/// Restriction specs keyed by cover relation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestrictionTable {
    map: BTreeMap<(PointId, PointId), RestrictionSpec>,
}

impl RestrictionTable {
    /// Wrap a keyed spec map. Shape validation happens at sheaf construction.
    pub fn from_specs(map: BTreeMap<(PointId, PointId), RestrictionSpec>) -> Self {
        Self { map }
    }

    /// Spec for the cover relation `(x, y)`.
    ///
    /// # Errors
    /// `MissingCoverRestriction` if no spec was registered for `(x, y)`.
    pub fn spec(&self, x: PointId, y: PointId) -> Result<&RestrictionSpec, SheafSieveError> {
        self.map
            .get(&(x, y))
            .ok_or(SheafSieveError::MissingCoverRestriction(x, y))
    }

    /// Register a spec for a cover relation.
    pub fn insert(&mut self, x: PointId, y: PointId, spec: RestrictionSpec) {
        self.map.insert((x, y), spec);
    }

    /// All `(cover relation, spec)` entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&(PointId, PointId), &RestrictionSpec)> {
        self.map.iter()
    }

    /// Compose the specs along a saturated chain, left to right.
    ///
    /// # Errors
    /// `MissingCoverRestriction` if some consecutive pair has no spec;
    /// matrix shape errors propagate from explicit-by-explicit products.
    pub fn compose_path(&self, path: &[PointId]) -> Result<RestrictionSpec, SheafSieveError> {
        debug_assert!(path.len() >= 2, "composition needs at least one cover");
        let mut acc = self.spec(path[0], path[1])?.clone();
        for pair in path[1..].windows(2) {
            if acc.is_zero() {
                // Anything after a zero map stays zero.
                return Ok(RestrictionSpec::Zero);
            }
            let step = self.spec(pair[0], pair[1])?;
            acc = RestrictionSpec::compose(step, &acc)?;
        }
        Ok(acc)
    }
}
