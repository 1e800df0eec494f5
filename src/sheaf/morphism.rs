//! Morphisms of sheaves on a common poset, and the homset that builds them.
//!
//! A morphism is a family of stalk-wise matrices, one per point, natural with
//! respect to every cover restriction. Construction goes through
//! [`SheafHomset::build`], which checks shapes and naturality up front; a
//! [`SheafMorphism`] in hand is always a valid one.

use crate::algebra::matrix::ZMatrix;
use crate::sheaf::sheaf::Sheaf;
use crate::sheaf_error::SheafSieveError;
use crate::topology::point::PointId;
use std::collections::BTreeMap;
use std::fmt;

/// The set of sheaf morphisms between two sheaves on a common poset.
#[derive(Clone, Debug)]
pub struct SheafHomset {
    source: Sheaf,
    target: Sheaf,
}

impl SheafHomset {
    /// Homset from `source` to `target`.
    ///
    /// # Errors
    /// `SheafMismatch` if the two sheaves live on different posets. The
    /// comparison is by labelled cover data, not up to isomorphism; morphisms
    /// need a shared point vocabulary.
    pub fn new(source: &Sheaf, target: &Sheaf) -> Result<Self, SheafSieveError> {
        if source.poset() != target.poset() {
            return Err(SheafSieveError::SheafMismatch);
        }
        Ok(Self {
            source: source.clone(),
            target: target.clone(),
        })
    }

    /// Source sheaf.
    pub fn source(&self) -> &Sheaf {
        &self.source
    }

    /// Target sheaf.
    pub fn target(&self) -> &Sheaf {
        &self.target
    }

    /// The zero morphism.
    pub fn zero(&self) -> SheafMorphism {
        let components = self
            .source
            .poset()
            .points()
            .map(|p| {
                let rows = self.target.stalk_rank(p).unwrap_or(0);
                let cols = self.source.stalk_rank(p).unwrap_or(0);
                (p, ZMatrix::zeros(rows, cols))
            })
            .collect();
        SheafMorphism {
            source: self.source.clone(),
            target: self.target.clone(),
            components,
        }
    }

    /// Build and validate a morphism from per-point component matrices.
    ///
    /// # Errors
    /// - `MissingComponent` if some poset point has no matrix.
    /// - `ComponentShape` if a matrix is not `rank(target) x rank(source)`.
    /// - `NaturalityViolation` naming the first cover relation where the
    ///   square `target.res ∘ phi != phi ∘ source.res` fails.
    pub fn build(
        &self,
        components: BTreeMap<PointId, ZMatrix>,
    ) -> Result<SheafMorphism, SheafSieveError> {
        for p in self.source.poset().points() {
            let m = components
                .get(&p)
                .ok_or(SheafSieveError::MissingComponent(p))?;
            let rows = self.target.stalk_rank(p)?;
            let cols = self.source.stalk_rank(p)?;
            if m.rows() != rows || m.cols() != cols {
                return Err(SheafSieveError::ComponentShape {
                    point: p,
                    rows,
                    cols,
                    found_rows: m.rows(),
                    found_cols: m.cols(),
                });
            }
        }
        for (x, y) in self.source.poset().cover_relations() {
            let lhs = self.target.cover_restriction(x, y)?.mul(&components[&x])?;
            let rhs = components[&y].mul(&self.source.cover_restriction(x, y)?)?;
            if lhs != rhs {
                return Err(SheafSieveError::NaturalityViolation { src: x, dst: y });
            }
        }
        Ok(SheafMorphism {
            source: self.source.clone(),
            target: self.target.clone(),
            components,
        })
    }
}

/// A validated morphism of sheaves on a common poset.
#[derive(Clone, Debug, PartialEq)]
pub struct SheafMorphism {
    source: Sheaf,
    target: Sheaf,
    components: BTreeMap<PointId, ZMatrix>,
}

impl SheafMorphism {
    /// Source sheaf.
    pub fn source(&self) -> &Sheaf {
        &self.source
    }

    /// Target sheaf.
    pub fn target(&self) -> &Sheaf {
        &self.target
    }

    /// Component matrix at `p`.
    ///
    /// # Errors
    /// `UnknownPoint` if `p` is not in the underlying poset.
    pub fn component(&self, p: PointId) -> Result<&ZMatrix, SheafSieveError> {
        self.components
            .get(&p)
            .ok_or(SheafSieveError::UnknownPoint(p))
    }

    /// `(point, component)` pairs in ascending point order.
    pub fn components(&self) -> impl Iterator<Item = (PointId, &ZMatrix)> {
        self.components.iter().map(|(&p, m)| (p, m))
    }

    /// Composite `other ∘ self` (first `self`, then `other`).
    ///
    /// # Errors
    /// `NonComposableMorphisms` unless `self`'s target equals `other`'s
    /// source.
    pub fn then(&self, other: &SheafMorphism) -> Result<SheafMorphism, SheafSieveError> {
        if self.target != other.source {
            return Err(SheafSieveError::NonComposableMorphisms);
        }
        let mut components = BTreeMap::new();
        for (&p, m) in &self.components {
            components.insert(p, other.components[&p].mul(m)?);
        }
        Ok(SheafMorphism {
            source: self.source.clone(),
            target: other.target.clone(),
            components,
        })
    }

    /// Whether every component is injective (full column rank over ZZ).
    pub fn is_injective(&self) -> bool {
        self.components.values().all(|m| m.rank() == m.cols())
    }

    /// Whether every component is the zero map.
    pub fn is_zero(&self) -> bool {
        self.components.values().all(ZMatrix::is_zero)
    }
}

impl fmt::Display for SheafMorphism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sheaf morphism on a poset with {} points",
            self.source.poset().len()
        )
    }
}
