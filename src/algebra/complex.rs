//! Cochain complexes of free ZZ-modules and their homology.
//!
//! A [`CochainComplex`] is a sparse family `{degree -> rank}` together with
//! differentials `{degree k -> matrix C^k -> C^(k+1)}`. Absent degrees are
//! zero modules and absent differentials are zero maps. Construction verifies
//! shapes **and** that adjacent differentials compose to zero — a complex
//! that is not a complex is rejected outright rather than producing wrong
//! homology later.

use crate::algebra::matrix::ZMatrix;
use crate::algebra::smith::smith_invariants;
use crate::sheaf_error::SheafSieveError;
use std::collections::BTreeMap;
use std::fmt;

/// A finitely generated abelian group `Z^free x Z/t1 x ... x Z/tk`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HomologyGroup {
    free_rank: usize,
    torsion: Vec<u64>,
}

impl HomologyGroup {
    /// The trivial group.
    pub fn trivial() -> Self {
        Self {
            free_rank: 0,
            torsion: Vec::new(),
        }
    }

    /// Free abelian group of the given rank.
    pub fn free(rank: usize) -> Self {
        Self {
            free_rank: rank,
            torsion: Vec::new(),
        }
    }

    /// Rank of the free part.
    #[inline]
    pub fn rank(&self) -> usize {
        self.free_rank
    }

    /// Number of generators, torsion included (the original accessor).
    #[inline]
    pub fn ngens(&self) -> usize {
        self.free_rank + self.torsion.len()
    }

    /// Torsion invariants in divisibility order, each > 1.
    #[inline]
    pub fn torsion(&self) -> &[u64] {
        &self.torsion
    }

    /// Whether the group is zero.
    #[inline]
    pub fn is_trivial(&self) -> bool {
        self.free_rank == 0 && self.torsion.is_empty()
    }
}

impl fmt::Display for HomologyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_trivial() {
            return write!(f, "0");
        }
        let mut parts = Vec::new();
        match self.free_rank {
            0 => {}
            1 => parts.push("Z".to_string()),
            r => parts.push(format!("Z^{r}")),
        }
        for t in &self.torsion {
            parts.push(format!("Z/{t}"));
        }
        write!(f, "{}", parts.join(" x "))
    }
}

/// Cochain complex of free ZZ-modules with sparse degree support.
///
/// # Invariants
/// - Each differential at degree `k` has shape `rank(k+1) x rank(k)`.
/// - `d_{k+1} * d_k = 0` for every adjacent pair.
#[derive(Clone, Debug)]
pub struct CochainComplex {
    ranks: BTreeMap<i32, usize>,
    diffs: BTreeMap<i32, ZMatrix>,
}

impl CochainComplex {
    /// Build and validate a complex.
    ///
    /// # Errors
    /// - `DifferentialMismatch` if a differential's shape disagrees with the
    ///   ranks of the adjacent degrees.
    /// - `DifferentialSquareNonzero` if some adjacent pair fails `d∘d = 0`.
    pub fn new(
        ranks: BTreeMap<i32, usize>,
        diffs: BTreeMap<i32, ZMatrix>,
    ) -> Result<Self, SheafSieveError> {
        let rank_at = |k: i32| ranks.get(&k).copied().unwrap_or(0);
        for (&k, d) in &diffs {
            if d.rows() != rank_at(k + 1) || d.cols() != rank_at(k) {
                return Err(SheafSieveError::DifferentialMismatch { degree: k });
            }
        }
        for (&k, d) in &diffs {
            if let Some(next) = diffs.get(&(k + 1)) {
                if !next.mul(d)?.is_zero() {
                    return Err(SheafSieveError::DifferentialSquareNonzero {
                        lower: k,
                        lower_plus_one: k + 1,
                    });
                }
            }
        }
        Ok(Self { ranks, diffs })
    }

    /// Rank of the module at `degree` (zero when absent).
    #[inline]
    pub fn rank(&self, degree: i32) -> usize {
        self.ranks.get(&degree).copied().unwrap_or(0)
    }

    /// Differential out of `degree`, if explicitly stored.
    #[inline]
    pub fn differential(&self, degree: i32) -> Option<&ZMatrix> {
        self.diffs.get(&degree)
    }

    /// Degrees with explicitly stored modules, ascending.
    pub fn degrees(&self) -> impl Iterator<Item = i32> + '_ {
        self.ranks.keys().copied()
    }

    /// Homology at `degree`: `ker d_k / im d_{k-1}`.
    pub fn homology(&self, degree: i32) -> HomologyGroup {
        let n = self.rank(degree);
        let rank_out = self
            .diffs
            .get(&degree)
            .map(|d| d.rank())
            .unwrap_or(0);
        let kernel = n - rank_out;
        let incoming = self
            .diffs
            .get(&(degree - 1))
            .map(smith_invariants)
            .unwrap_or_default();
        let torsion = incoming
            .iter()
            .map(|&x| x.unsigned_abs())
            .filter(|&x| x > 1)
            .collect();
        HomologyGroup {
            free_rank: kernel - incoming.len(),
            torsion,
        }
    }

    /// Homology at every stored degree.
    pub fn homology_all(&self) -> BTreeMap<i32, HomologyGroup> {
        self.degrees().map(|k| (k, self.homology(k))).collect()
    }

    /// Alternating sum of free homology ranks over all stored degrees.
    pub fn euler_characteristic(&self) -> i64 {
        self.degrees()
            .map(|k| {
                let sign = if k.rem_euclid(2) == 0 { 1 } else { -1 };
                sign * self.homology(k).rank() as i64
            })
            .sum()
    }
}
