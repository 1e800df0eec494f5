//! `PointId`: a strong, zero-cost handle for poset points.
//!
//! Every point of a finite poset is represented by a unique, opaque
//! identifier. `PointId` wraps a nonzero `u64` to enforce at compile- and
//! runtime that 0 is reserved as an invalid or sentinel value.
//!
//! This module provides:
//! - A transparent `PointId` newtype around `NonZeroU64` for memory layout
//!   guarantees.
//! - A fallible constructor and accessors.
//! - Implementations of common traits (`Debug`, `Display`, ordering, hashing,
//!   serde) so `PointId` can be used in maps, sets, and printed easily.

use crate::sheaf_error::SheafSieveError;
use std::{fmt, num::NonZeroU64};

/// Opaque identifier for a poset point.
///
/// # Memory layout
/// This type is `repr(transparent)`, meaning it has the same ABI and
/// alignment as its single field (`NonZeroU64`).
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct PointId(NonZeroU64);

impl PointId {
    /// Creates a new `PointId` from a raw `u64` value.
    ///
    /// # Errors
    /// Returns `Err(InvalidPointId)` if `raw == 0`; 0 is reserved as a
    /// sentinel.
    ///
    /// # Example
    /// ```rust
    /// # fn try_main() -> Result<(), sheaf_sieve::sheaf_error::SheafSieveError> {
    /// use sheaf_sieve::topology::point::PointId;
    /// let p = PointId::new(1)?;
    /// assert_eq!(p.get(), 1);
    /// # Ok(())
    /// # }
    /// ```
    #[inline]
    pub fn new(raw: u64) -> Result<Self, SheafSieveError> {
        NonZeroU64::new(raw)
            .map(PointId)
            .ok_or(SheafSieveError::InvalidPointId)
    }

    /// Returns the inner `u64` value of this `PointId`.
    ///
    /// Cheap, const-time getter. Prefer to work with `PointId` otherwise for
    /// type safety.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

/// Display as `PointId(raw_value)`.
impl fmt::Debug for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PointId").field(&self.get()).finish()
    }
}

/// Prints the numeric ID without any wrapper text.
impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_zero_rejected() {
        assert_eq!(PointId::new(0).unwrap_err(), SheafSieveError::InvalidPointId);
    }

    #[test]
    fn new_and_get() {
        let p = PointId::new(42).unwrap();
        assert_eq!(p.get(), 42);
    }

    #[test]
    fn debug_and_display() {
        let p = PointId::new(7).unwrap();
        assert_eq!(format!("{:?}", p), "PointId(7)");
        assert_eq!(format!("{}", p), "7");
    }

    #[test]
    fn ordering_and_hash() {
        let a = PointId::new(1).unwrap();
        let b = PointId::new(2).unwrap();
        assert!(a < b);
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn max_value() {
        let p = PointId::new(u64::MAX).unwrap();
        assert_eq!(p.get(), u64::MAX);
    }
}

#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let p = PointId::new(123).unwrap();
        let s = serde_json::to_string(&p).unwrap();
        let p2: PointId = serde_json::from_str(&s).unwrap();
        assert_eq!(p2, p);
    }

    #[test]
    fn bincode_roundtrip() {
        let p = PointId::new(456).unwrap();
        let bytes = bincode::serialize(&p).unwrap();
        let p2: PointId = bincode::deserialize(&bytes).unwrap();
        assert_eq!(p2, p);
    }
}
