//! Free modules of finite rank over the base ring ZZ.
//!
//! Stalks and section spaces are free modules with a fixed ordered basis; all
//! the library ever needs from them is the rank, so this is a thin named
//! wrapper.

use std::fmt;

/// A free ZZ-module of finite rank with a fixed ordered basis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FreeModule {
    rank: usize,
}

impl FreeModule {
    /// Free module of the given rank.
    pub fn new(rank: usize) -> Self {
        Self { rank }
    }

    /// Rank of the module.
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Whether the module is the zero module.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.rank == 0
    }
}

impl fmt::Display for FreeModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rank {
            0 => write!(f, "0"),
            1 => write!(f, "Z"),
            r => write!(f, "Z^{r}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_and_display() {
        assert_eq!(FreeModule::new(3).rank(), 3);
        assert!(FreeModule::new(0).is_zero());
        assert_eq!(format!("{}", FreeModule::new(0)), "0");
        assert_eq!(format!("{}", FreeModule::new(1)), "Z");
        assert_eq!(format!("{}", FreeModule::new(5)), "Z^5");
    }
}
