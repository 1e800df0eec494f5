//! Dense integer matrices with block assembly.
//!
//! `Matrix<T>` is a flat row-major container over a signed integer scalar,
//! covering exactly the surface the sheaf layer needs: identity/zero
//! construction, shape-checked multiplication, vertical stacking, block and
//! block-diagonal assembly, and rank / right-kernel rank via the Smith normal
//! form. Matrices with zero rows or columns are first-class values; stalks of
//! rank zero produce them routinely.

use crate::algebra::smith::smith_invariants;
use crate::sheaf_error::SheafSieveError;
use num_traits::{PrimInt, Signed};
use std::fmt;

/// Dense row-major matrix over a signed integer scalar.
///
/// # Invariants
/// - `data.len() == rows * cols`.
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

/// Matrices over the base ring ZZ, as used by the sheaf layer.
pub type ZMatrix = Matrix<i64>;

impl<T: PrimInt + Signed> Matrix<T> {
    /// The `rows x cols` zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::zero(); rows * cols],
        }
    }

    /// The `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = T::one();
        }
        m
    }

    /// Build from explicit rows.
    ///
    /// # Errors
    /// `MatrixShapeMismatch` for ragged input.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, SheafSieveError> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(nrows * ncols);
        for row in &rows {
            if row.len() != ncols {
                return Err(SheafSieveError::MatrixShapeMismatch {
                    op: "from_rows",
                    lhs_rows: nrows,
                    lhs_cols: ncols,
                    rhs_rows: 1,
                    rhs_cols: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: nrows,
            cols: ncols,
            data,
        })
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Entry at `(i, j)`.
    ///
    /// # Panics
    /// Panics on out-of-bounds indices.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i * self.cols + j]
    }

    /// Overwrite the entry at `(i, j)`.
    ///
    /// # Panics
    /// Panics on out-of-bounds indices.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i * self.cols + j] = value;
    }

    /// Whether every entry is zero (vacuously true for empty shapes).
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|x| x.is_zero())
    }

    /// Whether this is a square identity matrix.
    pub fn is_identity(&self) -> bool {
        self.rows == self.cols && *self == Self::identity(self.rows)
    }

    /// Matrix product `self * rhs`.
    ///
    /// # Errors
    /// `MatrixShapeMismatch` unless `self.cols == rhs.rows`.
    pub fn mul(&self, rhs: &Self) -> Result<Self, SheafSieveError> {
        if self.cols != rhs.rows {
            return Err(SheafSieveError::MatrixShapeMismatch {
                op: "mul",
                lhs_rows: self.rows,
                lhs_cols: self.cols,
                rhs_rows: rhs.rows,
                rhs_cols: rhs.cols,
            });
        }
        let mut out = Self::zeros(self.rows, rhs.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.get(i, k);
                if a.is_zero() {
                    continue;
                }
                for j in 0..rhs.cols {
                    let cur = out.get(i, j);
                    out.set(i, j, cur + a * rhs.get(k, j));
                }
            }
        }
        Ok(out)
    }

    /// Every entry multiplied by `factor`.
    pub fn scaled(&self, factor: T) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| x * factor).collect(),
        }
    }

    /// Stack blocks vertically.
    ///
    /// # Errors
    /// `MatrixShapeMismatch` unless all blocks share a column count. An empty
    /// slice yields the 0x0 matrix.
    pub fn vstack(blocks: &[Self]) -> Result<Self, SheafSieveError> {
        let cols = blocks.first().map_or(0, Self::cols);
        let mut data = Vec::new();
        let mut rows = 0;
        for b in blocks {
            if b.cols != cols {
                return Err(SheafSieveError::MatrixShapeMismatch {
                    op: "vstack",
                    lhs_rows: rows,
                    lhs_cols: cols,
                    rhs_rows: b.rows,
                    rhs_cols: b.cols,
                });
            }
            rows += b.rows;
            data.extend_from_slice(&b.data);
        }
        Ok(Self { rows, cols, data })
    }

    /// Assemble a matrix from a grid of blocks.
    ///
    /// Row heights are set by each block row's first entry and column widths
    /// by the first block row; every block must match both.
    ///
    /// # Errors
    /// `MatrixShapeMismatch` on any inconsistent block shape, including
    /// ragged grids.
    pub fn block(grid: &[Vec<Self>]) -> Result<Self, SheafSieveError> {
        let ncols_blocks = grid.first().map_or(0, Vec::len);
        let widths: Vec<usize> = grid
            .first()
            .map(|r| r.iter().map(Self::cols).collect())
            .unwrap_or_default();
        let total_cols: usize = widths.iter().sum();
        let mut rows_out: Vec<Self> = Vec::with_capacity(grid.len());
        for block_row in grid {
            if block_row.len() != ncols_blocks {
                return Err(SheafSieveError::MatrixShapeMismatch {
                    op: "block",
                    lhs_rows: grid.len(),
                    lhs_cols: ncols_blocks,
                    rhs_rows: 1,
                    rhs_cols: block_row.len(),
                });
            }
            let height = block_row.first().map_or(0, Self::rows);
            let mut assembled = Self::zeros(height, total_cols);
            let mut col_off = 0;
            for (b, &w) in block_row.iter().zip(&widths) {
                if b.rows != height || b.cols != w {
                    return Err(SheafSieveError::MatrixShapeMismatch {
                        op: "block",
                        lhs_rows: height,
                        lhs_cols: w,
                        rhs_rows: b.rows,
                        rhs_cols: b.cols,
                    });
                }
                for i in 0..b.rows {
                    for j in 0..b.cols {
                        assembled.set(i, col_off + j, b.get(i, j));
                    }
                }
                col_off += w;
            }
            rows_out.push(assembled);
        }
        Self::vstack(&rows_out)
    }

    /// Block-diagonal assembly; off-diagonal blocks are zero.
    pub fn block_diag(blocks: &[Self]) -> Self {
        let rows = blocks.iter().map(Self::rows).sum();
        let cols = blocks.iter().map(Self::cols).sum();
        let mut out = Self::zeros(rows, cols);
        let (mut ro, mut co) = (0, 0);
        for b in blocks {
            for i in 0..b.rows {
                for j in 0..b.cols {
                    out.set(ro + i, co + j, b.get(i, j));
                }
            }
            ro += b.rows;
            co += b.cols;
        }
        out
    }

    /// Rank over the fraction field (number of nonzero Smith invariants).
    pub fn rank(&self) -> usize {
        smith_invariants(self).len()
    }

    /// Dimension of the right null space: `cols - rank`.
    pub fn right_kernel_rank(&self) -> usize {
        self.cols - self.rank()
    }
}

impl<T: fmt::Debug> fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix {}x{} [", self.rows, self.cols)?;
        for i in 0..self.rows {
            write!(f, "  ")?;
            for j in 0..self.cols {
                write!(f, "{:?} ", self.data[i * self.cols + j])?;
            }
            writeln!(f)?;
        }
        write!(f, "]")
    }
}

impl<T: PrimInt + Signed> std::ops::Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.data[i * self.cols + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: Vec<Vec<i64>>) -> ZMatrix {
        ZMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn identity_and_mul() {
        let a = m(vec![vec![1, 2], vec![3, 4]]);
        let i = ZMatrix::identity(2);
        assert_eq!(a.mul(&i).unwrap(), a);
        assert_eq!(i.mul(&a).unwrap(), a);
        let b = m(vec![vec![0, 1], vec![1, 0]]);
        assert_eq!(a.mul(&b).unwrap(), m(vec![vec![2, 1], vec![4, 3]]));
    }

    #[test]
    fn mul_shape_checked() {
        let a = ZMatrix::zeros(2, 3);
        let b = ZMatrix::zeros(2, 3);
        assert!(matches!(
            a.mul(&b),
            Err(SheafSieveError::MatrixShapeMismatch { op: "mul", .. })
        ));
    }

    #[test]
    fn zero_dimension_products() {
        // (2x0) * (0x3) = 2x3 zero matrix
        let a = ZMatrix::zeros(2, 0);
        let b = ZMatrix::zeros(0, 3);
        let p = a.mul(&b).unwrap();
        assert_eq!((p.rows(), p.cols()), (2, 3));
        assert!(p.is_zero());
    }

    #[test]
    fn ragged_rejected() {
        assert!(ZMatrix::from_rows(vec![vec![1, 2], vec![3]]).is_err());
    }

    #[test]
    fn block_assembly() {
        let i = ZMatrix::identity(2);
        let z = ZMatrix::zeros(2, 1);
        let r = m(vec![vec![5, 5], vec![6, 6]]);
        let assembled = ZMatrix::block(&[vec![i.clone(), z.clone()], vec![r, z]]).unwrap();
        assert_eq!((assembled.rows(), assembled.cols()), (4, 3));
        assert_eq!(assembled.get(0, 0), 1);
        assert_eq!(assembled.get(2, 0), 5);
        assert_eq!(assembled.get(3, 1), 6);
        assert_eq!(assembled.get(1, 2), 0);
    }

    #[test]
    fn block_shape_checked() {
        let i = ZMatrix::identity(2);
        let bad = ZMatrix::zeros(1, 1);
        assert!(ZMatrix::block(&[vec![i.clone(), bad]]).is_err());
    }

    #[test]
    fn block_diag_shapes() {
        let d = ZMatrix::block_diag(&[ZMatrix::identity(2), m(vec![vec![3]])]);
        assert_eq!((d.rows(), d.cols()), (3, 3));
        assert_eq!(d.get(2, 2), 3);
        assert_eq!(d.get(0, 2), 0);
        // Zero-rank summands collapse silently.
        let d = ZMatrix::block_diag(&[ZMatrix::zeros(0, 0), ZMatrix::identity(1)]);
        assert_eq!((d.rows(), d.cols()), (1, 1));
    }

    #[test]
    fn vstack_blocks() {
        let s = ZMatrix::vstack(&[ZMatrix::identity(1), m(vec![vec![7]])]).unwrap();
        assert_eq!((s.rows(), s.cols()), (2, 1));
        assert_eq!(s.get(1, 0), 7);
        assert!(ZMatrix::vstack(&[ZMatrix::identity(1), ZMatrix::identity(2)]).is_err());
    }

    #[test]
    fn rank_and_kernel() {
        let a = m(vec![vec![1, 2], vec![2, 4]]);
        assert_eq!(a.rank(), 1);
        assert_eq!(a.right_kernel_rank(), 1);
        assert_eq!(ZMatrix::identity(3).rank(), 3);
        assert_eq!(ZMatrix::zeros(2, 5).rank(), 0);
        assert_eq!(ZMatrix::zeros(2, 5).right_kernel_rank(), 5);
        assert_eq!(ZMatrix::zeros(0, 4).right_kernel_rank(), 4);
    }

    #[test]
    fn scaled_and_predicates() {
        let a = ZMatrix::identity(2).scaled(-1);
        assert_eq!(a.get(0, 0), -1);
        assert!(!a.is_zero());
        assert!(ZMatrix::zeros(3, 2).is_zero());
        assert!(ZMatrix::identity(4).is_identity());
        assert!(!a.is_identity());
    }

    #[test]
    fn serde_roundtrip() {
        let a = m(vec![vec![1, -2], vec![0, 9]]);
        let bytes = bincode::serialize(&a).unwrap();
        let b: ZMatrix = bincode::deserialize(&bytes).unwrap();
        assert_eq!(a, b);
    }
}
