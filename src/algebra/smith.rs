//! Smith normal form over the integers.
//!
//! [`smith_invariants`] returns the nonzero invariant factors of an integer
//! matrix: positive, each dividing the next. This is the workhorse behind
//! matrix rank, kernel rank, and the torsion part of homology groups.
//!
//! The algorithm is the classical one: bring the smallest-magnitude nonzero
//! entry of the working submatrix to the pivot position, reduce its row and
//! column with truncated division (swapping a nonzero remainder back into the
//! pivot — the pivot magnitude strictly decreases, so this terminates), and
//! once the cross is clear, repair divisibility by folding an offending row
//! into the pivot row and repeating.

use crate::algebra::matrix::Matrix;
use num_traits::{PrimInt, Signed};

/// Nonzero invariant factors of `m`, positive, in divisibility order.
///
/// The number of invariants is the rank of `m`; the ones exceeding 1 are the
/// torsion invariants of the cokernel.
///
/// # Determinism
/// Pure function of the entries; ties in pivot selection break by scan order.
pub fn smith_invariants<T: PrimInt + Signed>(m: &Matrix<T>) -> Vec<T> {
    let rows = m.rows();
    let cols = m.cols();
    let mut a: Vec<Vec<T>> = (0..rows)
        .map(|i| (0..cols).map(|j| m.get(i, j)).collect())
        .collect();
    let mut invariants = Vec::new();

    let mut t = 0;
    while t < rows.min(cols) {
        let Some((pi, pj)) = find_pivot(&a, t, rows, cols) else {
            break;
        };
        a.swap(t, pi);
        swap_cols(&mut a, t, pj, rows);

        loop {
            let mut dirty = false;
            // Clear column t below the pivot.
            for i in t + 1..rows {
                if a[i][t].is_zero() {
                    continue;
                }
                let q = a[i][t] / a[t][t];
                for j in t..cols {
                    a[i][j] = a[i][j] - q * a[t][j];
                }
                if !a[i][t].is_zero() {
                    // Remainder is smaller than the pivot; promote it.
                    a.swap(i, t);
                    dirty = true;
                }
            }
            // Clear row t right of the pivot.
            for j in t + 1..cols {
                if a[t][j].is_zero() {
                    continue;
                }
                let q = a[t][j] / a[t][t];
                for i in t..rows {
                    a[i][j] = a[i][j] - q * a[i][t];
                }
                if !a[t][j].is_zero() {
                    swap_cols(&mut a, t, j, rows);
                    dirty = true;
                }
            }
            if dirty {
                continue;
            }
            // Cross is clear; enforce that the pivot divides the rest.
            let p = a[t][t];
            let offender = (t + 1..rows)
                .find(|&i| (t + 1..cols).any(|j| !(a[i][j] % p).is_zero()));
            match offender {
                Some(i) => {
                    // Entries of row i left of column t are already zero.
                    for j in t..cols {
                        a[t][j] = a[t][j] + a[i][j];
                    }
                }
                None => break,
            }
        }
        invariants.push(a[t][t].abs());
        t += 1;
    }
    invariants
}

fn find_pivot<T: PrimInt + Signed>(
    a: &[Vec<T>],
    t: usize,
    rows: usize,
    cols: usize,
) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    for i in t..rows {
        for j in t..cols {
            if a[i][j].is_zero() {
                continue;
            }
            match best {
                Some((bi, bj)) if a[bi][bj].abs() <= a[i][j].abs() => {}
                _ => best = Some((i, j)),
            }
        }
    }
    best
}

fn swap_cols<T>(a: &mut [Vec<T>], x: usize, y: usize, rows: usize) {
    if x == y {
        return;
    }
    for row in a.iter_mut().take(rows) {
        row.swap(x, y);
    }
}
