//! Dense linear algebra for the matrix-valued evaluators.
//!
//! Values live in `ndarray` storage; factorisations are delegated to
//! `nalgebra`, whose pivoted LU reads every entry of the input.

use nalgebra::{linalg::LU, DMatrix, DVector, Dyn};
use ndarray::{Array1, Array2};

/// Compute the lower Cholesky factor of a positive definite matrix.
/// Only the lower triangle of `a` is read.
/// Returns None if the matrix is not positive definite.
pub fn cholesky_lower(a: &Array2<f64>) -> Option<Array2<f64>> {
    let n = a.nrows();
    let mut l = Array2::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            if i == j {
                for k in 0..j {
                    sum += l[[j, k]] * l[[j, k]];
                }
                let diag = a[[j, j]] - sum;
                if diag <= 0.0 || !diag.is_finite() {
                    return None;
                }
                l[[j, j]] = diag.sqrt();
            } else {
                for k in 0..j {
                    sum += l[[i, k]] * l[[j, k]];
                }
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    Some(l)
}

pub fn is_positive_definite(a: &Array2<f64>) -> bool {
    a.is_square() && cholesky_lower(a).is_some()
}

/// Copy an `ndarray` matrix into nalgebra's column-major storage.
pub fn to_dmatrix(a: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

pub fn from_dmatrix(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn(m.shape(), |(i, j)| m[(i, j)])
}

/// A square, invertible matrix factorised once with nalgebra's LU.
pub struct Factorised {
    lu: LU<f64, Dyn, Dyn>,
}

impl Factorised {
    /// Returns None if the matrix is not square or is singular.
    pub fn new(a: &Array2<f64>) -> Option<Self> {
        if !a.is_square() {
            return None;
        }
        let lu = to_dmatrix(a).lu();
        lu.is_invertible().then_some(Factorised { lu })
    }

    /// Solve `A·x = b`.
    pub fn solve(&self, b: &Array1<f64>) -> Option<Array1<f64>> {
        let rhs = DVector::from_iterator(b.len(), b.iter().copied());
        self.lu
            .solve(&rhs)
            .map(|x| Array1::from_iter(x.iter().copied()))
    }

    pub fn inverse(&self) -> Option<Array2<f64>> {
        self.lu.try_inverse().map(|inv| from_dmatrix(&inv))
    }

    /// `ln|det A|`.
    pub fn ln_abs_det(&self) -> f64 {
        self.lu.determinant().abs().ln()
    }
}

/// `a·bᵗ`.
pub fn outer(a: &Array1<f64>, b: &Array1<f64>) -> Array2<f64> {
    Array2::from_shape_fn((a.len(), b.len()), |(i, j)| a[i] * b[j])
}

/// `tr(a·b)` without forming the product.
pub fn trace_of_product(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
    let mut tr = 0.0;
    for i in 0..a.nrows() {
        for k in 0..a.ncols() {
            tr += a[[i, k]] * b[[k, i]];
        }
    }
    tr
}
