//! Dense-covariance terms for the matrix variants of [`Normal`](super::Normal).
//!
//! The covariance is factorised with nalgebra's pivoted LU rather than
//! Cholesky so that every entry of `Σ` takes part in the log-determinant and
//! the quadratic form. The gradient `∂Σ` is then the derivative with respect to each entry
//! independently, which is what an engine holding `Σ` as a plain matrix
//! computes.

use crate::error::{OracleError, OracleResult};
use crate::linalg::{outer, Factorised};
use ndarray::{Array1, Array2};
use std::f64::consts::PI;

fn singular() -> OracleError {
    OracleError::domain("sigma", "covariance matrix is singular")
}

fn factorise(sigma: &Array2<f64>) -> OracleResult<Factorised> {
    Factorised::new(sigma).ok_or_else(singular)
}

/// Textbook multivariate normal log-density, including `-(n/2)·ln 2π`.
pub fn ln_pdf(x: &Array1<f64>, mu: &Array1<f64>, sigma: &Array2<f64>) -> OracleResult<f64> {
    let lu = factorise(sigma)?;
    let resid = x - mu;
    let quad = resid.dot(&lu.solve(&resid).ok_or_else(singular)?);
    let n = x.len() as f64;
    Ok(-0.5 * (n * (2.0 * PI).ln() + lu.ln_abs_det() + quad))
}

/// Partials of the log-density with respect to `x` and `Σ`.
///
/// With `dx = -Σ⁻¹(x-μ)`, returns `(dx, -½(Σ⁻¹ - dx·dxᵗ))`. The partial with
/// respect to `μ` is `-dx`, and is left to the caller since its aggregation
/// depends on whether the mean is broadcast.
pub fn grad(
    x: &Array1<f64>,
    mu: &Array1<f64>,
    sigma: &Array2<f64>,
) -> OracleResult<(Array1<f64>, Array2<f64>)> {
    let inv = factorise(sigma)?.inverse().ok_or_else(singular)?;
    let dx = -inv.dot(&(x - mu));
    let dsigma = (&inv - &outer(&dx, &dx)) * -0.5;
    Ok((dx, dsigma))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use statrs::distribution::{Continuous, Normal as NormalDist};

    #[test]
    fn test_diagonal_covariance_factorises() {
        // A diagonal covariance is a product of independent univariate normals
        let x = array![3.1, -2.3, 1.3];
        let mu = array![-0.3, -2.3, -1.2];
        let sd = array![0.5, 1.03, 2.41];
        let sigma = Array2::from_diag(&sd.mapv(|s| s * s));

        let expected: f64 = (0..3)
            .map(|i| NormalDist::new(mu[i], sd[i]).unwrap().ln_pdf(x[i]))
            .sum();
        assert_relative_eq!(ln_pdf(&x, &mu, &sigma).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_grad_at_mean() {
        // At x = μ the residual vanishes, leaving ∂Σ = -½Σ⁻¹
        let sigma = array![[2.0, 0.0], [0.0, 4.0]];
        let mu = array![1.0, -1.0];
        let (dx, dsigma) = grad(&mu, &mu, &sigma).unwrap();
        assert_relative_eq!(dx[0], 0.0);
        assert_relative_eq!(dx[1], 0.0);
        assert_relative_eq!(dsigma[[0, 0]], -0.25, epsilon = 1e-15);
        assert_relative_eq!(dsigma[[1, 1]], -0.125, epsilon = 1e-15);
        assert_relative_eq!(dsigma[[0, 1]], 0.0);
    }

    #[test]
    fn test_singular_covariance() {
        let sigma = array![[1.0, 1.0], [1.0, 1.0]];
        let x = array![0.0, 0.0];
        assert!(matches!(
            ln_pdf(&x, &x, &sigma),
            Err(OracleError::NumericDomain { param: "sigma", .. })
        ));
    }
}
