use crate::dist::{
    check_all_positive, check_len, check_pos_def, check_positive, multivariate_normal,
    unsupported, AdjLogDensity, GradientBuilder, GradientVector,
};
use crate::error::{OracleError, OracleResult};
use crate::shape::{Param, Shape, ShapeVariant};
use ndarray::{Array1, Array2, Zip};
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, Normal as NormalDist};
use std::f64::consts::PI;

/// The Normal (Gaussian) distribution, univariate or multivariate.
///
/// Arguments in order: observation `x`, mean `mu`, and `sigma`. In the
/// scalar and vector variants `sigma` is the standard deviation; in the
/// matrix variants it is the full covariance matrix. The reported
/// log-density carries `(n/2)·ln 2π`, cancelling the normalising constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normal {
    pub x: Param,
    pub mu: Param,
    pub sigma: Param,
}

/// Shape variants of [`Normal`], coded as `(x, mu, sigma)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalVariant {
    Sss,
    Vss,
    Vvs,
    Vsv,
    Vvv,
    /// Vector observation, broadcast scalar mean, covariance matrix.
    Vsm,
    /// Vector observation, mean vector, covariance matrix.
    Vvm,
}

impl ShapeVariant for NormalVariant {
    const ALL: &'static [Self] = &[
        NormalVariant::Sss,
        NormalVariant::Vss,
        NormalVariant::Vvs,
        NormalVariant::Vsv,
        NormalVariant::Vvv,
        NormalVariant::Vsm,
        NormalVariant::Vvm,
    ];

    fn shapes(self) -> &'static [Shape] {
        use Shape::{Matrix as M, Scalar as S, Vector as V};
        match self {
            NormalVariant::Sss => &[S, S, S],
            NormalVariant::Vss => &[V, S, S],
            NormalVariant::Vvs => &[V, V, S],
            NormalVariant::Vsv => &[V, S, V],
            NormalVariant::Vvv => &[V, V, V],
            NormalVariant::Vsm => &[V, S, M],
            NormalVariant::Vvm => &[V, V, M],
        }
    }
}

enum Bound<'a> {
    Sss {
        x: f64,
        mu: f64,
        sigma: f64,
    },
    Vss {
        x: &'a Array1<f64>,
        mu: f64,
        sigma: f64,
    },
    Vvs {
        x: &'a Array1<f64>,
        mu: &'a Array1<f64>,
        sigma: f64,
    },
    Vsv {
        x: &'a Array1<f64>,
        mu: f64,
        sigma: &'a Array1<f64>,
    },
    Vvv {
        x: &'a Array1<f64>,
        mu: &'a Array1<f64>,
        sigma: &'a Array1<f64>,
    },
    Vsm {
        x: &'a Array1<f64>,
        mu: f64,
        sigma: &'a Array2<f64>,
    },
    Vvm {
        x: &'a Array1<f64>,
        mu: &'a Array1<f64>,
        sigma: &'a Array2<f64>,
    },
}

impl Normal {
    pub fn new(x: impl Into<Param>, mu: impl Into<Param>, sigma: impl Into<Param>) -> Self {
        Normal {
            x: x.into(),
            mu: mu.into(),
            sigma: sigma.into(),
        }
    }

    fn bind(&self) -> OracleResult<Bound<'_>> {
        use Param::{Matrix as M, Scalar as S, Vector as V};
        match (&self.x, &self.mu, &self.sigma) {
            (S(x), S(mu), S(sigma)) => {
                check_positive("sigma", *sigma)?;
                Ok(Bound::Sss {
                    x: *x,
                    mu: *mu,
                    sigma: *sigma,
                })
            }
            (V(x), S(mu), S(sigma)) => {
                check_positive("sigma", *sigma)?;
                Ok(Bound::Vss {
                    x,
                    mu: *mu,
                    sigma: *sigma,
                })
            }
            (V(x), V(mu), S(sigma)) => {
                check_len("mu", mu, x.len())?;
                check_positive("sigma", *sigma)?;
                Ok(Bound::Vvs {
                    x,
                    mu,
                    sigma: *sigma,
                })
            }
            (V(x), S(mu), V(sigma)) => {
                check_len("sigma", sigma, x.len())?;
                check_all_positive("sigma", sigma)?;
                Ok(Bound::Vsv {
                    x,
                    mu: *mu,
                    sigma,
                })
            }
            (V(x), V(mu), V(sigma)) => {
                check_len("mu", mu, x.len())?;
                check_len("sigma", sigma, x.len())?;
                check_all_positive("sigma", sigma)?;
                Ok(Bound::Vvv { x, mu, sigma })
            }
            (V(x), S(mu), M(sigma)) => {
                check_pos_def("sigma", sigma, x.len())?;
                Ok(Bound::Vsm { x, mu: *mu, sigma })
            }
            (V(x), V(mu), M(sigma)) => {
                check_len("mu", mu, x.len())?;
                check_pos_def("sigma", sigma, x.len())?;
                Ok(Bound::Vvm { x, mu, sigma })
            }
            _ => Err(unsupported(Self::NAME, &self.shapes())),
        }
    }
}

fn ln_pdf(x: f64, mu: f64, sigma: f64) -> OracleResult<f64> {
    NormalDist::new(mu, sigma)
        .map(|d| d.ln_pdf(x))
        .map_err(|e| OracleError::domain("sigma", e.to_string()))
}

/// d/dx of one element: `-(x-μ)/σ²`.
fn dx(diff: f64, sigma: f64) -> f64 {
    -diff / (sigma * sigma)
}

/// d/dσ of one element: `(z² - 1)/σ`.
fn dsigma(diff: f64, sigma: f64) -> f64 {
    ((diff / sigma).powi(2) - 1.0) / sigma
}

impl AdjLogDensity for Normal {
    type Variant = NormalVariant;
    const NAME: &'static str = "normal";

    fn shapes(&self) -> Vec<Shape> {
        vec![self.x.shape(), self.mu.shape(), self.sigma.shape()]
    }

    fn feval(&self) -> OracleResult<f64> {
        let log_pdf = match self.bind()? {
            Bound::Sss { x, mu, sigma } => ln_pdf(x, mu, sigma)?,
            Bound::Vss { x, mu, sigma } => x
                .iter()
                .map(|&x_i| ln_pdf(x_i, mu, sigma))
                .sum::<OracleResult<f64>>()?,
            Bound::Vvs { x, mu, sigma } => x
                .iter()
                .zip(mu.iter())
                .map(|(&x_i, &m_i)| ln_pdf(x_i, m_i, sigma))
                .sum::<OracleResult<f64>>()?,
            Bound::Vsv { x, mu, sigma } => x
                .iter()
                .zip(sigma.iter())
                .map(|(&x_i, &s_i)| ln_pdf(x_i, mu, s_i))
                .sum::<OracleResult<f64>>()?,
            Bound::Vvv { x, mu, sigma } => x
                .iter()
                .zip(mu.iter())
                .zip(sigma.iter())
                .map(|((&x_i, &m_i), &s_i)| ln_pdf(x_i, m_i, s_i))
                .sum::<OracleResult<f64>>()?,
            Bound::Vsm { x, mu, sigma } => {
                let mu = Array1::from_elem(x.len(), mu);
                multivariate_normal::ln_pdf(x, &mu, sigma)?
            }
            Bound::Vvm { x, mu, sigma } => multivariate_normal::ln_pdf(x, mu, sigma)?,
        };
        let n = self.x.len() as f64;
        Ok(log_pdf + 0.5 * n * (2.0 * PI).ln())
    }

    fn beval(&self) -> OracleResult<GradientVector> {
        let grad = match self.bind()? {
            Bound::Sss { x, mu, sigma } => {
                let d_x = dx(x - mu, sigma);
                GradientBuilder::new()
                    .scalar(d_x)
                    .scalar(-d_x)
                    .scalar(dsigma(x - mu, sigma))
            }
            Bound::Vss { x, mu, sigma } => {
                let n = x.len() as f64;
                let d_x = x.mapv(|x_i| dx(x_i - mu, sigma));
                let d_mu = x.iter().map(|&x_i| x_i - mu).sum::<f64>() / (sigma * sigma);
                let z_sq: f64 = x.iter().map(|&x_i| ((x_i - mu) / sigma).powi(2)).sum();
                GradientBuilder::new()
                    .vector(&d_x)
                    .scalar(d_mu)
                    .scalar((z_sq - n) / sigma)
            }
            Bound::Vvs { x, mu, sigma } => {
                let n = x.len() as f64;
                let diff = x - mu;
                let d_x = diff.mapv(|d| dx(d, sigma));
                let z_sq: f64 = diff.iter().map(|&d| (d / sigma).powi(2)).sum();
                GradientBuilder::new()
                    .vector(&d_x)
                    .vector(&-&d_x)
                    .scalar((z_sq - n) / sigma)
            }
            Bound::Vsv { x, mu, sigma } => {
                let d_x = Zip::from(x).and(sigma).map_collect(|&x_i, &s_i| dx(x_i - mu, s_i));
                let d_sigma =
                    Zip::from(x).and(sigma).map_collect(|&x_i, &s_i| dsigma(x_i - mu, s_i));
                GradientBuilder::new()
                    .vector(&d_x)
                    .scalar(-d_x.sum())
                    .vector(&d_sigma)
            }
            Bound::Vvv { x, mu, sigma } => {
                let diff = x - mu;
                let d_x = Zip::from(&diff).and(sigma).map_collect(|&d, &s| dx(d, s));
                let d_sigma = Zip::from(&diff).and(sigma).map_collect(|&d, &s| dsigma(d, s));
                GradientBuilder::new()
                    .vector(&d_x)
                    .vector(&-&d_x)
                    .vector(&d_sigma)
            }
            Bound::Vsm { x, mu, sigma } => {
                let mu = Array1::from_elem(x.len(), mu);
                let (d_x, d_sigma) = multivariate_normal::grad(x, &mu, sigma)?;
                GradientBuilder::new()
                    .vector(&d_x)
                    .scalar(-d_x.sum())
                    .matrix(&d_sigma)
            }
            Bound::Vvm { x, mu, sigma } => {
                let (d_x, d_sigma) = multivariate_normal::grad(x, mu, sigma)?;
                GradientBuilder::new()
                    .vector(&d_x)
                    .vector(&-&d_x)
                    .matrix(&d_sigma)
            }
        };
        Ok(grad.build())
    }
}
