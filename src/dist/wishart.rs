use crate::dist::{check_pos_def, unsupported, AdjLogDensity, GradientBuilder, GradientVector};
use crate::error::{OracleError, OracleResult};
use crate::linalg::{trace_of_product, Factorised};
use crate::shape::{Param, Shape, ShapeVariant};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use statrs::function::gamma::ln_gamma;
use std::f64::consts::{LN_2, PI};

/// The Wishart distribution over positive definite matrices.
///
/// Arguments in order: observation matrix `x`, scale matrix `v`, and degrees
/// of freedom `n`. The reported log-density adds back
/// `(n·d/2)·ln 2 + ln Γ_d(n/2)`, leaving
/// `((n-d-1)/2)·ln|x| - ½·tr(v⁻¹x) - (n/2)·ln|v|`.
///
/// `n` is a fixed constant; the gradient is `[∂x…, ∂v…]`, both flattened
/// row-major and taken with respect to every matrix entry independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wishart {
    pub x: Param,
    pub v: Param,
    pub n: Param,
}

/// Shape variants of [`Wishart`], coded as `(x, v, n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WishartVariant {
    Mms,
}

impl ShapeVariant for WishartVariant {
    const ALL: &'static [Self] = &[WishartVariant::Mms];

    fn shapes(self) -> &'static [Shape] {
        match self {
            WishartVariant::Mms => &[Shape::Matrix, Shape::Matrix, Shape::Scalar],
        }
    }
}

struct Bound {
    x_mat: Array2<f64>,
    x_inv: Array2<f64>,
    v_inv: Array2<f64>,
    x_ln_det: f64,
    v_ln_det: f64,
    n: f64,
    d: usize,
}

impl Wishart {
    pub fn new(x: impl Into<Param>, v: impl Into<Param>, n: f64) -> Self {
        Wishart {
            x: x.into(),
            v: v.into(),
            n: Param::Scalar(n),
        }
    }

    fn bind(&self) -> OracleResult<Bound> {
        let (x, v, n) = match (&self.x, &self.v, &self.n) {
            (Param::Matrix(x), Param::Matrix(v), Param::Scalar(n)) => (x, v, *n),
            _ => return Err(unsupported(Self::NAME, &self.shapes())),
        };

        let d = x.nrows();
        check_pos_def("x", x, d)?;
        check_pos_def("v", v, d)?;
        if !(n > (d as f64) - 1.0) {
            return Err(OracleError::domain(
                "n",
                format!("{} degrees of freedom with dimension {}", n, d),
            ));
        }

        let x_lu = factorise("x", x)?;
        let v_lu = factorise("v", v)?;
        Ok(Bound {
            x_mat: x.clone(),
            x_inv: x_lu.inverse().ok_or_else(|| singular("x"))?,
            v_inv: v_lu.inverse().ok_or_else(|| singular("v"))?,
            x_ln_det: x_lu.ln_abs_det(),
            v_ln_det: v_lu.ln_abs_det(),
            n,
            d,
        })
    }
}

fn singular(param: &'static str) -> OracleError {
    OracleError::domain(param, "matrix is singular")
}

fn factorise(param: &'static str, m: &Array2<f64>) -> OracleResult<Factorised> {
    Factorised::new(m).ok_or_else(|| singular(param))
}

/// Log of the multivariate gamma function `Γ_d(a)`.
pub fn ln_multivariate_gamma(a: f64, d: usize) -> f64 {
    let df = d as f64;
    let mut res = df * (df - 1.0) / 4.0 * PI.ln();
    for j in 1..=d {
        res += ln_gamma(a + (1.0 - j as f64) / 2.0);
    }
    res
}

/// Textbook Wishart log-density.
fn ln_pdf(b: &Bound) -> f64 {
    let (n, d) = (b.n, b.d as f64);
    0.5 * (n - d - 1.0) * b.x_ln_det
        - 0.5 * trace_of_product(&b.v_inv, &b.x_mat)
        - 0.5 * n * d * LN_2
        - 0.5 * n * b.v_ln_det
        - ln_multivariate_gamma(0.5 * n, b.d)
}

impl AdjLogDensity for Wishart {
    type Variant = WishartVariant;
    const NAME: &'static str = "wishart";

    fn shapes(&self) -> Vec<Shape> {
        vec![self.x.shape(), self.v.shape(), self.n.shape()]
    }

    fn feval(&self) -> OracleResult<f64> {
        let b = self.bind()?;
        let correction = 0.5 * b.n * b.d as f64 * LN_2 + ln_multivariate_gamma(0.5 * b.n, b.d);
        Ok(ln_pdf(&b) + correction)
    }

    fn beval(&self) -> OracleResult<GradientVector> {
        let b = self.bind()?;
        let (n, d) = (b.n, b.d as f64);
        let d_x = (&b.x_inv * (n - d - 1.0) - &b.v_inv) * 0.5;
        let d_v = (b.v_inv.dot(&b.x_mat).dot(&b.v_inv) - &b.v_inv * n) * 0.5;
        Ok(GradientBuilder::new().matrix(&d_x).matrix(&d_v).build())
    }
}
