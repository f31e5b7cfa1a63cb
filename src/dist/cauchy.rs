use crate::dist::{
    check_all_positive, check_len, check_positive, unsupported, AdjLogDensity, GradientBuilder,
    GradientVector,
};
use crate::error::{OracleError, OracleResult};
use crate::shape::{Param, Shape, ShapeVariant};
use ndarray::{Array1, Zip};
use serde::{Deserialize, Serialize};
use statrs::distribution::{Cauchy as CauchyDist, Continuous};
use std::f64::consts::PI;

/// The Cauchy distribution.
///
/// Arguments in order: observation `x`, location `loc`, scale `scale`.
/// The reported log-density carries `ln π` per observation element, which
/// cancels the `1/π` normalising factor of the density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cauchy {
    pub x: Param,
    pub loc: Param,
    pub scale: Param,
}

/// Shape variants of [`Cauchy`], coded as `(x, loc, scale)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CauchyVariant {
    Sss,
    Vss,
    Vsv,
    Vvs,
    Vvv,
}

impl ShapeVariant for CauchyVariant {
    const ALL: &'static [Self] = &[
        CauchyVariant::Sss,
        CauchyVariant::Vss,
        CauchyVariant::Vsv,
        CauchyVariant::Vvs,
        CauchyVariant::Vvv,
    ];

    fn shapes(self) -> &'static [Shape] {
        use Shape::{Scalar as S, Vector as V};
        match self {
            CauchyVariant::Sss => &[S, S, S],
            CauchyVariant::Vss => &[V, S, S],
            CauchyVariant::Vsv => &[V, S, V],
            CauchyVariant::Vvs => &[V, V, S],
            CauchyVariant::Vvv => &[V, V, V],
        }
    }
}

enum Bound<'a> {
    Sss {
        x: f64,
        loc: f64,
        scale: f64,
    },
    Vss {
        x: &'a Array1<f64>,
        loc: f64,
        scale: f64,
    },
    Vsv {
        x: &'a Array1<f64>,
        loc: f64,
        scale: &'a Array1<f64>,
    },
    Vvs {
        x: &'a Array1<f64>,
        loc: &'a Array1<f64>,
        scale: f64,
    },
    Vvv {
        x: &'a Array1<f64>,
        loc: &'a Array1<f64>,
        scale: &'a Array1<f64>,
    },
}

impl Cauchy {
    pub fn new(x: impl Into<Param>, loc: impl Into<Param>, scale: impl Into<Param>) -> Self {
        Cauchy {
            x: x.into(),
            loc: loc.into(),
            scale: scale.into(),
        }
    }

    fn bind(&self) -> OracleResult<Bound<'_>> {
        use Param::{Scalar as S, Vector as V};
        match (&self.x, &self.loc, &self.scale) {
            (S(x), S(loc), S(scale)) => {
                check_positive("scale", *scale)?;
                Ok(Bound::Sss {
                    x: *x,
                    loc: *loc,
                    scale: *scale,
                })
            }
            (V(x), S(loc), S(scale)) => {
                check_positive("scale", *scale)?;
                Ok(Bound::Vss {
                    x,
                    loc: *loc,
                    scale: *scale,
                })
            }
            (V(x), S(loc), V(scale)) => {
                check_len("scale", scale, x.len())?;
                check_all_positive("scale", scale)?;
                Ok(Bound::Vsv {
                    x,
                    loc: *loc,
                    scale,
                })
            }
            (V(x), V(loc), S(scale)) => {
                check_len("loc", loc, x.len())?;
                check_positive("scale", *scale)?;
                Ok(Bound::Vvs {
                    x,
                    loc,
                    scale: *scale,
                })
            }
            (V(x), V(loc), V(scale)) => {
                check_len("loc", loc, x.len())?;
                check_len("scale", scale, x.len())?;
                check_all_positive("scale", scale)?;
                Ok(Bound::Vvv { x, loc, scale })
            }
            _ => Err(unsupported(Self::NAME, &self.shapes())),
        }
    }
}

fn ln_pdf(x: f64, loc: f64, scale: f64) -> OracleResult<f64> {
    CauchyDist::new(loc, scale)
        .map(|d| d.ln_pdf(x))
        .map_err(|e| OracleError::domain("scale", e.to_string()))
}

/// d/dx of the log-density of one element: `-2d / (s² + d²)`.
fn dx(diff: f64, scale: f64) -> f64 {
    -2.0 * diff / (scale * scale + diff * diff)
}

/// d/dscale of the log-density of one element.
fn dscale(diff: f64, scale: f64) -> f64 {
    -(1.0 - (diff / scale).powi(2)) / (scale + diff * diff / scale)
}

impl AdjLogDensity for Cauchy {
    type Variant = CauchyVariant;
    const NAME: &'static str = "cauchy";

    fn shapes(&self) -> Vec<Shape> {
        vec![self.x.shape(), self.loc.shape(), self.scale.shape()]
    }

    fn feval(&self) -> OracleResult<f64> {
        let log_pdf = match self.bind()? {
            Bound::Sss { x, loc, scale } => ln_pdf(x, loc, scale)?,
            Bound::Vss { x, loc, scale } => x
                .iter()
                .map(|&x_i| ln_pdf(x_i, loc, scale))
                .sum::<OracleResult<f64>>()?,
            Bound::Vsv { x, loc, scale } => x
                .iter()
                .zip(scale.iter())
                .map(|(&x_i, &s_i)| ln_pdf(x_i, loc, s_i))
                .sum::<OracleResult<f64>>()?,
            Bound::Vvs { x, loc, scale } => x
                .iter()
                .zip(loc.iter())
                .map(|(&x_i, &l_i)| ln_pdf(x_i, l_i, scale))
                .sum::<OracleResult<f64>>()?,
            Bound::Vvv { x, loc, scale } => x
                .iter()
                .zip(loc.iter())
                .zip(scale.iter())
                .map(|((&x_i, &l_i), &s_i)| ln_pdf(x_i, l_i, s_i))
                .sum::<OracleResult<f64>>()?,
        };
        let n = self.x.len() as f64;
        Ok(log_pdf + n * PI.ln())
    }

    fn beval(&self) -> OracleResult<GradientVector> {
        let grad = match self.bind()? {
            Bound::Sss { x, loc, scale } => {
                let diff = x - loc;
                let denom = scale + diff * diff / scale;
                let d_x = -2.0 * diff / (scale * denom);
                let d_scale = ((diff / scale).powi(2) - 1.0) / denom;
                GradientBuilder::new().scalar(d_x).scalar(-d_x).scalar(d_scale)
            }
            Bound::Vss { x, loc, scale } => {
                let d_x = x.mapv(|x_i| dx(x_i - loc, scale));
                let d_scale: f64 = x.iter().map(|&x_i| dscale(x_i - loc, scale)).sum();
                GradientBuilder::new()
                    .vector(&d_x)
                    .scalar(-d_x.sum())
                    .scalar(d_scale)
            }
            Bound::Vsv { x, loc, scale } => {
                let d_x = Zip::from(x).and(scale).map_collect(|&x_i, &s_i| dx(x_i - loc, s_i));
                let d_scale =
                    Zip::from(x).and(scale).map_collect(|&x_i, &s_i| dscale(x_i - loc, s_i));
                GradientBuilder::new()
                    .vector(&d_x)
                    .scalar(-d_x.sum())
                    .vector(&d_scale)
            }
            Bound::Vvs { x, loc, scale } => {
                let diff = x - loc;
                let d_x = diff.mapv(|d| dx(d, scale));
                let d_scale: f64 = diff.iter().map(|&d| dscale(d, scale)).sum();
                GradientBuilder::new()
                    .vector(&d_x)
                    .vector(&-&d_x)
                    .scalar(d_scale)
            }
            Bound::Vvv { x, loc, scale } => {
                let diff = x - loc;
                let d_x = Zip::from(&diff).and(scale).map_collect(|&d, &s| dx(d, s));
                let d_scale = Zip::from(&diff).and(scale).map_collect(|&d, &s| dscale(d, s));
                GradientBuilder::new()
                    .vector(&d_x)
                    .vector(&-&d_x)
                    .vector(&d_scale)
            }
        };
        Ok(grad.build())
    }
}
