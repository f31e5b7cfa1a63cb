use crate::dist::{check_len, unsupported, AdjLogDensity, GradientBuilder, GradientVector};
use crate::error::{OracleError, OracleResult};
use crate::shape::{Param, Shape, ShapeVariant};
use ndarray::{Array1, Zip};
use serde::{Deserialize, Serialize};

/// The Bernoulli log-mass over 0/1 observations.
///
/// Arguments in order: observation `x`, success probability `p`. Only `p` is
/// differentiated, so the gradient is `[∂p]` or `[∂p_0, …, ∂p_n]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bernoulli {
    pub x: Param,
    pub p: Param,
}

/// Shape variants of [`Bernoulli`], coded as `(x, p)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BernoulliVariant {
    Ss,
    Vs,
    Vv,
}

impl ShapeVariant for BernoulliVariant {
    const ALL: &'static [Self] = &[
        BernoulliVariant::Ss,
        BernoulliVariant::Vs,
        BernoulliVariant::Vv,
    ];

    fn shapes(self) -> &'static [Shape] {
        match self {
            BernoulliVariant::Ss => &[Shape::Scalar, Shape::Scalar],
            BernoulliVariant::Vs => &[Shape::Vector, Shape::Scalar],
            BernoulliVariant::Vv => &[Shape::Vector, Shape::Vector],
        }
    }
}

enum Bound<'a> {
    Ss { x: f64, p: f64 },
    Vs { x: &'a Array1<f64>, p: f64 },
    Vv { x: &'a Array1<f64>, p: &'a Array1<f64> },
}

impl Bernoulli {
    pub fn new(x: impl Into<Param>, p: impl Into<Param>) -> Self {
        Bernoulli {
            x: x.into(),
            p: p.into(),
        }
    }

    fn bind(&self) -> OracleResult<Bound<'_>> {
        let bound = match (&self.x, &self.p) {
            (Param::Scalar(x), Param::Scalar(p)) => Bound::Ss { x: *x, p: *p },
            (Param::Vector(x), Param::Scalar(p)) => Bound::Vs { x, p: *p },
            (Param::Vector(x), Param::Vector(p)) => {
                check_len("p", p, x.len())?;
                Bound::Vv { x, p }
            }
            _ => return Err(unsupported(Self::NAME, &self.shapes())),
        };

        self.x.values().into_iter().try_for_each(check_outcome)?;
        self.p.values().into_iter().try_for_each(check_probability)?;
        Ok(bound)
    }
}

fn check_outcome(x: f64) -> OracleResult<()> {
    if x != 0.0 && x != 1.0 {
        return Err(OracleError::domain("x", format!("{} is not a 0/1 outcome", x)));
    }
    Ok(())
}

fn check_probability(p: f64) -> OracleResult<()> {
    if !(p > 0.0 && p < 1.0) {
        return Err(OracleError::domain("p", format!("{} is not in (0, 1)", p)));
    }
    Ok(())
}

fn log_mass(x: f64, p: f64) -> f64 {
    x * p.ln() + (1.0 - x) * (1.0 - p).ln()
}

/// d/dp of the log-mass of a single outcome.
fn adjustment(x: f64, p: f64) -> f64 {
    if x == 1.0 {
        1.0 / p
    } else {
        -1.0 / (1.0 - p)
    }
}

impl AdjLogDensity for Bernoulli {
    type Variant = BernoulliVariant;
    const NAME: &'static str = "bernoulli";

    fn shapes(&self) -> Vec<Shape> {
        vec![self.x.shape(), self.p.shape()]
    }

    fn feval(&self) -> OracleResult<f64> {
        let value = match self.bind()? {
            Bound::Ss { x, p } => log_mass(x, p),
            Bound::Vs { x, p } => x.iter().map(|&x_i| log_mass(x_i, p)).sum(),
            Bound::Vv { x, p } => Zip::from(x)
                .and(p)
                .fold(0.0, |acc, &x_i, &p_i| acc + log_mass(x_i, p_i)),
        };
        Ok(value)
    }

    fn beval(&self) -> OracleResult<GradientVector> {
        let grad = match self.bind()? {
            Bound::Ss { x, p } => GradientBuilder::new().scalar(adjustment(x, p)),
            Bound::Vs { x, p } => {
                let dp: f64 = x.iter().map(|&x_i| adjustment(x_i, p)).sum();
                GradientBuilder::new().scalar(dp)
            }
            Bound::Vv { x, p } => {
                let dp = Zip::from(x).and(p).map_collect(|&x_i, &p_i| adjustment(x_i, p_i));
                GradientBuilder::new().vector(&dp)
            }
        };
        Ok(grad.build())
    }
}
