use crate::dist::{check_len, unsupported, AdjLogDensity, GradientBuilder, GradientVector};
use crate::error::{OracleError, OracleResult};
use crate::shape::{Param, Shape, ShapeVariant};
use ndarray::{Array1, Zip};
use serde::{Deserialize, Serialize};

/// The continuous Uniform distribution on `(min, max)`.
///
/// Arguments in order: observation `x`, lower bound `min`, upper bound `max`.
/// The gradient covers the bounds only, `[∂min…, ∂max…]`: the density is
/// flat in `x` inside the support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Uniform {
    pub x: Param,
    pub min: Param,
    pub max: Param,
}

/// Shape variants of [`Uniform`], coded as `(x, min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformVariant {
    Sss,
    Vss,
    Vsv,
    Vvs,
    Vvv,
}

impl ShapeVariant for UniformVariant {
    const ALL: &'static [Self] = &[
        UniformVariant::Sss,
        UniformVariant::Vss,
        UniformVariant::Vsv,
        UniformVariant::Vvs,
        UniformVariant::Vvv,
    ];

    fn shapes(self) -> &'static [Shape] {
        use Shape::{Scalar as S, Vector as V};
        match self {
            UniformVariant::Sss => &[S, S, S],
            UniformVariant::Vss => &[V, S, S],
            UniformVariant::Vsv => &[V, S, V],
            UniformVariant::Vvs => &[V, V, S],
            UniformVariant::Vvv => &[V, V, V],
        }
    }
}

enum Bound<'a> {
    Sss {
        x: f64,
        min: f64,
        max: f64,
    },
    Vss {
        x: &'a Array1<f64>,
        min: f64,
        max: f64,
    },
    Vsv {
        x: &'a Array1<f64>,
        min: f64,
        max: &'a Array1<f64>,
    },
    Vvs {
        x: &'a Array1<f64>,
        min: &'a Array1<f64>,
        max: f64,
    },
    Vvv {
        x: &'a Array1<f64>,
        min: &'a Array1<f64>,
        max: &'a Array1<f64>,
    },
}

impl Uniform {
    pub fn new(x: impl Into<Param>, min: impl Into<Param>, max: impl Into<Param>) -> Self {
        Uniform {
            x: x.into(),
            min: min.into(),
            max: max.into(),
        }
    }

    fn bind(&self) -> OracleResult<Bound<'_>> {
        use Param::{Scalar as S, Vector as V};
        match (&self.x, &self.min, &self.max) {
            (S(x), S(min), S(max)) => {
                check_ordered(*min, *max)?;
                Ok(Bound::Sss {
                    x: *x,
                    min: *min,
                    max: *max,
                })
            }
            (V(x), S(min), S(max)) => {
                check_ordered(*min, *max)?;
                Ok(Bound::Vss {
                    x,
                    min: *min,
                    max: *max,
                })
            }
            (V(x), S(min), V(max)) => {
                check_len("max", max, x.len())?;
                max.iter().try_for_each(|&m| check_ordered(*min, m))?;
                Ok(Bound::Vsv { x, min: *min, max })
            }
            (V(x), V(min), S(max)) => {
                check_len("min", min, x.len())?;
                min.iter().try_for_each(|&m| check_ordered(m, *max))?;
                Ok(Bound::Vvs { x, min, max: *max })
            }
            (V(x), V(min), V(max)) => {
                check_len("min", min, x.len())?;
                check_len("max", max, x.len())?;
                Zip::from(min)
                    .and(max)
                    .fold(Ok(()), |acc, &lo, &hi| acc.and_then(|_| check_ordered(lo, hi)))?;
                Ok(Bound::Vvv { x, min, max })
            }
            _ => Err(unsupported(Self::NAME, &self.shapes())),
        }
    }
}

fn check_ordered(min: f64, max: f64) -> OracleResult<()> {
    if !(max > min) {
        return Err(OracleError::domain(
            "max",
            format!("upper bound {} does not exceed lower bound {}", max, min),
        ));
    }
    Ok(())
}

fn in_support(x: f64, min: f64, max: f64) -> bool {
    min < x && x < max
}

impl AdjLogDensity for Uniform {
    type Variant = UniformVariant;
    const NAME: &'static str = "uniform";

    fn shapes(&self) -> Vec<Shape> {
        vec![self.x.shape(), self.min.shape(), self.max.shape()]
    }

    /// `Σ -ln(max - min)`, or `-∞` when any element falls outside its support.
    fn feval(&self) -> OracleResult<f64> {
        let terms: Vec<(f64, f64, f64)> = match self.bind()? {
            Bound::Sss { x, min, max } => vec![(x, min, max)],
            Bound::Vss { x, min, max } => x.iter().map(|&x_i| (x_i, min, max)).collect(),
            Bound::Vsv { x, min, max } => Zip::from(x)
                .and(max)
                .map_collect(|&x_i, &hi| (x_i, min, hi))
                .to_vec(),
            Bound::Vvs { x, min, max } => Zip::from(x)
                .and(min)
                .map_collect(|&x_i, &lo| (x_i, lo, max))
                .to_vec(),
            Bound::Vvv { x, min, max } => Zip::from(x)
                .and(min)
                .and(max)
                .map_collect(|&x_i, &lo, &hi| (x_i, lo, hi))
                .to_vec(),
        };

        if terms.iter().any(|&(x, lo, hi)| !in_support(x, lo, hi)) {
            return Ok(f64::NEG_INFINITY);
        }
        Ok(terms.iter().map(|&(_, lo, hi)| -(hi - lo).ln()).sum())
    }

    fn beval(&self) -> OracleResult<GradientVector> {
        let grad = match self.bind()? {
            Bound::Sss { x, min, max } => {
                // Outside the support the gradient is zero rather than an error
                if in_support(x, min, max) {
                    let v = 1.0 / (max - min);
                    GradientBuilder::new().scalar(v).scalar(-v)
                } else {
                    GradientBuilder::new().scalar(0.0).scalar(0.0)
                }
            }
            Bound::Vss { x, min, max } => {
                // Elements are not re-checked against the support here
                let n = x.len() as f64;
                let v = 1.0 / (max - min);
                GradientBuilder::new().scalar(n * v).scalar(n * -v)
            }
            Bound::Vsv { min, max, .. } => {
                let d_max = max.mapv(|hi| -1.0 / (hi - min));
                GradientBuilder::new().scalar(-d_max.sum()).vector(&d_max)
            }
            Bound::Vvs { min, max, .. } => {
                let d_min = min.mapv(|lo| 1.0 / (max - lo));
                GradientBuilder::new().vector(&d_min).scalar(-d_min.sum())
            }
            Bound::Vvv { min, max, .. } => {
                let d_max = Zip::from(min).and(max).map_collect(|&lo, &hi| -1.0 / (hi - lo));
                GradientBuilder::new().vector(&-&d_max).vector(&d_max)
            }
        };
        Ok(grad.build())
    }
}
