//! Shape kinds, shaped argument values, and the per-distribution variant tags.
//!
//! Every evaluator argument is a [`Param`] whose [`Shape`] is one of scalar,
//! vector or matrix. A distribution reads the shapes of its arguments in a
//! fixed order and maps them to exactly one variant of its own closed
//! [`ShapeVariant`] enum; the variant's code is one letter per argument
//! (`s`, `v`, `m`), so `"vsm"` is a vector observation with a scalar mean and
//! a matrix covariance.

use crate::error::{OracleError, OracleResult};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The shape kind of a single argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Scalar,
    Vector,
    Matrix,
}

impl Shape {
    /// One-letter code used in variant tags.
    pub fn code(self) -> char {
        match self {
            Shape::Scalar => 's',
            Shape::Vector => 'v',
            Shape::Matrix => 'm',
        }
    }
}

/// Builds the tag string for a sequence of shapes.
pub fn shape_code(shapes: &[Shape]) -> String {
    shapes.iter().map(|s| s.code()).collect()
}

/// A closed set of shape combinations supported by one distribution.
pub trait ShapeVariant: Copy + Eq + fmt::Debug + Sized + 'static {
    /// Every supported variant, in a stable order.
    const ALL: &'static [Self];

    /// Argument shapes in the distribution's argument order.
    fn shapes(self) -> &'static [Shape];

    fn code(self) -> String {
        shape_code(self.shapes())
    }

    fn from_shapes(shapes: &[Shape]) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.shapes() == shapes)
    }

    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.code() == code)
    }
}

/// A scalar, vector or square-matrix argument value.
///
/// In JSON a scalar is a number, a vector is an array of numbers and a
/// matrix is an array of equal-length rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ParamRepr", into = "ParamRepr")]
pub enum Param {
    Scalar(f64),
    Vector(Array1<f64>),
    Matrix(Array2<f64>),
}

impl Param {
    pub fn shape(&self) -> Shape {
        match self {
            Param::Scalar(_) => Shape::Scalar,
            Param::Vector(_) => Shape::Vector,
            Param::Matrix(_) => Shape::Matrix,
        }
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        match self {
            Param::Scalar(_) => 1,
            Param::Vector(v) => v.len(),
            Param::Matrix(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements in row-major order.
    pub fn values(&self) -> Vec<f64> {
        match self {
            Param::Scalar(v) => vec![*v],
            Param::Vector(v) => v.to_vec(),
            Param::Matrix(m) => m.iter().copied().collect(),
        }
    }

    /// A parameter of the same shape holding `values` in row-major order.
    pub fn with_values(&self, values: &[f64]) -> OracleResult<Param> {
        if values.len() != self.len() {
            return Err(OracleError::MalformedParam(format!(
                "expected {} values, got {}",
                self.len(),
                values.len()
            )));
        }
        Ok(match self {
            Param::Scalar(_) => Param::Scalar(values[0]),
            Param::Vector(_) => Param::Vector(Array1::from_vec(values.to_vec())),
            Param::Matrix(m) => {
                Param::Matrix(Array2::from_shape_fn(m.dim(), |(i, j)| {
                    values[i * m.ncols() + j]
                }))
            }
        })
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Param::Scalar(v)
    }
}

impl From<Array1<f64>> for Param {
    fn from(v: Array1<f64>) -> Self {
        Param::Vector(v)
    }
}

impl From<Array2<f64>> for Param {
    fn from(m: Array2<f64>) -> Self {
        Param::Matrix(m)
    }
}

impl From<Vec<f64>> for Param {
    fn from(v: Vec<f64>) -> Self {
        Param::Vector(Array1::from_vec(v))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ParamRepr {
    Scalar(f64),
    Vector(Vec<f64>),
    Matrix(Vec<Vec<f64>>),
}

impl TryFrom<ParamRepr> for Param {
    type Error = OracleError;

    fn try_from(repr: ParamRepr) -> Result<Self, Self::Error> {
        match repr {
            ParamRepr::Scalar(v) => Ok(Param::Scalar(v)),
            ParamRepr::Vector(v) => {
                if v.is_empty() {
                    return Err(OracleError::MalformedParam("empty vector".into()));
                }
                Ok(Param::Vector(Array1::from_vec(v)))
            }
            ParamRepr::Matrix(rows) => {
                let n_rows = rows.len();
                let n_cols = rows.first().map_or(0, Vec::len);
                if n_rows == 0 || n_cols == 0 {
                    return Err(OracleError::MalformedParam("empty matrix".into()));
                }
                if let Some(bad) = rows.iter().position(|r| r.len() != n_cols) {
                    return Err(OracleError::MalformedParam(format!(
                        "matrix row {} has {} columns, expected {}",
                        bad,
                        rows[bad].len(),
                        n_cols
                    )));
                }
                let flat: Vec<f64> = rows.into_iter().flatten().collect();
                Array2::from_shape_vec((n_rows, n_cols), flat)
                    .map(Param::Matrix)
                    .map_err(|e| OracleError::MalformedParam(e.to_string()))
            }
        }
    }
}

impl From<Param> for ParamRepr {
    fn from(p: Param) -> Self {
        match p {
            Param::Scalar(v) => ParamRepr::Scalar(v),
            Param::Vector(v) => ParamRepr::Vector(v.to_vec()),
            Param::Matrix(m) => ParamRepr::Matrix(m.outer_iter().map(|r| r.to_vec()).collect()),
        }
    }
}
