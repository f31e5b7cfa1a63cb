pub mod bernoulli;
pub mod cauchy;
pub mod multivariate_normal;
pub mod normal;
pub mod uniform;
pub mod wishart;

// Re-export all distributions for convenience
pub use bernoulli::{Bernoulli, BernoulliVariant};
pub use cauchy::{Cauchy, CauchyVariant};
pub use normal::{Normal, NormalVariant};
pub use uniform::{Uniform, UniformVariant};
pub use wishart::{Wishart, WishartVariant};

use crate::error::{OracleError, OracleResult};
use crate::linalg::is_positive_definite;
use crate::shape::{shape_code, Shape, ShapeVariant};
use ndarray::{Array1, Array2};

/// Ordered partial derivatives produced by a backward evaluation.
pub type GradientVector = Array1<f64>;

/// A distribution evaluated at concrete argument values.
///
/// `feval` returns the adjusted log-density (the textbook log-density shifted
/// by a distribution-specific constant), and `beval` returns its gradient with
/// respect to every differentiable argument: observation components first,
/// then location, then scale, with matrices flattened row-major.
pub trait AdjLogDensity {
    /// The closed set of shape combinations this distribution supports.
    type Variant: ShapeVariant;

    /// Lowercase distribution name.
    const NAME: &'static str;

    /// Shapes of the arguments in argument order.
    fn shapes(&self) -> Vec<Shape>;

    /// Resolves the argument shapes to a supported variant.
    fn variant(&self) -> OracleResult<Self::Variant> {
        let shapes = self.shapes();
        Self::Variant::from_shapes(&shapes).ok_or_else(|| unsupported(Self::NAME, &shapes))
    }

    /// Adjusted log-density at the bound arguments.
    fn feval(&self) -> OracleResult<f64>;

    /// Gradient of [`feval`](Self::feval).
    fn beval(&self) -> OracleResult<GradientVector>;
}

pub(crate) fn unsupported(distribution: &'static str, shapes: &[Shape]) -> OracleError {
    OracleError::UnsupportedVariant {
        distribution,
        variant: shape_code(shapes),
    }
}

pub(crate) fn check_len(param: &'static str, values: &Array1<f64>, expected: usize) -> OracleResult<()> {
    if values.len() != expected {
        return Err(OracleError::ShapeMismatch {
            param,
            expected,
            found: values.len(),
        });
    }
    Ok(())
}

pub(crate) fn check_positive(param: &'static str, value: f64) -> OracleResult<()> {
    if !(value > 0.0) {
        return Err(OracleError::domain(param, format!("{} must be positive", value)));
    }
    Ok(())
}

pub(crate) fn check_all_positive(param: &'static str, values: &Array1<f64>) -> OracleResult<()> {
    values.iter().try_for_each(|&v| check_positive(param, v))
}

/// Checks a square, positive definite matrix of dimension `dim`.
pub(crate) fn check_pos_def(param: &'static str, m: &Array2<f64>, dim: usize) -> OracleResult<()> {
    if m.nrows() != dim || m.ncols() != dim {
        return Err(OracleError::ShapeMismatch {
            param,
            expected: dim * dim,
            found: m.len(),
        });
    }
    if !is_positive_definite(m) {
        return Err(OracleError::domain(param, "matrix is not positive definite"));
    }
    Ok(())
}

/// Assembles a gradient from its parts in output order.
#[derive(Debug, Default)]
pub(crate) struct GradientBuilder(Vec<f64>);

impl GradientBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn scalar(mut self, v: f64) -> Self {
        self.0.push(v);
        self
    }

    pub(crate) fn vector(mut self, v: &Array1<f64>) -> Self {
        self.0.extend(v.iter());
        self
    }

    /// Appends a matrix flattened row-major.
    pub(crate) fn matrix(mut self, m: &Array2<f64>) -> Self {
        self.0.extend(m.iter());
        self
    }

    pub(crate) fn build(self) -> GradientVector {
        Array1::from_vec(self.0)
    }
}
