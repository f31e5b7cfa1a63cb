pub mod dist;
pub mod error;
pub mod fixtures;
pub mod linalg;
pub mod registry;
pub mod shape;

// Re-export commonly used types at crate root
pub use dist::{AdjLogDensity, Bernoulli, Cauchy, GradientVector, Normal, Uniform, Wishart};
pub use error::{OracleError, OracleResult};
pub use registry::{evaluate_batch, render, DistributionKind, Mode, OracleCase};
pub use shape::{Param, Shape, ShapeVariant};
