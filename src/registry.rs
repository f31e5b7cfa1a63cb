//! Dispatch from a distribution name and shape variant to its evaluators.

use crate::dist::{
    AdjLogDensity, Bernoulli, BernoulliVariant, Cauchy, CauchyVariant, Normal, NormalVariant,
    Uniform, UniformVariant, Wishart, WishartVariant,
};
use crate::error::{OracleError, OracleResult};
use crate::shape::ShapeVariant;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five distributions the oracle covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionKind {
    Bernoulli,
    Cauchy,
    Normal,
    Uniform,
    Wishart,
}

impl DistributionKind {
    pub const ALL: [DistributionKind; 5] = [
        DistributionKind::Bernoulli,
        DistributionKind::Cauchy,
        DistributionKind::Normal,
        DistributionKind::Uniform,
        DistributionKind::Wishart,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DistributionKind::Bernoulli => Bernoulli::NAME,
            DistributionKind::Cauchy => Cauchy::NAME,
            DistributionKind::Normal => Normal::NAME,
            DistributionKind::Uniform => Uniform::NAME,
            DistributionKind::Wishart => Wishart::NAME,
        }
    }

    /// Digits after the decimal point when printing this distribution's results.
    pub fn precision(self) -> usize {
        match self {
            DistributionKind::Bernoulli | DistributionKind::Wishart => 20,
            DistributionKind::Cauchy => 18,
            DistributionKind::Normal | DistributionKind::Uniform => 16,
        }
    }

    /// Codes of every supported shape variant.
    pub fn variant_codes(self) -> Vec<String> {
        fn codes<V: ShapeVariant>() -> Vec<String> {
            V::ALL.iter().map(|v| v.code()).collect()
        }
        match self {
            DistributionKind::Bernoulli => codes::<BernoulliVariant>(),
            DistributionKind::Cauchy => codes::<CauchyVariant>(),
            DistributionKind::Normal => codes::<NormalVariant>(),
            DistributionKind::Uniform => codes::<UniformVariant>(),
            DistributionKind::Wishart => codes::<WishartVariant>(),
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistributionKind {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        DistributionKind::ALL
            .into_iter()
            .find(|k| k.name() == lower)
            .ok_or_else(|| OracleError::UnknownName {
                kind: "distribution",
                name: s.to_string(),
            })
    }
}

/// Which evaluator to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The adjusted log-density, a single value.
    Forward,
    /// The gradient vector.
    #[default]
    Backward,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Forward => f.write_str("forward"),
            Mode::Backward => f.write_str("backward"),
        }
    }
}

impl FromStr for Mode {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forward" | "f" => Ok(Mode::Forward),
            "backward" | "b" => Ok(Mode::Backward),
            _ => Err(OracleError::UnknownName {
                kind: "mode",
                name: s.to_string(),
            }),
        }
    }
}

/// One distribution bound to concrete arguments.
///
/// Serialised with a `distribution` tag next to the argument fields, e.g.
/// `{"distribution": "cauchy", "x": 0.421, "loc": 0.341, "scale": 2.132}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "distribution", rename_all = "lowercase")]
pub enum OracleCase {
    Bernoulli(Bernoulli),
    Cauchy(Cauchy),
    Normal(Normal),
    Uniform(Uniform),
    Wishart(Wishart),
}

macro_rules! with_dist {
    ($case:expr, $d:ident => $body:expr) => {
        match $case {
            OracleCase::Bernoulli($d) => $body,
            OracleCase::Cauchy($d) => $body,
            OracleCase::Normal($d) => $body,
            OracleCase::Uniform($d) => $body,
            OracleCase::Wishart($d) => $body,
        }
    };
}

impl OracleCase {
    pub fn kind(&self) -> DistributionKind {
        match self {
            OracleCase::Bernoulli(_) => DistributionKind::Bernoulli,
            OracleCase::Cauchy(_) => DistributionKind::Cauchy,
            OracleCase::Normal(_) => DistributionKind::Normal,
            OracleCase::Uniform(_) => DistributionKind::Uniform,
            OracleCase::Wishart(_) => DistributionKind::Wishart,
        }
    }

    pub fn variant_code(&self) -> OracleResult<String> {
        with_dist!(self, d => d.variant().map(|v| v.code()))
    }

    pub fn feval(&self) -> OracleResult<f64> {
        with_dist!(self, d => d.feval())
    }

    pub fn beval(&self) -> OracleResult<Vec<f64>> {
        with_dist!(self, d => d.beval().map(|g| g.to_vec()))
    }

    /// Runs the evaluator selected by `mode`. Forward results have one element.
    pub fn evaluate(&self, mode: Mode) -> OracleResult<Vec<f64>> {
        let code = self.variant_code()?;
        tracing::debug!(distribution = %self.kind(), variant = %code, %mode, "evaluating case");
        match mode {
            Mode::Forward => self.feval().map(|v| vec![v]),
            Mode::Backward => self.beval(),
        }
    }
}

/// Evaluates independent cases in parallel, preserving input order.
pub fn evaluate_batch(cases: &[OracleCase], mode: Mode) -> Vec<OracleResult<Vec<f64>>> {
    let results: Vec<_> = cases.par_iter().map(|c| c.evaluate(mode)).collect();
    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        tracing::warn!(failed, total = cases.len(), "some oracle cases failed");
    }
    results
}

/// One value per line, fixed-point with `precision` digits after the point.
pub fn render(values: &[f64], precision: usize) -> String {
    let mut out = String::new();
    for v in values {
        out.push_str(&format!("{:.*}\n", precision, v));
    }
    out
}
