use thiserror::Error;

/// Errors raised while binding or evaluating an oracle case.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    /// A parameter lies outside the mathematical domain of its distribution.
    #[error("{param} is outside its domain: {reason}")]
    NumericDomain { param: &'static str, reason: String },

    /// A vector or matrix argument does not line up with the observation.
    #[error("{param} has {found} elements, expected {expected}")]
    ShapeMismatch {
        param: &'static str,
        expected: usize,
        found: usize,
    },

    /// The argument shapes do not form a supported variant.
    #[error("{distribution} has no `{variant}` shape variant")]
    UnsupportedVariant {
        distribution: &'static str,
        variant: String,
    },

    /// A distribution or mode name that is not recognised.
    #[error("unknown {kind} `{name}`")]
    UnknownName { kind: &'static str, name: String },

    /// A parameter value could not be interpreted as a scalar, vector or matrix.
    #[error("malformed parameter: {0}")]
    MalformedParam(String),
}

pub type OracleResult<T> = Result<T, OracleError>;

impl OracleError {
    pub(crate) fn domain(param: &'static str, reason: impl Into<String>) -> Self {
        OracleError::NumericDomain {
            param,
            reason: reason.into(),
        }
    }
}
