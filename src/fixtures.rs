//! Reference fixture values, one set per distribution.
//!
//! Each constructor returns the distribution bound to the literal values the
//! comparison target was generated from, shaped for the requested variant.

use crate::dist::{
    Bernoulli, BernoulliVariant, Cauchy, CauchyVariant, Normal, NormalVariant, Uniform,
    UniformVariant, Wishart,
};
use crate::error::{OracleError, OracleResult};
use crate::registry::{DistributionKind, OracleCase};
use crate::shape::ShapeVariant;
use ndarray::{array, Array1, Array2};

pub fn bernoulli(variant: BernoulliVariant) -> Bernoulli {
    let scl_x = 0.0;
    let scl_p = 0.0001;
    let vec_x = array![1.0, 0.0, 1.0];
    let vec_p = array![0.3, 0.42, 0.98];

    match variant {
        BernoulliVariant::Ss => Bernoulli::new(scl_x, scl_p),
        BernoulliVariant::Vs => Bernoulli::new(vec_x, scl_p),
        BernoulliVariant::Vv => Bernoulli::new(vec_x, vec_p),
    }
}

/// The scalar fixture with a success, `x = 1, p = 0.0001`.
pub fn bernoulli_x_one() -> Bernoulli {
    Bernoulli::new(1.0, 0.0001)
}

pub fn cauchy(variant: CauchyVariant) -> Cauchy {
    let (scl_x, scl_loc, scl_scale) = (0.421, 0.341, 2.132);
    let vec_x = array![0.5, -1.3, -3.2414999];
    let vec_loc = array![0.4, -2.30000001, -10.32];
    let vec_scale = array![0.51, 0.01, 3.4];

    match variant {
        CauchyVariant::Sss => Cauchy::new(scl_x, scl_loc, scl_scale),
        CauchyVariant::Vss => Cauchy::new(vec_x, scl_loc, scl_scale),
        CauchyVariant::Vsv => Cauchy::new(vec_x, scl_loc, vec_scale),
        CauchyVariant::Vvs => Cauchy::new(vec_x, vec_loc, scl_scale),
        CauchyVariant::Vvv => Cauchy::new(vec_x, vec_loc, vec_scale),
    }
}

fn normal_covariance() -> Array2<f64> {
    array![[1.0, 0.3, 0.2], [0.3, 2.0, -0.3], [0.2, -0.3, 3.0]]
}

pub fn normal(variant: NormalVariant) -> Normal {
    let (scl_x, scl_mu, scl_sigma) = (2.31, -0.2, 0.01);
    let vec_x: Array1<f64> = array![3.1, -2.3, 1.3];
    let vec_mu = array![-0.3, -2.3, -1.2];
    let vec_sigma = array![0.01, 1.03, 2.41];

    match variant {
        NormalVariant::Sss => Normal::new(scl_x, scl_mu, scl_sigma),
        NormalVariant::Vss => Normal::new(vec_x, scl_mu, scl_sigma),
        NormalVariant::Vvs => Normal::new(vec_x, vec_mu, scl_sigma),
        NormalVariant::Vsv => Normal::new(vec_x, scl_mu, vec_sigma),
        NormalVariant::Vvv => Normal::new(vec_x, vec_mu, vec_sigma),
        NormalVariant::Vsm => Normal::new(vec_x, scl_mu, normal_covariance()),
        NormalVariant::Vvm => Normal::new(vec_x, vec_mu, normal_covariance()),
    }
}

pub fn uniform(variant: UniformVariant) -> Uniform {
    let (scl_x, scl_min, scl_max) = (0.45, -3.2415, 0.5231);
    let vec_x = array![0.5, -2.3, -3.2414999];
    let vec_min = array![0.4, -2.30000001, -10.32];
    let vec_max = array![0.51, 0.0, 3.4];

    match variant {
        UniformVariant::Sss => Uniform::new(scl_x, scl_min, scl_max),
        UniformVariant::Vss => Uniform::new(vec_x, scl_min, scl_max),
        UniformVariant::Vsv => Uniform::new(vec_x, scl_min, vec_max),
        UniformVariant::Vvs => Uniform::new(vec_x, vec_min, scl_max),
        UniformVariant::Vvv => Uniform::new(vec_x, vec_min, vec_max),
    }
}

pub fn wishart() -> Wishart {
    let x = array![[10.0, 2.0, 3.0], [2.0, 10.0, 1.0], [3.0, 1.0, 10.0]];
    let v = array![[5.0, 1.0, 0.0], [1.0, 5.0, 1.0], [0.0, 1.0, 5.0]];
    Wishart::new(x, v, 4.0)
}

fn lookup<V: ShapeVariant>(kind: DistributionKind, code: &str) -> OracleResult<V> {
    V::from_code(code).ok_or_else(|| OracleError::UnsupportedVariant {
        distribution: kind.name(),
        variant: code.to_string(),
    })
}

/// Fixtures addressed by name rather than by a variant code.
const NAMED: &[(DistributionKind, &str)] = &[(DistributionKind::Bernoulli, "ss_x_one")];

/// Variant codes of `kind` followed by its named fixtures.
pub fn fixture_names(kind: DistributionKind) -> Vec<String> {
    let mut names = kind.variant_codes();
    names.extend(
        NAMED
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, name)| name.to_string()),
    );
    names
}

/// The reference fixture for `kind` shaped as the variant `code`, or the
/// named fixture `code` (e.g. `ss_x_one` for Bernoulli).
pub fn case(kind: DistributionKind, code: &str) -> OracleResult<OracleCase> {
    if kind == DistributionKind::Bernoulli && code == "ss_x_one" {
        return Ok(OracleCase::Bernoulli(bernoulli_x_one()));
    }
    let case = match kind {
        DistributionKind::Bernoulli => OracleCase::Bernoulli(bernoulli(lookup(kind, code)?)),
        DistributionKind::Cauchy => OracleCase::Cauchy(cauchy(lookup(kind, code)?)),
        DistributionKind::Normal => OracleCase::Normal(normal(lookup(kind, code)?)),
        DistributionKind::Uniform => OracleCase::Uniform(uniform(lookup(kind, code)?)),
        DistributionKind::Wishart => {
            lookup::<crate::dist::WishartVariant>(kind, code)?;
            OracleCase::Wishart(wishart())
        }
    };
    Ok(case)
}

/// Every reference fixture, tagged with its distribution and variant code.
pub fn all_cases() -> Vec<(DistributionKind, String, OracleCase)> {
    let mut cases = Vec::new();
    for kind in DistributionKind::ALL {
        for code in fixture_names(kind) {
            if let Ok(case) = case(kind, &code) {
                cases.push((kind, code, case));
            }
        }
    }
    cases
}
