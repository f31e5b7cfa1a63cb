// Structural properties of the evaluators and the reference scenarios.

use approx::assert_relative_eq;
use ndarray::{array, Array2};
use stat_oracle::dist::{
    AdjLogDensity, Bernoulli, BernoulliVariant, Cauchy, CauchyVariant, Normal, NormalVariant,
    Uniform, UniformVariant,
};
use stat_oracle::fixtures;
use std::f64::consts::PI;

fn det3(m: &Array2<f64>) -> f64 {
    m[[0, 0]] * (m[[1, 1]] * m[[2, 2]] - m[[1, 2]] * m[[2, 1]])
        - m[[0, 1]] * (m[[1, 0]] * m[[2, 2]] - m[[1, 2]] * m[[2, 0]])
        + m[[0, 2]] * (m[[1, 0]] * m[[2, 1]] - m[[1, 1]] * m[[2, 0]])
}

/// Cofactor inverse of a 3×3 matrix
fn inv3(m: &Array2<f64>) -> Array2<f64> {
    let det = det3(m);
    Array2::from_shape_fn((3, 3), |(i, j)| {
        // (i, j) entry of the adjugate is the (j, i) cofactor
        let (r0, r1) = ((j + 1) % 3, (j + 2) % 3);
        let (c0, c1) = ((i + 1) % 3, (i + 2) % 3);
        (m[[r0, c0]] * m[[r1, c1]] - m[[r0, c1]] * m[[r1, c0]]) / det
    })
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn test_scenario_bernoulli_rare_success() {
    let grad = Bernoulli::new(1.0, 0.0001).beval().unwrap();
    assert_eq!(grad.len(), 1);
    assert_relative_eq!(grad[0], 10000.0, epsilon = 1e-9);
}

#[test]
fn test_scenario_cauchy_scalar() {
    let (x, loc, scale) = (0.421, 0.341, 2.132);
    let dist = fixtures::cauchy(CauchyVariant::Sss);

    let z: f64 = (x - loc) / scale;
    let textbook = -(PI * scale * (1.0 + z * z)).ln();
    assert_relative_eq!(dist.feval().unwrap(), PI.ln() + textbook, epsilon = 1e-14);

    let diff: f64 = x - loc;
    let dx = -2.0 * diff / (scale * scale + diff * diff);
    let dscale = -(1.0 - (diff / scale).powi(2)) / (scale + diff * diff / scale);
    let grad = dist.beval().unwrap();
    assert_relative_eq!(grad[0], dx, epsilon = 1e-14);
    assert_relative_eq!(grad[1], -dx, epsilon = 1e-14);
    assert_relative_eq!(grad[2], dscale, epsilon = 1e-14);
}

#[test]
fn test_scenario_normal_scalar() {
    let grad = fixtures::normal(NormalVariant::Sss).beval().unwrap();
    let diff: f64 = 2.31 - (-0.2);
    let sigma: f64 = 0.01;
    assert_relative_eq!(grad[0], -diff / sigma.powi(2), max_relative = 1e-12);
    assert_relative_eq!(grad[1], diff / sigma.powi(2), max_relative = 1e-12);
    assert_relative_eq!(
        grad[2],
        ((diff / sigma).powi(2) - 1.0) / sigma,
        max_relative = 1e-12
    );
}

#[test]
fn test_scenario_uniform_scalar() {
    let grad = fixtures::uniform(UniformVariant::Sss).beval().unwrap();
    let width = 0.5231 + 3.2415;
    assert_relative_eq!(grad[0], 1.0 / width, epsilon = 1e-15);
    assert_relative_eq!(grad[1], -1.0 / width, epsilon = 1e-15);
}

#[test]
fn test_scenario_wishart_forward() {
    let dist = fixtures::wishart();
    let x = array![[10.0, 2.0, 3.0], [2.0, 10.0, 1.0], [3.0, 1.0, 10.0]];
    let v = array![[5.0, 1.0, 0.0], [1.0, 5.0, 1.0], [0.0, 1.0, 5.0]];
    let (n, d) = (4.0, 3.0);

    let trace: f64 = inv3(&v).dot(&x).diag().sum();
    let expected = 0.5 * (n - d - 1.0) * det3(&x).ln() - 0.5 * trace - 0.5 * n * det3(&v).ln();
    assert_relative_eq!(dist.feval().unwrap(), expected, epsilon = 1e-12);
}

// ============================================================================
// Structural properties
// ============================================================================

#[test]
fn test_covariance_gradient_is_symmetric() {
    for variant in [NormalVariant::Vsm, NormalVariant::Vvm] {
        let grad = fixtures::normal(variant).beval().unwrap();
        let offset = grad.len() - 9;
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(
                    grad[offset + 3 * i + j],
                    grad[offset + 3 * j + i],
                    epsilon = 1e-12
                );
            }
        }
    }
}

#[test]
fn test_uniform_scalar_support_policy() {
    let (min, max) = (-1.0, 2.0);
    for x in [-0.999, 0.0, 1.5, 1.999] {
        let grad = Uniform::new(x, min, max).beval().unwrap();
        assert_relative_eq!(grad[0], 1.0 / 3.0, epsilon = 1e-15);
        assert_relative_eq!(grad[1], -1.0 / 3.0, epsilon = 1e-15);
    }
    for x in [-1.0, -7.0, 2.0, 2.5] {
        let grad = Uniform::new(x, min, max).beval().unwrap();
        assert_eq!(grad.to_vec(), vec![0.0, 0.0]);
    }
}

#[test]
fn test_cauchy_scalar_parameters_aggregate() {
    let dist = fixtures::cauchy(CauchyVariant::Vss);
    let grad = dist.beval().unwrap();
    let (loc, scale) = (0.341, 2.132);

    let mut sums = [0.0, 0.0];
    for &x in [0.5, -1.3, -3.2414999].iter() {
        let g = Cauchy::new(x, loc, scale).beval().unwrap();
        sums[0] += g[1];
        sums[1] += g[2];
    }
    assert_relative_eq!(grad[3], sums[0], epsilon = 1e-12);
    assert_relative_eq!(grad[4], sums[1], epsilon = 1e-12);
}

#[test]
fn test_normal_scalar_parameters_aggregate() {
    let dist = fixtures::normal(NormalVariant::Vss);
    let grad = dist.beval().unwrap();

    let mut sums = [0.0, 0.0];
    for &x in [3.1, -2.3, 1.3].iter() {
        let g = Normal::new(x, -0.2, 0.01).beval().unwrap();
        sums[0] += g[1];
        sums[1] += g[2];
    }
    assert_relative_eq!(grad[3], sums[0], max_relative = 1e-12);
    assert_relative_eq!(grad[4], sums[1], max_relative = 1e-12);
}

#[test]
fn test_bernoulli_scalar_probability_aggregates() {
    let grad = fixtures::bernoulli(BernoulliVariant::Vs).beval().unwrap();
    let sum: f64 = [1.0, 0.0, 1.0]
        .iter()
        .map(|&x| Bernoulli::new(x, 0.0001).beval().unwrap()[0])
        .sum();
    assert_eq!(grad.len(), 1);
    assert_relative_eq!(grad[0], sum, max_relative = 1e-12);
}

#[test]
fn test_every_fixture_evaluates() {
    for (kind, code, case) in fixtures::all_cases() {
        let forward = case.feval().unwrap();
        assert!(forward.is_finite(), "{} {}: forward {}", kind, code, forward);
        let grad = case.beval().unwrap();
        assert!(
            grad.iter().all(|g| g.is_finite()),
            "{} {}: non-finite gradient",
            kind,
            code
        );
    }
}
