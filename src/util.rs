// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! Small numeric helpers shared across [`crate::rules`]. Kept free of any
//! model-specific types so each rule's statistics stay easy to eyeball
//! against the formulas in spec.md §4.D.

/// Clamps a rule score into `[0, 1]`, absorbing the floating-point noise
/// spec.md §4.D allows ("scores outside [0,1] due to floating noise are
/// clamped").
pub fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (matches spec.md's `var(d)`/`var(c)` usage, which
/// is computed over the full population of rooms/corridors, not a sample).
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    mean(&values.iter().map(|v| (v - m).powi(2)).collect::<Vec<_>>())
}

pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Coefficient of variation `σ/μ`; returns 0 when the mean is 0 (a
/// zero-mean, zero-variance population is perfectly uniform).
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let m = mean(values);
    if m == 0.0 {
        0.0
    } else {
        std_dev(values) / m
    }
}

/// A Gaussian "closeness to ideal" mapping, used by degree_variance
/// (§4.D.2), loop_ratio (§4.D.6), and path_diversity (§4.D.8):
/// `exp(-(x - center)^2 / (2 * spread^2))`.
pub fn gaussian_closeness(x: f64, center: f64, spread: f64) -> f64 {
    clamp01((-((x - center).powi(2)) / (2.0 * spread * spread)).exp())
}

/// Geometric mean of the given positive factors, skipping non-positive
/// entries (§4.D.8, §4.D.9: "geometric mean over positive factors").
/// Returns 0.0 if no factor is positive.
pub fn geometric_mean_positive(factors: &[f64]) -> f64 {
    let logs: Vec<f64> = factors.iter().copied().filter(|f| *f > 0.0).map(f64::ln).collect();
    if logs.is_empty() {
        0.0
    } else {
        clamp01(mean(&logs).exp())
    }
}

/// Uniformity score `1 - min(cv / sqrt(n - 1), 1)` used by door_distribution
/// (§4.D.3 does its own, simpler `cv²`), treasure_monster_distribution
/// (§4.D.8), and geometric_balance (§4.D.9).
pub fn uniformity_from_cv(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 1.0;
    }
    let cv = coefficient_of_variation(values);
    clamp01(1.0 - (cv / ((n - 1) as f64).sqrt()).min(1.0))
}

pub fn euclidean_distance(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
}
