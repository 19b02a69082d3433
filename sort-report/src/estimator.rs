// This file is part of midnight-ledger.
// Copyright (C) 2025 Midnight Foundation
// SPDX-License-Identifier: Apache-2.0
// Licensed under the Apache License, Version 2.0 (the "License");
// You may not use this file except in compliance with the License.
// You may obtain a copy of the License at
// http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Complexity estimation
//!
//! Estimates the growth order of an algorithm's running time from a
//! [`Series`] of `(size, time)` measurements.
//!
//! The estimate is the slope of a least-squares fit of `ln(time)` against
//! `ln(size)`:
//!
//! ```text
//! ln(time) = constant + power * ln(size)
//! ```
//!
//! which recovers `power` exactly for `time = c * size^power`. The slope is
//! then bucketed into a complexity class by [`Thresholds`]. Both `N` and
//! `N log N` growth give slopes close to 1 over realistic size ranges, so
//! slopes in that band are resolved separately by [`disambiguate_linear`].

use crate::series::Series;
use linregress::{FormulaRegressionBuilder, RegressionDataBuilder};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Fitted slopes closer to zero than this are reported as exactly zero.
const ZERO_SLOPE_TOLERANCE: f64 = 1e-9;

/// Sums of squared deviations of `ln(size)` below this are treated as a
/// single repeated size.
const MIN_LOG_SIZE_SPREAD: f64 = 1e-12;

/// Tunable boundaries of the classification policy.
///
/// Slopes are matched in this order, first match wins:
///
/// | range                                     | class                      |
/// |-------------------------------------------|----------------------------|
/// | `0 <= power < linear_min`                 | sub-linear / `O(log N)`    |
/// | `linear_min <= power <= linear_max`       | [`disambiguate_linear`]    |
/// | `linear_max < power <= linearithmic_max`  | `O(N log N)`               |
/// | `quadratic_min <= power <= quadratic_max` | `O(N^2)`                   |
/// | anything else                             | `O(N^power)`               |
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    /// Times at or below this many milliseconds count as "not measured".
    pub noise_floor: f64,
    pub linear_min: f64,
    pub linear_max: f64,
    pub linearithmic_max: f64,
    pub quadratic_min: f64,
    pub quadratic_max: f64,
    /// Largest coefficient of variation of `time / (N ln N)` that still
    /// counts as flat.
    pub cv_max: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            noise_floor: 1e-9,
            linear_min: 0.8,
            linear_max: 1.2,
            linearithmic_max: 1.7,
            quadratic_min: 1.8,
            quadratic_max: 2.2,
            cv_max: 0.3,
        }
    }
}

/// Estimated complexity class of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Classification {
    SubLinear,
    Linear,
    Linearithmic,
    Quadratic,
    /// Generic power law, carrying the fitted exponent.
    Polynomial(f64),
    /// Fewer than two usable points, or a degenerate regression.
    InsufficientData,
    /// A logarithm of a size or time was not finite.
    Invalid,
}

impl Classification {
    /// Whether this class was derived from a fitted exponent.
    pub fn is_estimate(&self) -> bool {
        !matches!(
            self,
            Classification::InsufficientData | Classification::Invalid
        )
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::SubLinear => write!(f, "sub-linear/O(log N)"),
            Classification::Linear => write!(f, "O(N)"),
            Classification::Linearithmic => write!(f, "O(N log N)"),
            Classification::Quadratic => write!(f, "O(N^2)"),
            Classification::Polynomial(power) => write!(f, "O(N^{power:.1})"),
            Classification::InsufficientData => write!(f, "insufficient data"),
            Classification::Invalid => write!(f, "invalid"),
        }
    }
}

/// Outcome of classifying one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    /// Fitted exponent; `None` for the terminal classes.
    pub power: Option<f64>,
    pub classification: Classification,
    /// Number of samples that survived filtering.
    pub samples_used: usize,
    /// Coefficient of determination of the log-log fit. Only reported when
    /// at least three points were fitted and `ln(time)` is not constant.
    pub r_squared: Option<f64>,
}

impl ClassificationResult {
    fn terminal(classification: Classification, samples_used: usize) -> Self {
        ClassificationResult {
            power: None,
            classification,
            samples_used,
            r_squared: None,
        }
    }

    pub fn label(&self) -> String {
        self.classification.to_string()
    }
}

/// Why a log-log fit could not produce a slope.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("logarithm of a size or time is not finite")]
    NonFinite,
    #[error("regression is degenerate: {0}")]
    Degenerate(String),
}

/// Result of fitting `ln(time) = intercept + power * ln(size)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLawFit {
    pub power: f64,
    pub intercept: f64,
    pub r_squared: Option<f64>,
}

/// Least-squares fit of `ln(time)` against `ln(size)`.
///
/// `points` are `(size, time)` pairs, which must already be filtered of
/// unmeasured entries.
pub fn fit_power_law(points: &[(f64, f64)]) -> Result<PowerLawFit, FitError> {
    let log_sizes: Vec<f64> = points.iter().map(|(size, _)| size.ln()).collect();
    let log_times: Vec<f64> = points.iter().map(|(_, time)| time.ln()).collect();
    if log_sizes
        .iter()
        .chain(log_times.iter())
        .any(|v| !v.is_finite())
    {
        return Err(FitError::NonFinite);
    }
    if points.len() < 2 {
        return Err(FitError::Degenerate(format!(
            "{} point(s) is too few for a line",
            points.len()
        )));
    }
    let n = log_sizes.len() as f64;
    let mean_log_size = log_sizes.iter().sum::<f64>() / n;
    let log_size_spread = log_sizes
        .iter()
        .map(|x| (x - mean_log_size).powi(2))
        .sum::<f64>();
    if log_size_spread <= MIN_LOG_SIZE_SPREAD {
        return Err(FitError::Degenerate("all sizes are identical".into()));
    }

    let data = RegressionDataBuilder::new()
        .build_from(vec![("log_time", log_times.clone()), ("log_size", log_sizes.clone())])
        .map_err(|e| FitError::Degenerate(e.to_string()))?;
    // Statistics need residual degrees of freedom, which two points don't
    // have, so only the parameters are requested.
    let params = FormulaRegressionBuilder::new()
        .data(&data)
        .formula("log_time ~ log_size")
        .fit_without_statistics()
        .map_err(|e| FitError::Degenerate(e.to_string()))?;
    let (intercept, power) = match params.as_slice() {
        [intercept, power] => (*intercept, *power),
        other => {
            return Err(FitError::Degenerate(format!(
                "expected 2 regression parameters, got {}",
                other.len()
            )));
        }
    };
    if !power.is_finite() || !intercept.is_finite() {
        return Err(FitError::Degenerate("non-finite slope".into()));
    }
    let power = if power.abs() < ZERO_SLOPE_TOLERANCE {
        0.0
    } else {
        power
    };

    let r_squared = if points.len() > 2 {
        r_squared(&log_sizes, &log_times, intercept, power)
    } else {
        None
    };
    Ok(PowerLawFit {
        power,
        intercept,
        r_squared,
    })
}

/// `R² = 1 - SS_res / SS_tot`, undefined when `ys` is constant.
fn r_squared(xs: &[f64], ys: &[f64], intercept: f64, slope: f64) -> Option<f64> {
    let mean = ys.iter().sum::<f64>() / ys.len() as f64;
    let ss_tot = ys.iter().map(|y| (y - mean).powi(2)).sum::<f64>();
    if ss_tot <= f64::EPSILON {
        return None;
    }
    let ss_res = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
        .sum::<f64>();
    Some(1.0 - ss_res / ss_tot)
}

/// Population coefficient of variation, `stddev / mean`.
///
/// Returns `None` for an empty slice or a zero mean.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return None;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt() / mean)
}

/// Decide between `O(N)` and `O(N log N)` for a slope near 1.
///
/// Under the `N log N` hypothesis `time / (N ln N)` is flat across sizes, so
/// its coefficient of variation stays below `cv_max`. Sizes of 1 have no
/// defined ratio and are skipped. With fewer than two ratios there is nothing
/// to compare, and the answer is `O(N)`.
pub fn disambiguate_linear(points: &[(f64, f64)], cv_max: f64) -> Classification {
    let ratios: Vec<f64> = points
        .iter()
        .filter(|(size, _)| *size > 1.0)
        .map(|(size, time)| time / (size * size.ln()))
        .collect();
    if ratios.len() < 2 {
        return Classification::Linear;
    }
    match coefficient_of_variation(&ratios) {
        Some(cv) if cv < cv_max => {
            debug!(cv, "N log N ratio is flat");
            Classification::Linearithmic
        }
        Some(cv) => {
            debug!(cv, "N log N ratio varies");
            Classification::Linear
        }
        None => Classification::Linear,
    }
}

/// Classifies series by their empirical growth order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ComplexityEstimator {
    thresholds: Thresholds,
}

impl ComplexityEstimator {
    pub fn new(thresholds: Thresholds) -> Self {
        ComplexityEstimator { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Classify a series. Never fails: unusable input maps to
    /// [`Classification::InsufficientData`] or [`Classification::Invalid`].
    pub fn classify(&self, series: &Series) -> ClassificationResult {
        let points: Vec<(f64, f64)> = series
            .measured()
            .filter(|(_, time)| *time > self.thresholds.noise_floor)
            .map(|(size, time)| (size as f64, time))
            .collect();
        if points.len() < 2 {
            return ClassificationResult::terminal(
                Classification::InsufficientData,
                points.len(),
            );
        }
        match fit_power_law(&points) {
            Ok(fit) => ClassificationResult {
                power: Some(fit.power),
                classification: self.classify_power(fit.power, &points),
                samples_used: points.len(),
                r_squared: fit.r_squared,
            },
            Err(FitError::NonFinite) => {
                ClassificationResult::terminal(Classification::Invalid, points.len())
            }
            Err(e @ FitError::Degenerate(_)) => {
                debug!(error = %e, "skipping degenerate fit");
                ClassificationResult::terminal(Classification::InsufficientData, points.len())
            }
        }
    }

    /// Map a fitted slope onto a complexity class. `points` are only
    /// consulted when the slope falls in the ambiguous band around 1.
    pub fn classify_power(&self, power: f64, points: &[(f64, f64)]) -> Classification {
        let t = &self.thresholds;
        if (0.0..t.linear_min).contains(&power) {
            Classification::SubLinear
        } else if (t.linear_min..=t.linear_max).contains(&power) {
            disambiguate_linear(points, t.cv_max)
        } else if power > t.linear_max && power <= t.linearithmic_max {
            Classification::Linearithmic
        } else if (t.quadratic_min..=t.quadratic_max).contains(&power) {
            Classification::Quadratic
        } else {
            Classification::Polynomial(power)
        }
    }
}
