//! Small closed-form statistics used by the diagnostics
//!
//! Every function returns a defined value for empty or degenerate input so
//! callers never see NaN.

/// Arithmetic mean, 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n), 0.0 for an empty slice
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Pearson correlation coefficient
///
/// None when the slices differ in length, have fewer than two points, or
/// either series has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    if population_std(xs) <= 0.0 || population_std(ys) <= 0.0 {
        return None;
    }

    let mx = mean(xs);
    let my = mean(ys);
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        cov += (x - mx) * (y - my);
        var_x += (x - mx).powi(2);
        var_y += (y - my).powi(2);
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    if r.is_finite() {
        Some(r.clamp(-1.0, 1.0))
    } else {
        None
    }
}

/// Ordinary least-squares line against a 0-based time index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Fit `y = slope * x + intercept` with `x = 0, 1, 2, ...`
///
/// Uses the normal-equation sums. A zero index variance gives slope 0 and
/// the mean as intercept; a zero total variance gives R² of 0.
pub fn linear_fit(values: &[f64]) -> LinearFit {
    let n = values.len() as f64;
    let xs: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();

    let sum_x: f64 = xs.iter().sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = xs.iter().zip(values).map(|(x, y)| x * y).sum();
    let sum_x2: f64 = xs.iter().map(|x| x * x).sum();

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return LinearFit {
            slope: 0.0,
            intercept: mean(values),
            r_squared: 0.0,
        };
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    let m = mean(values);
    let ss_tot: f64 = values.iter().map(|y| (y - m).powi(2)).sum();
    let ss_res: f64 = xs
        .iter()
        .zip(values)
        .map(|(x, y)| (y - (slope * x + intercept)).powi(2))
        .sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

    LinearFit {
        slope,
        intercept,
        r_squared,
    }
}

/// Absolute z-scores of every value, or None when the spread is zero
pub fn abs_z_scores(values: &[f64]) -> Option<Vec<f64>> {
    let std = population_std(values);
    if std <= 0.0 {
        return None;
    }
    let m = mean(values);
    Some(values.iter().map(|v| ((v - m) / std).abs()).collect())
}
