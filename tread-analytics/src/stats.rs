//! Descriptive statistics used by the reports

/// Median of a sample (mean of the two middle values for even sizes), 0 when empty
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Percentile rank of `value` in `population`: share of members ≤ value, in percent
pub fn percentile_rank(value: f64, population: &[f64]) -> f64 {
    if population.is_empty() {
        return 0.0;
    }
    let at_or_below = population.iter().filter(|v| **v <= value).count();
    at_or_below as f64 / population.len() as f64 * 100.0
}

/// Quintile score 1–5 from how many members are as good or worse
///
/// `score = max(1, ceil(5 × as_good_or_worse / population))`. The best member
/// always scores 5 and tied members share a score.
pub fn quintile_score(as_good_or_worse: usize, population: usize) -> u8 {
    if population == 0 {
        return 1;
    }
    let scaled = (5 * as_good_or_worse).div_ceil(population);
    scaled.clamp(1, 5) as u8
}

/// Least-squares line `y = intercept + slope × x` over `x = 0..n`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
    /// Residual standard deviation (denominator `n - 2`, or `n` for tiny samples)
    pub residual_std: f64,
}

impl LinearFit {
    pub fn fit(values: &[f64]) -> Self {
        let n = values.len();
        if n == 0 {
            return Self {
                intercept: 0.0,
                slope: 0.0,
                residual_std: 0.0,
            };
        }

        let n_f = n as f64;
        let mean_x = (n_f - 1.0) / 2.0;
        let mean_y = values.iter().sum::<f64>() / n_f;

        let (mut sxy, mut sxx) = (0.0, 0.0);
        for (i, y) in values.iter().enumerate() {
            let dx = i as f64 - mean_x;
            sxy += dx * (y - mean_y);
            sxx += dx * dx;
        }
        let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
        let intercept = mean_y - slope * mean_x;

        let sse: f64 = values
            .iter()
            .enumerate()
            .map(|(i, y)| {
                let residual = y - (intercept + slope * i as f64);
                residual * residual
            })
            .sum();
        let dof = if n > 2 { n_f - 2.0 } else { n_f };

        Self {
            intercept,
            slope,
            residual_std: (sse / dof).sqrt(),
        }
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}
