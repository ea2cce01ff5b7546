//! Descriptive statistics over small numeric series.
//!
//! All functions are pure. Quantiles use linear interpolation between order
//! statistics (R-7): position `(n - 1) * q` on the sorted series.

use serde::Serialize;

/// Aggregate description of a numeric series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub p10: f64,
    pub p90: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    /// Population standard deviation
    pub stddev: f64,
    /// Coefficient of variation, 0 when the mean is 0
    pub cv: f64,
    pub min: f64,
    pub max: f64,
    pub spread: f64,
}

/// Quantile `q` in [0, 1] of an already sorted, non-empty series
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let fraction = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Describe `values`; `None` for an empty series.
pub fn describe(values: &[f64]) -> Option<Summary> {
    let mean = mean(values)?;
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();
    let q1 = quantile(&sorted, 0.25);
    let q3 = quantile(&sorted, 0.75);
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    Some(Summary {
        count: values.len(),
        mean,
        median: quantile(&sorted, 0.5),
        p10: quantile(&sorted, 0.1),
        p90: quantile(&sorted, 0.9),
        q1,
        q3,
        iqr: q3 - q1,
        stddev,
        cv: if mean == 0.0 { 0.0 } else { stddev / mean },
        min,
        max,
        spread: max - min,
    })
}

/// Pearson product-moment correlation.
///
/// `None` when either series is empty, the lengths differ, or either side
/// has zero variance.
pub fn correlation(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() {
        return None;
    }
    let mean_x = mean(xs)?;
    let mean_y = mean(ys)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// One equal-width histogram bin, `[lower, upper)` except for the last bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram over `[min, max]` with `bins` bins.
///
/// The maximum is counted in the last bin. A constant series gives a single bin.
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == min {
        return vec![Bin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();
    for v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_describe_four_values() {
        let s = describe(&[10.0, 20.0, 30.0, 40.0]).unwrap();
        assert_eq!(s.count, 4);
        assert!(approx(s.mean, 25.0));
        assert!(approx(s.median, 25.0));
        assert!(approx(s.p10, 13.0));
        assert!(approx(s.p90, 37.0));
        assert!(approx(s.q1, 17.5));
        assert!(approx(s.q3, 32.5));
        assert!(approx(s.iqr, 15.0));
        assert!(approx(s.stddev, 125f64.sqrt()));
        assert!((s.cv - 0.447).abs() < 1e-3);
        assert_eq!((s.min, s.max, s.spread), (10.0, 40.0, 30.0));
    }

    #[test]
    fn test_describe_unsorted_and_single() {
        let s = describe(&[40.0, 10.0, 30.0, 20.0]).unwrap();
        assert!(approx(s.p10, 13.0));

        let one = describe(&[5.0]).unwrap();
        assert_eq!((one.median, one.p90, one.stddev), (5.0, 5.0, 0.0));
    }

    #[test]
    fn test_describe_empty_and_zero_mean() {
        assert!(describe(&[]).is_none());
        let s = describe(&[-1.0, 1.0]).unwrap();
        assert_eq!(s.cv, 0.0);
    }

    #[test]
    fn test_correlation() {
        let r = correlation(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
        assert!(approx(r, 1.0));

        let neg = correlation(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert!(approx(neg, -1.0));

        assert_eq!(correlation(&[1.0, 1.0, 1.0], &[2.0, 3.0, 4.0]), None);
        assert_eq!(correlation(&[], &[]), None);
        assert_eq!(correlation(&[1.0, 2.0], &[1.0]), None);
    }

    #[test]
    fn test_histogram() {
        let bins = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[1].count, 3);
        assert_eq!(bins[1].upper, 4.0);

        let flat = histogram(&[7.0, 7.0], 5);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].count, 2);

        assert!(histogram(&[], 4).is_empty());
    }
}
