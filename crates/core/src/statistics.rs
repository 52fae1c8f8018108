//! Descriptive statistics over a quote history.
//!
//! All four moments use sample-based definitions with bias correction:
//! unbiased variance (divided by `n - 1`), the adjusted Fisher-Pearson skewness
//! coefficient `G1` and the bias-corrected excess kurtosis `G2`. The same
//! convention holds for every index.

use serde::Serialize;

/// The four descriptive moments of a series of observations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Moments {
    pub mean: f64,
    pub variance: f64,
    pub skew: f64,
    pub kurtosis: f64,
}

/// Computes mean, variance, skew and excess kurtosis of `values`.
///
/// Returns `None` for an empty slice. A single observation has zero variance,
/// skew and kurtosis, as does a series with no dispersion. The skew correction
/// needs more than two observations and the kurtosis correction more than
/// three; below that the uncorrected coefficients are returned.
pub fn describe(values: &[f64]) -> Option<Moments> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;

    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for value in values {
        let d = value - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }

    let variance = if values.len() > 1 { m2 / (n - 1.0) } else { 0.0 };

    m2 /= n;
    m3 /= n;
    m4 /= n;

    // Rounding noise on a constant series must not turn into a huge skew.
    if m2 <= (f64::EPSILON * mean).powi(2) {
        return Some(Moments {
            mean,
            variance,
            skew: 0.0,
            kurtosis: 0.0,
        });
    }

    let g1 = m3 / m2.powf(1.5);
    let g2 = m4 / (m2 * m2) - 3.0;

    let skew = if values.len() > 2 {
        g1 * (n * (n - 1.0)).sqrt() / (n - 2.0)
    } else {
        g1
    };

    let kurtosis = if values.len() > 3 {
        ((n + 1.0) * g2 + 6.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0))
    } else {
        g2
    };

    Some(Moments {
        mean,
        variance,
        skew,
        kurtosis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_empty_input_has_no_moments() {
        assert_eq!(describe(&[]), None);
    }

    #[test]
    fn test_single_value() {
        let moments = describe(&[2000.0]).unwrap();
        assert_close(moments.mean, 2000.0);
        assert_eq!(moments.variance, 0.0);
        assert_eq!(moments.skew, 0.0);
        assert_eq!(moments.kurtosis, 0.0);
    }

    #[test]
    fn test_two_values() {
        let moments = describe(&[2000.0, 1900.0]).unwrap();
        assert_close(moments.mean, 1950.0);
        assert_close(moments.variance, 5000.0);
        assert_close(moments.skew, 0.0);
        // No correction below four observations: g2 of two points is -2.
        assert_close(moments.kurtosis, -2.0);
    }

    #[test]
    fn test_three_quotes_from_harness() {
        let moments = describe(&[2000.0, 1900.0, 1800.0]).unwrap();
        assert_close(moments.mean, 1900.0);
        assert_close(moments.variance, 10000.0);
        assert_close(moments.skew, 0.0);
        assert_close(moments.kurtosis, -1.5);
    }

    #[test]
    fn test_skewed_series() {
        let moments = describe(&[1.0, 2.0, 3.0, 4.0, 10.0]).unwrap();
        assert_close(moments.mean, 4.0);
        assert_close(moments.variance, 12.5);
        assert!((moments.skew - 1.6970562748477143).abs() < 1e-9);
        assert!((moments.kurtosis - 3.152).abs() < 1e-9);
    }

    #[test]
    fn test_constant_series_has_no_shape() {
        let moments = describe(&[1800.5; 6]).unwrap();
        assert_close(moments.mean, 1800.5);
        assert_eq!(moments.variance, 0.0);
        assert_eq!(moments.skew, 0.0);
        assert_eq!(moments.kurtosis, 0.0);
    }

    #[test]
    fn test_order_does_not_matter() {
        let forward = describe(&[3.0, 7.0, 1.0, 9.0, 4.0]).unwrap();
        let backward = describe(&[4.0, 9.0, 1.0, 7.0, 3.0]).unwrap();
        assert_close(forward.mean, backward.mean);
        assert_close(forward.variance, backward.variance);
        assert_close(forward.skew, backward.skew);
        assert_close(forward.kurtosis, backward.kurtosis);
    }
}
