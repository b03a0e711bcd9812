use crate::data::TimeSeries;
use statrs::statistics::Statistics;
use std::collections::HashMap;

//close-to-close returns, undefined at the first observation
//and wherever either price is not finite
pub fn simple_returns(prices: &[f64]) -> Vec<Option<f64>> {
    let mut returns = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return returns;
    }

    returns.push(None);
    for window in prices.windows(2) {
        let (prev, curr) = (window[0], window[1]);
        let ret = curr / prev - 1.0;
        returns.push(if prev.is_finite() && curr.is_finite() {
            Some(ret)
        } else {
            None
        });
    }
    returns
}

//keeps only the positions where both values are defined
pub fn paired_values(x: &[Option<f64>], y: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
    x.iter()
        .zip(y.iter())
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) if !a.is_nan() && !b.is_nan() => Some((*a, *b)),
            _ => None,
        })
        .unzip()
}

//true when the values carry no variation beyond float rounding,
//judged against the largest magnitude in the sample
pub fn is_constant(values: &[f64]) -> bool {
    let variance = values.variance();
    if !variance.is_finite() {
        return true;
    }

    let scale = values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    variance <= f64::EPSILON * scale * scale
}

//ols slope of y regressed on x: cov(x, y) / var(x)
//NaN for fewer than two pairs or when either side is constant
pub fn ols_beta(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return f64::NAN;
    }

    if is_constant(x) || is_constant(y) {
        return f64::NAN;
    }

    x.covariance(y) / x.variance()
}

//ols slope between two return series with gaps
pub fn estimate_beta(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let (x, y) = paired_values(x, y);
    ols_beta(&x, &y)
}

//sample standard deviation (n - 1), NaN below two observations
pub fn sample_std(values: &[f64]) -> f64 {
    values.std_dev()
}

//quantile with linear interpolation between order statistics,
//NaN values are skipped and an empty input yields NaN
pub fn quantile(values: &[f64], q: f64) -> f64 {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return f64::NAN;
    }
    sorted.sort_by(f64::total_cmp);

    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

//pearson correlation, NaN for fewer than two pairs or a constant input
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return f64::NAN;
    }

    if is_constant(x) || is_constant(y) {
        return f64::NAN;
    }

    x.covariance(y) / (x.std_dev() * y.std_dev())
}

//pearson correlation of two series aligned on date
pub fn correlation_by_date(a: &TimeSeries, b: &TimeSeries) -> f64 {
    let lookup: HashMap<_, _> = b.iter().collect();
    let (x, y): (Vec<f64>, Vec<f64>) = a
        .iter()
        .filter_map(|(date, va)| match (va, lookup.get(&date).copied().flatten()) {
            (Some(va), Some(vb)) if !va.is_nan() && !vb.is_nan() => Some((va, vb)),
            _ => None,
        })
        .unzip();

    pearson(&x, &y)
}

//running sum of defined values, undefined values leave the sum unchanged
pub fn cumulative_sum(values: &[Option<f64>], scale: f64) -> Vec<Option<f64>> {
    let mut total = 0.0;
    values
        .iter()
        .map(|v| {
            v.map(|v| {
                total += v * scale;
                total
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const EPS: f64 = 1e-10;

    #[test]
    fn returns_of_single_price_are_undefined() {
        assert_eq!(simple_returns(&[5.0]), vec![None]);
        assert!(simple_returns(&[]).is_empty());
    }

    #[test]
    fn returns_skip_non_finite_prices() {
        let r = simple_returns(&[1.0, f64::NAN, 2.0, 3.0]);
        assert_eq!(r[0], None);
        assert_eq!(r[1], None);
        assert_eq!(r[2], None);
        assert!((r[3].unwrap() - 0.5).abs() < EPS);
    }

    #[test]
    fn beta_of_scaled_series() {
        let x = [0.01, -0.02, 0.03, 0.005, -0.01];
        let y: Vec<f64> = x.iter().map(|v| v * 1.7).collect();
        assert!((ols_beta(&x, &y) - 1.7).abs() < EPS);
    }

    #[test]
    fn beta_is_nan_for_constant_regressor() {
        assert!(ols_beta(&[0.01, 0.01, 0.01], &[0.02, -0.01, 0.03]).is_nan());
        assert!(ols_beta(&[0.01], &[0.02]).is_nan());
        assert!(estimate_beta(&[None, Some(0.1)], &[None, Some(0.2)]).is_nan());
    }

    #[test]
    fn beta_is_nan_for_constant_response() {
        assert!(ols_beta(&[0.01, -0.02, 0.03], &[0.0, 0.0, 0.0]).is_nan());
    }

    #[test]
    fn steady_growth_counts_as_constant() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        let returns: Vec<f64> = simple_returns(&prices).into_iter().flatten().collect();

        assert!(is_constant(&returns));
        assert!(is_constant(&[0.0, 0.0, 0.0]));
        assert!(!is_constant(&[0.01, -0.02, 0.015]));
        assert!(!is_constant(&[1e-6, 2e-6, 1.5e-6]));

        let other: Vec<f64> = (0..returns.len()).map(|i| (i as f64 * 0.7).sin() * 0.02).collect();
        assert!(ols_beta(&returns, &other).is_nan());
    }

    #[test]
    fn std_needs_two_values() {
        assert!(sample_std(&[]).is_nan());
        assert!(sample_std(&[1.0]).is_nan());
        assert!((sample_std(&[1.0, 2.0, 3.0, 4.0]) - 1.2909944487358056).abs() < EPS);
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let v = [4.0, 1.0, 3.0, 2.0];
        assert!((quantile(&v, 0.25) - 1.75).abs() < EPS);
        assert!((quantile(&v, 0.75) - 3.25).abs() < EPS);
        assert!((quantile(&v, 0.5) - 2.5).abs() < EPS);
        assert_eq!(quantile(&[7.0], 0.75), 7.0);
        assert!(quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn pearson_of_linear_series() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        let z = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&x, &y) - 1.0).abs() < EPS);
        assert!((pearson(&x, &z) + 1.0).abs() < EPS);
        assert!(pearson(&x, &[1.0, 1.0, 1.0, 1.0]).is_nan());
    }

    #[test]
    fn correlation_aligns_dates() {
        let d = |n| NaiveDate::from_ymd_opt(2024, 5, n).unwrap();
        let a = TimeSeries::new(
            "a",
            vec![d(1), d(2), d(3), d(4)],
            vec![None, Some(1.0), Some(2.0), Some(3.0)],
        );
        let b = TimeSeries::new(
            "b",
            vec![d(2), d(3), d(4), d(5)],
            vec![Some(-1.0), Some(-2.0), Some(-3.0), Some(9.0)],
        );
        assert!((correlation_by_date(&a, &b) + 1.0).abs() < EPS);
    }

    #[test]
    fn cumulative_sum_scales() {
        let c = cumulative_sum(&[None, Some(0.01), Some(0.02)], 100.0);
        assert_eq!(c[0], None);
        assert!((c[1].unwrap() - 1.0).abs() < EPS);
        assert!((c[2].unwrap() - 3.0).abs() < EPS);
    }
}
