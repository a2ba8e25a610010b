/// Lower bound of every risk score
pub const MIN_SCORE: f64 = 0.0;
/// Upper bound of every risk score
pub const MAX_SCORE: f64 = 100.0;
/// HHI of a perfect monopoly (one entity holding 100%)
pub const MAX_HHI: f64 = 10_000.0;

/// HHI → risk bands. Below 1500 is competitive, 1500-2500 moderately
/// concentrated, 2500-5000 highly concentrated, above 5000 near-monopoly.
const HHI_RISK_BREAKPOINTS: [(f64, f64); 5] = [
    (0.0, 0.0),
    (1_500.0, 30.0),
    (2_500.0, 60.0),
    (5_000.0, 90.0),
    (MAX_HHI, 100.0),
];

/// Clamp a score into [0, 100]. NaN collapses to 0.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_SCORE;
    }
    value.clamp(MIN_SCORE, MAX_SCORE)
}

/// Clamp a fraction into [0, 1]. NaN collapses to 0.
pub fn clamp_fraction(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Linearly interpolate `x` over a table of `(x, y)` breakpoints sorted by x.
///
/// Inputs outside the table clamp to the first/last y. An input landing
/// exactly on a breakpoint returns that breakpoint's y without arithmetic.
pub fn interpolate_breakpoints(x: f64, breakpoints: &[(f64, f64)]) -> f64 {
    let (first, last) = match (breakpoints.first(), breakpoints.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return 0.0,
    };

    if x.is_nan() || x <= first.0 {
        return first.1;
    }
    if x >= last.0 {
        return last.1;
    }

    for window in breakpoints.windows(2) {
        let (x0, y0) = window[0];
        let (x1, y1) = window[1];
        if x == x1 {
            return y1;
        }
        if x < x1 {
            let t = (x - x0) / (x1 - x0);
            return y0 + t * (y1 - y0);
        }
    }

    last.1
}

/// Largest finite positive entry. Magnitudes are divided by it before being
/// summed so that totals of finite inputs stay finite.
pub fn largest_positive<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold(None, |max: Option<f64>, v| Some(max.map_or(v, |m| m.max(v))))
}

/// Fraction of the positive total magnitude held by items matching
/// `predicate`. Zero, negative and non-finite magnitudes hold no share.
/// `None` when nothing has a positive magnitude.
pub fn share_where<T, M, P>(items: &[T], magnitude: M, predicate: P) -> Option<f64>
where
    M: Fn(&T) -> f64,
    P: Fn(&T) -> bool,
{
    let scale = largest_positive(items.iter().map(&magnitude))?;
    let (matched, total) = items
        .iter()
        .filter_map(|item| {
            let value = magnitude(item);
            (value.is_finite() && value > 0.0).then(|| (value / scale, predicate(item)))
        })
        .fold((0.0, 0.0), |(matched, total), (scaled, hit)| {
            (if hit { matched + scaled } else { matched }, total + scaled)
        });

    Some(clamp_fraction(matched / total))
}

/// Herfindahl-Hirschman index over a set of magnitudes.
///
/// Each positive value's share of the total is expressed as a percentage and
/// squared, so a monopoly scores 10000. Zero, negative and non-finite values
/// hold no share. An empty or all-zero input yields 0.
///
/// Values are rescaled by the largest entry first, and the index is taken as
/// `10000·Σx² / (Σx)²` with a single final division, so `n` equal entries of
/// any magnitude give exactly `10000 / n`.
pub fn calculate_hhi(values: &[f64]) -> f64 {
    let scale = match largest_positive(values.iter().copied()) {
        Some(scale) => scale,
        None => return 0.0,
    };

    let (total, sum_of_squares) = values
        .iter()
        .filter(|v| v.is_finite() && **v > 0.0)
        .map(|v| v / scale)
        .fold((0.0, 0.0), |(total, squares), x| (total + x, squares + x * x));

    (MAX_HHI * sum_of_squares / (total * total)).clamp(0.0, MAX_HHI)
}

/// Map an HHI value onto a 0-100 risk score using the concentration bands.
pub fn normalize_hhi_to_risk(hhi: f64) -> f64 {
    clamp_score(interpolate_breakpoints(hhi, &HHI_RISK_BREAKPOINTS))
}

/// Rescale `value` from `[min, max]` into `[0, 100]`, clamping both ends.
///
/// A degenerate range (`min == max`) has no meaningful position and maps to
/// the neutral midpoint 50.
pub fn normalize_to_100(value: f64, min: f64, max: f64) -> f64 {
    if min == max {
        return 50.0;
    }
    if value.is_nan() {
        return 50.0;
    }

    clamp_score((value - min) / (max - min) * 100.0)
}

/// Weighted mean of `(value, weight)` pairs. Returns `None` when the weights
/// sum to zero.
///
/// Values and weights are rescaled by their largest magnitudes before the
/// products are summed, so any finite input gives a finite mean.
pub fn weighted_mean<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let pairs: Vec<(f64, f64)> = pairs
        .into_iter()
        .filter(|(value, weight)| value.is_finite() && weight.is_finite() && *weight > 0.0)
        .collect();

    let weight_scale = largest_positive(pairs.iter().map(|(_, weight)| *weight))?;
    let value_scale = pairs.iter().map(|(value, _)| value.abs()).fold(0.0, f64::max);
    if value_scale == 0.0 {
        return Some(0.0);
    }

    let (weighted_sum, total_weight) =
        pairs.iter().fold((0.0, 0.0), |(sum, total), (value, weight)| {
            let w = weight / weight_scale;
            (sum + (value / value_scale) * w, total + w)
        });

    Some(weighted_sum / total_weight * value_scale)
}

/// Period-over-period fractional changes. Pairs with a non-positive base are skipped.
pub fn period_returns(series: &[f64]) -> Vec<f64> {
    series
        .windows(2)
        .filter(|w| w[0].is_finite() && w[1].is_finite() && w[0] > 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// Sample standard deviation. Fewer than two values yields 0.
pub fn standard_deviation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values
        .iter()
        .map(|x| {
            let diff = x - mean;
            diff * diff
        })
        .sum::<f64>()
        / (values.len() - 1) as f64;

    variance.sqrt()
}
