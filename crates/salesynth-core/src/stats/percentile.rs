//! Percentile computation with linear interpolation between closest ranks,
//! matching the conventional definition used by most statistics tooling.

/// Compute the q-th percentile (0–100) of an ascending-sorted sample.
///
/// Uses linear interpolation: rank = (n - 1) * q / 100, interpolating
/// between the two nearest data points. Returns `None` for an empty sample.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let n = sorted.len();
    if n == 1 {
        return Some(sorted[0]);
    }
    let rank = (n - 1) as f64 * (q / 100.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Median of an ascending-sorted sample.
pub fn median_sorted(sorted: &[f64]) -> Option<f64> {
    percentile_sorted(sorted, 50.0)
}
