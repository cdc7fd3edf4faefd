/// Percentile helpers for already-sorted slices.
///
/// The percentile `q` of `N` samples is the element at `floor(q / 100 * N)`,
/// clamped to the last index. Empty input => `None`.

/// Returns the percentile value from a slice that is already sorted in
/// ascending order.
pub fn value_sorted<T: Copy>(sorted_values: &[T], percentile: f64) -> Option<T> {
    if sorted_values.is_empty() {
        return None;
    }

    let last = sorted_values.len() - 1;
    let index = if percentile <= 0.0 {
        0
    } else {
        let position = (percentile / 100.0 * sorted_values.len() as f64).floor() as usize;
        position.min(last)
    };

    sorted_values.get(index).copied()
}

/// Convenience wrapper for `f64` samples.
pub fn value_f64_sorted(sorted_values: &[f64], percentile: f64) -> f64 {
    value_sorted(sorted_values, percentile).unwrap_or(0.0)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
