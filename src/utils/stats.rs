/// Arithmetic mean of the finite-or-infinite values, NaN inputs are skipped.
///
/// Returns NaN when nothing is left to average, so a group made only of bad
/// rows stays visibly undefined instead of collapsing to zero.
pub fn nan_mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count > 0 {
        sum / count as f64
    } else {
        f64::NAN
    }
}

/// Min and max over the non-NaN values.
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}
