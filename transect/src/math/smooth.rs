use num_traits::Float;

/// Centered moving average over `2 * radius + 1` samples.
///
/// Near either end the window is clipped to the samples that exist,
/// so the output always has the same length as `values`.
pub fn moving_average<T: Float>(values: &[T], radius: usize) -> Vec<T> {
    (0..values.len())
        .map(|i| {
            let lo = i.saturating_sub(radius);
            let hi = (i + radius + 1).min(values.len());
            let (sum, count) = values[lo..hi]
                .iter()
                .fold((T::zero(), T::zero()), |(sum, count), &v| {
                    (sum + v, count + T::one())
                });
            sum / count
        })
        .collect()
}
