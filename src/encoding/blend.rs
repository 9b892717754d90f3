//! Blending of per-category estimates toward the global prior.

/// Blending weight for a group of `count` rows.
///
/// `lambda = 1 / (1 + exp(-(count - inflection_point) / smoothing))`
///
/// Monotonically increasing in `count`, exactly 0.5 when `count` equals
/// `inflection_point`: small groups lean on the prior, large groups on
/// their own mean.
#[inline]
pub(crate) fn lambda(count: u64, inflection_point: f64, smoothing: f64) -> f64 {
    1.0 / (1.0 + (-(count as f64 - inflection_point) / smoothing).exp())
}

/// Blend a group mean with the prior using [`lambda`].
#[inline]
pub(crate) fn blended_estimate(
    count: u64,
    mean: f64,
    prior: f64,
    inflection_point: f64,
    smoothing: f64,
) -> f64 {
    let lambda = lambda(count, inflection_point, smoothing);
    lambda * mean + (1.0 - lambda) * prior
}
