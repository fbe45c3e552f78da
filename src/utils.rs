/// Utility functions shared by framing and the engine
use num_traits::Float;

/// Convert an `f64` literal into the working float type.
///
/// `f32` and `f64` accept every finite `f64`, so the NaN fallback is never hit
/// for the sample types this crate supports.
#[inline]
pub(crate) fn constant<T: Float>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::nan)
}

/// Leading and trailing zero counts for centring `len` samples in `target` slots.
///
/// Both sides get `floor((target - len) / 2)`; when the difference is odd one
/// extra zero goes at the end. Returns `(0, 0)` when `len >= target`.
pub fn center_padding(len: usize, target: usize) -> (usize, usize) {
    let pad = target.saturating_sub(len);
    let side = pad / 2;
    let trailing = if len + 2 * side < target { side + 1 } else { side };
    (side, trailing)
}

/// Zero-pad `samples` symmetrically to exactly `target` samples.
///
/// Inputs already at least `target` long are returned unchanged.
pub fn pad_center<T: Float>(samples: &[T], target: usize) -> Vec<T> {
    let (leading, trailing) = center_padding(samples.len(), target);
    let mut padded = Vec::with_capacity(leading + samples.len() + trailing);
    padded.resize(leading, T::zero());
    padded.extend_from_slice(samples);
    padded.resize(leading + samples.len() + trailing, T::zero());
    padded
}
