//! Spectral processing functions.
//!
//! Analysis reduces a `(real, imag)` spectrum to one value per bin through a
//! [`Representation`]; overlap-add edits the spectrum in place through a
//! [`SpectralEdit`] before it is transformed back. Both are small closed sets;
//! anything stateful goes through the closure entry points on [`crate::Stft`].

use num_traits::Float;

use crate::simd;

/// Elementwise `sqrt(re^2 + im^2)`.
pub fn magnitude<T: Float + 'static>(real: &[T], imag: &[T]) -> Vec<T> {
    let mut output = vec![T::zero(); real.len()];
    simd::compute_magnitudes(real, imag, &mut output);
    output
}

/// Elementwise `atan(im / re)`.
///
/// Single-argument arctangent: results lie in `[-pi/2, pi/2]` and the sign of
/// the real part is lost. `re == 0` follows IEEE division (`+-pi/2`, or NaN for
/// an all-zero bin).
pub fn phase<T: Float>(real: &[T], imag: &[T]) -> Vec<T> {
    real.iter()
        .zip(imag)
        .map(|(&re, &im)| (im / re).atan())
        .collect()
}

/// Per-bin representation produced by analysis.
#[derive(Debug, Clone, Copy, Default)]
pub enum Representation<T> {
    #[default]
    Magnitude,
    Phase,
    Custom(fn(&[T], &[T]) -> Vec<T>),
}

impl<T: Float + 'static> Representation<T> {
    pub fn apply(&self, real: &[T], imag: &[T]) -> Vec<T> {
        debug_assert_eq!(real.len(), imag.len());
        match self {
            Representation::Magnitude => magnitude(real, imag),
            Representation::Phase => phase(real, imag),
            Representation::Custom(f) => f(real, imag),
        }
    }
}

/// In-place spectrum edit applied by overlap-add before the inverse transform.
#[derive(Debug, Clone, Copy, Default)]
pub enum SpectralEdit<T> {
    #[default]
    Identity,
    Custom(fn(&mut [T], &mut [T])),
}

impl<T> SpectralEdit<T> {
    pub fn apply(&self, real: &mut [T], imag: &mut [T]) {
        match self {
            SpectralEdit::Identity => {}
            SpectralEdit::Custom(f) => f(real, imag),
        }
    }
}
