/*MIT License

Copyright (c) 2025 David Maseda Neira

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Fixed-size spectral transform
//!
//! Wraps a pair of `rustfft` plans of one size N behind a split real/imaginary
//! interface:
//! - `forward`: N real samples -> (real, imag), each of length N
//! - `inverse`: (real, imag) -> N real samples, normalized by 1/N
//!
//! The plans are immutable once built, so one `SpectralTransform` can be shared
//! by every frame of an analysis, including across worker threads.

use std::fmt;
use std::sync::Arc;

use num_traits::{Float, FromPrimitive};
pub use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::simd;

/// Sample types accepted by the transform (`f32` and `f64`).
pub trait FftNum: Float + FromPrimitive + rustfft::FftNum + fmt::Debug {}

impl FftNum for f32 {}
impl FftNum for f64 {}

#[derive(Clone)]
pub struct SpectralTransform<T: FftNum> {
    size: usize,
    forward: Arc<dyn Fft<T>>,
    inverse: Arc<dyn Fft<T>>,
}

impl<T: FftNum> SpectralTransform<T> {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);

        Self {
            size,
            forward,
            inverse,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Forward transform of exactly `len()` real samples.
    pub fn forward(&self, frame: &[T]) -> (Vec<T>, Vec<T>) {
        debug_assert_eq!(frame.len(), self.size);

        let mut buffer: Vec<Complex<T>> = frame
            .iter()
            .map(|&x| Complex::new(x, T::zero()))
            .collect();
        self.forward.process(&mut buffer);

        buffer.into_iter().map(|c| (c.re, c.im)).unzip()
    }

    /// Forward transform returning the interleaved complex bins.
    pub fn forward_complex(&self, frame: &[T]) -> Vec<Complex<T>> {
        debug_assert_eq!(frame.len(), self.size);

        let mut buffer: Vec<Complex<T>> = frame
            .iter()
            .map(|&x| Complex::new(x, T::zero()))
            .collect();
        self.forward.process(&mut buffer);
        buffer
    }

    /// Inverse transform; returns the real part scaled by 1/N.
    pub fn inverse(&self, real: &[T], imag: &[T]) -> Vec<T> {
        debug_assert_eq!(real.len(), self.size);
        debug_assert_eq!(imag.len(), self.size);

        let mut buffer: Vec<Complex<T>> = real
            .iter()
            .zip(imag)
            .map(|(&re, &im)| Complex::new(re, im))
            .collect();
        self.inverse.process(&mut buffer);

        let time: Vec<T> = buffer.iter().map(|c| c.re).collect();
        let scale = T::one() / T::from_usize(self.size).unwrap_or_else(T::one);
        let mut output = vec![T::zero(); self.size];
        simd::scale_slice(&time, scale, &mut output);
        output
    }
}

impl<T: FftNum> fmt::Debug for SpectralTransform<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectralTransform")
            .field("size", &self.size)
            .finish()
    }
}
