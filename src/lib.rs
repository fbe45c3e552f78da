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

//! Short-time Fourier analysis with overlap-add reconstruction.
//!
//! [`Stft`] runs in two modes:
//! - batch analysis ([`Stft::analyze`]): windowed, zero-padded frames are
//!   transformed independently and reduced to a half-spectrum representation
//! - overlap-add ([`Stft::overlap_add`]): one block in, one reconstructed block
//!   out, with the spectrum edited in between
//!
//! ```
//! use stft_ola::prelude::*;
//!
//! let config = StftConfig::<f32>::new(4, 4, 2, 8000, WindowType::Hann).unwrap();
//! let stft = Stft::new(config);
//! let signal = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
//! let frames = stft.analyze(&signal, Representation::Magnitude, None).unwrap();
//! assert_eq!(frames.len(), 2);
//! assert_eq!(frames[0].len(), 3);
//! ```

use log::debug;

pub mod config;
pub mod error;
pub mod fft_backend;
pub mod frames;
pub mod overlap_add;
pub mod processing;
pub mod simd;
pub mod utils;
pub mod window;

pub use config::StftConfig;
pub use error::{Result, StftError};
pub use fft_backend::{Complex, FftNum, SpectralTransform};
pub use frames::{FrameExtractor, FrameStride};
pub use overlap_add::OverlapAdd;
pub use processing::{Representation, SpectralEdit, magnitude, phase};
pub use utils::pad_center;
pub use window::{WindowType, apply_window, generate_window};

pub mod prelude {
    pub use crate::{
        DEFAULT_MAX_HOPS, Representation, SpectralEdit, SpectrumFrame, Stft, StftConfig,
        StftError, WindowType, magnitude, phase,
    };
}

/// Frame cap used when `analyze` is called without one.
pub const DEFAULT_MAX_HOPS: usize = 100_000;

/// Complex half-spectrum of one analysis frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumFrame<T> {
    pub freq_bins: usize,
    pub data: Vec<Complex<T>>,
}

impl<T: FftNum> SpectrumFrame<T> {
    pub fn new(freq_bins: usize) -> Self {
        Self {
            freq_bins,
            data: vec![Complex::new(T::zero(), T::zero()); freq_bins],
        }
    }

    pub fn from_data(data: Vec<Complex<T>>) -> Self {
        let freq_bins = data.len();
        Self { freq_bins, data }
    }

    pub fn real(&self) -> Vec<T> {
        self.data.iter().map(|c| c.re).collect()
    }

    pub fn imag(&self) -> Vec<T> {
        self.data.iter().map(|c| c.im).collect()
    }
}

/// STFT engine: owns the configuration, the transform plans and the
/// overlap-add state.
///
/// Analysis borrows the engine immutably and may run frames in parallel
/// (`parallel` feature). Overlap-add needs `&mut self`; share an engine across
/// threads behind a `Mutex`.
#[derive(Debug, Clone)]
pub struct Stft<T: FftNum> {
    config: StftConfig<T>,
    frames: FrameExtractor<T>,
    fft: SpectralTransform<T>,
    reconstructor: OverlapAdd<T>,
}

impl<T: FftNum> Stft<T> {
    pub fn new(config: StftConfig<T>) -> Self {
        let frames = FrameExtractor::new(&config);
        let fft = SpectralTransform::new(config.fft_size());
        let reconstructor = OverlapAdd::new(
            config.fft_size(),
            FrameStride::Advance.samples(&config),
            config.window_coefficients(config.fft_size()),
        );

        debug!(
            "stft engine ready: {} bins, analysis stride {}, overlap-add hop {}",
            config.freq_bins(),
            frames.stride(),
            config.hop_size()
        );

        Self {
            config,
            frames,
            fft,
            reconstructor,
        }
    }

    pub fn config(&self) -> &StftConfig<T> {
        &self.config
    }

    /// Number of analysis frames `analyze` would produce for `len` samples.
    pub fn num_hops(&self, len: usize, max_hops: Option<usize>) -> usize {
        self.frames.num_hops(len, max_hops.unwrap_or(DEFAULT_MAX_HOPS))
    }

    /// Analyze `signal` into per-frame half-spectrum representations.
    ///
    /// Signals shorter than the window produce no frames.
    pub fn analyze(
        &self,
        signal: &[T],
        representation: Representation<T>,
        max_hops: Option<usize>,
    ) -> Result<Vec<Vec<T>>> {
        self.analyze_with(signal, |re, im| representation.apply(re, im), max_hops)
    }

    /// [`Stft::analyze`] with an arbitrary reduction of each `(real, imag)` pair.
    pub fn analyze_with<F>(
        &self,
        signal: &[T],
        process: F,
        max_hops: Option<usize>,
    ) -> Result<Vec<Vec<T>>>
    where
        F: Fn(&[T], &[T]) -> Vec<T> + Sync,
    {
        let num_hops = self.num_hops(signal.len(), max_hops);
        let freq_bins = self.config.freq_bins();
        debug!("analyzing {} samples in {} frames", signal.len(), num_hops);

        map_hops(num_hops, |n| {
            let frame = self.frames.frame(signal, n)?;
            let (real, imag) = self.fft.forward(&frame);
            let mut result = process(&real, &imag);
            result.truncate(freq_bins);
            Ok(result)
        })
    }

    /// Analyze `signal` into raw complex half-spectra.
    pub fn analyze_spectrum(
        &self,
        signal: &[T],
        max_hops: Option<usize>,
    ) -> Result<Vec<SpectrumFrame<T>>> {
        let num_hops = self.num_hops(signal.len(), max_hops);
        let freq_bins = self.config.freq_bins();

        map_hops(num_hops, |n| {
            let frame = self.frames.frame(signal, n)?;
            let mut bins = self.fft.forward_complex(&frame);
            bins.truncate(freq_bins);
            Ok(SpectrumFrame::from_data(bins))
        })
    }

    /// Transform one prepared `fft_size` frame as-is (no window, no padding)
    /// and return the full-length representation.
    pub fn process_segment(
        &self,
        frame: &[T],
        representation: Representation<T>,
    ) -> Result<Vec<T>> {
        let n = self.config.fft_size();
        if frame.len() < n {
            return Err(StftError::InputTooShort {
                required: n,
                actual: frame.len(),
            });
        }
        let (real, imag) = self.fft.forward(&frame[..n]);
        Ok(representation.apply(&real, &imag))
    }

    /// Absorb one block of at least `fft_size` samples and return the next
    /// `fft_size` reconstructed samples.
    pub fn overlap_add(&mut self, buffer: &[T], edit: SpectralEdit<T>) -> Result<Vec<T>> {
        self.overlap_add_with(buffer, |re, im| edit.apply(re, im))
    }

    /// [`Stft::overlap_add`] with an arbitrary in-place spectrum edit.
    pub fn overlap_add_with<F>(&mut self, buffer: &[T], edit: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut [T], &mut [T]),
    {
        self.reconstructor.process(&self.fft, buffer, edit)
    }

    /// Overlap-add blocks absorbed since construction or the last reset.
    pub fn calls(&self) -> usize {
        self.reconstructor.calls()
    }

    /// Drop the overlap-add history; the next call starts cold again.
    pub fn reset(&mut self) {
        self.reconstructor.reset();
    }
}

/// Run `f` for every hop index and collect the results in hop order.
fn map_hops<R, F>(num_hops: usize, f: F) -> Result<Vec<R>>
where
    R: Send,
    F: Fn(usize) -> Result<R> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        (0..num_hops).into_par_iter().map(f).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..num_hops).map(f).collect()
    }
}
