//! Overlap-add reconstruction across successive calls.
//!
//! Every call consumes one input block of at least N samples and returns N
//! samples. The output of call `k` resolves the block given to call `k - 1`, so
//! the first output only carries the zeroed start-up state.

use log::trace;

use crate::error::{Result, StftError};
use crate::fft_backend::{FftNum, SpectralTransform};
use crate::simd;
use crate::window::apply_window;

/// Reconstruction state carried from one call to the next.
#[derive(Debug, Clone)]
pub struct OverlapAdd<T: FftNum> {
    fft_size: usize,
    hop_size: usize,
    window: Vec<T>,
    previous_raw: Vec<T>,
    previous_processed: Vec<T>,
    calls: usize,
}

impl<T: FftNum> OverlapAdd<T> {
    /// `window` must hold `fft_size` coefficients; `hop_size` is the advance
    /// between calls.
    pub fn new(fft_size: usize, hop_size: usize, window: Vec<T>) -> Self {
        debug_assert_eq!(window.len(), fft_size);
        Self {
            fft_size,
            hop_size,
            window,
            previous_raw: vec![T::zero(); fft_size],
            previous_processed: vec![T::zero(); fft_size],
            calls: 0,
        }
    }

    /// Number of blocks absorbed since construction or the last reset.
    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn is_cold(&self) -> bool {
        self.calls == 0
    }

    pub fn reset(&mut self) {
        self.previous_raw.fill(T::zero());
        self.previous_processed.fill(T::zero());
        self.calls = 0;
    }

    /// Window, transform, edit and inverse-transform one N-sample block.
    fn round_trip<F>(&self, fft: &SpectralTransform<T>, block: &[T], edit: &mut F) -> Vec<T>
    where
        F: FnMut(&mut [T], &mut [T]),
    {
        let windowed = apply_window(block, &self.window);
        let (mut real, mut imag) = fft.forward(&windowed);
        edit(&mut real, &mut imag);
        fft.inverse(&real, &imag)
    }

    /// Absorb `buffer` and return the next N reconstructed samples.
    ///
    /// State is only touched once the whole call has succeeded.
    pub fn process<F>(
        &mut self,
        fft: &SpectralTransform<T>,
        buffer: &[T],
        mut edit: F,
    ) -> Result<Vec<T>>
    where
        F: FnMut(&mut [T], &mut [T]),
    {
        let n = self.fft_size;
        let hop = self.hop_size;
        if buffer.len() < n {
            return Err(StftError::InputTooShort {
                required: n,
                actual: buffer.len(),
            });
        }
        debug_assert_eq!(fft.len(), n);

        // Block straddling the previous and current input
        let mut straddle = Vec::with_capacity(n);
        straddle.extend_from_slice(&self.previous_raw[hop..]);
        straddle.extend_from_slice(&buffer[..hop]);

        let overlap_processed = self.round_trip(fft, &straddle, &mut edit);
        let mut current_processed = self.round_trip(fft, &buffer[..n], &mut edit);

        // Leading half of the straddle completes the previous block
        let span = hop.min(n - hop);
        let mut output = self.previous_processed.clone();
        simd::accumulate(&overlap_processed[..span], &mut output[hop..hop + span]);

        // Trailing part belongs to the next output
        let carry = n - hop;
        simd::accumulate(&overlap_processed[hop..], &mut current_processed[..carry]);

        self.previous_processed = current_processed;
        self.previous_raw.copy_from_slice(&buffer[..n]);
        self.calls += 1;

        trace!(
            "overlap-add call {}: consumed {} samples, hop {}",
            self.calls,
            buffer.len(),
            hop
        );

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{WindowType, generate_window};

    fn reconstructor(
        n: usize,
        hop: usize,
        window: WindowType,
    ) -> (OverlapAdd<f64>, SpectralTransform<f64>) {
        let coefficients = generate_window(window, n, None);
        (OverlapAdd::new(n, hop, coefficients), SpectralTransform::new(n))
    }

    #[test]
    fn test_cold_start_output_is_zero() {
        let (mut ola, fft) = reconstructor(8, 4, WindowType::Hann);
        assert!(ola.is_cold());

        let out = ola.process(&fft, &[1.0; 8], |_, _| {}).expect("Block is long enough");
        assert_eq!(out.len(), 8);
        // Samples before the hop come only from the zeroed accumulator
        assert!(out[..4].iter().all(|&x| x == 0.0));
        assert_eq!(ola.calls(), 1);
    }

    #[test]
    fn test_short_input_leaves_state_untouched() {
        let (mut ola, fft) = reconstructor(8, 4, WindowType::Hann);
        ola.process(&fft, &[0.5; 8], |_, _| {}).expect("Block is long enough");
        let before = ola.clone();

        let err = ola.process(&fft, &[1.0; 7], |_, _| {});
        assert_eq!(err, Err(StftError::InputTooShort { required: 8, actual: 7 }));
        assert_eq!(ola.calls(), 1);
        assert_eq!(ola.previous_raw, before.previous_raw);
        assert_eq!(ola.previous_processed, before.previous_processed);
    }

    #[test]
    fn test_rectangular_half_hop_state_layout() {
        let (mut ola, fft) = reconstructor(4, 2, WindowType::Rectangular);
        let first = [1.0, 2.0, 3.0, 4.0];

        let out = ola.process(&fft, &first, |_, _| {}).expect("Block is long enough");
        // Straddle = [0, 0, 1, 2]; its leading half lands in [2, 4)
        for x in &out {
            assert!(x.abs() < 1e-12);
        }
        // Accumulator = block + straddle tail at the front
        let expected = [2.0, 4.0, 3.0, 4.0];
        for (a, b) in ola.previous_processed.iter().zip(expected) {
            assert!((a - b).abs() < 1e-12, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_reset_returns_to_cold_state() {
        let (mut ola, fft) = reconstructor(16, 8, WindowType::Hann);
        let block: Vec<f64> = (0..16).map(|i| i as f64).collect();
        ola.process(&fft, &block, |_, _| {}).expect("Block is long enough");
        ola.process(&fft, &block, |_, _| {}).expect("Block is long enough");

        ola.reset();
        assert!(ola.is_cold());
        assert!(ola.previous_raw.iter().all(|&x| x == 0.0));
        assert!(ola.previous_processed.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_extra_input_beyond_n_is_ignored() {
        let (mut a, fft) = reconstructor(8, 4, WindowType::Hann);
        let (mut b, _) = reconstructor(8, 4, WindowType::Hann);

        let block: Vec<f64> = (0..8).map(|i| (i as f64 * 0.3).cos()).collect();
        let mut longer = block.clone();
        longer.extend_from_slice(&[9.0; 5]);

        for _ in 0..3 {
            let x = a.process(&fft, &block, |_, _| {}).expect("Block is long enough");
            let y = b.process(&fft, &longer, |_, _| {}).expect("Block is long enough");
            assert_eq!(x, y);
        }
    }
}
