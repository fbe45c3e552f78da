use log::debug;

use crate::error::{Result, StftError};
use crate::fft_backend::FftNum;
use crate::utils::constant;
use crate::window::{WindowType, generate_window};

/// Engine configuration, validated once and immutable afterwards.
///
/// Fields are private so [`StftConfig::new`] is the only way to build one:
///
/// ```compile_fail
/// use stft_ola::{StftConfig, WindowType};
///
/// let config = StftConfig::<f32> {
///     window_size: 4,
///     fft_size: 4,
///     hop_size: 8,
///     sample_rate: 8000,
///     window: WindowType::Hann,
///     window_alpha: None,
/// };
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StftConfig<T: FftNum> {
    window_size: usize,
    fft_size: usize,
    hop_size: usize,
    sample_rate: u32,
    window: WindowType,
    window_alpha: Option<T>,
}

impl<T: FftNum> StftConfig<T> {
    pub fn new(
        window_size: usize,
        fft_size: usize,
        hop_size: usize,
        sample_rate: u32,
        window: WindowType,
    ) -> Result<Self> {
        if window_size == 0 {
            return Err(StftError::InvalidWindowSize);
        }
        if hop_size == 0 || hop_size > window_size {
            return Err(StftError::InvalidHopSize {
                hop_size,
                window_size,
            });
        }
        if fft_size < window_size {
            return Err(StftError::InvalidFftSize {
                fft_size,
                window_size,
            });
        }

        debug!(
            "stft config: window={} fft={} hop={} rate={} {:?}",
            window_size, fft_size, hop_size, sample_rate, window
        );

        Ok(Self {
            window_size,
            fft_size,
            hop_size,
            sample_rate,
            window,
            window_alpha: None,
        })
    }

    /// 1024-sample Hann frames, 512 hop, 44.1 kHz.
    pub fn default_1024() -> Self {
        Self::new(1024, 1024, 512, 44_100, WindowType::Hann)
            .expect("Default config should always be valid")
    }

    /// Samples per analysis frame before zero padding.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Transform length N; frames are centre-padded up to it.
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Informational only; used for bin and hop frequency/time conversions.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn window(&self) -> WindowType {
        self.window
    }

    pub fn window_alpha(&self) -> Option<T> {
        self.window_alpha
    }

    /// Set the shape parameter of a parameterized window.
    pub fn with_alpha(mut self, alpha: T) -> Self {
        self.window_alpha = Some(alpha);
        self
    }

    /// Non-redundant half-spectrum length, `floor(N / 2) + 1`.
    pub fn freq_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Distance between consecutive analysis frame starts, `window_size - hop_size`.
    pub fn overlap_stride(&self) -> usize {
        self.window_size - self.hop_size
    }

    pub fn overlap_percent(&self) -> T {
        let hop = constant::<T>(self.hop_size as f64);
        let window = constant::<T>(self.window_size as f64);
        (T::one() - hop / window) * constant::<T>(100.0)
    }

    /// Center frequency of `bin` in Hz.
    pub fn bin_frequency(&self, bin: usize) -> T {
        constant::<T>(bin as f64 * self.sample_rate as f64 / self.fft_size as f64)
    }

    /// Duration of one overlap-add hop in seconds.
    pub fn hop_duration(&self) -> T {
        constant::<T>(self.hop_size as f64 / self.sample_rate as f64)
    }

    /// Window coefficients of arbitrary length for this configuration's window.
    pub fn window_coefficients(&self, len: usize) -> Vec<T> {
        generate_window(self.window, len, self.window_alpha)
    }

    /// Relative ripple of the overlap-add gain, `w[i] + w[i + hop_size]` over
    /// `[0, fft_size - hop_size)`, using `fft_size` window coefficients.
    ///
    /// Overlap-add only ever sums two shifted frames, so the output has a
    /// position-independent gain only when `hop_size` is exactly half of
    /// `fft_size`. Any other hop reports an infinite ripple. Zero means the
    /// output is the previous block scaled by one constant.
    pub fn cola_ripple(&self) -> f64 {
        let n = self.fft_size;
        let hop = self.hop_size;
        if 2 * hop != n {
            return f64::INFINITY;
        }

        let window: Vec<f64> = self
            .window_coefficients(n)
            .iter()
            .map(|w| w.to_f64().unwrap_or(0.0))
            .collect();
        let (min_sum, max_sum) = window[..n - hop]
            .iter()
            .zip(&window[hop..])
            .map(|(a, b)| a + b)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), g| {
                (lo.min(g), hi.max(g))
            });

        if max_sum < 1e-9 {
            return f64::INFINITY;
        }
        (max_sum - min_sum) / max_sum
    }

    /// Check that overlap-add applies a constant gain within `tolerance`.
    pub fn validate_cola(&self, tolerance: f64) -> Result<()> {
        let ripple = self.cola_ripple();
        if ripple < tolerance {
            Ok(())
        } else {
            Err(StftError::ColaViolation { ripple, tolerance })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = StftConfig::<f32>::default_1024();
        let rebuilt = StftConfig::<f32>::new(1024, 1024, 512, 44_100, WindowType::Hann);
        assert_eq!(rebuilt, Ok(config));
    }

    #[test]
    fn test_derived_quantities() {
        let config = StftConfig::<f64>::new(400, 512, 100, 16_000, WindowType::Hamming)
            .expect("Config should be valid");
        assert_eq!(config.freq_bins(), 257);
        assert_eq!(config.overlap_stride(), 300);
        assert!((config.overlap_percent() - 75.0).abs() < 1e-12);
        assert!((config.bin_frequency(256) - 8000.0).abs() < 1e-9);
        assert!((config.hop_duration() - 0.00625).abs() < 1e-12);
    }

    #[test]
    fn test_odd_fft_size_bins() {
        let config = StftConfig::<f32>::new(5, 7, 2, 8000, WindowType::Hann)
            .expect("Config should be valid");
        assert_eq!(config.freq_bins(), 4);
    }

    #[test]
    fn test_cola_rectangular_half_overlap() {
        let config = StftConfig::<f64>::new(64, 64, 32, 8000, WindowType::Rectangular)
            .expect("Config should be valid");
        assert_eq!(config.cola_ripple(), 0.0);
        assert!(config.validate_cola(1e-9).is_ok());
    }

    #[test]
    fn test_cola_hann_half_overlap_is_close() {
        let config = StftConfig::<f64>::default_1024();
        assert!(config.cola_ripple() < 1e-2);
    }

    #[test]
    fn test_cola_requires_half_fft_hop() {
        // Rectangular windows tile at a quarter hop, but overlap-add only sums two frames
        let config = StftConfig::<f64>::new(8, 8, 2, 8000, WindowType::Rectangular)
            .expect("Config should be valid");
        assert!(config.cola_ripple().is_infinite());
        assert!(matches!(
            config.validate_cola(1e-9),
            Err(StftError::ColaViolation { .. })
        ));

        // Odd transform lengths have no half hop
        let config = StftConfig::<f64>::new(7, 7, 3, 8000, WindowType::Rectangular)
            .expect("Config should be valid");
        assert!(config.validate_cola(1e-9).is_err());
    }

    #[test]
    fn test_cola_uses_fft_length_window() {
        // Padding beyond the analysis window: the gain follows the N-length window
        let config = StftConfig::<f64>::new(16, 32, 16, 8000, WindowType::Rectangular)
            .expect("Config should be valid");
        assert_eq!(config.cola_ripple(), 0.0);
    }

    #[test]
    fn test_cola_violation_reported() {
        let config = StftConfig::<f64>::new(64, 64, 48, 8000, WindowType::Hann)
            .expect("Config should be valid");
        assert!(matches!(
            config.validate_cola(1e-4),
            Err(StftError::ColaViolation { .. })
        ));
    }
}
