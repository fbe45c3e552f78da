//! Frame extraction for batch analysis.
//!
//! Two stride conventions exist in this crate and are kept apart on purpose:
//!
//! - [`FrameStride::Overlap`]: analysis frames start `window_size - hop_size`
//!   samples apart, so `hop_size` is read as the number of overlapping samples.
//! - [`FrameStride::Advance`]: overlap-add calls advance by `hop_size` samples.
//!
//! Unifying them would change the analysis frame cadence.

use crate::config::StftConfig;
use crate::error::{Result, StftError};
use crate::fft_backend::FftNum;
use crate::utils::pad_center;
use crate::window::apply_window;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStride {
    /// `window_size - hop_size` between frame starts.
    Overlap,
    /// `hop_size` between frame starts.
    Advance,
}

impl FrameStride {
    pub fn samples<T: FftNum>(self, config: &StftConfig<T>) -> usize {
        match self {
            FrameStride::Overlap => config.overlap_stride(),
            FrameStride::Advance => config.hop_size(),
        }
    }
}

/// Slices, windows and pads analysis frames out of a source buffer.
#[derive(Debug, Clone)]
pub struct FrameExtractor<T: FftNum> {
    window_size: usize,
    fft_size: usize,
    stride: usize,
    window: Vec<T>,
}

impl<T: FftNum> FrameExtractor<T> {
    pub fn new(config: &StftConfig<T>) -> Self {
        Self {
            window_size: config.window_size(),
            fft_size: config.fft_size(),
            stride: FrameStride::Overlap.samples(config),
            window: config.window_coefficients(config.window_size()),
        }
    }

    /// Frame start spacing in samples.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of whole frames in a buffer of `len` samples, capped at `max_hops`.
    ///
    /// A zero stride (hop equal to window) yields a single frame at offset 0.
    pub fn num_hops(&self, len: usize, max_hops: usize) -> usize {
        if len < self.window_size {
            return 0;
        }
        let available = match self.stride {
            0 => 1,
            stride => (len - self.window_size) / stride + 1,
        };
        available.min(max_hops)
    }

    /// Sample range of frame `index`.
    pub fn frame_range(&self, index: usize) -> std::ops::Range<usize> {
        let start = index * self.stride;
        start..start + self.window_size
    }

    /// Windowed, centre-padded frame `index` of `signal`, exactly `fft_size` long.
    pub fn frame(&self, signal: &[T], index: usize) -> Result<Vec<T>> {
        let range = self.frame_range(index);
        if range.end > signal.len() {
            return Err(StftError::FrameOutOfBounds {
                start: range.start,
                end: range.end,
                len: signal.len(),
            });
        }

        let windowed = apply_window(&signal[range], &self.window);
        Ok(pad_center(&windowed, self.fft_size))
    }
}
