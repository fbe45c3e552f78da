use thiserror::Error;

/// Errors reported by configuration, framing and overlap-add.
///
/// Every variant is a caller or configuration mistake; nothing here is
/// transient, so nothing is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StftError {
    #[error("Invalid window size: must be greater than zero")]
    InvalidWindowSize,

    #[error("Invalid hop size {hop_size}: must be in 1..={window_size}")]
    InvalidHopSize { hop_size: usize, window_size: usize },

    #[error("Invalid FFT size {fft_size}: must be at least the window size {window_size}")]
    InvalidFftSize { fft_size: usize, window_size: usize },

    #[error("Input too short: {required} samples required, got {actual}")]
    InputTooShort { required: usize, actual: usize },

    #[error("Frame {start}..{end} lies outside a buffer of {len} samples")]
    FrameOutOfBounds { start: usize, end: usize, len: usize },

    #[error("COLA condition violated: ripple={ripple} > tolerance={tolerance}")]
    ColaViolation { ripple: f64, tolerance: f64 },
}

pub type Result<T> = std::result::Result<T, StftError>;
