//! Window coefficients.
//!
//! All windows are symmetric: the phase term uses `len - 1` as denominator, so the
//! first and last coefficients mirror each other. A single-sample window is `[1]`.

use num_traits::Float;

use crate::simd;
use crate::utils::constant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowType {
    Bartlett,
    BartlettHann,
    /// Shape parameter `alpha`, default 0.16 (the classic Blackman).
    Blackman,
    Cosine,
    /// Shape parameter `alpha` (relative standard deviation), default 0.25.
    Gauss,
    Hamming,
    /// Symmetric (`len - 1`) Hann. Two copies shifted by half of `len` sum to
    /// 1 within `pi / (2 (len - 1))`, so a half-hop overlap-add round trip is
    /// exact only to that ripple.
    #[default]
    Hann,
    Lanczos,
    Rectangular,
    Triangular,
}

impl WindowType {
    /// Default shape parameter for parameterized windows.
    pub fn default_alpha(self) -> Option<f64> {
        match self {
            WindowType::Blackman => Some(0.16),
            WindowType::Gauss => Some(0.25),
            _ => None,
        }
    }

    pub fn is_parameterized(self) -> bool {
        self.default_alpha().is_some()
    }
}

/// Generate `len` window coefficients.
///
/// `alpha` is only read by [`WindowType::Blackman`] and [`WindowType::Gauss`];
/// `None` selects the type's default.
pub fn generate_window<T: Float + 'static>(
    window_type: WindowType,
    len: usize,
    alpha: Option<T>,
) -> Vec<T> {
    match len {
        0 => return Vec::new(),
        1 => return vec![T::one()],
        _ => {}
    }

    let pi = constant::<T>(std::f64::consts::PI);
    let two = constant::<T>(2.0);
    let half = constant::<T>(0.5);
    let one = T::one();
    let len_t = constant::<T>(len as f64);
    let len_m1 = constant::<T>((len - 1) as f64);
    let alpha = alpha
        .or_else(|| window_type.default_alpha().map(constant::<T>))
        .unwrap_or_else(T::zero);

    (0..len)
        .map(|i| {
            let i_t = constant::<T>(i as f64);
            match window_type {
                WindowType::Bartlett => two / len_m1 * (len_m1 / two - (i_t - len_m1 / two).abs()),
                WindowType::BartlettHann => {
                    constant::<T>(0.62)
                        - constant::<T>(0.48) * (i_t / len_m1 - half).abs()
                        - constant::<T>(0.38) * (two * pi * i_t / len_m1).cos()
                }
                WindowType::Blackman => {
                    let a0 = (one - alpha) / two;
                    let a1 = half;
                    let a2 = alpha / two;
                    let angle = two * pi * i_t / len_m1;
                    a0 - a1 * angle.cos() + a2 * (two * angle).cos()
                }
                WindowType::Cosine => (pi * i_t / len_m1 - pi / two).cos(),
                WindowType::Gauss => {
                    let x = (i_t - len_m1 / two) / (alpha * len_m1 / two);
                    (-half * x * x).exp()
                }
                WindowType::Hamming => {
                    constant::<T>(0.54) - constant::<T>(0.46) * (two * pi * i_t / len_m1).cos()
                }
                WindowType::Hann => half * (one - (two * pi * i_t / len_m1).cos()),
                WindowType::Lanczos => sinc(two * i_t / len_m1 - one),
                WindowType::Rectangular => one,
                WindowType::Triangular => two / len_t * (len_t / two - (i_t - len_m1 / two).abs()),
            }
        })
        .collect()
}

/// Normalized sinc, `sin(pi x) / (pi x)` with `sinc(0) = 1`.
fn sinc<T: Float>(x: T) -> T {
    if x == T::zero() {
        return T::one();
    }
    let pi_x = constant::<T>(std::f64::consts::PI) * x;
    pi_x.sin() / pi_x
}

/// Windowed copy of `samples`; `coefficients` must have the same length.
pub fn apply_window<T: Float + 'static>(samples: &[T], coefficients: &[T]) -> Vec<T> {
    let mut output = vec![T::zero(); samples.len()];
    simd::apply_window(samples, coefficients, &mut output);
    output
}
