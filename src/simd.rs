/// Elementwise kernels used by framing and overlap-add, with optional `pulp`
/// dispatch for `f32`/`f64` under the `simd` feature.
use num_traits::Float;

#[cfg(feature = "simd")]
use pulp::Arch;

/// Reinterpret a generic slice as a concrete float slice when `T` is that type.
#[cfg(feature = "simd")]
macro_rules! dispatch_float {
    ($t:ty, f32 => $f32_body:expr, f64 => $f64_body:expr) => {{
        let id = std::any::TypeId::of::<$t>();
        if id == std::any::TypeId::of::<f32>() {
            $f32_body;
            return;
        }
        if id == std::any::TypeId::of::<f64>() {
            $f64_body;
            return;
        }
    }};
}

/// Generates the 4-lane `pulp` kernels for one concrete float type.
#[cfg(feature = "simd")]
macro_rules! lane_kernels {
    ($float:ty, $window:ident, $magnitudes:ident, $accumulate:ident, $scale:ident) => {
        fn $window(simd: Arch, signal: &[$float], window: &[$float], output: &mut [$float]) {
            simd.dispatch(|| {
                let (signal_head, signal_tail) = pulp::as_arrays::<4, _>(signal);
                let (window_head, window_tail) = pulp::as_arrays::<4, _>(window);
                let (output_head, output_tail) = pulp::as_arrays_mut::<4, _>(output);

                for i in 0..signal_head.len() {
                    for j in 0..4 {
                        output_head[i][j] = signal_head[i][j] * window_head[i][j];
                    }
                }
                for i in 0..signal_tail.len() {
                    output_tail[i] = signal_tail[i] * window_tail[i];
                }
            });
        }

        fn $magnitudes(simd: Arch, real: &[$float], imag: &[$float], output: &mut [$float]) {
            simd.dispatch(|| {
                let (real_head, real_tail) = pulp::as_arrays::<4, _>(real);
                let (imag_head, imag_tail) = pulp::as_arrays::<4, _>(imag);
                let (output_head, output_tail) = pulp::as_arrays_mut::<4, _>(output);

                for i in 0..real_head.len() {
                    for j in 0..4 {
                        output_head[i][j] = (real_head[i][j] * real_head[i][j]
                            + imag_head[i][j] * imag_head[i][j])
                            .sqrt();
                    }
                }
                for i in 0..real_tail.len() {
                    output_tail[i] =
                        (real_tail[i] * real_tail[i] + imag_tail[i] * imag_tail[i]).sqrt();
                }
            });
        }

        fn $accumulate(simd: Arch, input: &[$float], output: &mut [$float]) {
            simd.dispatch(|| {
                let (input_head, input_tail) = pulp::as_arrays::<4, _>(input);
                let (output_head, output_tail) = pulp::as_arrays_mut::<4, _>(output);

                for i in 0..input_head.len() {
                    for j in 0..4 {
                        output_head[i][j] += input_head[i][j];
                    }
                }
                for i in 0..input_tail.len() {
                    output_tail[i] += input_tail[i];
                }
            });
        }

        fn $scale(simd: Arch, input: &[$float], scale: $float, output: &mut [$float]) {
            simd.dispatch(|| {
                let (input_head, input_tail) = pulp::as_arrays::<4, _>(input);
                let (output_head, output_tail) = pulp::as_arrays_mut::<4, _>(output);

                for i in 0..input_head.len() {
                    for j in 0..4 {
                        output_head[i][j] = input_head[i][j] * scale;
                    }
                }
                for i in 0..input_tail.len() {
                    output_tail[i] = input_tail[i] * scale;
                }
            });
        }
    };
}

#[cfg(feature = "simd")]
lane_kernels!(
    f32,
    apply_window_f32_simd,
    compute_magnitudes_f32_simd,
    accumulate_f32_simd,
    scale_slice_f32_simd
);

#[cfg(feature = "simd")]
lane_kernels!(
    f64,
    apply_window_f64_simd,
    compute_magnitudes_f64_simd,
    accumulate_f64_simd,
    scale_slice_f64_simd
);

/// output[i] = signal[i] * window[i]
#[inline]
pub fn apply_window<T: Float + 'static>(signal: &[T], window: &[T], output: &mut [T]) {
    debug_assert_eq!(signal.len(), window.len());
    debug_assert_eq!(signal.len(), output.len());

    #[cfg(feature = "simd")]
    dispatch_float!(T,
        f32 => apply_window_f32_simd(
            Arch::new(),
            unsafe { std::mem::transmute::<&[T], &[f32]>(signal) },
            unsafe { std::mem::transmute::<&[T], &[f32]>(window) },
            unsafe { std::mem::transmute::<&mut [T], &mut [f32]>(output) },
        ),
        f64 => apply_window_f64_simd(
            Arch::new(),
            unsafe { std::mem::transmute::<&[T], &[f64]>(signal) },
            unsafe { std::mem::transmute::<&[T], &[f64]>(window) },
            unsafe { std::mem::transmute::<&mut [T], &mut [f64]>(output) },
        )
    );

    for ((out, &x), &w) in output.iter_mut().zip(signal).zip(window) {
        *out = x * w;
    }
}

/// magnitude[i] = sqrt(real[i]^2 + imag[i]^2)
#[inline]
pub fn compute_magnitudes<T: Float + 'static>(real: &[T], imag: &[T], output: &mut [T]) {
    debug_assert_eq!(real.len(), imag.len());
    debug_assert_eq!(real.len(), output.len());

    #[cfg(feature = "simd")]
    dispatch_float!(T,
        f32 => compute_magnitudes_f32_simd(
            Arch::new(),
            unsafe { std::mem::transmute::<&[T], &[f32]>(real) },
            unsafe { std::mem::transmute::<&[T], &[f32]>(imag) },
            unsafe { std::mem::transmute::<&mut [T], &mut [f32]>(output) },
        ),
        f64 => compute_magnitudes_f64_simd(
            Arch::new(),
            unsafe { std::mem::transmute::<&[T], &[f64]>(real) },
            unsafe { std::mem::transmute::<&[T], &[f64]>(imag) },
            unsafe { std::mem::transmute::<&mut [T], &mut [f64]>(output) },
        )
    );

    for ((out, &re), &im) in output.iter_mut().zip(real).zip(imag) {
        *out = (re * re + im * im).sqrt();
    }
}

/// Overlap-add accumulation: output[i] += input[i]
#[inline]
pub fn accumulate<T: Float + 'static>(input: &[T], output: &mut [T]) {
    debug_assert_eq!(input.len(), output.len());

    #[cfg(feature = "simd")]
    dispatch_float!(T,
        f32 => accumulate_f32_simd(
            Arch::new(),
            unsafe { std::mem::transmute::<&[T], &[f32]>(input) },
            unsafe { std::mem::transmute::<&mut [T], &mut [f32]>(output) },
        ),
        f64 => accumulate_f64_simd(
            Arch::new(),
            unsafe { std::mem::transmute::<&[T], &[f64]>(input) },
            unsafe { std::mem::transmute::<&mut [T], &mut [f64]>(output) },
        )
    );

    for (out, &x) in output.iter_mut().zip(input) {
        *out = *out + x;
    }
}

/// output[i] = input[i] * scale
#[inline]
pub fn scale_slice<T: Float + 'static>(input: &[T], scale: T, output: &mut [T]) {
    debug_assert_eq!(input.len(), output.len());

    #[cfg(feature = "simd")]
    dispatch_float!(T,
        f32 => scale_slice_f32_simd(
            Arch::new(),
            unsafe { std::mem::transmute::<&[T], &[f32]>(input) },
            unsafe { std::mem::transmute_copy::<T, f32>(&scale) },
            unsafe { std::mem::transmute::<&mut [T], &mut [f32]>(output) },
        ),
        f64 => scale_slice_f64_simd(
            Arch::new(),
            unsafe { std::mem::transmute::<&[T], &[f64]>(input) },
            unsafe { std::mem::transmute_copy::<T, f64>(&scale) },
            unsafe { std::mem::transmute::<&mut [T], &mut [f64]>(output) },
        )
    );

    for (out, &x) in output.iter_mut().zip(input) {
        *out = x * scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_window_handles_tail() {
        let signal = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let window = [0.5f32, 0.5, 1.0, 1.0, 2.0, 0.0];
        let mut output = [0.0f32; 6];
        apply_window(&signal, &window, &mut output);
        assert_eq!(output, [0.5, 1.0, 3.0, 4.0, 10.0, 0.0]);
    }

    #[test]
    fn test_compute_magnitudes() {
        let real = [3.0f64, 0.0, -5.0, 0.0, 8.0];
        let imag = [4.0f64, 0.0, 12.0, -2.0, 15.0];
        let mut output = [0.0f64; 5];
        compute_magnitudes(&real, &imag, &mut output);
        assert_eq!(output, [5.0, 0.0, 13.0, 2.0, 17.0]);
    }

    #[test]
    fn test_accumulate_and_scale() {
        let input = [1.0f32, 2.0, 3.0, 4.0, 5.0];
        let mut output = [1.0f32; 5];
        accumulate(&input, &mut output);
        assert_eq!(output, [2.0, 3.0, 4.0, 5.0, 6.0]);

        let mut scaled = [0.0f32; 5];
        scale_slice(&output, 0.5, &mut scaled);
        assert_eq!(scaled, [1.0, 1.5, 2.0, 2.5, 3.0]);
    }
}
