//! Packet detection and timing/frequency acquisition.
//!
//! Each stage is a pure function of the captured sample slice and the
//! [`crate::context::FrameContext`] built by the stages before it; none of
//! them retain state across frames.

pub mod freq_offset;
pub mod long_symbol;
pub mod nco;
pub mod packet_detector;

use num_complex::Complex64;

/// Causal running-sum ("boxcar") smoothing over a complex sequence: each
/// output sample is the sum of the last `window` input samples, with
/// zero-padded history before index 0.
pub(crate) fn boxcar_complex(input: &[Complex64], window: usize) -> Vec<Complex64> {
    let mut out = Vec::with_capacity(input.len());
    let mut acc = Complex64::new(0.0, 0.0);
    for i in 0..input.len() {
        acc += input[i];
        if i >= window {
            acc -= input[i - window];
        }
        out.push(acc);
    }
    out
}

/// Same running sum over a real sequence, used for the power estimate `P[i]`.
pub(crate) fn boxcar_real(input: &[f64], window: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(input.len());
    let mut acc = 0.0;
    for i in 0..input.len() {
        acc += input[i];
        if i >= window {
            acc -= input[i - window];
        }
        out.push(acc);
    }
    out
}

/// `x[i] * conj(x[i-lag])`, zero for `i < lag` (zero-padded history).
pub(crate) fn lag_product(x: &[Complex64], lag: usize) -> Vec<Complex64> {
    let mut out = vec![Complex64::new(0.0, 0.0); x.len()];
    for i in lag..x.len() {
        out[i] = x[i] * x[i - lag].conj();
    }
    out
}
