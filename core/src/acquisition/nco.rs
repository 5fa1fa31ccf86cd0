//! Complex-exponential derotation to undo an estimated carrier-frequency
//! offset before demodulation.

use num_complex::Complex64;

use crate::complex_ext::cexp_neg;
use crate::tables::SAMPLE_RATE_HZ;

/// Multiply `x[n]` by `exp(-j * 2*pi*n*f_hz/Fs)` in place, for every sample
/// in the slice (n is the absolute index into `x`, starting at 0).
pub fn apply_nco(x: &mut [Complex64], f_hz: f64) {
    if f_hz == 0.0 {
        return;
    }
    let step = 2.0 * std::f64::consts::PI * f_hz / SAMPLE_RATE_HZ;
    for (n, sample) in x.iter_mut().enumerate() {
        *sample *= cexp_neg(step * n as f64);
    }
}
