//! Small `Complex64` helpers shared across acquisition and framing stages.

use num_complex::Complex64;

/// `exp(-j * theta)`, the NCO/derotation kernel used throughout acquisition
/// and equalization.
pub fn cexp_neg(theta: f64) -> Complex64 {
    Complex64::from_polar(1.0, -theta)
}

/// 1-bit-per-axis quantization: `sign(re)` / `sign(im)`, each mapped to ±1
/// (0.0 maps to +1, matching the "no true zero" training sequences).
pub fn sign_quantize(c: Complex64) -> Complex64 {
    let sign = |v: f64| if v < 0.0 { -1.0 } else { 1.0 };
    Complex64::new(sign(c.re), sign(c.im))
}

/// Mean of a complex slice, or zero for an empty slice.
pub fn mean(xs: &[Complex64]) -> Complex64 {
    if xs.is_empty() {
        return Complex64::new(0.0, 0.0);
    }
    xs.iter().sum::<Complex64>() / xs.len() as f64
}
