//! Two-step carrier frequency-offset estimation: coarse (lag-16) then fine
//! (lag-64).

use num_complex::Complex64;

use super::{boxcar_complex, lag_product, packet_detector::smoothed_lag16_autocorr};
use crate::tables::SAMPLE_RATE_HZ;

const FINE_LAG: usize = 64;
const FINE_SMOOTH_WINDOW: usize = 64;
const COARSE_SAMPLE_BACKOFF: isize = 50;
const FINE_SAMPLE_ADVANCE: isize = 125;

fn sample_at(series: &[Complex64], index: isize) -> Option<Complex64> {
    if index < 0 {
        return None;
    }
    series.get(index as usize).copied()
}

/// Coarse estimate: `arg(C[falling_edge - 50])`, converted to Hz at lag 16.
pub fn coarse_offset_hz(x: &[Complex64], falling_edge: isize) -> Option<f64> {
    let c = smoothed_lag16_autocorr(x);
    let theta = sample_at(&c, falling_edge - COARSE_SAMPLE_BACKOFF)?.arg();
    Some(theta * SAMPLE_RATE_HZ / (2.0 * std::f64::consts::PI * 16.0))
}

/// Fine estimate: `arg(C64[falling_edge + 125])`, converted to Hz at lag 64.
/// Must be called on a sample stream that has already had [`coarse_offset_hz`]
/// applied via [`super::nco::apply_nco`], leaving only the residual fine
/// offset for this second pass to resolve.
pub fn fine_offset_hz(x: &[Complex64], falling_edge: isize) -> Option<f64> {
    let c64 = boxcar_complex(&lag_product(x, FINE_LAG), FINE_SMOOTH_WINDOW);
    let theta = sample_at(&c64, falling_edge + FINE_SAMPLE_ADVANCE)?.arg();
    Some(theta * SAMPLE_RATE_HZ / (2.0 * std::f64::consts::PI * 64.0))
}
