//! Coarse frame-start detection via lag-16 sliding auto-correlation.

use num_complex::Complex64;

use super::{boxcar_complex, boxcar_real, lag_product};

const LAG: usize = 16;
const SMOOTH_WINDOW: usize = 32;
const RISE_THRESHOLD: f64 = 0.85;
const FALL_THRESHOLD: f64 = 0.65;
const FALLING_EDGE_SEARCH_LIMIT: usize = 1000;
const POWER_FLOOR: f64 = 1e-12;

/// Per-sample diagnostics and the scalar result of packet detection.
#[derive(Debug, Clone)]
pub struct DetectionTrace {
    /// Comparison ratio r\[i\] = |C\[i\]| / max(P\[i\], eps).
    pub r: Vec<f64>,
    /// Hysteresis detection flag, one per sample.
    pub d: Vec<bool>,
    /// Index of the first 1->0 transition of `d` within the first 1000
    /// samples, or [`crate::context::FALLING_EDGE_NOT_FOUND`] if none occurs.
    pub falling_edge: isize,
}

/// The lag-16 smoothed auto-correlation `C[i]`, shared with the coarse
/// frequency-offset estimator, which recomputes the same series.
pub(crate) fn smoothed_lag16_autocorr(x: &[Complex64]) -> Vec<Complex64> {
    boxcar_complex(&lag_product(x, LAG), SMOOTH_WINDOW)
}

/// Run the packet detector over a captured sample slice.
pub fn detect(x: &[Complex64]) -> DetectionTrace {
    let c = smoothed_lag16_autocorr(x);
    let power: Vec<f64> = x.iter().map(|s| s.norm_sqr()).collect();
    let p = boxcar_real(&power, SMOOTH_WINDOW);

    let n = x.len();
    let mut r = Vec::with_capacity(n);
    let mut d = Vec::with_capacity(n);
    let mut flag = false;
    let mut falling_edge: isize = -1;

    for i in 0..n {
        let ratio = c[i].norm() / p[i].max(POWER_FLOOR);
        r.push(ratio);

        let prev_flag = flag;
        if !flag && ratio > RISE_THRESHOLD {
            flag = true;
        } else if flag && ratio < FALL_THRESHOLD {
            flag = false;
        }
        d.push(flag);

        if falling_edge < 0 && prev_flag && !flag && i < FALLING_EDGE_SEARCH_LIMIT {
            falling_edge = i as isize;
        }
    }

    DetectionTrace { r, d, falling_edge }
}

/// Caller-side validity check: a usable detection has
/// `falling_edge` strictly inside (0, 600].
pub fn falling_edge_in_range(falling_edge: isize) -> bool {
    falling_edge > 0 && falling_edge <= 600
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::sts_time_domain_period16;

    fn synthetic_sts(repeats: usize) -> Vec<Complex64> {
        let period = sts_time_domain_period16();
        let mut out = Vec::with_capacity(period.len() * repeats);
        for _ in 0..repeats {
            out.extend_from_slice(&period);
        }
        out
    }

    #[test]
    fn flat_noise_never_detects() {
        let x = vec![Complex64::new(0.001, -0.001); 2000];
        let trace = detect(&x);
        assert_eq!(trace.falling_edge, -1);
    }

    #[test]
    fn periodic_sts_then_silence_finds_a_falling_edge() {
        let mut x = synthetic_sts(10); // 160 samples of STS
        x.extend(vec![Complex64::new(0.0, 0.0); 400]);
        let trace = detect(&x);
        assert!(trace.falling_edge > 0);
        assert!(falling_edge_in_range(trace.falling_edge));
    }

    #[test]
    fn ratio_is_bounded() {
        let x = synthetic_sts(20);
        let trace = detect(&x);
        assert!(trace.r.iter().all(|&v| v.is_finite() && v >= 0.0));
    }
}
