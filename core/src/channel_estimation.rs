//! Per-subcarrier channel estimation and MRC pilot weights.

use num_complex::Complex64;
use rustfft::FftPlanner;

use crate::tables::{lts_freq_domain, FFT_SIZE, PILOT_CARRIERS_IDX};

/// Floor substituted for a null LTS tone to avoid division by zero.
const NULL_TONE_FLOOR: f64 = 1e-9;

/// Result of channel estimation: the frequency response, its inverse
/// (equalizer coefficients), and the MRC weights derived from it.
#[derive(Debug, Clone)]
pub struct ChannelEstimate {
    pub h: [Complex64; FFT_SIZE],
    pub eq: [Complex64; FFT_SIZE],
    pub mrc_weights: [f64; 4],
}

/// Average the two long training symbols, FFT, and divide by the known LTS
/// spectrum to recover `H`; `eq = 1/H`. `t1`/`t2` must each be 64 samples.
pub fn estimate(t1: &[Complex64], t2: &[Complex64], use_mrc: bool) -> ChannelEstimate {
    debug_assert_eq!(t1.len(), FFT_SIZE);
    debug_assert_eq!(t2.len(), FFT_SIZE);

    let mut l_bar: Vec<Complex64> = t1.iter().zip(t2).map(|(&a, &b)| (a + b) * 0.5).collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(FFT_SIZE);
    fft.process(&mut l_bar);
    let scale = 1.0 / FFT_SIZE as f64;
    for v in l_bar.iter_mut() {
        *v *= scale;
    }

    let l_tx = lts_freq_domain();
    let mut h = [Complex64::new(0.0, 0.0); FFT_SIZE];
    for k in 0..FFT_SIZE {
        let denom = if l_tx[k] == Complex64::new(0.0, 0.0) {
            Complex64::new(NULL_TONE_FLOOR, 0.0)
        } else {
            l_tx[k]
        };
        h[k] = l_bar[k] / denom;
    }

    let mut eq = [Complex64::new(0.0, 0.0); FFT_SIZE];
    for k in 0..FFT_SIZE {
        eq[k] = h[k].inv();
    }

    let mrc_weights = compute_mrc_weights(&h, use_mrc);

    ChannelEstimate { h, eq, mrc_weights }
}

/// Weight pilot observations by estimated channel magnitude (MRC), or fall
/// back to equal-gain combining.
fn compute_mrc_weights(h: &[Complex64; FFT_SIZE], use_mrc: bool) -> [f64; 4] {
    if !use_mrc {
        return [0.25; 4];
    }
    let mags: [f64; 4] = PILOT_CARRIERS_IDX.map(|bin| h[bin].norm());
    let sum: f64 = mags.iter().sum();
    if sum <= 0.0 {
        [0.25; 4]
    } else {
        mags.map(|m| m / sum)
    }
}
