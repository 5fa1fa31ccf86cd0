//! Reference channel-impairment model used by the test suite to exercise
//! the receive chain against something more realistic than a clean
//! waveform. A test fixture, not part of the physical-layer core: it
//! generalizes this codebase's `apply_audio_noise`/`apply_symbol_noise`/
//! `apply_channel` functions from plain AWGN/attenuation to the fuller
//! defect stack end-to-end tests need, seeded the same way.

use std::f64::consts::PI;

use num_complex::Complex64;
use rand::RngCore;
use rand_distr::StandardNormal;

use crate::config::{ChannelImpairmentConfig, MultipathConfig, PhaseNoiseConfig};
use crate::tables::SAMPLE_RATE_HZ;

fn gaussian<R: RngCore>(rng: &mut R) -> f64 {
    rng.sample(StandardNormal)
}

/// Random-tap-gain FIR with an exponential power-decay profile whose time
/// constant matches the configured RMS delay spread.
fn multipath_taps<R: RngCore>(cfg: &MultipathConfig, rng: &mut R) -> Vec<Complex64> {
    let tau_samples = (cfg.rms_delay_spread_ns * 1e-9 * SAMPLE_RATE_HZ).max(1e-6);
    let mut taps = Vec::with_capacity(cfg.num_taps);
    let mut power_sum = 0.0;
    for k in 0..cfg.num_taps {
        let power = (-(k as f64) / tau_samples).exp();
        power_sum += power;
        let gain = Complex64::new(gaussian(rng), gaussian(rng)) * power.sqrt();
        taps.push(gain);
    }
    let norm = power_sum.sqrt().max(1e-12);
    for t in taps.iter_mut() {
        *t /= norm;
    }
    taps
}

fn apply_multipath<R: RngCore>(x: &[Complex64], cfg: &MultipathConfig, rng: &mut R) -> Vec<Complex64> {
    let taps = multipath_taps(cfg, rng);
    (0..x.len())
        .map(|n| {
            taps.iter()
                .enumerate()
                .filter(|&(k, _)| k <= n)
                .map(|(k, &tap)| tap * x[n - k])
                .sum()
        })
        .collect()
}

fn apply_awgn<R: RngCore>(x: &[Complex64], snr_db: f64, rng: &mut R) -> Vec<Complex64> {
    let signal_power: f64 = x.iter().map(|s| s.norm_sqr()).sum::<f64>() / x.len().max(1) as f64;
    let noise_power = signal_power / 10f64.powf(snr_db / 10.0);
    let noise_std = (noise_power / 2.0).sqrt();
    x.iter()
        .map(|&s| s + Complex64::new(gaussian(rng), gaussian(rng)) * noise_std)
        .collect()
}

/// A single-pole low-pass-filtered random walk, loosely shaped by the
/// close-in/far-out dBc/Hz levels, applied as a slowly varying common
/// phase rotation.
fn apply_phase_noise<R: RngCore>(x: &[Complex64], cfg: &PhaseNoiseConfig, rng: &mut R) -> Vec<Complex64> {
    const POLE: f64 = 0.001;
    let sigma_close = 10f64.powf(cfg.close_in_dbc_hz / 10.0).sqrt();
    let sigma_far = 10f64.powf(cfg.far_out_dbc_hz / 10.0).sqrt();
    let mut lp = 0.0;
    let mut phase = 0.0;
    x.iter()
        .map(|&s| {
            lp = POLE * gaussian(rng) * sigma_close + (1.0 - POLE) * lp;
            phase += lp + gaussian(rng) * sigma_far * 0.01;
            s * Complex64::from_polar(1.0, phase)
        })
        .collect()
}

fn apply_frequency_offset(x: &mut [Complex64], f_hz: f64) {
    for (n, s) in x.iter_mut().enumerate() {
        let theta = 2.0 * PI * f_hz * n as f64 / SAMPLE_RATE_HZ;
        *s *= Complex64::from_polar(1.0, theta);
    }
}

/// Fixed I/Q phase and amplitude imbalance: `Q' = amp * (sin(phi)*I + cos(phi)*Q)`.
fn apply_iq_imbalance(x: &[Complex64], phase_deg: f64, amplitude_db: f64) -> Vec<Complex64> {
    let phase = phase_deg.to_radians();
    let amp = 10f64.powf(amplitude_db / 20.0);
    x.iter()
        .map(|s| Complex64::new(s.re, amp * (phase.sin() * s.re + phase.cos() * s.im)))
        .collect()
}

/// Sub-sample timing offset via 2-tap linear-interpolation fractional
/// delay. `offset_samples` may be any real value, positive or negative.
fn apply_timing_offset(x: &[Complex64], offset_samples: f64) -> Vec<Complex64> {
    let shift = offset_samples.floor() as isize;
    let frac = offset_samples - shift as f64;
    let at = |i: isize| -> Complex64 {
        if i < 0 || i as usize >= x.len() {
            Complex64::new(0.0, 0.0)
        } else {
            x[i as usize]
        }
    };
    (0..x.len() as isize).map(|n| at(n - shift) * (1.0 - frac) + at(n - shift - 1) * frac).collect()
}

/// Slow clock-rate drift, modeled as linear-interpolation resampling at a
/// rate offset by `ppm` parts per million.
fn apply_clock_drift(x: &[Complex64], ppm: f64) -> Vec<Complex64> {
    let rate = 1.0 + ppm * 1e-6;
    let n = x.len();
    let at = |i: isize| -> Complex64 {
        if i < 0 || i as usize >= n {
            Complex64::new(0.0, 0.0)
        } else {
            x[i as usize]
        }
    };
    (0..n)
        .map(|i| {
            let src = i as f64 * rate;
            let i0 = src.floor() as isize;
            let frac = src - src.floor();
            at(i0) * (1.0 - frac) + at(i0 + 1) * frac
        })
        .collect()
}

/// Apply the full reference defect stack, in order: multipath, AWGN,
/// phase noise, frequency offset, I/Q imbalance, timing offset, clock
/// drift.
pub fn apply_defects<R: RngCore>(clean: &[Complex64], cfg: &ChannelImpairmentConfig, rng: &mut R) -> Vec<Complex64> {
    let mut x = apply_multipath(clean, &cfg.multipath, rng);
    x = apply_awgn(&x, cfg.snr_db, rng);
    x = apply_phase_noise(&x, &cfg.phase_noise, rng);
    apply_frequency_offset(&mut x, cfg.frequency_offset_hz);
    x = apply_iq_imbalance(&x, cfg.iq_phase_imbalance_deg, cfg.iq_amplitude_imbalance_db);
    x = apply_timing_offset(&x, cfg.timing_offset_samples);
    apply_clock_drift(&x, cfg.clock_drift_ppm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn deterministic_given_the_same_seed() {
        let clean: Vec<Complex64> = (0..500).map(|i| Complex64::new((i as f64 * 0.01).sin(), 0.0)).collect();
        let cfg = ChannelImpairmentConfig::default();
        let mut rng1 = ChaCha8Rng::seed_from_u64(42);
        let mut rng2 = ChaCha8Rng::seed_from_u64(42);
        let a = apply_defects(&clean, &cfg, &mut rng1);
        let b = apply_defects(&clean, &cfg, &mut rng2);
        assert_eq!(a, b);
    }

    #[test]
    fn preserves_sample_count() {
        let clean = vec![Complex64::new(1.0, 0.0); 320];
        let cfg = ChannelImpairmentConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let out = apply_defects(&clean, &cfg, &mut rng);
        assert_eq!(out.len(), clean.len());
    }

    #[test]
    fn awgn_alone_adds_measurable_power() {
        let clean = vec![Complex64::new(1.0, 0.0); 4000];
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let noisy = apply_awgn(&clean, 10.0, &mut rng);
        let err_power: f64 =
            clean.iter().zip(noisy.iter()).map(|(c, n)| (n - c).norm_sqr()).sum::<f64>() / clean.len() as f64;
        assert!(err_power > 0.0);
    }

    #[test]
    fn zero_timing_offset_is_identity() {
        let x = vec![Complex64::new(1.0, -1.0), Complex64::new(2.0, 0.5), Complex64::new(-3.0, 4.0)];
        let out = apply_timing_offset(&x, 0.0);
        for (a, b) in x.iter().zip(out.iter()) {
            assert!((a - b).norm() < 1e-12);
        }
    }
}
