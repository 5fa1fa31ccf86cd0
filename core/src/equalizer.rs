//! Per-symbol OFDM equalization with residual phase/timing pilot tracking.

use std::collections::VecDeque;

use num_complex::Complex64;
use rustfft::FftPlanner;

use crate::complex_ext::cexp_neg;
use crate::errors::{DspError, Result};
use crate::tables::{
    data_carriers_idx, pilot_base_polarity, pilot_polarity, signed_to_bin, FFT_SIZE,
    PILOT_CARRIERS_IDX, PILOT_CARRIERS_SIGNED,
};

/// Length of the ring buffer of recent phase-slope estimates averaged into
/// the effective slope used this symbol.
const SLOPE_RING_LEN: usize = 8;
/// First-order low-pass factor applied to the adaptive equalizer update.
const TRACKING_GAIN: f64 = 1.0 / 8.0;

/// Stateful per-frame equalizer: owns the evolving `eq` coefficients and the
/// phase-slope tracking ring across the symbols of one frame.
pub struct SymbolEqualizer {
    eq: [Complex64; FFT_SIZE],
    slope_ring: VecDeque<f64>,
    fft: std::sync::Arc<dyn rustfft::Fft<f64>>,
    data_bins: [usize; 48],
}

/// Diagnostics produced alongside the corrected data symbol.
#[derive(Debug, Clone, Copy)]
pub struct PilotTrackingReport {
    pub theta: f64,
    pub slope: f64,
}

impl SymbolEqualizer {
    pub fn new(eq: [Complex64; FFT_SIZE]) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            eq,
            slope_ring: VecDeque::with_capacity(SLOPE_RING_LEN),
            fft: planner.plan_fft_forward(FFT_SIZE),
            data_bins: data_carriers_idx(),
        }
    }

    /// Equalize OFDM symbol `symbol_index` (0 = SIGNAL) from its 64 raw
    /// time-domain samples (cyclic prefix already stripped by the caller),
    /// returning the 48 corrected data-subcarrier values.
    pub fn equalize_symbol(
        &mut self,
        samples: &[Complex64],
        symbol_index: usize,
        mrc_weights: &[f64; 4],
    ) -> Result<(Vec<Complex64>, PilotTrackingReport)> {
        if samples.len() != FFT_SIZE {
            return Err(DspError::WindowOutOfBounds {
                start: 0,
                end: FFT_SIZE,
                len: samples.len(),
            }
            .into());
        }

        let mut y: Vec<Complex64> = samples.to_vec();
        self.fft.process(&mut y);
        let scale = 1.0 / FFT_SIZE as f64;
        let z: Vec<Complex64> = y.iter().zip(self.eq.iter()).map(|(&yi, &e)| yi * scale * e).collect();

        // Pilot derotation (step 4).
        let expected_polarity_symbol = pilot_polarity(symbol_index);
        let pilots: Vec<Complex64> = PILOT_CARRIERS_IDX
            .iter()
            .zip(PILOT_CARRIERS_SIGNED.iter())
            .map(|(&bin, &signed)| {
                let expected = pilot_base_polarity(signed) * expected_polarity_symbol;
                z[bin] * expected
            })
            .collect();

        // Weighted average pilot -> common phase theta (step 5).
        let a_bar: Complex64 = pilots.iter().zip(mrc_weights.iter()).map(|(&p, &w)| p * w).sum();
        let theta = a_bar.arg();

        // Linear phase slope across frequency (step 6).
        let slope: f64 = pilots
            .iter()
            .zip(PILOT_CARRIERS_SIGNED.iter())
            .zip(mrc_weights.iter())
            .map(|((&p, &k_signed), &w)| w * (p.arg() / k_signed as f64))
            .sum();

        // Ring-buffer smoothing of the slope (step 7).
        if self.slope_ring.len() == SLOPE_RING_LEN {
            self.slope_ring.pop_front();
        }
        self.slope_ring.push_back(slope);
        let slope_avg: f64 = self.slope_ring.iter().sum::<f64>() / self.slope_ring.len() as f64;

        // Apply common-phase and phase-slope corrections (steps 8-9).
        let mut corrected = vec![Complex64::new(0.0, 0.0); FFT_SIZE];
        let phase_corr = cexp_neg(theta);
        for k in 0..FFT_SIZE {
            let k_signed = bin_to_signed(k);
            let slope_corr = cexp_neg(k_signed as f64 * slope_avg);
            corrected[k] = z[k] * phase_corr * slope_corr;
        }

        // Slowly update the equalizer for the next symbol (step 10).
        let eq_theta_corr = cexp_neg(theta * TRACKING_GAIN);
        for k in 0..FFT_SIZE {
            let k_signed = bin_to_signed(k);
            let eq_slope_corr = cexp_neg(k_signed as f64 * slope_avg * TRACKING_GAIN);
            self.eq[k] *= eq_theta_corr * eq_slope_corr;
        }

        let data: Vec<Complex64> = self.data_bins.iter().map(|&bin| corrected[bin]).collect();
        Ok((data, PilotTrackingReport { theta, slope: slope_avg }))
    }
}

/// Inverse of [`signed_to_bin`] over the FFT-bin domain (0..=31 stays
/// positive, 32..=63 maps to -32..=-1).
fn bin_to_signed(bin: usize) -> i32 {
    if bin <= 31 {
        bin as i32
    } else {
        bin as i32 - FFT_SIZE as i32
    }
}

/// Extract the 64-sample body of OFDM symbol `i` (SIGNAL is i=0) starting
/// immediately after the preamble, stripping its 16-sample cyclic prefix.
pub fn extract_symbol_body(x: &[Complex64], lt_peak_index: isize, symbol_index: usize) -> Result<&[Complex64]> {
    let start = lt_peak_index + 64 + 16 + 80 * symbol_index as isize;
    let end = start + FFT_SIZE as isize;
    if start < 0 || end as usize > x.len() {
        return Err(DspError::WindowOutOfBounds {
            start: start.max(0) as usize,
            end: end.max(0) as usize,
            len: x.len(),
        }
        .into());
    }
    Ok(&x[start as usize..end as usize])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn bin_to_signed_roundtrips_through_signed_to_bin() {
        for k in -32..=31 {
            assert_eq!(bin_to_signed(signed_to_bin(k)), k);
        }
    }

    #[test]
    fn extract_symbol_body_out_of_bounds_errors() {
        let x = vec![Complex64::new(0.0, 0.0); 10];
        assert!(extract_symbol_body(&x, 0, 0).is_err());
    }

    #[test]
    fn identity_channel_flat_signal_has_near_zero_phase_tracking() {
        let eq = [Complex64::new(1.0, 0.0); FFT_SIZE];
        let mut equalizer = SymbolEqualizer::new(eq);

        // Build a clean SIGNAL-like time-domain symbol: IFFT of all-pilot-correct spectrum.
        let mut spectrum = [Complex64::new(0.0, 0.0); FFT_SIZE];
        for (&bin, &signed) in PILOT_CARRIERS_IDX.iter().zip(PILOT_CARRIERS_SIGNED.iter()) {
            spectrum[bin] = Complex64::new(pilot_base_polarity(signed) * pilot_polarity(0), 0.0);
        }
        let mut planner = FftPlanner::new();
        let ifft = planner.plan_fft_inverse(FFT_SIZE);
        ifft.process(&mut spectrum);
        for v in spectrum.iter_mut() {
            *v *= 1.0 / FFT_SIZE as f64;
        }

        let (_, report) = equalizer.equalize_symbol(&spectrum, 0, &[0.25; 4]).unwrap();
        assert_abs_diff_eq!(report.theta, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(report.slope, 0.0, epsilon = 1e-6);
    }
}
