//! Sample-accurate timing via cross-correlation against the ideal long
//! training symbol.

use num_complex::Complex64;

use crate::complex_ext::sign_quantize;
use crate::tables::{lts_time_domain, FFT_SIZE};

/// Search window, centered `SEARCH_CENTER_OFFSET` samples past `falling_edge`,
/// widened by `SEARCH_RADIUS` in each direction to cover coarse-detector
/// jitter. The preamble is STS[0,160) . GI2[160,192) . T1[192,256) .
/// T2[256,320); the packet detector's 32-sample boxcar puts `falling_edge`
/// around 160-190 samples past the start of the preamble, so the T1-end
/// correlation peak (last T1 sample, preamble-relative index 255) sits only
/// ~65-95 samples past `falling_edge`. Centering on 80 with a radius of 60
/// spans both the T1-end and T2-end peaks.
const SEARCH_CENTER_OFFSET: isize = 80;
const SEARCH_RADIUS: isize = 60;

/// Output of the long-symbol correlator.
#[derive(Debug, Clone)]
pub struct LongSymbolResult {
    /// Correlator output at the peak.
    pub peak_value: Complex64,
    /// Index of the sample with maximum |output| within the search window;
    /// the end of T1 / start of T2.
    pub peak_index: isize,
    /// `peak_index - sample_advance`: the sample-accurate start of data
    /// symbols, used as the FFT window origin by later stages.
    pub lt_peak_index: isize,
    /// Full correlator output over the search window, for diagnostics.
    pub correlation: Vec<Complex64>,
}

/// The 1-bit-per-axis quantized, reversed-and-conjugated FIR kernel built
/// from the ideal LTS time-domain symbol.
fn matched_kernel() -> [Complex64; FFT_SIZE] {
    let l = lts_time_domain();
    let mut l_hat = [Complex64::new(0.0, 0.0); FFT_SIZE];
    for (dst, &src) in l_hat.iter_mut().zip(l.iter()) {
        *dst = sign_quantize(src);
    }
    let mut kernel = [Complex64::new(0.0, 0.0); FFT_SIZE];
    for n in 0..FFT_SIZE {
        kernel[n] = l_hat[FFT_SIZE - 1 - n].conj();
    }
    kernel
}

/// Matched-filter output at sample index `i`: `sum_n kernel[n] * x[i-n]`,
/// requiring at least 64 samples of history.
fn correlate_at(x: &[Complex64], kernel: &[Complex64; FFT_SIZE], i: usize) -> Option<Complex64> {
    if i + 1 < FFT_SIZE {
        return None;
    }
    let mut acc = Complex64::new(0.0, 0.0);
    for (n, &k) in kernel.iter().enumerate() {
        acc += k * x[i - n];
    }
    Some(acc)
}

/// Cross-correlate `x` against the ideal LTS within a search window anchored
/// on `falling_edge`, and report the sample-accurate peak.
/// `sample_advance` moves `lt_peak_index` slightly into the cyclic prefix of
/// the following symbol to guard against pre-cursor ISI.
pub fn correlate(x: &[Complex64], falling_edge: isize, sample_advance: usize) -> Option<LongSymbolResult> {
    if falling_edge < 0 {
        return None;
    }
    let kernel = matched_kernel();
    let center = falling_edge + SEARCH_CENTER_OFFSET;
    let lo = (center - SEARCH_RADIUS).max(FFT_SIZE as isize - 1);
    let hi = (center + SEARCH_RADIUS).min(x.len() as isize - 1);
    if lo > hi {
        return None;
    }

    let mut correlation = Vec::with_capacity((hi - lo + 1) as usize);
    let mut peak_index = lo;
    let mut peak_value = Complex64::new(0.0, 0.0);
    let mut peak_mag = -1.0f64;

    for i in lo..=hi {
        let y = correlate_at(x, &kernel, i as usize).unwrap_or(Complex64::new(0.0, 0.0));
        correlation.push(y);
        if y.norm() > peak_mag {
            peak_mag = y.norm();
            peak_value = y;
            peak_index = i;
        }
    }

    Some(LongSymbolResult {
        peak_value,
        peak_index,
        lt_peak_index: peak_index - sample_advance as isize,
        correlation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::packet_detector;
    use crate::framer::build_preamble;

    /// Preamble-relative index of T1's last sample: STS[0,160) . GI2[160,192)
    /// . T1[192,256) . T2[256,320), so T1 ends at index 255. This is derived
    /// from the preamble layout, not from [`SEARCH_CENTER_OFFSET`], so the
    /// test fails if the search window drifts away from the true peak.
    const T1_END_PREAMBLE_RELATIVE: isize = 255;

    #[test]
    fn correlator_peaks_at_the_injected_lts() {
        let leading_padding = 256usize;
        let preamble = build_preamble();
        let mut x = vec![Complex64::new(0.0, 0.0); leading_padding];
        x.extend(preamble);
        x.extend(vec![Complex64::new(0.0, 0.0); 200]);

        let true_peak = leading_padding as isize + T1_END_PREAMBLE_RELATIVE;

        let trace = packet_detector::detect(&x);
        assert!(trace.falling_edge > 0, "packet detector found no falling edge");

        let result = correlate(&x, trace.falling_edge, 1).unwrap();
        assert!(
            (result.peak_index - true_peak).abs() <= 6,
            "peak at {}, expected near {}",
            result.peak_index,
            true_peak
        );
        assert_eq!(result.lt_peak_index, result.peak_index - 1);
    }

    #[test]
    fn negative_falling_edge_yields_none() {
        let x = vec![Complex64::new(0.0, 0.0); 500];
        assert!(correlate(&x, -1, 1).is_none());
    }
}
