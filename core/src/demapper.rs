//! Soft demapping: equalized data-subcarrier symbols to log-likelihood
//! ratios.

use num_complex::Complex64;

use crate::errors::{DspError, Result};
use crate::tables::Modulation;

/// Soft-demap one OFDM symbol's worth of data-subcarrier values (48 complex
/// numbers) into LLRs. BPSK yields 48 LLRs, QPSK 96 (Re/Im interleaved).
/// 16-/64-QAM are rejected: they are in the mandatory RATE_MAP but not the
/// mandatory decode path.
pub fn demap(symbols: &[Complex64], modulation: Modulation) -> Result<Vec<f64>> {
    match modulation {
        Modulation::Bpsk => Ok(symbols.iter().map(|s| s.re).collect()),
        Modulation::Qpsk => {
            let mut llrs = Vec::with_capacity(symbols.len() * 2);
            for s in symbols {
                llrs.push(s.re);
                llrs.push(s.im);
            }
            Ok(llrs)
        }
        Modulation::Qam16 => Err(DspError::UnsupportedModulation("16-QAM").into()),
        Modulation::Qam64 => Err(DspError::UnsupportedModulation("64-QAM").into()),
    }
}

/// Hard-decision a slice of LLRs: positive -> 1, negative (or zero) -> 0.
pub fn hard_decision(llrs: &[f64]) -> Vec<u8> {
    llrs.iter().map(|&v| if v > 0.0 { 1 } else { 0 }).collect()
}
