//! Transmit-side OFDM framer: assembles the training preamble, the SIGNAL
//! symbol and the DATA symbols into one complex baseband waveform.
//!
//! Every OFDM symbol (SIGNAL and DATA alike) is built the same way: map
//! 48 coded-and-interleaved bits to subcarrier symbols, insert the four
//! pilots and the 48 data values into a 64-bin spectrum, inverse-FFT, and
//! prepend the cyclic prefix. The inverse transform uses the same 1/64
//! scale [`crate::tables::lts_time_domain`] already applies, so channel
//! estimation's H = Y/L_tx ratio absorbs the constant scale factor and
//! the receive chain needs no matching adjustment.

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

use crate::errors::Result;
use crate::fec::conv_encoder;
use crate::frame_fields;
use crate::interleave;
use crate::mapper;
use crate::scrambler;
use crate::tables::{self, RateInfo};

fn pilot_inserted_spectrum(data: &[Complex64], symbol_index: usize) -> [Complex64; 64] {
    let mut spectrum = [Complex64::new(0.0, 0.0); 64];
    for (i, &bin) in tables::data_carriers_idx().iter().enumerate() {
        spectrum[bin] = data[i];
    }
    for (&bin, &signed) in tables::PILOT_CARRIERS_IDX.iter().zip(tables::PILOT_CARRIERS_SIGNED.iter()) {
        let polarity = tables::pilot_base_polarity(signed) * tables::pilot_polarity(symbol_index);
        spectrum[bin] = Complex64::new(polarity, 0.0);
    }
    spectrum
}

fn ofdm_symbol_time_domain(mut spectrum: [Complex64; 64], ifft: &Arc<dyn Fft<f64>>) -> [Complex64; 80] {
    ifft.process(&mut spectrum);
    let scale = 1.0 / 64.0;
    for v in spectrum.iter_mut() {
        *v *= scale;
    }
    let mut out = [Complex64::new(0.0, 0.0); 80];
    out[0..16].copy_from_slice(&spectrum[48..64]);
    out[16..80].copy_from_slice(&spectrum);
    out
}

/// The 320-sample training preamble: 10 repetitions of the 16-sample short
/// training period, a 32-sample second guard interval, then two copies of
/// the 64-sample long training symbol.
pub fn build_preamble() -> Vec<Complex64> {
    let period = tables::sts_time_domain_period16();
    let lts = tables::lts_time_domain();
    let mut out = Vec::with_capacity(320);
    for _ in 0..10 {
        out.extend_from_slice(&period);
    }
    out.extend_from_slice(&lts[32..64]);
    out.extend_from_slice(&lts);
    out.extend_from_slice(&lts);
    out
}

/// Build the single SIGNAL OFDM symbol (80 samples): 24 bits, rate-1/2
/// encoded to 48 coded bits, BPSK-interleaved and mapped, symbol index 0.
pub fn build_signal_symbol(rate_key: u8, length: u16, ifft: &Arc<dyn Fft<f64>>) -> Vec<Complex64> {
    let bits = frame_fields::build_signal(rate_key, length);
    let coded = conv_encoder::encode(&bits);
    let interleaved = interleave::interleave(&coded, 48, 1);
    let symbols = mapper::map(&interleaved, tables::Modulation::Bpsk).expect("BPSK mapping never fails on aligned input");
    let spectrum = pilot_inserted_spectrum(&symbols, 0);
    ofdm_symbol_time_domain(spectrum, ifft).to_vec()
}

/// Build the DATA OFDM symbols for `psdu` at `rate`: scramble, force the
/// tail bits to zero post-scramble, convolutional-encode, then chunk
/// into one OFDM symbol per `n_cbps` coded bits.
pub fn build_data_symbols(
    psdu: &[u8],
    rate: RateInfo,
    scrambler_seed: u8,
    ifft: &Arc<dyn Fft<f64>>,
) -> Result<Vec<Complex64>> {
    let layout = frame_fields::data_bit_layout(psdu.len(), rate.n_dbps);
    let bits = frame_fields::build_data_bits(psdu, rate.n_dbps);
    let mut scrambled = scrambler::scramble(&bits, scrambler_seed);
    let tail_start = 16 + layout.n_psdu_bits;
    for b in &mut scrambled[tail_start..tail_start + 6] {
        *b = 0;
    }
    let coded = conv_encoder::encode(&scrambled);

    let num_symbols = layout.n_data_bits / rate.n_dbps;
    let mut out = Vec::with_capacity(num_symbols * 80);
    for s in 0..num_symbols {
        let chunk = &coded[s * rate.n_cbps..(s + 1) * rate.n_cbps];
        let interleaved = interleave::interleave(chunk, rate.n_cbps, rate.n_bpsc);
        let symbols = mapper::map(&interleaved, rate.modulation)?;
        let spectrum = pilot_inserted_spectrum(&symbols, s + 1);
        out.extend_from_slice(&ofdm_symbol_time_domain(spectrum, ifft));
    }
    Ok(out)
}

/// Assemble the complete waveform: preamble + SIGNAL + DATA.
pub fn build_frame(psdu: &[u8], rate: RateInfo, scrambler_seed: u8) -> Result<Vec<Complex64>> {
    let mut planner = FftPlanner::new();
    let ifft = planner.plan_fft_inverse(64);

    let mut samples = build_preamble();
    samples.extend(build_signal_symbol(rate.rate_key, psdu.len() as u16, &ifft));
    samples.extend(build_data_symbols(psdu, rate, scrambler_seed, &ifft)?);
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::rate_lookup;

    #[test]
    fn preamble_has_the_standard_length() {
        assert_eq!(build_preamble().len(), 320);
    }

    #[test]
    fn signal_symbol_has_one_ofdm_symbol_length() {
        let mut planner = FftPlanner::new();
        let ifft = planner.plan_fft_inverse(64);
        let sym = build_signal_symbol(0b1101, 100, &ifft);
        assert_eq!(sym.len(), 80);
    }

    #[test]
    fn data_symbols_are_a_multiple_of_eighty_samples() {
        let rate = rate_lookup(0b0101).unwrap();
        let mut planner = FftPlanner::new();
        let ifft = planner.plan_fft_inverse(64);
        let psdu = vec![0xABu8; 50];
        let data = build_data_symbols(&psdu, rate, 0x33, &ifft).unwrap();
        assert_eq!(data.len() % 80, 0);
    }

    #[test]
    fn build_frame_concatenates_preamble_signal_and_data() {
        let rate = rate_lookup(0b1101).unwrap();
        let psdu = vec![0x11u8; 20];
        let frame = build_frame(&psdu, rate, 0x7).unwrap();
        let layout = frame_fields::data_bit_layout(psdu.len(), rate.n_dbps);
        let expected_data_symbols = layout.n_data_bits / rate.n_dbps;
        assert_eq!(frame.len(), 320 + 80 + expected_data_symbols * 80);
    }
}
