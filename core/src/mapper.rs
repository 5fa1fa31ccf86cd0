//! Transmit-side constellation mapper, mirroring [`crate::demapper`].

use num_complex::Complex64;

use crate::errors::{EncodingError, Result};
use crate::tables::{bpsk_point, qam16_point, qam64_point, qpsk_point, Modulation};

/// Map a coded-and-interleaved bitstream to constellation symbols. `bits.len()`
/// must be a multiple of the modulation's bits-per-subcarrier-symbol
/// (`n_bpsc`: 1/2/4/6 for BPSK/QPSK/16-QAM/64-QAM).
pub fn map(bits: &[u8], modulation: Modulation) -> Result<Vec<Complex64>> {
    let n_bpsc = modulation.n_bpsc();
    if bits.len() % n_bpsc != 0 {
        return Err(EncodingError::BitstreamNotAligned { actual: bits.len(), n_bpsc }.into());
    }
    let symbols = bits
        .chunks(n_bpsc)
        .map(|c| match modulation {
            Modulation::Bpsk => bpsk_point(c[0]),
            Modulation::Qpsk => qpsk_point(c[0], c[1]),
            Modulation::Qam16 => qam16_point(c[0], c[1], c[2], c[3]),
            Modulation::Qam64 => qam64_point(c[0], c[1], c[2], c[3], c[4], c[5]),
        })
        .collect();
    Ok(symbols)
}

impl Modulation {
    /// Coded bits carried by one subcarrier symbol under this modulation.
    pub fn n_bpsc(self) -> usize {
        match self {
            Modulation::Bpsk => 1,
            Modulation::Qpsk => 2,
            Modulation::Qam16 => 4,
            Modulation::Qam64 => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bpsk_maps_one_bit_per_symbol() {
        let bits = [0u8, 1, 1, 0];
        let symbols = map(&bits, Modulation::Bpsk).unwrap();
        assert_eq!(symbols.len(), 4);
        assert_eq!(symbols[0].re, -1.0);
        assert_eq!(symbols[1].re, 1.0);
    }

    #[test]
    fn misaligned_bitstream_is_rejected() {
        let bits = [0u8, 1, 1];
        assert!(map(&bits, Modulation::Qpsk).is_err());
    }

    #[test]
    fn qam16_has_unit_ish_average_power() {
        let bits: Vec<u8> = (0..16u8)
            .flat_map(|v| (0..4).rev().map(move |b| (v >> b) & 1))
            .collect();
        let symbols = map(&bits, Modulation::Qam16).unwrap();
        let avg_power: f64 = symbols.iter().map(|s| s.norm_sqr()).sum::<f64>() / symbols.len() as f64;
        assert!((avg_power - 1.0).abs() < 0.05, "avg power {avg_power}");
    }
}
