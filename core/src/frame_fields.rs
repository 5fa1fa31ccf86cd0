//! SIGNAL and DATA field layout: the bit-level contract between the
//! physical-layer convergence procedure and the bitstream that comes out
//! of (or goes into) the Viterbi decoder / convolutional encoder.

use crate::errors::{DspError, Result};
use crate::scrambler;

/// Number of bits in the decoded SIGNAL symbol.
pub const SIGNAL_BITS: usize = 24;
const SERVICE_BITS: usize = 16;
const TAIL_BITS: usize = 6;

/// Decoded contents of the SIGNAL field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalField {
    pub rate_key: u8,
    pub length: u16,
    pub parity_ok: bool,
    pub tail_ok: bool,
}

fn even_parity(bits: &[u8]) -> u8 {
    bits.iter().fold(0u8, |acc, &b| acc ^ b)
}

/// Parse the 24 decoded SIGNAL bits. `rate_key` is the raw 4-bit field;
/// the caller looks it up in [`crate::tables::rate_lookup`] to see whether
/// it names a known rate.
pub fn parse_signal(bits: &[u8]) -> Result<SignalField> {
    if bits.len() != SIGNAL_BITS {
        return Err(DspError::WindowOutOfBounds { start: 0, end: SIGNAL_BITS, len: bits.len() }.into());
    }
    let rate_key = (bits[0] << 3) | (bits[1] << 2) | (bits[2] << 1) | bits[3];
    let mut length: u16 = 0;
    for i in 0..12 {
        length |= (bits[5 + i] as u16) << i;
    }
    let parity_ok = bits[17] == even_parity(&bits[0..17]);
    let tail_ok = bits[18..24].iter().all(|&b| b == 0);
    Ok(SignalField { rate_key, length, parity_ok, tail_ok })
}

/// Build the 24 SIGNAL bits for `rate_key`/`length` (transmit side).
pub fn build_signal(rate_key: u8, length: u16) -> [u8; SIGNAL_BITS] {
    let mut bits = [0u8; SIGNAL_BITS];
    bits[0] = (rate_key >> 3) & 1;
    bits[1] = (rate_key >> 2) & 1;
    bits[2] = (rate_key >> 1) & 1;
    bits[3] = rate_key & 1;
    bits[4] = 0;
    for i in 0..12 {
        bits[5 + i] = ((length >> i) & 1) as u8;
    }
    bits[17] = even_parity(&bits[0..17]);
    bits
}

/// Bit counts describing one DATA field's layout for a given PSDU length
/// and rate. `n_dbps` is the number of data bits carried per OFDM symbol
/// at this rate.
#[derive(Debug, Clone, Copy)]
pub struct DataBitLayout {
    pub n_psdu_bits: usize,
    pub n_pad_bits: usize,
    pub n_data_bits: usize,
}

pub fn data_bit_layout(psdu_len_bytes: usize, n_dbps: usize) -> DataBitLayout {
    let n_psdu_bits = psdu_len_bytes * 8;
    let raw = SERVICE_BITS + n_psdu_bits + TAIL_BITS;
    let n_data_bits = raw.div_ceil(n_dbps) * n_dbps;
    DataBitLayout { n_psdu_bits, n_pad_bits: n_data_bits - raw, n_data_bits }
}

fn byte_to_bits_lsb_first(byte: u8, out: &mut Vec<u8>) {
    for i in 0..8 {
        out.push((byte >> i) & 1);
    }
}

fn bits_to_byte_lsb_first(bits: &[u8]) -> u8 {
    bits.iter().enumerate().fold(0u8, |acc, (i, &b)| acc | (b << i))
}

/// Append a trailing little-endian CRC-32 (IEEE 802 polynomial, via
/// `crc32fast`) to `payload`, producing the PSDU bytes this crate's
/// transmit/receive APIs exchange (MAC payload + FCS).
pub fn append_crc32(payload: &[u8]) -> Vec<u8> {
    let mut psdu = payload.to_vec();
    psdu.extend(crc32fast::hash(payload).to_le_bytes());
    psdu
}

/// Build the pre-scramble DATA field bitstream: SERVICE (16 zero bits) +
/// PSDU (LSB-first per byte) + tail (6 zero bits) + zero padding to a
/// multiple of `n_dbps`.
pub fn build_data_bits(psdu: &[u8], n_dbps: usize) -> Vec<u8> {
    let layout = data_bit_layout(psdu.len(), n_dbps);
    let mut bits = Vec::with_capacity(layout.n_data_bits);
    bits.extend(std::iter::repeat(0u8).take(SERVICE_BITS));
    for &byte in psdu {
        byte_to_bits_lsb_first(byte, &mut bits);
    }
    bits.extend(std::iter::repeat(0u8).take(TAIL_BITS));
    bits.extend(std::iter::repeat(0u8).take(layout.n_pad_bits));
    bits
}

/// Outcome of parsing the DATA field after Viterbi decoding.
#[derive(Debug, Clone)]
pub struct DataFieldResult {
    pub psdu: Vec<u8>,
    pub tail_ok: bool,
    pub crc_ok: bool,
}

/// Parse `decoded` (the Viterbi decoder's output, still pre-descramble)
/// into PSDU bytes, given the PSDU length already known from SIGNAL.
///
/// The tail-bit check runs on the pre-descramble stream because the
/// transmitter forces those 6 bits to zero after scrambling, to reset the
/// convolutional encoder regardless of scrambler state.
pub fn parse_data_bits(decoded: &[u8], psdu_len_bytes: usize) -> Result<DataFieldResult> {
    let n_psdu_bits = psdu_len_bytes * 8;
    let tail_start = SERVICE_BITS + n_psdu_bits;
    let tail_end = tail_start + TAIL_BITS;
    if decoded.len() < tail_end {
        return Err(DspError::WindowOutOfBounds { start: 0, end: tail_end, len: decoded.len() }.into());
    }
    let tail_ok = decoded[tail_start..tail_end].iter().all(|&b| b == 0);

    let descrambled = scrambler::descramble(decoded);
    let psdu_bits = &descrambled[SERVICE_BITS..SERVICE_BITS + n_psdu_bits];
    let psdu: Vec<u8> = psdu_bits.chunks(8).map(bits_to_byte_lsb_first).collect();

    let crc_ok = if psdu.len() >= 4 {
        let (payload, crc_bytes) = psdu.split_at(psdu.len() - 4);
        let transmitted = u32::from_le_bytes(crc_bytes.try_into().expect("4-byte slice"));
        crc32fast::hash(payload) == transmitted
    } else {
        false
    };

    Ok(DataFieldResult { psdu, tail_ok, crc_ok })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_round_trips_through_parse() {
        let bits = build_signal(0b0101, 1000);
        let parsed = parse_signal(&bits).unwrap();
        assert_eq!(parsed.rate_key, 0b0101);
        assert_eq!(parsed.length, 1000);
        assert!(parsed.parity_ok);
        assert!(parsed.tail_ok);
    }

    #[test]
    fn corrupted_parity_bit_is_detected() {
        let mut bits = build_signal(0b1101, 42);
        bits[17] ^= 1;
        let parsed = parse_signal(&bits).unwrap();
        assert!(!parsed.parity_ok);
    }

    #[test]
    fn nonzero_tail_is_detected() {
        let mut bits = build_signal(0b1101, 42);
        bits[20] = 1;
        let parsed = parse_signal(&bits).unwrap();
        assert!(!parsed.tail_ok);
    }

    #[test]
    fn data_bit_layout_pads_to_multiple_of_n_dbps() {
        let layout = data_bit_layout(1000, 48);
        assert_eq!(layout.n_data_bits % 48, 0);
        assert!(layout.n_data_bits >= 16 + 8000 + 6);
    }

    #[test]
    fn build_then_parse_recovers_psdu_and_crc() {
        let payload = b"hello world, this is a test psdu payload".to_vec();
        let crc = crc32fast::hash(&payload);
        let mut psdu = payload.clone();
        psdu.extend(crc.to_le_bytes());

        let seed = 0x55;
        let bits = build_data_bits(&psdu, 48);
        let scrambled = scrambler::scramble(&bits, seed);
        // Tail bits are forced to zero post-scramble by the real framer;
        // emulate that here since this test bypasses the full framer.
        let mut tx = scrambled;
        let tail_start = 16 + psdu.len() * 8;
        for b in &mut tx[tail_start..tail_start + 6] {
            *b = 0;
        }

        let result = parse_data_bits(&tx, psdu.len()).unwrap();
        assert!(result.tail_ok);
        assert!(result.crc_ok);
        assert_eq!(result.psdu, psdu);
    }
}
