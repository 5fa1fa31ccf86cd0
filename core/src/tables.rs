//! Fixed constants shared by every pipeline stage: FFT-bin maps, the rate
//! table, constellation lookup tables and the standard training sequences.
//!
//! Every value here is an invariant of the IEEE 802.11a/g physical layer,
//! never a tunable — tunables live in [`crate::config`].

use num_complex::Complex64;
use rustfft::FftPlanner;
use std::sync::OnceLock;

/// Size of the OFDM FFT/IFFT.
pub const FFT_SIZE: usize = 64;
/// Length of the cyclic prefix, in samples.
pub const CP_LEN: usize = 16;
/// Length of an OFDM symbol including cyclic prefix.
pub const SYMBOL_LEN: usize = FFT_SIZE + CP_LEN;
/// Receive sample rate in Hz.
pub const SAMPLE_RATE_HZ: f64 = 20e6;

/// Convert a signed subcarrier index (-32..=31) to a natural FFT bin index.
pub const fn signed_to_bin(k: i32) -> usize {
    (((k % FFT_SIZE as i32) + FFT_SIZE as i32) % FFT_SIZE as i32) as usize
}

/// The 48 data-subcarrier signed indices, in transmit/receive mapping order:
/// ascending over -26..=26, skipping DC (0) and the four pilot positions.
pub fn data_carriers_signed() -> [i32; 48] {
    let mut out = [0i32; 48];
    let mut n = 0;
    for k in -26..=26i32 {
        if k == 0 || PILOT_CARRIERS_SIGNED.contains(&k) {
            continue;
        }
        out[n] = k;
        n += 1;
    }
    debug_assert_eq!(n, 48);
    out
}

/// FFT-bin form of [`data_carriers_signed`].
pub fn data_carriers_idx() -> [usize; 48] {
    let mut out = [0usize; 48];
    for (i, &k) in data_carriers_signed().iter().enumerate() {
        out[i] = signed_to_bin(k);
    }
    out
}

/// Pilot FFT bins, in the order {7, 21, 43, 57}.
pub const PILOT_CARRIERS_IDX: [usize; 4] = [7, 21, 43, 57];
/// Pilot signed subcarrier indices, aligned with [`PILOT_CARRIERS_IDX`].
pub const PILOT_CARRIERS_SIGNED: [i32; 4] = [7, 21, -21, -7];

/// Base pilot polarity, aligned to ascending signed order [-21, -7, +7, +21].
pub const PILOT_BASE_POLARITY: [f64; 4] = [1.0, 1.0, 1.0, -1.0];

/// Returns the base polarity for the pilot at the given signed subcarrier index.
pub fn pilot_base_polarity(signed_idx: i32) -> f64 {
    match signed_idx {
        -21 => PILOT_BASE_POLARITY[0],
        -7 => PILOT_BASE_POLARITY[1],
        7 => PILOT_BASE_POLARITY[2],
        21 => PILOT_BASE_POLARITY[3],
        _ => unreachable!("not a pilot subcarrier: {signed_idx}"),
    }
}

/// The standard 127-entry pilot polarity sequence (IEEE 802.11a Annex G),
/// defined as the output of the scrambler LFSR (x^7+x^4+1) seeded with the
/// all-ones state, fed 127 zero bits: output bit 0 -> polarity +1, bit 1 -> -1.
pub fn pilot_polarity(symbol_index: usize) -> f64 {
    static SEQ: OnceLock<[f64; 127]> = OnceLock::new();
    let seq = SEQ.get_or_init(|| {
        let mut state: u8 = 0x7F; // all ones, 7 bits
        let mut out = [0f64; 127];
        for slot in out.iter_mut() {
            let feedback = ((state >> 6) ^ (state >> 3)) & 1;
            *slot = if feedback == 0 { 1.0 } else { -1.0 };
            state = ((state << 1) | feedback) & 0x7F;
        }
        out
    });
    seq[symbol_index % 127]
}

/// One entry of the 802.11a/g RATE_MAP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateInfo {
    pub rate_key: u8,
    pub mbps: u32,
    pub modulation: Modulation,
    pub n_bpsc: usize,
    pub n_cbps: usize,
    pub n_dbps: usize,
}

/// Modulation used on the data subcarriers for a given rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modulation {
    Bpsk,
    Qpsk,
    Qam16,
    Qam64,
}

impl Modulation {
    pub fn name(self) -> &'static str {
        match self {
            Modulation::Bpsk => "BPSK",
            Modulation::Qpsk => "QPSK",
            Modulation::Qam16 => "16-QAM",
            Modulation::Qam64 => "64-QAM",
        }
    }
}

/// The eight legal 4-bit RATE field values and their decoded parameters.
pub const RATE_MAP: [RateInfo; 8] = [
    RateInfo { rate_key: 0b1101, mbps: 6, modulation: Modulation::Bpsk, n_bpsc: 1, n_cbps: 48, n_dbps: 24 },
    RateInfo { rate_key: 0b1111, mbps: 9, modulation: Modulation::Bpsk, n_bpsc: 1, n_cbps: 48, n_dbps: 36 },
    RateInfo { rate_key: 0b0101, mbps: 12, modulation: Modulation::Qpsk, n_bpsc: 2, n_cbps: 96, n_dbps: 48 },
    RateInfo { rate_key: 0b0111, mbps: 18, modulation: Modulation::Qpsk, n_bpsc: 2, n_cbps: 96, n_dbps: 72 },
    RateInfo { rate_key: 0b1001, mbps: 24, modulation: Modulation::Qam16, n_bpsc: 4, n_cbps: 192, n_dbps: 96 },
    RateInfo { rate_key: 0b1011, mbps: 36, modulation: Modulation::Qam16, n_bpsc: 4, n_cbps: 192, n_dbps: 144 },
    RateInfo { rate_key: 0b0001, mbps: 48, modulation: Modulation::Qam64, n_bpsc: 6, n_cbps: 288, n_dbps: 192 },
    RateInfo { rate_key: 0b0011, mbps: 54, modulation: Modulation::Qam64, n_bpsc: 6, n_cbps: 288, n_dbps: 216 },
];

/// Look up a rate key (the 4-bit value carried in SIGNAL bits 0..3).
pub fn rate_lookup(rate_key: u8) -> Option<RateInfo> {
    RATE_MAP.iter().copied().find(|r| r.rate_key == rate_key)
}

/// SIGNAL field modulation: always BPSK rate-1/2, regardless of the data rate.
pub fn signal_rate_info() -> RateInfo {
    rate_lookup(0b1101).expect("BPSK 1/2 entry must exist")
}

/// The 26 negative-side and 26 positive-side LTS coefficients, per IEEE 802.11a.
const LTS_NEG: [f64; 26] = [
    1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, 1.0, -1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, -1.0, -1.0, 1.0,
    1.0, -1.0, 1.0, -1.0, 1.0, 1.0, 1.0, 1.0,
];
const LTS_POS: [f64; 26] = [
    1.0, -1.0, -1.0, 1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0, -1.0, -1.0, -1.0, -1.0, 1.0, 1.0, -1.0,
    -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, 1.0, 1.0, 1.0,
];

/// LTS frequency-domain vector, in natural FFT-bin order (64 bins).
pub fn lts_freq_domain() -> [Complex64; FFT_SIZE] {
    let mut out = [Complex64::new(0.0, 0.0); FFT_SIZE];
    for (i, &v) in LTS_NEG.iter().enumerate() {
        let k = -26 + i as i32;
        out[signed_to_bin(k)] = Complex64::new(v, 0.0);
    }
    for (i, &v) in LTS_POS.iter().enumerate() {
        let k = 1 + i as i32;
        out[signed_to_bin(k)] = Complex64::new(v, 0.0);
    }
    out
}

/// LTS time-domain symbol (64 samples), the 64-point IFFT of [`lts_freq_domain`]
/// with the standard 1/64 normalization undone on the inverse transform so the
/// result round-trips with the receive-side forward-FFT scaling.
pub fn lts_time_domain() -> [Complex64; FFT_SIZE] {
    static SYM: OnceLock<[Complex64; FFT_SIZE]> = OnceLock::new();
    *SYM.get_or_init(|| {
        let mut buf = lts_freq_domain();
        let mut planner = FftPlanner::new();
        let ifft = planner.plan_fft_inverse(FFT_SIZE);
        ifft.process(&mut buf);
        let scale = 1.0 / FFT_SIZE as f64;
        for v in buf.iter_mut() {
            *v *= scale;
        }
        buf
    })
}

/// STS frequency-domain vector, in natural FFT-bin order, scaled so its time
/// domain has the standard short-training-sequence amplitude.
pub fn sts_freq_domain() -> [Complex64; FFT_SIZE] {
    let scale = (13.0f64 / 6.0).sqrt();
    let mut out = [Complex64::new(0.0, 0.0); FFT_SIZE];
    let one_plus_j = Complex64::new(1.0, 1.0) * scale;
    let neg_one_minus_j = -one_plus_j;
    let entries: [(i32, Complex64); 12] = [
        (-24, neg_one_minus_j),
        (-20, neg_one_minus_j),
        (-16, one_plus_j),
        (-12, one_plus_j),
        (-8, one_plus_j),
        (-4, neg_one_minus_j),
        (4, neg_one_minus_j),
        (8, neg_one_minus_j),
        (12, one_plus_j),
        (16, one_plus_j),
        (20, one_plus_j),
        (24, one_plus_j),
    ];
    for (k, v) in entries {
        out[signed_to_bin(k)] = v;
    }
    out
}

/// STS time-domain symbol. The standard repeats a 16-sample period 10 times
/// across the 160-sample short training field; this returns that 16-sample
/// period (the first quarter of the 64-point IFFT, which is exactly periodic
/// with period 16 because only multiples of 4 are nonzero in frequency).
pub fn sts_time_domain_period16() -> [Complex64; 16] {
    static SYM: OnceLock<[Complex64; 16]> = OnceLock::new();
    *SYM.get_or_init(|| {
        let mut buf = sts_freq_domain();
        let mut planner = FftPlanner::new();
        let ifft = planner.plan_fft_inverse(FFT_SIZE);
        ifft.process(&mut buf);
        let scale = 1.0 / FFT_SIZE as f64;
        let mut period = [Complex64::new(0.0, 0.0); 16];
        period.copy_from_slice(&buf[0..16]);
        for v in period.iter_mut() {
            *v *= scale;
        }
        period
    })
}

/// BPSK constellation: bit 0 -> -1, bit 1 -> +1.
pub fn bpsk_point(bit: u8) -> Complex64 {
    Complex64::new(if bit == 0 { -1.0 } else { 1.0 }, 0.0)
}

/// QPSK constellation, scaled by 1/sqrt(2): (b0, b1) -> (I, Q).
pub fn qpsk_point(b0: u8, b1: u8) -> Complex64 {
    let s = std::f64::consts::FRAC_1_SQRT_2;
    let i = if b0 == 0 { -1.0 } else { 1.0 };
    let q = if b1 == 0 { -1.0 } else { 1.0 };
    Complex64::new(i * s, q * s)
}

/// Gray-coded 2-bit amplitude: 00 -> -3, 01 -> -1, 11 -> +1, 10 -> +3
/// (unscaled; callers divide by the modulation's normalization factor).
fn gray2_amplitude(b0: u8, b1: u8) -> f64 {
    match (b0, b1) {
        (0, 0) => -3.0,
        (0, 1) => -1.0,
        (1, 1) => 1.0,
        (1, 0) => 3.0,
        _ => unreachable!(),
    }
}

/// 16-QAM constellation, scaled by 1/sqrt(10): (b0,b1,b2,b3) -> (I, Q),
/// per-axis Gray coding matching IEEE 802.11a Table 17-10. Present for
/// RATE_MAP/[`crate::mapper`]/[`crate::demapper`] completeness; not on the
/// mandatory decode path.
pub fn qam16_point(b0: u8, b1: u8, b2: u8, b3: u8) -> Complex64 {
    let s = 1.0 / 10f64.sqrt();
    Complex64::new(gray2_amplitude(b0, b1) * s, gray2_amplitude(b2, b3) * s)
}

/// Gray-coded 3-bit amplitude for 64-QAM: 000->-7, 001->-5, 011->-3, 010->-1,
/// 110->+1, 111->+3, 101->+5, 100->+7.
fn gray3_amplitude(b0: u8, b1: u8, b2: u8) -> f64 {
    match (b0, b1, b2) {
        (0, 0, 0) => -7.0,
        (0, 0, 1) => -5.0,
        (0, 1, 1) => -3.0,
        (0, 1, 0) => -1.0,
        (1, 1, 0) => 1.0,
        (1, 1, 1) => 3.0,
        (1, 0, 1) => 5.0,
        (1, 0, 0) => 7.0,
        _ => unreachable!(),
    }
}

/// 64-QAM constellation, scaled by 1/sqrt(42): (b0..b5) -> (I, Q).
/// Present for completeness; not on the mandatory decode path.
pub fn qam64_point(b0: u8, b1: u8, b2: u8, b3: u8, b4: u8, b5: u8) -> Complex64 {
    let s = 1.0 / 42f64.sqrt();
    Complex64::new(gray3_amplitude(b0, b1, b2) * s, gray3_amplitude(b3, b4, b5) * s)
}
