//! 802.11a/g error types with granular categories

use thiserror::Error;

/// Top-level error type for all 802.11a/g operations
#[derive(Debug, Error)]
pub enum Ieee80211Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("DSP processing error: {0}")]
    Dsp(#[from] DspError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),
}

/// Configuration errors: invalid tunables passed by the caller
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid rate key: {0:#06b} is not in RATE_MAP")]
    UnknownRateKey(u8),

    #[error("Invalid SNR: {snr_db} dB (must be finite)")]
    InvalidSnr { snr_db: f64 },

    #[error("Invalid scrambler seed: 0 is not a legal initial LFSR state")]
    ZeroScramblerSeed,
}

/// DSP / physical-layer processing errors
#[derive(Debug, Error)]
pub enum DspError {
    #[error("modulation {0} is not supported by the soft demapper")]
    UnsupportedModulation(&'static str),

    #[error("extraction window [{start}, {end}) exceeds input length {len}")]
    WindowOutOfBounds { start: usize, end: usize, len: usize },

    #[error("empty input signal")]
    EmptySignal,
}

/// Transmit-side encoding errors
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("PSDU length {len} exceeds the 12-bit SIGNAL length field (max 4095)")]
    PsduTooLong { len: usize },

    #[error("bitstream length {actual} is not a multiple of n_bpsc={n_bpsc}")]
    BitstreamNotAligned { actual: usize, n_bpsc: usize },
}

/// Result type alias for 802.11a/g operations
pub type Result<T> = std::result::Result<T, Ieee80211Error>;
