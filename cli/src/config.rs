//! Command-line argument surface: exactly one of three input modes, plus
//! the receive tunables that mirror [`ieee80211ag_core::config::ReceiveOptions`].

use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};

/// Log line format emitted by [`crate::logging::StructuredLogger`].
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    Json,
    Logfmt,
    Pretty,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "802.11a/g OFDM baseband self-test and capture receiver",
    long_about = None
)]
#[command(group(
    ArgGroup::new("input_mode")
        .required(true)
        .args(["self_test", "iq_file", "frame_archive"])
))]
pub struct Cli {
    /// Run the in-process transmitter + reference channel simulator instead
    /// of reading a capture from disk.
    #[arg(long)]
    pub self_test: bool,

    /// Path to a raw interleaved-f32 (I, Q, I, Q, ...) capture: one unsliced
    /// waveform, processed as a single frame attempt.
    #[arg(long, value_name = "PATH")]
    pub iq_file: Option<PathBuf>,

    /// Path to a directory of pre-sliced per-frame captures: every `*.iq`
    /// file is one interleaved-f32 frame, named by its file stem.
    #[arg(long, value_name = "PATH")]
    pub frame_archive: Option<PathBuf>,

    /// Apply the coarse+fine NCO frequency-offset correction.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    pub correct_frequency_offset: bool,

    /// Weight pilot observations by estimated channel magnitude (MRC)
    /// instead of equal-gain combining.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    pub use_max_ratio_combining: bool,

    /// Samples to back up the FFT window into the cyclic prefix.
    #[arg(long, default_value_t = 1)]
    pub sample_advance: usize,

    /// Seed for the self-test transmitter's scrambler and the channel
    /// simulator's RNG, for reproducible self-test runs.
    #[arg(long)]
    pub random_seed: Option<u64>,

    /// PSDU length in bytes generated by the self-test transmitter.
    #[arg(long, default_value_t = 1000)]
    pub self_test_psdu_len: usize,

    /// SIGNAL rate key (4-bit RATE_MAP key) used by the self-test
    /// transmitter; default is QPSK 1/2 (0b0101, 12 Mbps).
    #[arg(long, default_value_t = 0b0101)]
    pub self_test_rate_key: u8,

    /// Structured log line format.
    #[arg(long, value_enum, default_value_t = LogFormatArg::Pretty)]
    pub log_format: LogFormatArg,

    /// Emit each frame's stage-by-stage diagnostic trail, not just its outcome.
    #[arg(short, long)]
    pub verbose: bool,
}
