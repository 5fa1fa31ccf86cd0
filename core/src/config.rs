//! Configuration types for the receive and transmit pipelines, and for the
//! channel-impairment test fixture.
use serde::{Deserialize, Serialize};

/// Tunables accepted by [`crate::receiver::Receiver::receive`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiveOptions {
    /// Apply the coarse+fine NCO frequency-offset correction.
    pub correct_frequency_offset: bool,
    /// Weight pilot observations by estimated channel magnitude instead
    /// of equal-gain combining.
    pub use_max_ratio_combining: bool,
    /// Samples to back up the FFT window into the cyclic prefix.
    pub sample_advance: usize,
    /// Upper bound on the number of OFDM data symbols to decode from a frame;
    /// callers scanning an unsliced capture pass a generous bound.
    pub max_data_symbols: usize,
}

impl Default for ReceiveOptions {
    fn default() -> Self {
        Self {
            correct_frequency_offset: true,
            use_max_ratio_combining: true,
            sample_advance: 1,
            max_data_symbols: 1000,
        }
    }
}

/// Tunables accepted by [`crate::transmitter::Transmitter::transmit`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransmitOptions {
    /// Optional seed for the scrambler's random initial state, for
    /// reproducible self-tests.
    pub random_seed: Option<u64>,
    /// Number of idle samples to prepend before the preamble.
    pub leading_padding: usize,
    /// Number of idle samples to append after the last data symbol.
    pub trailing_padding: usize,
}

impl Default for TransmitOptions {
    fn default() -> Self {
        Self {
            random_seed: None,
            leading_padding: 0,
            trailing_padding: 0,
        }
    }
}

/// Multipath channel profile for [`crate::channel_sim::apply_defects`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultipathConfig {
    pub num_taps: usize,
    pub rms_delay_spread_ns: f64,
}

impl Default for MultipathConfig {
    fn default() -> Self {
        Self {
            num_taps: 40,
            rms_delay_spread_ns: 150.0,
        }
    }
}

/// Phase-noise profile: power spectral density in dBc/Hz at two offsets,
/// linearly interpolated (in log-log space) in between.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseNoiseConfig {
    pub close_in_dbc_hz: f64,
    pub far_out_dbc_hz: f64,
}

impl Default for PhaseNoiseConfig {
    fn default() -> Self {
        Self {
            close_in_dbc_hz: -70.0,
            far_out_dbc_hz: -140.0,
        }
    }
}

/// Full defect-model configuration used by the reference channel-impairment
/// test fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelImpairmentConfig {
    pub multipath: MultipathConfig,
    pub snr_db: f64,
    pub phase_noise: PhaseNoiseConfig,
    pub frequency_offset_hz: f64,
    pub iq_phase_imbalance_deg: f64,
    pub iq_amplitude_imbalance_db: f64,
    pub timing_offset_samples: f64,
    pub clock_drift_ppm: f64,
}

impl Default for ChannelImpairmentConfig {
    fn default() -> Self {
        Self {
            multipath: MultipathConfig::default(),
            snr_db: 35.0,
            phase_noise: PhaseNoiseConfig::default(),
            frequency_offset_hz: -100_000.0,
            iq_phase_imbalance_deg: 0.09,
            iq_amplitude_imbalance_db: -0.1,
            timing_offset_samples: 1.0,
            clock_drift_ppm: -80.0,
        }
    }
}
