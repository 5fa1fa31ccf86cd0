//! The top-level transmit facade: validates `psdu`/`rate_key`, picks a
//! scrambler seed, and delegates to [`crate::framer`].

use num_complex::Complex64;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::TransmitOptions;
use crate::errors::{ConfigError, EncodingError, Result};
use crate::framer;
use crate::tables::{self, RateInfo};

/// Output of [`Transmitter::transmit`].
#[derive(Debug, Clone)]
pub struct TransmitResult {
    pub samples: Vec<Complex64>,
    /// The scrambler's initial LFSR state actually used, so a caller can
    /// feed it straight back through [`crate::scrambler::descramble`] in
    /// tests without relying on the known-zero-service-bits recovery.
    pub scrambler_seed: u8,
}

/// Stateless transmit-side facade; owns no state across frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transmitter;

impl Transmitter {
    pub fn new() -> Self {
        Self
    }

    /// Build the complex baseband waveform for `psdu` at `rate_key`.
    pub fn transmit(&self, psdu: &[u8], rate_key: u8, opts: &TransmitOptions) -> Result<TransmitResult> {
        let rate: RateInfo = tables::rate_lookup(rate_key).ok_or(ConfigError::UnknownRateKey(rate_key))?;
        if psdu.len() > 4095 {
            return Err(EncodingError::PsduTooLong { len: psdu.len() }.into());
        }

        let mut rng = match opts.random_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let scrambler_seed = loop {
            let candidate = (rng.next_u32() & 0x7F) as u8;
            if candidate != 0 {
                break candidate;
            }
        };

        let mut samples = vec![Complex64::new(0.0, 0.0); opts.leading_padding];
        samples.extend(framer::build_frame(psdu, rate, scrambler_seed)?);
        samples.extend(vec![Complex64::new(0.0, 0.0); opts.trailing_padding]);

        Ok(TransmitResult { samples, scrambler_seed })
    }
}
