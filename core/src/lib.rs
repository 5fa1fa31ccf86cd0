//! IEEE 802.11a/g OFDM baseband physical layer: receive packet detection,
//! acquisition, equalization and soft-decision decoding, plus the matching
//! transmit-side primitives used to build reference test vectors.
//!
//! The receive chain (the stages documented in the modules below) is a
//! sequential pipeline driven end-to-end by [`receiver::Receiver`]; the
//! transmit side mirrors it behind [`transmitter::Transmitter`].
//! [`channel_sim`] is a test fixture, not part of the physical layer: it
//! models a noisy/multipath/offset channel so the receive chain can be
//! exercised against something more realistic than a clean waveform.

pub mod acquisition;
pub mod channel_estimation;
pub mod channel_sim;
pub mod complex_ext;
pub mod config;
pub mod context;
pub mod demapper;
pub mod equalizer;
pub mod errors;
pub mod fec;
pub mod frame_fields;
pub mod framer;
pub mod interleave;
pub mod logging;
pub mod mapper;
pub mod receiver;
pub mod scrambler;
pub mod tables;
pub mod transmitter;

pub use context::FrameContext;
pub use errors::{Ieee80211Error, Result};
pub use receiver::{DropReason, FrameResult, Receiver, SignalFieldReport};
pub use transmitter::{Transmitter, TransmitResult};
