//! The top-level receive facade: runs every pipeline stage in order over
//! one captured waveform slice and folds their outputs into a
//! [`crate::context::FrameContext`], matching this codebase's "the
//! processor wraps the stages; it does not reimplement them" shape.

use num_complex::Complex64;

use crate::acquisition::{freq_offset, long_symbol, nco, packet_detector};
use crate::channel_estimation;
use crate::config::ReceiveOptions;
use crate::context::FrameContext;
use crate::demapper;
use crate::equalizer::{extract_symbol_body, SymbolEqualizer};
use crate::fec::viterbi;
use crate::frame_fields::{self, SignalField};
use crate::interleave;
use crate::tables::{self, Modulation};

/// Why a frame produced no PSDU. Expected, routine outcomes of scanning a
/// capture, not exceptional ones — never a `Result::Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// No falling edge within the first 1000 samples, or it fell outside
    /// the (0, 600] validity window.
    DetectionMiss,
    /// The long-symbol peak, or the channel/data extraction windows it
    /// anchors, fell outside the captured buffer.
    TimingMiss,
    /// SIGNAL's rate key is not in [`tables::RATE_MAP`].
    UnknownRate,
    /// The rate names a modulation the soft demapper does not decode
    /// (16-/64-QAM; see [`crate::demapper`]).
    UnsupportedModulation,
}

/// Decoded SIGNAL field, reported regardless of whether data decode proceeds.
#[derive(Debug, Clone)]
pub struct SignalFieldReport {
    pub rate_name: &'static str,
    pub mbps: u32,
    pub length: u16,
    pub parity_ok: bool,
    pub tail_ok: bool,
}

/// Outcome of [`Receiver::receive`] for one waveform slice.
#[derive(Debug, Clone)]
pub struct FrameResult {
    pub signal_field: Option<SignalFieldReport>,
    pub psdu: Vec<u8>,
    pub tail_ok: bool,
    pub crc_ok: bool,
    pub drop_reason: Option<DropReason>,
    pub context: FrameContext,
}

impl FrameResult {
    fn dropped(reason: DropReason, context: FrameContext) -> Self {
        Self {
            signal_field: None,
            psdu: Vec::new(),
            tail_ok: false,
            crc_ok: false,
            drop_reason: Some(reason),
            context,
        }
    }
}

/// Stateless receive-side facade; owns no state across frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct Receiver;

impl Receiver {
    pub fn new() -> Self {
        Self
    }

    /// Run the full receive pipeline over `samples`.
    pub fn receive(&self, samples: &[Complex64], opts: &ReceiveOptions) -> FrameResult {
        let mut ctx = FrameContext::new();
        let mut x = samples.to_vec();

        let trace = packet_detector::detect(&x);
        ctx.falling_edge = trace.falling_edge;
        ctx.log.info("packet_detector", format!("falling_edge={}", trace.falling_edge));
        if !packet_detector::falling_edge_in_range(ctx.falling_edge) {
            ctx.log.warn("packet_detector", "falling edge outside (0, 600]; dropping frame");
            return FrameResult::dropped(DropReason::DetectionMiss, ctx);
        }

        if opts.correct_frequency_offset {
            if let Some(coarse) = freq_offset::coarse_offset_hz(&x, ctx.falling_edge) {
                ctx.coarse_offset_hz = coarse;
                nco::apply_nco(&mut x, coarse);
            }
            if let Some(fine) = freq_offset::fine_offset_hz(&x, ctx.falling_edge) {
                ctx.fine_offset_hz = fine;
                nco::apply_nco(&mut x, fine);
            }
            ctx.log.info(
                "freq_offset",
                format!(
                    "frequency offset corrected: coarse={:.1}Hz fine={:.1}Hz",
                    ctx.coarse_offset_hz, ctx.fine_offset_hz
                ),
            );
        }

        let Some(lt) = long_symbol::correlate(&x, ctx.falling_edge, opts.sample_advance) else {
            ctx.log.warn("long_symbol", "long-symbol correlation found no peak in its search window");
            return FrameResult::dropped(DropReason::TimingMiss, ctx);
        };
        ctx.lt_peak_index = lt.lt_peak_index;
        ctx.log.info(
            "long_symbol",
            format!("long-symbol peak at {}, lt_peak_index={}", lt.peak_index, ctx.lt_peak_index),
        );

        if ctx.lt_peak_index < tables::FFT_SIZE as isize || (ctx.lt_peak_index as usize + tables::FFT_SIZE) > x.len() {
            return FrameResult::dropped(DropReason::TimingMiss, ctx);
        }
        let t1_start = (ctx.lt_peak_index - tables::FFT_SIZE as isize) as usize;
        let t2_start = ctx.lt_peak_index as usize;
        let t1 = x[t1_start..t1_start + tables::FFT_SIZE].to_vec();
        let t2 = x[t2_start..t2_start + tables::FFT_SIZE].to_vec();
        let estimate = channel_estimation::estimate(&t1, &t2, opts.use_max_ratio_combining);
        ctx.h = estimate.h;
        ctx.eq = estimate.eq;
        ctx.mrc_weights = estimate.mrc_weights;

        let mut equalizer = SymbolEqualizer::new(ctx.eq);

        let signal_llrs = match extract_symbol_body(&x, ctx.lt_peak_index, 0)
            .and_then(|body| equalizer.equalize_symbol(body, 0, &ctx.mrc_weights))
            .and_then(|(symbols, _)| demapper::demap(&symbols, Modulation::Bpsk))
        {
            Ok(llrs) => llrs,
            Err(_) => return FrameResult::dropped(DropReason::TimingMiss, ctx),
        };
        let signal_llrs = interleave::deinterleave_llrs(&signal_llrs, 48, 1);
        let signal_bits = viterbi::decode(&signal_llrs);
        let signal: SignalField = frame_fields::parse_signal(&signal_bits).expect("signal_bits is always 24 long");
        ctx.log.info(
            "signal_field",
            format!(
                "rate_key={:#06b} length={} parity_ok={} tail_ok={}",
                signal.rate_key, signal.length, signal.parity_ok, signal.tail_ok
            ),
        );

        let Some(rate) = tables::rate_lookup(signal.rate_key) else {
            let mut result = FrameResult::dropped(DropReason::UnknownRate, ctx);
            result.signal_field = Some(SignalFieldReport {
                rate_name: "unknown",
                mbps: 0,
                length: signal.length,
                parity_ok: signal.parity_ok,
                tail_ok: signal.tail_ok,
            });
            return result;
        };

        let layout = frame_fields::data_bit_layout(signal.length as usize, rate.n_dbps);
        let num_symbols = (layout.n_data_bits / rate.n_dbps).min(opts.max_data_symbols);

        let mut data_llrs = Vec::with_capacity(layout.n_data_bits * 2);
        for s in 1..=num_symbols {
            let body = match extract_symbol_body(&x, ctx.lt_peak_index, s) {
                Ok(body) => body,
                Err(_) => break,
            };
            let (symbols, _report) = match equalizer.equalize_symbol(body, s, &ctx.mrc_weights) {
                Ok(v) => v,
                Err(_) => break,
            };
            let symbol_llrs = match demapper::demap(&symbols, rate.modulation) {
                Ok(llrs) => llrs,
                Err(_) => {
                    let mut result = FrameResult::dropped(DropReason::UnsupportedModulation, ctx);
                    result.signal_field = Some(SignalFieldReport {
                        rate_name: rate.modulation.name(),
                        mbps: rate.mbps,
                        length: signal.length,
                        parity_ok: signal.parity_ok,
                        tail_ok: signal.tail_ok,
                    });
                    return result;
                }
            };
            data_llrs.extend(interleave::deinterleave_llrs(&symbol_llrs, rate.n_cbps, rate.n_bpsc));
        }

        let signal_field = Some(SignalFieldReport {
            rate_name: rate.modulation.name(),
            mbps: rate.mbps,
            length: signal.length,
            parity_ok: signal.parity_ok,
            tail_ok: signal.tail_ok,
        });

        let decoded = viterbi::decode(&data_llrs);
        match frame_fields::parse_data_bits(&decoded, signal.length as usize) {
            Ok(data) => FrameResult {
                signal_field,
                psdu: data.psdu,
                tail_ok: data.tail_ok,
                crc_ok: data.crc_ok,
                drop_reason: None,
                context: ctx,
            },
            Err(_) => {
                let mut result = FrameResult::dropped(DropReason::TimingMiss, ctx);
                result.signal_field = signal_field;
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_miss_on_flat_noise() {
        let samples = vec![Complex64::new(0.001, -0.001); 2000];
        let result = Receiver::new().receive(&samples, &ReceiveOptions::default());
        assert_eq!(result.drop_reason, Some(DropReason::DetectionMiss));
        assert!(result.psdu.is_empty());
    }

    #[test]
    fn too_short_a_capture_is_a_timing_miss() {
        let samples = vec![Complex64::new(0.0, 0.0); 10];
        let result = Receiver::new().receive(&samples, &ReceiveOptions::default());
        assert!(result.drop_reason.is_some());
    }
}
