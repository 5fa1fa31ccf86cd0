//! Cross-frame statistical aggregation for the final [`crate::logging::StatisticsEvent`].

use std::collections::BTreeMap;

use ieee80211ag_core::DropReason;

use crate::logging::StatSummary;

fn drop_reason_name(reason: DropReason) -> &'static str {
    match reason {
        DropReason::DetectionMiss => "detection_miss",
        DropReason::TimingMiss => "timing_miss",
        DropReason::UnknownRate => "unknown_rate",
        DropReason::UnsupportedModulation => "unsupported_modulation",
    }
}

/// Accumulates per-frame outcomes and acquisition estimates across a batch.
#[derive(Default)]
pub struct TelemetryAggregator {
    frames_attempted: usize,
    frames_decoded: usize,
    frames_crc_ok: usize,
    drop_reason_counts: BTreeMap<&'static str, usize>,
    coarse_offset_hz: Vec<f64>,
    fine_offset_hz: Vec<f64>,
}

impl TelemetryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &ieee80211ag_core::FrameResult) {
        self.frames_attempted += 1;
        if result.drop_reason.is_none() {
            self.frames_decoded += 1;
        }
        if result.crc_ok {
            self.frames_crc_ok += 1;
        }
        if let Some(reason) = result.drop_reason {
            *self.drop_reason_counts.entry(drop_reason_name(reason)).or_insert(0) += 1;
        }
        if result.context.coarse_offset_hz != 0.0 {
            self.coarse_offset_hz.push(result.context.coarse_offset_hz);
        }
        if result.context.fine_offset_hz != 0.0 {
            self.fine_offset_hz.push(result.context.fine_offset_hz);
        }
    }

    pub fn finish(&self, duration_secs: f64) -> crate::logging::StatisticsEvent {
        crate::logging::StatisticsEvent {
            timestamp: chrono::Utc::now(),
            duration_secs,
            frames_attempted: self.frames_attempted,
            frames_decoded: self.frames_decoded,
            frames_crc_ok: self.frames_crc_ok,
            drop_reason_counts: self.drop_reason_counts.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            coarse_offset_hz: compute_stat_summary(&self.coarse_offset_hz),
            fine_offset_hz: compute_stat_summary(&self.fine_offset_hz),
        }
    }
}

fn compute_stat_summary(samples: &[f64]) -> StatSummary {
    if samples.is_empty() {
        return StatSummary { mean: 0.0, stddev: 0.0, min: 0.0, max: 0.0, samples: 0 };
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / samples.len() as f64;
    StatSummary {
        mean,
        stddev: variance.sqrt(),
        min: samples.iter().copied().fold(f64::INFINITY, f64::min),
        max: samples.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        samples: samples.len(),
    }
}
