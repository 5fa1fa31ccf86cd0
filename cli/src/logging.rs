//! Structured logging for frame outcomes and end-of-run statistics.

use chrono::{DateTime, Utc};
use color_eyre::eyre::Result;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use crate::config::LogFormatArg;

/// Structured log event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogEvent {
    /// One frame's receive outcome.
    Frame(FrameEvent),

    /// Final cross-frame statistical summary.
    Statistics(StatisticsEvent),

    /// General info message.
    Info { message: String },

    /// Warning message.
    Warn { message: String },

    /// Error message.
    Error { message: String, details: Option<String> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameEvent {
    pub timestamp: DateTime<Utc>,
    pub label: String,
    pub drop_reason: Option<String>,
    pub signal: Option<SignalFieldSummary>,
    pub tail_ok: bool,
    pub crc_ok: bool,
    pub psdu_len: usize,
    pub psdu_hex: String,
    pub trace: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalFieldSummary {
    pub rate_name: String,
    pub mbps: u32,
    pub length: u16,
    pub parity_ok: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsEvent {
    pub timestamp: DateTime<Utc>,
    pub duration_secs: f64,
    pub frames_attempted: usize,
    pub frames_decoded: usize,
    pub frames_crc_ok: usize,
    pub drop_reason_counts: Vec<(String, usize)>,
    pub coarse_offset_hz: StatSummary,
    pub fine_offset_hz: StatSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatSummary {
    pub mean: f64,
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
    pub samples: usize,
}

/// Logger that writes one formatted line per event to stdout.
pub struct StructuredLogger {
    format: LogFormatArg,
    start_time: DateTime<Utc>,
}

impl StructuredLogger {
    pub fn new(format: LogFormatArg) -> Self {
        Self { format, start_time: Utc::now() }
    }

    pub fn log(&self, event: LogEvent) -> Result<()> {
        let output = match self.format {
            LogFormatArg::Json => self.format_json(&event)?,
            LogFormatArg::Logfmt => self.format_logfmt(&event),
            LogFormatArg::Pretty => self.format_pretty(&event),
        };
        let mut out = io::stdout();
        writeln!(out, "{}", output)?;
        out.flush()?;
        Ok(())
    }

    fn format_json(&self, event: &LogEvent) -> Result<String> {
        Ok(serde_json::to_string(event)?)
    }

    fn format_logfmt(&self, event: &LogEvent) -> String {
        let ts = Utc::now().to_rfc3339();
        match event {
            LogEvent::Frame(f) => format!(
                "ts=\"{}\" type=frame label=\"{}\" drop_reason=\"{}\" crc_ok={} tail_ok={} psdu_len={}",
                ts,
                f.label,
                f.drop_reason.as_deref().unwrap_or("none"),
                f.crc_ok,
                f.tail_ok,
                f.psdu_len
            ),
            LogEvent::Statistics(s) => format!(
                "ts=\"{}\" type=statistics duration_secs={:.2} frames_attempted={} frames_decoded={} frames_crc_ok={}",
                ts, s.duration_secs, s.frames_attempted, s.frames_decoded, s.frames_crc_ok
            ),
            LogEvent::Info { message } => format!("ts=\"{}\" level=info msg=\"{}\"", ts, message),
            LogEvent::Warn { message } => format!("ts=\"{}\" level=warn msg=\"{}\"", ts, message),
            LogEvent::Error { message, details } => match details {
                Some(d) => format!("ts=\"{}\" level=error msg=\"{}\" details=\"{}\"", ts, message, d),
                None => format!("ts=\"{}\" level=error msg=\"{}\"", ts, message),
            },
        }
    }

    fn format_pretty(&self, event: &LogEvent) -> String {
        let ts = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
        match event {
            LogEvent::Frame(f) => match (&f.drop_reason, &f.signal) {
                (Some(reason), _) => format!("[{}] FRAME[{}]: dropped ({})", ts, f.label, reason),
                (None, Some(sig)) => format!(
                    "[{}] FRAME[{}]: {} {} Mbps, {} bytes, crc_ok={} | {}",
                    ts, f.label, sig.rate_name, sig.mbps, sig.length, f.crc_ok, f.psdu_hex
                ),
                (None, None) => format!("[{}] FRAME[{}]: no SIGNAL field decoded", ts, f.label),
            },
            LogEvent::Statistics(s) => format!(
                "[{}] STATISTICS ({:.2}s): attempted={} decoded={} crc_ok={} | coarse_offset: μ={:.1}Hz σ={:.1}Hz | fine_offset: μ={:.1}Hz σ={:.1}Hz",
                ts,
                s.duration_secs,
                s.frames_attempted,
                s.frames_decoded,
                s.frames_crc_ok,
                s.coarse_offset_hz.mean,
                s.coarse_offset_hz.stddev,
                s.fine_offset_hz.mean,
                s.fine_offset_hz.stddev
            ),
            LogEvent::Info { message } => format!("[{}] INFO: {}", ts, message),
            LogEvent::Warn { message } => format!("[{}] WARN: {}", ts, message),
            LogEvent::Error { message, details } => match details {
                Some(d) => format!("[{}] ERROR: {} | {}", ts, message, d),
                None => format!("[{}] ERROR: {}", ts, message),
            },
        }
    }

    pub fn elapsed(&self) -> f64 {
        (Utc::now() - self.start_time).num_milliseconds() as f64 / 1000.0
    }
}
