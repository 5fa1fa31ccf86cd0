//! Formats a [`ieee80211ag_core::FrameResult`] into the structured log event
//! [`crate::logging::FrameEvent`]: a hex dump of the PSDU plus a SIGNAL field
//! summary, independent of whether the frame was successfully decoded.

use ieee80211ag_core::FrameResult;

use crate::logging::{FrameEvent, SignalFieldSummary};

/// Build the log event for one frame attempt, labeled by `label` (the
/// archive file stem, or a synthetic index for self-test/raw-capture runs).
pub fn describe_frame(label: String, result: &FrameResult, verbose: bool) -> FrameEvent {
    let drop_reason = result.drop_reason.map(|r| format!("{:?}", r));
    let signal = result.signal_field.as_ref().map(|s| SignalFieldSummary {
        rate_name: s.rate_name.to_string(),
        mbps: s.mbps,
        length: s.length,
        parity_ok: s.parity_ok,
    });
    let trace = verbose.then(|| {
        result.context.log.entries().iter().map(|e| format!("[{}] {}: {}", e.level, e.stage, e.message)).collect()
    });

    FrameEvent {
        timestamp: chrono::Utc::now(),
        label,
        drop_reason,
        signal,
        tail_ok: result.tail_ok,
        crc_ok: result.crc_ok,
        psdu_len: result.psdu.len(),
        psdu_hex: format_hex_field(&bytes_to_hex(&result.psdu)),
        trace,
    }
}

fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

/// Format hex with a space every 4 characters for readability.
fn format_hex_field(hex: &str) -> String {
    hex.chars().collect::<Vec<_>>().chunks(4).map(|c| c.iter().collect::<String>()).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_hex_field_groups_by_four() {
        assert_eq!(format_hex_field("DEADBEEF"), "DEAD BEEF");
        assert_eq!(format_hex_field("A5A5A5A5"), "A5A5 A5A5");
    }

    #[test]
    fn bytes_to_hex_is_uppercase() {
        assert_eq!(bytes_to_hex(&[0xde, 0xad, 0x01]), "DEAD01");
    }
}
