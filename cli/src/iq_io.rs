//! Reads captured waveforms from disk for the `--iq-file` and
//! `--frame-archive` input modes: interleaved little-endian f32 (I, Q, I, Q, ...).

use std::fs;
use std::path::Path;

use color_eyre::eyre::{eyre, Result};
use num_complex::Complex64;

/// Parse one interleaved-f32 buffer into complex samples.
pub fn parse_interleaved_f32(bytes: &[u8]) -> Result<Vec<Complex64>> {
    if bytes.len() % 8 != 0 {
        return Err(eyre!(
            "capture length {} is not a multiple of 8 bytes (two f32 per sample)",
            bytes.len()
        ));
    }
    Ok(bytes
        .chunks_exact(8)
        .map(|c| {
            let i = f32::from_le_bytes([c[0], c[1], c[2], c[3]]);
            let q = f32::from_le_bytes([c[4], c[5], c[6], c[7]]);
            Complex64::new(i as f64, q as f64)
        })
        .collect())
}

/// Read a single raw I/Q capture file.
pub fn read_iq_file(path: &Path) -> Result<Vec<Complex64>> {
    let bytes = fs::read(path).map_err(|e| eyre!("reading {}: {}", path.display(), e))?;
    parse_interleaved_f32(&bytes)
}

/// One named frame slice from a frame archive, labeled by its file stem.
pub struct ArchiveFrame {
    pub label: String,
    pub samples: Vec<Complex64>,
}

/// Read every `*.iq` file in `dir`, sorted by file name for reproducible ordering.
pub fn read_frame_archive(dir: &Path) -> Result<Vec<ArchiveFrame>> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .map_err(|e| eyre!("reading directory {}: {}", dir.display(), e))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("iq"))
        .collect();
    entries.sort();

    entries
        .into_iter()
        .map(|path| {
            let label = path.file_stem().and_then(|s| s.to_str()).unwrap_or("frame").to_string();
            let samples = read_iq_file(&path)?;
            Ok(ArchiveFrame { label, samples })
        })
        .collect()
}
