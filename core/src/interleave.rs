//! Bit interleaver / deinterleaver: the composition of two permutations,
//! cached per (n_cbps, n_bpsc) pair.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

fn pi1(k: usize, n_cbps: usize) -> usize {
    (n_cbps / 16) * (k % 16) + k / 16
}

fn pi2(i: usize, n_cbps: usize, n_bpsc: usize) -> usize {
    let s = (n_bpsc / 2).max(1);
    s * (i / s) + ((i + n_cbps - (16 * i) / n_cbps) % s)
}

/// `output[pi2(pi1(k))] = input[k]`: returns the permutation `perm` such
/// that `perm[k]` is the output index for input bit `k`.
fn build_interleave_perm(n_cbps: usize, n_bpsc: usize) -> Vec<usize> {
    (0..n_cbps).map(|k| pi2(pi1(k, n_cbps), n_cbps, n_bpsc)).collect()
}

/// Inverse permutation: `deinterleave_perm[output_index] = k`.
fn invert(perm: &[usize]) -> Vec<usize> {
    let mut inv = vec![0usize; perm.len()];
    for (k, &p) in perm.iter().enumerate() {
        inv[p] = k;
    }
    inv
}

type PermCache = Mutex<HashMap<(usize, usize), (Arc<[usize]>, Arc<[usize]>)>>;

fn cache() -> &'static PermCache {
    static CACHE: OnceLock<PermCache> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Fetch (building and caching if needed) the `(interleave, deinterleave)`
/// permutation pair for this `(n_cbps, n_bpsc)`.
fn perms_for(n_cbps: usize, n_bpsc: usize) -> (Arc<[usize]>, Arc<[usize]>) {
    let key = (n_cbps, n_bpsc);
    let mut guard = cache().lock().expect("interleaver permutation cache poisoned");
    if let Some(pair) = guard.get(&key) {
        return pair.clone();
    }
    let interleave: Arc<[usize]> = build_interleave_perm(n_cbps, n_bpsc).into();
    let deinterleave: Arc<[usize]> = invert(&interleave).into();
    guard.insert(key, (interleave.clone(), deinterleave.clone()));
    (interleave, deinterleave)
}

/// Apply the transmit interleaver to one OFDM symbol's worth of coded bits.
pub fn interleave(bits: &[u8], n_cbps: usize, n_bpsc: usize) -> Vec<u8> {
    assert_eq!(bits.len(), n_cbps, "interleaver expects exactly n_cbps bits");
    let (perm, _) = perms_for(n_cbps, n_bpsc);
    let mut out = vec![0u8; n_cbps];
    for (k, &bit) in bits.iter().enumerate() {
        out[perm[k]] = bit;
    }
    out
}

/// Inverse of [`interleave`].
pub fn deinterleave(bits: &[u8], n_cbps: usize, n_bpsc: usize) -> Vec<u8> {
    assert_eq!(bits.len(), n_cbps, "deinterleaver expects exactly n_cbps bits");
    let (_, inv) = perms_for(n_cbps, n_bpsc);
    let mut out = vec![0u8; n_cbps];
    for (out_idx, &bit) in bits.iter().enumerate() {
        out[inv[out_idx]] = bit;
    }
    out
}

/// Same permutation as [`deinterleave`], applied to soft LLR values instead
/// of hard bits: the receive chain deinterleaves before Viterbi decoding,
/// not after, so it needs to reorder reals, not bits.
pub fn deinterleave_llrs(llrs: &[f64], n_cbps: usize, n_bpsc: usize) -> Vec<f64> {
    assert_eq!(llrs.len(), n_cbps, "deinterleaver expects exactly n_cbps values");
    let (_, inv) = perms_for(n_cbps, n_bpsc);
    let mut out = vec![0.0f64; n_cbps];
    for (out_idx, &v) in llrs.iter().enumerate() {
        out[inv[out_idx]] = v;
    }
    out
}
