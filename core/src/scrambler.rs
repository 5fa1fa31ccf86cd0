//! 7-bit additive scrambler: polynomial x^7 + x^4 + 1.
//!
//! Scrambling and descrambling are the same XOR-with-feedback operation
//! run with the same initial state, since the state evolves purely from
//! the feedback bit and never from the data bit itself. The receiver
//! just has no initial state to start from, so it recovers one from the
//! first seven bits of the PLCP service field, which are always zero.

/// Advance `state` by one feedback bit and report that bit.
///
/// `state` uses its low 7 bits as register positions 0..6; the feedback
/// enters position 0 and the rest shift up.
fn step(state: u8) -> (u8, u8) {
    let feedback = ((state >> 6) & 1) ^ ((state >> 3) & 1);
    let next = ((state << 1) | feedback) & 0x7F;
    (next, feedback)
}

/// Run the scrambler/descrambler stream over `data` starting from `state`,
/// returning the XORed bits and the state after the last bit.
fn apply_stream(data: &[u8], mut state: u8) -> (Vec<u8>, u8) {
    let mut out = Vec::with_capacity(data.len());
    for &bit in data {
        let (next, feedback) = step(state);
        out.push(bit ^ feedback);
        state = next;
    }
    (out, state)
}

/// Scramble `data` with a caller-chosen nonzero 7-bit initial state.
/// Panics if `initial_state` is zero or out of the 7-bit range — an
/// all-zero state never leaves the all-zero cycle, so it can never be
/// recovered from zero service bits on the receive side.
pub fn scramble(data: &[u8], initial_state: u8) -> Vec<u8> {
    assert!(
        initial_state != 0 && initial_state < 0x80,
        "scrambler seed must be a nonzero 7-bit value"
    );
    apply_stream(data, initial_state).0
}

/// Recover the scrambler's state after its first 7 steps from 7 received
/// bits known to correspond to zero-valued input (the service field).
///
/// Because a 7-bit shift register is fully flushed of its initial content
/// after 7 shifts, the resulting state depends only on these 7 feedback
/// bits and not on the (unknown) seed that produced them.
fn recover_state_after_seven(known_zero_bits: &[u8]) -> u8 {
    debug_assert!(known_zero_bits.len() >= 7);
    let mut state: u8 = 0;
    for &bit in &known_zero_bits[..7] {
        state = ((state << 1) | (bit & 1)) & 0x7F;
    }
    state
}

/// Descramble `data`, whose first 7 bits are known to carry zero-valued
/// input (the reserved/scrambler-init bits of the PLCP service field).
/// Panics if `data` has fewer than 7 bits.
pub fn descramble(data: &[u8]) -> Vec<u8> {
    assert!(data.len() >= 7, "descrambler needs at least the 7 service bits");
    let state = recover_state_after_seven(data);
    let mut out = vec![0u8; 7];
    let (rest, _) = apply_stream(&data[7..], state);
    out.extend(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_with_leading_zero_service_bits() {
        let mut data = vec![0u8; 7];
        data.extend((0..200).map(|i| ((i * 13) % 5 < 2) as u8));
        for seed in [1u8, 5, 0x7F, 0x55] {
            let scrambled = scramble(&data, seed);
            let recovered = descramble(&scrambled);
            assert_eq!(recovered, data, "round-trip failed for seed {seed}");
        }
    }

    #[test]
    fn all_zero_input_reproduces_the_lfsr_sequence() {
        let data = vec![0u8; 14];
        let scrambled = scramble(&data, 0x5A);
        assert!(scrambled.iter().any(|&b| b == 1), "scrambler must not be a no-op");
        assert_eq!(descramble(&scrambled), data);
    }

    #[test]
    #[should_panic]
    fn zero_seed_is_rejected() {
        let _ = scramble(&[0u8; 10], 0);
    }
}
