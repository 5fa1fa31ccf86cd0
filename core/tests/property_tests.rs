//! Round-trip invariants across randomized inputs: interleaver, constellation
//! mapper, scrambler, and the convolutional code under additive noise.

use ieee80211ag_core::demapper::{demap, hard_decision};
use ieee80211ag_core::fec::conv_encoder::encode;
use ieee80211ag_core::fec::viterbi::decode;
use ieee80211ag_core::interleave::{deinterleave, interleave};
use ieee80211ag_core::mapper::map;
use ieee80211ag_core::scrambler::{descramble, scramble};
use ieee80211ag_core::tables::Modulation;
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

macro_rules! interleave_round_trip_test {
    ($name:ident, $n_cbps:expr, $n_bpsc:expr) => {
        proptest! {
            #![proptest_config(ProptestConfig::with_cases(16))]
            #[test]
            fn $name(bits in prop::collection::vec(0u8..=1u8, $n_cbps)) {
                let coded = interleave(&bits, $n_cbps, $n_bpsc);
                let back = deinterleave(&coded, $n_cbps, $n_bpsc);
                prop_assert_eq!(back, bits);
            }
        }
    };
}

interleave_round_trip_test!(interleave_round_trips_bpsk_half, 48, 1);
interleave_round_trip_test!(interleave_round_trips_qpsk_half, 96, 2);
interleave_round_trip_test!(interleave_round_trips_16qam_half, 192, 4);
interleave_round_trip_test!(interleave_round_trips_64qam_twothirds, 288, 6);

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]
    #[test]
    fn bpsk_map_demap_round_trips(
        bits in (1usize..500).prop_flat_map(|n| prop::collection::vec(0u8..=1u8, n))
    ) {
        let symbols = map(&bits, Modulation::Bpsk).unwrap();
        let llrs = demap(&symbols, Modulation::Bpsk).unwrap();
        prop_assert_eq!(hard_decision(&llrs), bits);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]
    #[test]
    fn qpsk_map_demap_round_trips(
        bits in (1usize..250).prop_flat_map(|n| prop::collection::vec(0u8..=1u8, n * 2))
    ) {
        let symbols = map(&bits, Modulation::Qpsk).unwrap();
        let llrs = demap(&symbols, Modulation::Qpsk).unwrap();
        prop_assert_eq!(hard_decision(&llrs), bits);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]
    #[test]
    fn scrambler_round_trips(
        tail in prop::collection::vec(0u8..=1u8, 1..500),
        seed in 1u8..0x80,
    ) {
        let mut data = vec![0u8; 7];
        data.extend(tail);
        let scrambled = scramble(&data, seed);
        let recovered = descramble(&scrambled);
        prop_assert_eq!(recovered, data);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]
    #[test]
    fn convolutional_code_tolerates_gaussian_noise(len in 100usize..=5000, seed in any::<u64>()) {
        let mut input: Vec<u8> = (0..len).map(|i| ((i * 31 + 7) % 5 < 2) as u8).collect();
        let tail_start = len - 6;
        input[tail_start..].fill(0);

        let coded = encode(&input);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let llrs: Vec<f64> = coded
            .iter()
            .map(|&b| {
                let clean = if b == 1 { 1.0 } else { -1.0 };
                let noise: f64 = rng.sample(StandardNormal);
                clean + noise * 0.4
            })
            .collect();

        let decoded = decode(&llrs);
        prop_assert_eq!(decoded, input);
    }
}
