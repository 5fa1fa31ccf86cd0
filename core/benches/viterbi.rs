use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ieee80211ag_core::fec::conv_encoder::encode;
use ieee80211ag_core::fec::viterbi::decode;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

fn noisy_llrs(input: &[u8], seed: u64) -> Vec<f64> {
    let coded = encode(input);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    coded
        .iter()
        .map(|&b| {
            let clean = if b == 1 { 1.0 } else { -1.0 };
            let noise: f64 = rng.sample(StandardNormal);
            clean + noise * 0.4
        })
        .collect()
}

fn bench_viterbi_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("viterbi_decode");
    for &len in &[100usize, 500, 2_300, 18_400] {
        let mut input: Vec<u8> = (0..len).map(|i| ((i * 37 + 3) % 5 < 2) as u8).collect();
        input[len - 6..].fill(0);
        let llrs = noisy_llrs(&input, 7);
        group.bench_with_input(BenchmarkId::from_parameter(len), &llrs, |b, llrs| {
            b.iter(|| decode(black_box(llrs)))
        });
    }
    group.finish();
}

fn bench_conv_encode(c: &mut Criterion) {
    let input: Vec<u8> = (0..2_300).map(|i| ((i * 13) % 7 < 3) as u8).collect();
    c.bench_function("conv_encode_2300_bits", |b| b.iter(|| encode(black_box(&input))));
}

criterion_group!(benches, bench_viterbi_decode, bench_conv_encode);
criterion_main!(benches);
