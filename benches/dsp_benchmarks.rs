//! DSP Benchmarks
//!
//! Performance benchmarks for block processing and pitch detection.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use riffbox::dsp::{create_effect, EffectKind};
use riffbox::engine::{default_chain, SignalSource, SineSource};
use riffbox::tuner::{PitchDetector, TUNER_BLOCK_SIZE};

fn sine_block(len: usize) -> Vec<f32> {
    let mut source = SineSource::new(196.0, 44100, 0.7);
    let mut block = vec![0.0; len];
    source.fill(&mut block);
    block
}

fn benchmark_effects(c: &mut Criterion) {
    let input = sine_block(512);

    for kind in EffectKind::ALL {
        let mut effect = create_effect(kind, 44100);
        let mut block = input.clone();
        c.bench_function(&format!("{}_512", kind.id()), |b| {
            b.iter(|| {
                block.copy_from_slice(&input);
                effect.process(black_box(&mut block));
            })
        });
    }
}

fn benchmark_default_chain(c: &mut Criterion) {
    let input = sine_block(512);
    let mut chain = default_chain(44100);
    let mut block = input.clone();

    c.bench_function("chain_5_effects_512", |b| {
        b.iter(|| {
            block.copy_from_slice(&input);
            chain.process(black_box(&mut block));
        })
    });
}

fn benchmark_pitch_detection(c: &mut Criterion) {
    let block = sine_block(TUNER_BLOCK_SIZE);
    let mut detector = PitchDetector::default();

    c.bench_function("detect_4096", |b| {
        b.iter(|| detector.detect(black_box(&block)))
    });
}

criterion_group!(
    benches,
    benchmark_effects,
    benchmark_default_chain,
    benchmark_pitch_detection
);
criterion_main!(benches);
