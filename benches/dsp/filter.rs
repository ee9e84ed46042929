//! Benchmarks for the resonant low-pass.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stranger_synth::dsp::filter::SVFilter;
use stranger_synth::graph::node::RenderCtx;

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let ctx = RenderCtx::from_freq(48_000.0, 440.0);

    for &size in BLOCK_SIZES {
        // Sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        // Default knob positions
        let mut filter = SVFilter::lowpass(800.0).with_q(5.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), black_box(&ctx));
            })
        });

        // Cutoff moving every block, as under the sweep
        let mut filter = SVFilter::lowpass(100.0).with_q(5.0);
        let mut buffer = input.clone();
        let mut cutoff = 100.0;
        group.bench_with_input(BenchmarkId::new("swept", size), &size, |b, _| {
            b.iter(|| {
                cutoff = if cutoff >= 1400.0 { 100.0 } else { cutoff + 5.0 };
                filter.set_cutoff(cutoff);
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
