//! Benchmarks for the complete audio graph: two sawtooth tones through the
//! filter, gain and clamp, as the output callback renders them.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stranger_synth::graph::filter::{FilterParam, FilterSettings};
use stranger_synth::synth::message::FilterMessage;
use stranger_synth::synth::{GraphBuilder, NoteTable};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/graph");
    let settings = FilterSettings {
        cutoff_hz: 800.0,
        q: 5.0,
    };
    let notes = NoteTable::default().pair(2);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let (builder, mut tones, _filter_tx) = GraphBuilder::new(settings);
        let mut graph = builder.build(SAMPLE_RATE);
        tones.start(notes.voice1);
        tones.start(notes.voice2);

        group.bench_with_input(BenchmarkId::new("two_tones", size), &size, |b, _| {
            b.iter(|| {
                graph.render_block(black_box(&mut buffer));
            })
        });

        // Same, with a cutoff update queued before every block
        let (builder, mut tones, mut filter_tx) = GraphBuilder::new(settings);
        let mut graph = builder.build(SAMPLE_RATE);
        tones.start(notes.voice1);
        tones.start(notes.voice2);
        let mut cutoff = 100.0;

        group.bench_with_input(BenchmarkId::new("two_tones_swept", size), &size, |b, _| {
            b.iter(|| {
                cutoff = if cutoff >= 1400.0 { 100.0 } else { cutoff + 5.0 };
                let _ = filter_tx.push(FilterMessage::Set {
                    param: FilterParam::Cutoff,
                    value: cutoff,
                });
                graph.render_block(black_box(&mut buffer));
            })
        });

        // Stereo interleaved output
        let (builder, mut tones, _filter_tx) = GraphBuilder::new(settings);
        let mut graph = builder.build(SAMPLE_RATE);
        tones.start(notes.voice1);
        tones.start(notes.voice2);
        let mut stereo = vec![0.0f32; size * 2];

        group.bench_with_input(BenchmarkId::new("interleaved_stereo", size), &size, |b, _| {
            b.iter(|| {
                graph.render_interleaved(black_box(&mut stereo), 2);
            })
        });
    }

    group.finish();
}
