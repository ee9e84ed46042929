//! Whole-graph benchmarks.

mod graph;

pub use graph::bench_graph;
