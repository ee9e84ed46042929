//! Low-level DSP primitives used by the graph nodes.
//!
//! These components are allocation-free and realtime-safe, so the audio
//! callback can own them directly.

/// State-variable low-pass filter with Q control.
pub mod filter;
/// Phase-accumulator oscillator waveforms.
pub mod oscillator;
