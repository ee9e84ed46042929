//! Building blocks for the synth's audio graph.
//!
//! Graph nodes wrap the low-level DSP primitives with block-based rendering
//! and the parameters the controls touch. The engine owns one filter node and
//! a changing set of oscillator nodes feeding it.

/// Resonant low-pass node with live cutoff and Q.
pub mod filter;
/// Core trait and render context shared by all graph nodes.
pub mod node;
/// Fixed-frequency tone generators.
pub mod oscillator;
