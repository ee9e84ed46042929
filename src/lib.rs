pub mod dsp;
pub mod error;
pub mod graph; // Render-block nodes: oscillator, filter
pub mod synth; // Sequencer, sweep, session lifecycle

pub use error::SynthError;

pub const MAX_BLOCK_SIZE: usize = 2048;
