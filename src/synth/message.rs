use crate::graph::filter::FilterParam;
use crate::synth::notes::NotePair;

/// Identifies one started tone so its stop can find it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ToneId(pub u32);

/// Sequencer thread -> audio thread
#[derive(Debug, Copy, Clone)]
pub enum ToneMessage {
    Start { id: ToneId, frequency: f32 },
    Stop { id: ToneId },
}

/// UI thread (filter owner) -> audio thread
#[derive(Debug, Copy, Clone)]
pub enum FilterMessage {
    Set { param: FilterParam, value: f32 },
}

/// Sequencer thread -> UI thread, published when a step starts sounding
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NoteStep {
    /// Steps taken since the session started (0 = first pair).
    pub step: u64,
    pub index: usize,
    pub notes: NotePair,
}
