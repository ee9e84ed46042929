// Purpose: the playing synth - sequencing, filter sweep, session lifecycle
// This layer sits above graph nodes and owns the threads that drive them

pub mod controller;
pub mod engine;
pub mod filter_control;
pub mod host;
pub mod message;
pub mod notes;
pub mod sequencer;
pub mod sweep;

pub use controller::{ControlPanel, SynthController};
pub use engine::{AudioGraph, GraphBuilder};
pub use host::{AudioHost, CpalHost, OpenContext, OutputInfo};
pub use notes::{NotePair, NoteTable};

/// Which way a bounded walk is currently moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}
