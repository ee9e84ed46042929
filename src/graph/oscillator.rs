use crate::dsp::oscillator::OscillatorBlock;
use crate::graph::node::{GraphNode, RenderCtx};

/*
Tone Oscillator
===============

Each note the sequencer plays is one OscNode: a sawtooth pinned to the note's
frequency. Sawtooth is the richest basic waveform (every harmonic, falling
off as 1/n), which is what gives the resonant low-pass something to carve.

Lifecycle mirrors a one-shot source node:

  start  -> constructed at a fixed frequency and rendering immediately
  stop   -> marked stopped; the engine removes it on the next block

A stopped tone never restarts; the sequencer builds a fresh one per step.

  let tone = OscNode::sawtooth().with_frequency(130.81);
*/

pub struct OscNode {
    osc: OscillatorBlock,
    /// Fixed frequency (Hz); the note this tone plays.
    frequency: f32,
    stopped: bool,
}

impl OscNode {
    fn new(osc: OscillatorBlock) -> Self {
        Self {
            osc,
            frequency: 440.0,
            stopped: false,
        }
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorBlock::sawtooth())
    }

    /// Pin the oscillator to a frequency, ignoring the render context's pitch.
    pub fn with_frequency(mut self, freq: f32) -> Self {
        self.frequency = freq;
        self
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if self.stopped {
            out.fill(0.0);
            return;
        }

        let tone_ctx = RenderCtx {
            frequency: self.frequency,
            ..*ctx
        };
        self.osc.render(out, &tone_ctx);
    }

    fn is_active(&self) -> bool {
        !self.stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_context_frequency() {
        let mut a = OscNode::sawtooth().with_frequency(98.0);
        let mut b = OscNode::sawtooth().with_frequency(98.0);
        let mut buf_a = vec![0.0f32; 256];
        let mut buf_b = vec![0.0f32; 256];

        a.render_block(&mut buf_a, &RenderCtx::from_freq(48_000.0, 440.0));
        b.render_block(&mut buf_b, &RenderCtx::from_freq(48_000.0, 880.0));

        assert_eq!(buf_a, buf_b);
    }

    #[test]
    fn stopped_tone_is_silent_and_inactive() {
        let mut tone = OscNode::sawtooth().with_frequency(65.41);
        assert!(tone.is_active());

        tone.stop();
        let mut buffer = vec![1.0f32; 64];
        tone.render_block(&mut buffer, &RenderCtx::new(48_000.0));

        assert!(!tone.is_active());
        assert!(buffer.iter().all(|&s| s == 0.0));
    }
}
