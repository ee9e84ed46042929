use std::f32::consts::TAU;

use crate::graph::node::RenderCtx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorWaveform {
    Sine,
    Saw,
}

/// Phase accumulator producing one waveform at `ctx.frequency`.
///
/// Phase is kept in [0, 1) and carried across blocks, so consecutive
/// `render` calls produce a continuous signal.
pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f32,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self { waveform, phase: 0.0 }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorWaveform::Saw)
    }

    pub fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let increment = ctx.frequency / ctx.sample_rate;

        match self.waveform {
            OscillatorWaveform::Sine => {
                for sample in out.iter_mut() {
                    *sample = (TAU * self.phase).sin();
                    self.advance(increment);
                }
            }
            OscillatorWaveform::Saw => {
                // rising ramp: -1 at phase 0, approaching +1 at phase 1
                for sample in out.iter_mut() {
                    *sample = 2.0 * self.phase - 1.0;
                    self.advance(increment);
                }
            }
        }
    }

    #[inline]
    fn advance(&mut self, increment: f32) {
        self.phase += increment;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }
    }
}
