use crate::{
    dsp::filter::SVFilter,
    graph::node::{GraphNode, RenderCtx},
};

/*
Resonant Low-pass
=================

Every tone in the synth is summed into one shared low-pass. The sawtooths are
harmonically rich; the filter decides how much of that brightness survives.

Parameters:
-----------

Cutoff (Hz): corner frequency above which content is attenuated (12 dB/oct).
  - 100 Hz:   almost only the fundamentals of the low voice
  - 800 Hz:   warm, rounded
  - 1400 Hz:  top of the LFO sweep, clearly brighter

Resonance (Q): peak at the cutoff. Gain at the cutoff equals Q.
  - 0.707: flat (Butterworth)
  - 5:     pronounced "squelch" as the sweep passes harmonics
  - 30:    nearly whistling

Both parameters are written live, one block at a time: the engine applies any
pending change before rendering the next block.
*/

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterParam {
    Cutoff,
    Resonance,
}

/// Initial settings the filter is built with (the slider values at start).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterSettings {
    pub cutoff_hz: f32,
    pub q: f32,
}

pub struct FilterNode {
    filter: SVFilter,
}

impl FilterNode {
    pub fn lowpass(settings: FilterSettings) -> Self {
        FilterNode {
            filter: SVFilter::lowpass(settings.cutoff_hz).with_q(settings.q),
        }
    }

    pub fn get_param(&self, param: FilterParam) -> f32 {
        match param {
            FilterParam::Cutoff => self.filter.cutoff_hz,
            FilterParam::Resonance => self.filter.q,
        }
    }

    /// Write a live parameter. Range limits are applied at render time.
    pub fn set_param(&mut self, param: FilterParam, value: f32) {
        match param {
            FilterParam::Cutoff => self.filter.set_cutoff(value),
            FilterParam::Resonance => self.filter.set_q(value),
        }
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx);
    }
}
