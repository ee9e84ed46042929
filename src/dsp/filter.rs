use std::f32::consts::PI;

use crate::graph::node::RenderCtx;

/// Lowest cutoff the filter accepts (Hz).
pub const MIN_CUTOFF_HZ: f32 = 20.0;
/// Highest cutoff as a fraction of the sample rate (just under Nyquist).
pub const MAX_CUTOFF_RATIO: f32 = 0.49;
pub const MIN_Q: f32 = 0.0001;
pub const MAX_Q: f32 = 40.0;
/// Butterworth Q: flat passband, no peak.
pub const DEFAULT_Q: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Topology-preserving state-variable low-pass filter.
///
/// Resonance is expressed as Q (damping `k = 1/Q`): 0.707 is flat, larger
/// values peak at the cutoff and the gain at the cutoff equals Q.
pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    pub cutoff_hz: f32,
    pub q: f32,
}

impl SVFilter {
    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            q: DEFAULT_Q,
        }
    }

    pub fn with_q(mut self, q: f32) -> Self {
        self.q = q;
        self
    }

    #[inline]
    fn compute_g(&self, ctx: &RenderCtx) -> f32 {
        let cutoff = self
            .cutoff_hz
            .clamp(MIN_CUTOFF_HZ, ctx.sample_rate * MAX_CUTOFF_RATIO);
        (PI * cutoff / ctx.sample_rate).tan()
    }

    #[inline]
    fn compute_k(&self) -> f32 {
        1.0 / self.q.clamp(MIN_Q, MAX_Q)
    }

    /// One TPT step; returns the low-pass output.
    #[inline]
    pub fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> f32 {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        v2
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        let g = self.compute_g(ctx);
        let k = self.compute_k();

        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, k, g);
        }
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff;
    }

    pub fn set_q(&mut self, q: f32) {
        self.q = q;
    }
}
