/// Context passed to graph nodes during rendering
///
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - frequency: Pitch to render (Hz); tones pinned to a note ignore it
#[derive(Clone, Copy, Debug)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frequency: f32,
}

impl RenderCtx {
    /// Context for the engine's own block, before any tone picks a pitch
    pub fn new(sample_rate: f32) -> Self {
        Self::from_freq(sample_rate, 0.0)
    }

    /// Create context from a direct frequency
    pub fn from_freq(sample_rate: f32, frequency: f32) -> Self {
        Self {
            sample_rate,
            frequency,
        }
    }
}

/// Core trait for audio processing graph nodes
pub trait GraphNode: Send {
    /// Render (sources) or process in place (effects) one block.
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Check if this node is still producing sound
    ///
    /// The engine drops tones that report inactive.
    fn is_active(&self) -> bool {
        true
    }
}
