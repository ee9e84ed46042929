//! Audio graph - tones summed into one shared low-pass
//!
//! The graph is built on the control side as a [`GraphBuilder`] and finished
//! by the host once the device's sample rate is known. After that it lives in
//! the audio callback: it drains pending tone and filter messages at the top
//! of every block, so parameter changes land with one block of latency.

use rtrb::{Consumer, Producer, PushError, RingBuffer};

use crate::{
    graph::{
        filter::{FilterNode, FilterSettings},
        node::{GraphNode, RenderCtx},
        oscillator::OscNode,
    },
    synth::message::{FilterMessage, ToneId, ToneMessage},
    MAX_BLOCK_SIZE,
};

/// Upper bound on simultaneously sounding tones. The sequencer needs two.
pub const MAX_TONES: usize = 16;
/// Two full-scale saws summed peak at 2.0; scale them back under 1.0.
pub const OUTPUT_GAIN: f32 = 0.25;

const TONE_RING_CAPACITY: usize = 64;
const FILTER_RING_CAPACITY: usize = 256;

/// Control-side handle for starting and stopping tones.
pub struct ToneSender {
    tx: Producer<ToneMessage>,
    next_id: u32,
}

/// A started tone. Consumed by [`ToneSender::stop`].
#[derive(Debug)]
pub struct ToneHandle {
    id: ToneId,
    frequency: f32,
}

impl ToneSender {
    /// Create a sawtooth at `frequency`, feed it into the filter and start it.
    pub fn start(&mut self, frequency: f32) -> ToneHandle {
        let id = ToneId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        if let Err(PushError::Full(_)) = self.tx.push(ToneMessage::Start { id, frequency }) {
            log::warn!("tone queue full, dropping start of {frequency} Hz");
        }
        ToneHandle { id, frequency }
    }

    pub fn stop(&mut self, tone: ToneHandle) {
        if let Err(PushError::Full(_)) = self.tx.push(ToneMessage::Stop { id: tone.id }) {
            log::warn!("tone queue full, dropping stop of {} Hz", tone.frequency);
        }
    }
}

/// Everything the audio side needs, minus the sample rate.
pub struct GraphBuilder {
    settings: FilterSettings,
    tone_rx: Consumer<ToneMessage>,
    filter_rx: Consumer<FilterMessage>,
    tap: Option<Producer<f32>>,
}

impl GraphBuilder {
    /// Create the builder plus the two control-side ends feeding it.
    pub fn new(settings: FilterSettings) -> (Self, ToneSender, Producer<FilterMessage>) {
        let (tone_tx, tone_rx) = RingBuffer::<ToneMessage>::new(TONE_RING_CAPACITY);
        let (filter_tx, filter_rx) = RingBuffer::<FilterMessage>::new(FILTER_RING_CAPACITY);

        let builder = Self {
            settings,
            tone_rx,
            filter_rx,
            tap: None,
        };
        let tones = ToneSender {
            tx: tone_tx,
            next_id: 0,
        };
        (builder, tones, filter_tx)
    }

    /// Copy every rendered (mono) sample into `tap`; dropped when full.
    pub fn with_tap(mut self, tap: Producer<f32>) -> Self {
        self.tap = Some(tap);
        self
    }

    pub fn build(self, sample_rate: f32) -> AudioGraph {
        AudioGraph {
            sample_rate,
            filter: FilterNode::lowpass(self.settings),
            tones: Vec::with_capacity(MAX_TONES),
            scratch: vec![0.0; MAX_BLOCK_SIZE],
            render_buf: vec![0.0; MAX_BLOCK_SIZE],
            tone_rx: self.tone_rx,
            filter_rx: self.filter_rx,
            tap: self.tap,
        }
    }
}

/// Audio-thread half of a session. Never allocates after `build`.
pub struct AudioGraph {
    sample_rate: f32,
    filter: FilterNode,
    tones: Vec<(ToneId, OscNode)>,
    scratch: Vec<f32>,
    render_buf: Vec<f32>,
    tone_rx: Consumer<ToneMessage>,
    filter_rx: Consumer<FilterMessage>,
    tap: Option<Producer<f32>>,
}

impl AudioGraph {
    pub fn filter(&self) -> &FilterNode {
        &self.filter
    }

    /// Number of tones currently feeding the filter.
    pub fn tone_count(&self) -> usize {
        self.tones.len()
    }

    /// Frequencies of the sounding tones, in start order.
    pub fn tone_frequencies(&self) -> impl Iterator<Item = f32> + '_ {
        self.tones.iter().map(|(_, tone)| tone.frequency())
    }

    fn drain_messages(&mut self) {
        while let Ok(msg) = self.filter_rx.pop() {
            match msg {
                FilterMessage::Set { param, value } => self.filter.set_param(param, value),
            }
        }

        while let Ok(msg) = self.tone_rx.pop() {
            match msg {
                ToneMessage::Start { id, frequency } => {
                    // Full table: the start is dropped, its stop will find nothing.
                    if self.tones.len() < MAX_TONES {
                        self.tones
                            .push((id, OscNode::sawtooth().with_frequency(frequency)));
                    }
                }
                ToneMessage::Stop { id } => {
                    if let Some((_, tone)) = self.tones.iter_mut().find(|(tid, _)| *tid == id) {
                        tone.stop();
                    }
                }
            }
        }

        self.tones.retain(|(_, tone)| tone.is_active());
    }

    /// Render one mono block (`out.len() <= MAX_BLOCK_SIZE`).
    pub fn render_block(&mut self, out: &mut [f32]) {
        self.drain_messages();

        let ctx = RenderCtx::new(self.sample_rate);

        out.fill(0.0);
        for (_, tone) in &mut self.tones {
            let scratch = &mut self.scratch[..out.len()];
            tone.render_block(scratch, &ctx);
            for (o, s) in out.iter_mut().zip(scratch.iter()) {
                *o += s;
            }
        }

        // The filter keeps running on silence so its tail decays naturally.
        self.filter.render_block(out, &ctx);

        for sample in out.iter_mut() {
            *sample = (*sample * OUTPUT_GAIN).clamp(-1.0, 1.0);
        }

        if let Some(tap) = self.tap.as_mut() {
            for &s in out.iter() {
                if let Err(PushError::Full(_)) = tap.push(s) {
                    break; // drop remainder if full
                }
            }
        }    }

    /// Fill an interleaved device buffer, duplicating mono to every channel.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let total_frames = data.len() / channels;
        let mut frames_written = 0;

        // Take the buffer out so render_block can borrow self mutably.
        let mut render_buf = std::mem::take(&mut self.render_buf);

        while frames_written < total_frames {
            let frames_remaining = total_frames - frames_written;
            let frames_to_render = frames_remaining.min(MAX_BLOCK_SIZE);

            let block = &mut render_buf[..frames_to_render];
            self.render_block(block);

            let out_off = frames_written * channels;
            for (i, &s) in block.iter().enumerate() {
                for ch in 0..channels {
                    data[out_off + i * channels + ch] = s;
                }
            }

            frames_written += frames_to_render;
        }

        self.render_buf = render_buf;
    }
}
