//! Synth controller - session lifecycle and control forwarding
//!
//! The controller lives on the UI thread. It owns the control panel state
//! (slider values, enabled flags, the sweep checkbox) and, while playing, one
//! [`Session`]: the audio context, the filter owner and the sequencer thread.
//! A session exists exactly while the synth is playing.

use std::{
    ops::RangeInclusive,
    time::{Duration, Instant},
};

use rtrb::{Consumer, RingBuffer};

use crate::{
    graph::filter::FilterSettings,
    synth::{
        engine::GraphBuilder,
        filter_control::FilterControl,
        host::{AudioHost, OutputInfo},
        message::NoteStep,
        notes::NoteTable,
        sequencer::{NoteSequencer, SequencerHandle, DWELL},
    },
    SynthError,
};

pub const CUTOFF_RANGE: RangeInclusive<f32> = 50.0..=5000.0;
pub const RESONANCE_RANGE: RangeInclusive<f32> = 0.1..=30.0;

const STEP_RING_CAPACITY: usize = 16;

/// A continuous control with a fixed range; input outside it is clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    value: f32,
    range: RangeInclusive<f32>,
    enabled: bool,
}

impl Slider {
    fn new(value: f32, range: RangeInclusive<f32>) -> Self {
        Self {
            value: value.clamp(*range.start(), *range.end()),
            range,
            enabled: true,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn range(&self) -> &RangeInclusive<f32> {
        &self.range
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Position within the range as 0.0..=1.0 (for gauges).
    pub fn ratio(&self) -> f64 {
        let span = self.range.end() - self.range.start();
        ((self.value - self.range.start()) / span).clamp(0.0, 1.0) as f64
    }

    fn set(&mut self, value: f32) -> f32 {
        self.value = value.clamp(*self.range.start(), *self.range.end());
        self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkbox {
    pub checked: bool,
    pub enabled: bool,
}

/// What the user sees: the three inputs and whether they accept input.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPanel {
    pub cutoff: Slider,
    pub resonance: Slider,
    pub sweep: Checkbox,
}

impl ControlPanel {
    pub fn new(settings: FilterSettings) -> Self {
        Self {
            cutoff: Slider::new(settings.cutoff_hz, CUTOFF_RANGE),
            resonance: Slider::new(settings.q, RESONANCE_RANGE),
            sweep: Checkbox {
                checked: false,
                enabled: false,
            },
        }
    }

    pub fn filter_settings(&self) -> FilterSettings {
        FilterSettings {
            cutoff_hz: self.cutoff.value,
            q: self.resonance.value,
        }
    }

    fn set_manual_enabled(&mut self, enabled: bool) {
        self.cutoff.enabled = enabled;
        self.resonance.enabled = enabled;
    }
}

/// Everything that exists only between start and stop.
pub struct Session<C> {
    // Field order is drop order: the sequencer is cancelled before the
    // context goes away.
    sequencer: SequencerHandle,
    filter: FilterControl,
    steps: Consumer<NoteStep>,
    audio_tap: Option<Consumer<f32>>,
    last_step: Option<NoteStep>,
    info: OutputInfo,
    _context: C,
}

pub struct SynthController<H: AudioHost> {
    host: H,
    notes: NoteTable,
    dwell: Duration,
    tap_capacity: Option<usize>,
    panel: ControlPanel,
    session: Option<Session<H::Context>>,
}

impl<H: AudioHost> SynthController<H> {
    pub fn new(host: H, settings: FilterSettings) -> Self {
        Self {
            host,
            notes: NoteTable::default(),
            dwell: DWELL,
            tap_capacity: None,
            panel: ControlPanel::new(settings),
            session: None,
        }
    }

    pub fn with_dwell(mut self, dwell: Duration) -> Self {
        self.dwell = dwell;
        self
    }

    /// Keep a copy of the rendered audio for visualisation.
    pub fn with_audio_tap(mut self, capacity: usize) -> Self {
        self.tap_capacity = Some(capacity);
        self
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_some()
    }

    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    pub fn output_info(&self) -> Option<&OutputInfo> {
        self.session.as_ref().map(|s| &s.info)
    }

    /// The step currently sounding, as last reported by the sequencer.
    pub fn current_step(&self) -> Option<NoteStep> {
        self.session.as_ref().and_then(|s| s.last_step)
    }

    /// Live filter values, if a filter exists.
    pub fn live_filter(&self) -> Option<FilterSettings> {
        self.session.as_ref().map(|s| FilterSettings {
            cutoff_hz: s.filter.cutoff(),
            q: s.filter.q(),
        })
    }

    pub fn is_sweeping(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.filter.is_sweeping())
    }

    pub fn audio_tap(&mut self) -> Option<&mut Consumer<f32>> {
        self.session.as_mut().and_then(|s| s.audio_tap.as_mut())
    }

    /// Open audio and launch the sequencer. No-op while already playing.
    ///
    /// On failure nothing changes: no session, sweep control still disabled.
    pub fn start(&mut self) -> Result<(), SynthError> {
        if self.is_playing() {
            return Ok(());
        }

        let settings = self.panel.filter_settings();
        let (graph, tones, filter_tx) = GraphBuilder::new(settings);
        let (graph, audio_tap) = match self.tap_capacity {
            Some(capacity) => {
                let (tap_tx, tap_rx) = RingBuffer::<f32>::new(capacity);
                (graph.with_tap(tap_tx), Some(tap_rx))
            }
            None => (graph, None),
        };

        let opened = self.host.open(graph).inspect_err(|err| {
            log::warn!("start failed: {err}");
        })?;

        let filter = FilterControl::new(settings, filter_tx);
        let (step_tx, steps) = RingBuffer::<NoteStep>::new(STEP_RING_CAPACITY);
        let sequencer = NoteSequencer::new(self.notes, tones)
            .with_dwell(self.dwell)
            .with_step_events(step_tx)
            .spawn();

        log::info!(
            "session started (cutoff {} Hz, Q {})",
            settings.cutoff_hz,
            settings.q
        );
        self.session = Some(Session {
            sequencer,
            filter,
            steps,
            audio_tap,
            last_step: None,
            info: opened.info,
            _context: opened.context,
        });
        self.panel.sweep.enabled = true;
        Ok(())
    }

    /// End the session if there is one and reset the controls. Idempotent.
    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            session.sequencer.cancel();
            log::info!("session stopped");
        }

        self.panel.sweep = Checkbox {
            checked: false,
            enabled: false,
        };
        self.panel.set_manual_enabled(true);
    }

    /// Cutoff slider input. Updates the live filter when one exists.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        if !self.panel.cutoff.enabled {
            return;
        }
        let value = self.panel.cutoff.set(cutoff_hz);
        if let Some(session) = self.session.as_mut() {
            session.filter.set_cutoff(value);
        }
    }

    /// Resonance slider input. Updates the live filter when one exists.
    pub fn set_resonance(&mut self, q: f32) {
        if !self.panel.resonance.enabled {
            return;
        }
        let value = self.panel.resonance.set(q);
        if let Some(session) = self.session.as_mut() {
            session.filter.set_q(value);
        }
    }

    pub fn nudge_cutoff(&mut self, delta_hz: f32) {
        self.set_cutoff(self.panel.cutoff.value + delta_hz);
    }

    pub fn nudge_resonance(&mut self, delta: f32) {
        self.set_resonance(self.panel.resonance.value + delta);
    }

    /// Sweep checkbox input.
    pub fn set_sweep(&mut self, enabled: bool) {
        self.set_sweep_at(enabled, Instant::now());
    }

    pub fn toggle_sweep(&mut self) {
        self.set_sweep(!self.panel.sweep.checked);
    }

    /// Sweep checkbox input with an explicit clock, for deterministic ticks.
    pub fn set_sweep_at(&mut self, enabled: bool, now: Instant) {
        if !self.panel.sweep.enabled {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if enabled {
            let start = session.filter.begin_sweep(now);
            self.panel.cutoff.set(start as f32);
            self.panel.set_manual_enabled(false);
        } else {
            session.filter.end_sweep();
            self.panel.set_manual_enabled(true);
        }
        self.panel.sweep.checked = enabled;
    }

    /// Earliest time `poll` has timed work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.session.as_ref().and_then(|s| s.filter.next_due())
    }

    /// Run due sweep ticks and pick up sequencer progress. Call from the
    /// event loop.
    pub fn poll(&mut self, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        while let Ok(step) = session.steps.pop() {
            session.last_step = Some(step);
        }

        if let Some(cutoff) = session.filter.poll(now) {
            // the slider mirrors the sweep
            self.panel.cutoff.set(cutoff);
        }
    }
}

impl<H: AudioHost> Drop for SynthController<H> {
    fn drop(&mut self) {
        self.stop();
    }
}
