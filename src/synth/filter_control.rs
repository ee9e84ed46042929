use std::time::Instant;

use rtrb::{Producer, PushError};

use crate::{
    graph::filter::{FilterParam, FilterSettings},
    synth::{message::FilterMessage, sweep::SweepDriver},
};

/// Who is allowed to write the cutoff right now.
#[derive(Debug, Clone, Copy)]
pub enum FilterMode {
    /// Slider edits go straight to the filter.
    Manual,
    /// The sweep owns the cutoff; manual cutoff and Q edits are rejected.
    Sweeping(SweepDriver),
}

/// Single owner of the live filter parameters for one session.
///
/// Every write to the audio thread's filter goes through here, so a manual
/// edit and a sweep tick can never both be in flight.
pub struct FilterControl {
    cutoff_hz: f32,
    q: f32,
    mode: FilterMode,
    tx: Producer<FilterMessage>,
}

impl FilterControl {
    pub fn new(settings: FilterSettings, tx: Producer<FilterMessage>) -> Self {
        Self {
            cutoff_hz: settings.cutoff_hz,
            q: settings.q,
            mode: FilterMode::Manual,
            tx,
        }
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn q(&self) -> f32 {
        self.q
    }

    pub fn is_sweeping(&self) -> bool {
        matches!(self.mode, FilterMode::Sweeping(_))
    }

    /// Manual cutoff edit. Returns false (and changes nothing) while sweeping.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) -> bool {
        if self.is_sweeping() {
            return false;
        }
        self.write_cutoff(cutoff_hz);
        true
    }

    /// Manual Q edit. Returns false (and changes nothing) while sweeping.
    pub fn set_q(&mut self, q: f32) -> bool {
        if self.is_sweeping() {
            return false;
        }
        self.q = q;
        self.send(FilterParam::Resonance, q);
        true
    }

    /// Hand the cutoff to a sweep starting from the current value.
    ///
    /// Returns the sweep's starting value; already sweeping is a no-op.
    pub fn begin_sweep(&mut self, now: Instant) -> i32 {
        if let FilterMode::Sweeping(driver) = self.mode {
            return driver.value();
        }

        let driver = SweepDriver::start(self.cutoff_hz, now);
        let start = driver.value();
        log::debug!("sweep started at {start} Hz");
        // the walk truncates and clamps; the filter jumps to where it begins
        if start as f32 != self.cutoff_hz {
            self.write_cutoff(start as f32);
        }
        self.mode = FilterMode::Sweeping(driver);
        start
    }

    /// Return the cutoff to manual control. The last swept value stays live.
    pub fn end_sweep(&mut self) -> bool {
        if !self.is_sweeping() {
            return false;
        }
        log::debug!("sweep stopped at {} Hz", self.cutoff_hz);
        self.mode = FilterMode::Manual;
        true
    }

    /// When the next sweep tick is due, if sweeping.
    pub fn next_due(&self) -> Option<Instant> {
        match &self.mode {
            FilterMode::Sweeping(driver) => Some(driver.next_due()),
            FilterMode::Manual => None,
        }
    }

    /// Run due sweep ticks; returns the new cutoff if it moved.
    pub fn poll(&mut self, now: Instant) -> Option<f32> {
        let FilterMode::Sweeping(driver) = &mut self.mode else {
            return None;
        };
        let value = driver.poll(now)? as f32;
        self.write_cutoff(value);
        Some(value)
    }

    fn write_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = cutoff_hz;
        self.send(FilterParam::Cutoff, cutoff_hz);
    }

    fn send(&mut self, param: FilterParam, value: f32) {
        if let Err(PushError::Full(_)) = self.tx.push(FilterMessage::Set { param, value }) {
            log::warn!("filter queue full, dropping {param:?} = {value}");
        }
    }
}
