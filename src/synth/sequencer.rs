//! Sequencer - the up/down arpeggio walk
//!
//! The sequencer runs on its own thread. Each cycle it starts one tone per
//! voice, holds them for the dwell time, stops them and advances the index.
//! Cancellation is cooperative: the token is checked once per cycle, so a
//! cancelled sequencer exits at most one dwell period later.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use rtrb::{Producer, PushError};

use crate::synth::{
    engine::ToneSender,
    message::NoteStep,
    notes::{NoteTable, NOTE_COUNT},
    Direction,
};

/// How long each note pair sounds before the walk advances.
pub const DWELL: Duration = Duration::from_millis(160);

/// Position in the note tables and the direction of travel.
///
/// Starts at 0 ascending, bounces at both ends: 0,1,2,3,4,3,2,1,0,1,...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteWalk {
    index: usize,
    direction: Direction,
    last: usize,
}

impl NoteWalk {
    pub fn new(len: usize) -> Self {
        Self {
            index: 0,
            direction: Direction::Ascending,
            last: len.saturating_sub(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Move one step; the direction flips on arriving at either end.
    pub fn advance(&mut self) {
        if self.last == 0 {
            return;
        }

        match self.direction {
            Direction::Ascending => {
                self.index += 1;
                if self.index == self.last {
                    self.direction = Direction::Descending;
                }
            }
            Direction::Descending => {
                self.index -= 1;
                if self.index == 0 {
                    self.direction = Direction::Ascending;
                }
            }
        }
    }
}

impl Default for NoteWalk {
    fn default() -> Self {
        Self::new(NOTE_COUNT)
    }
}

/// Shared stop flag for one sequencer run.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub struct NoteSequencer {
    table: NoteTable,
    walk: NoteWalk,
    dwell: Duration,
    tones: ToneSender,
    steps: Option<Producer<NoteStep>>,
    step: u64,
}

impl NoteSequencer {
    pub fn new(table: NoteTable, tones: ToneSender) -> Self {
        Self {
            table,
            walk: NoteWalk::default(),
            dwell: DWELL,
            tones,
            steps: None,
            step: 0,
        }
    }

    pub fn with_dwell(mut self, dwell: Duration) -> Self {
        self.dwell = dwell;
        self
    }

    /// Publish every step that starts sounding (for display).
    pub fn with_step_events(mut self, steps: Producer<NoteStep>) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Play one cycle: start both tones, hold, stop them, advance.
    fn play_step(&mut self) {
        let notes = self.table.pair(self.walk.index());
        let tone1 = self.tones.start(notes.voice1);
        let tone2 = self.tones.start(notes.voice2);

        if let Some(steps) = self.steps.as_mut() {
            let event = NoteStep {
                step: self.step,
                index: self.walk.index(),
                notes,
            };
            // The UI only shows the latest step; losing one is harmless.
            if let Err(PushError::Full(_)) = steps.push(event) {
                log::trace!("step queue full, dropping step {}", self.step);
            }
        }
        log::trace!(
            "step {} index {} ({} Hz, {} Hz)",
            self.step,
            self.walk.index(),
            notes.voice1,
            notes.voice2
        );

        thread::sleep(self.dwell);

        self.tones.stop(tone1);
        self.tones.stop(tone2);
        self.walk.advance();
        self.step += 1;
    }

    /// Run until `token` is cancelled. Blocks the calling thread.
    pub fn run(mut self, token: &CancellationToken) {
        while !token.is_cancelled() {
            self.play_step();
        }
        log::debug!("sequencer stopped after {} steps", self.step);
    }

    /// Run on a new thread; the returned handle cancels it when dropped.
    pub fn spawn(self) -> SequencerHandle {
        let token = CancellationToken::new();
        let thread = thread::spawn({
            let token = token.clone();
            move || self.run(&token)
        });

        SequencerHandle {
            token,
            thread: Some(thread),
        }
    }
}

pub struct SequencerHandle {
    token: CancellationToken,
    thread: Option<JoinHandle<()>>,
}

impl SequencerHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Cancel and wait for the thread; returns within one dwell period.
    pub fn join(mut self) {
        self.cancel();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("sequencer thread panicked");
            }
        }
    }
}

impl Drop for SequencerHandle {
    fn drop(&mut self) {
        // Detach: the thread notices the token on its next cycle.
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::filter::FilterSettings;
    use crate::synth::engine::GraphBuilder;
    use rtrb::RingBuffer;
    use std::time::Instant;

    #[test]
    fn walk_bounces_palindromically() {
        let mut walk = NoteWalk::new(5);
        let mut indices = vec![walk.index()];
        for _ in 0..12 {
            walk.advance();
            indices.push(walk.index());
        }

        assert_eq!(indices, vec![0, 1, 2, 3, 4, 3, 2, 1, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn walk_flips_exactly_at_ends() {
        let mut walk = NoteWalk::default();
        for _ in 0..3 {
            walk.advance();
        }
        assert_eq!(walk.index(), 3);
        assert_eq!(walk.direction(), Direction::Ascending);

        walk.advance();
        assert_eq!(walk.index(), 4);
        assert_eq!(walk.direction(), Direction::Descending);

        for _ in 0..4 {
            walk.advance();
        }
        assert_eq!(walk.index(), 0);
        assert_eq!(walk.direction(), Direction::Ascending);
    }

    #[test]
    fn walk_never_leaves_bounds_or_repeats_an_endpoint() {
        let mut walk = NoteWalk::default();
        let mut previous = walk.index();
        for _ in 0..1000 {
            walk.advance();
            assert!(walk.index() <= 4);
            assert_ne!(walk.index(), previous);
            previous = walk.index();
        }
    }

    #[test]
    fn single_note_walk_stays_put() {
        let mut walk = NoteWalk::new(1);
        walk.advance();
        assert_eq!(walk.index(), 0);
    }

    #[test]
    fn cancellation_token_is_shared() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn sequencer_emits_the_palindrome_one_pair_at_a_time() {
        let settings = FilterSettings {
            cutoff_hz: 800.0,
            q: 1.0,
        };
        let (builder, tones, _filter) = GraphBuilder::new(settings);
        let mut graph = builder.build(48_000.0);
        let (step_tx, mut step_rx) = RingBuffer::<NoteStep>::new(64);
        let dwell = Duration::from_millis(10);

        let handle = NoteSequencer::new(NoteTable::default(), tones)
            .with_dwell(dwell)
            .with_step_events(step_tx)
            .spawn();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut out = vec![0.0f32; 64];
        let mut steps = Vec::new();
        while steps.len() < 6 && Instant::now() < deadline {
            while let Ok(step) = step_rx.pop() {
                steps.push(step);
            }
            graph.render_block(&mut out);
            assert!(graph.tone_count() <= 2, "only one pair sounds at a time");
            thread::sleep(Duration::from_millis(1));
        }

        handle.join();

        let indices: Vec<_> = steps.iter().take(6).map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 3]);
        assert_eq!(steps[4].notes, NoteTable::default().pair(4));
        assert_eq!(steps[4].step, 4);

        // the last pair was stopped before the thread exited
        graph.render_block(&mut out);
        assert_eq!(graph.tone_count(), 0);
    }

    #[test]
    fn cancelled_sequencer_exits_within_one_dwell() {
        let settings = FilterSettings {
            cutoff_hz: 800.0,
            q: 1.0,
        };
        let (builder, tones, _filter) = GraphBuilder::new(settings);
        let mut graph = builder.build(48_000.0);
        let (step_tx, mut step_rx) = RingBuffer::<NoteStep>::new(64);
        let dwell = Duration::from_millis(50);

        let handle = NoteSequencer::new(NoteTable::default(), tones)
            .with_dwell(dwell)
            .with_step_events(step_tx)
            .spawn();

        // cancel while the second pair is sounding
        let deadline = Instant::now() + Duration::from_secs(5);
        while step_rx.pop().map_or(true, |step| step.step < 1) && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }

        let cancelled_at = Instant::now();
        handle.join();
        let waited = cancelled_at.elapsed();
        assert!(
            waited < dwell + Duration::from_millis(30),
            "join took {waited:?} with a {dwell:?} dwell"
        );

        let mut out = vec![0.0f32; 64];
        graph.render_block(&mut out);
        assert_eq!(graph.tone_count(), 0);
    }
}
