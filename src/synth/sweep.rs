//! Filter sweep (LFO) - a triangle walk of the cutoff between fixed bounds
//!
//! Every tick the value moves 5 Hz in its current direction, *then* checks the
//! bounds. Checking after the step means the value overshoots a bound by one
//! step (to 1405 or 95) before it turns around:
//!
//!   ... 1395 1400 1405 1400 1395 ... 105 100 95 100 105 ...
//!
//! One full cycle is therefore (1405 - 95) / 5 * 2 = 524 ticks, about 10.5 s
//! at 20 ms per tick.

use std::time::{Duration, Instant};

use crate::synth::Direction;

pub const SWEEP_MIN: i32 = 100;
pub const SWEEP_MAX: i32 = 1400;
pub const SWEEP_STEP: i32 = 5;
pub const TICK_INTERVAL: Duration = Duration::from_millis(20);

/// Ticks applied in one poll at most; a long stall skips the rest.
const MAX_CATCH_UP_TICKS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepWalk {
    value: i32,
    direction: Direction,
}

impl SweepWalk {
    /// Start ascending from `start`, clamped into the sweep bounds.
    pub fn new(start: i32) -> Self {
        Self {
            value: start.clamp(SWEEP_MIN, SWEEP_MAX),
            direction: Direction::Ascending,
        }
    }

    /// Start from a slider value; the fraction is dropped like an integer parse.
    pub fn from_cutoff(cutoff_hz: f32) -> Self {
        Self::new(cutoff_hz.trunc() as i32)
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn tick(&mut self) -> i32 {
        match self.direction {
            Direction::Ascending => {
                self.value += SWEEP_STEP;
                if self.value > SWEEP_MAX {
                    self.direction = Direction::Descending;
                }
            }
            Direction::Descending => {
                self.value -= SWEEP_STEP;
                if self.value < SWEEP_MIN {
                    self.direction = Direction::Ascending;
                }
            }
        }
        self.value
    }
}

/// Fixed-interval deadline timer polled from an event loop.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    interval: Duration,
    next_due: Instant,
}

impl Ticker {
    /// First tick is due one interval after `start`.
    pub fn new(interval: Duration, start: Instant) -> Self {
        Self {
            interval,
            next_due: start + interval,
        }
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// How many ticks fell due up to `now`. Late polls catch up.
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let mut ticks = 0;
        while now >= self.next_due {
            self.next_due += self.interval;
            ticks += 1;
            if ticks == MAX_CATCH_UP_TICKS {
                // Resynchronise instead of bursting through a long backlog.
                if now >= self.next_due {
                    self.next_due = now + self.interval;
                }
                break;
            }
        }
        ticks
    }
}

/// A running sweep: the walk plus its tick schedule.
#[derive(Debug, Clone, Copy)]
pub struct SweepDriver {
    walk: SweepWalk,
    ticker: Ticker,
}

impl SweepDriver {
    pub fn start(cutoff_hz: f32, now: Instant) -> Self {
        Self {
            walk: SweepWalk::from_cutoff(cutoff_hz),
            ticker: Ticker::new(TICK_INTERVAL, now),
        }
    }

    pub fn value(&self) -> i32 {
        self.walk.value()
    }

    pub fn next_due(&self) -> Instant {
        self.ticker.next_due()
    }

    /// Apply every tick due at `now`; returns the new value if anything moved.
    pub fn poll(&mut self, now: Instant) -> Option<i32> {
        let ticks = self.ticker.due_ticks(now);
        if ticks == 0 {
            return None;
        }
        for _ in 0..ticks {
            self.walk.tick();
        }
        Some(self.walk.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rises_by_five_per_tick() {
        let mut walk = SweepWalk::new(800);
        assert_eq!(walk.tick(), 805);
        assert_eq!(walk.tick(), 810);
        assert_eq!(walk.direction(), Direction::Ascending);
    }

    #[test]
    fn sweep_overshoots_bounds_by_one_step_before_reflecting() {
        let mut walk = SweepWalk::new(1395);
        assert_eq!(walk.tick(), 1400);
        assert_eq!(walk.direction(), Direction::Ascending);
        assert_eq!(walk.tick(), 1405);
        assert_eq!(walk.direction(), Direction::Descending);
        assert_eq!(walk.tick(), 1400);

        let mut walk = SweepWalk {
            value: 105,
            direction: Direction::Descending,
        };
        assert_eq!(walk.tick(), 100);
        assert_eq!(walk.direction(), Direction::Descending);
        assert_eq!(walk.tick(), 95);
        assert_eq!(walk.direction(), Direction::Ascending);
        assert_eq!(walk.tick(), 100);
    }

    #[test]
    fn stays_within_overshoot_band() {
        let mut walk = SweepWalk::new(SWEEP_MIN);
        for _ in 0..5_000 {
            let value = walk.tick();
            assert!(
                (SWEEP_MIN - SWEEP_STEP..=SWEEP_MAX + SWEEP_STEP).contains(&value),
                "sweep value {value} escaped"
            );
        }
    }

    #[test]
    fn triangle_period_is_524_ticks() {
        let mut walk = SweepWalk::new(700);
        let first: Vec<i32> = (0..524).map(|_| walk.tick()).collect();
        let second: Vec<i32> = (0..524).map(|_| walk.tick()).collect();

        assert_eq!(first, second);
        assert_eq!(*first.iter().max().unwrap(), 1405);
        assert_eq!(*first.iter().min().unwrap(), 95);
    }

    #[test]
    fn start_value_is_truncated_and_clamped() {
        assert_eq!(SweepWalk::from_cutoff(812.9).value(), 812);
        assert_eq!(SweepWalk::from_cutoff(5000.0).value(), SWEEP_MAX);
        assert_eq!(SweepWalk::from_cutoff(50.0).value(), SWEEP_MIN);
    }

    #[test]
    fn ticker_fires_on_interval_and_catches_up() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(TICK_INTERVAL, t0);

        assert_eq!(ticker.due_ticks(t0 + Duration::from_millis(19)), 0);
        assert_eq!(ticker.due_ticks(t0 + Duration::from_millis(20)), 1);
        assert_eq!(ticker.due_ticks(t0 + Duration::from_millis(39)), 0);
        // woke late: 40, 60 and 80 ms are all due
        assert_eq!(ticker.due_ticks(t0 + Duration::from_millis(85)), 3);
        assert_eq!(ticker.next_due(), t0 + Duration::from_millis(100));
    }

    #[test]
    fn ticker_skips_long_backlog() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(TICK_INTERVAL, t0);

        let late = t0 + Duration::from_secs(10);
        assert_eq!(ticker.due_ticks(late), MAX_CATCH_UP_TICKS);
        assert_eq!(ticker.next_due(), late + TICK_INTERVAL);
    }

    #[test]
    fn driver_applies_all_due_ticks() {
        let t0 = Instant::now();
        let mut driver = SweepDriver::start(1000.0, t0);

        assert_eq!(driver.poll(t0), None);
        assert_eq!(driver.poll(t0 + Duration::from_millis(60)), Some(1015));
        assert_eq!(driver.value(), 1015);
    }
}
