//! Simulated hardware - a hand-advanced clock and a GPIO line that records
//! every write with its timestamp.
//!
//! Both halves borrow the same `Cell<u32>` so recorded writes line up with
//! the time the engine observes.

use core::cell::Cell;

use heapless::Deque;

use crate::hal::{Clock, Delay, Direction, Gpio};

/// Clock driven by the test (or host) instead of real time.
/// `Delay` advances it, so blocking playback completes instantly.
#[derive(Clone, Copy)]
pub struct SimClock<'a> {
    now: &'a Cell<u32>,
}

impl<'a> SimClock<'a> {
    pub fn new(now: &'a Cell<u32>) -> Self {
        Self { now }
    }

    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for SimClock<'_> {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}

impl Delay for SimClock<'_> {
    fn delay_ms(&mut self, ms: u32) {
        self.advance(ms);
    }
}

/// One recorded call to [`Gpio::write_level`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Write {
    pub at_ms: u32,
    pub high: bool,
}

/// Single-line GPIO double keeping the last `N` writes, oldest dropped first.
pub struct SimGpio<'a, const N: usize> {
    now: &'a Cell<u32>,
    /// Pins at or above this are rejected as outputs
    line_count: u32,
    pin: Option<u32>,
    direction: Option<Direction>,
    level: Option<bool>,
    writes: Deque<Write, N>,
}

impl<'a, const N: usize> SimGpio<'a, N> {
    pub fn new(now: &'a Cell<u32>) -> Self {
        Self::with_lines(now, u32::MAX)
    }

    /// Only pins `0..line_count` can be opened as outputs.
    pub fn with_lines(now: &'a Cell<u32>, line_count: u32) -> Self {
        Self {
            now,
            line_count,
            pin: None,
            direction: None,
            level: None,
            writes: Deque::new(),
        }
    }

    /// Pin most recently addressed.
    pub fn pin(&self) -> Option<u32> {
        self.pin
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Last electrical level written.
    pub fn level(&self) -> Option<bool> {
        self.level
    }

    /// Recorded writes, oldest first.
    pub fn writes(&self) -> impl Iterator<Item = &Write> {
        self.writes.iter()
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }
}

impl<const N: usize> Gpio for SimGpio<'_, N> {
    fn set_direction(&mut self, pin: u32, direction: Direction) {
        self.pin = Some(pin);
        self.direction = Some(direction);
    }

    fn write_level(&mut self, pin: u32, high: bool) {
        self.pin = Some(pin);
        self.level = Some(high);

        if self.writes.is_full() {
            self.writes.pop_front();
        }
        let _ = self.writes.push_back(Write {
            at_ms: self.now.get(),
            high,
        });
    }

    fn supports_output(&self, pin: u32) -> bool {
        pin < self.line_count
    }
}
