use std::thread;
use std::time::{Duration, Instant};

use beeper_core::hal::{Clock, Delay};

/// Milliseconds since process start, truncated to 32 bits like an MCU tick counter.
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for StdClock {
    fn now_ms(&self) -> u32 {
        self.origin.elapsed().as_millis() as u32
    }
}

impl Delay for StdClock {
    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(ms.into()));
    }
}
