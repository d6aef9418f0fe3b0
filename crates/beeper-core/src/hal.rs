//! Platform-agnostic hardware capabilities.
//!
//! The engine never touches registers or OS timers directly; each host
//! (desktop simulator, ESP32 firmware, test harness) injects these.

/// Electrical direction of a GPIO line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Neutral, non-driving mode used when the line is released.
    Input,
    Output,
}

/// Digital output lines addressed by logical pin number.
pub trait Gpio {
    fn set_direction(&mut self, pin: u32, direction: Direction);

    /// Drive the line high (`true`) or low (`false`).
    fn write_level(&mut self, pin: u32, high: bool);

    /// Whether `pin` names a line that can be driven as an output.
    fn supports_output(&self, _pin: u32) -> bool {
        true
    }
}

/// Monotonic millisecond clock. Allowed to wrap around `u32::MAX`.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

/// Blocks the calling context. Only blocking playback needs this.
pub trait Delay {
    fn delay_ms(&mut self, ms: u32);
}

/// Longest wait [`deadline_reached`] can tell apart from an expired one.
pub const MAX_WAIT_MS: u32 = i32::MAX as u32;

/// Returns true once `now` has reached or passed `deadline`.
///
/// Compares the signed distance between the two timestamps so the result
/// stays correct across clock wraparound, as long as the deadline is less
/// than ~24 days away.
#[inline]
pub fn deadline_reached(now: u32, deadline: u32) -> bool {
    now.wrapping_sub(deadline) as i32 >= 0
}
