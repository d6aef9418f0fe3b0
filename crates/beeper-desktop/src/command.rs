//! Requests from the control panel to the engine loop, and the status
//! snapshot sent back.

use beeper_core::hal::{Clock, Delay, Gpio};
use beeper_core::{EngineMode, ErrorKind, Execution, Pattern, PatternEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start { pattern: Pattern, repeat: u32 },
    /// Blocking playback; the engine loop stalls until it finishes.
    Play(Pattern),
    Blink { on_ms: u32, off_ms: u32, pulses: u32 },
    Stop,
    StopBlink,
    StopAll,
    Quit,
}

pub fn apply<G, C>(engine: &mut PatternEngine<G, C>, command: Command) -> Result<(), ErrorKind>
where
    G: Gpio,
    C: Clock + Delay,
{
    log::info!("{:?}", command);
    match command {
        Command::Start { pattern, repeat } => engine.sound(pattern, Execution::NonBlocking, repeat),
        Command::Play(pattern) => engine.sound(pattern, Execution::Blocking, 1),
        Command::Blink { on_ms, off_ms, pulses } => engine.start_blink(on_ms, off_ms, pulses),
        Command::Stop => engine.stop(),
        Command::StopBlink => engine.stop_blink(),
        Command::StopAll => engine.stop_all(),
        Command::Quit => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub mode: EngineMode,
    pub pattern: Option<Pattern>,
    pub is_on: bool,
    pub line_high: bool,
    pub last_error: Option<ErrorKind>,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            mode: EngineMode::Idle,
            pattern: None,
            is_on: false,
            line_high: false,
            last_error: None,
        }
    }
}

impl Status {
    pub fn of<G: Gpio, C: Clock>(engine: &PatternEngine<G, C>, line_high: bool) -> Self {
        Self {
            mode: engine.mode(),
            pattern: engine.current_pattern(),
            is_on: engine.is_on(),
            line_high,
            last_error: engine.last_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beeper_core::ActiveLevel;
    use beeper_core::sim::{SimClock, SimGpio};
    use std::cell::Cell;

    fn engine(now: &Cell<u32>) -> PatternEngine<SimGpio<'_, 64>, SimClock<'_>> {
        let mut engine = PatternEngine::new(SimGpio::new(now), SimClock::new(now));
        engine.configure(9, ActiveLevel::High).unwrap();
        engine.open().unwrap();
        engine
    }

    #[test]
    fn test_start_then_stop() {
        let now = Cell::new(0);
        let mut engine = engine(&now);

        apply(&mut engine, Command::Start { pattern: Pattern::Alarm, repeat: 0 }).unwrap();
        let status = Status::of(&engine, true);
        assert_eq!(status.mode, EngineMode::Pattern);
        assert_eq!(status.pattern, Some(Pattern::Alarm));
        assert!(status.is_on);

        apply(&mut engine, Command::Stop).unwrap();
        assert_eq!(Status::of(&engine, false), Status::default());
    }

    #[test]
    fn test_play_blocks_for_pattern() {
        let now = Cell::new(0);
        let mut engine = engine(&now);
        apply(&mut engine, Command::Play(Pattern::Success)).unwrap();
        assert_eq!(now.get(), Pattern::Success.duration_ms());
        assert!(!engine.is_on());
    }

    #[test]
    fn test_blink_and_stop_all() {
        let now = Cell::new(0);
        let mut engine = engine(&now);
        apply(&mut engine, Command::Blink { on_ms: 5, off_ms: 5, pulses: 0 }).unwrap();
        assert_eq!(engine.mode(), EngineMode::Blink);

        apply(&mut engine, Command::StopAll).unwrap();
        assert!(!engine.is_busy());
    }

    #[test]
    fn test_errors_surface_in_status() {
        let now = Cell::new(0);
        let mut engine = PatternEngine::new(SimGpio::<64>::new(&now), SimClock::new(&now));
        let result = apply(&mut engine, Command::StopBlink);
        assert_eq!(result, Err(ErrorKind::NotInitialized));
        assert_eq!(
            Status::of(&engine, false).last_error,
            Some(ErrorKind::NotInitialized)
        );
    }
}
