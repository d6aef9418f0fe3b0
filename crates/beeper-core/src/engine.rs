//! Pattern engine - blocking and cooperative playback of the catalogue.
//!
//! Non-blocking playback is a single interpreter over a pattern's phase
//! list: the host calls [`PatternEngine::tick`] from its control loop and
//! each call performs at most one phase transition. Late ticks make a phase
//! run long; phases are never skipped or shortened.

use crate::error::ErrorKind;
use crate::hal::{Clock, Delay, Gpio, MAX_WAIT_MS, deadline_reached};
use crate::output::{ActiveLevel, ActuatorConfig, OutputDriver};
use crate::pattern::Pattern;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    Idle,
    Blink,
    Pattern,
}

/// How [`PatternEngine::sound`] runs a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    /// Occupy the caller until every traversal has finished.
    Blocking,
    /// Return immediately; the host drives playback with `tick()`.
    NonBlocking,
}

#[derive(Debug, Clone, Copy)]
struct BlinkState {
    on_ms: u32,
    off_ms: u32,
    /// ON phases still to complete, 0 = forever
    pulses_remaining: u32,
    phase_on: bool,
    deadline_ms: u32,
}

#[derive(Debug, Clone, Copy)]
struct PatternRun {
    pattern: Pattern,
    phase: usize,
    /// Full traversals still to complete, 0 = forever
    repeats_remaining: u32,
    deadline_ms: u32,
}

#[derive(Debug, Clone, Copy)]
enum Activity {
    Idle,
    Blink(BlinkState),
    Pattern(PatternRun),
}

/// Drives one actuator. Owns the line, the clock and all playback state.
pub struct PatternEngine<G: Gpio, C: Clock> {
    driver: OutputDriver<G>,
    clock: C,
    activity: Activity,
}

impl<G: Gpio, C: Clock> PatternEngine<G, C> {
    pub fn new(gpio: G, clock: C) -> Self {
        Self {
            driver: OutputDriver::new(gpio),
            clock,
            activity: Activity::Idle,
        }
    }

    pub fn configure(&mut self, pin: i32, active_level: ActiveLevel) -> Result<(), ErrorKind> {
        self.driver.configure(pin, active_level)
    }

    pub fn configure_raw(&mut self, pin: i32, active_mode: u8) -> Result<(), ErrorKind> {
        self.driver.configure_raw(pin, active_mode)
    }

    /// Open the line. Reopening stops any playback first.
    pub fn open(&mut self) -> Result<(), ErrorKind> {
        if self.driver.is_open() {
            self.halt();
        }
        self.driver.open()
    }

    /// Stop any playback and release the line.
    pub fn close(&mut self) {
        if self.driver.is_open() {
            self.halt();
        }
        self.activity = Activity::Idle;
        self.driver.close();
    }

    pub fn on(&mut self) -> Result<(), ErrorKind> {
        self.driver.activate()
    }

    pub fn off(&mut self) -> Result<(), ErrorKind> {
        self.driver.deactivate()
    }

    pub fn is_on(&self) -> bool {
        self.driver.is_active()
    }

    pub fn mode(&self) -> EngineMode {
        match self.activity {
            Activity::Idle => EngineMode::Idle,
            Activity::Blink(_) => EngineMode::Blink,
            Activity::Pattern(_) => EngineMode::Pattern,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.mode() != EngineMode::Idle
    }

    /// Pattern being played without blocking, if any.
    pub fn current_pattern(&self) -> Option<Pattern> {
        match self.activity {
            Activity::Pattern(run) => Some(run.pattern),
            _ => None,
        }
    }

    pub fn config(&self) -> Option<ActuatorConfig> {
        self.driver.config()
    }

    pub fn last_error(&self) -> Option<ErrorKind> {
        self.driver.last_error()
    }

    pub fn clear_error(&mut self) {
        self.driver.clear_error();
    }

    pub fn driver(&self) -> &OutputDriver<G> {
        &self.driver
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Begin cooperative playback of `pattern`, `repeat` traversals long
    /// (0 = until stopped). Anything already playing is stopped first.
    pub fn start(&mut self, pattern: Pattern, repeat: u32) -> Result<(), ErrorKind> {
        self.ensure_open()?;
        self.halt();

        let first = pattern.phases()[0];
        let now = self.clock.now_ms();
        self.drive(first.on);
        self.activity = Activity::Pattern(PatternRun {
            pattern,
            phase: 0,
            repeats_remaining: repeat,
            deadline_ms: now.wrapping_add(first.duration_ms),
        });
        log::debug!("pattern {} started, repeat {}", pattern.name(), repeat);
        Ok(())
    }

    /// Square-wave blink: `pulses` ON phases (0 = until stopped).
    /// Anything already playing is stopped first.
    ///
    /// Phase lengths are capped at [`MAX_WAIT_MS`], about 24.8 days.
    pub fn start_blink(&mut self, on_ms: u32, off_ms: u32, pulses: u32) -> Result<(), ErrorKind> {
        self.ensure_open()?;
        self.halt();

        let on_ms = on_ms.min(MAX_WAIT_MS);
        let off_ms = off_ms.min(MAX_WAIT_MS);
        let now = self.clock.now_ms();
        self.drive(true);
        self.activity = Activity::Blink(BlinkState {
            on_ms,
            off_ms,
            pulses_remaining: pulses,
            phase_on: true,
            deadline_ms: now.wrapping_add(on_ms),
        });
        log::debug!("blink {}/{} ms started, pulses {}", on_ms, off_ms, pulses);
        Ok(())
    }

    /// Advance playback by at most one phase. Returns whether a transition
    /// happened. Cheap enough to call on every loop iteration.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now_ms();
        match self.activity {
            Activity::Pattern(run) if deadline_reached(now, run.deadline_ms) => {
                self.advance_pattern(run, now);
                true
            }
            Activity::Blink(blink) if deadline_reached(now, blink.deadline_ms) => {
                self.advance_blink(blink, now);
                true
            }
            _ => false,
        }
    }

    /// End whatever is playing and deactivate. The engine is Idle afterwards.
    pub fn stop(&mut self) -> Result<(), ErrorKind> {
        self.ensure_open()?;
        if let Activity::Pattern(run) = self.activity {
            log::debug!("pattern {} stopped", run.pattern.name());
        }
        self.halt();
        self.drive(false);
        Ok(())
    }

    /// Blink counterpart of [`stop`](Self::stop); ends any run the same way.
    pub fn stop_blink(&mut self) -> Result<(), ErrorKind> {
        self.ensure_open()?;
        if let Activity::Blink(_) = self.activity {
            log::debug!("blink stopped");
        }
        self.halt();
        self.drive(false);
        Ok(())
    }

    pub fn stop_all(&mut self) -> Result<(), ErrorKind> {
        self.ensure_open()?;
        self.halt();
        self.drive(false);
        Ok(())
    }

    fn advance_pattern(&mut self, mut run: PatternRun, now: u32) {
        let phases = run.pattern.phases();
        run.phase += 1;

        if run.phase == phases.len() {
            // The count only drops once the whole traversal, trailing
            // pause included, has elapsed.
            match run.repeats_remaining {
                1 => {
                    self.halt();
                    log::debug!("pattern {} finished", run.pattern.name());
                    return;
                }
                0 => {}
                _ => run.repeats_remaining -= 1,
            }
            run.phase = 0;
        }

        let phase = phases[run.phase];
        self.drive(phase.on);
        run.deadline_ms = now.wrapping_add(phase.duration_ms);
        self.activity = Activity::Pattern(run);
        log::trace!("{} phase {} {} for {} ms", run.pattern.name(), run.phase, on_off(phase.on), phase.duration_ms);
    }

    fn advance_blink(&mut self, mut blink: BlinkState, now: u32) {
        if blink.phase_on {
            match blink.pulses_remaining {
                1 => {
                    self.halt();
                    log::debug!("blink finished");
                    return;
                }
                0 => {}
                _ => blink.pulses_remaining -= 1,
            }
            blink.phase_on = false;
            blink.deadline_ms = now.wrapping_add(blink.off_ms);
        } else {
            blink.phase_on = true;
            blink.deadline_ms = now.wrapping_add(blink.on_ms);
        }

        self.drive(blink.phase_on);
        self.activity = Activity::Blink(blink);
        log::trace!("blink {}", on_off(blink.phase_on));
    }

    /// Drop any run in progress, leaving the actuator off if one was active.
    fn halt(&mut self) {
        if !matches!(self.activity, Activity::Idle) {
            self.activity = Activity::Idle;
            self.drive(false);
        }
    }

    fn drive(&mut self, on: bool) {
        // set_active only fails on a closed driver; close() halts first
        let _ = self.driver.set_active(on);
    }

    fn ensure_open(&mut self) -> Result<(), ErrorKind> {
        if self.driver.is_open() {
            Ok(())
        } else {
            Err(self.driver.fail(ErrorKind::NotInitialized))
        }
    }
}

impl<G: Gpio, C: Clock + Delay> PatternEngine<G, C> {
    /// Play one traversal of `pattern`, blocking for its full duration.
    ///
    /// There is no way to cancel a blocking call once it has started.
    /// A non-blocking run in progress is stopped first.
    pub fn play(&mut self, pattern: Pattern) -> Result<(), ErrorKind> {
        self.ensure_open()?;
        self.halt();

        log::debug!("pattern {} playing (blocking)", pattern.name());
        for phase in pattern.phases() {
            self.drive(phase.on);
            self.clock.delay_ms(phase.duration_ms);
        }
        self.drive(false);
        Ok(())
    }

    /// Play `pattern` `repeat` times in the chosen execution mode.
    ///
    /// Blocking playback cannot run forever, so `repeat == 0` plays once.
    pub fn sound(&mut self, pattern: Pattern, execution: Execution, repeat: u32) -> Result<(), ErrorKind> {
        match execution {
            Execution::NonBlocking => self.start(pattern, repeat),
            Execution::Blocking => {
                for _ in 0..repeat.max(1) {
                    self.play(pattern)?;
                }
                Ok(())
            }
        }
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}
