//! Output driver - polarity-aware on/off control of a single GPIO line.
//!
//! Callers think in terms of "active" and "inactive"; the driver maps that
//! onto the electrical level according to how the actuator is wired.

use crate::error::ErrorKind;
use crate::hal::{Direction, Gpio};

/// Electrical level that energises the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveLevel {
    Low,
    High,
}

impl ActiveLevel {
    /// Parse the raw mode flag used by untyped configuration sources.
    pub fn from_raw(mode: u8) -> Result<Self, ErrorKind> {
        match mode {
            0 => Ok(ActiveLevel::Low),
            1 => Ok(ActiveLevel::High),
            _ => Err(ErrorKind::InvalidActiveLevel),
        }
    }

    /// Electrical level to write for the requested logical state.
    pub fn level_for(self, active: bool) -> bool {
        match self {
            ActiveLevel::High => active,
            ActiveLevel::Low => !active,
        }
    }
}

/// Validated actuator wiring. Immutable once accepted by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorConfig {
    pub pin: u32,
    pub active_level: ActiveLevel,
}

impl ActuatorConfig {
    pub fn new(pin: i32, active_level: ActiveLevel) -> Result<Self, ErrorKind> {
        let pin = u32::try_from(pin).map_err(|_| ErrorKind::InvalidPin)?;
        Ok(Self { pin, active_level })
    }
}

pub struct OutputDriver<G: Gpio> {
    gpio: G,
    /// Outcome of the last `configure*`, applied by the next `open`
    config: Result<ActuatorConfig, ErrorKind>,
    /// Wiring the line was opened with; fixed until `close`
    opened: Option<ActuatorConfig>,
    active: bool,
    last_error: Option<ErrorKind>,
}

impl<G: Gpio> OutputDriver<G> {
    pub fn new(gpio: G) -> Self {
        Self {
            gpio,
            config: Err(ErrorKind::NotInitialized),
            opened: None,
            active: false,
            last_error: None,
        }
    }

    /// Accept wiring parameters. Nothing touches the line until [`open`](Self::open);
    /// an already open line keeps the wiring it was opened with.
    pub fn configure(&mut self, pin: i32, active_level: ActiveLevel) -> Result<(), ErrorKind> {
        self.config = ActuatorConfig::new(pin, active_level);
        self.config.map(|_| ()).map_err(|e| self.fail(e))
    }

    /// Same as [`configure`](Self::configure), with the level as a raw 0/1 flag.
    pub fn configure_raw(&mut self, pin: i32, active_mode: u8) -> Result<(), ErrorKind> {
        // Pin is checked first, matching the order errors are reported in
        self.config = ActuatorConfig::new(pin, ActiveLevel::Low).and_then(|config| {
            Ok(ActuatorConfig {
                active_level: ActiveLevel::from_raw(active_mode)?,
                ..config
            })
        });
        self.config.map(|_| ()).map_err(|e| self.fail(e))
    }

    /// Switch the line to output mode and park it at the inactive level.
    ///
    /// Reopening releases the previously opened line first. A failed open
    /// leaves the current line untouched.
    pub fn open(&mut self) -> Result<(), ErrorKind> {
        let config = self.config.map_err(|e| self.fail(e))?;
        if !self.gpio.supports_output(config.pin) {
            return Err(self.fail(ErrorKind::InvalidPin));
        }

        self.close();
        self.gpio.set_direction(config.pin, Direction::Output);
        self.gpio
            .write_level(config.pin, config.active_level.level_for(false));
        self.active = false;
        self.opened = Some(config);
        log::debug!("actuator open on pin {} ({:?} active)", config.pin, config.active_level);
        Ok(())
    }

    /// Release the line to a non-driving input. No-op when not open.
    pub fn close(&mut self) {
        if let Some(config) = self.opened.take() {
            self.gpio.write_level(config.pin, config.active_level.level_for(false));
            self.gpio.set_direction(config.pin, Direction::Input);
            log::debug!("actuator on pin {} released", config.pin);
        }
        self.active = false;
    }

    pub fn activate(&mut self) -> Result<(), ErrorKind> {
        self.set_active(true)
    }

    pub fn deactivate(&mut self) -> Result<(), ErrorKind> {
        self.set_active(false)
    }

    /// Drive the actuator on or off and update the software mirror.
    pub fn set_active(&mut self, active: bool) -> Result<(), ErrorKind> {
        let Some(config) = self.opened else {
            return Err(self.fail(ErrorKind::NotInitialized));
        };
        self.gpio
            .write_level(config.pin, config.active_level.level_for(active));
        self.active = active;
        Ok(())
    }

    /// Software mirror of the line; never read back from hardware.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_open(&self) -> bool {
        self.opened.is_some()
    }

    /// Wiring in use while open, otherwise the one the next `open` would apply.
    pub fn config(&self) -> Option<ActuatorConfig> {
        self.opened.or(self.config.ok())
    }

    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    pub(crate) fn gpio_mut(&mut self) -> &mut G {
        &mut self.gpio
    }

    /// Record `error` in the sticky slot and hand it back for returning.
    pub(crate) fn fail(&mut self, error: ErrorKind) -> ErrorKind {
        log::warn!("actuator: {}", error);
        self.last_error = Some(error);
        error
    }
}

impl<G: Gpio> Drop for OutputDriver<G> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimGpio, Write};
    use core::cell::Cell;

    fn driver(now: &Cell<u32>) -> OutputDriver<SimGpio<'_, 16>> {
        OutputDriver::new(SimGpio::new(now))
    }

    #[test]
    fn test_open_leaves_inactive() {
        let now = Cell::new(0);
        for (pin, level) in [(0, ActiveLevel::High), (7, ActiveLevel::Low)] {
            let mut d = driver(&now);
            d.configure(pin, level).unwrap();
            d.open().unwrap();
            assert!(!d.is_active());
            assert_eq!(d.gpio().direction(), Some(Direction::Output));
            assert_eq!(d.gpio().level(), Some(level.level_for(false)));
        }
    }

    #[test]
    fn test_active_low_inverts_level() {
        let now = Cell::new(0);
        let mut d = driver(&now);
        d.configure(3, ActiveLevel::Low).unwrap();
        d.open().unwrap();

        d.activate().unwrap();
        assert!(d.is_active());
        assert_eq!(d.gpio().level(), Some(false));

        d.deactivate().unwrap();
        assert!(!d.is_active());
        assert_eq!(d.gpio().level(), Some(true));
    }

    #[test]
    fn test_rejects_negative_pin() {
        let now = Cell::new(0);
        let mut d = driver(&now);
        assert_eq!(d.configure(-1, ActiveLevel::High), Err(ErrorKind::InvalidPin));
        assert_eq!(d.open(), Err(ErrorKind::InvalidPin));
        assert_eq!(d.last_error(), Some(ErrorKind::InvalidPin));
        assert!(!d.is_open());
    }

    #[test]
    fn test_rejects_raw_level_out_of_domain() {
        let now = Cell::new(0);
        let mut d = driver(&now);
        assert_eq!(d.configure_raw(4, 2), Err(ErrorKind::InvalidActiveLevel));
        assert_eq!(d.open(), Err(ErrorKind::InvalidActiveLevel));

        // Pin errors win when both are wrong
        assert_eq!(d.configure_raw(-4, 2), Err(ErrorKind::InvalidPin));

        d.configure_raw(4, 1).unwrap();
        assert_eq!(d.config().map(|c| c.active_level), Some(ActiveLevel::High));
    }

    #[test]
    fn test_rejects_line_without_output() {
        let now = Cell::new(0);
        let mut d = OutputDriver::new(SimGpio::<16>::with_lines(&now, 4));
        d.configure(4, ActiveLevel::High).unwrap();
        assert_eq!(d.open(), Err(ErrorKind::InvalidPin));
    }

    #[test]
    fn test_uninitialized_ops_change_nothing() {
        let now = Cell::new(0);
        let mut d = driver(&now);
        assert_eq!(d.activate(), Err(ErrorKind::NotInitialized));
        assert_eq!(d.deactivate(), Err(ErrorKind::NotInitialized));
        assert!(!d.is_active());
        assert_eq!(d.gpio().writes().count(), 0);
        assert_eq!(d.last_error(), Some(ErrorKind::NotInitialized));

        // Configured but never opened is still uninitialized
        d.configure(1, ActiveLevel::High).unwrap();
        assert_eq!(d.activate(), Err(ErrorKind::NotInitialized));
        assert_eq!(d.gpio().writes().count(), 0);
    }

    #[test]
    fn test_error_is_sticky_until_cleared() {
        let now = Cell::new(0);
        let mut d = driver(&now);
        let _ = d.activate();
        d.configure(1, ActiveLevel::High).unwrap();
        d.open().unwrap();
        d.activate().unwrap();
        assert_eq!(d.last_error(), Some(ErrorKind::NotInitialized));
        d.clear_error();
        assert_eq!(d.last_error(), None);
    }

    #[test]
    fn test_close_releases_line() {
        let now = Cell::new(0);
        let mut d = driver(&now);
        d.configure(2, ActiveLevel::High).unwrap();
        d.open().unwrap();
        d.activate().unwrap();
        d.close();

        assert!(!d.is_open());
        assert!(!d.is_active());
        assert_eq!(d.gpio().direction(), Some(Direction::Input));
        assert_eq!(d.gpio().writes().last(), Some(&Write { at_ms: 0, high: false }));
        assert_eq!(d.activate(), Err(ErrorKind::NotInitialized));
    }

    #[test]
    fn test_reconfigure_while_open_keeps_live_wiring() {
        let now = Cell::new(0);
        let mut d = driver(&now);
        d.configure(5, ActiveLevel::High).unwrap();
        d.open().unwrap();
        d.activate().unwrap();

        assert_eq!(d.configure(-1, ActiveLevel::High), Err(ErrorKind::InvalidPin));
        assert_eq!(d.config().map(|c| c.pin), Some(5));
        d.deactivate().unwrap();
        assert_eq!(d.gpio().level(), Some(false));

        d.activate().unwrap();
        d.close();
        assert_eq!(d.gpio().direction(), Some(Direction::Input));
        assert_eq!(d.gpio().level(), Some(false));
    }

    #[test]
    fn test_reopen_applies_new_wiring() {
        let now = Cell::new(0);
        let mut d = driver(&now);
        d.configure(5, ActiveLevel::High).unwrap();
        d.open().unwrap();
        d.activate().unwrap();

        d.configure(5, ActiveLevel::Low).unwrap();
        assert_eq!(d.config().map(|c| c.active_level), Some(ActiveLevel::High));
        d.open().unwrap();

        assert!(!d.is_active());
        assert_eq!(d.config().map(|c| c.active_level), Some(ActiveLevel::Low));
        assert_eq!(d.gpio().direction(), Some(Direction::Output));
        assert_eq!(d.gpio().level(), Some(true));
    }
}
