use beeper_core::ActiveLevel;
use beeper_core::hal::{Direction, Gpio};

#[cfg(feature = "audio")]
use crate::tone::Tone;

/// Simulated GPIO bank with a single observed line.
pub struct DesktopGpio {
    line_count: u32,
    direction: Option<Direction>,
    high: bool,
    /// Level at which the simulated buzzer sounds
    energised_level: bool,
    #[cfg(feature = "audio")]
    tone: Tone,
}

impl DesktopGpio {
    pub fn new(line_count: u32, active_level: ActiveLevel) -> Self {
        Self {
            line_count,
            direction: None,
            high: false,
            energised_level: active_level.level_for(true),
            #[cfg(feature = "audio")]
            tone: Tone::spawn(crate::consts::TONE_HZ),
        }
    }

    pub fn is_high(&self) -> bool {
        self.high
    }

    pub fn is_driving(&self) -> bool {
        self.direction == Some(Direction::Output)
    }

    /// Whether the simulated actuator is currently energised.
    #[cfg_attr(not(feature = "audio"), allow(dead_code))]
    pub fn is_sounding(&self) -> bool {
        self.is_driving() && self.high == self.energised_level
    }

    fn update_tone(&self) {
        #[cfg(feature = "audio")]
        self.tone.set(self.is_sounding());
    }
}

impl Gpio for DesktopGpio {
    fn set_direction(&mut self, pin: u32, direction: Direction) {
        log::debug!("GPIO{} direction {:?}", pin, direction);
        self.direction = Some(direction);
        self.update_tone();
    }

    fn write_level(&mut self, _pin: u32, high: bool) {
        self.high = high;
        self.update_tone();
    }

    fn supports_output(&self, pin: u32) -> bool {
        pin < self.line_count
    }
}
