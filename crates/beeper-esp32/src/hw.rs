//! ESP-IDF implementations of the engine's hardware capabilities.

use esp_idf_hal::delay::FreeRtos;
use esp_idf_svc::sys::{self, esp};

use beeper_core::hal::{Clock, Delay, Direction, Gpio};

/// GPIO matrix access by pin number.
pub struct EspGpio;

impl Gpio for EspGpio {
    fn set_direction(&mut self, pin: u32, direction: Direction) {
        let mode = match direction {
            Direction::Input => sys::gpio_mode_t_GPIO_MODE_INPUT,
            Direction::Output => sys::gpio_mode_t_GPIO_MODE_OUTPUT,
        };
        if let Err(e) = esp!(unsafe { sys::gpio_set_direction(pin as i32, mode) }) {
            log::error!("GPIO{} set direction {:?} failed: {}", pin, direction, e);
        }
    }

    fn write_level(&mut self, pin: u32, high: bool) {
        if let Err(e) = esp!(unsafe { sys::gpio_set_level(pin as i32, high as u32) }) {
            log::error!("GPIO{} write failed: {}", pin, e);
        }
    }

    /// ESP32-S3: GPIO22..=25 do not exist, 0..=21 and 26..=48 can drive.
    fn supports_output(&self, pin: u32) -> bool {
        matches!(pin, 0..=21 | 26..=48)
    }
}

/// Milliseconds from the high-resolution esp_timer, wrapping at 32 bits.
pub struct EspClock;

impl Clock for EspClock {
    fn now_ms(&self) -> u32 {
        let us = unsafe { sys::esp_timer_get_time() };
        (us / 1000) as u32
    }
}

impl Delay for EspClock {
    fn delay_ms(&mut self, ms: u32) {
        FreeRtos::delay_ms(ms);
    }
}
