//! Polled push button with edge detection.

use esp_idf_hal::gpio::{AnyInputPin, Input, PinDriver};
use esp_idf_svc::sys::EspError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    JustPressed,
    Pressed,
    JustReleased,
    Released,
}

/// Active-low button (shorts to GND when pressed, board provides the pull-up).
pub struct Button<'d> {
    pin: PinDriver<'d, AnyInputPin, Input>,
    pressed: bool,
}

impl<'d> Button<'d> {
    pub fn new(pin: AnyInputPin) -> Result<Self, EspError> {
        let pin = PinDriver::input(pin)?;
        Ok(Self { pin, pressed: false })
    }

    pub fn poll(&mut self) -> ButtonState {
        let previous = self.pressed;
        self.pressed = self.pin.is_low();

        match (previous, self.pressed) {
            (false, true) => ButtonState::JustPressed,
            (true, true) => ButtonState::Pressed,
            (true, false) => ButtonState::JustReleased,
            (false, false) => ButtonState::Released,
        }
    }
}
