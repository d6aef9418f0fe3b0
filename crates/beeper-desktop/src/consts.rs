use std::time::Duration;

use beeper_core::ActiveLevel;

/// Simulated board exposes GPIO0..=48, like the ESP32-S3 target
pub const LINE_COUNT: u32 = 49;
pub const BUZZER_PIN: i32 = 9;
pub const ACTIVE_LEVEL: ActiveLevel = ActiveLevel::High;

/// Main loop period; also the tick resolution
pub const LOOP_PERIOD: Duration = Duration::from_millis(1);

pub const BLINK_ON_MS: u32 = 100;
pub const BLINK_OFF_MS: u32 = 400;
pub const BLINK_PULSES: u32 = 5;

pub const MAX_REPEAT: u32 = 99;

#[cfg(feature = "audio")]
pub const TONE_HZ: u32 = 2700;
