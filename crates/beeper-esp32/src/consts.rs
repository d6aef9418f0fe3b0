use beeper_core::ActiveLevel;

/// Piezo buzzer, driven directly (no LEDC)
pub const BUZZER_PIN: i32 = 9;
pub const ACTIVE_LEVEL: ActiveLevel = ActiveLevel::High;

pub const LOOP_PERIOD_MS: u32 = 1;
/// Traversals played for each button-selected pattern
pub const DEMO_REPEAT: u32 = 2;
/// Main loop iterations between status reports
pub const STATUS_EVERY: u32 = 10_000;
