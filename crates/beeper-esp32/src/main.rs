use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::peripherals::Peripherals;

use beeper_core::{EngineMode, Pattern, PatternEngine};

mod button;
mod consts;
mod hw;

use button::{Button, ButtonState};
use hw::{EspClock, EspGpio};

fn main() -> anyhow::Result<()> {
    // It is necessary to call this function once. Otherwise, some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_svc::sys::link_patches();

    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();

    log::info!("Beeper ESP32 starting...");

    let peripherals = Peripherals::take()?;

    // BOOT button cycles through the catalogue
    let mut button = Button::new(peripherals.pins.gpio0.into())?;
    log::info!("Button configured on GPIO0");

    let mut engine = PatternEngine::new(EspGpio, EspClock);
    engine.configure(consts::BUZZER_PIN, consts::ACTIVE_LEVEL)?;
    engine.open()?;
    log::info!("Buzzer configured on GPIO{}", consts::BUZZER_PIN);

    // Startup chime blocks; nothing else needs the CPU yet
    engine.play(Pattern::Init)?;
    engine.start(Pattern::Heartbeat, 0)?;

    let mut selected: Option<usize> = None;
    let mut loop_count = 0u32;

    loop {
        if button.poll() == ButtonState::JustPressed {
            let next = selected.map_or(0, |i| (i + 1) % Pattern::ALL.len());
            let pattern = Pattern::ALL[next];
            selected = Some(next);

            log::info!("Button: {} x{}", pattern.name(), consts::DEMO_REPEAT);
            if let Err(e) = engine.start(pattern, consts::DEMO_REPEAT) {
                log::error!("Failed to start {}: {}", pattern.name(), e);
            }
        }

        engine.tick();

        // Fall back to the idle heartbeat once a demo run completes
        if engine.mode() == EngineMode::Idle {
            if let Err(e) = engine.start(Pattern::Heartbeat, 0) {
                log::error!("Failed to resume heartbeat: {}", e);
            }
        }

        if loop_count % consts::STATUS_EVERY == 0 {
            log::info!(
                "Engine {:?} ({}), actuator {}",
                engine.mode(),
                engine.current_pattern().map_or("-", Pattern::name),
                if engine.is_on() { "on" } else { "off" },
            );
        }
        loop_count = loop_count.wrapping_add(1);

        FreeRtos::delay_ms(consts::LOOP_PERIOD_MS);
    }
}
