use std::thread;

use beeper_core::{Pattern, PatternEngine};

mod clock;
mod command;
mod consts;
mod gpio;
#[cfg(feature = "audio")]
mod tone;
mod tui;

use clock::StdClock;
use command::{Command, Status};
use gpio::DesktopGpio;
use tui::ControlPanel;

fn main() -> anyhow::Result<()> {
    let mut panel = ControlPanel::new()?;

    let gpio = DesktopGpio::new(consts::LINE_COUNT, consts::ACTIVE_LEVEL);
    let mut engine = PatternEngine::new(gpio, StdClock::new());
    engine.configure(consts::BUZZER_PIN, consts::ACTIVE_LEVEL)?;
    engine.open()?;
    log::info!("actuator ready on GPIO{}", consts::BUZZER_PIN);

    // Startup chime, blocking like the firmware does at boot
    engine.play(Pattern::Init)?;

    'running: loop {
        while let Some(command) = panel.try_command() {
            if command == Command::Quit {
                break 'running;
            }
            if let Err(e) = command::apply(&mut engine, command) {
                log::warn!("{:?} rejected: {}", command, e);
            }
        }

        engine.tick();
        let line_high = engine.driver().gpio().is_high();
        panel.publish(Status::of(&engine, line_high));

        thread::sleep(consts::LOOP_PERIOD);
    }

    log::info!("shutting down");
    engine.close();
    panel.shutdown();
    Ok(())
}
