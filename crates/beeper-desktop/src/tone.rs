//! Audible stand-in for a piezo buzzer: a square wave that is paused and
//! resumed as the simulated line toggles.

use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;
use std::time::Duration;

use rodio::{OutputStream, Sink, Source};

const SAMPLE_RATE: u32 = 48_000;
const AMPLITUDE: f32 = 0.15;

// Endless square wave
struct SquareWave {
    frequency: f32,
    sample_rate: u32,
    current_sample: u64,
}

impl SquareWave {
    fn new(frequency: f32, sample_rate: u32) -> Self {
        Self {
            frequency,
            sample_rate,
            current_sample: 0,
        }
    }
}

impl Iterator for SquareWave {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let sample_position = self.current_sample as f32 / self.sample_rate as f32;
        let cycle_position = (sample_position * self.frequency) % 1.0;
        self.current_sample = (self.current_sample + 1) % self.sample_rate as u64;

        if cycle_position < 0.5 {
            Some(AMPLITUDE)
        } else {
            Some(-AMPLITUDE)
        }
    }
}

impl Source for SquareWave {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

/// Handle to the audio thread. Cheap to call from the tick loop.
pub struct Tone {
    tx: Sender<bool>,
}

impl Tone {
    pub fn spawn(frequency_hz: u32) -> Self {
        let (tx, rx) = channel::<bool>();

        thread::spawn(move || {
            tone_thread(rx, frequency_hz);
        });

        Self { tx }
    }

    pub fn set(&self, sounding: bool) {
        // Audio thread may have failed to start; the simulation carries on silently
        let _ = self.tx.send(sounding);
    }
}

fn tone_thread(rx: Receiver<bool>, frequency_hz: u32) {
    let Ok((_stream, stream_handle)) = OutputStream::try_default() else {
        log::warn!("no audio output, tone disabled");
        return;
    };
    let sink = match Sink::try_new(&stream_handle) {
        Ok(sink) => sink,
        Err(e) => {
            log::warn!("failed to open audio sink: {}", e);
            return;
        }
    };

    sink.pause();
    sink.append(SquareWave::new(frequency_hz as f32, SAMPLE_RATE));

    while let Ok(sounding) = rx.recv() {
        if sounding {
            sink.play();
        } else {
            sink.pause();
        }
    }
}
