//! Pattern catalogue.
//!
//! Every pattern is a flat, ordered list of on/off phases. Tables are
//! expanded at compile time from repeated units so the engine only ever
//! walks a slice by index.

/// A contiguous on or off interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub on: bool,
    pub duration_ms: u32,
}

impl Phase {
    pub const fn on(duration_ms: u32) -> Self {
        Self { on: true, duration_ms }
    }

    pub const fn off(duration_ms: u32) -> Self {
        Self { on: false, duration_ms }
    }
}

/// Concatenate `(unit, times)` groups into a table of exactly `N` phases.
const fn expand<const N: usize>(groups: &[(&[Phase], usize)]) -> [Phase; N] {
    let mut out = [Phase::off(0); N];
    let mut len = 0;
    let mut g = 0;
    while g < groups.len() {
        let (unit, times) = groups[g];
        let mut t = 0;
        while t < times {
            let mut i = 0;
            while i < unit.len() {
                out[len] = unit[i];
                len += 1;
                i += 1;
            }
            t += 1;
        }
        g += 1;
    }
    assert!(len == N, "phase table length does not match its declared size");
    out
}

const PULSE_100: [Phase; 2] = [Phase::on(100), Phase::off(100)];
const CHIRP_5: [Phase; 2] = [Phase::on(5), Phase::off(5)];
const CHIRP_25: [Phase; 2] = [Phase::on(25), Phase::off(25)];
const ALERT_PULSE: [Phase; 2] = [Phase::on(200), Phase::off(100)];
const DASH: [Phase; 2] = [Phase::on(300), Phase::off(100)];
const LETTER_GAP: [Phase; 1] = [Phase::off(200)];
const LONG_GAP: [Phase; 1] = [Phase::off(1000)];

const WARNING_1_BURST: [Phase; 41] = expand(&[(CHIRP_5.as_slice(), 20), (LETTER_GAP.as_slice(), 1)]);

static INIT: [Phase; 2] = [Phase::on(1000), Phase::off(100)];
static STOP: [Phase; 4] = expand(&[(PULSE_100.as_slice(), 2)]);
static WARNING_1: [Phase; 410] = expand(&[(WARNING_1_BURST.as_slice(), 10)]);
static WARNING_2: [Phase; 2] = PULSE_100;
static WARNING_3: [Phase; 20] = expand(&[(CHIRP_25.as_slice(), 10)]);
static HEARTBEAT: [Phase; 2] = [Phase::on(50), Phase::off(950)];
static ERROR_ALERT: [Phase; 7] = expand(&[
    (ALERT_PULSE.as_slice(), 3),
    (LONG_GAP.as_slice(), 1),
]);
static SUCCESS: [Phase; 3] = [Phase::on(100), Phase::off(50), Phase::on(400)];
static ALARM: [Phase; 2] = [Phase::on(2000), Phase::off(200)];
static MORSE_SOS: [Phase; 20] = expand(&[
    (PULSE_100.as_slice(), 3),
    (LETTER_GAP.as_slice(), 1),
    (DASH.as_slice(), 3),
    (LETTER_GAP.as_slice(), 1),
    (PULSE_100.as_slice(), 3),
]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Setup finished.
    Init,
    /// An operation was stopped.
    Stop,
    /// Ten bursts of fast chirps.
    Warning1,
    Warning2,
    Warning3,
    Heartbeat,
    ErrorAlert,
    Success,
    Alarm,
    MorseSos,
}

impl Pattern {
    pub const ALL: [Pattern; 10] = [
        Pattern::Init,
        Pattern::Stop,
        Pattern::Warning1,
        Pattern::Warning2,
        Pattern::Warning3,
        Pattern::Heartbeat,
        Pattern::ErrorAlert,
        Pattern::Success,
        Pattern::Alarm,
        Pattern::MorseSos,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pattern::Init => "init",
            Pattern::Stop => "stop",
            Pattern::Warning1 => "warning-1",
            Pattern::Warning2 => "warning-2",
            Pattern::Warning3 => "warning-3",
            Pattern::Heartbeat => "heartbeat",
            Pattern::ErrorAlert => "error-alert",
            Pattern::Success => "success",
            Pattern::Alarm => "alarm",
            Pattern::MorseSos => "morse-sos",
        }
    }

    /// One traversal of the pattern, in playback order. Never empty.
    pub fn phases(self) -> &'static [Phase] {
        match self {
            Pattern::Init => INIT.as_slice(),
            Pattern::Stop => STOP.as_slice(),
            Pattern::Warning1 => WARNING_1.as_slice(),
            Pattern::Warning2 => WARNING_2.as_slice(),
            Pattern::Warning3 => WARNING_3.as_slice(),
            Pattern::Heartbeat => HEARTBEAT.as_slice(),
            Pattern::ErrorAlert => ERROR_ALERT.as_slice(),
            Pattern::Success => SUCCESS.as_slice(),
            Pattern::Alarm => ALARM.as_slice(),
            Pattern::MorseSos => MORSE_SOS.as_slice(),
        }
    }

    pub fn on_time_ms(self) -> u32 {
        self.phases().iter().filter(|p| p.on).map(|p| p.duration_ms).sum()
    }

    pub fn off_time_ms(self) -> u32 {
        self.phases().iter().filter(|p| !p.on).map(|p| p.duration_ms).sum()
    }

    /// Length of one traversal.
    pub fn duration_ms(self) -> u32 {
        self.on_time_ms() + self.off_time_ms()
    }
}
