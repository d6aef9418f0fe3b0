use core::fmt;

/// Reasons an actuator operation can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidPin = 0,
    InvalidActiveLevel,
    NotInitialized,
}

const MESSAGES: [&str; 3] = [
    "pin number is negative or not output-capable",
    "active level must be 0 (low) or 1 (high)",
    "actuator is not open",
];

impl ErrorKind {
    /// Human-readable description, borrowed from a static table.
    pub const fn message(self) -> &'static str {
        MESSAGES[self as usize]
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl core::error::Error for ErrorKind {}
