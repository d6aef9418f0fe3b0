#![cfg_attr(not(test), no_std)]

pub mod engine;
pub mod error;
pub mod hal;
pub mod output;
pub mod pattern;
pub mod sim;

pub use engine::{EngineMode, Execution, PatternEngine};
pub use error::ErrorKind;
pub use output::{ActiveLevel, ActuatorConfig, OutputDriver};
pub use pattern::{Pattern, Phase};
