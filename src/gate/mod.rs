//! Step gating: validate, notify, decide.

pub mod controller;
pub mod driver;

pub use controller::{CriticalStopHook, GateController, StepRecord};
pub use driver::{RangeOutcome, check_range};
