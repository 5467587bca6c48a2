//! stepgate - inter-step validation and gating for sequential agent pipelines
//!
//! After each step the gate checks the step's declared output, reports
//! progress through a best-effort notifier, and tells the driver whether
//! the next step may run.

pub mod config;
pub mod error;
pub mod gate;
pub mod notify;
pub mod validation;

pub use config::Config;
pub use error::{GateError, Result};
pub use gate::{GateController, StepRecord};
pub use notify::{Notifier, PipelineEvent, QueueEntry, Transport};
pub use validation::{OutputValidator, Severity, ValidationResult, Validator};
