//! Sequential driver over artifacts already on disk.
//!
//! Gates a step range in order, stops at the first halt, and reports the
//! run complete only when every step passed. The last step of the range is
//! the final step, so no auto-continue points past it.

use std::time::Instant;

use super::controller::GateController;
use crate::config::Config;
use crate::error::{GateError, Result};
use crate::notify::Notifier;

/// What happened to a gated range
pub struct RangeOutcome {
    pub controller: GateController,
    /// Step that halted the run, if any
    pub halted_at: Option<u32>,
}

impl RangeOutcome {
    pub fn passed(&self) -> bool {
        self.halted_at.is_none()
    }
}

/// Gate steps `from..=to` (default `to` is the configured final step)
pub async fn check_range(config: &Config, notifier: Notifier, from: u32, to: Option<u32>) -> Result<RangeOutcome> {
    let to = to.unwrap_or(config.final_step);
    if from == 0 || from > to {
        return Err(GateError::Config(format!("Invalid step range {}..={}", from, to)));
    }
    if to > config.final_step {
        return Err(GateError::Config(format!(
            "Step {} is past the final step {}",
            to, config.final_step
        )));
    }
    log::info!("Gating steps {}..={}", from, to);

    let mut controller = GateController::from_config(config, notifier).with_final_step(to);
    let run_started = Instant::now();

    let mut halted_at = None;
    for step in from..=to {
        if !controller.gate(step, Instant::now(), None).await {
            halted_at = Some(step);
            break;
        }
    }
    if halted_at.is_none() {
        controller.complete(from, to, run_started).await;
    }

    Ok(RangeOutcome { controller, halted_at })
}
