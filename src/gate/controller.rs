//! Gate controller - decides after each step whether the pipeline continues.
//!
//! The controller validates the step's declared output, reports what
//! happened through its notifier, and returns the continue/halt decision.
//! The driver owns the run loop; the controller only owns history.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::Config;
use crate::notify::{Notifier, PipelineEvent};
use crate::validation::{OutputMap, OutputValidator, ValidationResult, Validator};

/// Hook run once when a step halts the pipeline
pub type CriticalStopHook = Box<dyn FnMut(u32, &ValidationResult) + Send>;

/// Outcome of one gated step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: u32,
    pub result: ValidationResult,
    pub duration_ms: u64,
}

/// Per-run gate over a sequential pipeline
pub struct GateController {
    project_root: PathBuf,
    outputs: OutputMap,
    final_step: u32,
    validator: Box<dyn Validator>,
    notifier: Notifier,
    on_critical_stop: Option<CriticalStopHook>,
    results: Vec<StepRecord>,
}

impl GateController {
    /// Create a controller with the default output validator.
    ///
    /// The final step defaults to the highest declared step.
    pub fn new(project_root: impl Into<PathBuf>, outputs: OutputMap, notifier: Notifier) -> Self {
        let final_step = outputs.keys().next_back().copied().unwrap_or(1);
        Self {
            project_root: project_root.into(),
            outputs,
            final_step,
            validator: Box::new(OutputValidator::default()),
            notifier,
            on_critical_stop: None,
            results: Vec::new(),
        }
    }

    /// Create a controller from configuration
    pub fn from_config(config: &Config, notifier: Notifier) -> Self {
        Self::new(config.project_root.clone(), config.output_map(), notifier)
            .with_final_step(config.final_step)
            .with_validator(OutputValidator::new(config.validation_policy()))
    }

    pub fn with_final_step(mut self, final_step: u32) -> Self {
        self.final_step = final_step;
        self
    }

    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    pub fn on_critical_stop<F>(mut self, hook: F) -> Self
    where
        F: FnMut(u32, &ValidationResult) + Send + 'static,
    {
        self.on_critical_stop = Some(Box::new(hook));
        self
    }

    /// Gate a completed step.
    ///
    /// # Arguments
    /// * `step` - Step that just finished
    /// * `step_started` - When the step started, for the reported duration
    /// * `critical_question` - Optional question for humans; never blocks
    ///
    /// # Returns
    /// `true` if the driver may run the next step
    pub async fn gate(&mut self, step: u32, step_started: Instant, critical_question: Option<&str>) -> bool {
        let duration_ms = step_started.elapsed().as_millis() as u64;
        let result = self.validator.validate(step, &self.project_root, &self.outputs).await;
        self.results.push(StepRecord {
            step,
            result: result.clone(),
            duration_ms,
        });

        let output_file = self
            .outputs
            .get(&step)
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.notifier
            .notify(PipelineEvent::agent_complete(step, duration_ms, output_file))
            .await;

        if let Some(question) = critical_question {
            self.notifier.notify(PipelineEvent::question(step, question)).await;
        }

        if !result.can_continue {
            tracing::warn!(step, severity = %result.severity, issues = result.issues.len(), "Gate halted pipeline");
            self.notifier
                .notify(PipelineEvent::critical_stop(step, result.messages()))
                .await;
            if let Some(hook) = self.on_critical_stop.as_mut() {
                hook(step, &result);
            }
            return false;
        }

        if step < self.final_step {
            let warnings = result.warnings();
            tracing::info!(step, next_step = step + 1, warnings = warnings.len(), "Gate passed");
            self.notifier
                .notify(PipelineEvent::auto_continue(step + 1, warnings))
                .await;
        } else {
            tracing::info!(step, "Gate passed on final step");
        }
        true
    }

    /// Report the whole run as complete. Call once, after the last gate.
    pub async fn complete(&mut self, start_step: u32, end_step: u32, run_started: Instant) {
        let total_ms = run_started.elapsed().as_millis() as u64;
        tracing::info!(start_step, end_step, total_ms, "Pipeline complete");
        self.notifier
            .notify(PipelineEvent::pipeline_complete(start_step, end_step, total_ms))
            .await;
    }

    /// Gated steps in call order
    pub fn results(&self) -> &[StepRecord] {
        &self.results
    }

    pub fn last_result(&self) -> Option<&ValidationResult> {
        self.results.last().map(|r| &r.result)
    }

    /// Whether the most recent gate stopped the pipeline
    pub fn halted(&self) -> bool {
        self.last_result().is_some_and(|r| !r.can_continue)
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn final_step(&self) -> u32 {
        self.final_step
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn outputs(&self) -> &OutputMap {
        &self.outputs
    }
}
