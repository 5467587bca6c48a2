//! Pipeline event types reported through the notification sink.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event type constants
pub mod event_types {
    pub const AGENT_COMPLETE: &str = "agent_complete";
    pub const AUTO_CONTINUE: &str = "auto_continue";
    pub const CRITICAL_STOP: &str = "critical_stop";
    pub const QUESTION: &str = "question";
    pub const PIPELINE_COMPLETE: &str = "pipeline_complete";
}

/// Something that happened while gating the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// A step finished and its output was validated
    AgentComplete {
        step: u32,
        duration_ms: u64,
        output_file: String,
    },
    /// The gate let the pipeline move on
    AutoContinue { next_step: u32, warnings: Vec<String> },
    /// The gate halted the pipeline
    CriticalStop { step: u32, issues: Vec<String> },
    /// A step raised a question for humans; never blocks
    Question { step: u32, question: String },
    /// All steps in the range passed
    PipelineComplete {
        start_step: u32,
        end_step: u32,
        total_ms: u64,
    },
    /// Any event shape this crate does not know, kept verbatim
    Other { kind: String, payload: Value },
}

impl PipelineEvent {
    pub fn agent_complete(step: u32, duration_ms: u64, output_file: impl Into<String>) -> Self {
        Self::AgentComplete {
            step,
            duration_ms,
            output_file: output_file.into(),
        }
    }

    pub fn auto_continue(next_step: u32, warnings: Vec<String>) -> Self {
        Self::AutoContinue { next_step, warnings }
    }

    pub fn critical_stop(step: u32, issues: Vec<String>) -> Self {
        Self::CriticalStop { step, issues }
    }

    pub fn question(step: u32, question: impl Into<String>) -> Self {
        Self::Question {
            step,
            question: question.into(),
        }
    }

    pub fn pipeline_complete(start_step: u32, end_step: u32, total_ms: u64) -> Self {
        Self::PipelineComplete {
            start_step,
            end_step,
            total_ms,
        }
    }

    /// Parse a JSON event. Unknown or malformed shapes become `Other`.
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value::<PipelineEvent>(value.clone()) {
            Ok(event) => event,
            Err(_) => {
                let kind = value
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string();
                Self::Other { kind, payload: value }
            }
        }
    }

    /// Event type name
    pub fn kind(&self) -> &str {
        match self {
            Self::AgentComplete { .. } => event_types::AGENT_COMPLETE,
            Self::AutoContinue { .. } => event_types::AUTO_CONTINUE,
            Self::CriticalStop { .. } => event_types::CRITICAL_STOP,
            Self::Question { .. } => event_types::QUESTION,
            Self::PipelineComplete { .. } => event_types::PIPELINE_COMPLETE,
            Self::Other { kind, .. } => kind,
        }
    }

    /// Step the event refers to, if any
    pub fn step(&self) -> Option<u32> {
        match self {
            Self::AgentComplete { step, .. } | Self::CriticalStop { step, .. } | Self::Question { step, .. } => {
                Some(*step)
            }
            Self::AutoContinue { next_step, .. } => Some(*next_step),
            Self::PipelineComplete { .. } | Self::Other { .. } => None,
        }
    }
}
