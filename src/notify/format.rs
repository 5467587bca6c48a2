//! Human-readable rendering of pipeline events.

use std::fmt;

use super::event::PipelineEvent;

/// Artifact named in the completion message
pub const REPORT_ARTIFACT: &str = "report.html";

fn seconds(ms: u64) -> String {
    format!("{:.1}s", ms as f64 / 1000.0)
}

/// Render an event as a chat message
pub fn format_event(event: &PipelineEvent) -> String {
    match event {
        PipelineEvent::AgentComplete {
            step,
            duration_ms,
            output_file,
        } => format!("Step {} complete in {} -> {}", step, seconds(*duration_ms), output_file),
        PipelineEvent::AutoContinue { next_step, warnings } => {
            if warnings.is_empty() {
                format!("Auto-continuing to step {}", next_step)
            } else {
                format!("Auto-continuing to step {} (warnings: {})", next_step, warnings.join("; "))
            }
        }
        PipelineEvent::CriticalStop { step, issues } => {
            let mut message = format!("CRITICAL: pipeline stopped at step {}\n", step);
            for issue in issues {
                message.push_str(&format!("- {}\n", issue));
            }
            message.push_str("Manual intervention required.");
            message
        }
        PipelineEvent::Question { step, question } => {
            format!("Question from step {} (non-blocking): {}", step, question)
        }
        PipelineEvent::PipelineComplete {
            start_step,
            end_step,
            total_ms,
        } => format!(
            "Pipeline complete: steps {}-{} in {}. Final report: {}",
            start_step,
            end_step,
            seconds(*total_ms),
            REPORT_ARTIFACT
        ),
        PipelineEvent::Other { kind, payload } => format!("[{}] {}", kind, payload),
    }
}

impl fmt::Display for PipelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_event(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agent_complete() {
        let msg = format_event(&PipelineEvent::agent_complete(2, 12_345, "out/step2.json"));
        assert_eq!(msg, "Step 2 complete in 12.3s -> out/step2.json");
    }

    #[test]
    fn test_auto_continue_without_warnings() {
        let msg = format_event(&PipelineEvent::auto_continue(3, vec![]));
        assert_eq!(msg, "Auto-continuing to step 3");
    }

    #[test]
    fn test_auto_continue_with_warnings() {
        let msg = format_event(&PipelineEvent::auto_continue(
            3,
            vec!["a.json is very small (8 bytes)".to_string(), "other".to_string()],
        ));
        assert_eq!(msg, "Auto-continuing to step 3 (warnings: a.json is very small (8 bytes); other)");
    }

    #[test]
    fn test_critical_stop_lists_every_issue() {
        let msg = format_event(&PipelineEvent::critical_stop(
            4,
            vec!["first problem".to_string(), "second problem".to_string()],
        ));
        let lines: Vec<&str> = msg.lines().collect();
        assert_eq!(lines[0], "CRITICAL: pipeline stopped at step 4");
        assert_eq!(lines[1], "- first problem");
        assert_eq!(lines[2], "- second problem");
        assert!(msg.ends_with("Manual intervention required."));
    }

    #[test]
    fn test_question_is_non_blocking() {
        let msg = format_event(&PipelineEvent::question(5, "Include archived records?"));
        assert!(msg.contains("step 5"));
        assert!(msg.contains("non-blocking"));
        assert!(msg.ends_with("Include archived records?"));
    }

    #[test]
    fn test_pipeline_complete() {
        let msg = format_event(&PipelineEvent::pipeline_complete(1, 7, 90_000));
        assert_eq!(msg, "Pipeline complete: steps 1-7 in 90.0s. Final report: report.html");
    }

    #[test]
    fn test_other_serialized_verbatim() {
        let event = PipelineEvent::Other {
            kind: "budget_exceeded".to_string(),
            payload: json!({ "limit": 10 }),
        };
        assert_eq!(format_event(&event), r#"[budget_exceeded] {"limit":10}"#);
    }

    #[test]
    fn test_display_matches_format() {
        let event = PipelineEvent::question(1, "ok?");
        assert_eq!(event.to_string(), format_event(&event));
    }
}
