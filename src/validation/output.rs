// Structural checks on step output artifacts

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::Path;

use crate::validation::traits::{Issue, IssueKind, OutputMap, Severity, ValidationResult, Validator};

/// Structured artifacts smaller than this get an advisory warning
pub const MIN_STRUCTURED_CHARS: usize = 50;

/// Rendered documents shorter than this are rejected
pub const MIN_DOCUMENT_CHARS: usize = 100;

/// Thresholds and per-step exceptions applied by [`OutputValidator`]
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    pub min_structured_chars: usize,
    pub min_document_chars: usize,
    /// Steps allowed to produce an empty collection; downgraded to a warning
    pub allow_empty: BTreeSet<u32>,
}

impl ValidationPolicy {
    fn empty_severity(&self, step: u32) -> Severity {
        if self.allow_empty.contains(&step) {
            Severity::Warning
        } else {
            IssueKind::EmptyOutput.default_severity()
        }
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            min_structured_chars: MIN_STRUCTURED_CHARS,
            min_document_chars: MIN_DOCUMENT_CHARS,
            allow_empty: BTreeSet::new(),
        }
    }
}

/// Parseable data formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataFormat {
    Json,
    Yaml,
}

impl DataFormat {
    fn label(&self) -> &'static str {
        match self {
            DataFormat::Json => "JSON",
            DataFormat::Yaml => "YAML",
        }
    }

    /// Parse and count top-level items. Scalars count as zero.
    fn item_count(&self, content: &str) -> std::result::Result<usize, String> {
        match self {
            DataFormat::Json => {
                let value: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
                Ok(match value {
                    serde_json::Value::Array(items) => items.len(),
                    serde_json::Value::Object(map) => map.len(),
                    _ => 0,
                })
            }
            DataFormat::Yaml => {
                let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
                Ok(match value {
                    serde_yaml::Value::Sequence(items) => items.len(),
                    serde_yaml::Value::Mapping(map) => map.len(),
                    _ => 0,
                })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArtifactKind {
    Structured(DataFormat),
    Document,
    Opaque,
}

impl ArtifactKind {
    fn of(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "json" => ArtifactKind::Structured(DataFormat::Json),
            "yaml" | "yml" => ArtifactKind::Structured(DataFormat::Yaml),
            "html" | "htm" => ArtifactKind::Document,
            _ => ArtifactKind::Opaque,
        }
    }
}

fn has_document_root(content: &str) -> bool {
    content.to_ascii_lowercase().contains("<html")
}

/// Validator that checks existence, parseability and size of step outputs
#[derive(Debug, Clone, Default)]
pub struct OutputValidator {
    policy: ValidationPolicy,
}

impl OutputValidator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }
}

#[async_trait]
impl Validator for OutputValidator {
    async fn validate(&self, step: u32, project_root: &Path, outputs: &OutputMap) -> ValidationResult {
        let Some(relative) = outputs.get(&step) else {
            return ValidationResult::critical(
                step,
                IssueKind::MissingOutput,
                format!("Output file missing: <no output declared for step {}>", step),
            );
        };
        let path = project_root.join(relative);
        let shown = relative.display();

        match tokio::fs::try_exists(&path).await {
            Ok(true) => {}
            Ok(false) => {
                return ValidationResult::critical(step, IssueKind::MissingOutput, format!("Output file missing: {}", shown));
            }
            Err(e) => {
                return ValidationResult::critical(
                    step,
                    IssueKind::UnreadableOutput,
                    format!("Failed to read {}: {}", shown, e),
                );
            }
        }

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) => {
                return ValidationResult::critical(
                    step,
                    IssueKind::UnreadableOutput,
                    format!("Failed to read {}: {}", shown, e),
                );
            }
        };

        // Thresholds count characters, not UTF-8 bytes
        let length = content.chars().count();
        let mut issues = Vec::new();
        match ArtifactKind::of(relative) {
            ArtifactKind::Structured(format) => {
                let count = match format.item_count(&content) {
                    Ok(n) => n,
                    Err(e) => {
                        return ValidationResult::critical(
                            step,
                            IssueKind::MalformedStructuredData,
                            format!("Invalid {} in {}: {}", format.label(), shown, e),
                        );
                    }
                };
                if count == 0 {
                    issues.push(Issue::new(
                        IssueKind::EmptyOutput,
                        self.policy.empty_severity(step),
                        format!("{} is empty (0 keys/items)", shown),
                    ));
                }
                if length < self.policy.min_structured_chars {
                    issues.push(Issue::of(
                        IssueKind::SmallOutput,
                        format!("{} is very small ({} bytes)", shown, length),
                    ));
                }
            }
            ArtifactKind::Document => {
                if length < self.policy.min_document_chars || !has_document_root(&content) {
                    return ValidationResult::critical(
                        step,
                        IssueKind::InvalidRenderedDocument,
                        format!("Invalid HTML in {}", shown),
                    );
                }
            }
            ArtifactKind::Opaque => {}
        }

        let result = ValidationResult::from_issues(step, issues);
        log::debug!("Step {} output {} validated: {}", step, shown, result.severity);
        result
    }

    fn description(&self) -> &str {
        "output structure validator"
    }
}
