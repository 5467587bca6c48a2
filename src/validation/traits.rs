// Core validation interfaces: severities, issues and the per-step result

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Step number to artifact path, relative to the project root
pub type OutputMap = BTreeMap<u32, PathBuf>;

/// Severity of a single issue. Ordered so that aggregation is a max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    #[default]
    Ok,
    Warning,
    Critical,
}

impl Severity {
    /// Worst of the two wins
    pub fn join(self, other: Self) -> Self {
        self.max(other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a validation issue is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Declared artifact is not on disk (or no artifact was declared)
    MissingOutput,
    /// Artifact exists but could not be read as text
    UnreadableOutput,
    /// Structured data failed to parse
    MalformedStructuredData,
    /// Structured data parsed to zero keys/items
    EmptyOutput,
    /// Structured data below the minimum viable size (advisory)
    SmallOutput,
    /// Rendered document is too short or lacks its root element
    InvalidRenderedDocument,
}

impl IssueKind {
    /// Severity an issue of this kind carries unless a policy overrides it
    pub fn default_severity(&self) -> Severity {
        match self {
            IssueKind::SmallOutput => Severity::Warning,
            _ => Severity::Critical,
        }
    }
}

/// A human-readable problem found while validating one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    pub fn new(kind: IssueKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
        }
    }

    /// Issue at the kind's default severity
    pub fn of(kind: IssueKind, message: impl Into<String>) -> Self {
        Self::new(kind, kind.default_severity(), message)
    }
}

/// Outcome of validating one step's artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Step the artifact belongs to
    pub step: u32,
    /// Worst severity among the issues
    pub severity: Severity,
    /// Issues in discovery order
    pub issues: Vec<Issue>,
    /// False iff any issue is critical
    pub can_continue: bool,
}

impl ValidationResult {
    /// Build a result, deriving the aggregate severity and the continue flag
    pub fn from_issues(step: u32, issues: Vec<Issue>) -> Self {
        let severity = issues
            .iter()
            .fold(Severity::Ok, |acc, issue| acc.join(issue.severity));
        Self {
            step,
            severity,
            can_continue: severity != Severity::Critical,
            issues,
        }
    }

    /// A clean result with no issues
    pub fn ok(step: u32) -> Self {
        Self::from_issues(step, Vec::new())
    }

    /// A short-circuit result carrying a single critical issue
    pub fn critical(step: u32, kind: IssueKind, message: impl Into<String>) -> Self {
        Self::from_issues(step, vec![Issue::new(kind, Severity::Critical, message)])
    }

    /// Issue messages in order
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.message.clone()).collect()
    }

    /// Messages of warning-level issues only
    pub fn warnings(&self) -> Vec<String> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .map(|i| i.message.clone())
            .collect()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Trait for validators that check a step's declared output
#[async_trait]
pub trait Validator: Send + Sync {
    /// Validate the artifact declared for `step`
    ///
    /// # Arguments
    /// * `step` - Pipeline step whose output is checked
    /// * `project_root` - Directory the relative output path resolves against
    /// * `outputs` - Declared artifact per step
    ///
    /// Never fails: every problem is reported inside the result.
    async fn validate(&self, step: u32, project_root: &Path, outputs: &OutputMap) -> ValidationResult;

    /// Get a description of what this validator checks
    fn description(&self) -> &str {
        "validator"
    }
}
