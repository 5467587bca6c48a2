// Output validation: classifies a step's artifact by severity

pub mod output;
pub mod traits;

pub use output::{OutputValidator, ValidationPolicy};
pub use traits::{Issue, IssueKind, OutputMap, Severity, ValidationResult, Validator};
