// gh-steward library - GitHub label reconciliation and issue digests
// This exposes the core components for testing and integration

pub mod cli;
pub mod config;
pub mod github;
pub mod issues;
pub mod labels;

// Re-export key types for easy access
pub use config::StewardConfig;
pub use github::{CurrentLabel, GitHubClient, GitHubError, IssueRecord, TrackerOps};
pub use labels::{
    apply, reconcile, Classification, ConfigError, LabelDirectory, LabelSettings, Operation,
    OperationOutcome, PlanReport, ReconciliationPlan,
};
