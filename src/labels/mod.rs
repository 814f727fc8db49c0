//! Label reconciliation core: desired-state settings, the classification
//! directory, the diff engine that produces a plan, and the executor that
//! applies it.

pub mod diff;
pub mod directory;
pub mod executor;
pub mod report;
pub mod settings;

pub use diff::{reconcile, Operation, ReconciliationPlan};
pub use directory::{Classification, LabelDirectory};
pub use executor::{apply, OperationOutcome};
pub use report::PlanReport;
pub use settings::{DesiredLabel, LabelSettings, ReplaceRule};

use thiserror::Error;

/// Fatal configuration problems. All of these abort the run before any
/// network call is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("label name is duplicated in settings file (`{0}`)")]
    DuplicateLabelName(String),

    #[error("label name of `replace - to` is not found in labels (`{0}`)")]
    ReplaceTargetNotFound(String),

    #[error("ignore pattern `{pattern}` does not compile: {source}")]
    BadIgnorePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("label settings file not found ({path})")]
    SettingsNotFound { path: String },

    #[error("label settings file is not valid JSON ({path}): {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
