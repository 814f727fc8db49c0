pub mod client;
pub mod errors;
pub mod types;

pub use client::{GitHubClient, TrackerOps};
pub use errors::GitHubError;
pub use types::{CurrentLabel, IssueRecord};
