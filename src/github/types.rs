/// A label as it currently exists in the repository.
///
/// Attached-issue counts are deliberately not part of this snapshot; they are
/// fetched on demand through `TrackerOps::issue_numbers_for_label`, and only
/// for labels that are candidates for deletion or replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentLabel {
    pub name: String,
    pub color: String,
    pub description: Option<String>,
}

/// The slice of an issue the summary report cares about.
#[derive(Debug, Clone)]
pub struct IssueRecord {
    pub number: u64,
    pub title: String,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
}
