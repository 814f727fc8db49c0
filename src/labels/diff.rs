use std::collections::{BTreeSet, HashMap};

use super::directory::LabelDirectory;
use crate::github::{CurrentLabel, GitHubError, TrackerOps};

/// One step of a reconciliation plan. Each operation targets a single label
/// (or, for `Reassign`, the issues leaving one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Create {
        name: String,
        color: String,
        description: String,
    },
    Update {
        name: String,
        color: String,
        description: String,
    },
    Delete {
        name: String,
    },
    Reassign {
        add_label: String,
        issue_numbers: Vec<u64>,
    },
}

impl Operation {
    pub fn describe(&self) -> String {
        match self {
            Operation::Create { name, color, .. } => format!("create `{name}` (color {color})"),
            Operation::Update { name, color, .. } => format!("update `{name}` (color {color})"),
            Operation::Delete { name } => format!("delete `{name}`"),
            Operation::Reassign {
                add_label,
                issue_numbers,
            } => format!(
                "add `{}` to {} issue(s)",
                add_label,
                issue_numbers.len()
            ),
        }
    }
}

/// The computed, not-yet-applied sequence of operations plus the safety
/// verdict. A blocked plan is still fully populated for reporting, but must
/// never be handed to the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationPlan {
    pub operations: Vec<Operation>,
    pub blocked: bool,
    pub blocked_labels: BTreeSet<String>,
}

impl ReconciliationPlan {
    pub fn is_noop(&self) -> bool {
        self.operations.is_empty() && !self.blocked
    }
}

/// Merge the directory against the live label snapshot.
///
/// Attached-issue lookups happen lazily through `tracker`, and only for
/// labels slated for replacement or deletion; most labels never need one.
/// Delete candidates are visited in name order so the plan is identical
/// between runs regardless of the order the tracker lists labels in.
pub async fn reconcile<T: TrackerOps + ?Sized>(
    directory: &LabelDirectory,
    current: &[CurrentLabel],
    tracker: &T,
) -> Result<ReconciliationPlan, GitHubError> {
    let current_by_name: HashMap<&str, &CurrentLabel> =
        current.iter().map(|l| (l.name.as_str(), l)).collect();

    let mut operations = Vec::new();
    let mut blocked_labels = BTreeSet::new();

    // Managed labels: create when missing, update when drifted, nothing when
    // already converged.
    for (name, color, description) in directory.managed() {
        match current_by_name.get(name) {
            None => operations.push(Operation::Create {
                name: name.to_string(),
                color: color.to_string(),
                description: description.to_string(),
            }),
            Some(existing) => {
                let drifted = existing.color != color
                    || existing.description.as_deref().unwrap_or("") != description;
                if drifted {
                    operations.push(Operation::Update {
                        name: name.to_string(),
                        color: color.to_string(),
                        description: description.to_string(),
                    });
                }
            }
        }
    }

    // Replace sources present in the repository: move attached issues to the
    // target first, then delete. Reordering that pair would leave issues
    // without their category for the gap between the two calls.
    for (from, to) in directory.replace_sources() {
        if !current_by_name.contains_key(from) {
            continue;
        }
        let issue_numbers = tracker.issue_numbers_for_label(from).await?;
        if !issue_numbers.is_empty() {
            operations.push(Operation::Reassign {
                add_label: to.to_string(),
                issue_numbers,
            });
        }
        operations.push(Operation::Delete {
            name: from.to_string(),
        });
    }

    // Everything the settings say nothing about is a delete candidate unless
    // an ignore pattern exempts it. Deletion is refused outright, not
    // deferred, while open issues are still attached.
    let mut candidates: Vec<&CurrentLabel> = current
        .iter()
        .filter(|l| directory.classify(&l.name).is_none())
        .collect();
    candidates.sort_by(|a, b| a.name.cmp(&b.name));

    for label in candidates {
        if directory.matches_ignore(&label.name).is_some() {
            continue;
        }
        let attached = tracker.issue_numbers_for_label(&label.name).await?;
        if attached.is_empty() {
            operations.push(Operation::Delete {
                name: label.name.clone(),
            });
        } else {
            tracing::warn!(
                label = %label.name,
                open_issues = attached.len(),
                "refusing to delete label with open issues attached"
            );
            blocked_labels.insert(label.name.clone());
        }
    }

    let blocked = !blocked_labels.is_empty();
    Ok(ReconciliationPlan {
        operations,
        blocked,
        blocked_labels,
    })
}
