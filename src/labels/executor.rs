use super::diff::{Operation, ReconciliationPlan};
use crate::github::TrackerOps;

/// The result of one tracker call made while applying a plan.
#[derive(Debug, Clone)]
pub struct OperationOutcome {
    pub operation: Operation,
    pub ok: bool,
    pub error: Option<String>,
}

impl OperationOutcome {
    fn success(operation: Operation) -> Self {
        OperationOutcome {
            operation,
            ok: true,
            error: None,
        }
    }

    fn failure(operation: Operation, error: impl std::fmt::Display) -> Self {
        OperationOutcome {
            operation,
            ok: false,
            error: Some(error.to_string()),
        }
    }
}

/// Apply the plan's operations in order, one tracker call at a time.
///
/// The caller must check `plan.blocked` first; a blocked plan is reported,
/// never applied. Each call's blast radius is a single label or issue, so a
/// failure is recorded in its outcome and execution continues. There are no
/// retries and no rollback.
pub async fn apply<T: TrackerOps + ?Sized>(
    plan: &ReconciliationPlan,
    tracker: &T,
) -> Vec<OperationOutcome> {
    let mut outcomes = Vec::new();

    for operation in &plan.operations {
        match operation {
            Operation::Create {
                name,
                color,
                description,
            } => {
                let result = tracker.create_label(name, color, description).await;
                outcomes.push(record(operation.clone(), result));
            }
            Operation::Update {
                name,
                color,
                description,
            } => {
                let result = tracker.edit_label(name, color, description).await;
                outcomes.push(record(operation.clone(), result));
            }
            Operation::Delete { name } => {
                let result = tracker.delete_label(name).await;
                outcomes.push(record(operation.clone(), result));
            }
            Operation::Reassign {
                add_label,
                issue_numbers,
            } => {
                // Each issue call is independent; one outcome per issue.
                for number in issue_numbers {
                    let result = tracker.add_label_to_issue(*number, add_label).await;
                    let op = Operation::Reassign {
                        add_label: add_label.clone(),
                        issue_numbers: vec![*number],
                    };
                    outcomes.push(record(op, result));
                }
            }
        }
    }

    outcomes
}

fn record(
    operation: Operation,
    result: Result<(), crate::github::GitHubError>,
) -> OperationOutcome {
    match result {
        Ok(()) => {
            tracing::info!(operation = %operation.describe(), "applied");
            OperationOutcome::success(operation)
        }
        Err(err) => {
            tracing::warn!(operation = %operation.describe(), error = %err, "operation failed");
            OperationOutcome::failure(operation, err)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::labels::testing::RecordingTracker;

    fn plan(operations: Vec<Operation>) -> ReconciliationPlan {
        ReconciliationPlan {
            operations,
            blocked: false,
            blocked_labels: BTreeSet::new(),
        }
    }

    #[tokio::test]
    async fn operations_run_in_plan_order() {
        let tracker = RecordingTracker::default();
        let plan = plan(vec![
            Operation::Create {
                name: "bug".to_string(),
                color: "d73a4a".to_string(),
                description: "broken".to_string(),
            },
            Operation::Reassign {
                add_label: "new".to_string(),
                issue_numbers: vec![3, 7],
            },
            Operation::Delete {
                name: "old".to_string(),
            },
        ]);

        let outcomes = apply(&plan, &tracker).await;

        assert!(outcomes.iter().all(|o| o.ok));
        assert_eq!(
            tracker.recorded_calls(),
            vec![
                "create bug d73a4a broken",
                "label #3 new",
                "label #7 new",
                "delete old",
            ]
        );
    }

    #[tokio::test]
    async fn a_failed_operation_does_not_stop_the_rest() {
        let tracker = RecordingTracker {
            failing_calls: vec!["delete old".to_string()],
            ..Default::default()
        };
        let plan = plan(vec![
            Operation::Delete {
                name: "old".to_string(),
            },
            Operation::Create {
                name: "bug".to_string(),
                color: "d73a4a".to_string(),
                description: String::new(),
            },
        ]);

        let outcomes = apply(&plan, &tracker).await;

        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].ok);
        assert!(outcomes[0].error.as_deref().unwrap().contains("delete old"));
        assert!(outcomes[1].ok);
        assert_eq!(tracker.recorded_calls().len(), 2);
    }

    #[tokio::test]
    async fn each_reassigned_issue_gets_its_own_outcome() {
        let tracker = RecordingTracker {
            failing_calls: vec!["label #7 new".to_string()],
            ..Default::default()
        };
        let plan = plan(vec![Operation::Reassign {
            add_label: "new".to_string(),
            issue_numbers: vec![3, 7, 11],
        }]);

        let outcomes = apply(&plan, &tracker).await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].ok);
        assert!(!outcomes[1].ok);
        assert!(outcomes[2].ok);
    }

    #[tokio::test]
    async fn update_maps_to_edit_label() {
        let tracker = RecordingTracker::default();
        let plan = plan(vec![Operation::Update {
            name: "docs".to_string(),
            color: "0075ca".to_string(),
            description: "Documentation".to_string(),
        }]);

        let outcomes = apply(&plan, &tracker).await;

        assert!(outcomes[0].ok);
        assert_eq!(
            tracker.recorded_calls(),
            vec!["edit docs 0075ca Documentation"]
        );
    }
}
