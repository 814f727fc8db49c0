//! Open-issue summary report: tally open issues by assignee and priority
//! label and render a short standup-style digest.

use std::collections::HashMap;

use crate::github::IssueRecord;

pub const NO_ASSIGNEES: &str = "(No Assignees)";
pub const NO_PRIORITY: &str = "(No Priority Labels)";

#[derive(Debug, Default)]
pub struct IssueSummary {
    pub total: usize,
    pub excepted: usize,
    /// Issues carrying a high-urgency label, ascending by number.
    pub urgent: Vec<u64>,
    /// Assignees ranked by open-issue count, busiest first.
    pub assignee_ranking: Vec<String>,
    pub assignee_issues: HashMap<String, Vec<u64>>,
    pub issue_assignees: HashMap<u64, Vec<String>>,
    /// Issue numbers per priority label, plus the `NO_PRIORITY` bucket.
    /// Empty when no priority labels were requested.
    pub priority_issues: HashMap<String, Vec<u64>>,
}

impl IssueSummary {
    pub fn build(
        issues: &[IssueRecord],
        high_labels: &[String],
        except_labels: &[String],
        priority_labels: &[String],
    ) -> Self {
        let mut summary = IssueSummary {
            total: issues.len(),
            ..Default::default()
        };

        for issue in issues {
            if issue.labels.iter().any(|l| except_labels.contains(l)) {
                summary.excepted += 1;
                continue;
            }

            summary
                .issue_assignees
                .insert(issue.number, issue.assignees.clone());
            if issue.assignees.is_empty() {
                summary
                    .assignee_issues
                    .entry(NO_ASSIGNEES.to_string())
                    .or_default()
                    .push(issue.number);
            } else {
                for assignee in &issue.assignees {
                    let bucket = summary
                        .assignee_issues
                        .entry(assignee.clone())
                        .or_default();
                    if bucket.is_empty() {
                        summary.assignee_ranking.push(assignee.clone());
                    }
                    bucket.push(issue.number);
                }
            }

            if !priority_labels.is_empty() {
                let mut classified = false;
                for label in &issue.labels {
                    if priority_labels.contains(label) {
                        summary
                            .priority_issues
                            .entry(label.clone())
                            .or_default()
                            .push(issue.number);
                        classified = true;
                    }
                }
                if !classified {
                    summary
                        .priority_issues
                        .entry(NO_PRIORITY.to_string())
                        .or_default()
                        .push(issue.number);
                }
            }

            if issue.labels.iter().any(|l| high_labels.contains(l)) {
                summary.urgent.push(issue.number);
            }
        }

        summary.urgent.sort_unstable();
        let counts = summary.assignee_issues.clone();
        summary
            .assignee_ranking
            .sort_by(|a, b| counts[b].len().cmp(&counts[a].len()));

        summary
    }

    pub fn task_count(&self) -> usize {
        self.total - self.excepted
    }
}

fn display_name<'a>(mappings: &'a HashMap<String, String>, login: &'a str) -> &'a str {
    mappings.get(login).map(String::as_str).unwrap_or(login)
}

fn join_numbers(numbers: &[u64]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the digest the way it gets posted to chat: header, counts, per
/// assignee workload, optional per priority breakdown, then a mention line.
pub fn render(
    summary: &IssueSummary,
    owner: &str,
    repo: &str,
    message: Option<&str>,
    except_labels: &[String],
    priority_labels: &[String],
    mappings: &HashMap<String, String>,
) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let _ = writeln!(out, "# Issue & PR List for `{owner}/{repo}`");
    let _ = writeln!(out, "\ttask count: {}", summary.task_count());
    let urgent = if summary.urgent.is_empty() {
        "-".to_string()
    } else {
        join_numbers(&summary.urgent)
    };
    let _ = writeln!(out, "\turgent: {urgent}");
    if !except_labels.is_empty() {
        let quoted: Vec<String> = except_labels.iter().map(|l| format!("`{l}`")).collect();
        let _ = writeln!(out, "\texcepted labels: {}", quoted.join(", "));
    }

    let _ = writeln!(out, "\n*Assignee List*\n```");
    for assignee in &summary.assignee_ranking {
        let issues = &summary.assignee_issues[assignee];
        let _ = writeln!(
            out,
            "- {} ({}): {}",
            display_name(mappings, assignee),
            issues.len(),
            join_numbers(issues)
        );
    }
    if let Some(issues) = summary.assignee_issues.get(NO_ASSIGNEES) {
        let _ = writeln!(out, "- {} ({}): {}", NO_ASSIGNEES, issues.len(), join_numbers(issues));
    }
    let _ = writeln!(out, "```");

    if !priority_labels.is_empty() {
        let _ = writeln!(out, "\n*Priority List*\n```");
        for label in priority_labels {
            if let Some(issues) = summary.priority_issues.get(label) {
                let _ = writeln!(out, "- {label}");
                for number in issues {
                    let assignees = summary
                        .issue_assignees
                        .get(number)
                        .filter(|a| !a.is_empty())
                        .map(|a| {
                            a.iter()
                                .map(|login| display_name(mappings, login).to_string())
                                .collect::<Vec<_>>()
                                .join(", ")
                        })
                        .unwrap_or_else(|| NO_ASSIGNEES.to_string());
                    let _ = writeln!(out, "  - {number}: {assignees}");
                }
            }
        }
        if let Some(issues) = summary.priority_issues.get(NO_PRIORITY) {
            let _ = writeln!(out, "- {NO_PRIORITY}");
            for number in issues {
                let _ = writeln!(out, "  - {number}");
            }
        }
        let _ = writeln!(out, "```");
    }

    let mentions: Vec<String> = summary
        .assignee_ranking
        .iter()
        .map(|login| format!("@{}", display_name(mappings, login)))
        .collect();
    if !mentions.is_empty() {
        let _ = writeln!(out, "\n{}", mentions.join(", "));
    }
    if let Some(message) = message {
        let _ = writeln!(out, "{message}");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(number: u64, labels: &[&str], assignees: &[&str]) -> IssueRecord {
        IssueRecord {
            number,
            title: format!("issue {number}"),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            assignees: assignees.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn strs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn ranks_assignees_by_open_issue_count() {
        let issues = [
            issue(1, &[], &["alice"]),
            issue(2, &[], &["bob"]),
            issue(3, &[], &["bob"]),
            issue(4, &[], &[]),
        ];
        let summary = IssueSummary::build(&issues, &[], &[], &[]);

        assert_eq!(summary.assignee_ranking, vec!["bob", "alice"]);
        assert_eq!(summary.assignee_issues["bob"], vec![2, 3]);
        assert_eq!(summary.assignee_issues[NO_ASSIGNEES], vec![4]);
        assert_eq!(summary.task_count(), 4);
    }

    #[test]
    fn excepted_labels_drop_issues_from_the_count() {
        let issues = [
            issue(1, &["chore"], &["alice"]),
            issue(2, &[], &["alice"]),
        ];
        let summary = IssueSummary::build(&issues, &[], &strs(&["chore"]), &[]);

        assert_eq!(summary.task_count(), 1);
        assert_eq!(summary.excepted, 1);
        assert_eq!(summary.assignee_issues["alice"], vec![2]);
    }

    #[test]
    fn urgent_issues_are_collected_and_sorted() {
        let issues = [
            issue(9, &["P1"], &[]),
            issue(2, &["P1"], &[]),
            issue(5, &["P3"], &[]),
        ];
        let summary = IssueSummary::build(&issues, &strs(&["P1"]), &[], &[]);

        assert_eq!(summary.urgent, vec![2, 9]);
    }

    #[test]
    fn priority_buckets_include_the_unlabeled_bucket() {
        let issues = [
            issue(1, &["P1"], &[]),
            issue(2, &["P2"], &[]),
            issue(3, &[], &[]),
        ];
        let summary = IssueSummary::build(&issues, &[], &[], &strs(&["P1", "P2"]));

        assert_eq!(summary.priority_issues["P1"], vec![1]);
        assert_eq!(summary.priority_issues["P2"], vec![2]);
        assert_eq!(summary.priority_issues[NO_PRIORITY], vec![3]);
    }

    #[test]
    fn render_uses_mapped_names_and_message() {
        let issues = [issue(1, &[], &["alice"])];
        let summary = IssueSummary::build(&issues, &[], &[], &[]);
        let mappings: HashMap<String, String> =
            [("alice".to_string(), "alice.w".to_string())].into();

        let text = render(
            &summary,
            "acme",
            "widgets",
            Some("please update your tickets"),
            &[],
            &[],
            &mappings,
        );

        assert!(text.contains("# Issue & PR List for `acme/widgets`"));
        assert!(text.contains("- alice.w (1): 1"));
        assert!(text.contains("@alice.w"));
        assert!(text.contains("please update your tickets"));
    }
}
