use std::collections::HashMap;
use std::fmt;

use super::diff::{Operation, ReconciliationPlan};
use super::directory::{Classification, LabelDirectory};
use crate::github::CurrentLabel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEntry {
    pub name: String,
    pub old_color: Option<String>,
    pub color: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceEntry {
    pub from: String,
    pub to: String,
    pub issue_numbers: Vec<u64>,
}

/// Structured view of a plan for the CLI to render: what will be created and
/// updated, which labels get replaced (and which issues move), what the
/// ignore patterns matched, and the delete list split into safe and blocked.
#[derive(Debug, Clone, Default)]
pub struct PlanReport {
    pub creates: Vec<(String, String, String)>,
    pub updates: Vec<UpdateEntry>,
    pub replaces: Vec<ReplaceEntry>,
    /// Replace rules whose `from` label does not exist in the repository.
    pub missing_replace_sources: Vec<(String, String)>,
    /// Unmanaged labels exempted from deletion, with the pattern that hit.
    pub ignored: Vec<(String, String)>,
    pub unused_ignore_patterns: Vec<String>,
    pub safe_deletes: Vec<String>,
    pub blocked: Vec<String>,
}

impl PlanReport {
    pub fn build(
        directory: &LabelDirectory,
        current: &[CurrentLabel],
        plan: &ReconciliationPlan,
    ) -> Self {
        let current_by_name: HashMap<&str, &CurrentLabel> =
            current.iter().map(|l| (l.name.as_str(), l)).collect();

        let mut report = PlanReport::default();

        // A Reassign always immediately precedes the Delete of its replace
        // source, so carrying the last one along is enough to pair them.
        let mut pending_reassign: Option<(String, Vec<u64>)> = None;
        for operation in &plan.operations {
            match operation {
                Operation::Create {
                    name,
                    color,
                    description,
                } => report
                    .creates
                    .push((name.clone(), color.clone(), description.clone())),
                Operation::Update {
                    name,
                    color,
                    description,
                } => report.updates.push(UpdateEntry {
                    name: name.clone(),
                    old_color: current_by_name.get(name.as_str()).map(|l| l.color.clone()),
                    color: color.clone(),
                    description: description.clone(),
                }),
                Operation::Reassign {
                    add_label,
                    issue_numbers,
                } => pending_reassign = Some((add_label.clone(), issue_numbers.clone())),
                Operation::Delete { name } => match directory.classify(name) {
                    Some(Classification::ReplaceSource { to }) => {
                        let issue_numbers = match pending_reassign.take() {
                            Some((_, numbers)) => numbers,
                            None => Vec::new(),
                        };
                        report.replaces.push(ReplaceEntry {
                            from: name.clone(),
                            to: to.clone(),
                            issue_numbers,
                        });
                    }
                    _ => report.safe_deletes.push(name.clone()),
                },
            }
        }

        for (from, to) in directory.replace_sources() {
            if !current_by_name.contains_key(from) {
                report
                    .missing_replace_sources
                    .push((from.to_string(), to.to_string()));
            }
        }

        let mut matched_patterns: Vec<&str> = Vec::new();
        let mut ignored: Vec<(String, String)> = current
            .iter()
            .filter(|l| directory.classify(&l.name).is_none())
            .filter_map(|l| {
                directory
                    .matches_ignore(&l.name)
                    .map(|pattern| (l.name.clone(), pattern.to_string()))
            })
            .collect();
        ignored.sort();
        for (_, pattern) in &ignored {
            if !matched_patterns.contains(&pattern.as_str()) {
                matched_patterns.push(pattern.as_str());
            }
        }
        report.unused_ignore_patterns = directory
            .ignore_patterns()
            .filter(|p| !matched_patterns.contains(p))
            .map(|p| p.to_string())
            .collect();
        report.ignored = ignored;

        report.blocked = plan.blocked_labels.iter().cloned().collect();
        report
    }

    pub fn is_empty(&self) -> bool {
        self.creates.is_empty()
            && self.updates.is_empty()
            && self.replaces.is_empty()
            && self.missing_replace_sources.is_empty()
            && self.ignored.is_empty()
            && self.unused_ignore_patterns.is_empty()
            && self.safe_deletes.is_empty()
            && self.blocked.is_empty()
    }
}

fn join_numbers(numbers: &[u64]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for PlanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "  nothing to do; labels already match the settings");
        }

        if !self.creates.is_empty() || !self.updates.is_empty() {
            writeln!(f, "  * label settings")?;
            for (name, color, desc) in &self.creates {
                writeln!(f, "    `{name}`: create (color=\"{color}\", desc=\"{desc}\")")?;
            }
            for update in &self.updates {
                let old = update.old_color.as_deref().unwrap_or("?");
                writeln!(
                    f,
                    "    `{}`: update (color=\"{}\" -> \"{}\", desc=\"{}\")",
                    update.name, old, update.color, update.description
                )?;
            }
            writeln!(f)?;
        }

        if !self.replaces.is_empty() || !self.missing_replace_sources.is_empty() {
            writeln!(f, "  * replace labels")?;
            for entry in &self.replaces {
                if entry.issue_numbers.is_empty() {
                    writeln!(f, "    `{}`: replace to `{}`", entry.from, entry.to)?;
                } else {
                    writeln!(
                        f,
                        "    `{}`: replace to `{}` (moving issues: {})",
                        entry.from,
                        entry.to,
                        join_numbers(&entry.issue_numbers)
                    )?;
                }
            }
            for (from, _) in &self.missing_replace_sources {
                writeln!(f, "    `{from}`: don't exist in this repository")?;
            }
            writeln!(f)?;
        }

        if !self.ignored.is_empty() || !self.unused_ignore_patterns.is_empty() {
            writeln!(f, "  * ignore labels")?;
            for (name, pattern) in &self.ignored {
                writeln!(f, "    `{name}` (matched `{pattern}`)")?;
            }
            for pattern in &self.unused_ignore_patterns {
                writeln!(f, "    `{pattern}`: don't exist in this repository")?;
            }
            writeln!(f)?;
        }

        if !self.safe_deletes.is_empty() || !self.blocked.is_empty() {
            writeln!(f, "  * delete labels")?;
            for name in &self.safe_deletes {
                writeln!(f, "    `{name}`")?;
            }
            for name in &self.blocked {
                writeln!(f, "    `{name}`: blocked, open issues still attached")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
