use anyhow::{bail, Result};

use crate::config::StewardConfig;
use crate::github::{GitHubClient, TrackerOps};
use crate::labels::{apply, reconcile, LabelDirectory, LabelSettings, PlanReport};

/// Compute the reconciliation plan, print it, and optionally execute it.
pub async fn run(conf: &StewardConfig, file: &str, do_apply: bool) -> Result<()> {
    conf.require_repository()?;

    // All configuration errors abort here, before any network call.
    let settings = LabelSettings::load(file)?;
    let directory = LabelDirectory::build(&settings)?;

    let client = GitHubClient::new(&conf.github)?;
    println!(
        "# Label settings for `{}/{}`\n",
        client.owner(),
        client.repo()
    );
    reconcile_and_report(&directory, &client, do_apply).await
}

/// Everything after configuration loading, against the tracker trait so the
/// blocked/apply interaction is testable without a live client.
async fn reconcile_and_report<T: TrackerOps + ?Sized>(
    directory: &LabelDirectory,
    tracker: &T,
    do_apply: bool,
) -> Result<()> {
    // Without a snapshot there is no plan; listing failure is fatal.
    let current = tracker.list_labels().await?;
    let plan = reconcile(directory, &current, tracker).await?;
    let report = PlanReport::build(directory, &current, &plan);
    print!("{report}");

    if plan.blocked {
        println!("⚠️  Deletion blocked: open issues are still attached to:");
        for name in &plan.blocked_labels {
            println!("   → `{name}`");
        }
        println!("   Detach or close those issues, add a replace rule, or add an ignore pattern.");
        if do_apply {
            bail!("refusing to apply: plan is blocked by labels with open issues");
        }
        return Ok(());
    }

    if !do_apply {
        if !plan.is_noop() {
            println!("(dry run: pass --apply to execute these operations)");
        }
        return Ok(());
    }

    if plan.is_noop() {
        println!("✅ Labels already match the settings; nothing to apply");
        return Ok(());
    }

    let outcomes = apply(&plan, tracker).await;
    let mut failed = 0;
    for outcome in &outcomes {
        if outcome.ok {
            println!("✅ {}", outcome.operation.describe());
        } else {
            failed += 1;
            let detail = outcome.error.as_deref().unwrap_or("unknown error");
            println!("❌ {}: {}", outcome.operation.describe(), detail);
        }
    }
    println!(
        "\nApplied {}/{} operations successfully",
        outcomes.len() - failed,
        outcomes.len()
    );
    if failed > 0 {
        bail!("{failed} operation(s) failed; re-run to converge the rest");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::CurrentLabel;
    use crate::labels::settings::DesiredLabel;
    use crate::labels::testing::RecordingTracker;

    fn current(name: &str, color: &str) -> CurrentLabel {
        CurrentLabel {
            name: name.to_string(),
            color: color.to_string(),
            description: None,
        }
    }

    fn directory_with(labels: &[(&str, &str)]) -> LabelDirectory {
        let settings = LabelSettings {
            labels: labels
                .iter()
                .map(|(name, color)| DesiredLabel {
                    name: name.to_string(),
                    color: color.to_string(),
                    desc: String::new(),
                })
                .collect(),
            ..Default::default()
        };
        LabelDirectory::build(&settings).unwrap()
    }

    #[tokio::test]
    async fn blocked_apply_fails_without_mutating_anything() {
        // An unmanaged label with open issues blocks the plan; asking to
        // apply anyway must error out before any tracker mutation.
        let directory = directory_with(&[("bug", "d73a4a")]);
        let mut tracker = RecordingTracker::with_issues(&[("busy", &[9])]);
        tracker.labels = vec![current("busy", "111111")];

        let result = reconcile_and_report(&directory, &tracker, true).await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("blocked"));
        // No create for `bug`, no delete for `busy`; only the issue lookup ran.
        assert!(tracker.recorded_calls().is_empty());
        assert_eq!(tracker.recorded_lookups(), vec!["busy"]);
    }

    #[tokio::test]
    async fn blocked_plan_without_apply_reports_and_exits_cleanly() {
        let directory = directory_with(&[]);
        let mut tracker = RecordingTracker::with_issues(&[("busy", &[9])]);
        tracker.labels = vec![current("busy", "111111")];

        let result = reconcile_and_report(&directory, &tracker, false).await;

        assert!(result.is_ok());
        assert!(tracker.recorded_calls().is_empty());
    }

    #[tokio::test]
    async fn apply_runs_the_plan_through_the_tracker() {
        let directory = directory_with(&[("bug", "d73a4a")]);
        let tracker = RecordingTracker::default();

        let result = reconcile_and_report(&directory, &tracker, true).await;

        assert!(result.is_ok());
        assert_eq!(tracker.recorded_calls(), vec!["create bug d73a4a "]);
    }

    #[tokio::test]
    async fn dry_run_never_touches_the_tracker() {
        let directory = directory_with(&[("bug", "d73a4a")]);
        let tracker = RecordingTracker::default();

        let result = reconcile_and_report(&directory, &tracker, false).await;

        assert!(result.is_ok());
        assert!(tracker.recorded_calls().is_empty());
    }
}
