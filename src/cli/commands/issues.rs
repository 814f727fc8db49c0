use anyhow::Result;

use crate::config::StewardConfig;
use crate::github::GitHubClient;
use crate::issues::{render, IssueSummary};

/// Fetch open issues and print the assignee/priority digest.
pub async fn run(conf: &StewardConfig, except: bool, priority: bool) -> Result<()> {
    conf.require_repository()?;

    let client = GitHubClient::new(&conf.github)?;
    let issues = client.fetch_open_issues().await?;

    let high_labels = conf.labels_for_level("High");
    let except_labels = if except {
        conf.labels_for_level("Low")
    } else {
        Vec::new()
    };
    let priority_labels = if priority {
        conf.priority_labels()
    } else {
        Vec::new()
    };

    let summary = IssueSummary::build(&issues, &high_labels, &except_labels, &priority_labels);
    print!(
        "{}",
        render(
            &summary,
            client.owner(),
            client.repo(),
            conf.message_to_assignee.as_deref(),
            &except_labels,
            &priority_labels,
            &conf.user_mappings(),
        )
    );
    Ok(())
}
