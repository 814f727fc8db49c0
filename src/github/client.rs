use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use octocrab::models::issues::Issue;
use octocrab::models::Label;
use octocrab::Octocrab;

use super::errors::GitHubError;
use super::types::{CurrentLabel, IssueRecord};
use crate::config::GitHubConfig;

/// Tracker operations the reconciliation core depends on.
///
/// Implemented by `GitHubClient` for real runs and by recording mocks in
/// tests. Each method is a single remote capability that can fail; retry
/// policy, if any, belongs behind this trait, never in the callers.
#[async_trait]
pub trait TrackerOps {
    async fn list_labels(&self) -> Result<Vec<CurrentLabel>, GitHubError>;
    /// Numbers of all open issues carrying `label`. Pages internally and
    /// returns the complete, flattened set.
    async fn issue_numbers_for_label(&self, label: &str) -> Result<Vec<u64>, GitHubError>;
    async fn create_label(
        &self,
        name: &str,
        color: &str,
        description: &str,
    ) -> Result<(), GitHubError>;
    async fn edit_label(
        &self,
        name: &str,
        color: &str,
        description: &str,
    ) -> Result<(), GitHubError>;
    async fn delete_label(&self, name: &str) -> Result<(), GitHubError>;
    async fn add_label_to_issue(&self, issue_number: u64, label: &str) -> Result<(), GitHubError>;
}

#[derive(Debug)]
pub struct GitHubClient {
    octocrab: Octocrab,
    owner: String,
    repo: String,
    call_timeout: Duration,
}

impl GitHubClient {
    pub fn new(conf: &GitHubConfig) -> Result<Self, GitHubError> {
        if conf.owner.is_empty() || conf.repo.is_empty() {
            return Err(GitHubError::ConfigNotFound(
                "GitHub owner and repo must be configured".to_string(),
            ));
        }

        let token = conf.token.clone().filter(|t| !t.is_empty()).ok_or_else(|| {
            GitHubError::TokenNotFound(
                "GitHub token not found. Set GITHUB_TOKEN or GH_STEWARD_GITHUB_TOKEN.".to_string(),
            )
        })?;

        let octocrab = Octocrab::builder().personal_token(token).build()?;

        Ok(GitHubClient {
            octocrab,
            owner: conf.owner.clone(),
            repo: conf.repo.clone(),
            call_timeout: Duration::from_secs(conf.api_timeout_seconds),
        })
    }

    /// Build a client around an existing Octocrab instance. Used by tests to
    /// point the client at a mock server.
    pub fn from_octocrab(
        octocrab: Octocrab,
        owner: impl Into<String>,
        repo: impl Into<String>,
        call_timeout: Duration,
    ) -> Self {
        GitHubClient {
            octocrab,
            owner: owner.into(),
            repo: repo.into(),
            call_timeout,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Run one remote call under the configured deadline so a stalled
    /// connection cannot hang the whole reconciliation.
    async fn bounded<T, F>(&self, operation: &str, fut: F) -> Result<T, GitHubError>
    where
        F: Future<Output = octocrab::Result<T>>,
    {
        match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(result) => result.map_err(GitHubError::ApiError),
            Err(_) => Err(GitHubError::Timeout {
                operation: operation.to_string(),
                duration_ms: self.call_timeout.as_millis() as u64,
            }),
        }
    }

    /// Fetch every open issue in the repository, following pagination.
    pub async fn fetch_open_issues(&self) -> Result<Vec<IssueRecord>, GitHubError> {
        let mut page = self
            .bounded(
                "list issues",
                self.octocrab
                    .issues(&self.owner, &self.repo)
                    .list()
                    .state(octocrab::params::State::Open)
                    .per_page(100)
                    .send(),
            )
            .await?;

        let mut issues: Vec<IssueRecord> = page.take_items().iter().map(issue_record).collect();
        while let Some(next) = self
            .bounded(
                "list issues",
                self.octocrab.get_page::<Issue>(&page.next),
            )
            .await?
        {
            page = next;
            issues.extend(page.take_items().iter().map(issue_record));
        }

        tracing::debug!(count = issues.len(), "fetched open issues");
        Ok(issues)
    }
}

fn issue_record(issue: &Issue) -> IssueRecord {
    IssueRecord {
        number: issue.number,
        title: issue.title.clone(),
        labels: issue.labels.iter().map(|l| l.name.clone()).collect(),
        assignees: issue.assignees.iter().map(|a| a.login.clone()).collect(),
    }
}

#[async_trait]
impl TrackerOps for GitHubClient {
    async fn list_labels(&self) -> Result<Vec<CurrentLabel>, GitHubError> {
        let mut page = self
            .bounded(
                "list labels",
                self.octocrab
                    .issues(&self.owner, &self.repo)
                    .list_labels_for_repo()
                    .per_page(100)
                    .send(),
            )
            .await?;

        let mut labels = page.take_items();
        while let Some(next) = self
            .bounded(
                "list labels",
                self.octocrab.get_page::<Label>(&page.next),
            )
            .await?
        {
            page = next;
            labels.extend(page.take_items());
        }

        Ok(labels
            .into_iter()
            .map(|l| CurrentLabel {
                name: l.name,
                color: l.color,
                description: l.description,
            })
            .collect())
    }

    async fn issue_numbers_for_label(&self, label: &str) -> Result<Vec<u64>, GitHubError> {
        let wanted = [label.to_string()];
        let mut page = self
            .bounded(
                "list issues by label",
                self.octocrab
                    .issues(&self.owner, &self.repo)
                    .list()
                    .state(octocrab::params::State::Open)
                    .labels(&wanted)
                    .per_page(100)
                    .send(),
            )
            .await?;

        let mut numbers: Vec<u64> = page.take_items().iter().map(|i| i.number).collect();
        while let Some(next) = self
            .bounded(
                "list issues by label",
                self.octocrab.get_page::<Issue>(&page.next),
            )
            .await?
        {
            page = next;
            numbers.extend(page.take_items().iter().map(|i| i.number));
        }

        tracing::debug!(label, count = numbers.len(), "fetched attached issues");
        Ok(numbers)
    }

    async fn create_label(
        &self,
        name: &str,
        color: &str,
        description: &str,
    ) -> Result<(), GitHubError> {
        self.bounded(
            "create label",
            self.octocrab
                .issues(&self.owner, &self.repo)
                .create_label(name, color, description),
        )
        .await?;
        Ok(())
    }

    async fn edit_label(
        &self,
        name: &str,
        color: &str,
        description: &str,
    ) -> Result<(), GitHubError> {
        // octocrab's issue handler has no typed label-update call, so hit the
        // endpoint directly instead of delete+create, which would detach the
        // label from every issue carrying it.
        let route = format!("/repos/{}/{}/labels/{}", self.owner, self.repo, name);
        let body = serde_json::json!({
            "new_name": name,
            "color": color,
            "description": description,
        });
        self.bounded(
            "edit label",
            self.octocrab.patch::<Label, _, _>(route, Some(&body)),
        )
        .await?;
        Ok(())
    }

    async fn delete_label(&self, name: &str) -> Result<(), GitHubError> {
        self.bounded(
            "delete label",
            self.octocrab
                .issues(&self.owner, &self.repo)
                .delete_label(name),
        )
        .await?;
        Ok(())
    }

    async fn add_label_to_issue(&self, issue_number: u64, label: &str) -> Result<(), GitHubError> {
        self.bounded(
            "add label to issue",
            self.octocrab
                .issues(&self.owner, &self.repo)
                .add_labels(issue_number, &[label.to_string()]),
        )
        .await?;
        Ok(())
    }
}
