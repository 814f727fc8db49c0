use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Runtime configuration, layered from defaults, config files and
/// `GH_STEWARD_*` environment variables. The label settings document is
/// separate; this covers the repository to talk to and the issue-report
/// rules.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StewardConfig {
    #[serde(default)]
    pub github: GitHubConfig,
    /// Appended to the issue digest, typically a chat reminder.
    #[serde(default)]
    pub message_to_assignee: Option<String>,
    #[serde(default)]
    pub label_rule: LabelRuleConfig,
    /// GitHub login -> chat display name.
    #[serde(default)]
    pub user_mappings: Vec<UserMapping>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    /// Personal access token; falls back to GITHUB_TOKEN.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub repo: String,
    /// Deadline for each individual API call.
    #[serde(default = "default_api_timeout")]
    pub api_timeout_seconds: u64,
}

fn default_api_timeout() -> u64 {
    30
}

impl Default for GitHubConfig {
    fn default() -> Self {
        GitHubConfig {
            token: None,
            owner: String::new(),
            repo: String::new(),
            api_timeout_seconds: default_api_timeout(),
        }
    }
}

/// Labels that feed the issue digest: `priority` drives the per-priority
/// breakdown, `other` carries auxiliary levels like the except filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelRuleConfig {
    #[serde(default)]
    pub priority: Vec<LabelLevel>,
    #[serde(default)]
    pub other: Vec<LabelLevel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelLevel {
    pub label_name: String,
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserMapping {
    pub github_name: String,
    pub chat_name: String,
}

impl StewardConfig {
    /// Load configuration with precedence: defaults, then `gh-steward.toml`
    /// or `.gh-steward-rc`, then `GH_STEWARD_*` environment variables. An
    /// explicit `--config` path replaces the probed files.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        match config_path {
            Some(path) => {
                if !Path::new(path).exists() {
                    return Err(anyhow!("config file not found ({path})"));
                }
                builder = builder.add_source(File::with_name(path));
            }
            None => {
                if Path::new("gh-steward.toml").exists() {
                    builder = builder.add_source(File::with_name("gh-steward"));
                }
                if Path::new(".gh-steward-rc").exists() {
                    builder = builder
                        .add_source(File::new(".gh-steward-rc", config::FileFormat::Toml));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("GH_STEWARD")
                .separator("_")
                .try_parsing(true),
        );

        let mut conf: StewardConfig = builder.build()?.try_deserialize()?;

        if conf.github.token.is_none() {
            if let Ok(token) = std::env::var("GITHUB_TOKEN") {
                conf.github.token = Some(token);
            }
        }

        conf.validate_user_mappings()?;
        Ok(conf)
    }

    /// Command-line flags win over every other source.
    pub fn apply_overrides(
        &mut self,
        owner: Option<String>,
        repo: Option<String>,
        token: Option<String>,
    ) {
        if let Some(owner) = owner {
            self.github.owner = owner;
        }
        if let Some(repo) = repo {
            self.github.repo = repo;
        }
        if let Some(token) = token {
            self.github.token = Some(token);
        }
    }

    pub fn require_repository(&self) -> Result<()> {
        if self.github.owner.is_empty() {
            return Err(anyhow!("GitHub owner is mandatory (set github.owner or pass --owner)"));
        }
        if self.github.repo.is_empty() {
            return Err(anyhow!("GitHub repo is mandatory (set github.repo or pass --repo)"));
        }
        Ok(())
    }

    fn validate_user_mappings(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for mapping in &self.user_mappings {
            if !seen.insert(mapping.github_name.as_str()) {
                return Err(anyhow!(
                    "duplicate github_name in user_mappings ({})",
                    mapping.github_name
                ));
            }
        }
        Ok(())
    }

    pub fn user_mappings(&self) -> HashMap<String, String> {
        self.user_mappings
            .iter()
            .map(|m| (m.github_name.clone(), m.chat_name.clone()))
            .collect()
    }

    /// Label names carrying `level`, from both rule lists, in config order.
    pub fn labels_for_level(&self, level: &str) -> Vec<String> {
        self.label_rule
            .priority
            .iter()
            .chain(self.label_rule.other.iter())
            .filter(|rule| rule.level == level)
            .map(|rule| rule.label_name.clone())
            .collect()
    }

    pub fn priority_labels(&self) -> Vec<String> {
        self.label_rule
            .priority
            .iter()
            .map(|rule| rule.label_name.clone())
            .collect()
    }

    /// Load .env file if it exists
    pub fn load_env_file() {
        if Path::new(".env").exists() && dotenvy::dotenv().is_ok() {
            tracing::info!("Loaded environment variables from .env file");
        }
    }
}
