use clap::{Parser, Subcommand};

pub mod commands;

#[derive(Parser)]
#[command(name = "gh-steward")]
#[command(about = "Keep GitHub repository labels and issue digests in order")]
#[command(long_about = "gh-steward reconciles a repository's labels against a declarative \
                        settings file (create, update, replace, delete with safety checks) \
                        and produces an open-issue digest grouped by assignee and priority.")]
pub struct Cli {
    /// Path to the runtime config file (probes gh-steward.toml and
    /// .gh-steward-rc when omitted)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,
    /// Repository owner, overriding the config file
    #[arg(long, global = true)]
    pub owner: Option<String>,
    /// Repository name, overriding the config file
    #[arg(long, global = true)]
    pub repo: Option<String>,
    /// GitHub access token, overriding config and environment
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile repository labels against a settings file
    Labels {
        /// Label settings JSON file
        #[arg(long, short = 'f', default_value = "label_settings.json", help = "Desired-state label settings document")]
        file: String,
        /// Apply the computed plan instead of only printing it
        #[arg(long, help = "Execute the plan against GitHub after printing it")]
        apply: bool,
    },
    /// Summarize open issues and pull requests by assignee and priority
    Issues {
        /// Drop issues carrying low-level labels from the digest
        #[arg(long, short = 'e', help = "Except issues attached to low-level labels")]
        except: bool,
        /// Include the per-priority-label breakdown
        #[arg(long, short = 'p', help = "Output the priority list as well")]
        priority: bool,
    },
}
