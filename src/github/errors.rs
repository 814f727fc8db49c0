use octocrab::Error as OctocrabError;

#[derive(Debug)]
pub enum GitHubError {
    TokenNotFound(String),
    ConfigNotFound(String),
    ApiError(OctocrabError),
    IoError(std::io::Error),
    Timeout { operation: String, duration_ms: u64 },
}

impl From<OctocrabError> for GitHubError {
    fn from(err: OctocrabError) -> Self {
        GitHubError::ApiError(err)
    }
}

impl From<std::io::Error> for GitHubError {
    fn from(err: std::io::Error) -> Self {
        GitHubError::IoError(err)
    }
}

impl std::fmt::Display for GitHubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitHubError::TokenNotFound(msg) => {
                writeln!(f, "GitHub Authentication Error")?;
                writeln!(f, "──────────────────────────")?;
                write!(f, "🔑 {msg}\n\n")?;
                writeln!(f, "🔧 QUICK FIXES:")?;
                writeln!(f, "   → Use GitHub CLI: gh auth login")?;
                writeln!(
                    f,
                    "   → Set token directly: export GH_STEWARD_GITHUB_TOKEN=your_token"
                )?;
                writeln!(
                    f,
                    "   → Create token at: https://github.com/settings/tokens"
                )?;
                write!(
                    f,
                    "     (needs 'repo' scope for private repos, 'public_repo' for public)"
                )
            }
            GitHubError::ConfigNotFound(msg) => {
                writeln!(f, "GitHub Configuration Error")?;
                writeln!(f, "─────────────────────────")?;
                write!(f, "📂 {msg}\n\n")?;
                writeln!(f, "🔧 QUICK FIXES:")?;
                writeln!(
                    f,
                    "   → Set environment variables: export GH_STEWARD_GITHUB_OWNER=username GH_STEWARD_GITHUB_REPO=reponame"
                )?;
                write!(f, "   → Or pass --owner and --repo on the command line")
            }
            GitHubError::ApiError(octocrab_err) => {
                writeln!(f, "GitHub API Error")?;
                writeln!(f, "────────────────")?;
                write!(f, "🌐 {octocrab_err}\n\n")?;
                writeln!(f, "🔧 TROUBLESHOOTING:")?;
                writeln!(f, "   → Check authentication: gh auth status")?;
                writeln!(f, "   → Verify repository access: gh repo view")?;
                write!(f, "   → Check rate limits: gh api rate_limit")
            }
            GitHubError::IoError(io_err) => {
                writeln!(f, "File System Error")?;
                writeln!(f, "─────────────────")?;
                write!(f, "📁 {io_err}")
            }
            GitHubError::Timeout {
                operation,
                duration_ms,
            } => {
                writeln!(f, "GitHub Operation Timeout")?;
                writeln!(f, "────────────────────────")?;
                write!(
                    f,
                    "⏰ Operation '{operation}' timed out after {duration_ms}ms\n\n"
                )?;
                writeln!(f, "🔧 RECOMMENDED ACTIONS:")?;
                writeln!(f, "   → Check network connectivity")?;
                write!(f, "   → Check GitHub status: https://status.github.com")
            }
        }
    }
}

impl std::error::Error for GitHubError {}
