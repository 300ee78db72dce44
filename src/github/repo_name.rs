// src/github/repo_name.rs
// =============================================================================
// Parsing "owner/name" repository references from the command line.
//
// Supported formats:
//   - owner/repo
//   - https://github.com/owner/repo
//   - https://github.com/owner/repo.git
//   - github.com/owner/repo/tree/main/... (anything after the repo is ignored)
// =============================================================================

use anyhow::{anyhow, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoName {
    pub owner: String,
    pub repo: String,
}

impl RepoName {
    // Example:
    //   "https://github.com/rust-lang/rust" -> RepoName { "rust-lang", "rust" }
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("www.");

        let path = if let Some(rest) = trimmed.strip_prefix("github.com/") {
            rest
        } else if trimmed.contains("://") || trimmed.starts_with("github.com") {
            return Err(anyhow!("Not a GitHub URL: {}", input));
        } else if trimmed.contains('.') && trimmed.split('/').count() > 2 {
            // e.g. "gitlab.com/user/repo"
            return Err(anyhow!("Not a GitHub URL: {}", input));
        } else {
            trimmed
        };

        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        if parts.len() < 2 {
            return Err(anyhow!(
                "Invalid repository '{}': expected owner/name",
                input
            ));
        }

        let owner = parts[0].to_string();
        let repo = parts[1].trim_end_matches(".git").to_string();

        Ok(Self { owner, repo })
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
