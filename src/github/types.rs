// src/github/types.rs
// =============================================================================
// Typed mirrors of the GitHub REST API responses we render.
//
// These carry no invariants of their own: each fetch produces a fresh value,
// a page turns it into blocks, and the value is dropped. Only the fields a
// page actually shows are declared; serde ignores the rest.
//
// Fields GitHub documents as nullable are Option<T>.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// GET /users/{login}
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
    pub html_url: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub blog: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub public_repos: u64,
}

/// The short user object embedded in repos and commits
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
}

/// An entry of GET /users/{login}/repos, or GET /repos/{owner}/{repo}
#[derive(Debug, Clone, Deserialize)]
pub struct Repo {
    pub name: String,
    pub full_name: String,
    /// API URL of the repository itself
    pub url: String,
    pub html_url: String,
    pub clone_url: String,
    pub ssh_url: String,
    /// URI template, e.g. "https://api.github.com/repos/o/r/commits{/sha}"
    pub commits_url: String,
    pub languages_url: Option<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub default_branch: String,
    #[serde(default)]
    pub watchers_count: u64,
    pub created_at: DateTime<Utc>,
    pub owner: Account,
}

/// An entry of GET /repos/{owner}/{repo}/commits
#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub html_url: String,
    pub commit: CommitDetail,
    /// null when the commit email isn't linked to a GitHub account
    pub author: Option<Account>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub message: String,
    pub committer: Signature,
    pub author: Option<Signature>,
    pub tree: TreeRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub name: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeRef {
    pub url: String,
}

impl Commit {
    // Who to credit: the linked account, else the name git recorded
    pub fn author_login(&self) -> &str {
        match (&self.author, &self.commit.author) {
            (Some(account), _) => &account.login,
            (None, Some(signature)) => &signature.name,
            (None, None) => "unknown",
        }
    }

    pub fn author_avatar(&self) -> &str {
        self.author.as_ref().map(|a| a.avatar_url.as_str()).unwrap_or("")
    }
}

/// GET /repos/{owner}/{repo}/git/trees/{sha}
#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub tree: Vec<TreeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    /// Name relative to the tree it belongs to
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Submodule entries don't always carry one
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Blob,
    Tree,
    /// A submodule
    Commit,
}

/// GET /repos/{owner}/{repo}/git/blobs/{sha}
#[derive(Debug, Clone, Deserialize)]
pub struct Blob {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: String,
}

/// GET /repos/{owner}/{repo}/contents/{path}
#[derive(Debug, Clone, Deserialize)]
pub struct Contents {
    #[serde(rename = "type")]
    pub kind: String,
    pub download_url: Option<String>,
}

/// GET /repos/{owner}/{repo}/languages: language name -> bytes of code
pub type Languages = HashMap<String, u64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_without_account_uses_git_name() {
        let json = r#"{
            "sha": "abc123",
            "html_url": "https://github.com/o/r/commit/abc123",
            "author": null,
            "commit": {
                "message": "initial",
                "committer": { "name": "Bot", "date": "2024-01-05T10:00:00Z" },
                "author": { "name": "Jane Doe", "date": "2024-01-05T10:00:00Z" },
                "tree": { "url": "https://api.github.com/repos/o/r/git/trees/t1" }
            }
        }"#;
        let commit: Commit = serde_json::from_str(json).unwrap();
        assert_eq!(commit.author_login(), "Jane Doe");
        assert_eq!(commit.author_avatar(), "");
    }

    #[test]
    fn test_tree_entry_kinds() {
        let json = r#"{ "tree": [
            { "path": "src", "type": "tree", "url": "u1" },
            { "path": "README.md", "type": "blob", "url": "u2" },
            { "path": "vendor", "type": "commit" }
        ] }"#;
        let tree: Tree = serde_json::from_str(json).unwrap();
        let kinds: Vec<_> = tree.tree.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EntryKind::Tree, EntryKind::Blob, EntryKind::Commit]);
        assert_eq!(tree.tree[2].url, "");
    }
}
