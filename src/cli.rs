// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every subcommand names a page. Commands::route() turns the arguments into
// the Route that page is opened with, so `gh-glance repo o/r` and
// `gh-glance open 'repo?url=...&repoName=o/r'` end up in the same place.
//
// Global flags apply to every page:
// - --interactive: keep the page open and read commands from stdin
// - --action N: activate [N] before printing (repeatable, in order)
// - --api-url / --per-page: override the config file
// =============================================================================

use crate::github::{Fetcher, RepoName};
use crate::route::Route;
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "gh-glance",
    version,
    about = "Browse GitHub profiles, repositories, commits and files from the terminal",
    long_about = "gh-glance renders GitHub pages as plain terminal documents. \
                  Interactive items are numbered; activate them with --action N, \
                  or run with --interactive and type the number."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Keep the page open and read commands from stdin
    #[arg(short, long, global = true)]
    pub interactive: bool,

    /// Activate the numbered item before printing (repeatable)
    #[arg(long = "action", value_name = "N", global = true)]
    pub actions: Vec<usize>,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GH_GLANCE_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Repositories per profile page (1-100)
    #[arg(long, env = "GH_GLANCE_PER_PAGE", global = true)]
    pub per_page: Option<u32>,

    /// Disable colours
    #[arg(long, global = true)]
    pub no_color: bool,

    /// More logging on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a user's profile and repositories
    ///
    /// Example: gh-glance profile octocat --pages 2
    Profile {
        /// GitHub login; without it the empty search form is shown
        username: Option<String>,

        /// How many pages of repositories to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Show a repository with its file tree
    ///
    /// Example: gh-glance repo rust-lang/rust
    Repo {
        /// owner/name, a github.com URL, or an API URL (.../repos/owner/name)
        repo: String,

        /// Show the tree of this commit tree URL instead of the default branch
        #[arg(long)]
        tree_url: Option<String>,

        /// Commit sha shown next to the owner
        #[arg(long)]
        sha: Option<String>,
    },

    /// Show the commit history of a repository
    Commits {
        /// owner/name or a github.com URL
        repo: String,
    },

    /// Show one file of a repository
    ///
    /// Example: gh-glance blob octocat/hello-world README
    Blob {
        /// owner/name or a github.com URL
        repo: String,

        /// Path of the file inside the repository
        path: String,

        /// Blob API URL; defaults to the contents API for the path
        #[arg(long)]
        url: Option<String>,
    },

    /// Open a route printed by an earlier run, e.g. 'repo?url=...&repoName=...'
    Open { route: String },
}

impl Commands {
    pub fn route(&self, fetcher: &Fetcher) -> Result<Route> {
        let route = match self {
            Commands::Profile { username, .. } => Route::Profile {
                username: username.clone(),
            },
            Commands::Repo {
                repo,
                tree_url,
                sha,
            } => {
                let (url, repo_name) = match api_repo_name(repo) {
                    Some(name) => (repo.clone(), name),
                    None => {
                        let name = RepoName::parse(repo)?.full_name();
                        (fetcher.repo_url(&name), name)
                    }
                };
                Route::Repo {
                    url,
                    repo_name,
                    tree_url: tree_url.clone(),
                    sha: sha.clone(),
                }
            }
            Commands::Commits { repo } => {
                let name = RepoName::parse(repo)?.full_name();
                Route::Commits {
                    url: fetcher.commits_url(&name),
                    repo_url: fetcher.repo_url(&name),
                    repo_name: name,
                }
            }
            Commands::Blob { repo, path, url } => {
                let name = RepoName::parse(repo)?.full_name();
                let path = path.trim_matches('/').to_string();
                Route::Blob {
                    url: url
                        .clone()
                        .unwrap_or_else(|| fetcher.contents_url(&name, &path)),
                    repo_url: fetcher.repo_url(&name),
                    file_name: path,
                    repo_name: name,
                    tree_url: None,
                }
            }
            Commands::Open { route } => {
                Route::parse(route).with_context(|| format!("invalid route '{}'", route))?
            }
        };
        Ok(route)
    }

    // Extra repository pages to load after the first one
    pub fn extra_pages(&self) -> u32 {
        match self {
            Commands::Profile { pages, .. } => pages.saturating_sub(1),
            _ => 0,
        }
    }
}

// "owner/name" out of an API URL like https://api.github.com/repos/owner/name
fn api_repo_name(input: &str) -> Option<String> {
    let (_, rest) = input.split_once("/repos/")?;
    let mut parts = rest.trim_end_matches('/').split('/');
    let owner = parts.next().filter(|s| !s.is_empty())?;
    let name = parts.next().filter(|s| !s.is_empty())?;
    Some(format!("{}/{}", owner, name))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does `global = true` do?
//    - The flag can be given before or after the subcommand
//    - `gh-glance -i repo o/r` and `gh-glance repo o/r -i` are the same
//
// 2. What is ArgAction::Count?
//    - Counts how often a flag appears: -v = 1, -vv = 2
//
// 3. Why `env = "..."`?
//    - clap reads the environment variable when the flag is missing
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use clap::CommandFactory;

    fn fetcher() -> Fetcher {
        Fetcher::new(&Config::default()).unwrap()
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gh-glance").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["profile", "octocat", "--action", "3", "--action", "1", "-vv"]);
        assert_eq!(cli.actions, vec![3, 1]);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.interactive);
    }

    #[test]
    fn test_repo_from_owner_name() {
        let cli = parse(&["repo", "https://github.com/octocat/hello-world.git"]);
        let route = cli.command.route(&fetcher()).unwrap();
        assert_eq!(
            route,
            Route::Repo {
                url: "https://api.github.com/repos/octocat/hello-world".to_string(),
                repo_name: "octocat/hello-world".to_string(),
                tree_url: None,
                sha: None,
            }
        );
    }

    #[test]
    fn test_repo_from_api_url() {
        let cli = parse(&["repo", "https://ghe.example.com/api/v3/repos/o/r"]);
        match cli.command.route(&fetcher()).unwrap() {
            Route::Repo { url, repo_name, .. } => {
                assert_eq!(url, "https://ghe.example.com/api/v3/repos/o/r");
                assert_eq!(repo_name, "o/r");
            }
            other => panic!("expected repo route, got {:?}", other),
        }
    }

    #[test]
    fn test_blob_defaults_to_contents_api() {
        let cli = parse(&["blob", "o/r", "/docs/guide.md"]);
        match cli.command.route(&fetcher()).unwrap() {
            Route::Blob { url, file_name, .. } => {
                assert_eq!(url, "https://api.github.com/repos/o/r/contents/docs/guide.md");
                assert_eq!(file_name, "docs/guide.md");
            }
            other => panic!("expected blob route, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_pages() {
        assert_eq!(parse(&["profile", "octocat", "--pages", "3"]).command.extra_pages(), 2);
        assert_eq!(parse(&["profile", "--pages", "0"]).command.extra_pages(), 0);
        assert_eq!(parse(&["commits", "o/r"]).command.extra_pages(), 0);
    }

    #[test]
    fn test_bad_route_is_an_error() {
        let cli = parse(&["open", "settings?x=1"]);
        assert!(cli.command.route(&fetcher()).is_err());
    }
}
