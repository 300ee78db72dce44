// src/pages/mod.rs
// =============================================================================
// Page controllers.
//
// Each page:
// 1. takes its context from a Route (what the old query string carried)
// 2. fetches what it needs from the API
// 3. builds blocks into its Document
// 4. reacts to the few actions that change it in place (folder toggles,
//    loading more repositories, a new username)
//
// Pages:
// - profile: user profile + paginated repository list (the home page)
// - repo: one repository with its languages and lazily expanded file tree
// - commits: commit history grouped by day
// - blob: one file rendered as code, image or video
//
// Copy buttons, links and navigation work the same on every page, so they
// are handled here in activate() instead of by each page.
// =============================================================================

pub mod blob;
pub mod commits;
pub mod profile;
pub mod repo;
mod tree;

use crate::config::Config;
use crate::github::types::{Languages, Repo};
use crate::github::{FetchError, Fetcher};
use crate::route::Route;
use crate::view::{Action, Clipboard, Document, SystemClipboard};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

// What every page needs access to
pub struct Session {
    pub fetcher: Fetcher,
    pub config: Config,
    pub clipboard: Arc<dyn Clipboard>,
}

impl Session {
    pub fn new(config: Config) -> Result<Self, FetchError> {
        Ok(Self {
            fetcher: Fetcher::new(&config)?,
            config,
            clipboard: Arc::new(SystemClipboard::new()),
        })
    }

    pub fn copy_reset(&self) -> Duration {
        Duration::from_millis(self.config.copy_reset_ms)
    }
}

#[async_trait]
pub trait Page: Send {
    fn document(&self) -> &Document;

    // Expands or collapses a folder; pages without a file tree ignore it
    async fn toggle_folder(&mut self, _session: &Session, _path: &str) {}

    // Fetches the next page of results, returns false when nothing was
    // requested (nothing more to load, or a request is still in flight)
    async fn load_more(&mut self, _session: &Session) -> bool {
        false
    }

    // Submits a username to the page's search form, returns false for pages
    // that don't have one
    async fn submit(&mut self, _session: &Session, _username: &str) -> bool {
        false
    }
}

// What the caller has to do after an action ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The page updated itself (or nothing changed)
    Stay,
    /// Show another page
    Open(Route),
    /// Open a URL outside the app
    External(String),
}

pub async fn activate(page: &mut dyn Page, session: &Session, action: Action) -> Outcome {
    match action {
        Action::Copy(button) => {
            button.click(session.clipboard.as_ref());
            Outcome::Stay
        }
        Action::ToggleFolder(path) => {
            page.toggle_folder(session, &path).await;
            Outcome::Stay
        }
        Action::Navigate(route) => Outcome::Open(route),
        Action::External(url) => Outcome::External(url),
    }
}

// Builds and loads the page a route points at
pub async fn open(route: &Route, session: &Session) -> Box<dyn Page> {
    debug!(route = %route, "opening page");
    match route {
        Route::Profile { username } => {
            let mut page = profile::ProfilePage::new();
            if let Some(username) = username {
                page.submit_username(session, username).await;
            }
            Box::new(page)
        }
        Route::Repo {
            url,
            repo_name,
            tree_url,
            sha,
        } => Box::new(
            repo::RepoPage::load(session, url, repo_name, tree_url.as_deref(), sha.as_deref())
                .await,
        ),
        Route::Commits {
            url,
            repo_name,
            repo_url,
        } => Box::new(
            commits::CommitsPage::load(session, url, repo_name, repo_url, Utc::now()).await,
        ),
        Route::Blob {
            repo_name,
            file_name,
            url,
            repo_url,
            tree_url,
        } => Box::new(
            blob::BlobPage::load(
                session,
                repo_name,
                file_name,
                url,
                repo_url,
                tree_url.as_deref(),
            )
            .await,
        ),
    }
}

pub(crate) fn repo_route(repo: &Repo) -> Route {
    Route::Repo {
        url: repo.url.clone(),
        repo_name: repo.full_name.clone(),
        tree_url: None,
        sha: None,
    }
}

pub(crate) fn commits_route(repo: &Repo) -> Route {
    Route::Commits {
        url: repo.commits_url.clone(),
        repo_name: repo.full_name.clone(),
        repo_url: repo.url.clone(),
    }
}

// Languages are decoration: a failed fetch just means no language bar
pub(crate) async fn fetch_languages(fetcher: &Fetcher, url: Option<&str>) -> Option<Languages> {
    let url = url.filter(|u| !u.is_empty())?;
    match fetcher.fetch_json(url).await {
        Ok(languages) => Some(languages),
        Err(e) => {
            debug!(url, error = %e, "no languages");
            None
        }
    }
}

// "abc123" from a full 40 character sha
pub(crate) fn short_sha(sha: &str) -> String {
    sha.chars().take(6).collect()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is #[async_trait]?
//    - Rust traits used as `dyn Page` can't have plain async methods yet
//    - The macro rewrites each `async fn` into one returning a boxed future
//
// 2. Why Box<dyn Page>?
//    - The four pages are different types
//    - A trait object lets open() return any of them and the shell keep a
//      stack of them
//
// 3. Why Arc<dyn Clipboard>?
//    - Tests swap in a recording clipboard, the app uses the system one
//    - Arc keeps one clipboard shared for the whole session
// -----------------------------------------------------------------------------


#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::CopyButton;
    use wiremock::MockServer;

    struct Blank(Document);

    #[async_trait]
    impl Page for Blank {
        fn document(&self) -> &Document {
            &self.0
        }
    }

    #[tokio::test]
    async fn test_activate_copy_stays_on_page() {
        let server = MockServer::start().await;
        let session = test_support::session(&server);
        let mut page = Blank(Document::new("blank"));
        let button = CopyButton::new("copy", "abc", Duration::from_secs(1));

        let outcome = activate(&mut page, &session, Action::Copy(button.clone())).await;

        assert_eq!(outcome, Outcome::Stay);
        assert_eq!(button.state(), crate::view::CopyState::Copied);
    }

    #[tokio::test]
    async fn test_activate_links() {
        let server = MockServer::start().await;
        let session = test_support::session(&server);
        let mut page = Blank(Document::new("blank"));
        let route = Route::Profile {
            username: Some("octocat".to_string()),
        };

        let outcome = activate(&mut page, &session, Action::Navigate(route.clone())).await;
        assert_eq!(outcome, Outcome::Open(route));

        let outcome = activate(
            &mut page,
            &session,
            Action::External("https://github.com".to_string()),
        )
        .await;
        assert_eq!(outcome, Outcome::External("https://github.com".to_string()));
    }

    #[test]
    fn test_short_sha() {
        assert_eq!(short_sha("0123456789abcdef"), "012345");
        assert_eq!(short_sha("abc"), "abc");
    }
}
