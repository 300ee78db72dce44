// src/pages/profile.rs
// =============================================================================
// The home page: search a username, show the profile and its repositories.
//
// Flow:
// 1. submit(username)
//      - empty input -> validation message, no request at all
//      - GET /users/{login}
//      - failure -> form error, profile and repos cleared
// 2. on success the profile is rendered and page 1 of repositories loaded
// 3. load_more() fetches the next page ("infinite scroll")
//
// Profile and repositories fail independently: if the repos request fails
// after the profile loaded, the profile stays and only the repos section
// shows an error.
//
// is_loading guards load_more(): while a repos request is out, asking for
// more does nothing.
// =============================================================================

use crate::github::types::{Repo, User};
use crate::github::{ErrorMsg, FetchOptions, LoadingMsg};
use crate::pages::{commits_route, fetch_languages, repo_route, Page, Session};
use crate::view::components::{avatar, buttons_section};
use crate::view::dates::short_date;
use crate::view::languages::LanguagePalette;
use crate::view::{Action, Block, Document, Icon, LanguageBreakdown, MessageKind};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::{debug, info};

const FORM: &str = "form";
const USER_INFO: &str = "user-info";
const REPOS: &str = "repos";

const FORM_ERROR_ID: &str = "form-error-msg";
const USER_LOADING_ID: &str = "show-loading-user-info-msg";
const REPOS_LOADING_ID: &str = "show-loading-repo-msg";
const REPOS_ERROR_ID: &str = "get-repos-error-msg";

// How many languages requests run at once while a page of repos renders
const LANGUAGE_FETCHES: usize = 4;

pub struct ProfilePage {
    doc: Document,
    /// Login of the profile on screen, empty before the first success
    username: String,
    current_page: u32,
    is_loading: bool,
    /// The last page came back short, so there's nothing after it
    exhausted: bool,
    palette: LanguagePalette,
}

impl Default for ProfilePage {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfilePage {
    pub fn new() -> Self {
        Self {
            doc: Document::with_sections("GitHub profile", &[FORM, USER_INFO, REPOS]),
            username: String::new(),
            current_page: 0,
            is_loading: false,
            exhausted: false,
            palette: LanguagePalette::new(),
        }
    }

    // The search form's submit handler
    pub async fn submit_username(&mut self, session: &Session, input: &str) {
        let username = input.trim();

        if username.is_empty() {
            self.doc.show_msg(
                FORM,
                FORM_ERROR_ID,
                MessageKind::Validation,
                "username must be provided",
            );
            return;
        }
        self.doc.remove_msg(FORM_ERROR_ID);

        let url = session.fetcher.user_url(username);
        let options = FetchOptions::default()
            .loading(LoadingMsg::new(USER_INFO, USER_LOADING_ID))
            .error(ErrorMsg::new(
                FORM,
                FORM_ERROR_ID,
                "can't get this user profile info",
            ));

        match session.fetcher.fetch_data::<User>(&mut self.doc, &url, options).await {
            Ok(user) => self.show_profile(session, user).await,
            Err(_) => {
                self.doc.remove_msg(REPOS_ERROR_ID);
                self.doc.clear(USER_INFO);
                self.doc.clear(REPOS);
                self.username.clear();
                self.doc.title = "GitHub profile".to_string();
            }
        }
    }

    async fn show_profile(&mut self, session: &Session, user: User) {
        info!(login = %user.login, "profile loaded");

        self.username = user.login.clone();
        self.doc.title = format!("GitHub profile: {}", user.login);
        self.current_page = 0;
        self.exhausted = false;

        self.doc.clear(REPOS);
        self.doc.clear(USER_INFO);
        self.doc.extend(USER_INFO, profile_blocks(&user));

        self.render_repos(session, 1).await;
    }

    // One page of repositories, or None when the request failed
    async fn get_repos(&mut self, session: &Session, page: u32) -> Option<Vec<Repo>> {
        self.doc.remove_msg(REPOS_ERROR_ID);

        self.is_loading = true;
        let url = session
            .fetcher
            .user_repos_url(&self.username, page, session.config.per_page);
        let options = FetchOptions::default()
            .loading(LoadingMsg::new(REPOS, REPOS_LOADING_ID).text("Loading Repos..."))
            .error(ErrorMsg::new(
                REPOS,
                REPOS_ERROR_ID,
                "can't get repos at the moment",
            ));
        let result = session
            .fetcher
            .fetch_data::<Vec<Repo>>(&mut self.doc, &url, options)
            .await;
        self.is_loading = false;

        let repos = result.ok()?;
        self.current_page += 1;
        Some(repos)
    }

    async fn render_repos(&mut self, session: &Session, page: u32) {
        let Some(repos) = self.get_repos(session, page).await else {
            return;
        };

        if repos.len() < session.config.per_page as usize {
            self.exhausted = true;
        }
        debug!(page, count = repos.len(), "repos page loaded");

        // Fetched together, rendered in the API's order (see note 2 below)
        let requests: Vec<_> = repos
            .iter()
            .map(|repo| fetch_languages(&session.fetcher, repo.languages_url.as_deref()))
            .collect();
        let languages: Vec<_> = stream::iter(requests)
            .buffered(LANGUAGE_FETCHES)
            .collect()
            .await;

        let reset = session.copy_reset();
        for (repo, languages) in repos.iter().zip(languages) {
            let mut blocks = vec![
                Block::link(None, repo.name.clone(), Action::Navigate(repo_route(repo))),
                buttons_section(&repo.html_url, &repo.clone_url, &repo.ssh_url, reset),
            ];

            if let Some(breakdown) = languages
                .as_ref()
                .and_then(|l| LanguageBreakdown::new(l, &mut self.palette))
            {
                blocks.push(Block::Languages(breakdown));
            }

            blocks.push(Block::item(Icon::Branch, repo.default_branch.clone()));
            blocks.push(Block::link(
                Some(Icon::Clock),
                "commits",
                Action::Navigate(commits_route(repo)),
            ));
            blocks.push(Block::item(Icon::Eye, repo.watchers_count.to_string()));
            blocks.push(Block::text(format!(
                "created at: {}",
                short_date(repo.created_at)
            )));

            self.doc.push(REPOS, Block::Group(blocks));
        }
    }

    fn has_repos(&self) -> bool {
        self.doc
            .section(REPOS)
            .is_some_and(|s| !s.blocks.is_empty())
    }

    pub fn can_load_more(&self) -> bool {
        !self.is_loading && !self.exhausted && !self.username.is_empty() && self.has_repos()
    }
}

fn profile_blocks(user: &User) -> Vec<Block> {
    let mut blocks = vec![
        avatar(&user.avatar_url, 150),
        Block::Row(vec![
            Block::text(user.name.clone().unwrap_or_default()),
            Block::link(
                Some(Icon::External),
                user.login.clone(),
                Action::External(user.html_url.clone()),
            ),
        ]),
    ];

    if let Some(bio) = user.bio.as_deref().filter(|b| !b.is_empty()) {
        blocks.push(Block::text(bio));
    }

    if let Some(blog) = user.blog.as_deref().filter(|b| !b.is_empty()) {
        blocks.push(Block::link(
            Some(Icon::Globe),
            blog,
            Action::External(absolute_url(blog)),
        ));
    }

    blocks.push(Block::text(format!("repos: {}", user.public_repos)));
    blocks.push(Block::text(format!("followers: {}", user.followers)));
    blocks.push(Block::text(format!("following: {}", user.following)));
    blocks.push(Block::text(short_date(user.created_at)));

    blocks
}

// Profiles often list "example.com" without a scheme
fn absolute_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

#[async_trait]
impl Page for ProfilePage {
    fn document(&self) -> &Document {
        &self.doc
    }

    async fn load_more(&mut self, session: &Session) -> bool {
        if !self.can_load_more() {
            debug!(
                is_loading = self.is_loading,
                exhausted = self.exhausted,
                "not loading more repos"
            );
            return false;
        }
        self.render_repos(session, self.current_page + 1).await;
        true
    }

    async fn submit(&mut self, session: &Session, username: &str) -> bool {
        self.submit_username(session, username).await;
        true
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does `buffered(N)` do?
//    - Runs up to N futures of a stream at once
//    - Unlike buffer_unordered, results come out in the original order
//
// 2. Why collect the language futures into a Vec first?
//    - async-trait boxes the page's futures as `Send`
//    - A stream built from a borrowing closure can't prove that across .await
//    - A Vec of ready-made futures can
//
// 3. Why the is_loading flag?
//    - load_more can be triggered again while a page is still in flight
//    - The flag turns the second call into a no-op
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::test_support::{flatten, repo_json, session, user_json};
    use serde_json::json;
    use wiremock::matchers::{method, path, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_user(server: &MockServer, login: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/users/{login}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json(login)))
            .mount(server)
            .await;
    }

    async fn mount_repos_page(server: &MockServer, login: &str, page: &str, names: &[&str]) {
        let repos: Vec<_> = names
            .iter()
            .map(|name| repo_json(&server.uri(), login, name))
            .collect();
        Mock::given(method("GET"))
            .and(path(format!("/users/{login}/repos")))
            .and(query_param("page", page))
            .respond_with(ResponseTemplate::new(200).set_body_json(repos))
            .mount(server)
            .await;
    }

    async fn mount_languages(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path_regex(r"^/repos/.+/languages$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Rust": 900, "Shell": 100})))
            .mount(server)
            .await;
    }

    fn repo_cards(page: &ProfilePage) -> usize {
        page.doc.section(REPOS).map(|s| s.blocks.len()).unwrap_or(0)
    }

    #[tokio::test]
    async fn test_empty_username_shows_validation_and_skips_request() {
        let server = MockServer::start().await;
        let session = session(&server);
        let mut page = ProfilePage::new();

        page.submit_username(&session, "   ").await;

        let message = page.doc.message(FORM_ERROR_ID).unwrap();
        assert_eq!(message.kind, MessageKind::Validation);
        assert_eq!(message.text, "username must be provided");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_profile_and_first_page_of_repos() {
        let server = MockServer::start().await;
        mount_user(&server, "octocat").await;
        mount_repos_page(&server, "octocat", "1", &["hello-world", "spoon-knife"]).await;
        mount_languages(&server).await;
        let session = session(&server);
        let mut page = ProfilePage::new();

        page.submit_username(&session, "octocat").await;

        assert_eq!(page.username, "octocat");
        assert_eq!(page.current_page, 1);
        assert_eq!(repo_cards(&page), 2);
        assert!(!page.doc.has_msg(FORM_ERROR_ID));
        assert!(!page.doc.has_msg(USER_LOADING_ID));

        let info = flatten(&page.doc, USER_INFO);
        assert!(info
            .iter()
            .any(|b| matches!(b, Block::Text(t) if t == "followers: 10")));
        assert!(info.iter().any(|b| matches!(
            b.action(),
            Some(Action::External(url)) if url == "https://octocat.example.com"
        )));

        let repos = flatten(&page.doc, REPOS);
        assert_eq!(
            repos
                .iter()
                .filter(|b| matches!(b, Block::Languages(_)))
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn test_repos_failure_keeps_profile() {
        let server = MockServer::start().await;
        mount_user(&server, "octocat").await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let session = session(&server);
        let mut page = ProfilePage::new();

        page.submit_username(&session, "octocat").await;

        assert!(!page.doc.section(USER_INFO).unwrap().blocks.is_empty());
        assert!(!page.doc.has_msg(FORM_ERROR_ID));

        let repos = page.doc.section(REPOS).unwrap();
        assert!(repos.blocks.is_empty());
        assert_eq!(repos.messages.len(), 1);
        assert_eq!(repos.messages[0].id, REPOS_ERROR_ID);
        assert_eq!(repos.messages[0].text, "can't get repos at the moment");
        assert_eq!(page.current_page, 0);
        assert!(!page.is_loading);
    }

    #[tokio::test]
    async fn test_unknown_user_clears_page() {
        let server = MockServer::start().await;
        mount_user(&server, "octocat").await;
        mount_repos_page(&server, "octocat", "1", &["hello-world"]).await;
        Mock::given(method("GET"))
            .and(path("/users/nobody"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})),
            )
            .mount(&server)
            .await;
        let session = session(&server);
        let mut page = ProfilePage::new();

        page.submit_username(&session, "octocat").await;
        page.submit_username(&session, "nobody").await;

        let message = page.doc.message(FORM_ERROR_ID).unwrap();
        assert_eq!(message.kind, MessageKind::Error);
        assert_eq!(message.text, "can't get this user profile info");
        assert!(page.doc.section(USER_INFO).unwrap().is_empty());
        assert!(page.doc.section(REPOS).unwrap().is_empty());
        assert!(!page.can_load_more());
    }

    #[tokio::test]
    async fn test_load_more_fetches_next_page_until_short_page() {
        let server = MockServer::start().await;
        mount_user(&server, "octocat").await;
        mount_repos_page(&server, "octocat", "1", &["a", "b", "c", "d"]).await;
        mount_repos_page(&server, "octocat", "2", &["e"]).await;
        mount_languages(&server).await;
        let session = session(&server);
        let mut page = ProfilePage::new();

        page.submit_username(&session, "octocat").await;
        assert_eq!(repo_cards(&page), 4);

        assert!(page.load_more(&session).await);
        assert_eq!(repo_cards(&page), 5);
        assert_eq!(page.current_page, 2);

        // page 2 had fewer than per_page entries
        assert!(!page.load_more(&session).await);
    }

    // Only compiles when the future can move between worker threads
    fn assert_send<F: std::future::Future + Send>(future: F) -> F {
        future
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_repos_load_on_a_spawned_task() {
        let server = MockServer::start().await;
        mount_user(&server, "octocat").await;
        mount_repos_page(&server, "octocat", "1", &["a", "b"]).await;
        mount_languages(&server).await;
        let session = std::sync::Arc::new(session(&server));

        let task_session = session.clone();
        let page = tokio::spawn(async move {
            let mut page = ProfilePage::new();
            page.username = "octocat".to_string();
            assert_send(page.render_repos(&task_session, 1)).await;
            page
        })
        .await
        .unwrap();

        assert_eq!(repo_cards(&page), 2);
    }

    #[tokio::test]
    async fn test_load_more_waits_for_in_flight_request() {
        let server = MockServer::start().await;
        mount_user(&server, "octocat").await;
        mount_repos_page(&server, "octocat", "1", &["a", "b", "c", "d"]).await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;
        let session = session(&server);
        let mut page = ProfilePage::new();

        page.submit_username(&session, "octocat").await;
        page.is_loading = true;

        assert!(!page.load_more(&session).await);
        assert_eq!(page.current_page, 1);
    }

    #[tokio::test]
    async fn test_languages_keep_their_colour_across_cards() {
        let server = MockServer::start().await;
        mount_user(&server, "octocat").await;
        mount_repos_page(&server, "octocat", "1", &["a", "b"]).await;
        mount_languages(&server).await;
        let session = session(&server);
        let mut page = ProfilePage::new();

        page.submit_username(&session, "octocat").await;

        let colours: Vec<_> = flatten(&page.doc, REPOS)
            .into_iter()
            .filter_map(|b| match b {
                Block::Languages(l) => l.shares.iter().find(|s| s.name == "Rust").map(|s| s.color),
                _ => None,
            })
            .collect();
        assert_eq!(colours.len(), 2);
        assert_eq!(colours[0], colours[1]);
    }
}
