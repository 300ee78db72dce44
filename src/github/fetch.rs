// src/github/fetch.rs
// =============================================================================
// This module talks to the GitHub REST API.
//
// Strategy:
// - One reqwest Client per run, reused for every request
// - Every request is a plain unauthenticated GET
// - A response counts as a failure when:
//     * the request itself fails (network, TLS, timeout)
//     * the HTTP status is not 2xx
//     * the JSON body is an object with a "message" field, which is how
//       GitHub reports errors (even with a 200 status in some proxies)
//
// fetch_data() is the helper every page uses: it shows a loading message in
// the page, performs the request, shows an error message in the page when it
// fails, and always removes the loading message afterwards.
//
// There is no retry, no backoff and no cancellation. Best effort only.
// =============================================================================

use crate::config::Config;
use crate::github::error::FetchError;
use crate::view::{Document, MessageKind};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const DEFAULT_LOADING_TEXT: &str = "Loading...";

// Where (and what) to show while a request is in flight
#[derive(Debug, Clone)]
pub struct LoadingMsg {
    pub section: &'static str,
    pub id: String,
    pub text: Option<String>,
    pub anchor: Option<String>,
}

impl LoadingMsg {
    pub fn new(section: &'static str, id: impl Into<String>) -> Self {
        Self {
            section,
            id: id.into(),
            text: None,
            anchor: None,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    // Show the message below the block with this anchor
    pub fn under(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    // The configured text, or "Loading..."
    pub fn display_text(&self) -> &str {
        self.text.as_deref().unwrap_or(DEFAULT_LOADING_TEXT)
    }
}

// Where (and what) to show when a request fails
#[derive(Debug, Clone)]
pub struct ErrorMsg {
    pub section: &'static str,
    pub id: String,
    pub text: String,
    pub anchor: Option<String>,
}

impl ErrorMsg {
    pub fn new(section: &'static str, id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            section,
            id: id.into(),
            text: text.into(),
            anchor: None,
        }
    }

    pub fn under(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub loading: Option<LoadingMsg>,
    pub error: Option<ErrorMsg>,
}

impl FetchOptions {
    pub fn loading(mut self, loading: LoadingMsg) -> Self {
        self.loading = Some(loading);
        self
    }

    pub fn error(mut self, error: ErrorMsg) -> Self {
        self.error = Some(error);
        self
    }
}

// HTTP access to the API plus the endpoint URLs pages need
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    api_base: Url,
}

impl Fetcher {
    // Builds the HTTP client from the configuration
    //
    // Fails if the API base URL can't hold a path (e.g. "mailto:x")
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        let api_base = Url::parse(&config.api_url).map_err(|source| FetchError::InvalidUrl {
            url: config.api_url.clone(),
            source,
        })?;
        if api_base.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl {
                url: config.api_url.clone(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            });
        }

        Ok(Self { client, api_base })
    }

    // ---- endpoints ---------------------------------------------------------

    // Appends path segments to the API base, percent-encoding each one
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn user_url(&self, login: &str) -> String {
        self.endpoint(["users", login]).to_string()
    }

    pub fn user_repos_url(&self, login: &str, page: u32, per_page: u32) -> String {
        let mut url = self.endpoint(["users", login, "repos"]);
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string())
            .append_pair("sort", "updated");
        url.to_string()
    }

    pub fn repo_url(&self, full_name: &str) -> String {
        self.endpoint(std::iter::once("repos").chain(full_name.split('/')))
            .to_string()
    }

    pub fn commits_url(&self, full_name: &str) -> String {
        self.endpoint(
            std::iter::once("repos")
                .chain(full_name.split('/'))
                .chain(["commits"]),
        )
        .to_string()
    }

    // The tip commit of a branch: /repos/{owner}/{repo}/commits/{ref}
    pub fn branch_commit_url(&self, full_name: &str, branch: &str) -> String {
        self.endpoint(
            std::iter::once("repos")
                .chain(full_name.split('/'))
                .chain(["commits", branch]),
        )
        .to_string()
    }

    pub fn contents_url(&self, full_name: &str, path: &str) -> String {
        self.endpoint(
            std::iter::once("repos")
                .chain(full_name.split('/'))
                .chain(["contents"])
                .chain(path.split('/').filter(|s| !s.is_empty())),
        )
        .to_string()
    }

    // ---- requests ----------------------------------------------------------

    // Performs one GET and decodes the JSON body into T
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        // Read the body even on errors: it usually carries GitHub's message
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| api_message(&v));
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        // Step 1: any JSON at all
        let value: Value = serde_json::from_str(&body)?;
        // Step 2: GitHub's error shape, even behind a 2xx
        if let Some(message) = api_message(&value) {
            return Err(FetchError::Api(message));
        }

        // Step 3: the shape the caller asked for
        Ok(serde_json::from_value(value)?)
    }

    // fetch_json() plus the page's loading and error messages
    //
    // The error is still returned so the caller can clean up its own state
    pub async fn fetch_data<T: DeserializeOwned>(
        &self,
        doc: &mut Document,
        url: &str,
        options: FetchOptions,
    ) -> Result<T, FetchError> {
        if let Some(loading) = &options.loading {
            doc.show_msg_under(
                loading.section,
                loading.anchor.as_deref(),
                &loading.id,
                MessageKind::Loading,
                loading.display_text(),
            );
        }

        let result = self.fetch_json(url).await;

        if let Err(e) = &result {
            warn!(url, error = %e, "request failed");
            if let Some(error) = &options.error {
                doc.show_msg_under(
                    error.section,
                    error.anchor.as_deref(),
                    &error.id,
                    MessageKind::Error,
                    &error.text,
                );
            }
        }

        if let Some(loading) = &options.loading {
            doc.remove_msg(&loading.id);
        }

        result
    }
}

// GitHub's error convention: {"message": "...", "documentation_url": "..."}
fn api_message(value: &Value) -> Option<String> {
    let message = value.as_object()?.get("message")?;
    Some(match message.as_str() {
        Some(text) => text.to_string(),
        None => message.to_string(),
    })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is DeserializeOwned?
//    - A serde trait bound meaning "can be built from JSON without borrowing"
//    - fetch_json::<User>(url) and fetch_json::<Vec<Repo>>(url) share one body
//
// 2. Why parse into serde_json::Value first?
//    - GitHub errors look like {"message": "..."} whatever was asked for
//    - Checking the Value first lets any endpoint report that message
//
// 3. Why does fetch_data take &mut Document?
//    - It writes loading and error messages into the page
//    - The borrow checker guarantees nobody else edits the page meanwhile
//
// 4. What does the builder style (.loading(..).error(..)) buy us?
//    - Every option is optional; callers only name what they need
//    - `mut self` methods return the updated value, so calls chain
// -----------------------------------------------------------------------------
