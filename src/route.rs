// src/route.rs
// =============================================================================
// Routes: how one page tells another what to show.
//
// A route is a page name plus a query string, e.g.
//
//   repo?url=https%3A%2F%2Fapi.github.com%2Frepos%2Fo%2Fr&repoName=o%2Fr
//
// Links rendered in a page carry a Route. The shell follows them directly,
// and `gh-glance open '<route>'` accepts the printed form, so a link can be
// copied out of one run and opened in the next.
//
// The old page file names (repoPage.html, commitsPage.html, ...) are
// accepted as aliases.
// =============================================================================

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use url::form_urlencoded;

#[derive(Debug, Error, PartialEq)]
pub enum RouteError {
    #[error("unknown page '{0}'")]
    UnknownPage(String),

    #[error("route '{page}' is missing the '{param}' parameter")]
    MissingParam { page: &'static str, param: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Home page, optionally with a username already submitted
    Profile { username: Option<String> },
    /// Repository detail; tree_url and sha are set when opened at a commit
    Repo {
        url: String,
        repo_name: String,
        tree_url: Option<String>,
        sha: Option<String>,
    },
    Commits {
        url: String,
        repo_name: String,
        repo_url: String,
    },
    /// A single file
    Blob {
        repo_name: String,
        file_name: String,
        url: String,
        repo_url: String,
        tree_url: Option<String>,
    },
}

impl Route {
    pub fn page_name(&self) -> &'static str {
        match self {
            Route::Profile { .. } => "index",
            Route::Repo { .. } => "repo",
            Route::Commits { .. } => "commits",
            Route::Blob { .. } => "blob",
        }
    }

    // "page?key=value&..." with every value percent-encoded
    pub fn to_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());

        match self {
            Route::Profile { username } => {
                if let Some(username) = username {
                    query.append_pair("username", username);
                }
            }
            Route::Repo {
                url,
                repo_name,
                tree_url,
                sha,
            } => {
                query.append_pair("url", url);
                query.append_pair("repoName", repo_name);
                if let Some(tree_url) = tree_url {
                    query.append_pair("treeUrl", tree_url);
                }
                if let Some(sha) = sha {
                    query.append_pair("sha", sha);
                }
            }
            Route::Commits {
                url,
                repo_name,
                repo_url,
            } => {
                query.append_pair("url", url);
                query.append_pair("repoName", repo_name);
                query.append_pair("repoURL", repo_url);
            }
            Route::Blob {
                repo_name,
                file_name,
                url,
                repo_url,
                tree_url,
            } => {
                query.append_pair("repoName", repo_name);
                query.append_pair("fileName", file_name);
                query.append_pair("url", url);
                query.append_pair("repoURL", repo_url);
                if let Some(tree_url) = tree_url {
                    query.append_pair("treeUrl", tree_url);
                }
            }
        }

        let query = query.finish();
        if query.is_empty() {
            self.page_name().to_string()
        } else {
            format!("{}?{}", self.page_name(), query)
        }
    }

    pub fn parse(input: &str) -> Result<Self, RouteError> {
        let input = input.trim();
        let (location, query) = input.split_once('?').unwrap_or((input, ""));

        // Only the last path segment names the page
        let page = location
            .rsplit('/')
            .next()
            .unwrap_or("")
            .trim_end_matches(".html");

        // Empty values count as absent, like an empty search param
        let params: HashMap<String, String> = form_urlencoded::parse(query.as_bytes())
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let optional = |key: &str| params.get(key).cloned();
        let required = |page: &'static str, key: &'static str| {
            params
                .get(key)
                .cloned()
                .ok_or(RouteError::MissingParam { page, param: key })
        };

        match page {
            "" | "index" => Ok(Route::Profile {
                username: optional("username"),
            }),
            "repo" | "repoPage" => Ok(Route::Repo {
                url: required("repo", "url")?,
                repo_name: required("repo", "repoName")?,
                tree_url: optional("treeUrl"),
                sha: optional("sha"),
            }),
            "commits" | "commitsPage" => Ok(Route::Commits {
                url: required("commits", "url")?,
                repo_name: required("commits", "repoName")?,
                repo_url: required("commits", "repoURL")?,
            }),
            "blob" | "renderBlobPage" => Ok(Route::Blob {
                repo_name: required("blob", "repoName")?,
                file_name: required("blob", "fileName")?,
                url: required("blob", "url")?,
                repo_url: required("blob", "repoURL")?,
                tree_url: optional("treeUrl"),
            }),
            other => Err(RouteError::UnknownPage(other.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_route_survives_printing() {
        let route = Route::Repo {
            url: "https://api.github.com/repos/o/r".to_string(),
            repo_name: "o/r".to_string(),
            tree_url: Some("https://api.github.com/repos/o/r/git/trees/abc?x=1".to_string()),
            sha: Some("abc".to_string()),
        };

        let printed = route.to_query();
        assert!(printed.starts_with("repo?url=https%3A%2F%2Fapi.github.com"));
        assert_eq!(Route::parse(&printed).unwrap(), route);
    }

    #[test]
    fn test_legacy_page_names() {
        let route = Route::parse(
            "commitsPage.html?url=https://api.github.com/repos/o/r/commits{/sha}&repoName=o/r&repoURL=https://api.github.com/repos/o/r",
        )
        .unwrap();

        assert_eq!(
            route,
            Route::Commits {
                url: "https://api.github.com/repos/o/r/commits{/sha}".to_string(),
                repo_name: "o/r".to_string(),
                repo_url: "https://api.github.com/repos/o/r".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_optional_params_are_absent() {
        let route = Route::parse("repo?url=u&repoName=o/r&treeUrl=&sha=").unwrap();
        assert!(matches!(
            route,
            Route::Repo {
                tree_url: None,
                sha: None,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_param() {
        assert_eq!(
            Route::parse("blob?repoName=o/r"),
            Err(RouteError::MissingParam {
                page: "blob",
                param: "fileName"
            })
        );
    }

    #[test]
    fn test_unknown_page() {
        assert!(matches!(
            Route::parse("settings?x=1"),
            Err(RouteError::UnknownPage(_))
        ));
    }

    #[test]
    fn test_profile_without_username() {
        assert_eq!(
            Route::Profile { username: None }.to_query(),
            "index"
        );
        assert_eq!(
            Route::parse("index.html").unwrap(),
            Route::Profile { username: None }
        );
    }
}
