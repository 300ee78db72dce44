// src/pages/commits.rs
// =============================================================================
// Commit history of a repository, grouped by day.
//
// The API returns commits newest first. Grouping keeps that order inside a
// day and lists the days newest first:
//
//   Commits on Jan 6, 2024
//     fix typo
//     add parser
//   Commits on Jan 5, 2024
//     initial commit
//
// Days are UTC calendar days of the committer date.
// =============================================================================

use crate::github::types::Commit;
use crate::github::{ErrorMsg, FetchOptions, LoadingMsg};
use crate::pages::{short_sha, Page, Session};
use crate::route::Route;
use crate::view::components::{avatar, DEFAULT_AVATAR_SIZE};
use crate::view::dates::{distance_to_now, short_day};
use crate::view::{Action, Block, CopyButton, Document, Icon};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::info;

const HEADER: &str = "header";
const MAIN: &str = "main";

pub struct CommitsPage {
    doc: Document,
}

impl CommitsPage {
    // `now` is passed in so "authored 3 days ago" can be tested
    pub async fn load(
        session: &Session,
        url: &str,
        repo_name: &str,
        repo_url: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let mut doc = Document::with_sections(format!("{} commits", repo_name), &[HEADER, MAIN]);
        doc.push(
            HEADER,
            Block::link(
                None,
                repo_name,
                Action::Navigate(Route::Repo {
                    url: repo_url.to_string(),
                    repo_name: repo_name.to_string(),
                    tree_url: None,
                    sha: None,
                }),
            ),
        );

        doc.remove_msg("get-commits-error-msg");
        let options = FetchOptions::default()
            .loading(LoadingMsg::new(MAIN, "loading-msg"))
            .error(ErrorMsg::new(
                MAIN,
                "get-commits-error-msg",
                "can't get this repo commits at the moment",
            ));
        let url = url.replace("{/sha}", "");

        if let Ok(commits) = session
            .fetcher
            .fetch_data::<Vec<Commit>>(&mut doc, &url, options)
            .await
        {
            info!(repo = repo_name, count = commits.len(), "commits loaded");
            let reset = session.copy_reset();
            for (day, commits) in group_by_day(commits) {
                let mut group = vec![Block::heading(format!("Commits on {}", short_day(day)))];
                group.extend(
                    commits
                        .iter()
                        .map(|commit| commit_block(commit, repo_name, repo_url, now, reset)),
                );
                doc.push(MAIN, Block::Group(group));
            }
        }

        Self { doc }
    }
}

// Newest day first, API order within a day
fn group_by_day(commits: Vec<Commit>) -> Vec<(NaiveDate, Vec<Commit>)> {
    let mut days: BTreeMap<NaiveDate, Vec<Commit>> = BTreeMap::new();
    for commit in commits {
        days.entry(commit.commit.committer.date.date_naive())
            .or_default()
            .push(commit);
    }
    days.into_iter().rev().collect()
}

fn commit_block(
    commit: &Commit,
    repo_name: &str,
    repo_url: &str,
    now: DateTime<Utc>,
    reset: Duration,
) -> Block {
    let title = commit.commit.message.lines().next().unwrap_or_default();

    Block::Group(vec![
        Block::link(
            Some(Icon::External),
            title,
            Action::External(commit.html_url.clone()),
        ),
        Block::Row(vec![
            avatar(commit.author_avatar(), DEFAULT_AVATAR_SIZE),
            Block::text(format!(
                "{} authored {}",
                commit.author_login(),
                distance_to_now(commit.commit.committer.date, now)
            )),
        ]),
        Block::Row(vec![
            Block::text(short_sha(&commit.sha)),
            Block::Copy(CopyButton::new("copy sha", commit.sha.clone(), reset)),
            Block::link(
                Some(Icon::Code),
                "browse files",
                Action::Navigate(Route::Repo {
                    url: repo_url.to_string(),
                    repo_name: repo_name.to_string(),
                    tree_url: Some(commit.commit.tree.url.clone()),
                    sha: Some(commit.sha.clone()),
                }),
            ),
        ]),
    ])
}

#[async_trait::async_trait]
impl Page for CommitsPage {
    fn document(&self) -> &Document {
        &self.doc
    }
}
