// src/pages/repo.rs
// =============================================================================
// One repository: details on the right, owner and file tree on the left.
//
// Context comes from the route:
// - url: API URL of the repository
// - tree_url + sha: set when opened from a commit ("browse files"), the tree
//   then shows that commit instead of the default branch
// =============================================================================

use crate::github::types::Repo;
use crate::github::{ErrorMsg, FetchOptions, LoadingMsg};
use crate::pages::tree::{FileTree, TREE};
use crate::pages::{commits_route, fetch_languages, short_sha, Page, Session};
use crate::view::components::{avatar, buttons_section, DEFAULT_AVATAR_SIZE};
use crate::view::dates::short_date;
use crate::view::{Action, Block, Document, Icon, LanguageBreakdown, LanguagePalette};
use async_trait::async_trait;
use tracing::info;

const MAIN: &str = "main";
const RIGHT: &str = "right";
const LEFT: &str = "left";

pub struct RepoPage {
    doc: Document,
    tree: Option<FileTree>,
}

impl RepoPage {
    pub async fn load(
        session: &Session,
        url: &str,
        repo_name: &str,
        tree_url: Option<&str>,
        sha: Option<&str>,
    ) -> Self {
        let mut page = Self {
            doc: Document::with_sections(repo_name, &[MAIN, RIGHT, LEFT, TREE]),
            tree: None,
        };

        let options = FetchOptions::default()
            .loading(LoadingMsg::new(MAIN, "get-single-repo-loading-msg"))
            .error(ErrorMsg::new(
                MAIN,
                "get-single-repo-error-msg",
                "can't get this repo at the moment",
            ));
        let Ok(repo) = session
            .fetcher
            .fetch_data::<Repo>(&mut page.doc, url, options)
            .await
        else {
            return page;
        };
        info!(repo = %repo.full_name, "repo loaded");
        page.doc.title = repo.full_name.clone();

        let right = right_side(session, &repo).await;
        page.doc.extend(RIGHT, right);
        page.doc.extend(LEFT, left_side(&repo, sha));

        page.tree = FileTree::load_root(
            &mut page.doc,
            &session.fetcher,
            &repo.full_name,
            &repo.url,
            &repo.default_branch,
            tree_url,
        )
        .await
        .ok();
        page.refresh_tree();

        page
    }

    fn refresh_tree(&mut self) {
        if let Some(tree) = &self.tree {
            let section = self.doc.section_mut(TREE);
            section.blocks = tree.blocks();
        }
    }
}

async fn right_side(session: &Session, repo: &Repo) -> Vec<Block> {
    let mut blocks = vec![buttons_section(
        &repo.html_url,
        &repo.clone_url,
        &repo.ssh_url,
        session.copy_reset(),
    )];

    if let Some(description) = repo.description.as_deref().filter(|d| !d.is_empty()) {
        blocks.push(Block::Group(vec![
            Block::heading("Description"),
            Block::text(description),
        ]));
    }

    if let Some(homepage) = repo.homepage.as_deref().filter(|h| !h.is_empty()) {
        blocks.push(Block::link(
            Some(Icon::Link),
            homepage,
            Action::External(homepage.to_string()),
        ));
    }

    blocks.push(Block::link(
        Some(Icon::Clock),
        "commits",
        Action::Navigate(commits_route(repo)),
    ));
    blocks.push(Block::Group(vec![
        Block::heading("Main Branch"),
        Block::item(Icon::Branch, repo.default_branch.clone()),
    ]));
    blocks.push(Block::Group(vec![
        Block::heading("Views"),
        Block::item(Icon::Eye, repo.watchers_count.to_string()),
    ]));

    let mut palette = LanguagePalette::new();
    if let Some(breakdown) = fetch_languages(&session.fetcher, repo.languages_url.as_deref())
        .await
        .and_then(|languages| LanguageBreakdown::new(&languages, &mut palette))
    {
        blocks.push(Block::Languages(breakdown));
    }

    blocks.push(Block::text(format!(
        "created at: {}",
        short_date(repo.created_at)
    )));
    blocks
}

fn left_side(repo: &Repo, sha: Option<&str>) -> Vec<Block> {
    let mut blocks = vec![Block::Row(vec![
        avatar(&repo.owner.avatar_url, DEFAULT_AVATAR_SIZE),
        Block::text(repo.owner.login.clone()),
    ])];
    if let Some(sha) = sha {
        blocks.push(Block::text(short_sha(sha)));
    }
    blocks
}

#[async_trait]
impl Page for RepoPage {
    fn document(&self) -> &Document {
        &self.doc
    }

    async fn toggle_folder(&mut self, session: &Session, path: &str) {
        if let Some(tree) = &mut self.tree {
            tree.toggle(&mut self.doc, &session.fetcher, path).await;
        }
        self.refresh_tree();
    }
}
