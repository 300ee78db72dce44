// src/pages/tree.rs
// =============================================================================
// The repository file tree, expanded one folder at a time.
//
// How it works:
// 1. load_root() fetches the top-level tree (from a commit's tree URL, or the
//    tip commit of the default branch when there is none)
// 2. Folders start closed and have no children yet
// 3. The first expand fetches that folder's tree and stores it in the node
// 4. Collapsing only flips `open`; expanding again reuses the stored children
//
// A failed folder fetch stores nothing and closes the folder again, so the
// next expand retries. Per-folder messages are anchored to the folder's path
// and show up right below its row.
//
// Rust concepts:
// - Option<Vec<TreeNode>>: None = never fetched, Some = cached
// - Recursive &mut search: find_node() walks down by path prefix
// =============================================================================

use crate::github::types::{Commit, EntryKind, Tree, TreeEntry};
use crate::github::{ErrorMsg, FetchError, FetchOptions, Fetcher, LoadingMsg};
use crate::route::Route;
use crate::view::{Action, Block, Document, Icon};
use tracing::debug;

pub(crate) const TREE: &str = "tree";

const LOADING_ID: &str = "tree-loading-msg";
const ERROR_ID: &str = "tree-error-msg";

#[derive(Debug, Clone)]
enum NodeKind {
    File,
    Submodule,
    Folder {
        open: bool,
        children: Option<Vec<TreeNode>>,
    },
}

#[derive(Debug, Clone)]
struct TreeNode {
    name: String,
    /// Full path from the repository root, e.g. "src/pages/tree.rs"
    path: String,
    /// API URL of the blob or tree
    url: String,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
pub(crate) struct FileTree {
    repo_name: String,
    repo_url: String,
    /// The commit tree the page was opened at, passed along to blob pages
    commit_tree_url: Option<String>,
    nodes: Vec<TreeNode>,
}

impl FileTree {
    // Fetches the root of the tree
    //
    // Messages go to the tree section; on failure the caller just has no tree
    pub async fn load_root(
        doc: &mut Document,
        fetcher: &Fetcher,
        repo_name: &str,
        repo_url: &str,
        default_branch: &str,
        commit_tree_url: Option<&str>,
    ) -> Result<Self, FetchError> {
        let tree_url = match commit_tree_url {
            Some(url) => url.to_string(),
            None => {
                let url = fetcher.branch_commit_url(repo_name, default_branch);
                let options = FetchOptions::default()
                    .loading(LoadingMsg::new(TREE, LOADING_ID).text("Loading tree files..."))
                    .error(ErrorMsg::new(TREE, ERROR_ID, "can't get this tree files"));
                let commit: Commit = fetcher.fetch_data(doc, &url, options).await?;
                commit.commit.tree.url
            }
        };

        let options = FetchOptions::default()
            .loading(LoadingMsg::new(TREE, LOADING_ID).text("Loading files tree..."))
            .error(ErrorMsg::new(
                TREE,
                ERROR_ID,
                "can't get files of this folder",
            ));
        let tree: Tree = fetcher.fetch_data(doc, &tree_url, options).await?;

        Ok(Self {
            repo_name: repo_name.to_string(),
            repo_url: repo_url.to_string(),
            commit_tree_url: commit_tree_url.map(str::to_string),
            nodes: nodes_from(None, tree.tree),
        })
    }

    // Expands or collapses the folder at `path`
    pub async fn toggle(&mut self, doc: &mut Document, fetcher: &Fetcher, path: &str) {
        let Some(node) = find_node(&mut self.nodes, path) else {
            debug!(path, "no such folder");
            return;
        };
        let NodeKind::Folder { open, children } = &mut node.kind else {
            return;
        };

        if *open {
            *open = false;
            return;
        }
        *open = true;

        if children.is_some() {
            debug!(path, "folder already fetched");
            return;
        }

        let error_id = format!("{ERROR_ID}:{path}");
        doc.remove_msg(&error_id);
        let options = FetchOptions::default()
            .loading(
                LoadingMsg::new(TREE, format!("{LOADING_ID}:{path}"))
                    .text(format!("Loading {}...", node.name))
                    .under(path),
            )
            .error(
                ErrorMsg::new(TREE, error_id, format!("can't get files of {}", node.name))
                    .under(path),
            );

        match fetcher.fetch_data::<Tree>(doc, &node.url, options).await {
            Ok(tree) => *children = Some(nodes_from(Some(&node.path), tree.tree)),
            Err(_) => *open = false,
        }
    }

    pub fn blocks(&self) -> Vec<Block> {
        let mut blocks = Vec::new();
        self.push_blocks(&self.nodes, 0, &mut blocks);
        blocks
    }

    fn push_blocks(&self, nodes: &[TreeNode], depth: usize, out: &mut Vec<Block>) {
        for node in nodes {
            match &node.kind {
                NodeKind::File => out.push(Block::TreeItem {
                    depth,
                    icon: Icon::File,
                    name: node.name.clone(),
                    action: Some(Action::Navigate(Route::Blob {
                        repo_name: self.repo_name.clone(),
                        file_name: node.path.clone(),
                        url: node.url.clone(),
                        repo_url: self.repo_url.clone(),
                        tree_url: self.commit_tree_url.clone(),
                    })),
                }),
                NodeKind::Submodule => out.push(Block::TreeItem {
                    depth,
                    icon: Icon::Submodule,
                    name: node.name.clone(),
                    action: None,
                }),
                NodeKind::Folder { open, children } => {
                    out.push(Block::TreeItem {
                        depth,
                        icon: if *open {
                            Icon::FolderOpen
                        } else {
                            Icon::FolderClosed
                        },
                        name: node.name.clone(),
                        action: Some(Action::ToggleFolder(node.path.clone())),
                    });
                    if let (true, Some(children)) = (*open, children) {
                        self.push_blocks(children, depth + 1, out);
                    }
                }
            }
        }
    }
}

fn nodes_from(parent: Option<&str>, entries: Vec<TreeEntry>) -> Vec<TreeNode> {
    entries
        .into_iter()
        .map(|entry| {
            let path = match parent {
                Some(parent) => format!("{}/{}", parent, entry.path),
                None => entry.path.clone(),
            };
            let kind = match entry.kind {
                EntryKind::Blob => NodeKind::File,
                EntryKind::Commit => NodeKind::Submodule,
                EntryKind::Tree => NodeKind::Folder {
                    open: false,
                    children: None,
                },
            };
            TreeNode {
                name: entry.path,
                path,
                url: entry.url,
                kind,
            }
        })
        .collect()
}

// Finds a node by full path, only descending into folders already fetched
fn find_node<'a>(nodes: &'a mut [TreeNode], path: &str) -> Option<&'a mut TreeNode> {
    for node in nodes.iter_mut() {
        if node.path == path {
            return Some(node);
        }
        let inside = path
            .strip_prefix(node.path.as_str())
            .is_some_and(|rest| rest.starts_with('/'));
        if inside {
            return match &mut node.kind {
                NodeKind::Folder {
                    children: Some(children),
                    ..
                } => find_node(children, path),
                _ => None,
            };
        }
    }
    None
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why `&'a mut` in find_node?
//    - The returned node borrows from the tree passed in
//    - The lifetime tells the compiler the result can't outlive the tree
//
// 2. What does `let NodeKind::Folder { open, children } = &mut node.kind else`
//    do?
//    - Matches the folder variant and binds mutable references to its fields
//    - Any other kind (file, submodule) leaves the function
//
// 3. Why store children as Option<Vec<_>>?
//    - None and Some(empty) mean different things: "not fetched" versus
//      "fetched, and the folder is empty"
// -----------------------------------------------------------------------------
