// src/view/document.rs
// =============================================================================
// The page model every controller builds into.
//
// A Document is an ordered list of named sections. Each section holds:
// - blocks: the content (text, links, buttons, trees, code, ...)
// - messages: transient notices (loading / error / validation)
//
// Messages are addressed by id across the whole document, so showing a
// message whose id already exists is a no-op and removing one doesn't need
// to know which section it lives in. A message can be anchored to one block
// of its section (a tree folder, by path); it is then rendered right below
// that block instead of at the end of the section.
//
// Interactive blocks carry an Action. The renderer numbers them in document
// order; activating number N performs the N-th action.
// =============================================================================

use crate::route::Route;
use crate::view::copy_button::CopyButton;
use crate::view::icon::Icon;
use crate::view::languages::LanguageBreakdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Loading,
    Error,
    /// Bad user input, caught before any request
    Validation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub kind: MessageKind,
    pub text: String,
    /// Block::anchor() of the block this message belongs under
    pub anchor: Option<String>,
}

// What happens when the user activates an interactive block
#[derive(Debug, Clone)]
pub enum Action {
    /// Open another page of this app
    Navigate(Route),
    /// Open a URL in the system browser
    External(String),
    Copy(CopyButton),
    /// Expand or collapse a folder of the file tree, by full path
    ToggleFolder(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avatar {
    /// Empty when the account has no picture
    pub url: String,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeView {
    pub language: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub enum Block {
    Heading(String),
    Text(String),
    Item {
        icon: Icon,
        text: String,
    },
    Link {
        icon: Option<Icon>,
        text: String,
        action: Action,
    },
    Copy(CopyButton),
    Avatar(Avatar),
    Languages(LanguageBreakdown),
    TreeItem {
        depth: usize,
        icon: Icon,
        name: String,
        /// None for entries that can't be opened (submodules)
        action: Option<Action>,
    },
    Code(CodeView),
    Image {
        mime: String,
        size: usize,
    },
    Video {
        url: String,
    },
    /// Children on their own lines, indented (a card, a list item)
    Group(Vec<Block>),
    /// Children side by side on one line
    Row(Vec<Block>),
}

impl Block {
    pub fn text(text: impl Into<String>) -> Self {
        Block::Text(text.into())
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Block::Heading(text.into())
    }

    pub fn item(icon: Icon, text: impl Into<String>) -> Self {
        Block::Item {
            icon,
            text: text.into(),
        }
    }

    pub fn link(icon: Option<Icon>, text: impl Into<String>, action: Action) -> Self {
        Block::Link {
            icon,
            text: text.into(),
            action,
        }
    }

    // Key messages can be anchored to: a folder's path
    pub fn anchor(&self) -> Option<&str> {
        match self {
            Block::TreeItem {
                action: Some(Action::ToggleFolder(path)),
                ..
            } => Some(path),
            _ => None,
        }
    }

    // The action this block performs when activated, if it's interactive
    pub fn action(&self) -> Option<Action> {
        match self {
            Block::Link { action, .. } => Some(action.clone()),
            Block::TreeItem { action, .. } => action.clone(),
            Block::Copy(button) => Some(Action::Copy(button.clone())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Section {
    pub id: &'static str,
    pub blocks: Vec<Block>,
    pub messages: Vec<Message>,
}

impl Section {
    fn new(id: &'static str) -> Self {
        Self {
            id,
            blocks: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.messages.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    sections: Vec<Section>,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    // Creates the sections up front so they render in this order
    pub fn with_sections(title: impl Into<String>, ids: &[&'static str]) -> Self {
        let mut doc = Self::new(title);
        for &id in ids {
            doc.section_mut(id);
        }
        doc
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    // Returns the section, appending an empty one if it doesn't exist yet
    pub fn section_mut(&mut self, id: &'static str) -> &mut Section {
        let index = match self.sections.iter().position(|s| s.id == id) {
            Some(index) => index,
            None => {
                self.sections.push(Section::new(id));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }

    pub fn push(&mut self, section: &'static str, block: Block) {
        self.section_mut(section).blocks.push(block);
    }

    pub fn extend(&mut self, section: &'static str, blocks: impl IntoIterator<Item = Block>) {
        self.section_mut(section).blocks.extend(blocks);
    }

    // Empties a section: content and messages
    pub fn clear(&mut self, section: &'static str) {
        let section = self.section_mut(section);
        section.blocks.clear();
        section.messages.clear();
    }

    // Adds a message unless one with this id is already shown somewhere
    pub fn show_msg(&mut self, section: &'static str, id: &str, kind: MessageKind, text: &str) {
        self.show_msg_under(section, None, id, kind, text);
    }

    // show_msg() for a message rendered below the block with this anchor
    pub fn show_msg_under(
        &mut self,
        section: &'static str,
        anchor: Option<&str>,
        id: &str,
        kind: MessageKind,
        text: &str,
    ) {
        if self.has_msg(id) {
            return;
        }
        self.section_mut(section).messages.push(Message {
            id: id.to_string(),
            kind,
            text: text.to_string(),
            anchor: anchor.map(str::to_string),
        });
    }

    pub fn remove_msg(&mut self, id: &str) -> bool {
        let mut removed = false;
        for section in &mut self.sections {
            let before = section.messages.len();
            section.messages.retain(|m| m.id != id);
            removed |= section.messages.len() != before;
        }
        removed
    }

    pub fn message(&self, id: &str) -> Option<&Message> {
        self.sections
            .iter()
            .flat_map(|s| s.messages.iter())
            .find(|m| m.id == id)
    }

    pub fn has_msg(&self, id: &str) -> bool {
        self.message(id).is_some()
    }

    // Error and validation messages, i.e. whatever the user should act on
    pub fn failures(&self) -> impl Iterator<Item = &Message> {
        self.sections
            .iter()
            .flat_map(|s| s.messages.iter())
            .filter(|m| m.kind != MessageKind::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_msg_is_idempotent_per_id() {
        let mut doc = Document::with_sections("t", &["form", "repos"]);
        doc.show_msg("form", "form-error-msg", MessageKind::Validation, "first");
        doc.show_msg("repos", "form-error-msg", MessageKind::Validation, "second");

        assert_eq!(doc.section("form").unwrap().messages.len(), 1);
        assert!(doc.section("repos").unwrap().messages.is_empty());
        assert_eq!(doc.message("form-error-msg").unwrap().text, "first");
    }

    #[test]
    fn test_remove_msg_finds_any_section() {
        let mut doc = Document::new("t");
        doc.show_msg("repos", "get-repos-error-msg", MessageKind::Error, "oops");

        assert!(doc.remove_msg("get-repos-error-msg"));
        assert!(!doc.remove_msg("get-repos-error-msg"));
        assert_eq!(doc.failures().count(), 0);
    }

    #[test]
    fn test_clear_drops_blocks_and_messages_of_one_section() {
        let mut doc = Document::with_sections("t", &["user-info", "repos"]);
        doc.push("user-info", Block::text("octocat"));
        doc.show_msg("user-info", "loading", MessageKind::Loading, "Loading...");
        doc.push("repos", Block::text("repo"));

        doc.clear("user-info");

        assert!(doc.section("user-info").unwrap().is_empty());
        assert_eq!(doc.section("repos").unwrap().blocks.len(), 1);
        assert_eq!(doc.sections()[0].id, "user-info");
    }
}
