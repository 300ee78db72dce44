// src/view/render.rs
// =============================================================================
// Turns a Document into terminal text.
//
// Every interactive block gets a number like [3] in the order it appears.
// The same walk that prints the numbers collects the actions, so
// `actions[n - 1]` is always what [n] shows.
//
// Colours go through crossterm and are skipped entirely when disabled, so
// the uncoloured output is plain text (handy for pipes and tests).
// =============================================================================

use crate::view::document::{Action, Block, CodeView, Document, Message, MessageKind};
use crate::view::highlight::{highlight_lines, Span};
use crate::view::icon::Icon;
use crate::view::languages::LanguageBreakdown;
use crossterm::style::{style, Color, StyledContent, Stylize};

const BAR_WIDTH: usize = 40;
const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub color: bool,
    /// Print where links lead (route strings, URLs) next to their text
    pub show_targets: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: false,
            show_targets: true,
        }
    }
}

#[derive(Debug)]
pub struct Rendered {
    pub text: String,
    /// actions[n - 1] belongs to the block shown as [n]
    pub actions: Vec<Action>,
}

pub fn render(doc: &Document, options: &RenderOptions) -> Rendered {
    let mut renderer = Renderer {
        options,
        out: String::new(),
        actions: Vec::new(),
        anchored: &[],
    };

    let title = format!("━━ {} ━━", doc.title);
    let title = renderer.paint(&title, |s| s.bold());
    renderer.out.push_str(&title);
    renderer.out.push('\n');

    for section in doc.sections().iter().filter(|s| !s.is_empty()) {
        renderer.out.push('\n');
        renderer.anchored = section.messages.as_slice();
        for block in &section.blocks {
            renderer.block(block, 0);
        }

        // Everything not already printed below its block
        let mut anchors = Vec::new();
        collect_anchors(&section.blocks, &mut anchors);
        for message in &section.messages {
            let placed = message
                .anchor
                .as_deref()
                .is_some_and(|anchor| anchors.contains(&anchor));
            if !placed {
                renderer.message(message, 0);
            }
        }
    }

    Rendered {
        text: renderer.out,
        actions: renderer.actions,
    }
}

struct Renderer<'a> {
    options: &'a RenderOptions,
    out: String,
    actions: Vec<Action>,
    /// Messages of the section being rendered
    anchored: &'a [Message],
}

impl Renderer<'_> {
    fn paint(
        &self,
        text: &str,
        styler: impl FnOnce(StyledContent<String>) -> StyledContent<String>,
    ) -> String {
        if self.options.color {
            styler(style(text.to_string())).to_string()
        } else {
            text.to_string()
        }
    }

    fn line(&mut self, depth: usize, text: &str) {
        for line in text.split('\n') {
            self.out.push_str(&INDENT.repeat(depth));
            self.out.push_str(line);
            self.out.push('\n');
        }
    }

    // Registers the action and returns its "[n]" label
    fn number(&mut self, action: Action) -> String {
        self.actions.push(action);
        let label = format!("[{}]", self.actions.len());
        self.paint(&label, |s| s.cyan())
    }

    fn block(&mut self, block: &Block, depth: usize) {
        match block {
            Block::Group(children) => {
                for child in children {
                    self.block(child, depth + 1);
                }
                if depth == 0 {
                    self.out.push('\n');
                }
            }
            Block::Row(children) => {
                if children.iter().all(is_inline) {
                    let pieces: Vec<String> = children.iter().map(|c| self.piece(c)).collect();
                    self.line(depth, &pieces.join("   "));
                } else {
                    for child in children {
                        self.block(child, depth);
                    }
                }
            }
            Block::Languages(breakdown) => self.languages(breakdown, depth),
            Block::TreeItem { depth: level, .. } => {
                let piece = self.piece(block);
                self.line(depth + level, &piece);
                if let Some(anchor) = block.anchor() {
                    let messages = self.anchored;
                    for message in messages
                        .iter()
                        .filter(|m| m.anchor.as_deref() == Some(anchor))
                    {
                        self.message(message, depth + level + 1);
                    }
                }
            }
            Block::Code(code) => self.code(code, depth),
            Block::Image { mime, size } => {
                self.line(depth, &format!("🖼  {} image, {} bytes", mime, size));
            }
            Block::Video { url } => {
                self.line(depth, &format!("🎬 video: {}", url));
            }
            _ => {
                let piece = self.piece(block);
                self.line(depth, &piece);
            }
        }
    }

    // Single-line rendering of an inline block
    fn piece(&mut self, block: &Block) -> String {
        match block {
            Block::Heading(text) => self.paint(text, |s| s.bold()),
            Block::Text(text) => text.clone(),
            Block::Item { icon, text } => format!("{} {}", icon.glyph(), text),
            Block::Link { icon, text, action } => {
                let number = self.number(action.clone());
                let target = self.target(action);
                match icon {
                    Some(icon) => format!("{} {} {}{}", number, icon.glyph(), text, target),
                    None => format!("{} {}{}", number, text, target),
                }
            }
            Block::Copy(button) => {
                let number = self.number(Action::Copy(button.clone()));
                let label = if button.label().is_empty() {
                    "copy"
                } else {
                    button.label()
                };
                format!("{} {} {}", number, button.icon().glyph(), label)
            }
            Block::Avatar(avatar) => {
                if avatar.url.is_empty() {
                    Icon::User.glyph().to_string()
                } else if avatar.size >= 100 {
                    format!("🖼  {}", avatar.url)
                } else {
                    "◉".to_string()
                }
            }
            Block::TreeItem {
                icon, name, action, ..
            } => match action {
                Some(action) => {
                    let number = self.number(action.clone());
                    format!("{} {} {}", number, icon.glyph(), name)
                }
                None => format!("    {} {}", icon.glyph(), name),
            },
            _ => String::new(),
        }
    }

    fn target(&self, action: &Action) -> String {
        if !self.options.show_targets {
            return String::new();
        }
        match action {
            Action::Navigate(route) => {
                let hint = format!("  → open '{}'", route);
                self.paint(&hint, |s| s.dim())
            }
            Action::External(url) => {
                let hint = format!("  ({})", url);
                self.paint(&hint, |s| s.dim())
            }
            _ => String::new(),
        }
    }

    fn languages(&mut self, breakdown: &LanguageBreakdown, depth: usize) {
        let bar: String = breakdown
            .bar_cells(BAR_WIDTH)
            .into_iter()
            .map(|(rgb, cells)| {
                let color = Color::Rgb {
                    r: rgb.r,
                    g: rgb.g,
                    b: rgb.b,
                };
                self.paint(&"█".repeat(cells), |s| s.with(color))
            })
            .collect();
        self.line(depth, &bar);

        let lines: Vec<String> = breakdown
            .listed()
            .map(|share| {
                let color = Color::Rgb {
                    r: share.color.r,
                    g: share.color.g,
                    b: share.color.b,
                };
                let bullet = self.paint("●", |s| s.with(color));
                let percent = self.paint(&format!("{:.1}%", share.percent), |s| s.with(color));
                format!("{} {} {}", bullet, share.name, percent)
            })
            .collect();
        for line in lines {
            self.line(depth, &line);
        }
    }

    fn code(&mut self, code: &CodeView, depth: usize) {
        let label = format!("[{}]", code.language);
        let label = self.paint(&label, |s| s.dim());
        self.line(depth, &label);

        let lines: Vec<&str> = code.content.lines().collect();
        let highlighted = if self.options.color {
            highlight_lines(&code.language, &code.content)
        } else {
            None
        };

        let width = lines.len().max(1).to_string().len();
        for (index, text) in lines.iter().enumerate() {
            let number = format!("{:>width$} │", index + 1, width = width);
            let number = self.paint(&number, |s| s.dim());
            let text = match highlighted.as_ref().and_then(|h| h.get(index)) {
                Some(spans) => spans.iter().map(|span| self.span(span)).collect(),
                None => text.to_string(),
            };
            self.out.push_str(&INDENT.repeat(depth));
            self.out.push_str(&number);
            self.out.push(' ');
            self.out.push_str(&text);
            self.out.push('\n');
        }
    }

    fn span(&self, span: &Span) -> String {
        let (r, g, b) = span.rgb;
        self.paint(&span.text, |s| s.with(Color::Rgb { r, g, b }))
    }

    fn message(&mut self, message: &Message, depth: usize) {
        let text = match message.kind {
            MessageKind::Loading => self.paint(&format!("⏳ {}", message.text), |s| s.dim()),
            MessageKind::Error => self.paint(&format!("✖ {}", message.text), |s| s.red()),
            MessageKind::Validation => {
                self.paint(&format!("⚠ {}", message.text), |s| s.yellow())
            }
        };
        self.line(depth, &text);
    }
}

fn collect_anchors<'a>(blocks: &'a [Block], out: &mut Vec<&'a str>) {
    for block in blocks {
        match block {
            Block::Group(children) | Block::Row(children) => collect_anchors(children, out),
            _ => out.extend(block.anchor()),
        }
    }
}

fn is_inline(block: &Block) -> bool {
    matches!(
        block,
        Block::Heading(_)
            | Block::Text(_)
            | Block::Item { .. }
            | Block::Link { .. }
            | Block::Copy(_)
            | Block::Avatar(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::Route;
    use crate::view::CopyButton;
    use std::time::Duration;

    fn sample() -> Document {
        let mut doc = Document::with_sections("octocat", &["user-info", "repos"]);
        doc.push(
            "user-info",
            Block::Row(vec![
                Block::text("The Octocat"),
                Block::link(
                    Some(Icon::External),
                    "octocat",
                    Action::External("https://github.com/octocat".to_string()),
                ),
            ]),
        );
        doc.push(
            "repos",
            Block::Group(vec![
                Block::link(
                    None,
                    "hello-world",
                    Action::Navigate(Route::Repo {
                        url: "https://api.github.com/repos/octocat/hello-world".to_string(),
                        repo_name: "octocat/hello-world".to_string(),
                        tree_url: None,
                        sha: None,
                    }),
                ),
                Block::Copy(CopyButton::new("clone url", "x", Duration::from_secs(1))),
            ]),
        );
        doc.show_msg("repos", "get-repos-error-msg", MessageKind::Error, "can't get repos");
        doc
    }

    #[test]
    fn test_numbers_match_actions() {
        let rendered = render(&sample(), &RenderOptions::default());

        assert_eq!(rendered.actions.len(), 3);
        assert!(rendered.text.contains("[1] ↗ octocat  (https://github.com/octocat)"));
        assert!(rendered.text.contains("  [2] hello-world  → open 'repo?url="));
        assert!(rendered.text.contains("  [3] 📋 clone url"));
        assert!(matches!(rendered.actions[1], Action::Navigate(Route::Repo { .. })));
        assert!(matches!(rendered.actions[2], Action::Copy(_)));
    }

    #[test]
    fn test_messages_follow_their_section() {
        let text = render(&sample(), &RenderOptions::default()).text;
        let repo = text.find("hello-world").unwrap();
        let error = text.find("✖ can't get repos").unwrap();
        assert!(error > repo);
    }

    #[test]
    fn test_folder_message_sits_below_its_folder() {
        let mut doc = Document::new("o/r");
        let folder = |name: &str| Block::TreeItem {
            depth: 0,
            icon: Icon::FolderClosed,
            name: name.to_string(),
            action: Some(Action::ToggleFolder(name.to_string())),
        };
        doc.extend("tree", [folder("src"), folder("docs")]);
        doc.show_msg_under(
            "tree",
            Some("src"),
            "tree-error-msg:src",
            MessageKind::Error,
            "can't get files of src",
        );
        doc.show_msg_under(
            "tree",
            Some("gone"),
            "tree-error-msg:gone",
            MessageKind::Error,
            "can't get files of gone",
        );

        let text = render(&doc, &RenderOptions::default()).text;
        let src = text.find("src\n").unwrap();
        let error = text.find("  ✖ can't get files of src").unwrap();
        let docs = text.find("docs").unwrap();
        assert!(src < error && error < docs);
        assert_eq!(text.matches("can't get files of src").count(), 1);

        // no block with that anchor: falls back to the end of the section
        assert!(text.find("✖ can't get files of gone").unwrap() > docs);
    }

    #[test]
    fn test_targets_can_be_hidden() {
        let options = RenderOptions {
            color: false,
            show_targets: false,
        };
        let text = render(&sample(), &options).text;
        assert!(!text.contains("open '"));
        assert!(text.contains("[1] ↗ octocat\n"));
    }

    #[test]
    fn test_code_has_line_numbers() {
        let mut doc = Document::new("main.rs");
        doc.push(
            "main",
            Block::Code(CodeView {
                language: "Rust".to_string(),
                content: "fn main() {\n}\n".to_string(),
            }),
        );

        let text = render(&doc, &RenderOptions::default()).text;
        assert!(text.contains("[Rust]\n1 │ fn main() {\n2 │ }\n"));
    }

    #[test]
    fn test_code_is_coloured_when_colours_are_on() {
        let mut doc = Document::new("main.rs");
        doc.push(
            "main",
            Block::Code(CodeView {
                language: "Rust".to_string(),
                content: "fn main() {\n}\n".to_string(),
            }),
        );
        let options = RenderOptions {
            color: true,
            show_targets: true,
        };

        let text = render(&doc, &options).text;
        assert!(text.contains("\u{1b}[38;2;"));
        assert!(text.contains("main"));
    }
}
