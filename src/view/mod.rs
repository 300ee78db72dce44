// src/view/mod.rs
// =============================================================================
// Everything about what a page looks like.
//
// Submodules:
// - document: the page model (sections, blocks, messages, actions)
// - render: Document -> terminal text
// - copy_button: clipboard buttons with their own reset timers
// - languages: language percentages and colours
// - components: avatar and the GitHub/clone buttons row
// - dates: "Jan 5, 2024" and "3 days ago"
// - icon: glyphs
// =============================================================================

pub mod components;
mod copy_button;
pub mod dates;
mod document;
pub mod highlight;
mod icon;
pub mod languages;
mod render;

pub use copy_button::{Clipboard, CopyButton, CopyState, SystemClipboard};
pub use document::{Action, Block, CodeView, Document, MessageKind};
pub use icon::Icon;
pub use languages::{LanguageBreakdown, LanguagePalette};
pub use render::{render, RenderOptions};

#[cfg(test)]
pub(crate) use copy_button::tests::RecordingClipboard;
