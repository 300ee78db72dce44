// src/view/icon.rs
// Glyphs shown next to page content.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    User,
    Globe,
    Branch,
    Clock,
    Eye,
    Link,
    External,
    File,
    FolderClosed,
    FolderOpen,
    Submodule,
    Clipboard,
    ClipboardCheck,
    Code,
    Download,
}

impl Icon {
    pub fn glyph(self) -> &'static str {
        match self {
            Icon::User => "👤",
            Icon::Globe => "🌐",
            Icon::Branch => "⎇",
            Icon::Clock => "🕒",
            Icon::Eye => "👁",
            Icon::Link => "🔗",
            Icon::External => "↗",
            Icon::File => "📄",
            Icon::FolderClosed => "📁",
            Icon::FolderOpen => "📂",
            Icon::Submodule => "📦",
            Icon::Clipboard => "📋",
            Icon::ClipboardCheck => "✅",
            Icon::Code => "</>",
            Icon::Download => "⬇",
        }
    }
}
