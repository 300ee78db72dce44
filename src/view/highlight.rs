// src/view/highlight.rs
// =============================================================================
// Language detection and syntax highlighting for the file viewer.
//
// Both come from syntect's bundled Sublime Text syntaxes:
// 1. detect_language() picks a syntax by file extension, then by the whole
//    file name (Makefile, Dockerfile-like names), then by the first line
//    (shebangs, <?xml ...>), and falls back to "Plain Text"
// 2. highlight_lines() colours each line with a dark theme, giving the
//    renderer (colour, text) spans it turns into crossterm colours
//
// A few common languages have no bundled syntax (TypeScript, TOML, ...).
// They still get a proper label from EXTRA_LANGUAGES but are shown
// uncoloured.
//
// Loading the syntax set is not free, so it happens once per process, on
// first use.
// =============================================================================

use std::sync::OnceLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use tracing::debug;

pub const PLAIN_TEXT: &str = "Plain Text";

const THEME: &str = "base16-ocean.dark";

// Labels for extensions the bundled syntaxes don't know
const EXTRA_LANGUAGES: &[(&str, &[&str])] = &[
    ("TypeScript", &["ts", "tsx", "mts", "cts"]),
    ("TOML", &["toml"]),
    ("Kotlin", &["kt", "kts"]),
    ("Swift", &["swift"]),
    ("SCSS", &["scss"]),
    ("Dockerfile", &["dockerfile"]),
    ("Vue", &["vue"]),
    ("Svelte", &["svelte"]),
    ("Zig", &["zig"]),
    ("Elixir", &["ex", "exs"]),
    ("Dart", &["dart"]),
    ("Nix", &["nix"]),
];

// A run of text drawn in one colour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub rgb: (u8, u8, u8),
    pub text: String,
}

fn syntaxes() -> &'static SyntaxSet {
    static SYNTAXES: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAXES.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> Option<&'static Theme> {
    static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(ThemeSet::load_defaults).themes.get(THEME)
}

// The language label for a file, from its name and first line
pub fn detect_language(file_name: &str, content: &str) -> String {
    let name = file_name.rsplit('/').next().unwrap_or(file_name);
    let extension = name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase());

    if let Some(ext) = extension.as_deref() {
        if let Some(syntax) = syntaxes().find_syntax_by_extension(ext) {
            return syntax.name.clone();
        }
        if let Some((language, _)) = EXTRA_LANGUAGES
            .iter()
            .find(|(_, exts)| exts.contains(&ext))
        {
            return language.to_string();
        }
    }

    // Extensionless names like "Makefile" are listed as extensions too
    if let Some(syntax) = syntaxes().find_syntax_by_extension(name) {
        return syntax.name.clone();
    }
    if let Some((language, _)) = EXTRA_LANGUAGES
        .iter()
        .find(|(_, exts)| exts.contains(&name.to_lowercase().as_str()))
    {
        return language.to_string();
    }

    let first_line = content.lines().next().unwrap_or("");
    match syntaxes().find_syntax_by_first_line(first_line) {
        Some(syntax) => syntax.name.clone(),
        None => PLAIN_TEXT.to_string(),
    }
}

fn syntax_for(language: &str) -> Option<&'static SyntaxReference> {
    if language == PLAIN_TEXT {
        return None;
    }
    syntaxes().find_syntax_by_name(language)
}

// Coloured spans per line of `content`, one entry per `content.lines()` item
//
// None when the language has no syntax or highlighting fails midway; the
// caller then prints the lines as they are
pub fn highlight_lines(language: &str, content: &str) -> Option<Vec<Vec<Span>>> {
    let syntax = syntax_for(language)?;
    let mut highlighter = HighlightLines::new(syntax, theme()?);

    let mut lines = Vec::new();
    for line in LinesWithEndings::from(content) {
        let ranges = match highlighter.highlight_line(line, syntaxes()) {
            Ok(ranges) => ranges,
            Err(e) => {
                debug!(language, error = %e, "highlighting failed");
                return None;
            }
        };

        let spans = ranges
            .into_iter()
            .map(|(style, text)| Span {
                rgb: (style.foreground.r, style.foreground.g, style.foreground.b),
                text: text.trim_end_matches(['\n', '\r']).to_string(),
            })
            .filter(|span| !span.text.is_empty())
            .collect();
        lines.push(spans);
    }
    Some(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(detect_language("src/main.rs", ""), "Rust");
        assert_eq!(detect_language("app/models.PY", ""), "Python");
        assert_eq!(detect_language("index.js", ""), "JavaScript");
        assert_eq!(detect_language("web/App.tsx", ""), "TypeScript");
        assert_eq!(detect_language("Cargo.toml", ""), "TOML");
    }

    #[test]
    fn test_detect_by_name_and_first_line() {
        assert_eq!(detect_language("Makefile", "all:\n"), "Makefile");
        assert_ne!(detect_language("bin/build", "#!/bin/bash\necho hi\n"), PLAIN_TEXT);
        assert_eq!(detect_language("notes", "hello\n"), PLAIN_TEXT);
        assert_eq!(detect_language("clip.weird", "hi"), PLAIN_TEXT);
    }

    #[test]
    fn test_highlight_keeps_the_text() {
        let content = "fn main() {\n    let x = 1;\n}\n";
        let lines = highlight_lines("Rust", content).unwrap();

        assert_eq!(lines.len(), content.lines().count());
        for (spans, line) in lines.iter().zip(content.lines()) {
            let joined: String = spans.iter().map(|s| s.text.as_str()).collect();
            assert_eq!(joined, line);
        }

        let colours: std::collections::HashSet<_> =
            lines.iter().flatten().map(|s| s.rgb).collect();
        assert!(colours.len() > 1);
    }

    #[test]
    fn test_no_highlight_without_syntax() {
        assert!(highlight_lines(PLAIN_TEXT, "hello").is_none());
        assert!(highlight_lines("TypeScript", "let x = 1").is_none());
    }
}
