// src/view/components.rs
// Small block builders shared by several pages.

use crate::view::copy_button::CopyButton;
use crate::view::document::{Action, Avatar, Block};
use crate::view::icon::Icon;
use std::time::Duration;

pub const DEFAULT_AVATAR_SIZE: u32 = 25;

// A user's picture; an empty URL becomes the placeholder icon when rendered
pub fn avatar(url: &str, size: u32) -> Block {
    Block::Avatar(Avatar {
        url: url.to_string(),
        size,
    })
}

// "see in github" plus the two clone URL copy buttons
pub fn buttons_section(html_url: &str, clone_url: &str, ssh_url: &str, reset: Duration) -> Block {
    Block::Row(vec![
        Block::link(
            Some(Icon::External),
            "see in github",
            Action::External(html_url.to_string()),
        ),
        Block::Copy(CopyButton::new("clone url", clone_url, reset)),
        Block::Copy(CopyButton::new("ssh url", ssh_url, reset)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_section_copies_each_url() {
        let block = buttons_section(
            "https://github.com/o/r",
            "https://github.com/o/r.git",
            "git@github.com:o/r.git",
            Duration::from_millis(2500),
        );

        let Block::Row(items) = block else {
            panic!("expected a row");
        };
        let copied: Vec<_> = items
            .iter()
            .filter_map(|b| match b {
                Block::Copy(button) => Some((button.label(), button.content())),
                _ => None,
            })
            .collect();

        assert_eq!(
            copied,
            vec![
                ("clone url", "https://github.com/o/r.git"),
                ("ssh url", "git@github.com:o/r.git"),
            ]
        );
        assert!(matches!(
            items[0].action(),
            Some(Action::External(url)) if url == "https://github.com/o/r"
        ));
    }
}
