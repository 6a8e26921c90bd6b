//! Front matter block written by `publish`.
//!
//! ```text
//! ---
//! title: Hello
//! date: 2026-02-12 16:30:00
//! tags:
//!   - rust
//!   - cli
//! ---
//!
//! ```
//!
//! The `tags:` section is omitted when there are no tags. A post ends up with
//! exactly one block: an existing one at the top of the document is replaced
//! wholesale, otherwise the new one is prepended.

use chrono::{DateTime, Local};
use regex::{NoExpand, Regex};
use std::{fmt::Write, sync::LazyLock};

/// `---` line, anything, `---` line, anchored at the start of the document.
///
/// The body may be empty and the closing line may end the file. Blank lines
/// after the block belong to it, so a rewritten header keeps one.
static FRONT_MATTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\r?\n(?:.*?\r?\n)??---[ \t]*(?:\r?\n|\z)(?:[ \t]*\r?\n)*").unwrap()
});

/// What happened to the header of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    Added,
    Replaced,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    /// Already formatted timestamp.
    pub date: String,
    pub tags: Vec<String>,
}

impl FrontMatter {
    pub fn new(title: &str, date: &DateTime<Local>, date_format: &str, tags: Vec<String>) -> Self {
        Self {
            title: title.to_owned(),
            date: date.format(date_format).to_string(),
            tags,
        }
    }

    /// Render the block, followed by one blank line.
    pub fn render(&self) -> String {
        let mut block = format!("---\ntitle: {}\ndate: {}\n", self.title, self.date);
        if !self.tags.is_empty() {
            block.push_str("tags:\n");
            for tag in &self.tags {
                let _ = writeln!(block, "  - {tag}");
            }
        }
        block.push_str("---\n\n");
        block
    }
}

/// Split a comma-separated tag list, trimming entries and dropping empty ones.
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

/// Whether `text` starts with a front matter block.
pub fn has_front_matter(text: &str) -> bool {
    FRONT_MATTER.is_match(text)
}

/// Replace the leading front matter block of `text`, or prepend one.
pub fn apply_front_matter(text: &str, front_matter: &FrontMatter) -> (String, HeaderAction) {
    let block = front_matter.render();
    if has_front_matter(text) {
        let replaced = FRONT_MATTER.replace(text, NoExpand(&block)).into_owned();
        (replaced, HeaderAction::Replaced)
    } else {
        (block + text, HeaderAction::Added)
    }
}
