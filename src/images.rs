//! Image reference extraction.
//!
//! A post embeds local images in three ways:
//!
//! | Syntax     | Example                          | Captured        |
//! |------------|----------------------------------|-----------------|
//! | Markdown   | `![alt](./img/cat.png)`          | `./img/cat.png` |
//! | HTML       | `<img class="x" src='cat.png'>`  | `cat.png`       |
//! | Asset tag  | `{% asset_img cat.png %}`        | `cat.png`       |
//!
//! Each syntax has its own matcher. [`scan`] runs them in that order, drops
//! external links, resolves what is left against the post directory and
//! keeps the first occurrence of every resolved path. Whether the file
//! actually exists is left to the caller.

use crate::utils::path::{is_absolute_like, normalize};
use regex::Regex;
use rustc_hash::FxHashSet;
use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

/// `![alt](path)`; group 2 is the path.
pub static MARKDOWN_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());

/// `<img ... src="path"` up to the end of the `src` value; group 1 is the path.
static HTML_IMAGE_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<img[^>]+src=["']([^"']+)["']"#).unwrap());

/// A whole `<img ...>` tag; group 1 is the `src` value.
pub static HTML_IMAGE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<img[^>]+src=["']([^"']+)["'][^>]*>"#).unwrap());

/// `{% asset_img name %}`; group 1 is the name.
static ASSET_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%\s*asset_img\s+(\S+)\s*%\}").unwrap());

/// Prefixes of references that are never copied.
const EXTERNAL_PREFIXES: &[&str] = &["http://", "https://", "//"];

// ============================================================================
// Types
// ============================================================================

/// The syntax an image reference was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSyntax {
    Markdown,
    Html,
    AssetTag,
}

impl ImageSyntax {
    /// All syntaxes in matching priority order.
    pub const ALL: [Self; 3] = [Self::Markdown, Self::Html, Self::AssetTag];

    /// Raw path captures of this syntax in `text`, in document order.
    pub fn matches(self, text: &str) -> Vec<&str> {
        match self {
            Self::Markdown => markdown_refs(text),
            Self::Html => html_refs(text),
            Self::AssetTag => asset_tag_refs(text),
        }
    }
}

/// One local image reference found in a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub syntax: ImageSyntax,
    /// Path as written, trimmed.
    pub raw: String,
    /// Absolute, normalized path on disk.
    pub resolved: PathBuf,
}

// ============================================================================
// Matchers
// ============================================================================

pub fn markdown_refs(text: &str) -> Vec<&str> {
    captures(&MARKDOWN_IMAGE, text, 2)
}

pub fn html_refs(text: &str) -> Vec<&str> {
    captures(&HTML_IMAGE_SRC, text, 1)
}

pub fn asset_tag_refs(text: &str) -> Vec<&str> {
    captures(&ASSET_TAG, text, 1)
}

fn captures<'t>(re: &Regex, text: &'t str, group: usize) -> Vec<&'t str> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(group))
        .map(|m| m.as_str())
        .collect()
}

// ============================================================================
// Classification & Resolution
// ============================================================================

/// `http://`, `https://` and protocol-relative `//` references.
pub fn is_external(raw: &str) -> bool {
    EXTERNAL_PREFIXES.iter().any(|prefix| raw.starts_with(prefix))
}

/// Resolve a raw reference against the post directory.
///
/// Absolute references (including `C:\...` and `\\server\...`) are used
/// verbatim; everything else is joined onto `base_dir` and normalized.
pub fn resolve_image_path(raw: &str, base_dir: &Path) -> PathBuf {
    if is_absolute_like(raw) {
        PathBuf::from(raw)
    } else {
        normalize(&base_dir.join(raw))
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// All distinct local image references in `text`, first occurrence wins.
pub fn scan(text: &str, base_dir: &Path) -> Vec<ImageRef> {
    let mut seen = FxHashSet::default();
    let mut refs = Vec::new();

    for syntax in ImageSyntax::ALL {
        for raw in syntax.matches(text) {
            let raw = raw.trim();
            if raw.is_empty() || is_external(raw) {
                continue;
            }

            let resolved = resolve_image_path(raw, base_dir);
            if seen.insert(resolved.clone()) {
                refs.push(ImageRef {
                    syntax,
                    raw: raw.to_owned(),
                    resolved,
                });
            }
        }
    }

    refs
}

/// Distinct resolved image paths referenced by `text`.
pub fn extract_image_paths(text: &str, base_dir: &Path) -> Vec<PathBuf> {
    scan(text, base_dir)
        .into_iter()
        .map(|image| image.resolved)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
