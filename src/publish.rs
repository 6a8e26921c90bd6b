//! `postkit publish`: move a post's images into its asset folder.
//!
//! Order of operations (there is no rollback, so each step leaves a usable
//! state if the next one never runs):
//!
//! 1. copy every local image referenced by Markdown or `<img>` syntax into
//!    `<post-dir>/<post-name>/` and rewrite the reference to
//!    `{% asset_img <file> %}`
//! 2. replace or prepend the front matter
//! 3. write the post back in place
//! 4. delete the originals that were copied
//!
//! References already written as `{% asset_img %}` are never matched by the
//! rewrite patterns, so running the command again only refreshes the front
//! matter.

use crate::{
    config::SiteConfig,
    front_matter::{FrontMatter, HeaderAction, apply_front_matter, parse_tags},
    images::{HTML_IMAGE_TAG, MARKDOWN_IMAGE, is_external, resolve_image_path},
    log,
    post::PostPaths,
    utils::fs::FileSystem,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use regex::Captures;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

/// Arguments of a publish run.
#[derive(Debug, Clone)]
pub struct PublishRequest<'a> {
    /// Post file, absolute or relative to `[paths.posts]`.
    pub post: &'a Path,
    pub title: &'a str,
    /// Comma-separated tag list as typed on the command line.
    pub tags: Option<&'a str>,
    /// Timestamp written to the `date:` field.
    pub date: DateTime<Local>,
}

/// Outcome of a publish run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub post: PathBuf,
    /// `<post-dir>/<post-name>/`
    pub asset_folder: PathBuf,
    /// Number of image references rewritten to `{% asset_img %}`.
    pub rewritten: usize,
    /// Originals copied into the asset folder, in first-reference order.
    pub copied: Vec<PathBuf>,
    /// Referenced images not found on disk (rewritten anyway).
    pub missing: Vec<PathBuf>,
    /// Images that exist but could not be copied (rewritten anyway).
    pub failed: Vec<PathBuf>,
    /// Originals removed after the post was saved.
    pub deleted: Vec<PathBuf>,
    /// Originals that could not be removed.
    pub delete_failures: Vec<PathBuf>,
    pub header: HeaderAction,
}

/// Publish the post described by `request`.
pub fn publish_post<F: FileSystem + ?Sized>(
    fs: &F,
    config: &SiteConfig,
    request: &PublishRequest<'_>,
) -> Result<PublishReport> {
    let post = PostPaths::locate(fs, request.post, &config.paths.posts)?;
    let text = fs
        .read_to_string(&post.file)
        .with_context(|| format!("Failed to read {}", post.file.display()))?;
    let front_matter = FrontMatter::new(
        request.title,
        &request.date,
        &config.publish.date_format,
        parse_tags(request.tags),
    );

    let asset_folder = post.asset_dir();
    log!("publish"; "post: {}", post.file.display());
    if !fs.is_dir(&asset_folder) {
        fs.create_dir_all(&asset_folder)
            .with_context(|| format!("Failed to create {}", asset_folder.display()))?;
        log!("publish"; "created asset folder {}/", post.stem);
    }

    let mut mover = AssetMover::new(fs, &post, &asset_folder);
    let text = mover.rewrite(&text);

    let (text, header) = apply_front_matter(&text, &front_matter);
    match header {
        HeaderAction::Added => log!("publish"; "added front matter"),
        HeaderAction::Replaced => log!("publish"; "updated existing front matter"),
    }

    fs.write(&post.file, &text)
        .with_context(|| format!("Failed to write {}", post.file.display()))?;
    log!("publish"; "saved {}", post.file.display());

    let (deleted, delete_failures) = mover.remove_originals();
    let AssetMover {
        copied,
        missing,
        failed,
        rewritten,
        ..
    } = mover;

    log!(
        "publish";
        "done: {} images copied to {}",
        copied.len(),
        asset_folder.display()
    );

    Ok(PublishReport {
        post: post.file,
        asset_folder,
        rewritten,
        copied,
        missing,
        failed,
        deleted,
        delete_failures,
        header,
    })
}

/// Format an asset tag for `file_name`.
pub fn asset_tag(file_name: &str) -> String {
    format!("{{% asset_img {file_name} %}}")
}

/// Whether a raw image path should be moved into the asset folder.
///
/// External links, site-absolute paths (`/images/a.png`) and template
/// placeholders are left alone.
fn is_movable(raw: &str) -> bool {
    !raw.is_empty() && !is_external(raw) && !raw.starts_with('/') && !raw.starts_with("{%")
}

/// File name of a raw image path. `None` for directory-like paths such as
/// `img/` or `..`.
fn image_file_name(raw: &str) -> Option<&str> {
    if raw.ends_with(['/', '\\']) {
        return None;
    }
    Path::new(raw).file_name().and_then(|name| name.to_str())
}

// ============================================================================
// Asset Mover
// ============================================================================

/// Rewrites image references and tracks which originals were copied.
struct AssetMover<'a, F: ?Sized> {
    fs: &'a F,
    post_dir: &'a Path,
    asset_folder: &'a Path,
    asset_folder_name: &'a str,
    seen: FxHashSet<PathBuf>,
    copied: Vec<PathBuf>,
    missing: Vec<PathBuf>,
    failed: Vec<PathBuf>,
    rewritten: usize,
}

impl<'a, F: FileSystem + ?Sized> AssetMover<'a, F> {
    fn new(fs: &'a F, post: &'a PostPaths, asset_folder: &'a Path) -> Self {
        Self {
            fs,
            post_dir: &post.dir,
            asset_folder,
            asset_folder_name: &post.stem,
            seen: FxHashSet::default(),
            copied: Vec::new(),
            missing: Vec::new(),
            failed: Vec::new(),
            rewritten: 0,
        }
    }

    /// Rewrite Markdown images first, then whole `<img>` tags.
    fn rewrite(&mut self, text: &str) -> String {
        let text = MARKDOWN_IMAGE
            .replace_all(text, |caps: &Captures| self.replace(&caps[0], &caps[2]))
            .into_owned();
        HTML_IMAGE_TAG
            .replace_all(&text, |caps: &Captures| self.replace(&caps[0], &caps[1]))
            .into_owned()
    }

    /// Replacement for one matched reference.
    fn replace(&mut self, matched: &str, raw: &str) -> String {
        let raw = raw.trim();
        if !is_movable(raw) {
            return matched.to_owned();
        }
        let Some(file_name) = image_file_name(raw) else {
            log!("warn"; "image path has no file name, left as is: {raw}");
            return matched.to_owned();
        };

        let source = resolve_image_path(raw, self.post_dir);
        if !self.fs.is_file(&source) {
            log!("warn"; "image not found: {}", source.display());
            self.missing.push(source);
        } else if self.seen.insert(source.clone()) {
            self.copy(source, file_name);
        }

        self.rewritten += 1;
        asset_tag(file_name)
    }

    fn copy(&mut self, source: PathBuf, file_name: &str) {
        let dest = self.asset_folder.join(file_name);
        // Already inside the asset folder: nothing to move, and nothing to delete.
        if dest == source {
            return;
        }

        match self.fs.copy_file(&source, &dest) {
            Ok(()) => {
                log!("publish"; "copied {} -> {}/", file_name, self.asset_folder_name);
                self.copied.push(source);
            }
            Err(err) => {
                log!("warn"; "failed to copy {}: {err}", source.display());
                self.failed.push(source);
            }
        }
    }

    /// Delete copied originals. Returns (deleted, failed).
    fn remove_originals(&self) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let mut deleted = Vec::new();
        let mut failures = Vec::new();

        for source in &self.copied {
            if !self.fs.exists(source) {
                continue;
            }
            match self.fs.remove_file(source) {
                Ok(()) => {
                    log!("publish"; "deleted original {}", source.display());
                    deleted.push(source.clone());
                }
                Err(err) => {
                    log!("warn"; "failed to delete {}: {err}", source.display());
                    failures.push(source.clone());
                }
            }
        }

        (deleted, failures)
    }
}

// ============================================================================
// Tests
// ============================================================================
