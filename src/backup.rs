//! `postkit backup`: copy a post and everything it references.
//!
//! ```text
//! source/_posts/my-post.md          page-tmp/my-post/my-post.md
//! source/_posts/img/cat.png    →    page-tmp/my-post/cat.png
//! source/_posts/my-post/...         page-tmp/my-post/my-post/...
//! ```
//!
//! The source post and its images are only read. A missing image is
//! reported and skipped; a missing post stops the command before anything
//! is written.

use crate::{config::SiteConfig, images, log, post::PostPaths, utils::fs::FileSystem};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Outcome of a backup run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BackupReport {
    /// Absolute path of the source post.
    pub post: PathBuf,
    /// `<backup-root>/<post-name>/`
    pub folder: PathBuf,
    /// Number of distinct local image references found.
    pub referenced: usize,
    /// Source paths of images copied into the backup folder.
    pub copied_images: Vec<PathBuf>,
    /// Referenced images not found on disk.
    pub missing_images: Vec<PathBuf>,
    /// Images that exist but could not be copied.
    pub failed_images: Vec<PathBuf>,
    /// Destination of the copied resource folder, if the post has one.
    pub resource_folder: Option<PathBuf>,
}

/// Back up the post at `post_arg` (absolute or relative to `[paths.posts]`).
pub fn backup_post<F: FileSystem + ?Sized>(
    fs: &F,
    config: &SiteConfig,
    post_arg: &Path,
) -> Result<BackupReport> {
    let post = PostPaths::locate(fs, post_arg, &config.paths.posts)?;
    let content = fs
        .read_to_string(&post.file)
        .with_context(|| format!("Failed to read {}", post.file.display()))?;

    let folder = config.paths.backup.join(&post.stem);
    fs.create_dir_all(&folder)
        .with_context(|| format!("Failed to create {}", folder.display()))?;

    let post_copy = folder.join(post.file_name());
    fs.copy_file(&post.file, &post_copy)
        .with_context(|| format!("Failed to copy post to {}", post_copy.display()))?;
    log!("backup"; "copied {}", post.file_name().to_string_lossy());

    let mut report = BackupReport {
        post: post.file.clone(),
        folder: folder.clone(),
        ..Default::default()
    };

    let image_paths = images::extract_image_paths(&content, &post.dir);
    report.referenced = image_paths.len();
    if !image_paths.is_empty() {
        log!("backup"; "image references: {}", image_paths.len());
    }
    for image in image_paths {
        copy_image(fs, &image, &folder, &mut report);
    }

    let resource_dir = post.asset_dir();
    if fs.is_dir(&resource_dir) {
        let dest = folder.join(&post.stem);
        match fs.copy_dir_all(&resource_dir, &dest) {
            Ok(copied) => {
                log!("backup"; "copied resource folder {}/ ({} files)", post.stem, copied);
                report.resource_folder = Some(dest);
            }
            Err(err) => {
                log!("warn"; "failed to copy resource folder {}: {err}", resource_dir.display());
            }
        }
    }

    log!("backup"; "done: {}", folder.display());
    Ok(report)
}

/// Copy one referenced image into the backup folder by file name.
fn copy_image<F: FileSystem + ?Sized>(
    fs: &F,
    image: &Path,
    folder: &Path,
    report: &mut BackupReport,
) {
    if !fs.is_file(image) {
        log!("warn"; "image not found: {}", image.display());
        report.missing_images.push(image.to_path_buf());
        return;
    }

    let Some(name) = image.file_name() else {
        log!("warn"; "image path has no file name: {}", image.display());
        report.failed_images.push(image.to_path_buf());
        return;
    };

    match fs.copy_file(image, &folder.join(name)) {
        Ok(()) => {
            log!("backup"; "copied image {}", name.to_string_lossy());
            report.copied_images.push(image.to_path_buf());
        }
        Err(err) => {
            log!("warn"; "failed to copy {}: {err}", image.display());
            report.failed_images.push(image.to_path_buf());
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
