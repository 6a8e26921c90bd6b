//! Locating a post on disk.

use crate::utils::{
    fs::FileSystem,
    path::{file_stem, normalize},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that stop a command before anything is written.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("post not found: `{0}`")]
    NotFound(PathBuf),

    #[error("post path has no file name: `{0}`")]
    InvalidName(PathBuf),
}

/// Resolved locations of a single post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPaths {
    /// Absolute path of the post file.
    pub file: PathBuf,
    /// Directory containing the post; image references resolve against it.
    pub dir: PathBuf,
    /// File name without extension, e.g. `my-post` for `my-post.md`.
    pub stem: String,
}

impl PostPaths {
    /// Resolve a post argument without touching the filesystem.
    ///
    /// Absolute arguments are used as given, anything else is taken relative
    /// to `posts_root`.
    pub fn resolve(arg: &Path, posts_root: &Path) -> Result<Self, PostError> {
        let file = if arg.is_absolute() {
            normalize(arg)
        } else {
            normalize(&posts_root.join(arg))
        };

        let stem = file_stem(&file)
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| PostError::InvalidName(arg.to_path_buf()))?
            .to_owned();
        let dir = file
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| PostError::InvalidName(arg.to_path_buf()))?;

        Ok(Self { file, dir, stem })
    }

    /// Resolve and require the post file to exist.
    pub fn locate<F: FileSystem + ?Sized>(
        fs: &F,
        arg: &Path,
        posts_root: &Path,
    ) -> Result<Self, PostError> {
        let post = Self::resolve(arg, posts_root)?;
        if !fs.is_file(&post.file) {
            return Err(PostError::NotFound(post.file));
        }
        Ok(post)
    }

    /// Sibling directory named after the post (`<dir>/<stem>/`).
    ///
    /// Hexo's post asset folder; the backup command copies it as the
    /// post's resource folder.
    pub fn asset_dir(&self) -> PathBuf {
        self.dir.join(&self.stem)
    }

    /// File name of the post including its extension.
    pub fn file_name(&self) -> &std::ffi::OsStr {
        self.file.file_name().unwrap_or(self.file.as_os_str())
    }
}
