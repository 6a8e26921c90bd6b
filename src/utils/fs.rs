//! Filesystem capability used by the backup and publish commands.
//!
//! Commands never call `std::fs` directly. They take a [`FileSystem`] so the
//! same code runs against the disk ([`DiskFs`]) or, in tests, against an
//! in-memory tree (`MemoryFs`).

use std::{fs, io, path::Path};
use walkdir::WalkDir;

/// Filesystem operations needed to back up and publish a post.
pub trait FileSystem {
    /// Whether anything (file or directory) exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace the contents of `path`. The parent directory must exist.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Copy a single file, overwriting `to`.
    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Recursively copy the directory `from` to `to`, merging into an
    /// existing `to`. Returns the number of files copied.
    fn copy_dir_all(&self, from: &Path, to: &Path) -> io::Result<usize>;
}

// ============================================================================
// Disk
// ============================================================================

/// [`FileSystem`] backed by the real disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

impl FileSystem for DiskFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::copy(from, to).map(|_| ())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn copy_dir_all(&self, from: &Path, to: &Path) -> io::Result<usize> {
        let mut copied = 0;
        for entry in WalkDir::new(from) {
            let entry = entry?;
            let rel = entry.path().strip_prefix(from).map_err(io::Error::other)?;
            let target = to.join(rel);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(entry.path(), &target)?;
                copied += 1;
            }
        }
        Ok(copied)
    }
}

// ============================================================================
// In-memory (tests)
// ============================================================================

#[cfg(test)]
pub use memory::MemoryFs;

#[cfg(test)]
mod memory {
    use super::FileSystem;
    use rustc_hash::FxHashSet;
    use std::{
        cell::RefCell,
        collections::{BTreeMap, BTreeSet},
        io,
        path::{Path, PathBuf},
    };

    /// In-memory [`FileSystem`] for tests.
    ///
    /// Paths are compared verbatim, so tests should use absolute,
    /// already-normalized paths.
    #[derive(Debug, Default)]
    pub struct MemoryFs {
        files: RefCell<BTreeMap<PathBuf, String>>,
        dirs: RefCell<BTreeSet<PathBuf>>,
        /// Paths whose removal fails with `PermissionDenied`.
        locked: FxHashSet<PathBuf>,
        /// Paths that cannot be read, and so cannot be copied either.
        unreadable: FxHashSet<PathBuf>,
    }

    impl MemoryFs {
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a file, creating its parent directories.
        pub fn with_file(self, path: impl AsRef<Path>, contents: &str) -> Self {
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                self.add_dirs(parent);
            }
            self.files
                .borrow_mut()
                .insert(path.to_path_buf(), contents.to_owned());
            self
        }

        pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
            self.add_dirs(path.as_ref());
            self
        }

        /// Make `remove_file` fail for `path`.
        pub fn with_locked(mut self, path: impl AsRef<Path>) -> Self {
            self.locked.insert(path.as_ref().to_path_buf());
            self
        }

        /// Make reads of `path` fail, along with any copy that includes it.
        pub fn with_unreadable(mut self, path: impl AsRef<Path>) -> Self {
            self.unreadable.insert(path.as_ref().to_path_buf());
            self
        }

        /// Contents of a file, if present.
        pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
            self.files.borrow().get(path.as_ref()).cloned()
        }

        /// All file paths, sorted.
        pub fn files(&self) -> Vec<PathBuf> {
            self.files.borrow().keys().cloned().collect()
        }

        fn add_dirs(&self, path: &Path) {
            let mut dirs = self.dirs.borrow_mut();
            for ancestor in path.ancestors() {
                if !ancestor.as_os_str().is_empty() {
                    dirs.insert(ancestor.to_path_buf());
                }
            }
        }

        fn not_found(path: &Path) -> io::Error {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        }

        fn permission_denied(path: &Path) -> io::Error {
            io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            )
        }

        fn check_parent(&self, path: &Path) -> io::Result<()> {
            match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() && !self.is_dir(parent) => {
                    Err(Self::not_found(parent))
                }
                _ => Ok(()),
            }
        }
    }

    impl FileSystem for MemoryFs {
        fn exists(&self, path: &Path) -> bool {
            self.is_file(path) || self.is_dir(path)
        }

        fn is_file(&self, path: &Path) -> bool {
            self.files.borrow().contains_key(path)
        }

        fn is_dir(&self, path: &Path) -> bool {
            self.dirs.borrow().contains(path)
        }

        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            if self.unreadable.contains(path) {
                return Err(Self::permission_denied(path));
            }
            self.file(path).ok_or_else(|| Self::not_found(path))
        }

        fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
            self.check_parent(path)?;
            self.files
                .borrow_mut()
                .insert(path.to_path_buf(), contents.to_owned());
            Ok(())
        }

        fn create_dir_all(&self, path: &Path) -> io::Result<()> {
            if self.is_file(path) {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("file exists: {}", path.display()),
                ));
            }
            self.add_dirs(path);
            Ok(())
        }

        fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
            let contents = self.read_to_string(from)?;
            self.write(to, &contents)
        }

        fn remove_file(&self, path: &Path) -> io::Result<()> {
            if self.locked.contains(path) {
                return Err(Self::permission_denied(path));
            }
            self.files
                .borrow_mut()
                .remove(path)
                .map(|_| ())
                .ok_or_else(|| Self::not_found(path))
        }

        fn copy_dir_all(&self, from: &Path, to: &Path) -> io::Result<usize> {
            if !self.is_dir(from) {
                return Err(Self::not_found(from));
            }
            if let Some(path) = self.unreadable.iter().find(|path| path.starts_with(from)) {
                return Err(Self::permission_denied(path));
            }

            let dirs: Vec<PathBuf> = self
                .dirs
                .borrow()
                .iter()
                .filter(|dir| dir.starts_with(from))
                .cloned()
                .collect();
            for dir in dirs {
                if let Ok(rel) = dir.strip_prefix(from) {
                    self.add_dirs(&to.join(rel));
                }
            }

            let files: Vec<(PathBuf, String)> = self
                .files
                .borrow()
                .iter()
                .filter(|(path, _)| path.starts_with(from))
                .map(|(path, contents)| (path.clone(), contents.clone()))
                .collect();
            let copied = files.len();
            for (path, contents) in files {
                if let Ok(rel) = path.strip_prefix(from) {
                    self.files.borrow_mut().insert(to.join(rel), contents);
                }
            }
            Ok(copied)
        }
    }
}
