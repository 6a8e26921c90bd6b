//! Lexical path helpers.
//!
//! Nothing here touches the filesystem: normalization works on path
//! components only, so the result is stable for paths that do not exist yet.

use std::path::{Component, Path, PathBuf};

/// Remove `.` segments and fold `..` into the preceding component.
///
/// `..` directly under a root is dropped (`/..` is `/`); leading `..` of a
/// relative path is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Whether `raw` is absolute on any platform a post may have been written on.
///
/// Besides the native notion this accepts drive-letter roots (`C:\`, `C:/`)
/// and UNC prefixes (`\\server\share`).
pub fn is_absolute_like(raw: &str) -> bool {
    if Path::new(raw).is_absolute() || raw.starts_with(r"\\") {
        return true;
    }
    matches!(
        raw.as_bytes(),
        [drive, b':', b'\\' | b'/', ..] if drive.is_ascii_alphabetic()
    )
}

/// File name of `path` without its extension, as UTF-8.
pub fn file_stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|stem| stem.to_str())
}
