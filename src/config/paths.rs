//! `[paths]` section configuration.
//!
//! Where posts live and where backups are written. Both are relative to the
//! project root in the file and absolute after loading.

use super::defaults;
use educe::Educe;
use serde::Deserialize;
use std::path::PathBuf;

/// `[paths]` section in postkit.toml.
///
/// # Example
/// ```toml
/// [paths]
/// posts = "source/_posts"
/// backup = "page-tmp"
/// ```
#[derive(Debug, Clone, Educe, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Root for post paths given without an absolute prefix.
    #[serde(default = "defaults::paths::posts")]
    #[educe(Default = defaults::paths::posts())]
    pub posts: PathBuf,

    /// Backup root; each post gets `<backup>/<post-name>/`.
    #[serde(default = "defaults::paths::backup")]
    #[educe(Default = defaults::paths::backup())]
    pub backup: PathBuf,
}
