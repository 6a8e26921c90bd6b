//! Project configuration management for `postkit.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                      |
//! |-------------|----------------------------------------------|
//! | `[paths]`   | Posts directory and backup root              |
//! | `[publish]` | Front matter settings                        |
//!
//! # Example
//!
//! ```toml
//! [paths]
//! posts = "source/_posts"
//! backup = "page-tmp"
//!
//! [publish]
//! date_format = "%Y-%m-%d %H:%M:%S"
//! ```
//!
//! The file is optional. Without it every field takes its default.

pub mod defaults;
mod error;
mod paths;
mod publish;

pub use error::ConfigError;

use paths::PathsConfig;
use publish::PublishConfig;

use crate::cli::Cli;
use anyhow::{Result, bail};
use chrono::format::{Item, StrftimeItems};
use educe::Educe;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing postkit.toml
#[derive(Debug, Clone, Educe, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute project root (set after loading)
    #[serde(skip)]
    pub root: PathBuf,

    /// Posts and backup locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Publish settings
    #[serde(default)]
    pub publish: PublishConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Default configuration rooted at `root`, with all paths resolved.
    pub fn with_root(root: &Path) -> Self {
        let mut config = Self::default();
        config.update_path_with_root(root);
        config
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        self.update_path_with_root(root);
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path) {
        let root = Self::normalize_path(root);

        self.paths.posts = Self::normalize_path(&root.join(&self.paths.posts));
        self.paths.backup = Self::normalize_path(&root.join(&self.paths.backup));
        self.root = root;
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration as written, before paths are resolved.
    ///
    /// Resolution joins paths onto the root, so an empty path would silently
    /// become the root itself.
    pub fn validate(&self) -> Result<()> {
        if self.paths.posts.as_os_str().is_empty() {
            bail!(ConfigError::Validation("[paths.posts] must not be empty".into()));
        }

        if self.paths.backup.as_os_str().is_empty() {
            bail!(ConfigError::Validation("[paths.backup] must not be empty".into()));
        }

        let format = &self.publish.date_format;
        if format.trim().is_empty() {
            bail!(ConfigError::Validation(
                "[publish.date_format] must not be empty".into()
            ));
        }
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            bail!(ConfigError::Validation(format!(
                "[publish.date_format] is not a valid strftime format: `{format}`"
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let dir = tempdir().unwrap();
        let config = SiteConfig::with_root(dir.path());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_root_resolves_paths() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let config = SiteConfig::with_root(&root);

        assert_eq!(config.root, root);
        assert_eq!(config.paths.posts, root.join("source/_posts"));
        assert_eq!(config.paths.backup, root.join("page-tmp"));
    }

    #[test]
    fn test_update_with_cli_uses_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let root_arg = root.to_string_lossy().into_owned();
        let cli = Cli::try_parse_from([
            "postkit", "--root", &root_arg, "-C", "blog.toml", "backup", "a.md",
        ])
        .unwrap();

        let mut config = SiteConfig::from_str("[paths]\nbackup = \"bak\"").unwrap();
        config.update_with_cli(&cli);

        assert_eq!(config.paths.backup, root.join("bak"));
        assert_eq!(config.paths.posts, root.join("source/_posts"));
    }

    #[test]
    fn test_absolute_paths_kept() {
        let dir = tempdir().unwrap();
        let backup = dir.path().join("elsewhere");
        let content = format!("[paths]\nbackup = {:?}", backup.to_string_lossy());
        let mut config = SiteConfig::from_str(&content).unwrap();
        config.update_path_with_root(Path::new("/tmp"));

        assert_eq!(config.paths.backup, backup);
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("postkit.toml");
        fs::write(&path, "[publish]\ndate_format = \"%Y/%m/%d\"\n").unwrap();

        let config = SiteConfig::from_path(&path).unwrap();
        assert_eq!(config.publish.date_format, "%Y/%m/%d");
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempdir().unwrap();
        let err = SiteConfig::from_path(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert!(SiteConfig::from_str("[deploy]\nbranch = \"main\"").is_err());
    }

    #[test]
    fn test_validate_rejects_empty_paths() {
        let config = SiteConfig::from_str("[paths]\nposts = \"\"").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[paths.posts]"));

        let config = SiteConfig::from_str("[paths]\nbackup = \"\"").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[paths.backup]"));
    }

    #[test]
    fn test_validate_accepts_unresolved_defaults() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_date_format() {
        let dir = tempdir().unwrap();
        let mut config = SiteConfig::with_root(dir.path());
        config.publish.date_format = "  ".into();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[publish.date_format]"));
    }

    #[test]
    fn test_validate_rejects_bad_strftime() {
        let dir = tempdir().unwrap();
        let mut config = SiteConfig::with_root(dir.path());
        config.publish.date_format = "%Y-%Q".into();

        assert!(config.validate().is_err());
    }
}
