//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand, builder::NonEmptyStringValueParser};
use std::path::PathBuf;

/// Backup and publish helpers for hexo-style blog posts
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name, relative to the project root (default: postkit.toml)
    #[arg(short = 'C', long, default_value = "postkit.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Copy a post, its local images and its resource folder into the backup directory
    Backup {
        /// Post file, absolute or relative to the posts directory
        ///
        /// Examples: `my-post.md`, `2026/new-post.md`
        post: PathBuf,
    },

    /// Move a post's images into its asset folder, rewrite them to `{% asset_img %}`
    /// and write the front matter
    Publish {
        /// Post file, absolute or relative to the posts directory
        post: PathBuf,

        /// Post title written to the front matter
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        title: String,

        /// Comma-separated tags, e.g. "rust, cli"
        tags: Option<String>,
    },
}
