//! postkit - backup and publish helpers for hexo-style blog posts.

mod backup;
mod cli;
mod config;
mod front_matter;
mod images;
mod logger;
mod post;
mod publish;
mod utils;

use anyhow::Result;
use backup::backup_post;
use chrono::Local;
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use publish::{PublishRequest, publish_post};
use std::process::ExitCode;
use utils::fs::DiskFs;

fn main() -> ExitCode {
    let cli = parse_cli();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log!("error"; "{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Parse arguments, exiting with status 1 on usage errors.
fn parse_cli() -> Cli {
    Cli::try_parse().unwrap_or_else(|err| {
        let code = if err.use_stderr() { 1 } else { 0 };
        err.print().ok();
        std::process::exit(code)
    })
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    match &cli.command {
        Commands::Backup { post } => backup_post(&DiskFs, &config, post).map(|_| ()),
        Commands::Publish { post, title, tags } => {
            let request = PublishRequest {
                post,
                title,
                tags: tags.as_deref(),
                date: Local::now(),
            };
            publish_post(&DiskFs, &config, &request).map(|_| ())
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(std::path::Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SiteConfig::from_path(&config_path)?
    } else {
        SiteConfig::default()
    };
    config.validate()?;
    config.update_with_cli(cli);

    Ok(config)
}
