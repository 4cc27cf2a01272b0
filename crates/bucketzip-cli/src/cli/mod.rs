//! CLI for bucketzip.

mod commands;

use anyhow::Result;
use bucketzip_core::config::{self, HarvestConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_extract, run_harvest, run_list};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bucketzip")]
#[command(about = "Fetch every ZIP archive a bucket listing matches and unpack it locally", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Scan the listing, then download, extract and delete each matching archive.
    Run {
        /// Listing URL (overrides `listing_url` in config.toml).
        #[arg(long)]
        url: Option<String>,
        /// Archive-name regex (overrides `pattern`).
        #[arg(long)]
        pattern: Option<String>,
        /// Extraction directory (overrides `data_dir`).
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,
        /// Keep downloaded archives after extraction.
        #[arg(long)]
        keep_archives: bool,
        /// Only scan the first listing page.
        #[arg(long)]
        no_paginate: bool,
        /// Print the run report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show which archives a run would fetch, without downloading anything.
    List {
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        pattern: Option<String>,
        #[arg(long)]
        no_paginate: bool,
        #[arg(long)]
        json: bool,
    },

    /// Extract a local ZIP archive into the data directory.
    Extract {
        /// Path to the archive.
        archive: PathBuf,
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,
        /// Delete the archive after a successful extraction.
        #[arg(long)]
        delete: bool,
    },
}

/// Command-line values that take precedence over config.toml.
#[derive(Debug, Default)]
pub(crate) struct Overrides {
    pub url: Option<String>,
    pub pattern: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub keep_archives: bool,
    pub no_paginate: bool,
}

impl Overrides {
    pub(crate) fn apply(self, mut cfg: HarvestConfig) -> HarvestConfig {
        if let Some(url) = self.url {
            cfg.listing_url = url;
        }
        if let Some(pattern) = self.pattern {
            cfg.pattern = pattern;
        }
        if let Some(dir) = self.data_dir {
            cfg.data_dir = dir;
        }
        cfg.keep_archives |= self.keep_archives;
        if self.no_paginate {
            cfg.follow_pagination = false;
        }
        cfg
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                url,
                pattern,
                data_dir,
                keep_archives,
                no_paginate,
                json,
            } => {
                let cfg = Overrides {
                    url,
                    pattern,
                    data_dir,
                    keep_archives,
                    no_paginate,
                }
                .apply(cfg);
                let download_dir = std::env::current_dir()?;
                run_harvest(&cfg, &download_dir, json).await?;
            }
            CliCommand::List {
                url,
                pattern,
                no_paginate,
                json,
            } => {
                let cfg = Overrides {
                    url,
                    pattern,
                    no_paginate,
                    ..Overrides::default()
                }
                .apply(cfg);
                run_list(&cfg, json).await?;
            }
            CliCommand::Extract {
                archive,
                data_dir,
                delete,
            } => {
                let data_dir = data_dir.unwrap_or(cfg.data_dir);
                run_extract(&archive, &data_dir, delete).await?;
            }
        }

        Ok(())
    }
}
