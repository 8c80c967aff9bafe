//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Folio plain-text blogging CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: folio.toml)
    #[arg(short = 'C', long, default_value = "folio.toml")]
    pub config: PathBuf,

    /// Prefix directory holding the dated post tree (relative to root)
    #[arg(short, long)]
    pub prefix: Option<PathBuf>,

    /// Index file name under the prefix (extension selects json/yaml)
    #[arg(short, long)]
    pub index: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Site metadata overrides shared by Publish and Refresh
#[derive(clap::Args, Debug, Clone)]
pub struct SiteArgs {
    /// Override the site name
    #[arg(long)]
    pub name: Option<String>,

    /// Override the site tagline
    #[arg(long)]
    pub quip: Option<String>,

    /// Override the site description
    #[arg(long)]
    pub description: Option<String>,

    /// Override the base URL for the site.
    ///
    /// Useful when the production URL differs from local development
    /// without modifying folio.toml.
    #[arg(long = "base-url")]
    pub url: Option<String>,

    /// Override the copyright notice
    #[arg(long)]
    pub copyright: Option<String>,

    /// Override the content license
    #[arg(long)]
    pub license: Option<String>,

    /// Override the language code
    #[arg(long)]
    pub language: Option<String>,

    /// Override the date the site started
    #[arg(long)]
    pub started: Option<String>,

    /// Override the date the site ended
    #[arg(long)]
    pub ended: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Publish a document into its dated bucket and update the index
    Publish {
        /// Document to publish
        document: PathBuf,

        /// Publication date as YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<String>,

        #[command(flatten)]
        site: SiteArgs,
    },

    /// Copy a file into its dated bucket without touching the index
    Asset {
        /// File to copy
        file: PathBuf,

        /// Bucket date as YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Rebuild index entries for one or more years from the on-disk tree
    Refresh {
        /// Years to crawl, comma separated (e.g. 2023,2024)
        #[arg(value_delimiter = ',', required = true)]
        years: Vec<String>,

        #[command(flatten)]
        site: SiteArgs,
    },

    /// Print a document's front matter as JSON
    Frontmatter {
        /// Document to inspect
        input: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate the RSS feed from the index
    Rss {
        /// Write to a different path than configured
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate the sitemap from the index
    Sitemap {
        /// Write to a different path than configured
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Expand #include(FILENAME); directives in a document
    Include {
        /// Document to expand
        input: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_publish(&self) -> bool {
        matches!(self.command, Commands::Publish { .. })
    }
    pub const fn is_refresh(&self) -> bool {
        matches!(self.command, Commands::Refresh { .. })
    }
}
