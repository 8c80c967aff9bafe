//! Folio - a plain-text blogging tool.
//!
//! Posts live in a `PREFIX/YYYY/MM/DD/` tree next to a persisted index
//! (`blog.json` or `blog.yaml`). Verbs publish documents into the tree,
//! rebuild the index from disk, and generate RSS/sitemap output from it.

mod cli;
mod config;
mod convert;
mod frontmatter;
mod generator;
mod include;
mod index;
mod logger;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use index::BlogIndex;
use std::{
    fs,
    path::{Path, PathBuf},
};

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config: &'static SiteConfig = Box::leak(Box::new(load_config(cli)?));

    match &cli.command {
        Commands::Publish { document, date, .. } => publish(config, document, date.as_deref()),
        Commands::Asset { file, date } => asset(config, file, date.as_deref()),
        Commands::Refresh { years, .. } => refresh(config, years),
        Commands::Frontmatter { input, output } => front_matter(input, output.as_deref()),
        Commands::Rss { output } => rss(config, output.as_deref()),
        Commands::Sitemap { output } => sitemap(config, output.as_deref()),
        Commands::Include { input, output } => include_verb(input, output.as_deref()),
    }
}

/// Load and validate configuration from CLI arguments.
///
/// A missing config file is not an error: every setting has a default and
/// can be overridden on the command line.
fn load_config(cli: &'static Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SiteConfig::from_path(&config_path)?
    } else {
        SiteConfig::default()
    };
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}

// ============================================================================
// Verb drivers
// ============================================================================

fn publish(config: &SiteConfig, document: &Path, date: Option<&str>) -> Result<()> {
    let index_path = config.index_path();
    let mut index = index::store::load(&index_path)?;
    index.apply_site(&config.base);

    let target = index.publish(&config.publish.prefix, document, date)?;
    seed_templates(&mut index, config);
    index::store::save(&mut index, &index_path)?;

    log!("publish"; "{} -> {}", document.display(), target.display());
    Ok(())
}

fn asset(config: &SiteConfig, file: &Path, date: Option<&str>) -> Result<()> {
    let target = index::copy_asset(&config.publish.prefix, file, date)?;
    log!("asset"; "{} -> {}", file.display(), target.display());
    Ok(())
}

fn refresh(config: &SiteConfig, years: &[String]) -> Result<()> {
    let index_path = config.index_path();
    let mut index = index::store::load(&index_path)?;
    index.apply_site(&config.base);

    for year in years {
        index::refresh::refresh_from_path(&mut index, &config.publish.prefix, year)?;
        log!("refresh"; "crawled {}", year);
    }

    seed_templates(&mut index, config);
    index::store::save(&mut index, &index_path)?;
    log!("refresh"; "{} posts indexed in {}", index.post_count(), index_path.display());
    Ok(())
}

fn front_matter(input: &Path, output: Option<&Path>) -> Result<()> {
    let src = fs::read(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let split = frontmatter::split(&src);
    let meta = frontmatter::decode(split.format, split.meta)?;
    let json = serde_json::to_string_pretty(&meta)?;
    emit(&json, output)
}

fn rss(config: &SiteConfig, output: Option<&Path>) -> Result<()> {
    let index = index::store::load(&config.index_path())?;
    let config = with_output(config, output, |cfg, path| cfg.feed.path = path);
    // Pandoc-style conversion is left to downstream tooling; items carry
    // the post abstract as their description.
    generator::rss::build_feed(&config, &index, None)
}

fn sitemap(config: &SiteConfig, output: Option<&Path>) -> Result<()> {
    let index = index::store::load(&config.index_path())?;
    let config = with_output(config, output, |cfg, path| cfg.sitemap.path = path);
    generator::sitemap::build_sitemap(&config, &index)
}

fn include_verb(input: &Path, output: Option<&Path>) -> Result<()> {
    let expanded = include::expand_file(input)?;
    emit(&expanded, output)
}

// ============================================================================
// Helpers
// ============================================================================

/// Carry the configured template hints into the persisted index.
fn seed_templates(index: &mut BlogIndex, config: &SiteConfig) {
    if !config.publish.index_tmpl.is_empty() {
        index.index_tmpl = config.publish.index_tmpl.clone();
    }
    if !config.publish.post_tmpl.is_empty() {
        index.post_tmpl = config.publish.post_tmpl.clone();
    }
}

/// Clone the config with one output path overridden from the command line.
fn with_output(
    config: &SiteConfig,
    output: Option<&Path>,
    set: impl FnOnce(&mut SiteConfig, PathBuf),
) -> SiteConfig {
    let mut config = config.clone();
    if let Some(path) = output {
        set(&mut config, path.to_owned());
    }
    config
}

fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}
