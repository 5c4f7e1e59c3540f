/*
 * render.rs
 * Copyright (c) 2025 Lectern Developers
 *
 * Render command implementation
 */

//! Render command implementation.
//!
//! Reads the manual once and drives two generators over it: the HTML pages
//! and the function index.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use lectern_core::{Engine, Generator, TracingObserver};
use lectern_site::{FunctionIndex, PageGenerator, SiteConfig};
use lectern_xml::ManualReader;

/// Arguments for the render command
#[derive(Debug)]
pub struct RenderArgs {
    /// Manual to render
    pub input: PathBuf,
    /// Configuration file
    pub config: Option<PathBuf>,
    pub build_dir: Option<PathBuf>,
    pub index_dir: Option<PathBuf>,
    pub language: Option<String>,
    /// `NAME=VALUE` entity replacements
    pub entities: Vec<String>,
    /// Suppress the summary
    pub quiet: bool,
}

/// Execute the render command
pub fn execute(args: RenderArgs) -> Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input path does not exist: {}", args.input.display());
    }

    let config = resolve_config(&args)?;
    let entities = parse_entities(&args.entities)?;

    info!("Rendering manual: {}", args.input.display());

    let reader = ManualReader::from_path(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let mut reader = reader.with_entities(entities);

    let pages = PageGenerator::new(&config);
    let page_log = pages.page_log();
    let index = FunctionIndex::create(&config).context("Failed to create function index")?;
    let index_path = index.path().to_path_buf();

    let mut generators: Vec<Box<dyn Generator>> = vec![Box::new(pages), Box::new(index)];
    let mut observer = TracingObserver::new(config.progress_interval);

    let summary = Engine::new()
        .run(&mut reader, &mut generators, &mut observer)
        .with_context(|| format!("Failed to render {}", args.input.display()))?;

    if config.debug {
        for path in page_log.paths() {
            debug!(path = %path.display(), "Wrote page");
        }
    }
    info!(
        nodes = summary.nodes,
        pages = page_log.len(),
        "Render complete"
    );

    if !args.quiet {
        println!(
            "Rendered {} pages to {}",
            page_log.len(),
            config.page_directory().display()
        );
        println!("Function index: {}", index_path.display());
    }

    Ok(())
}

/// Build the site configuration: file (if given), then command line overrides.
fn resolve_config(args: &RenderArgs) -> Result<SiteConfig> {
    let mut config = match &args.config {
        Some(path) => SiteConfig::load(path)?,
        None => SiteConfig::default(),
    };

    if let Some(dir) = &args.build_dir {
        config.build_directory = dir.clone();
    }
    if let Some(dir) = &args.index_dir {
        config.index_directory = dir.clone();
    }
    if let Some(language) = &args.language {
        config.language = language.clone();
    }

    debug!(?config, "Resolved site configuration");
    Ok(config)
}

/// Parse `NAME=VALUE` pairs.
fn parse_entities(entities: &[String]) -> Result<Vec<(String, String)>> {
    entities
        .iter()
        .map(|entry| -> Result<(String, String)> {
            let (name, value) = entry
                .split_once('=')
                .with_context(|| format!("Invalid entity '{}', expected NAME=VALUE", entry))?;
            let name = name.trim();
            if name.is_empty() {
                anyhow::bail!("Invalid entity '{}', name is empty", entry);
            }
            Ok((name.to_string(), value.to_string()))
        })
        .collect()
}
