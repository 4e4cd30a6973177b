use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
};

use bvets_core::{
    config::{self, AppConfig},
    route::FileObjectLoader,
    summary::RouteSummary,
    CompatibilityRegistry, DiagnosticLog, RouteData, RouteLoader, RoutePackage,
};
use structopt::StructOpt;
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(StructOpt)]
#[structopt(
    name = "bvets",
    about = "Load the lists of a BveTS route package and report what was found.",
    rename_all = "snake_case"
)]
struct Options {
    /// route package directory
    #[structopt(parse(from_os_str))]
    package: PathBuf,

    /// config file, instead of the one in the user's config directory
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// write the summary here instead of printing it
    #[structopt(long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// skip geometry and passenger data
    #[structopt(long)]
    preview: bool,

    /// train folder used to pick scoped compatibility objects
    #[structopt(long)]
    train: Option<String>,
}

fn main() -> Result<()> {
    init_logging()?;
    let options = Options::from_args();

    let config = match &options.config {
        Some(path) => AppConfig::load_from(path)?,
        None => {
            config::ensure_default_config()?;
            AppConfig::load()?
        }
    };
    let mut load_options = config.load_options()?;
    load_options.preview_only |= options.preview;
    if options.train.is_some() {
        load_options.train_scope = options.train.clone();
    }

    let mut diagnostics = DiagnosticLog::new();
    let mut registry = CompatibilityRegistry::new();
    if let Some(database) = &config.compatibility_database {
        if let Err(err) = registry.load_descriptor(database, &mut diagnostics) {
            warn!("Compatibility objects unavailable: {err}");
        }
    }

    let package = RoutePackage::discover(&options.package, load_options.encoding)?;
    info!(
        "found {} lists in {}",
        package.lists.len(),
        package.root.display()
    );

    let mut route = RouteData::new();
    route.track_position = config.track_position;
    let mut objects = FileObjectLoader::new();
    let outcomes = RouteLoader::new(load_options, &mut registry, &mut objects, &mut diagnostics)
        .load_package(&package, &mut route);
    let failed = outcomes.iter().filter(|outcome| outcome.result.is_err()).count();

    let summary = RouteSummary::new(
        &package.root,
        &route,
        outcomes,
        registry.used(),
        diagnostics.entries(),
    );
    match &options.output {
        Some(path) => {
            match RouteSummary::load(path) {
                Ok(Some(previous)) => info!(
                    "replacing summary from {} ({} diagnostics, now {})",
                    previous.loaded_at,
                    previous.diagnostics.len(),
                    summary.diagnostics.len()
                ),
                Ok(None) => {}
                Err(err) => warn!("Ignoring previous summary: {err:#}"),
            }
            summary.persist(path)?
        }
        None => println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("failed to serialize summary")?
        ),
    }

    if failed > 0 {
        anyhow::bail!("{failed} list(s) could not be loaded");
    }
    Ok(())
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("bvets.log");

    let env_filter = EnvFilter::from_default_env();

    // stdout carries the summary.
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_ansi(false)
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
