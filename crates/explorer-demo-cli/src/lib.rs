//! CLI commands for the Explorer demo
//!
//! Inspects shareable demo URLs from the command line:
//! - Normalize a URL query array into full descriptors
//! - Resolve source and collection references against a fixture directory
//! - Build shareable search paths
//! - Browse the sample-search catalog and the effective configuration
//! - Compute word-cloud font sizes

#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use explorer_demo_core::stats::{SizeRange, format_percent, ratio, word_font_size};
use explorer_demo_core::url::{DEMO_PREFIX, DEMO_SEARCH_PREFIX};
use explorer_demo_core::{
    Config, DemoRoute, ExplorerError, NormalizeDefaults, Notice, QueryDescriptor, Reference,
    SampleCatalog, encode_search_path, normalize_queries, parse_demo_route, parse_url_queries,
};
use explorer_demo_store::{AppState, DemoSession, LookupStatus, StaticLookupService};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Explorer(#[from] ExplorerError),
    #[error("{0} reference lookup(s) failed")]
    LookupsFailed(usize),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(name = "explorer-demo", version, about = "Explorer demo URL tool")]
pub struct Cli {
    /// Log at debug level regardless of RUST_LOG and EXPLORER_LOG_LEVEL
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Anchor day for defaulted date windows (YYYY-MM-DD, default: today)
    #[arg(long, global = true)]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize a demo path or a raw JSON query array
    Normalize {
        input: String,
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Load a demo path and resolve its references
    Resolve {
        path: String,
        /// Lookup directory JSON (default: EXPLORER_LOOKUP_FIXTURES)
        #[arg(long)]
        fixtures: Option<PathBuf>,
        /// Sample catalog JSON (default: EXPLORER_SAMPLES_PATH)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Build the shareable search path for a JSON query array
    Encode { json: String },
    /// Show one sample search with its normalized queries
    Sample {
        index: usize,
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config,
    /// Font sizes for a word cloud, from `[{"term": .., "tfnorm": ..}]` JSON
    WordSizes {
        json: String,
        #[arg(long, default_value_t = 10.0)]
        min: f64,
        #[arg(long, default_value_t = 30.0)]
        max: f64,
    },
}

pub fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = err.exit_code();
            let _ = err.print();
            return code;
        }
    };
    let config = Config::from_env();
    init_tracing(&config, cli.verbose);

    match execute(cli, &config) {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => {
                println!("{text}");
                0
            }
            Err(err) => {
                eprintln!("error: {err}");
                1
            }
        },
        Err(err) => {
            eprintln!("error: {err}");
            err_exit_code(&err)
        }
    }
}

fn init_tracing(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

const fn err_exit_code(err: &CliError) -> i32 {
    match err {
        CliError::InvalidArgument(_) => 2,
        _ => 1,
    }
}

/// Run one parsed command, returning the JSON document to print.
pub fn execute(cli: Cli, config: &Config) -> CliResult<Value> {
    let defaults = match cli.today {
        Some(today) => NormalizeDefaults::at(today, config),
        None => NormalizeDefaults::now(config),
    };
    match cli.command {
        Commands::Normalize { input, catalog } => {
            let catalog = load_catalog(catalog.as_deref(), config)?;
            handle_normalize(&input, &catalog, &defaults)
        }
        Commands::Resolve {
            path,
            fixtures,
            catalog,
        } => {
            let catalog = load_catalog(catalog.as_deref(), config)?;
            let service = load_fixtures(fixtures.as_deref(), config)?;
            handle_resolve(&path, config, catalog, &service, &defaults)
        }
        Commands::Encode { json } => handle_encode(&json, &defaults),
        Commands::Sample { index, catalog } => {
            let catalog = load_catalog(catalog.as_deref(), config)?;
            handle_sample(index, &catalog, &defaults)
        }
        Commands::Config => Ok(config_json(config)),
        Commands::WordSizes { json, min, max } => handle_word_sizes(&json, SizeRange { min, max }),
    }
}

fn load_catalog(flag: Option<&Path>, config: &Config) -> CliResult<SampleCatalog> {
    match flag.or(config.samples_path.as_deref()) {
        Some(path) => Ok(SampleCatalog::load(path)?),
        None => Ok(SampleCatalog::default()),
    }
}

fn load_fixtures(flag: Option<&Path>, config: &Config) -> CliResult<StaticLookupService> {
    match flag.or(config.lookup_fixtures_path.as_deref()) {
        Some(path) => Ok(StaticLookupService::load(path)?),
        None => {
            tracing::debug!("no lookup fixtures configured; every lookup will fail");
            Ok(StaticLookupService::default())
        }
    }
}

/// Accepts a raw JSON array, a search path, or a sample path.
pub fn handle_normalize(
    input: &str,
    catalog: &SampleCatalog,
    defaults: &NormalizeDefaults,
) -> CliResult<Value> {
    let trimmed = input.trim();
    let queries = if trimmed.starts_with('[') {
        parse_url_queries(trimmed, defaults)?
    } else {
        match parse_demo_route(trimmed)? {
            DemoRoute::Search { json } => parse_url_queries(&json, defaults)?,
            DemoRoute::Sample { index } => normalize_queries(&catalog.get(index)?.queries, defaults)?,
        }
    };
    Ok(serde_json::to_value(queries)?)
}

#[derive(Debug, Serialize)]
struct ResolveReport<'a> {
    status: LookupStatus,
    issued: usize,
    resolved: usize,
    /// Share of references on live queries that resolved, e.g. `"100%"`.
    resolved_share: Option<String>,
    queries: &'a [QueryDescriptor],
    selected: Option<u32>,
}

pub fn handle_resolve(
    path: &str,
    config: &Config,
    catalog: SampleCatalog,
    service: &StaticLookupService,
    defaults: &NormalizeDefaults,
) -> CliResult<Value> {
    if !path.trim_start_matches('#').starts_with(DEMO_PREFIX) {
        return Err(CliError::InvalidArgument(format!(
            "expected a path under {DEMO_PREFIX}, got {path:?}"
        )));
    }
    let mut session = DemoSession::new(config.clone(), catalog);
    let navigated = session.navigate_with(path, defaults);
    emit_notices(session.state());
    navigated?;

    let summary = futures::executor::block_on(session.resolve(service));
    let state = session.state();
    emit_notices(state);
    if summary.failed() > 0 {
        return Err(CliError::LookupsFailed(summary.failed()));
    }
    let report = ResolveReport {
        status: state.lookup_status(),
        issued: summary.issued,
        resolved: summary.resolved,
        resolved_share: resolved_share(state),
        queries: &state.queries,
        selected: state.selected_index(),
    };
    Ok(serde_json::to_value(report)?)
}

fn resolved_share(state: &AppState) -> Option<String> {
    let (resolved, total) = state
        .live_queries()
        .flat_map(|q| {
            q.sources
                .iter()
                .map(Reference::is_resolved)
                .chain(q.collections.iter().map(Reference::is_resolved))
        })
        .fold((0u64, 0u64), |(resolved, total), done| {
            (resolved + u64::from(done), total + 1)
        });
    ratio(resolved, total).map(format_percent)
}

pub fn handle_encode(json: &str, defaults: &NormalizeDefaults) -> CliResult<Value> {
    let queries = parse_url_queries(json, defaults)?;
    let path = encode_search_path(&queries);
    let shared = queries.iter().filter(|q| q.is_shareable()).count();
    Ok(json!({ "path": path, "queries": shared }))
}

pub fn handle_sample(
    index: usize,
    catalog: &SampleCatalog,
    defaults: &NormalizeDefaults,
) -> CliResult<Value> {
    let sample = catalog.get(index)?;
    let queries = normalize_queries(&sample.queries, defaults)?;
    Ok(json!({
        "id": sample.id,
        "label": sample.label,
        "description": sample.description,
        "path": format!("{DEMO_PREFIX}{index}"),
        "queries": queries,
    }))
}

#[derive(Debug, Deserialize)]
struct WordCount {
    term: String,
    tfnorm: f64,
}

/// Scale each term's font size by its tfnorm within the cloud's extent.
pub fn handle_word_sizes(json: &str, range: SizeRange) -> CliResult<Value> {
    if range.min > range.max {
        return Err(CliError::InvalidArgument(format!(
            "--min {} is larger than --max {}",
            range.min, range.max
        )));
    }
    let words: Vec<WordCount> = serde_json::from_str(json)?;
    let extent = words.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), w| {
        (lo.min(w.tfnorm), hi.max(w.tfnorm))
    });
    let sized: Vec<Value> = words
        .iter()
        .map(|w| {
            json!({
                "term": w.term,
                "tfnorm": w.tfnorm,
                "font_size": word_font_size(w.tfnorm, extent, range),
            })
        })
        .collect();
    Ok(Value::Array(sized))
}

fn config_json(config: &Config) -> Value {
    json!({
        "default_collections": config.default_collections(),
        "samples_path": config.samples_path,
        "lookup_fixtures_path": config.lookup_fixtures_path,
        "log_level": config.log_level,
        "max_notices": config.max_notices,
        "search_prefix": DEMO_SEARCH_PREFIX,
    })
}

fn emit_notices(state: &AppState) {
    for notice in &state.notices {
        print_notice(notice);
    }
}

fn print_notice(notice: &Notice) {
    eprintln!("{notice}");
}
