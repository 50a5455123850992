//! assetlib command-line interface.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use assetlib::asset::Category;
use assetlib::config::Config;
use assetlib::constants::ALL_FILTER_LABEL;
use assetlib::listing::{DATE_COLUMN, NAME_COLUMN};

mod commands;

#[derive(Parser)]
#[command(name = "assetlib")]
#[command(about = "Browse and upload course assets")]
#[command(version)]
struct Cli {
    /// Path to assetlib.toml (default: ./assetlib.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of assets
    List(ListArgs),
    /// Upload files (at most 100 per run)
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Delete an asset and show the refreshed page
    Delete {
        /// Asset id
        asset_id: String,
    },
    /// Lock an asset
    Lock {
        /// Asset id
        asset_id: String,
    },
    /// Unlock an asset
    Unlock {
        /// Asset id
        asset_id: String,
    },
    /// Show the effective configuration and validation results
    Config,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (overrides listing.page_size)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Sort column; repeat to toggle direction (e.g. --sort name --sort name)
    #[arg(long, value_enum)]
    pub sort: Vec<SortArg>,

    /// Type filter: ALL, Images, Documents, Text or OTHER
    #[arg(long, default_value = ALL_FILTER_LABEL, value_parser = parse_filter)]
    pub filter: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Name,
    Date,
}

impl SortArg {
    pub fn column(self) -> &'static str {
        match self {
            Self::Name => NAME_COLUMN,
            Self::Date => DATE_COLUMN,
        }
    }
}

fn parse_filter(value: &str) -> Result<String, String> {
    if value.eq_ignore_ascii_case(ALL_FILTER_LABEL) {
        return Ok(ALL_FILTER_LABEL.to_string());
    }
    Category::from_label(value)
        .map(|c| c.label().to_string())
        .ok_or_else(|| {
            let labels: Vec<_> = Category::FILTERABLE.iter().map(|c| c.label()).collect();
            format!(
                "unknown filter '{value}' (expected {ALL_FILTER_LABEL}, {})",
                labels.join(", ")
            )
        })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format);

    let (config, loaded_from) = Config::discover(cli.config.as_deref())?;

    match cli.command {
        Commands::List(args) => commands::list::execute(&config, &args).await,
        Commands::Upload { files } => commands::upload::execute(&config, &files).await,
        Commands::Delete { asset_id } => commands::delete::execute(&config, &asset_id).await,
        Commands::Lock { asset_id } => commands::lock::execute(&config, &asset_id, true).await,
        Commands::Unlock { asset_id } => commands::lock::execute(&config, &asset_id, false).await,
        Commands::Config => commands::show_config::execute(&config, loaded_from.as_deref()),
    }
}

/// Initialize logging on stderr, leaving stdout for command output.
fn init_logging(verbose: bool, format: LogFormat) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}
