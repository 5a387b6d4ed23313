pub mod analyze;
pub mod chart;
pub mod chart_cmd;
pub mod cli;
pub mod config;
pub mod correlation;
pub mod data;
pub mod dataset;
pub mod error;
pub mod explore;
pub mod frame;
pub mod frequency;
pub mod io_utils;
pub mod loader;
pub mod overview;
pub mod profile;
pub mod schema;
pub mod table;
pub mod view;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, InputArgs},
    config::EdaConfig,
    frame::Table,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_lens", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Overview(args) => overview::execute(&args, &config),
        Commands::Analyze(args) => analyze::execute(&args, &config),
        Commands::Chart(args) => chart_cmd::execute(&args, &config),
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<EdaConfig> {
    match path {
        Some(path) => {
            let config = EdaConfig::load(path)
                .with_context(|| format!("Loading configuration from {path:?}"))?;
            debug!("Loaded configuration: {config:?}");
            Ok(config)
        }
        None => Ok(EdaConfig::default()),
    }
}

pub(crate) fn load_input(args: &InputArgs) -> Result<Table> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    info!(
        "Loading '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(delimiter)
    );
    let table = loader::load_csv(&args.input, Some(delimiter), encoding)?;
    info!(
        "Loaded {} row(s) across {} column(s)",
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
