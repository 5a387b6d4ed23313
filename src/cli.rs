use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::view::Theme;

#[derive(Debug, Parser)]
#[command(author, version, about = "Explore CSV datasets: profiles, statistics, and chart specs", long_about = None)]
pub struct Cli {
    /// YAML file overriding engine thresholds (cardinality, bins, top-N)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show shape, a data preview, column info, summary statistics, and correlations
    Overview(OverviewArgs),
    /// Profile a single column
    Analyze(AnalyzeArgs),
    /// Emit the chart specification for a view as JSON
    Chart(ChartArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input CSV file (`-` reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct OverviewArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Number of rows to preview
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Column to analyze (defaults to the first column)
    #[arg(short = 'c', long = "column")]
    pub column: Option<String>,
    /// Print the profile as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    /// View to render: histogram, time-series, scatter, correlation, column-analyzer
    pub view: String,
    #[command(flatten)]
    pub input: InputArgs,
    /// Column for single-column views (histogram, column-analyzer)
    #[arg(long)]
    pub column: Option<String>,
    /// X-axis column
    #[arg(short = 'x', long = "x")]
    pub x: Option<String>,
    /// Y-axis column
    #[arg(short = 'y', long = "y")]
    pub y: Option<String>,
    /// Column used to color marks
    #[arg(long)]
    pub color: Option<String>,
    /// Histogram bin count
    #[arg(long)]
    pub bins: Option<usize>,
    /// Renderer template
    #[arg(long, value_enum, default_value_t = Theme::PlotlyDark)]
    pub theme: Theme,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" | "\\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn delimiter_names_resolve() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter("pipe"), Ok(b'|'));
        assert_eq!(parse_delimiter(":"), Ok(b':'));
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("").is_err());
    }

    #[test]
    fn chart_arguments_parse() {
        let cli = Cli::parse_from([
            "csv-lens", "chart", "scatter", "-i", "data.csv", "-x", "a", "-y", "b", "--theme",
            "ggplot2",
        ]);
        match cli.command {
            Commands::Chart(args) => {
                assert_eq!(args.view, "scatter");
                assert_eq!(args.x.as_deref(), Some("a"));
                assert_eq!(args.theme, Theme::Ggplot2);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
