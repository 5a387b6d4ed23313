use anyhow::{Context, Result, anyhow};
use chrono::NaiveDateTime;
use log::info;

use crate::{
    cli::AnalyzeArgs,
    config::EdaConfig,
    explore::{ColumnAnalysis, Explorer},
    profile::{CategoricalProfile, ColumnProfile, DatetimeProfile, NumericProfile},
    table,
};

pub fn execute(args: &AnalyzeArgs, config: &EdaConfig) -> Result<()> {
    let table = crate::load_input(&args.input)?;
    let explorer = Explorer::new(&table, config.clone());
    let column = match &args.column {
        Some(column) => column.clone(),
        None => table
            .headers()
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Input has no columns to analyze"))?,
    };
    let analysis = explorer
        .analyze(&column)
        .with_context(|| format!("Analyzing column '{column}'"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_analysis(&analysis);
    }
    info!(
        "Analyzed column '{}' ({})",
        analysis.column.name, analysis.column.kind
    );
    Ok(())
}

fn print_analysis(analysis: &ColumnAnalysis) {
    println!(
        "Column '{}': {} ({} storage, {} unique incl. missing)",
        analysis.column.name,
        analysis.column.kind,
        analysis.column.storage,
        analysis.column.unique_count
    );
    println!();
    match &analysis.profile {
        ColumnProfile::Numeric(profile) => print_numeric(profile),
        ColumnProfile::Categorical(profile) => print_categorical(profile),
        ColumnProfile::Datetime(profile) => print_datetime(profile),
        ColumnProfile::Unsupported { column, kind } => {
            println!("Column '{column}' is {kind}; no profile available");
        }
    }
    if let Some(chart) = &analysis.chart {
        println!();
        println!("Chart: {}", chart.title);
        if let Some(note) = &chart.note {
            println!("Note: {note}");
        }
    }
}

fn print_numeric(profile: &NumericProfile) {
    let stat = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
    let rows = vec![
        vec!["count".to_string(), profile.count.to_string()],
        vec!["missing".to_string(), profile.missing.to_string()],
        vec!["mean".to_string(), stat(profile.mean)],
        vec!["std".to_string(), stat(profile.std)],
        vec!["min".to_string(), stat(profile.min)],
        vec!["25%".to_string(), stat(profile.q25)],
        vec!["50%".to_string(), stat(profile.median)],
        vec!["75%".to_string(), stat(profile.q75)],
        vec!["max".to_string(), stat(profile.max)],
    ];
    table::print_table(&["statistic".to_string(), "value".to_string()], &rows);
}

fn print_categorical(profile: &CategoricalProfile) {
    println!(
        "{} row(s), {} non-missing, {} unique value(s)",
        profile.rows, profile.non_missing, profile.unique_count
    );
    let rows = profile
        .frequencies
        .iter()
        .map(|entry| {
            vec![
                entry.label().to_string(),
                entry.count.to_string(),
                format!("{:.2}", entry.percent),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(
        &[
            "value".to_string(),
            "count".to_string(),
            "percent".to_string(),
        ],
        &rows,
    );
    if profile.truncated {
        println!(
            "Showing the {} most frequent of {} values",
            profile.frequencies.len(),
            profile.unique_count
        );
    }
}

fn print_datetime(profile: &DatetimeProfile) {
    if profile.no_valid_dates {
        println!("No valid dates found");
        return;
    }
    let show = |value: Option<NaiveDateTime>| value.map(|v| v.to_string()).unwrap_or_default();
    let rows = vec![
        vec!["count".to_string(), profile.count.to_string()],
        vec!["missing".to_string(), profile.missing.to_string()],
        vec!["earliest".to_string(), show(profile.min)],
        vec!["latest".to_string(), show(profile.max)],
    ];
    table::print_table(&["statistic".to_string(), "value".to_string()], &rows);
    println!();
    println!("Sample values");
    for value in &profile.sample {
        println!("  {value}");
    }
}
