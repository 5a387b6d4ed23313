use anyhow::Result;
use itertools::Itertools;
use log::info;

use crate::{
    cli::OverviewArgs,
    config::EdaConfig,
    correlation::CorrelationMatrix,
    error::EdaError,
    explore::Explorer,
    profile::ColumnProfile,
    schema::ColumnSchema,
    table,
};

pub fn execute(args: &OverviewArgs, config: &EdaConfig) -> Result<()> {
    let table = crate::load_input(&args.input)?;
    let explorer = Explorer::new(&table, config.clone());

    println!(
        "Shape: {} row(s) x {} column(s)",
        table.row_count(),
        table.column_count()
    );
    println!();
    println!("Preview (first {} row(s))", args.rows.min(table.row_count()));
    table::print_table(&table.headers(), &table.head(args.rows));
    println!();

    let dataset = match explorer.dataset_profile() {
        Ok(dataset) => dataset,
        Err(EdaError::EmptyTable) => {
            println!("{}", EdaError::EmptyTable);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!("Column info");
    let info_rows = explorer
        .schema()
        .columns
        .iter()
        .map(|column| {
            let non_null = dataset
                .null_count(&column.name)
                .map_or(0, |counts| counts.non_null);
            vec![
                column.name.clone(),
                non_null.to_string(),
                column.storage.to_string(),
                column.kind.to_string(),
            ]
        })
        .collect_vec();
    table::print_table(
        &headers(&["column", "non_null", "storage", "kind"]),
        &info_rows,
    );
    println!();

    println!("Summary statistics");
    let summary_rows = explorer
        .schema()
        .columns
        .iter()
        .map(|column| -> Result<Vec<String>> {
            let profile = explorer.column_profile(&column.name)?;
            let non_null = dataset
                .null_count(&column.name)
                .map_or(0, |counts| counts.non_null);
            Ok(summary_row(column, &profile, non_null))
        })
        .collect::<Result<Vec<_>>>()?;
    table::print_table(
        &headers(&[
            "column", "count", "unique", "top", "freq", "mean", "std", "min", "25%", "50%", "75%",
            "max",
        ]),
        &summary_rows,
    );

    if let Some(matrix) = &dataset.correlation {
        println!();
        println!("Correlation matrix");
        let (matrix_headers, matrix_rows) = correlation_rows(matrix);
        table::print_table(&matrix_headers, &matrix_rows);
    }

    info!(
        "Profiled {} column(s) over {} row(s)",
        dataset.columns, dataset.rows
    );
    Ok(())
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn summary_row(column: &ColumnSchema, profile: &ColumnProfile, non_null: usize) -> Vec<String> {
    let blank = String::new;
    match profile {
        ColumnProfile::Numeric(p) => vec![
            column.name.clone(),
            p.count.to_string(),
            blank(),
            blank(),
            blank(),
            format_stat(p.mean),
            format_stat(p.std),
            format_stat(p.min),
            format_stat(p.q25),
            format_stat(p.median),
            format_stat(p.q75),
            format_stat(p.max),
        ],
        ColumnProfile::Categorical(p) => vec![
            column.name.clone(),
            p.non_missing.to_string(),
            p.unique_count.to_string(),
            p.top().unwrap_or_default().to_string(),
            p.top_frequency().map(|f| f.to_string()).unwrap_or_default(),
            blank(),
            blank(),
            blank(),
            blank(),
            blank(),
            blank(),
            blank(),
        ],
        ColumnProfile::Datetime(p) => vec![
            column.name.clone(),
            p.count.to_string(),
            blank(),
            blank(),
            blank(),
            blank(),
            blank(),
            p.min.map(|d| d.to_string()).unwrap_or_default(),
            blank(),
            blank(),
            blank(),
            p.max.map(|d| d.to_string()).unwrap_or_default(),
        ],
        ColumnProfile::Unsupported { .. } => {
            let mut row = vec![
                column.name.clone(),
                non_null.to_string(),
                column.unique_count.to_string(),
            ];
            row.resize(12, String::new());
            row
        }
    }
}

fn correlation_rows(matrix: &CorrelationMatrix) -> (Vec<String>, Vec<Vec<String>>) {
    let mut matrix_headers = vec![String::new()];
    matrix_headers.extend(matrix.columns.iter().cloned());
    let rows = matrix
        .columns
        .iter()
        .zip(&matrix.values)
        .map(|(name, values)| {
            let mut row = vec![name.clone()];
            row.extend(values.iter().map(|value| match value {
                Some(r) => format!("{r:.2}"),
                None => "n/a".to_string(),
            }));
            row
        })
        .collect_vec();
    (matrix_headers, rows)
}

fn format_stat(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.4}")).unwrap_or_default()
}
