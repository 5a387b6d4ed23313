//! Whole-table statistics: shape, missing counts, numeric correlation.

use log::debug;
use serde::Serialize;

use crate::{
    correlation::{CorrelationMatrix, correlation_matrix},
    error::{EdaError, Result},
    frame::Table,
    schema::Schema,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NullCount {
    pub column: String,
    pub non_null: usize,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: usize,
    pub null_counts: Vec<NullCount>,
    /// Present only when the table has at least two numeric columns.
    pub correlation: Option<CorrelationMatrix>,
}

impl DatasetProfile {
    pub fn null_count(&self, column: &str) -> Option<&NullCount> {
        self.null_counts.iter().find(|n| n.column == column)
    }
}

pub fn profile_dataset(table: &Table, schema: &Schema) -> Result<DatasetProfile> {
    if table.is_empty() {
        return Err(EdaError::EmptyTable);
    }
    let null_counts = table
        .columns()
        .iter()
        .map(|column| {
            let missing = column.missing_count();
            NullCount {
                column: column.name().to_string(),
                non_null: column.len() - missing,
                missing,
            }
        })
        .collect();

    let numeric = schema.numeric_columns();
    let correlation = if numeric.len() >= 2 {
        let names: Vec<&str> = numeric.iter().map(String::as_str).collect();
        Some(correlation_matrix(table, &names)?)
    } else {
        debug!(
            "Skipping correlation: {} numeric column(s) available",
            numeric.len()
        );
        None
    };

    Ok(DatasetProfile {
        rows: table.row_count(),
        columns: table.column_count(),
        null_counts,
        correlation,
    })
}
