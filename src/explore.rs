//! One-stop entry point over a loaded table.
//!
//! [`Explorer`] classifies the table once and then wires the pipeline
//! together: select the columns for a view, profile what the chart needs,
//! and build the chart spec.

use log::debug;
use serde::Serialize;

use crate::{
    chart::{self, ChartInputs, ChartSpec},
    config::EdaConfig,
    correlation::correlation_matrix,
    dataset::{DatasetProfile, profile_dataset},
    error::{EdaError, Result},
    frame::Table,
    profile::{ColumnProfile, profile_column},
    schema::{ColumnSchema, Schema},
    view::{self, Selection, ViewKind, ViewRequest},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewOutput {
    pub selection: Selection,
    /// Profile of the primary column, for views that have one.
    pub profile: Option<ColumnProfile>,
    pub chart: Option<ChartSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnAnalysis {
    pub column: ColumnSchema,
    pub profile: ColumnProfile,
    /// Distribution chart, numeric columns only.
    pub chart: Option<ChartSpec>,
}

pub struct Explorer<'a> {
    table: &'a Table,
    schema: Schema,
    config: EdaConfig,
}

impl<'a> Explorer<'a> {
    pub fn new(table: &'a Table, config: EdaConfig) -> Self {
        let schema = Schema::classify(table, &config);
        Self {
            table,
            schema,
            config,
        }
    }

    pub fn table(&self) -> &Table {
        self.table
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &EdaConfig {
        &self.config
    }

    pub fn column_profile(&self, name: &str) -> Result<ColumnProfile> {
        let column = self
            .table
            .column(name)
            .ok_or_else(|| EdaError::UnknownColumn(name.to_string()))?;
        let kind = self
            .schema
            .kind_of(name)
            .ok_or_else(|| EdaError::UnknownColumn(name.to_string()))?;
        Ok(profile_column(column, kind, &self.config))
    }

    pub fn dataset_profile(&self) -> Result<DatasetProfile> {
        profile_dataset(self.table, &self.schema)
    }

    /// Resolves `request` against the table and builds its chart.
    ///
    /// Every view except the column analyzer needs at least one row.
    pub fn render(&self, request: &ViewRequest) -> Result<ViewOutput> {
        let view = request.view();
        if view != ViewKind::ColumnAnalyzer && self.table.is_empty() {
            return Err(EdaError::EmptyTable);
        }
        let selection = view::select(request, &self.schema, &self.config)?;
        for notice in &selection.notices {
            debug!("{view}: {notice}");
        }
        match view {
            ViewKind::Histogram | ViewKind::ColumnAnalyzer => {
                let profile = match &selection.params.x {
                    Some(x) => Some(self.column_profile(&x.name)?),
                    None => None,
                };
                let numeric = profile.as_ref().and_then(ColumnProfile::as_numeric);
                let chart = (view == ViewKind::Histogram || numeric.is_some()).then(|| {
                    chart::build(
                        &selection,
                        ChartInputs {
                            x_profile: numeric,
                            correlation: None,
                        },
                    )
                });
                Ok(ViewOutput {
                    selection,
                    profile,
                    chart,
                })
            }
            ViewKind::TimeSeries | ViewKind::Scatter => {
                let chart = chart::build(&selection, ChartInputs::default());
                Ok(ViewOutput {
                    selection,
                    profile: None,
                    chart: Some(chart),
                })
            }
            ViewKind::Correlation => {
                let names: Vec<&str> = selection.eligible.x.iter().map(String::as_str).collect();
                let matrix = correlation_matrix(self.table, &names)?;
                let chart = chart::build(
                    &selection,
                    ChartInputs {
                        x_profile: None,
                        correlation: Some(&matrix),
                    },
                );
                Ok(ViewOutput {
                    selection,
                    profile: None,
                    chart: Some(chart),
                })
            }
        }
    }

    /// Single-column analysis: profile plus a distribution chart for
    /// numeric columns.
    pub fn analyze(&self, name: &str) -> Result<ColumnAnalysis> {
        let output = self.render(&ViewRequest::ColumnAnalyzer {
            column: Some(name.to_string()),
        })?;
        let column = self
            .schema
            .column(name)
            .cloned()
            .ok_or_else(|| EdaError::UnknownColumn(name.to_string()))?;
        let profile = match output.profile {
            Some(profile) => profile,
            None => self.column_profile(name)?,
        };
        Ok(ColumnAnalysis {
            column,
            profile,
            chart: output.chart,
        })
    }
}
