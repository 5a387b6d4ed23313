//! View requests and column eligibility.
//!
//! [`select`] turns a [`ViewRequest`] into a [`Selection`]: the columns
//! eligible for every role of the view and the resolved parameters. Column
//! options left as `None` fall back to the first eligible column, the way a
//! freshly opened dropdown would. Explicit choices are checked against the
//! eligible set.
//!
//! | view | x | y | color |
//! |---|---|---|---|
//! | histogram | numeric | count | categorical or boolean, within threshold |
//! | time-series | time candidates, else every column | numeric | - |
//! | scatter | numeric | numeric, second one by default | categorical, within threshold |
//! | correlation | all numeric (at least two) | - | - |
//! | column-analyzer | any column not classified as text | - | - |

use std::{fmt, str::FromStr};

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    config::EdaConfig,
    error::{EdaError, Result},
    schema::{Kind, Schema},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    Histogram,
    TimeSeries,
    Scatter,
    Correlation,
    ColumnAnalyzer,
}

impl ViewKind {
    pub const ALL: [ViewKind; 5] = [
        ViewKind::Histogram,
        ViewKind::TimeSeries,
        ViewKind::Scatter,
        ViewKind::Correlation,
        ViewKind::ColumnAnalyzer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::Histogram => "histogram",
            ViewKind::TimeSeries => "time-series",
            ViewKind::Scatter => "scatter",
            ViewKind::Correlation => "correlation",
            ViewKind::ColumnAnalyzer => "column-analyzer",
        }
    }

    pub fn tags() -> Vec<&'static str> {
        Self::ALL.iter().map(ViewKind::as_str).collect()
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = EdaError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "histogram" | "distribution" | "hist" => Ok(ViewKind::Histogram),
            "time-series" | "timeseries" | "line" => Ok(ViewKind::TimeSeries),
            "scatter" => Ok(ViewKind::Scatter),
            "correlation" | "heatmap" | "corr" => Ok(ViewKind::Correlation),
            "column-analyzer" | "analyzer" | "analyze" => Ok(ViewKind::ColumnAnalyzer),
            _ => Err(EdaError::UnsupportedView(value.to_string())),
        }
    }
}

/// Renderer template applied to every chart of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Theme {
    #[default]
    #[serde(rename = "plotly_dark")]
    #[value(name = "plotly_dark")]
    PlotlyDark,
    #[serde(rename = "plotly")]
    #[value(name = "plotly")]
    Plotly,
    #[serde(rename = "ggplot2")]
    #[value(name = "ggplot2")]
    Ggplot2,
    #[serde(rename = "seaborn")]
    #[value(name = "seaborn")]
    Seaborn,
    #[serde(rename = "viridis")]
    #[value(name = "viridis")]
    Viridis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "kebab-case")]
pub enum ViewRequest {
    Histogram {
        column: Option<String>,
        bins: Option<usize>,
        color: Option<String>,
        #[serde(default)]
        theme: Theme,
    },
    TimeSeries {
        x: Option<String>,
        y: Option<String>,
        #[serde(default)]
        theme: Theme,
    },
    Scatter {
        x: Option<String>,
        y: Option<String>,
        color: Option<String>,
        #[serde(default)]
        theme: Theme,
    },
    Correlation {
        #[serde(default)]
        theme: Theme,
    },
    ColumnAnalyzer {
        column: Option<String>,
    },
}

impl ViewRequest {
    pub fn view(&self) -> ViewKind {
        match self {
            ViewRequest::Histogram { .. } => ViewKind::Histogram,
            ViewRequest::TimeSeries { .. } => ViewKind::TimeSeries,
            ViewRequest::Scatter { .. } => ViewKind::Scatter,
            ViewRequest::Correlation { .. } => ViewKind::Correlation,
            ViewRequest::ColumnAnalyzer { .. } => ViewKind::ColumnAnalyzer,
        }
    }

    /// A request for `view` with every option left at its default.
    pub fn defaults(view: ViewKind) -> Self {
        match view {
            ViewKind::Histogram => ViewRequest::Histogram {
                column: None,
                bins: None,
                color: None,
                theme: Theme::default(),
            },
            ViewKind::TimeSeries => ViewRequest::TimeSeries {
                x: None,
                y: None,
                theme: Theme::default(),
            },
            ViewKind::Scatter => ViewRequest::Scatter {
                x: None,
                y: None,
                color: None,
                theme: Theme::default(),
            },
            ViewKind::Correlation => ViewRequest::Correlation {
                theme: Theme::default(),
            },
            ViewKind::ColumnAnalyzer => ViewRequest::ColumnAnalyzer { column: None },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedColumn {
    pub name: String,
    pub kind: Kind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EligibleColumns {
    pub x: Vec<String>,
    pub y: Vec<String>,
    pub color: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewParams {
    pub x: Option<SelectedColumn>,
    pub y: Option<SelectedColumn>,
    pub color: Option<SelectedColumn>,
    pub bins: Option<usize>,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub view: ViewKind,
    pub eligible: EligibleColumns,
    pub params: ViewParams,
    /// Degraded-mode explanations for the user, e.g. fallbacks taken.
    pub notices: Vec<String>,
}

pub fn select(request: &ViewRequest, schema: &Schema, config: &EdaConfig) -> Result<Selection> {
    let view = request.view();
    let selection = match request {
        ViewRequest::Histogram {
            column,
            bins,
            color,
            theme,
        } => select_histogram(schema, config, column, *bins, color, *theme),
        ViewRequest::TimeSeries { x, y, theme } => select_time_series(schema, x, y, *theme),
        ViewRequest::Scatter { x, y, color, theme } => {
            select_scatter(schema, config, x, y, color, *theme)
        }
        ViewRequest::Correlation { theme } => select_correlation(schema, *theme),
        ViewRequest::ColumnAnalyzer { column } => select_analyzer(schema, config, column),
    }?;
    debug!(
        "Selected {view}: x={:?} y={:?} color={:?} bins={:?}",
        selection.params.x.as_ref().map(|c| &c.name),
        selection.params.y.as_ref().map(|c| &c.name),
        selection.params.color.as_ref().map(|c| &c.name),
        selection.params.bins
    );
    Ok(selection)
}

fn select_histogram(
    schema: &Schema,
    config: &EdaConfig,
    column: &Option<String>,
    bins: Option<usize>,
    color: &Option<String>,
    theme: Theme,
) -> Result<Selection> {
    let view = ViewKind::Histogram;
    let x_options = schema.numeric_columns();
    let color_options = schema.categorical_like(config.cardinality_threshold);
    let x = choose(schema, view, "x", &x_options, column.as_deref())?;
    let color = choose_optional(schema, view, "color", &color_options, color.as_deref())?;
    let bins = bins.unwrap_or(config.default_bins);
    if !config.bins_in_range(bins) {
        return Err(EdaError::InvalidBins {
            requested: bins,
            min: config.min_bins,
            max: config.max_bins,
        });
    }
    let mut notices = Vec::new();
    if color_options.is_empty() {
        notices.push(format!(
            "No categorical columns with ≤{} unique values available for coloring.",
            config.cardinality_threshold
        ));
    }
    Ok(Selection {
        view,
        eligible: EligibleColumns {
            x: x_options,
            y: Vec::new(),
            color: color_options,
        },
        params: ViewParams {
            x: Some(x),
            y: None,
            color,
            bins: Some(bins),
            theme,
        },
        notices,
    })
}

fn select_time_series(
    schema: &Schema,
    x: &Option<String>,
    y: &Option<String>,
    theme: Theme,
) -> Result<Selection> {
    let view = ViewKind::TimeSeries;
    let mut notices = Vec::new();
    let mut x_options = schema.time_candidates();
    if x_options.is_empty() {
        notices.push(
            "No date or time column detected; offering every column for the x axis.".to_string(),
        );
        x_options = schema.names();
    }
    let y_options = schema.numeric_columns();
    let x = choose(schema, view, "x", &x_options, x.as_deref())?;
    let y = choose(schema, view, "y", &y_options, y.as_deref())?;
    Ok(Selection {
        view,
        eligible: EligibleColumns {
            x: x_options,
            y: y_options,
            color: Vec::new(),
        },
        params: ViewParams {
            x: Some(x),
            y: Some(y),
            color: None,
            bins: None,
            theme,
        },
        notices,
    })
}

fn select_scatter(
    schema: &Schema,
    config: &EdaConfig,
    x: &Option<String>,
    y: &Option<String>,
    color: &Option<String>,
    theme: Theme,
) -> Result<Selection> {
    let view = ViewKind::Scatter;
    let numeric = schema.numeric_columns();
    if numeric.is_empty() {
        return Err(EdaError::InsufficientNumericColumns {
            view,
            required: 1,
            found: 0,
        });
    }
    let color_options = schema.categorical(config.cardinality_threshold);
    let x = choose(schema, view, "x", &numeric, x.as_deref())?;
    let mut notices = Vec::new();
    let y = match y.as_deref() {
        Some(name) => choose(schema, view, "y", &numeric, Some(name))?,
        None if numeric.len() > 1 => choose(schema, view, "y", &numeric[1..], None)?,
        None => {
            notices.push(format!(
                "Only one numeric column; plotting '{}' against itself.",
                x.name
            ));
            x.clone()
        }
    };
    let color = choose_optional(schema, view, "color", &color_options, color.as_deref())?;
    Ok(Selection {
        view,
        eligible: EligibleColumns {
            x: numeric.clone(),
            y: numeric,
            color: color_options,
        },
        params: ViewParams {
            x: Some(x),
            y: Some(y),
            color,
            bins: None,
            theme,
        },
        notices,
    })
}

fn select_correlation(schema: &Schema, theme: Theme) -> Result<Selection> {
    let view = ViewKind::Correlation;
    let numeric = schema.numeric_columns();
    if numeric.len() < 2 {
        return Err(EdaError::InsufficientNumericColumns {
            view,
            required: 2,
            found: numeric.len(),
        });
    }
    Ok(Selection {
        view,
        eligible: EligibleColumns {
            x: numeric.clone(),
            y: numeric,
            color: Vec::new(),
        },
        params: ViewParams {
            x: None,
            y: None,
            color: None,
            bins: None,
            theme,
        },
        notices: Vec::new(),
    })
}

fn select_analyzer(
    schema: &Schema,
    config: &EdaConfig,
    column: &Option<String>,
) -> Result<Selection> {
    let view = ViewKind::ColumnAnalyzer;
    let options = schema.names();
    let chosen = choose(schema, view, "column", &options, column.as_deref())?;
    if chosen.kind == Kind::Text {
        return Err(EdaError::UnsupportedColumnKind {
            column: chosen.name,
            kind: chosen.kind,
        });
    }
    let bins = (chosen.kind == Kind::Numeric).then_some(config.analyzer_max_bins);
    Ok(Selection {
        view,
        eligible: EligibleColumns {
            x: options,
            y: Vec::new(),
            color: Vec::new(),
        },
        params: ViewParams {
            x: Some(chosen),
            y: None,
            color: None,
            bins,
            theme: Theme::default(),
        },
        notices: Vec::new(),
    })
}

fn choose(
    schema: &Schema,
    view: ViewKind,
    role: &'static str,
    options: &[String],
    requested: Option<&str>,
) -> Result<SelectedColumn> {
    match requested {
        Some(name) => resolve(schema, view, role, options, name),
        None => {
            let first = options
                .first()
                .ok_or(EdaError::NoEligibleColumns { view, role })?;
            resolve(schema, view, role, options, first)
        }
    }
}

fn choose_optional(
    schema: &Schema,
    view: ViewKind,
    role: &'static str,
    options: &[String],
    requested: Option<&str>,
) -> Result<Option<SelectedColumn>> {
    requested
        .map(|name| resolve(schema, view, role, options, name))
        .transpose()
}

fn resolve(
    schema: &Schema,
    view: ViewKind,
    role: &'static str,
    options: &[String],
    name: &str,
) -> Result<SelectedColumn> {
    let column = schema
        .column(name)
        .ok_or_else(|| EdaError::UnknownColumn(name.to_string()))?;
    if !options.iter().any(|o| o == name) {
        return Err(EdaError::IneligibleColumn {
            view,
            role,
            column: name.to_string(),
        });
    }
    Ok(SelectedColumn {
        name: column.name.clone(),
        kind: column.kind,
    })
}
