//! Declarative chart specifications.
//!
//! [`build`] is a pure function of its inputs: the same selection and
//! statistics always produce the same [`ChartSpec`]. Specs carry everything
//! a renderer needs (mark, encodings, binning, color scale, titles) so no
//! chart detail has to be re-derived downstream.

use serde::Serialize;

use crate::{
    correlation::CorrelationMatrix,
    profile::NumericProfile,
    schema::Kind,
    view::{SelectedColumn, Selection, Theme, ViewKind},
};

pub const QUALITATIVE_PALETTE: &str = "Plotly";
pub const DIVERGING_PALETTE: &str = "RdBu";
pub const CORRELATION_DOMAIN: [f64; 2] = [-1.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Bar,
    Line,
    Point,
    Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Quantitative,
    Temporal,
    Nominal,
}

impl FieldType {
    fn for_kind(kind: Kind) -> Self {
        match kind {
            Kind::Numeric => FieldType::Quantitative,
            Kind::Datetime => FieldType::Temporal,
            Kind::Categorical | Kind::Boolean | Kind::Text => FieldType::Nominal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    Count,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Encoding {
    pub field: String,
    pub title: String,
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<Aggregate>,
}

impl Encoding {
    fn for_column(column: &SelectedColumn) -> Self {
        Self {
            field: column.name.clone(),
            title: column.name.clone(),
            field_type: FieldType::for_kind(column.kind),
            aggregate: None,
        }
    }

    fn count_of(column: &SelectedColumn, title: &str) -> Self {
        Self {
            field: column.name.clone(),
            title: title.to_string(),
            field_type: FieldType::Quantitative,
            aggregate: Some(Aggregate::Count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinSpec {
    /// Upper bound on the number of bins.
    pub count: usize,
    /// Observed `[min, max]` of the binned field, when known.
    pub extent: Option<[f64; 2]>,
    pub step: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColorScale {
    Qualitative {
        palette: String,
    },
    Diverging {
        palette: String,
        domain: [f64; 2],
        title: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginalMark {
    Box,
    Histogram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Marginal {
    pub axis: Axis,
    pub mark: MarginalMark,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub view: ViewKind,
    pub mark: Mark,
    pub title: String,
    pub x: Option<Encoding>,
    pub y: Option<Encoding>,
    pub color: Option<Encoding>,
    pub bins: Option<BinSpec>,
    pub color_scale: Option<ColorScale>,
    pub marginals: Vec<Marginal>,
    pub opacity: f64,
    pub show_points: bool,
    pub annotate_cells: bool,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub theme: Theme,
    pub matrix: Option<CorrelationMatrix>,
    /// Set when the data cannot fill the chart, e.g. no present values.
    pub note: Option<String>,
}

impl ChartSpec {
    fn base(view: ViewKind, mark: Mark, title: String, theme: Theme) -> Self {
        Self {
            view,
            mark,
            title,
            x: None,
            y: None,
            color: None,
            bins: None,
            color_scale: None,
            marginals: Vec::new(),
            opacity: 1.0,
            show_points: false,
            annotate_cells: false,
            width: None,
            height: None,
            theme,
            matrix: None,
            note: None,
        }
    }

    pub fn x_field(&self) -> Option<&str> {
        self.x.as_ref().map(|e| e.field.as_str())
    }

    pub fn y_field(&self) -> Option<&str> {
        self.y.as_ref().map(|e| e.field.as_str())
    }

    pub fn color_field(&self) -> Option<&str> {
        self.color.as_ref().map(|e| e.field.as_str())
    }

    pub fn bin_count(&self) -> Option<usize> {
        self.bins.as_ref().map(|b| b.count)
    }
}

/// Statistics a chart may draw on beyond the selection itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartInputs<'a> {
    /// Profile of the x column, for bin extents and empty-data notes.
    pub x_profile: Option<&'a NumericProfile>,
    pub correlation: Option<&'a CorrelationMatrix>,
}

pub fn build(selection: &Selection, inputs: ChartInputs<'_>) -> ChartSpec {
    let params = &selection.params;
    match selection.view {
        ViewKind::Histogram => {
            let mut spec = histogram(selection, inputs, "count");
            spec.opacity = 0.8;
            spec.height = Some(450);
            spec.marginals = vec![Marginal {
                axis: Axis::X,
                mark: MarginalMark::Box,
            }];
            spec
        }
        ViewKind::ColumnAnalyzer => {
            let mut spec = histogram(selection, inputs, "Frequency");
            if let Some(x) = &params.x {
                spec.title = format!("Distribution of {}", x.name);
            }
            spec.opacity = 0.8;
            spec.height = Some(300);
            spec
        }
        ViewKind::TimeSeries => {
            let title = match (&params.x, &params.y) {
                (Some(x), Some(y)) => format!("{} over {}", y.name, x.name),
                _ => "Time Series".to_string(),
            };
            let mut spec = ChartSpec::base(selection.view, Mark::Line, title, params.theme);
            spec.x = params.x.as_ref().map(Encoding::for_column);
            spec.y = params.y.as_ref().map(Encoding::for_column);
            spec.show_points = true;
            spec
        }
        ViewKind::Scatter => {
            let title = match (&params.x, &params.y) {
                (Some(x), Some(y)) => {
                    with_color(format!("{} vs {}", y.name, x.name), params.color.as_ref())
                }
                _ => "Scatter".to_string(),
            };
            let mut spec = ChartSpec::base(selection.view, Mark::Point, title, params.theme);
            spec.x = params.x.as_ref().map(Encoding::for_column);
            spec.y = params.y.as_ref().map(Encoding::for_column);
            apply_color(&mut spec, params.color.as_ref());
            spec.marginals = vec![
                Marginal {
                    axis: Axis::X,
                    mark: MarginalMark::Histogram,
                },
                Marginal {
                    axis: Axis::Y,
                    mark: MarginalMark::Histogram,
                },
            ];
            spec.opacity = 0.7;
            spec.height = Some(500);
            spec
        }
        ViewKind::Correlation => correlation(selection, inputs.correlation),
    }
}

fn histogram(selection: &Selection, inputs: ChartInputs<'_>, count_title: &str) -> ChartSpec {
    let params = &selection.params;
    let title = match &params.x {
        Some(x) => with_color(format!("Histogram of {}", x.name), params.color.as_ref()),
        None => "Histogram".to_string(),
    };
    let mut spec = ChartSpec::base(selection.view, Mark::Bar, title, params.theme);
    spec.x = params.x.as_ref().map(Encoding::for_column);
    spec.y = params.x.as_ref().map(|x| Encoding::count_of(x, count_title));
    apply_color(&mut spec, params.color.as_ref());

    let count = params.bins.unwrap_or(crate::config::DEFAULT_BINS);
    let extent = inputs.x_profile.and_then(|p| Some([p.min?, p.max?]));
    let step = extent
        .filter(|[lo, hi]| hi > lo)
        .map(|[lo, hi]| (hi - lo) / count as f64);
    spec.bins = Some(BinSpec {
        count,
        extent,
        step,
    });
    if let Some(profile) = inputs.x_profile
        && profile.count == 0
    {
        spec.note = Some(format!(
            "Insufficient data: '{}' has no non-missing values",
            profile.column
        ));
    }
    spec
}

fn correlation(selection: &Selection, matrix: Option<&CorrelationMatrix>) -> ChartSpec {
    let mut spec = ChartSpec::base(
        selection.view,
        Mark::Rect,
        "Correlation Matrix".to_string(),
        selection.params.theme,
    );
    spec.color_scale = Some(ColorScale::Diverging {
        palette: DIVERGING_PALETTE.to_string(),
        domain: CORRELATION_DOMAIN,
        title: "Correlation".to_string(),
    });
    spec.annotate_cells = true;
    spec.width = Some(1100);
    spec.height = Some(900);
    match matrix {
        Some(matrix) => {
            let undefined = matrix.undefined_cells().len();
            if undefined > 0 {
                spec.note = Some(format!(
                    "{undefined} cell(s) undefined: fewer than 2 paired observations or zero variance"
                ));
            }
            spec.matrix = Some(matrix.clone());
        }
        None => {
            spec.note = Some("Insufficient data: correlation matrix unavailable".to_string());
        }
    }
    spec
}

fn with_color(title: String, color: Option<&SelectedColumn>) -> String {
    match color {
        Some(color) => format!("{title} colored by {}", color.name),
        None => title,
    }
}

fn apply_color(spec: &mut ChartSpec, color: Option<&SelectedColumn>) {
    if let Some(color) = color {
        spec.color = Some(Encoding::for_column(color));
        spec.color_scale = Some(ColorScale::Qualitative {
            palette: QUALITATIVE_PALETTE.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{EligibleColumns, ViewParams};

    fn column(name: &str, kind: Kind) -> SelectedColumn {
        SelectedColumn {
            name: name.to_string(),
            kind,
        }
    }

    fn selection(view: ViewKind, params: ViewParams) -> Selection {
        Selection {
            view,
            eligible: EligibleColumns::default(),
            params,
            notices: Vec::new(),
        }
    }

    fn params(x: Option<SelectedColumn>, y: Option<SelectedColumn>) -> ViewParams {
        ViewParams {
            x,
            y,
            color: None,
            bins: None,
            theme: Theme::default(),
        }
    }

    #[test]
    fn histogram_title_mentions_color_column() {
        let mut p = params(Some(column("age", Kind::Numeric)), None);
        p.color = Some(column("city", Kind::Categorical));
        p.bins = Some(12);
        let spec = build(&selection(ViewKind::Histogram, p), ChartInputs::default());
        assert_eq!(spec.title, "Histogram of age colored by city");
        assert_eq!(spec.mark, Mark::Bar);
        assert_eq!(spec.bin_count(), Some(12));
        assert_eq!(spec.color_field(), Some("city"));
        assert_eq!(
            spec.color_scale,
            Some(ColorScale::Qualitative {
                palette: "Plotly".to_string()
            })
        );
        assert_eq!(spec.y.unwrap().aggregate, Some(Aggregate::Count));
    }

    #[test]
    fn histogram_without_color_has_null_binding() {
        let spec = build(
            &selection(
                ViewKind::Histogram,
                params(Some(column("age", Kind::Numeric)), None),
            ),
            ChartInputs::default(),
        );
        assert_eq!(spec.color, None);
        assert_eq!(spec.color_scale, None);
        assert_eq!(spec.title, "Histogram of age");
    }

    #[test]
    fn time_series_uses_temporal_axis_for_datetime_columns() {
        let spec = build(
            &selection(
                ViewKind::TimeSeries,
                params(
                    Some(column("day", Kind::Datetime)),
                    Some(column("sales", Kind::Numeric)),
                ),
            ),
            ChartInputs::default(),
        );
        assert_eq!(spec.mark, Mark::Line);
        assert!(spec.show_points);
        assert_eq!(spec.x.unwrap().field_type, FieldType::Temporal);
        assert_eq!(spec.title, "sales over day");
    }

    #[test]
    fn correlation_scale_is_fixed_to_unit_range() {
        let matrix = CorrelationMatrix {
            columns: vec!["a".to_string(), "b".to_string()],
            values: vec![vec![Some(1.0), Some(0.2)], vec![Some(0.2), Some(1.0)]],
        };
        let spec = build(
            &selection(ViewKind::Correlation, params(None, None)),
            ChartInputs {
                x_profile: None,
                correlation: Some(&matrix),
            },
        );
        assert_eq!(spec.mark, Mark::Rect);
        assert_eq!(spec.matrix.as_ref(), Some(&matrix));
        assert_eq!(spec.note, None);
        match spec.color_scale {
            Some(ColorScale::Diverging { domain, .. }) => assert_eq!(domain, [-1.0, 1.0]),
            other => panic!("unexpected scale {other:?}"),
        }
    }
}
