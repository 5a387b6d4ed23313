use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::ChartArgs,
    config::EdaConfig,
    explore::Explorer,
    view::{ViewKind, ViewRequest},
};

pub fn execute(args: &ChartArgs, config: &EdaConfig) -> Result<()> {
    let view: ViewKind = args.view.parse()?;
    let request = build_request(view, args);
    let table = crate::load_input(&args.input)?;
    let explorer = Explorer::new(&table, config.clone());
    let output = explorer
        .render(&request)
        .with_context(|| format!("Rendering {view} view"))?;
    for notice in &output.selection.notices {
        info!("{notice}");
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Maps command-line options onto the request for `view`. `--column` and
/// `-x` are interchangeable for single-column views.
fn build_request(view: ViewKind, args: &ChartArgs) -> ViewRequest {
    let primary = args.column.clone().or_else(|| args.x.clone());
    match view {
        ViewKind::Histogram => ViewRequest::Histogram {
            column: primary,
            bins: args.bins,
            color: args.color.clone(),
            theme: args.theme,
        },
        ViewKind::TimeSeries => ViewRequest::TimeSeries {
            x: args.x.clone(),
            y: args.y.clone(),
            theme: args.theme,
        },
        ViewKind::Scatter => ViewRequest::Scatter {
            x: args.x.clone(),
            y: args.y.clone(),
            color: args.color.clone(),
            theme: args.theme,
        },
        ViewKind::Correlation => ViewRequest::Correlation { theme: args.theme },
        ViewKind::ColumnAnalyzer => ViewRequest::ColumnAnalyzer { column: primary },
    }
}
