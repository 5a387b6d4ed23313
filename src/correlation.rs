//! Pairwise-complete Pearson correlation.
//!
//! Each pair of columns is correlated over the rows where *both* hold a
//! value, independently of gaps in other columns. A cell is undefined
//! (`None`) when a pair shares fewer than two observations or either side
//! has no variance over those rows; undefined cells are never reported as
//! zero. Only the upper triangle is computed and mirrored, so the matrix is
//! exactly symmetric.

use log::debug;
use serde::Serialize;

use crate::{
    error::{EdaError, Result},
    frame::Table,
    view::ViewKind,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == row)?;
        let j = self.columns.iter().position(|c| c == column)?;
        self.values.get(i)?.get(j).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Undefined cells as `(row, column)` name pairs, upper triangle and
    /// diagonal only.
    pub fn undefined_cells(&self) -> Vec<(String, String)> {
        let mut cells = Vec::new();
        for (i, (row_name, row)) in self.columns.iter().zip(&self.values).enumerate() {
            for (column_name, cell) in self.columns.iter().zip(row).skip(i) {
                if cell.is_none() {
                    cells.push((row_name.clone(), column_name.clone()));
                }
            }
        }
        cells
    }
}

/// Correlates the named columns of `table`, in the given order.
///
/// Names that are not in the table are rejected with `UnknownColumn`;
/// fewer than two names with `InsufficientNumericColumns`.
pub fn correlation_matrix(table: &Table, columns: &[&str]) -> Result<CorrelationMatrix> {
    if columns.len() < 2 {
        return Err(EdaError::InsufficientNumericColumns {
            view: ViewKind::Correlation,
            required: 2,
            found: columns.len(),
        });
    }
    let series = columns
        .iter()
        .map(|name| {
            table
                .column(name)
                .map(|c| c.numeric_values())
                .ok_or_else(|| EdaError::UnknownColumn((*name).to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    let n = series.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        values[i][i] = pearson(&series[i], &series[i]).map(|_| 1.0);
        for j in i + 1..n {
            let r = pearson(&series[i], &series[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    debug!("Computed {n}x{n} correlation matrix");
    Ok(CorrelationMatrix {
        columns: columns.iter().map(|c| (*c).to_string()).collect(),
        values,
    })
}

/// Pearson's r over rows where both sides are present.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let count = pairs.len() as f64;
    let mean_x = mean(pairs.iter().map(|(x, _)| *x), count);
    let mean_y = mean(pairs.iter().map(|(_, y)| *y), count);
    // Deviations are scaled into [-1, 1] so the sums of squares cannot overflow.
    let scale_x = pairs.iter().map(|(x, _)| (x - mean_x).abs()).fold(0.0, f64::max);
    let scale_y = pairs.iter().map(|(_, y)| (y - mean_y).abs()).fold(0.0, f64::max);
    if !(scale_x > 0.0 && scale_y > 0.0 && scale_x.is_finite() && scale_y.is_finite()) {
        return None;
    }
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = (x - mean_x) / scale_x;
        let dy = (y - mean_y) / scale_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    let r = sxy / (sxx * syy).sqrt();
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

fn mean(values: impl Iterator<Item = f64> + Clone, count: f64) -> f64 {
    let plain = values.clone().sum::<f64>() / count;
    if plain.is_finite() {
        plain
    } else {
        values.map(|v| v / count).sum()
    }
}
