//! Per-column descriptive statistics.
//!
//! [`profile_column`] switches exhaustively on the column's [`Kind`] and
//! never fails: undefined statistics come back as `None` and degenerate
//! inputs raise explicit flags (`no_valid_dates`, `truncated`) instead of
//! errors. Text columns yield [`ColumnProfile::Unsupported`].
//!
//! Standard deviation uses the sample (n - 1) denominator, matching the
//! usual "describe" table; quantiles interpolate linearly between the two
//! closest ranks.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
    config::EdaConfig,
    frame::Column,
    frequency::{FrequencyEntry, compute_frequencies},
    schema::Kind,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "profile", rename_all = "lowercase")]
pub enum ColumnProfile {
    Numeric(NumericProfile),
    Categorical(CategoricalProfile),
    Datetime(DatetimeProfile),
    Unsupported { column: String, kind: Kind },
}

impl ColumnProfile {
    pub fn column(&self) -> &str {
        match self {
            ColumnProfile::Numeric(p) => &p.column,
            ColumnProfile::Categorical(p) => &p.column,
            ColumnProfile::Datetime(p) => &p.column,
            ColumnProfile::Unsupported { column, .. } => column,
        }
    }

    pub fn as_numeric(&self) -> Option<&NumericProfile> {
        match self {
            ColumnProfile::Numeric(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&CategoricalProfile> {
        match self {
            ColumnProfile::Categorical(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DatetimeProfile> {
        match self {
            ColumnProfile::Datetime(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ColumnProfile::Unsupported { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericProfile {
    pub column: String,
    pub count: usize,
    pub missing: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalProfile {
    pub column: String,
    pub kind: Kind,
    pub rows: usize,
    pub non_missing: usize,
    pub unique_count: usize,
    pub frequencies: Vec<FrequencyEntry>,
    pub truncated: bool,
}

impl CategoricalProfile {
    /// Most frequent present value.
    pub fn top(&self) -> Option<&str> {
        self.frequencies.iter().find_map(|e| e.value.as_deref())
    }

    pub fn top_frequency(&self) -> Option<usize> {
        self.frequencies
            .iter()
            .find(|e| e.value.is_some())
            .map(|e| e.count)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatetimeProfile {
    pub column: String,
    pub count: usize,
    pub missing: usize,
    pub min: Option<NaiveDateTime>,
    pub max: Option<NaiveDateTime>,
    pub sample: Vec<NaiveDateTime>,
    pub no_valid_dates: bool,
}

pub fn profile_column(column: &Column, kind: Kind, config: &EdaConfig) -> ColumnProfile {
    match kind {
        Kind::Numeric => ColumnProfile::Numeric(profile_numeric(column)),
        Kind::Categorical | Kind::Boolean => {
            ColumnProfile::Categorical(profile_categorical(column, kind, config.frequency_top_n))
        }
        Kind::Datetime => {
            ColumnProfile::Datetime(profile_datetime(column, config.datetime_sample_size))
        }
        Kind::Text => ColumnProfile::Unsupported {
            column: column.name().to_string(),
            kind,
        },
    }
}

pub fn profile_numeric(column: &Column) -> NumericProfile {
    let mut stats = ColumnStats::default();
    for value in column.numeric_values().into_iter().flatten() {
        stats.add_value(value);
    }
    let sorted = stats.sorted();
    NumericProfile {
        column: column.name().to_string(),
        count: stats.count(),
        missing: column.len() - stats.count(),
        mean: stats.mean(),
        std: stats.std_dev(),
        min: sorted.first().copied(),
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}

pub fn profile_categorical(column: &Column, kind: Kind, top: usize) -> CategoricalProfile {
    let table = compute_frequencies(column, top);
    CategoricalProfile {
        column: column.name().to_string(),
        kind,
        rows: table.total,
        non_missing: column.len() - column.missing_count(),
        unique_count: table.unique_count,
        frequencies: table.entries,
        truncated: table.truncated,
    }
}

pub fn profile_datetime(column: &Column, sample_size: usize) -> DatetimeProfile {
    let distinct: BTreeSet<NaiveDateTime> =
        column.present().filter_map(|v| v.as_datetime()).collect();
    let count = column.present().filter(|v| v.as_datetime().is_some()).count();
    DatetimeProfile {
        column: column.name().to_string(),
        count,
        missing: column.len() - count,
        min: distinct.first().copied(),
        max: distinct.last().copied(),
        sample: distinct.iter().take(sample_size).copied().collect(),
        no_valid_dates: distinct.is_empty(),
    }
}

/// Linear interpolation between closest ranks over ascending `sorted`.
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    let low = sorted[lower];
    let high = sorted[upper];
    Some((low + (high - low) * fraction).min(high).max(low))
}

#[derive(Default)]
struct ColumnStats {
    values: Vec<f64>,
    sum: f64,
}

impl ColumnStats {
    fn add_value(&mut self, value: f64) {
        self.sum += value;
        self.values.push(value);
    }

    fn count(&self) -> usize {
        self.values.len()
    }

    fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            let count = self.values.len() as f64;
            let mean = self.sum / count;
            if mean.is_finite() {
                Some(mean)
            } else {
                Some(self.values.iter().map(|v| v / count).sum())
            }
        }
    }

    fn std_dev(&self) -> Option<f64> {
        if self.values.len() < 2 {
            return None;
        }
        let mean = self.mean()?;
        let scale = self
            .values
            .iter()
            .map(|v| (v - mean).abs())
            .fold(0.0, f64::max);
        if scale == 0.0 {
            return Some(0.0);
        }
        if !scale.is_finite() {
            return None;
        }
        let squares: f64 = self.values.iter().map(|v| ((v - mean) / scale).powi(2)).sum();
        Some(scale * (squares / (self.values.len() as f64 - 1.0)).sqrt())
    }

    fn sorted(&self) -> Vec<f64> {
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        sorted
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::frequency::MISSING_LABEL;

    fn approx(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("defined statistic");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn numeric_profile_matches_describe() {
        let column = Column::floats("age", &[Some(25.0), Some(30.0), None, Some(40.0)]);
        let profile = profile_numeric(&column);
        assert_eq!(profile.count, 3);
        assert_eq!(profile.missing, 1);
        approx(profile.mean, 95.0 / 3.0);
        approx(profile.std, 7.637_626_158_259_733);
        approx(profile.min, 25.0);
        approx(profile.q25, 27.5);
        approx(profile.median, 30.0);
        approx(profile.q75, 35.0);
        approx(profile.max, 40.0);
    }

    #[test]
    fn all_missing_numeric_column_is_undefined() {
        let column = Column::floats("x", &[None, Some(f64::NAN)]);
        let profile = profile_numeric(&column);
        assert_eq!(profile.count, 0);
        assert_eq!(profile.mean, None);
        assert_eq!(profile.min, None);
        assert_eq!(profile.median, None);
    }

    #[test]
    fn std_survives_huge_magnitudes() {
        let column = Column::floats("x", &[Some(1e200), Some(2e200), Some(3e200)]);
        let profile = profile_numeric(&column);
        let std = profile.std.expect("defined std");
        assert!((std / 1e200 - 1.0).abs() < 1e-12, "got {std}");
        let mean = profile.mean.expect("defined mean");
        assert!((mean / 2e200 - 1.0).abs() < 1e-12, "got {mean}");
    }

    #[test]
    fn single_value_has_no_std() {
        let column = Column::integers("x", &[Some(7)]);
        let profile = profile_numeric(&column);
        assert_eq!(profile.std, None);
        approx(profile.q75, 7.0);
    }

    #[test]
    fn categorical_profile_counts_missing_bucket() {
        let column = Column::texts("city", &[Some("NY"), None, Some("NY"), Some("SF")]);
        let profile = profile_categorical(&column, Kind::Categorical, 100);
        assert_eq!(profile.unique_count, 3);
        assert_eq!(profile.non_missing, 3);
        assert_eq!(profile.top(), Some("NY"));
        assert_eq!(profile.top_frequency(), Some(2));
        assert_eq!(profile.frequencies[1].label(), MISSING_LABEL);
    }

    #[test]
    fn datetime_profile_samples_sorted_distinct_values() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d);
        let column = Column::dates("day", &[day(9), None, day(2), day(9), day(5)]);
        let profile = profile_datetime(&column, 2);
        assert_eq!(profile.count, 4);
        assert_eq!(profile.missing, 1);
        assert_eq!(profile.min.unwrap().date(), day(2).unwrap());
        assert_eq!(profile.max.unwrap().date(), day(9).unwrap());
        let sample: Vec<_> = profile.sample.iter().map(|d| d.date()).collect();
        assert_eq!(sample, vec![day(2).unwrap(), day(5).unwrap()]);
        assert!(!profile.no_valid_dates);
    }

    #[test]
    fn datetime_profile_flags_all_missing() {
        let column = Column::dates("day", &[None, None]);
        let profile = profile_datetime(&column, 10);
        assert!(profile.no_valid_dates);
        assert_eq!(profile.min, None);
        assert!(profile.sample.is_empty());
    }

    #[test]
    fn text_kind_is_unsupported() {
        let column = Column::texts("notes", &[Some("a")]);
        let profile = profile_column(&column, Kind::Text, &EdaConfig::default());
        assert_eq!(
            profile,
            ColumnProfile::Unsupported {
                column: "notes".to_string(),
                kind: Kind::Text
            }
        );
        assert!(!profile.is_supported());
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        approx(quantile(&sorted, 0.25), 1.75);
        approx(quantile(&sorted, 0.5), 2.5);
        assert_eq!(quantile(&[], 0.5), None);
    }
}
