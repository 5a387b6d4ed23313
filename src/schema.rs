//! Column classification.
//!
//! [`Schema::classify`] maps every column of a [`Table`] onto exactly one
//! [`Kind`]. The decision is driven by the declared [`StorageType`]; only
//! text columns consult their data, through the distinct-value count
//! compared with [`EdaConfig::cardinality_threshold`]. The mapping is total:
//! a column the rules cannot place lands in [`Kind::Text`].
//!
//! Classification also flags *time candidates*: columns whose name mentions
//! a date or time, or whose storage is already temporal. The flag only feeds
//! the time-series x-axis choice and never changes the kind.

use std::{collections::HashSet, fmt};

use log::debug;
use serde::Serialize;

use crate::{
    config::EdaConfig,
    data::{Value, is_missing},
    frame::{Column, StorageType, Table},
};

const TIME_NAME_TOKENS: &[&str] = &["date", "time"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Numeric,
    Categorical,
    Boolean,
    Datetime,
    Text,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Numeric => "numeric",
            Kind::Categorical => "categorical",
            Kind::Boolean => "boolean",
            Kind::Datetime => "datetime",
            Kind::Text => "text",
        }
    }

    /// Boolean and categorical columns share eligibility rules.
    pub fn is_categorical_like(&self) -> bool {
        matches!(self, Kind::Categorical | Kind::Boolean)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSchema {
    pub name: String,
    pub storage: StorageType,
    pub kind: Kind,
    /// Distinct values with missing cells counted as one extra value.
    pub unique_count: usize,
    pub time_candidate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub columns: Vec<ColumnSchema>,
}

impl Schema {
    pub fn classify(table: &Table, config: &EdaConfig) -> Self {
        let columns = table
            .columns()
            .iter()
            .map(|column| classify_column(column, config))
            .collect();
        Schema { columns }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn kind_of(&self, name: &str) -> Option<Kind> {
        self.column(name).map(|c| c.kind)
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn numeric_columns(&self) -> Vec<String> {
        self.names_where(|c| c.kind == Kind::Numeric)
    }

    /// Categorical and boolean columns within the cardinality threshold.
    pub fn categorical_like(&self, threshold: usize) -> Vec<String> {
        self.names_where(|c| c.kind.is_categorical_like() && c.unique_count <= threshold)
    }

    /// Categorical columns only; booleans are left out.
    pub fn categorical(&self, threshold: usize) -> Vec<String> {
        self.names_where(|c| c.kind == Kind::Categorical && c.unique_count <= threshold)
    }

    pub fn time_candidates(&self) -> Vec<String> {
        self.names_where(|c| c.time_candidate)
    }

    fn names_where(&self, predicate: impl Fn(&ColumnSchema) -> bool) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| predicate(c))
            .map(|c| c.name.clone())
            .collect()
    }
}

fn classify_column(column: &Column, config: &EdaConfig) -> ColumnSchema {
    let unique_count = unique_count(column);
    let kind = match column.storage() {
        StorageType::Date | StorageType::DateTime => Kind::Datetime,
        StorageType::Boolean => Kind::Boolean,
        StorageType::Integer | StorageType::Float => Kind::Numeric,
        StorageType::Text => {
            if unique_count <= config.cardinality_threshold {
                Kind::Categorical
            } else {
                Kind::Text
            }
        }
    };
    let time_candidate = column.storage().is_temporal() || name_suggests_time(column.name());
    debug!(
        "Classified column '{}' ({}) as {kind} with {unique_count} distinct value(s)",
        column.name(),
        column.storage()
    );
    ColumnSchema {
        name: column.name().to_string(),
        storage: column.storage(),
        kind,
        unique_count,
        time_candidate,
    }
}

pub fn name_suggests_time(name: &str) -> bool {
    let lowered = name.to_lowercase();
    TIME_NAME_TOKENS.iter().any(|token| lowered.contains(token))
}

pub fn unique_count(column: &Column) -> usize {
    let mut seen = HashSet::new();
    let mut saw_missing = false;
    for cell in column.values() {
        match cell {
            Some(value) if !is_missing(Some(value)) => {
                seen.insert(distinct_key(value));
            }
            _ => saw_missing = true,
        }
    }
    seen.len() + usize::from(saw_missing)
}

const MAX_EXACT_INTEGER: u64 = 1 << f64::MANTISSA_DIGITS;

/// Hashable identity of a present value; floats compare by bit pattern with
/// both zeroes folded together, and integers an `f64` holds exactly share
/// the key of the equal float.
pub(crate) fn distinct_key(value: &Value) -> String {
    match value {
        Value::Float(f) => float_key(*f),
        Value::Integer(i) if i.unsigned_abs() <= MAX_EXACT_INTEGER => float_key(*i as f64),
        other => other.as_display(),
    }
}

fn float_key(f: f64) -> String {
    let normalized = if f == 0.0 { 0.0_f64 } else { f };
    format!("f:{:x}", normalized.to_bits())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EdaConfig {
        EdaConfig::default()
    }

    #[test]
    fn storage_types_map_to_kinds() {
        let table = Table::new(vec![
            Column::floats("price", &[Some(1.0), Some(2.0)]),
            Column::integers("qty", &[Some(1), None]),
            Column::booleans("paid", &[Some(true), Some(false)]),
            Column::texts("city", &[Some("NY"), Some("LA")]),
        ])
        .unwrap();
        let schema = Schema::classify(&table, &config());
        let kinds: Vec<Kind> = schema.columns.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![Kind::Numeric, Kind::Numeric, Kind::Boolean, Kind::Categorical]
        );
    }

    #[test]
    fn high_cardinality_text_is_unclassifiable() {
        let labels: Vec<String> = (0..25).map(|i| format!("id-{i}")).collect();
        let refs: Vec<Option<&str>> = labels.iter().map(|s| Some(s.as_str())).collect();
        let table = Table::new(vec![Column::texts("label", &refs)]).unwrap();
        let schema = Schema::classify(&table, &config());
        assert_eq!(schema.kind_of("label"), Some(Kind::Text));
    }

    #[test]
    fn missing_bucket_counts_towards_threshold() {
        let mut values: Vec<String> = (0..20).map(|i| format!("v{i}")).collect();
        values.push(String::new());
        let refs: Vec<Option<&str>> = values
            .iter()
            .map(|s| (!s.is_empty()).then_some(s.as_str()))
            .collect();
        let table = Table::new(vec![Column::texts("tag", &refs)]).unwrap();
        let schema = Schema::classify(&table, &config());
        let column = schema.column("tag").unwrap();
        assert_eq!(column.unique_count, 21);
        assert_eq!(column.kind, Kind::Text);
    }

    #[test]
    fn time_candidates_follow_name_and_storage() {
        assert!(name_suggests_time("OrderDate"));
        assert!(name_suggests_time("TIMESTAMP"));
        assert!(!name_suggests_time("amount"));
    }

    #[test]
    fn unique_count_folds_nan_into_missing_bucket() {
        let column = Column::floats(
            "x",
            &[Some(1.0), Some(1.0), Some(-0.0), Some(0.0), None, Some(f64::NAN)],
        );
        assert_eq!(unique_count(&column), 3);
    }

    #[test]
    fn equal_integer_and_float_cells_count_once() {
        let column = Column::new(
            "x",
            StorageType::Float,
            vec![
                Some(Value::Integer(1)),
                Some(Value::Float(1.0)),
                Some(Value::Float(2.5)),
                Some(Value::Integer(0)),
                Some(Value::Float(-0.0)),
            ],
        );
        assert_eq!(unique_count(&column), 3);
        assert_ne!(
            distinct_key(&Value::Integer(i64::MAX)),
            distinct_key(&Value::Integer(i64::MAX - 1))
        );
    }
}
