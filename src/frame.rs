//! In-memory table model.
//!
//! A [`Table`] is an ordered set of uniquely named [`Column`]s that all share
//! the same row count. Each column declares a [`StorageType`]; every present
//! value must fit that type. Tables are validated once at construction and
//! never mutated afterwards, so every derived view of them (schema, profiles,
//! chart specs) can be recomputed from the same input at any time.

use std::{collections::HashSet, fmt, str::FromStr};

use anyhow::anyhow;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{
    data::{Value, is_missing},
    error::{EdaError, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    Text,
}

impl StorageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Integer => "integer",
            StorageType::Float => "float",
            StorageType::Boolean => "boolean",
            StorageType::Date => "date",
            StorageType::DateTime => "datetime",
            StorageType::Text => "text",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, StorageType::Integer | StorageType::Float)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, StorageType::Date | StorageType::DateTime)
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" => Ok(StorageType::Integer),
            "float" | "double" => Ok(StorageType::Float),
            "boolean" | "bool" => Ok(StorageType::Boolean),
            "date" => Ok(StorageType::Date),
            "datetime" | "timestamp" => Ok(StorageType::DateTime),
            "text" | "string" => Ok(StorageType::Text),
            other => Err(anyhow!("Unknown storage type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    name: String,
    storage: StorageType,
    values: Vec<Option<Value>>,
}

impl Column {
    pub fn new(name: impl Into<String>, storage: StorageType, values: Vec<Option<Value>>) -> Self {
        Self {
            name: name.into(),
            storage,
            values,
        }
    }

    pub fn floats(name: impl Into<String>, values: &[Option<f64>]) -> Self {
        let values = values.iter().map(|v| v.map(Value::Float)).collect();
        Self::new(name, StorageType::Float, values)
    }

    pub fn integers(name: impl Into<String>, values: &[Option<i64>]) -> Self {
        let values = values.iter().map(|v| v.map(Value::Integer)).collect();
        Self::new(name, StorageType::Integer, values)
    }

    pub fn booleans(name: impl Into<String>, values: &[Option<bool>]) -> Self {
        let values = values.iter().map(|v| v.map(Value::Boolean)).collect();
        Self::new(name, StorageType::Boolean, values)
    }

    pub fn texts(name: impl Into<String>, values: &[Option<&str>]) -> Self {
        let values = values
            .iter()
            .map(|v| v.map(|s| Value::Text(s.to_string())))
            .collect();
        Self::new(name, StorageType::Text, values)
    }

    pub fn dates(name: impl Into<String>, values: &[Option<NaiveDate>]) -> Self {
        let values = values.iter().map(|v| v.map(Value::Date)).collect();
        Self::new(name, StorageType::Date, values)
    }

    pub fn datetimes(name: impl Into<String>, values: &[Option<NaiveDateTime>]) -> Self {
        let values = values.iter().map(|v| v.map(Value::DateTime)).collect();
        Self::new(name, StorageType::DateTime, values)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storage(&self) -> StorageType {
        self.storage
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row).and_then(Option::as_ref)
    }

    pub fn is_missing(&self, row: usize) -> bool {
        is_missing(self.get(row))
    }

    pub fn missing_count(&self) -> usize {
        self.values
            .iter()
            .filter(|cell| is_missing(cell.as_ref()))
            .count()
    }

    /// Present values only, in row order.
    pub fn present(&self) -> impl Iterator<Item = &Value> + '_ {
        self.values
            .iter()
            .filter_map(Option::as_ref)
            .filter(|value| !is_missing(Some(*value)))
    }

    /// Numeric reading of each row; `None` for missing or non-numeric cells.
    pub fn numeric_values(&self) -> Vec<Option<f64>> {
        self.values
            .iter()
            .map(|cell| {
                cell.as_ref()
                    .and_then(Value::as_f64)
                    .filter(|v| !v.is_nan())
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(EdaError::DuplicateColumn(column.name.clone()));
            }
        }
        if let Some(first) = columns.first() {
            let expected = first.len();
            for column in &columns {
                if column.len() != expected {
                    return Err(EdaError::RaggedColumns {
                        column: column.name.clone(),
                        expected,
                        found: column.len(),
                    });
                }
            }
        }
        for column in &columns {
            if let Some(row) = column
                .values
                .iter()
                .position(|cell| cell.as_ref().is_some_and(|v| !v.fits(column.storage)))
            {
                return Err(EdaError::StorageMismatch {
                    column: column.name.clone(),
                    row,
                });
            }
        }
        Ok(Self { columns })
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Display strings for the first `limit` rows, missing cells left blank.
    pub fn head(&self, limit: usize) -> Vec<Vec<String>> {
        (0..self.row_count().min(limit))
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| match column.get(row) {
                        Some(value) if !is_missing(Some(value)) => value.as_display(),
                        _ => String::new(),
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_names() {
        let err = Table::new(vec![
            Column::floats("a", &[Some(1.0)]),
            Column::floats("a", &[Some(2.0)]),
        ])
        .unwrap_err();
        assert_eq!(err, EdaError::DuplicateColumn("a".to_string()));
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = Table::new(vec![
            Column::floats("a", &[Some(1.0), Some(2.0)]),
            Column::texts("b", &[Some("x")]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            EdaError::RaggedColumns {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn rejects_values_outside_storage_type() {
        let column = Column::new(
            "flag",
            StorageType::Boolean,
            vec![Some(Value::Boolean(true)), Some(Value::Integer(1))],
        );
        let err = Table::new(vec![column]).unwrap_err();
        assert_eq!(
            err,
            EdaError::StorageMismatch {
                column: "flag".to_string(),
                row: 1
            }
        );
    }

    #[test]
    fn counts_nan_and_none_as_missing() {
        let column = Column::floats("x", &[Some(1.0), None, Some(f64::NAN)]);
        assert_eq!(column.missing_count(), 2);
        assert_eq!(column.present().count(), 1);
        assert_eq!(column.numeric_values(), vec![Some(1.0), None, None]);
    }

    #[test]
    fn head_renders_missing_as_blank() {
        let table = Table::new(vec![
            Column::integers("id", &[Some(1), Some(2), Some(3)]),
            Column::texts("name", &[Some("a"), None, Some("c")]),
        ])
        .unwrap();
        assert_eq!(
            table.head(2),
            vec![
                vec!["1".to_string(), "a".to_string()],
                vec!["2".to_string(), String::new()]
            ]
        );
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn storage_type_parses_aliases() {
        assert_eq!("INT".parse::<StorageType>().unwrap(), StorageType::Integer);
        assert_eq!(
            "timestamp".parse::<StorageType>().unwrap(),
            StorageType::DateTime
        );
        assert!("blob".parse::<StorageType>().is_err());
    }
}
