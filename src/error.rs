//! Typed, recoverable failures of the analysis engine.
//!
//! Every variant describes an expected condition that a front end reports
//! to the user before carrying on. None of them indicate corrupted state.

use thiserror::Error;

use crate::{schema::Kind, view::ViewKind};

pub type Result<T> = std::result::Result<T, EdaError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EdaError {
    /// The view tag does not name a known view.
    #[error("Unsupported view '{0}'. Supported views: {supported}", supported = ViewKind::tags().join(", "))]
    UnsupportedView(String),

    /// A view needs at least one column for `role` and none qualify.
    #[error("No eligible columns for the {role} of the {view} view")]
    NoEligibleColumns { view: ViewKind, role: &'static str },

    /// The column analyzer cannot describe columns of this kind.
    #[error("Column '{column}' is {kind} and cannot be analyzed")]
    UnsupportedColumnKind { column: String, kind: Kind },

    #[error("Table has no rows")]
    EmptyTable,

    #[error("The {view} view needs at least {required} numeric column(s); found {found}")]
    InsufficientNumericColumns {
        view: ViewKind,
        required: usize,
        found: usize,
    },

    #[error("Column '{0}' not found")]
    UnknownColumn(String),

    #[error("Column '{column}' cannot be used as the {role} of the {view} view")]
    IneligibleColumn {
        view: ViewKind,
        role: &'static str,
        column: String,
    },

    #[error("Bin count {requested} is outside the allowed range {min}..={max}")]
    InvalidBins {
        requested: usize,
        min: usize,
        max: usize,
    },

    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("Column '{column}' has {found} row(s) but the table has {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Column '{column}' row {row} holds a value incompatible with its storage type")]
    StorageMismatch { column: String, row: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_view_lists_known_tags() {
        let message = EdaError::UnsupportedView("pie".to_string()).to_string();
        assert!(message.contains("'pie'"));
        assert!(message.contains("histogram"));
        assert!(message.contains("column-analyzer"));
    }

    #[test]
    fn insufficient_numeric_columns_names_counts() {
        let err = EdaError::InsufficientNumericColumns {
            view: ViewKind::Correlation,
            required: 2,
            found: 1,
        };
        assert_eq!(
            err.to_string(),
            "The correlation view needs at least 2 numeric column(s); found 1"
        );
    }
}
