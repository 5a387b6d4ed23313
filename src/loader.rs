//! CSV to [`Table`] loading with storage-type inference.
//!
//! Every row is read. Each column's storage type is decided by majority vote
//! over its non-missing tokens; a single token that fits no candidate type
//! demotes the column to text. Tokens that disagree with the winning type are
//! loaded as missing.

use std::{io::Read, path::Path};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::debug;

use crate::{
    data::{Value, parse_boolean, parse_naive_date, parse_naive_datetime, parse_typed_value},
    frame::{Column, StorageType, Table},
    io_utils,
};

pub fn load_csv(
    path: &Path,
    delimiter: Option<u8>,
    encoding: &'static Encoding,
) -> Result<Table> {
    let delimiter = io_utils::resolve_input_delimiter(path, delimiter);
    let reader = io_utils::open_input(path)?;
    read_table(reader, delimiter, encoding).with_context(|| format!("Loading {path:?}"))
}

pub fn read_table<R: Read>(reader: R, delimiter: u8, encoding: &'static Encoding) -> Result<Table> {
    let mut reader = io_utils::open_csv_reader(reader, delimiter);
    let headers = io_utils::reader_headers(&mut reader, encoding)?;
    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

    let mut record = csv::ByteRecord::new();
    let mut row = 0usize;
    while reader
        .read_byte_record(&mut record)
        .with_context(|| format!("Reading row {}", row + 2))?
    {
        let decoded = io_utils::decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {}", row + 2))?;
        for (idx, field) in decoded.into_iter().enumerate() {
            let trimmed = field.trim();
            let token = (!is_placeholder(trimmed)).then(|| trimmed.to_string());
            cells[idx].push(token);
        }
        row += 1;
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, tokens)| build_column(name, tokens))
        .collect();
    Ok(Table::new(columns)?)
}

fn build_column(name: String, tokens: Vec<Option<String>>) -> Column {
    let mut candidate = TypeCandidate::default();
    for token in tokens.iter().flatten() {
        candidate.update(token);
    }
    let storage = candidate.decide();
    let mut rejected = 0usize;
    let values: Vec<Option<Value>> = tokens
        .iter()
        .map(|token| {
            let token = token.as_deref()?;
            match parse_typed_value(token, storage) {
                Ok(value) => value,
                Err(_) => {
                    rejected += 1;
                    None
                }
            }
        })
        .collect();
    debug!("Column '{name}' loaded as {storage} ({rejected} token(s) treated as missing)");
    Column::new(name, storage, values)
}

/// Tokens read as a missing cell regardless of column type.
pub fn is_placeholder(token: &str) -> bool {
    let lowered = token.trim().to_ascii_lowercase();
    let stripped = lowered.trim_start_matches('#');
    matches!(
        stripped,
        "" | "na" | "n/a" | "n.a." | "nan" | "null" | "none" | "missing"
    ) || stripped.chars().all(|c| c == '-')
}

#[derive(Debug, Default)]
struct TypeCandidate {
    non_empty: usize,
    boolean_matches: usize,
    integer_matches: usize,
    float_matches: usize,
    date_matches: usize,
    datetime_matches: usize,
    unclassified: usize,
}

impl TypeCandidate {
    fn update(&mut self, token: &str) {
        self.non_empty += 1;
        if parse_boolean(token).is_some() {
            self.boolean_matches += 1;
        } else if looks_like_integer(token) {
            self.integer_matches += 1;
        } else if looks_like_float(token) {
            self.float_matches += 1;
        } else if parse_naive_date(token).is_ok() {
            self.date_matches += 1;
        } else if parse_naive_datetime(token).is_ok() {
            self.datetime_matches += 1;
        } else {
            self.unclassified += 1;
        }
    }

    fn majority(&self, count: usize) -> bool {
        count > 0 && count * 2 > self.non_empty
    }

    fn decide(&self) -> StorageType {
        if self.non_empty == 0 || self.unclassified > 0 {
            return StorageType::Text;
        }
        let numeric = self.integer_matches + self.float_matches;
        let temporal = self.date_matches + self.datetime_matches;
        if self.majority(self.boolean_matches) {
            StorageType::Boolean
        } else if self.majority(self.integer_matches) && self.float_matches == 0 {
            StorageType::Integer
        } else if self.majority(numeric) {
            StorageType::Float
        } else if self.majority(self.date_matches) {
            StorageType::Date
        } else if self.majority(temporal) {
            StorageType::DateTime
        } else {
            StorageType::Text
        }
    }
}

fn looks_like_integer(token: &str) -> bool {
    !has_leading_zero(token) && token.parse::<i64>().is_ok()
}

fn looks_like_float(token: &str) -> bool {
    !has_leading_zero(token)
        && token.chars().any(|c| c.is_ascii_digit())
        && token.parse::<f64>().is_ok()
}

/// Leading zeros mark identifiers such as zip codes.
fn has_leading_zero(token: &str) -> bool {
    let digits = token.strip_prefix(['-', '+']).unwrap_or(token).as_bytes();
    digits.len() > 1 && digits[0] == b'0' && digits[1].is_ascii_digit()
}
