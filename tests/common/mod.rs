#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv_lens::frame::{Column, Table};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// The four-row table used by the age/city/signup walkthrough.
pub fn people_table() -> Table {
    Table::new(vec![
        Column::floats("age", &[Some(25.0), Some(30.0), None, Some(40.0)]),
        Column::texts("city", &[Some("NY"), Some("LA"), Some("NY"), None]),
        Column::dates(
            "signup_date",
            &[
                Some(date(2024, 1, 1)),
                Some(date(2024, 2, 1)),
                None,
                Some(date(2024, 3, 1)),
            ],
        ),
    ])
    .expect("valid table")
}

/// A text column whose every row is distinct.
pub fn distinct_text(name: &str, rows: usize) -> Column {
    let values: Vec<String> = (0..rows).map(|i| format!("{name}-{i}")).collect();
    let refs: Vec<Option<&str>> = values.iter().map(|v| Some(v.as_str())).collect();
    Column::texts(name, &refs)
}

pub const SALES_CSV: &str = "\
order_date,region,units,revenue,returned,notes
2024-01-05,North,3,29.97,no,first order
2024-01-06,South,5,49.95,no,
2024-01-07,North,NA,19.98,yes,damaged box
2024-01-08,East,2,19.98,no,gift
2024-01-09,South,7,69.93,no,repeat customer
2024-01-10,West,1,9.99,yes,wrong size
";
