use std::collections::HashMap;

use serde::Serialize;

use crate::{
    data::{Value, is_missing},
    frame::Column,
    schema::distinct_key,
};

pub const MISSING_LABEL: &str = "<missing>";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyEntry {
    /// Display form of the value; `None` is the missing bucket.
    pub value: Option<String>,
    pub count: usize,
    pub percent: f64,
}

impl FrequencyEntry {
    pub fn label(&self) -> &str {
        self.value.as_deref().unwrap_or(MISSING_LABEL)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyTable {
    pub total: usize,
    pub unique_count: usize,
    pub entries: Vec<FrequencyEntry>,
    pub truncated: bool,
}

/// Counts every row of `column`, missing cells pooled into one bucket.
///
/// Entries are ranked by descending count; equal counts keep the order in
/// which the values first appear. At most `top` entries are kept (`0` keeps
/// all), and `truncated` reports whether any were dropped.
pub fn compute_frequencies(column: &Column, top: usize) -> FrequencyTable {
    let mut accumulator = FrequencyAccumulator::default();
    for cell in column.values() {
        accumulator.ingest(cell.as_ref().filter(|v| !is_missing(Some(*v))));
    }
    accumulator.render(top)
}

#[derive(Default)]
struct FrequencyAccumulator {
    total: usize,
    positions: HashMap<Option<String>, usize>,
    counts: Vec<(Option<String>, usize)>,
}

impl FrequencyAccumulator {
    fn ingest(&mut self, value: Option<&Value>) {
        self.total += 1;
        let key = value.map(distinct_key);
        match self.positions.get(&key) {
            Some(&idx) => self.counts[idx].1 += 1,
            None => {
                self.positions.insert(key, self.counts.len());
                self.counts.push((value.map(|v| v.as_display()), 1));
            }
        }
    }

    fn render(self, top: usize) -> FrequencyTable {
        let unique_count = self.counts.len();
        let mut items = self.counts;
        // Stable sort keeps first-seen order among ties.
        items.sort_by(|a, b| b.1.cmp(&a.1));
        let truncated = top > 0 && items.len() > top;
        if truncated {
            items.truncate(top);
        }
        let total = self.total;
        let entries = items
            .into_iter()
            .map(|(value, count)| FrequencyEntry {
                value,
                count,
                percent: (count as f64 / total as f64) * 100.0,
            })
            .collect();
        FrequencyTable {
            total,
            unique_count,
            entries,
            truncated,
        }
    }
}
