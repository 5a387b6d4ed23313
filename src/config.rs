//! Engine policy constants and their YAML overrides.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CARDINALITY_THRESHOLD: usize = 20;
pub const DEFAULT_FREQUENCY_TOP_N: usize = 100;
pub const DEFAULT_DATETIME_SAMPLE_SIZE: usize = 10;
pub const DEFAULT_BINS: usize = 30;
pub const MIN_BINS: usize = 5;
pub const MAX_BINS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EdaConfig {
    /// Highest distinct-value count (missing included) for a text column to
    /// count as categorical.
    pub cardinality_threshold: usize,
    pub frequency_top_n: usize,
    pub datetime_sample_size: usize,
    pub default_bins: usize,
    pub min_bins: usize,
    pub max_bins: usize,
    pub analyzer_max_bins: usize,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            cardinality_threshold: DEFAULT_CARDINALITY_THRESHOLD,
            frequency_top_n: DEFAULT_FREQUENCY_TOP_N,
            datetime_sample_size: DEFAULT_DATETIME_SAMPLE_SIZE,
            default_bins: DEFAULT_BINS,
            min_bins: MIN_BINS,
            max_bins: MAX_BINS,
            analyzer_max_bins: DEFAULT_BINS,
        }
    }
}

impl EdaConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let config: EdaConfig = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing config YAML {path:?}"))?;
        config.ensure_valid()?;
        Ok(config)
    }

    pub fn ensure_valid(&self) -> Result<()> {
        ensure!(
            self.cardinality_threshold > 0,
            "cardinality_threshold must be positive"
        );
        ensure!(self.frequency_top_n > 0, "frequency_top_n must be positive");
        ensure!(self.min_bins > 0, "min_bins must be positive");
        ensure!(
            self.min_bins <= self.max_bins,
            "min_bins ({}) cannot exceed max_bins ({})",
            self.min_bins,
            self.max_bins
        );
        ensure!(
            (self.min_bins..=self.max_bins).contains(&self.default_bins),
            "default_bins ({}) must lie within {}..={}",
            self.default_bins,
            self.min_bins,
            self.max_bins
        );
        ensure!(
            self.analyzer_max_bins > 0,
            "analyzer_max_bins must be positive"
        );
        Ok(())
    }

    pub fn bins_in_range(&self, bins: usize) -> bool {
        (self.min_bins..=self.max_bins).contains(&bins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EdaConfig::default();
        config.ensure_valid().expect("defaults valid");
        assert_eq!(config.cardinality_threshold, 20);
        assert_eq!(config.frequency_top_n, 100);
        assert!(config.bins_in_range(5));
        assert!(config.bins_in_range(100));
        assert!(!config.bins_in_range(101));
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let config: EdaConfig =
            serde_yaml::from_str("cardinality_threshold: 5\n").expect("parse yaml");
        assert_eq!(config.cardinality_threshold, 5);
        assert_eq!(config.default_bins, DEFAULT_BINS);
    }

    #[test]
    fn rejects_default_bins_outside_range() {
        let config = EdaConfig {
            default_bins: 200,
            ..EdaConfig::default()
        };
        let err = config.ensure_valid().unwrap_err();
        assert!(err.to_string().contains("default_bins"));
    }
}
