// Configuration type definitions

use std::time::Duration;

use serde::Deserialize;

use crate::input::loader::DEFAULT_LARGE_FILE_THRESHOLD;
use crate::progress::ProgressSettings;

/// Document source section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceConfig {
    /// Documents larger than this many bytes trigger a warning
    #[serde(default = "default_large_file_threshold")]
    pub large_file_threshold: u64,
}

fn default_large_file_threshold() -> u64 {
    DEFAULT_LARGE_FILE_THRESHOLD
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            large_file_threshold: DEFAULT_LARGE_FILE_THRESHOLD,
        }
    }
}

/// Progress indicator section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProgressConfig {
    #[serde(default = "default_budget_ticks")]
    pub budget_ticks: u32,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_budget_ticks() -> u32 {
    9
}

fn default_tick_interval_ms() -> u64 {
    1000
}

impl Default for ProgressConfig {
    fn default() -> Self {
        ProgressConfig {
            budget_ticks: default_budget_ticks(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl ProgressConfig {
    pub fn settings(&self) -> ProgressSettings {
        ProgressSettings {
            budget_ticks: self.budget_ticks,
            tick_interval: Duration::from_millis(self.tick_interval_ms),
        }
    }
}

/// Output section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig { pretty: true }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
