//! Report configuration.
//!
//! Processor settings are layered in this order, later layers winning:
//! built-in defaults, a YAML file, environment variables, command-line flags.

use anyhow::{Context, Result};
use index_processor::ProcessorConfig;
use std::fs;
use std::path::Path;

/// Settings given directly on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlagOverrides {
    pub pixel_size_m: Option<f64>,
    pub water_threshold: Option<f32>,
    pub smoothing_window: Option<usize>,
    pub min_periods: Option<usize>,
}

impl FlagOverrides {
    fn apply(&self, mut config: ProcessorConfig) -> ProcessorConfig {
        if let Some(size) = self.pixel_size_m {
            config.pixel_size_m = Some(size);
        }
        if let Some(threshold) = self.water_threshold {
            config.water_threshold = threshold;
        }
        if let Some(window) = self.smoothing_window {
            config.smoothing_window = window;
        }
        if let Some(n) = self.min_periods {
            config.min_periods = n;
        }
        config
    }
}

/// Load processor settings from a YAML file. Missing keys keep their defaults.
pub fn load_yaml<P: AsRef<Path>>(path: P) -> Result<ProcessorConfig> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read config from {:?}", path.as_ref()))?;

    // An empty file is a valid "all defaults" config
    if content.trim().is_empty() {
        return Ok(ProcessorConfig::default());
    }

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config YAML from {:?}", path.as_ref()))
}

/// Build the final configuration from every layer and validate it.
pub fn resolve(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
    flags: &FlagOverrides,
) -> Result<ProcessorConfig> {
    let base = match path {
        Some(path) => load_yaml(path)?,
        None => ProcessorConfig::default(),
    };

    let config = flags.apply(base.with_overrides(env));
    config
        .validate()
        .context("Invalid processor configuration")?;
    Ok(config)
}

/// [`resolve`] against the process environment.
pub fn load(path: Option<&Path>, flags: &FlagOverrides) -> Result<ProcessorConfig> {
    resolve(path, |key| std::env::var(key).ok(), flags)
}
