//! Resize configuration.
//!
//! Options are loaded from an optional `upright.toml`, merged on top of the
//! stock defaults, then overridden by command-line flags.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! max_width = 4000          # Bounding box width in pixels
//! max_height = 4000         # Bounding box height in pixels
//! quality = 92              # JPEG/AVIF encoding quality (1-100)
//!
//! [processing]
//! parallel = false          # Resize files on a worker pool (output order is kept)
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! max_width = 1920
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Bounds, Quality, ResizeConfig};
use crate::process::ProcessOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "upright.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Resize options loaded from `upright.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeOptions {
    /// Maximum output width for landscape images.
    pub max_width: u32,
    /// Maximum output height for portrait and square images.
    pub max_height: u32,
    /// Lossy encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Batch processing settings.
    pub processing: ProcessingConfig,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            max_width: Bounds::DEFAULT_EDGE,
            max_height: Bounds::DEFAULT_EDGE,
            quality: Quality::default().value(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl ResizeOptions {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(ConfigError::Validation(
                "max_width and max_height must be positive".into(),
            ));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(ConfigError::Validation("quality must be 1-100".into()));
        }
        Ok(())
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.max_width, self.max_height)
    }

    pub fn resize_config(&self) -> ResizeConfig {
        ResizeConfig {
            bounds: self.bounds(),
            quality: Quality::new(self.quality),
        }
    }

    pub fn process_options(&self) -> ProcessOptions {
        ProcessOptions {
            resize: self.resize_config(),
            parallel: self.processing.parallel,
        }
    }
}

/// Batch processing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Resize files on the rayon pool instead of one at a time.
    pub parallel: bool,
    /// Maximum number of parallel workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ResizeOptions::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ResizeOptions, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ResizeOptions = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load options from a config file, falling back to stock defaults when the
/// file is absent.
pub fn load_config(path: &Path) -> Result<ResizeOptions, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Load options from a file that must exist, such as one named with
/// `--config`. A missing file is an [`ConfigError::Io`] error.
pub fn load_config_required(path: &Path) -> Result<ResizeOptions, ConfigError> {
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(stock_defaults_value(), Some(overlay))
}

/// Returns a fully-commented stock `upright.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# upright configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Bounding box
# ---------------------------------------------------------------------------
# Landscape images wider than max_width are scaled down to it; portrait and
# square images taller than max_height are scaled down to that. Aspect ratio
# is preserved and images are never enlarged.
max_width = 4000
max_height = 4000

# Lossy encoding quality for JPEG and AVIF output (1 = worst, 100 = best).
# PNG, TIFF and WebP are written losslessly and ignore it.
quality = 92

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Resize files on a worker pool. Output order always matches input order.
parallel = false

# Maximum parallel workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
