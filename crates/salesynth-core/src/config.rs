//! # Configuration File Parser
//!
//! Reads and parses `salesynth.toml`, the optional configuration file that
//! customizes generation without requiring CLI flags. Supports:
//!
//! - `[io]` — default input/output paths
//! - `[generate]` — target row count, seed, year range, seasonal strength
//!
//! Example `salesynth.toml`:
//!
//! ```toml
//! [io]
//! input = "Ecommerce_Sales_Data_2024_2025.csv"
//! output = "Ecommerce_Sales_Data_Expanded.csv"
//!
//! [generate]
//! rows = 80000
//! seed = 42
//! start_year = 2022
//! end_year = 2025
//! seasonal_strength = 0.30
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SaleSynthError};

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "salesynth.toml";

/// Default target row count for the expanded dataset.
pub const DEFAULT_TARGET_ROWS: usize = 80_000;
/// Default first year synthetic orders may fall in (extends history backward).
pub const DEFAULT_START_YEAR: i32 = 2022;
/// Default last year synthetic orders may fall in (inclusive).
pub const DEFAULT_END_YEAR: i32 = 2025;
/// Default random seed.
pub const DEFAULT_SEED: u64 = 42;
/// Default seasonal strength. 0.0 = no seasonality, 0.2–0.4 moderate.
pub const DEFAULT_SEASONAL_STRENGTH: f64 = 0.30;

/// Top-level salesynth.toml structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SaleSynthConfig {
    /// Default file paths.
    pub io: IoConfig,
    /// Default generation settings.
    pub generate: GenerateFileConfig,
}

/// Input/output path configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Path to the historical order CSV.
    pub input: Option<String>,
    /// Path the expanded CSV is written to.
    pub output: Option<String>,
}

/// `[generate]` section of salesynth.toml. All fields optional; CLI flags
/// take precedence over these, which take precedence over the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerateFileConfig {
    /// Target total row count for the expanded dataset.
    pub rows: Option<usize>,
    /// Fixed random seed for deterministic generation.
    pub seed: Option<u64>,
    /// First calendar year synthetic orders may fall in.
    pub start_year: Option<i32>,
    /// Last calendar year synthetic orders may fall in (inclusive).
    pub end_year: Option<i32>,
    /// Seasonal strength S: Nov/Dec boosted by (1 + S), Feb/Mar damped.
    pub seasonal_strength: Option<f64>,
}

/// Fully resolved generation parameters, after merging CLI flags, config
/// file, and defaults. This is what the pipeline actually runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateConfig {
    pub target_rows: usize,
    pub seed: u64,
    pub start_year: i32,
    pub end_year: i32,
    pub seasonal_strength: f64,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            target_rows: DEFAULT_TARGET_ROWS,
            seed: DEFAULT_SEED,
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            seasonal_strength: DEFAULT_SEASONAL_STRENGTH,
        }
    }
}

impl GenerateConfig {
    /// Validate semantic constraints that the type system cannot enforce.
    ///
    /// Call this before running the pipeline. Catches configuration mistakes
    /// (inverted year range, out-of-range seasonal strength) before any file
    /// I/O happens.
    pub fn validate(&self) -> Result<()> {
        if self.start_year > self.end_year {
            return Err(SaleSynthError::Config {
                message: format!(
                    "start_year ({}) must not exceed end_year ({})",
                    self.start_year, self.end_year
                ),
            });
        }
        if !(0.0..=0.5).contains(&self.seasonal_strength) {
            return Err(SaleSynthError::Config {
                message: format!(
                    "seasonal_strength must be in [0.0, 0.5], got {}",
                    self.seasonal_strength
                ),
            });
        }
        Ok(())
    }

    /// Inclusive list of years synthetic orders may be dated in.
    pub fn years(&self) -> Vec<i32> {
        (self.start_year..=self.end_year).collect()
    }
}

/// Read and parse a salesynth.toml file from the given directory.
///
/// Returns `None` if the file doesn't exist (config is optional).
/// Returns an error if the file exists but can't be parsed.
pub fn read_config(dir: &Path) -> Result<Option<SaleSynthConfig>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| SaleSynthError::Config {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;

    let config: SaleSynthConfig = toml::from_str(&content).map_err(|e| SaleSynthError::Config {
        message: format!("Failed to parse {}: {}", path.display(), e),
    })?;

    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[io]
input = "orders.csv"
output = "orders_expanded.csv"

[generate]
rows = 50000
seed = 7
start_year = 2021
end_year = 2026
seasonal_strength = 0.25
"#;
        let config: SaleSynthConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.io.input.as_deref(), Some("orders.csv"));
        assert_eq!(config.io.output.as_deref(), Some("orders_expanded.csv"));
        assert_eq!(config.generate.rows, Some(50000));
        assert_eq!(config.generate.seed, Some(7));
        assert_eq!(config.generate.start_year, Some(2021));
        assert_eq!(config.generate.end_year, Some(2026));
        assert_eq!(config.generate.seasonal_strength, Some(0.25));
    }

    #[test]
    fn test_parse_empty_config() {
        let config: SaleSynthConfig = toml::from_str("").unwrap();
        assert!(config.io.input.is_none());
        assert!(config.generate.rows.is_none());
    }

    #[test]
    fn test_defaults() {
        let config = GenerateConfig::default();
        assert_eq!(config.target_rows, 80_000);
        assert_eq!(config.seed, 42);
        assert_eq!(config.start_year, 2022);
        assert_eq!(config.end_year, 2025);
        assert!((config.seasonal_strength - 0.30).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_inverted_years_fails() {
        let config = GenerateConfig {
            start_year: 2026,
            end_year: 2022,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        let msg = format!("{}", err);
        assert!(msg.contains("2026"), "should name the bad year: {}", msg);
    }

    #[test]
    fn test_validate_seasonal_strength_bounds() {
        let mut config = GenerateConfig {
            seasonal_strength: 0.8,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.seasonal_strength = -0.1;
        assert!(config.validate().is_err());

        config.seasonal_strength = 0.0;
        assert!(config.validate().is_ok());

        config.seasonal_strength = 0.5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_years_inclusive() {
        let config = GenerateConfig::default();
        assert_eq!(config.years(), vec![2022, 2023, 2024, 2025]);
    }

    #[test]
    fn test_read_config_nonexistent() {
        let result = read_config(Path::new("/nonexistent/dir"));
        assert!(result.is_ok());
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_read_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("salesynth.toml"),
            "[generate]\nrows = 200\n",
        )
        .unwrap();

        let config = read_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.generate.rows, Some(200));
    }

    #[test]
    fn test_read_config_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("salesynth.toml"), "not valid [[[toml").unwrap();
        assert!(read_config(dir.path()).is_err());
    }
}
