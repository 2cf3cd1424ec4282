pub mod demand_features;
pub mod expand;
pub mod preview;
pub mod stats;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use salesynth_core::config::{
    GenerateConfig, SaleSynthConfig, DEFAULT_END_YEAR, DEFAULT_SEASONAL_STRENGTH, DEFAULT_SEED,
    DEFAULT_START_YEAR, DEFAULT_TARGET_ROWS,
};

/// Load the optional salesynth.toml from the working directory.
pub fn load_file_config() -> Result<Option<SaleSynthConfig>> {
    Ok(salesynth_core::config::read_config(Path::new("."))?)
}

/// Resolve the input path: CLI flag first, then [io].input in salesynth.toml.
pub fn resolve_input(explicit: Option<&str>, config: Option<&SaleSynthConfig>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(PathBuf::from(path));
    }
    if let Some(cfg) = config {
        if let Some(ref path) = cfg.io.input {
            return Ok(PathBuf::from(path));
        }
    }
    bail!(
        "No input file provided. Pass --input <file.csv> or set it in salesynth.toml:\n\
         \n\
         [io]\n\
         input = \"orders.csv\""
    );
}

/// Merge generation parameters: CLI flags override salesynth.toml, which
/// overrides the built-in defaults.
pub fn resolve_generate_config(
    rows: Option<usize>,
    seed: Option<u64>,
    start_year: Option<i32>,
    end_year: Option<i32>,
    seasonal_strength: Option<f64>,
    config: Option<&SaleSynthConfig>,
) -> GenerateConfig {
    let file = config.map(|c| c.generate.clone()).unwrap_or_default();
    GenerateConfig {
        target_rows: rows.or(file.rows).unwrap_or(DEFAULT_TARGET_ROWS),
        seed: seed.or(file.seed).unwrap_or(DEFAULT_SEED),
        start_year: start_year.or(file.start_year).unwrap_or(DEFAULT_START_YEAR),
        end_year: end_year.or(file.end_year).unwrap_or(DEFAULT_END_YEAR),
        seasonal_strength: seasonal_strength
            .or(file.seasonal_strength)
            .unwrap_or(DEFAULT_SEASONAL_STRENGTH),
    }
}
