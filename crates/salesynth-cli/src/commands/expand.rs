use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use salesynth_core::assemble;

use crate::args::ExpandArgs;
use crate::commands::{load_file_config, resolve_generate_config, resolve_input};

pub fn run(args: &ExpandArgs) -> Result<()> {
    let config_file = load_file_config()?;

    let input = resolve_input(args.input.as_deref(), config_file.as_ref())?;
    let output = resolve_output(args.output.as_deref(), config_file.as_ref())?;
    let config = resolve_generate_config(
        args.rows,
        args.seed,
        args.start_year,
        args.end_year,
        args.seasonal_strength,
        config_file.as_ref(),
    );
    config.validate().context("Invalid generation parameters")?;

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} Generating rows... {bar:40.cyan/dim} {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("█▓░"),
    );

    let report = assemble::expand(
        &config,
        &input,
        &output,
        Some(&|done, total| {
            pb.set_length(total as u64);
            pb.set_position(done as u64);
        }),
    )
    .with_context(|| format!("Expanding {}", input.display()))?;

    pb.finish_and_clear();

    if report.dropped_rows > 0 {
        eprintln!(
            "! Dropped {} malformed rows while loading the history",
            report.dropped_rows
        );
    }
    eprintln!(
        "✓ {} historical + {} synthetic = {} rows → {}",
        report.historical_rows,
        report.synthetic_rows,
        report.total_rows,
        output.display()
    );
    if report.synthetic_rows == 0 {
        eprintln!("  (target row count does not exceed the history; nothing was generated)");
    }

    Ok(())
}

fn resolve_output(
    explicit: Option<&str>,
    config: Option<&salesynth_core::config::SaleSynthConfig>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(PathBuf::from(path));
    }
    if let Some(cfg) = config {
        if let Some(ref path) = cfg.io.output {
            return Ok(PathBuf::from(path));
        }
    }
    bail!(
        "No output file provided. Pass --output <file.csv> or set it in salesynth.toml:\n\
         \n\
         [io]\n\
         output = \"orders_expanded.csv\""
    );
}
