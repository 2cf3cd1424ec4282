//! # Dataset Assembly
//!
//! The run orchestrator: load the history, build the statistical model,
//! sample the synthetic rows, merge, sort, and persist. The output CSV is
//! rendered fully in memory before a single write syscall, so a failed run
//! never leaves a partial file behind.

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::GenerateConfig;
use crate::dataset::{load_history, History};
use crate::error::{Result, SaleSynthError};
use crate::generate::sampler::{GenerationModel, RowSampler};
use crate::record::{Order, COLUMNS};

/// Summary of one expansion run.
#[derive(Debug, Clone)]
pub struct ExpandReport {
    pub historical_rows: usize,
    pub dropped_rows: usize,
    pub synthetic_rows: usize,
    pub total_rows: usize,
}

/// Run the full pipeline: load → model → sample → merge → sort → persist.
///
/// When the target row count does not exceed the cleaned history, no rows
/// are generated and the history is persisted as-is (date-sorted). The
/// output path is overwritten without confirmation.
pub fn expand(
    config: &GenerateConfig,
    input: &Path,
    output: &Path,
    progress: Option<&dyn Fn(usize, usize)>,
) -> Result<ExpandReport> {
    config.validate()?;

    let history = load_history(input)?;
    let n_new = config.target_rows.saturating_sub(history.len());
    info!(
        "history: {} rows ({} dropped), generating {} synthetic rows",
        history.len(),
        history.dropped_rows,
        n_new
    );

    let synthetic = if n_new == 0 {
        Vec::new()
    } else {
        generate_rows(&history, config, n_new, progress)?
    };

    let combined = assemble(history.orders.clone(), synthetic);
    write_output(output, &combined)?;

    Ok(ExpandReport {
        historical_rows: history.len(),
        dropped_rows: history.dropped_rows,
        synthetic_rows: combined.len() - history.len(),
        total_rows: combined.len(),
    })
}

/// Sample `n` synthetic rows from a freshly seeded RNG. Also used by the
/// preview path, which samples without persisting anything.
pub fn generate_rows(
    history: &History,
    config: &GenerateConfig,
    n: usize,
    progress: Option<&dyn Fn(usize, usize)>,
) -> Result<Vec<Order>> {
    if history.is_empty() {
        return Err(SaleSynthError::EmptyHistory {
            dropped: history.dropped_rows,
        });
    }
    let model = GenerationModel::build(history, config)?;
    let mut sampler = RowSampler::new(&model, history.next_order_id())?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    sampler.sample_many(&mut rng, n, progress)
}

/// Concatenate historical and synthetic rows and stable-sort ascending by
/// order date, so ties keep their original relative order.
pub fn assemble(mut historical: Vec<Order>, synthetic: Vec<Order>) -> Vec<Order> {
    historical.extend(synthetic);
    historical.sort_by(|a, b| a.order_date.cmp(&b.order_date));
    historical
}

/// Serialize the combined table to CSV and persist atomically: the whole
/// file is built in memory, then written with one `fs::write`.
pub fn write_output(path: &Path, orders: &[Order]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(COLUMNS)
        .map_err(|source| SaleSynthError::CsvWrite { source })?;
    for order in orders {
        writer
            .write_record(order.to_csv_record())
            .map_err(|source| SaleSynthError::CsvWrite { source })?;
    }

    let buf = writer
        .into_inner()
        .map_err(|e| SaleSynthError::Output {
            message: format!("flushing CSV buffer for {}", path.display()),
            source: e.into_error(),
        })?;

    std::fs::write(path, buf).map_err(|source| SaleSynthError::Output {
        message: format!("writing {}", path.display()),
        source,
    })?;

    info!("saved {} rows to {}", orders.len(), path.display());
    Ok(())
}
