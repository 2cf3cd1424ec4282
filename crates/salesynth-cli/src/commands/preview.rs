use anyhow::{Context, Result};
use comfy_table::Table as ComfyTable;

use salesynth_core::assemble::generate_rows;
use salesynth_core::dataset::load_history;

use crate::args::PreviewArgs;
use crate::commands::{load_file_config, resolve_generate_config, resolve_input};

pub fn run(args: &PreviewArgs) -> Result<()> {
    let config_file = load_file_config()?;
    let input = resolve_input(args.input.as_deref(), config_file.as_ref())?;
    let config = resolve_generate_config(None, args.seed, None, None, None, config_file.as_ref());

    let history =
        load_history(&input).with_context(|| format!("Loading {}", input.display()))?;
    let rows = generate_rows(&history, &config, args.rows, None)
        .context("Sampling preview rows")?;

    let mut t = ComfyTable::new();
    t.set_header(vec![
        "Order ID", "Date", "Customer", "Region", "City", "Category", "Sub-Category", "Product",
        "Qty", "Price", "Disc", "Sales", "Profit", "Payment",
    ]);
    for o in &rows {
        t.add_row(o.to_csv_record());
    }
    println!("{t}");
    println!("{} synthetic rows (seed {}, not persisted)", rows.len(), config.seed);

    Ok(())
}
