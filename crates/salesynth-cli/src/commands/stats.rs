use anyhow::{Context, Result};
use comfy_table::Table as ComfyTable;

use salesynth_core::dataset::load_history;
use salesynth_core::stats::segments::SegmentTable;

use crate::args::{StatsArgs, StatsFormat};
use crate::commands::{load_file_config, resolve_input};

pub fn run(args: &StatsArgs) -> Result<()> {
    let config_file = load_file_config()?;
    let input = resolve_input(args.input.as_deref(), config_file.as_ref())?;

    let history =
        load_history(&input).with_context(|| format!("Loading {}", input.display()))?;
    let table = SegmentTable::build(&history.orders);

    match args.format {
        StatsFormat::Json => {
            println!("{}", serde_json::to_string_pretty(table.segments())?);
        }
        StatsFormat::Table | StatsFormat::Text => {
            let mut t = ComfyTable::new();
            t.set_header(vec![
                "Category",
                "Sub-Category",
                "Region",
                "Rows",
                "Price med",
                "Price scale",
                "Disc med",
                "Qty med",
            ]);
            for seg in table.segments() {
                t.add_row(vec![
                    seg.key.category.clone(),
                    seg.key.sub_category.clone(),
                    seg.key.region.clone(),
                    seg.count.to_string(),
                    format!("{:.2}", seg.unit_price.median),
                    format!("{:.2}", seg.unit_price.scale),
                    format!("{:.2}", seg.discount.median),
                    format!("{:.1}", seg.quantity.median),
                ]);
            }
            println!("{t}");
            println!(
                "{} segments over {} rows ({} dropped while loading)",
                table.len(),
                history.len(),
                history.dropped_rows
            );
        }
    }

    Ok(())
}
