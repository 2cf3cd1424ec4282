use anyhow::{bail, Context, Result};

use salesynth_core::aggregate::{quarter_of, MonthlyAggregates};
use salesynth_core::dataset::load_history;
use salesynth_core::stats::segments::SegmentKey;

use crate::args::{DemandFeaturesArgs, StatsFormat};
use crate::commands::{load_file_config, resolve_input};

pub fn run(args: &DemandFeaturesArgs) -> Result<()> {
    if !(1..=12).contains(&args.month) {
        bail!("--month must be in 1-12, got {}", args.month);
    }

    let config_file = load_file_config()?;
    let input = resolve_input(args.input.as_deref(), config_file.as_ref())?;

    let history =
        load_history(&input).with_context(|| format!("Loading {}", input.display()))?;
    let aggregates = MonthlyAggregates::build(&history.orders);

    let segment = SegmentKey {
        category: args.category.clone(),
        sub_category: args.sub_category.clone(),
        region: args.region.clone(),
    };
    let Some((features, mode)) = aggregates.lookup(&segment, args.year, args.month) else {
        bail!(
            "{} contains no usable rows — no aggregates to resolve against",
            input.display()
        );
    };

    match args.format {
        StatsFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "stats_mode": mode,
                    "avg_unit_price": features.avg_unit_price,
                    "avg_discount": features.avg_discount,
                    "orders_count": features.orders_count,
                    "year": args.year,
                    "month": args.month,
                    "quarter": quarter_of(args.month),
                }))?
            );
        }
        StatsFormat::Table | StatsFormat::Text => {
            println!("stats_mode:     {}", mode);
            println!("avg_unit_price: {:.2}", features.avg_unit_price);
            println!("avg_discount:   {:.2}", features.avg_discount);
            println!("orders_count:   {}", features.orders_count);
            println!("quarter:        Q{}", quarter_of(args.month));
        }
    }

    Ok(())
}
