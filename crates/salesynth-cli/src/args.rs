use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "salesynth",
    about = "Expand an e-commerce order history with statistically faithful synthetic rows",
    version,
    after_help = "Examples:\n  salesynth expand --input orders.csv --output orders_expanded.csv --rows 80000\n  salesynth expand --input orders.csv --output out.csv --rows 50000 --seed 7\n  salesynth stats --input orders.csv\n  salesynth preview --input orders.csv --rows 10\n  salesynth demand-features --input out.csv --category Furniture --sub-category Chairs --region South --year 2024 --month 11"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Expand a historical order CSV to a target row count
    Expand(ExpandArgs),

    /// Display per-segment distribution statistics for a history
    Stats(StatsArgs),

    /// Sample synthetic rows and print them without writing anything
    Preview(PreviewArgs),

    /// Resolve demand-model features for a segment and month
    DemandFeatures(DemandFeaturesArgs),
}

#[derive(Parser, Debug)]
pub struct ExpandArgs {
    /// Historical order CSV. Falls back to [io].input in salesynth.toml
    #[arg(short, long)]
    pub input: Option<String>,

    /// Output path for the expanded CSV (overwritten without confirmation).
    /// Falls back to [io].output in salesynth.toml
    #[arg(short, long)]
    pub output: Option<String>,

    /// Target total row count for the expanded dataset
    #[arg(long)]
    pub rows: Option<usize>,

    /// Random seed for deterministic generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// First calendar year synthetic orders may fall in
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Last calendar year synthetic orders may fall in (inclusive)
    #[arg(long)]
    pub end_year: Option<i32>,

    /// Seasonal strength S in [0.0, 0.5]: Nov/Dec demand boosted, Feb/Mar damped
    #[arg(long)]
    pub seasonal_strength: Option<f64>,
}

#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Historical order CSV. Falls back to [io].input in salesynth.toml
    #[arg(short, long)]
    pub input: Option<String>,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: StatsFormat,
}

#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// Historical order CSV. Falls back to [io].input in salesynth.toml
    #[arg(short, long)]
    pub input: Option<String>,

    /// Number of synthetic rows to preview
    #[arg(long, default_value = "5")]
    pub rows: usize,

    /// Random seed for the preview draw
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct DemandFeaturesArgs {
    /// Order CSV (typically the expanded output)
    #[arg(short, long)]
    pub input: Option<String>,

    #[arg(long)]
    pub category: String,

    #[arg(long)]
    pub sub_category: String,

    #[arg(long)]
    pub region: String,

    #[arg(long)]
    pub year: i32,

    /// Calendar month, 1-12
    #[arg(long)]
    pub month: u32,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: StatsFormat,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum StatsFormat {
    Table,
    Text,
    Json,
}
