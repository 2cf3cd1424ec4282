//! # Segment Statistics
//!
//! Per-(category, sub-category, region) distribution summaries for unit
//! price, discount, and quantity, computed once per run from the cleaned
//! history. The interquartile range acts as a robust scale estimator; a
//! zero-width IQR falls back to a fraction of Q3 so no segment ever samples
//! with zero variance.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{Result, SaleSynthError};
use crate::record::Order;
use crate::stats::categorical::Discrete;
use crate::stats::percentile::percentile_sorted;

/// IQR below this is treated as zero-width.
const SCALE_EPSILON: f64 = 1e-9;

/// Profit margin assumed for categories with no usable historical margin.
pub const DEFAULT_MARGIN: f64 = 0.15;

/// Grouping key localizing the statistical distributions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SegmentKey {
    pub category: String,
    pub sub_category: String,
    pub region: String,
}

/// Robust summary of one numeric metric within a segment.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricStats {
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    /// max(IQR, floor) — used as the standard deviation of the sampling
    /// normal. Strictly positive for any segment with at least one row.
    pub scale: f64,
}

impl MetricStats {
    fn from_values(mut values: Vec<f64>) -> Option<Self> {
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let median = percentile_sorted(&values, 50.0)?;
        let q1 = percentile_sorted(&values, 25.0)?;
        let q3 = percentile_sorted(&values, 75.0)?;
        Some(Self {
            median,
            q1,
            q3,
            scale: iqr_scale(q1, q3),
        })
    }
}

/// Statistics record for one segment.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentStats {
    pub key: SegmentKey,
    /// Historical row count — the segment's sampling weight.
    pub count: usize,
    pub unit_price: MetricStats,
    pub discount: MetricStats,
    pub quantity: MetricStats,
}

/// All segment statistics for one run, in deterministic key order.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentTable {
    segments: Vec<SegmentStats>,
}

impl SegmentTable {
    /// Group the history by segment and summarize each group. Segments with
    /// zero historical rows simply never appear.
    pub fn build(orders: &[Order]) -> Self {
        let mut groups: BTreeMap<SegmentKey, Vec<&Order>> = BTreeMap::new();
        for o in orders {
            let (category, sub_category, region) = o.segment_key();
            groups
                .entry(SegmentKey {
                    category,
                    sub_category,
                    region,
                })
                .or_default()
                .push(o);
        }

        let segments = groups
            .into_iter()
            .filter_map(|(key, rows)| {
                let metric = |f: fn(&Order) -> f64| {
                    MetricStats::from_values(rows.iter().map(|o| f(o)).collect())
                };
                Some(SegmentStats {
                    key,
                    count: rows.len(),
                    unit_price: metric(|o| o.unit_price)?,
                    discount: metric(|o| o.discount)?,
                    quantity: metric(|o| o.quantity as f64)?,
                })
            })
            .collect();

        Self { segments }
    }

    pub fn segments(&self) -> &[SegmentStats] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Build the frequency-weighted sampling distribution over segment
    /// indices. An empty table is a fatal error: there is nothing to sample
    /// from and fabricating values has no defensible semantics.
    pub fn weighted(&self) -> Result<Discrete<usize>> {
        if self.segments.is_empty() {
            return Err(SaleSynthError::EmptyHistory { dropped: 0 });
        }
        let indices: Vec<usize> = (0..self.segments.len()).collect();
        let weights: Vec<f64> = self.segments.iter().map(|s| s.count as f64).collect();
        Discrete::new(indices, &weights, "segments")
    }
}

/// IQR-based scale with a degenerate-distribution guard: segments whose
/// quartiles collapse (single distinct value) fall back to max(q3 * 0.10, 1).
fn iqr_scale(q1: f64, q3: f64) -> f64 {
    let s = q3 - q1;
    if s > SCALE_EPSILON {
        s
    } else {
        (q3 * 0.10).max(1.0)
    }
}

/// Median profit/sales ratio per category, from rows with positive sales and
/// a present profit. Categories without usable rows are simply absent; use
/// [`margin_for`] to resolve with the default.
pub fn category_margins(orders: &[Order]) -> BTreeMap<String, f64> {
    let mut ratios: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for o in orders {
        if o.sales > 0.0 && o.profit.is_finite() {
            ratios
                .entry(o.category.clone())
                .or_default()
                .push(o.profit / o.sales);
        }
    }

    ratios
        .into_iter()
        .filter_map(|(category, mut values)| {
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            percentile_sorted(&values, 50.0).map(|m| (category, m))
        })
        .collect()
}

/// Resolve a category's base margin, defaulting when unobserved.
pub fn margin_for(margins: &BTreeMap<String, f64>, category: &str) -> f64 {
    margins.get(category).copied().unwrap_or(DEFAULT_MARGIN)
}
