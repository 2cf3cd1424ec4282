//! # Monthly Demand Aggregates
//!
//! Aggregates the order table by (year, month, category, sub-category,
//! region) into the average-price/average-discount/order-count features the
//! downstream demand model consumes, and resolves lookups through an
//! explicit three-tier fallback. The tier that answered is part of the
//! result, so callers can tell an exact match from a segment or global
//! average.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use crate::record::Order;
use crate::stats::segments::SegmentKey;

/// Which tier of the fallback chain produced the features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsMode {
    /// Exact (segment, year, month) aggregate.
    ExactMonth,
    /// Same segment averaged across all months and years.
    SegmentFallback,
    /// Whole-table averages.
    GlobalFallback,
}

impl std::fmt::Display for StatsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StatsMode::ExactMonth => "exact_month",
            StatsMode::SegmentFallback => "segment_fallback",
            StatsMode::GlobalFallback => "global_fallback",
        };
        write!(f, "{}", s)
    }
}

/// Aggregated numeric features for one (segment, year, month) cell.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DemandFeatures {
    pub avg_unit_price: f64,
    pub avg_discount: f64,
    pub orders_count: u64,
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    price_sum: f64,
    discount_sum: f64,
    count: u64,
}

impl Accumulator {
    fn add(&mut self, o: &Order) {
        self.price_sum += o.unit_price;
        self.discount_sum += o.discount;
        self.count += 1;
    }

    fn features(&self) -> DemandFeatures {
        DemandFeatures {
            avg_unit_price: self.price_sum / self.count as f64,
            avg_discount: self.discount_sum / self.count as f64,
            orders_count: self.count,
        }
    }
}

/// The aggregate table built once from an order table (typically the
/// expanded output), queried read-only afterward.
#[derive(Debug, Clone)]
pub struct MonthlyAggregates {
    cells: BTreeMap<(SegmentKey, i32, u32), Accumulator>,
    global: Accumulator,
}

impl MonthlyAggregates {
    pub fn build(orders: &[Order]) -> Self {
        let mut cells: BTreeMap<(SegmentKey, i32, u32), Accumulator> = BTreeMap::new();
        let mut global = Accumulator::default();

        for o in orders {
            let (category, sub_category, region) = o.segment_key();
            let key = (
                SegmentKey {
                    category,
                    sub_category,
                    region,
                },
                o.order_date.year(),
                o.order_date.month(),
            );
            cells.entry(key).or_default().add(o);
            global.add(o);
        }

        Self { cells, global }
    }

    pub fn is_empty(&self) -> bool {
        self.global.count == 0
    }

    /// Resolve demand features for a segment and calendar month through the
    /// three-tier chain: exact cell → segment average → global average.
    /// Returns `None` only when the table was built from zero orders.
    pub fn lookup(
        &self,
        segment: &SegmentKey,
        year: i32,
        month: u32,
    ) -> Option<(DemandFeatures, StatsMode)> {
        if self.is_empty() {
            return None;
        }

        let exact_key = (segment.clone(), year, month);
        if let Some(cell) = self.cells.get(&exact_key) {
            return Some((cell.features(), StatsMode::ExactMonth));
        }

        // Segment tier: average this segment's monthly cells across time.
        // Counts take the truncated mean (whole orders per observed month).
        let lo = (segment.clone(), i32::MIN, 0u32);
        let hi = (segment.clone(), i32::MAX, u32::MAX);
        let seg_cells: Vec<&Accumulator> = self.cells.range(lo..=hi).map(|(_, a)| a).collect();
        if !seg_cells.is_empty() {
            let n = seg_cells.len() as f64;
            let features = DemandFeatures {
                avg_unit_price: seg_cells
                    .iter()
                    .map(|a| a.features().avg_unit_price)
                    .sum::<f64>()
                    / n,
                avg_discount: seg_cells
                    .iter()
                    .map(|a| a.features().avg_discount)
                    .sum::<f64>()
                    / n,
                orders_count: (seg_cells.iter().map(|a| a.count).sum::<u64>() as f64 / n) as u64,
            };
            return Some((features, StatsMode::SegmentFallback));
        }

        Some((self.global.features(), StatsMode::GlobalFallback))
    }
}

/// Calendar quarter (1–4) for a month (1–12).
pub fn quarter_of(month: u32) -> u32 {
    (month - 1) / 3 + 1
}
