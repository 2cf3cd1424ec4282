//! # Row Sampler
//!
//! Draws synthetic orders one at a time from the distributions built out of
//! the historical table. Each row consumes RNG samples in a fixed order
//! (segment, year, month, day, city, product, price, discount, quantity,
//! margin noise, payment mode, first name, last name), so a fixed seed and
//! fixed input reproduce the exact same rows on every run.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::GenerateConfig;
use crate::dataset::History;
use crate::error::{Result, SaleSynthError};
use crate::generate::names::customer_name;
use crate::record::Order;
use crate::stats::categorical::{CategoricalModel, Discrete};
use crate::stats::segments::{category_margins, margin_for, SegmentTable};

/// Standard deviation of the Gaussian noise added to category margins.
const MARGIN_NOISE_STD: f64 = 0.04;
/// Margin clamp bounds.
const MARGIN_MIN: f64 = 0.01;
const MARGIN_MAX: f64 = 0.40;
/// Discount clamp bounds (percent).
const DISCOUNT_MIN: f64 = 0.0;
const DISCOUNT_MAX: f64 = 60.0;
/// Lower bounds for price and quantity; neither has an upper bound.
const PRICE_MIN: f64 = 1.0;
const QUANTITY_MIN: f64 = 1.0;

/// Everything the sampler needs, built once per run from the history and
/// reused read-only for every synthetic row.
#[derive(Debug, Clone)]
pub struct GenerationModel {
    pub segments: SegmentTable,
    pub categorical: CategoricalModel,
    pub margins: BTreeMap<String, f64>,
    pub config: GenerateConfig,
}

impl GenerationModel {
    pub fn build(history: &History, config: &GenerateConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            segments: SegmentTable::build(&history.orders),
            categorical: CategoricalModel::build(&history.orders, config)?,
            margins: category_margins(&history.orders),
            config: config.clone(),
        })
    }
}

/// Stateful sampler: owns the segment-weight distribution and the id
/// sequence, borrows the model.
pub struct RowSampler<'a> {
    model: &'a GenerationModel,
    segment_weights: Discrete<usize>,
    next_id: i64,
}

impl<'a> RowSampler<'a> {
    /// Fails with `EmptyHistory` when there are no segments to sample from.
    pub fn new(model: &'a GenerationModel, start_id: i64) -> Result<Self> {
        let segment_weights = model.segments.weighted()?;
        Ok(Self {
            model,
            segment_weights,
            next_id: start_id,
        })
    }

    /// Draw one synthetic order and advance the id sequence.
    pub fn sample_order(&mut self, rng: &mut StdRng) -> Result<Order> {
        let s = self.model.config.seasonal_strength;

        let seg = &self.model.segments.segments()[*self.segment_weights.draw(rng)];
        let year = *self.model.categorical.years.draw(rng);
        let month = *self.model.categorical.months.draw(rng);
        // Days 1-28 only, so every sampled (year, month, day) is valid.
        let day = rng.random_range(1..29u32);
        let order_date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(SaleSynthError::InvalidDate { year, month, day })?;

        let city = self.model.categorical.city_for(&seg.key.region, rng);
        let product =
            self.model
                .categorical
                .product_for(&seg.key.category, &seg.key.sub_category, rng);

        let unit_price = round2(sample_normal_around(
            rng,
            seg.unit_price.median,
            seg.unit_price.scale,
            Some(PRICE_MIN),
            None,
        )?);
        let discount = round2(sample_normal_around(
            rng,
            seg.discount.median,
            seg.discount.scale,
            Some(DISCOUNT_MIN),
            Some(DISCOUNT_MAX),
        )?);
        let mut quantity = sample_normal_around(
            rng,
            seg.quantity.median,
            seg.quantity.scale,
            Some(QUANTITY_MIN),
            None,
        )?;

        // Seasonal demand adjustment, then integer rounding. The Feb/Mar
        // damping can push a small quantity below one, so re-clip after
        // rounding to keep the quantity >= 1 invariant unconditional.
        match month {
            11 | 12 => quantity *= 1.0 + s / 2.0,
            2 | 3 => quantity *= 1.0 - s / 3.0,
            _ => {}
        }
        let quantity = (quantity.round() as i64).max(1);

        let sales = round2(unit_price * quantity as f64 * (1.0 - discount / 100.0));

        let base_margin = margin_for(&self.model.margins, &seg.key.category);
        let noise = sample_gaussian(rng, 0.0, MARGIN_NOISE_STD)?;
        let margin = (base_margin + noise).clamp(MARGIN_MIN, MARGIN_MAX);
        let profit = round2(sales * margin);

        let payment_mode = self.model.categorical.payment_modes.draw(rng).clone();
        let customer_name = customer_name(rng);

        let order_id = self.next_id;
        self.next_id += 1;

        Ok(Order {
            order_id,
            order_date,
            customer_name,
            region: seg.key.region.clone(),
            city,
            category: seg.key.category.clone(),
            sub_category: seg.key.sub_category.clone(),
            product_name: product,
            quantity,
            unit_price,
            discount,
            sales,
            profit,
            payment_mode,
        })
    }

    /// Draw `n` rows, invoking `progress(done, n)` as the batch advances.
    pub fn sample_many(
        &mut self,
        rng: &mut StdRng,
        n: usize,
        progress: Option<&dyn Fn(usize, usize)>,
    ) -> Result<Vec<Order>> {
        const PROGRESS_BATCH_SIZE: usize = 500;

        let mut rows = Vec::with_capacity(n);
        for i in 0..n {
            rows.push(self.sample_order(rng)?);
            if let Some(cb) = progress {
                let done = i + 1;
                if done % PROGRESS_BATCH_SIZE == 0 || done == n {
                    cb(done, n);
                }
            }
        }
        Ok(rows)
    }
}

/// One Gaussian draw centered on `median` with the segment's IQR scale as
/// standard deviation, clipped to the metric's bounds.
fn sample_normal_around(
    rng: &mut StdRng,
    median: f64,
    scale: f64,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<f64> {
    let mut x = sample_gaussian(rng, median, scale)?;
    if let Some(lo) = min {
        x = x.max(lo);
    }
    if let Some(hi) = max {
        x = x.min(hi);
    }
    Ok(x)
}

/// Two-decimal rounding for synthetic monetary values. Applied at synthesis
/// only; historical values pass through the pipeline unrounded.
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn sample_gaussian(rng: &mut StdRng, mean: f64, std: f64) -> Result<f64> {
    let dist = Normal::new(mean, std).map_err(|e| {
        SaleSynthError::Other(format!(
            "invalid normal parameters (mean {}, std {}): {}",
            mean, std, e
        ))
    })?;
    Ok(dist.sample(rng))
}
