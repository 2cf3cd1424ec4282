//! # Weighted Categorical Distributions
//!
//! `Discrete<T>` is an immutable weighted-choice table: an ordered list of
//! values with cumulative probabilities, drawn from with a single uniform
//! sample and a binary search. Every distribution the generator samples from
//! (segments, cities, products, payment modes, months, years) is one of
//! these, built once per run from historical frequencies.

use indexmap::IndexMap;
use rand::Rng;

use crate::config::GenerateConfig;
use crate::error::{Result, SaleSynthError};
use crate::record::Order;

/// City emitted when a region has no historical cities at all.
pub const UNKNOWN_CITY: &str = "Unknown";
/// Product emitted when a (category, sub-category) pair has no products.
pub const FALLBACK_PRODUCT: &str = "Product";
/// Payment mode assumed when the history carries none.
pub const FALLBACK_PAYMENT_MODE: &str = "Card";

/// An immutable discrete distribution over `values`, stored as cumulative
/// probabilities for O(log n) sampling.
#[derive(Debug, Clone)]
pub struct Discrete<T> {
    values: Vec<T>,
    cumulative: Vec<f64>,
}

impl<T> Discrete<T> {
    /// Build from raw (non-negative) weights, normalizing to sum to 1.
    ///
    /// `context` names the distribution in the error when the total weight
    /// is zero or non-finite.
    pub fn new(values: Vec<T>, weights: &[f64], context: &str) -> Result<Self> {
        debug_assert_eq!(values.len(), weights.len());
        let total: f64 = weights.iter().sum();
        if values.is_empty() || !(total.is_finite() && total > 0.0) {
            return Err(SaleSynthError::DegenerateDistribution {
                context: context.to_string(),
                total,
            });
        }

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut acc = 0.0;
        for w in weights {
            acc += w / total;
            cumulative.push(acc);
        }
        // Guard the last bucket against accumulated float error.
        if let Some(last) = cumulative.last_mut() {
            *last = 1.0;
        }

        Ok(Self { values, cumulative })
    }

    /// Build a uniform distribution over `values`.
    pub fn uniform(values: Vec<T>, context: &str) -> Result<Self> {
        let weights = vec![1.0; values.len()];
        Self::new(values, &weights, context)
    }

    /// Draw one value by weight. A single uniform draw consumes one RNG
    /// sample regardless of table size, keeping the draw sequence stable.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        let u: f64 = rng.random();
        let idx = self.cumulative.partition_point(|&c| c <= u);
        &self.values[idx.min(self.values.len() - 1)]
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Per-value probabilities (differences of the cumulative table).
    pub fn probabilities(&self) -> Vec<f64> {
        let mut prev = 0.0;
        self.cumulative
            .iter()
            .map(|&c| {
                let p = c - prev;
                prev = c;
                p
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// All categorical lookup tables needed to synthesize one order, built once
/// per run and reused read-only for every row.
#[derive(Debug, Clone)]
pub struct CategoricalModel {
    city_by_region: IndexMap<String, Discrete<String>>,
    product_by_subcat: IndexMap<(String, String), Discrete<String>>,
    pub payment_modes: Discrete<String>,
    pub months: Discrete<u32>,
    pub years: Discrete<i32>,
    /// Uniform fallback over every distinct historical city.
    all_cities: Option<Discrete<String>>,
    /// Uniform fallback over every distinct historical product.
    all_products: Option<Discrete<String>>,
}

impl CategoricalModel {
    pub fn build(orders: &[Order], config: &GenerateConfig) -> Result<Self> {
        let mut city_by_region = IndexMap::new();
        for (region, counts) in group_counts(orders, |o| o.region.clone(), |o| o.city.clone()) {
            let (values, weights) = ranked(counts);
            city_by_region.insert(
                region.clone(),
                Discrete::new(values, &weights, &format!("cities in region '{}'", region))?,
            );
        }

        let mut product_by_subcat = IndexMap::new();
        for (key, counts) in group_counts(
            orders,
            |o| (o.category.clone(), o.sub_category.clone()),
            |o| o.product_name.clone(),
        ) {
            let (values, weights) = ranked(counts);
            product_by_subcat.insert(
                key.clone(),
                Discrete::new(
                    values,
                    &weights,
                    &format!("products in ({}, {})", key.0, key.1),
                )?,
            );
        }

        let payment_modes = {
            let mut counts: IndexMap<String, usize> = IndexMap::new();
            for o in orders {
                if !o.payment_mode.is_empty() {
                    *counts.entry(o.payment_mode.clone()).or_insert(0) += 1;
                }
            }
            if counts.is_empty() {
                Discrete::uniform(vec![FALLBACK_PAYMENT_MODE.to_string()], "payment modes")?
            } else {
                let (values, weights) = ranked(counts);
                Discrete::new(values, &weights, "payment modes")?
            }
        };

        let months = month_distribution(orders, config.seasonal_strength)?;
        let years = year_distribution(orders, config)?;

        let all_cities = distinct(orders, |o| o.city.clone())
            .map(|cities| Discrete::uniform(cities, "all cities"))
            .transpose()?;
        let all_products = distinct(orders, |o| o.product_name.clone())
            .map(|products| Discrete::uniform(products, "all products"))
            .transpose()?;

        Ok(Self {
            city_by_region,
            product_by_subcat,
            payment_modes,
            months,
            years,
            all_cities,
            all_products,
        })
    }

    /// Draw a city conditioned on region, falling back to a uniform draw
    /// over all historical cities, then to a sentinel when none exist.
    pub fn city_for<R: Rng + ?Sized>(&self, region: &str, rng: &mut R) -> String {
        if let Some(dist) = self.city_by_region.get(region) {
            return dist.draw(rng).clone();
        }
        match &self.all_cities {
            Some(dist) => dist.draw(rng).clone(),
            None => UNKNOWN_CITY.to_string(),
        }
    }

    /// Draw a product conditioned on (category, sub-category), with the same
    /// two-stage fallback as cities.
    pub fn product_for<R: Rng + ?Sized>(
        &self,
        category: &str,
        sub_category: &str,
        rng: &mut R,
    ) -> String {
        let key = (category.to_string(), sub_category.to_string());
        if let Some(dist) = self.product_by_subcat.get(&key) {
            return dist.draw(rng).clone();
        }
        match &self.all_products {
            Some(dist) => dist.draw(rng).clone(),
            None => FALLBACK_PRODUCT.to_string(),
        }
    }

    pub fn regions(&self) -> impl Iterator<Item = &String> {
        self.city_by_region.keys()
    }
}

/// Month distribution: historical frequency (absent months floored to 1)
/// shaped by the seasonal multiplier — Nov/Dec boosted by (1 + S), Feb/Mar
/// damped by (1 - S/2) — then renormalized.
fn month_distribution(orders: &[Order], seasonal_strength: f64) -> Result<Discrete<u32>> {
    use chrono::Datelike;

    let mut counts = [0usize; 12];
    for o in orders {
        counts[o.order_date.month0() as usize] += 1;
    }

    let months: Vec<u32> = (1..=12).collect();
    let weights: Vec<f64> = months
        .iter()
        .map(|&m| {
            let base = counts[(m - 1) as usize].max(1) as f64;
            let seasonal = match m {
                11 | 12 => 1.0 + seasonal_strength,
                2 | 3 => 1.0 - seasonal_strength / 2.0,
                _ => 1.0,
            };
            base * seasonal
        })
        .collect();

    Discrete::new(months, &weights, "calendar months")
}

/// Year distribution over the configured range, weighted by historical
/// frequency with a Laplace floor of 1 so in-range years with no history
/// remain reachable.
fn year_distribution(orders: &[Order], config: &GenerateConfig) -> Result<Discrete<i32>> {
    use chrono::Datelike;

    let mut counts: IndexMap<i32, usize> = IndexMap::new();
    for o in orders {
        *counts.entry(o.order_date.year()).or_insert(0) += 1;
    }

    let years = config.years();
    let weights: Vec<f64> = years
        .iter()
        .map(|y| counts.get(y).copied().unwrap_or(0).max(1) as f64)
        .collect();

    Discrete::new(years, &weights, "calendar years")
}

/// Count values of `value_of` grouped by `key_of`, preserving first-appearance
/// order so runs over the same input build identical tables.
fn group_counts<K, F, G>(
    orders: &[Order],
    key_of: F,
    value_of: G,
) -> IndexMap<K, IndexMap<String, usize>>
where
    K: std::hash::Hash + Eq,
    F: Fn(&Order) -> K,
    G: Fn(&Order) -> String,
{
    let mut groups: IndexMap<K, IndexMap<String, usize>> = IndexMap::new();
    for o in orders {
        let value = value_of(o);
        if value.is_empty() {
            continue;
        }
        *groups
            .entry(key_of(o))
            .or_default()
            .entry(value)
            .or_insert(0) += 1;
    }
    groups
}

/// Order a count map by descending frequency (ties keep first-appearance
/// order) and split into parallel value/weight vectors.
fn ranked(counts: IndexMap<String, usize>) -> (Vec<String>, Vec<f64>) {
    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    let weights = entries.iter().map(|(_, c)| *c as f64).collect();
    let values = entries.into_iter().map(|(v, _)| v).collect();
    (values, weights)
}

/// Distinct non-empty values in first-appearance order, or `None` when the
/// column is effectively absent.
fn distinct<G: Fn(&Order) -> String>(orders: &[Order], value_of: G) -> Option<Vec<String>> {
    let mut seen: IndexMap<String, ()> = IndexMap::new();
    for o in orders {
        let v = value_of(o);
        if !v.is_empty() {
            seen.entry(v).or_insert(());
        }
    }
    if seen.is_empty() {
        None
    } else {
        Some(seen.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::fixtures::fixture_orders;

    #[test]
    fn test_discrete_probabilities_sum_to_one() {
        let d = Discrete::new(vec!["a", "b", "c"], &[3.0, 2.0, 5.0], "test").unwrap();
        let sum: f64 = d.probabilities().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((d.probabilities()[0] - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_discrete_zero_weight_is_error() {
        let err = Discrete::new(vec!["a"], &[0.0], "test").unwrap_err();
        assert!(matches!(
            err,
            SaleSynthError::DegenerateDistribution { .. }
        ));
    }

    #[test]
    fn test_discrete_empty_is_error() {
        assert!(Discrete::<&str>::new(vec![], &[], "test").is_err());
    }

    #[test]
    fn test_draw_respects_weights() {
        let d = Discrete::new(vec!["heavy", "light"], &[99.0, 1.0], "test").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let heavy = (0..1000).filter(|_| *d.draw(&mut rng) == "heavy").count();
        assert!(heavy > 900, "heavy drawn {} of 1000", heavy);
    }

    #[test]
    fn test_draw_single_value_always_returned() {
        let d = Discrete::uniform(vec![42], "test").unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            assert_eq!(*d.draw(&mut rng), 42);
        }
    }

    #[test]
    fn test_model_probabilities_normalized() {
        let orders = fixture_orders();
        let model = CategoricalModel::build(&orders, &GenerateConfig::default()).unwrap();

        for dist in [&model.months.probabilities(), &model.payment_modes.probabilities()] {
            let sum: f64 = dist.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
        let sum: f64 = model.years.probabilities().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_seasonal_month_shaping() {
        let orders = fixture_orders();
        let flat = month_distribution(&orders, 0.0).unwrap();
        let shaped = month_distribution(&orders, 0.4).unwrap();

        let p_flat = flat.probabilities();
        let p_shaped = shaped.probabilities();
        // November (index 10) gains, February (index 1) loses.
        assert!(p_shaped[10] > p_flat[10]);
        assert!(p_shaped[1] < p_flat[1]);
    }

    #[test]
    fn test_year_laplace_floor() {
        let orders = fixture_orders(); // history spans 2024 only
        let config = GenerateConfig {
            start_year: 2022,
            end_year: 2025,
            ..Default::default()
        };
        let years = year_distribution(&orders, &config).unwrap();
        // Years with no history still get non-zero probability.
        for p in years.probabilities() {
            assert!(p > 0.0);
        }
        assert_eq!(years.values(), &[2022, 2023, 2024, 2025]);
    }

    #[test]
    fn test_city_fallback_chain() {
        let orders = fixture_orders();
        let model = CategoricalModel::build(&orders, &GenerateConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        // Known region draws one of its own cities.
        let city = model.city_for("South", &mut rng);
        assert!(!city.is_empty());

        // Unknown region falls back to some historical city, not the sentinel.
        let city = model.city_for("Atlantis", &mut rng);
        assert_ne!(city, UNKNOWN_CITY);
    }

    #[test]
    fn test_city_sentinel_when_no_cities_exist() {
        let mut orders = fixture_orders();
        for o in &mut orders {
            o.city.clear();
        }
        let model = CategoricalModel::build(&orders, &GenerateConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(model.city_for("South", &mut rng), UNKNOWN_CITY);
    }

    #[test]
    fn test_product_fallback_for_unknown_pairing() {
        let orders = fixture_orders();
        let model = CategoricalModel::build(&orders, &GenerateConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let product = model.product_for("Nope", "Nothing", &mut rng);
        assert_ne!(product, FALLBACK_PRODUCT); // history has products to fall back on
    }

    #[test]
    fn test_payment_mode_fallback() {
        let mut orders = fixture_orders();
        for o in &mut orders {
            o.payment_mode.clear();
        }
        let model = CategoricalModel::build(&orders, &GenerateConfig::default()).unwrap();
        assert_eq!(model.payment_modes.values(), &[FALLBACK_PAYMENT_MODE]);
    }
}
