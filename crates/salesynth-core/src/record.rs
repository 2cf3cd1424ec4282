//! # Order Records
//!
//! The canonical row type shared by the loader, the sampler, and the
//! assembler. Column names and order match the source dataset exactly, so an
//! expanded file is a drop-in replacement for the original.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical column order for input and output files.
pub const COLUMNS: [&str; 14] = [
    "Order ID",
    "Order Date",
    "Customer Name",
    "Region",
    "City",
    "Category",
    "Sub-Category",
    "Product Name",
    "Quantity",
    "Unit Price",
    "Discount",
    "Sales",
    "Profit",
    "Payment Mode",
];

/// Columns that must be parseable for a row to survive cleaning.
pub const REQUIRED_NUMERIC_COLUMNS: [&str; 3] = ["Quantity", "Unit Price", "Discount"];

/// One order — either historical or synthetic. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub order_date: NaiveDate,
    pub customer_name: String,
    pub region: String,
    pub city: String,
    pub category: String,
    pub sub_category: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub discount: f64,
    /// May be NaN when the source row had no parseable Sales value.
    pub sales: f64,
    /// May be NaN when the source row had no parseable Profit value.
    pub profit: f64,
    pub payment_mode: String,
}

impl Order {
    /// Serialize into the canonical 14-field CSV record.
    ///
    /// Monetary fields use the shortest round-trip representation, so
    /// historical values keep their full precision across a load/save cycle;
    /// synthetic rows are rounded to cents at synthesis time instead.
    pub fn to_csv_record(&self) -> Vec<String> {
        vec![
            self.order_id.to_string(),
            self.order_date.format("%Y-%m-%d").to_string(),
            self.customer_name.clone(),
            self.region.clone(),
            self.city.clone(),
            self.category.clone(),
            self.sub_category.clone(),
            self.product_name.clone(),
            self.quantity.to_string(),
            format_money(self.unit_price),
            format_money(self.discount),
            format_money(self.sales),
            format_money(self.profit),
            self.payment_mode.clone(),
        ]
    }

    /// The (category, sub-category, region) grouping key for this order.
    pub fn segment_key(&self) -> (String, String, String) {
        (
            self.category.clone(),
            self.sub_category.clone(),
            self.region.clone(),
        )
    }
}

/// Monetary rendering: shortest round-trip representation for finite values,
/// an empty cell for NaN (absent in the source).
pub fn format_money(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        Order {
            order_id: 1001,
            order_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            customer_name: "Amina Khan".to_string(),
            region: "South".to_string(),
            city: "Chennai".to_string(),
            category: "Furniture".to_string(),
            sub_category: "Chairs".to_string(),
            product_name: "Desk Chair".to_string(),
            quantity: 3,
            unit_price: 120.5,
            discount: 10.0,
            sales: 325.35,
            profit: 48.8,
            payment_mode: "Card".to_string(),
        }
    }

    #[test]
    fn test_csv_record_column_count_matches_header() {
        assert_eq!(sample_order().to_csv_record().len(), COLUMNS.len());
    }

    #[test]
    fn test_money_formatting() {
        assert_eq!(format_money(12.5), "12.5");
        assert_eq!(format_money(0.0), "0");
        assert_eq!(format_money(3.14159), "3.14159");
        assert_eq!(format_money(100.125), "100.125");
        assert_eq!(format_money(f64::NAN), "");
    }

    #[test]
    fn test_date_serialized_iso() {
        let rec = sample_order().to_csv_record();
        assert_eq!(rec[1], "2024-03-15");
    }
}
