//! Shared fixtures for salesynth tests: a small deterministic order history
//! spanning one calendar year, with enough segment/city/product variety to
//! exercise every distribution builder.

use chrono::NaiveDate;
use salesynth_core::dataset::History;
use salesynth_core::record::{Order, COLUMNS};

/// A deterministic 24-row history spanning Jan–Dec 2024, covering three
/// segments, two regions, and two payment modes.
pub fn fixture_orders() -> Vec<Order> {
    let specs: [(u32, u32, &str, &str, &str, &str, &str, i64, f64, f64); 24] = [
        (1, 3, "South", "Chennai", "Furniture", "Chairs", "Desk Chair", 2, 120.0, 10.0),
        (1, 15, "South", "Chennai", "Furniture", "Chairs", "Arm Chair", 1, 150.0, 5.0),
        (2, 4, "South", "Madurai", "Furniture", "Chairs", "Desk Chair", 3, 110.0, 15.0),
        (2, 20, "North", "Delhi", "Office", "Paper", "A4 Ream", 10, 4.5, 0.0),
        (3, 7, "North", "Delhi", "Office", "Paper", "A4 Ream", 8, 4.5, 0.0),
        (3, 22, "North", "Agra", "Office", "Paper", "A3 Ream", 6, 6.0, 5.0),
        (4, 2, "South", "Chennai", "Furniture", "Chairs", "Desk Chair", 2, 125.0, 10.0),
        (4, 18, "North", "Delhi", "Technology", "Phones", "Model X", 1, 620.0, 8.0),
        (5, 9, "North", "Delhi", "Technology", "Phones", "Model Y", 1, 480.0, 12.0),
        (5, 27, "South", "Chennai", "Technology", "Phones", "Model X", 2, 615.0, 10.0),
        (6, 5, "South", "Madurai", "Furniture", "Chairs", "Arm Chair", 1, 145.0, 0.0),
        (6, 19, "North", "Agra", "Office", "Paper", "A4 Ream", 12, 4.4, 2.0),
        (7, 8, "South", "Chennai", "Furniture", "Chairs", "Desk Chair", 4, 118.0, 20.0),
        (7, 23, "North", "Delhi", "Technology", "Phones", "Model Y", 1, 495.0, 5.0),
        (8, 11, "North", "Delhi", "Office", "Paper", "A3 Ream", 7, 6.2, 0.0),
        (8, 25, "South", "Chennai", "Furniture", "Chairs", "Arm Chair", 2, 152.0, 10.0),
        (9, 6, "South", "Madurai", "Technology", "Phones", "Model X", 1, 610.0, 15.0),
        (9, 21, "North", "Agra", "Office", "Paper", "A4 Ream", 9, 4.6, 0.0),
        (10, 10, "South", "Chennai", "Furniture", "Chairs", "Desk Chair", 3, 122.0, 12.0),
        (10, 24, "North", "Delhi", "Technology", "Phones", "Model X", 2, 618.0, 6.0),
        (11, 13, "North", "Delhi", "Office", "Paper", "A4 Ream", 15, 4.5, 0.0),
        (11, 26, "South", "Chennai", "Furniture", "Chairs", "Arm Chair", 1, 149.0, 8.0),
        (12, 12, "South", "Madurai", "Furniture", "Chairs", "Desk Chair", 5, 115.0, 25.0),
        (12, 28, "North", "Delhi", "Technology", "Phones", "Model Y", 1, 490.0, 10.0),
    ];

    specs
        .iter()
        .enumerate()
        .map(
            |(i, &(month, day, region, city, category, sub, product, qty, price, disc))| {
                let sales = price * qty as f64 * (1.0 - disc / 100.0);
                let margin = match category {
                    "Furniture" => 0.18,
                    "Office" => 0.22,
                    _ => 0.12,
                };
                Order {
                    order_id: 1000 + i as i64,
                    order_date: NaiveDate::from_ymd_opt(2024, month, day).unwrap(),
                    customer_name: format!("Customer {}", i),
                    region: region.to_string(),
                    city: city.to_string(),
                    category: category.to_string(),
                    sub_category: sub.to_string(),
                    product_name: product.to_string(),
                    quantity: qty,
                    unit_price: price,
                    discount: disc,
                    sales,
                    profit: sales * margin,
                    payment_mode: if i % 3 == 0 { "Card" } else { "UPI" }.to_string(),
                }
            },
        )
        .collect()
}

/// The fixture orders wrapped in a clean `History`.
pub fn fixture_history() -> History {
    History {
        orders: fixture_orders(),
        dropped_rows: 0,
        missing_columns: Vec::new(),
    }
}

/// Render any order list as CSV text in the canonical column order, for
/// writing on-disk fixtures.
pub fn orders_to_csv(orders: &[Order]) -> String {
    let mut out = COLUMNS.join(",");
    out.push('\n');
    for o in orders {
        out.push_str(&o.to_csv_record().join(","));
        out.push('\n');
    }
    out
}
