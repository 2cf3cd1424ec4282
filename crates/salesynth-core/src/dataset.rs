//! # History Loading
//!
//! Lenient CSV ingestion of the historical order table. The loader maps
//! columns by header name (extra columns are ignored, missing ones warned
//! about), drops rows whose date or core numerics don't parse, and reports
//! how many rows were lost to cleaning.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{Result, SaleSynthError};
use crate::record::{Order, COLUMNS, REQUIRED_NUMERIC_COLUMNS};

/// Fallback order-id base when the history has no usable "Order ID" column.
pub const FALLBACK_START_ID: i64 = 100_000;

/// Date formats accepted in the "Order Date" column.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// The cleaned historical table plus loading diagnostics.
#[derive(Debug, Clone)]
pub struct History {
    pub orders: Vec<Order>,
    /// Rows discarded because a date or core numeric field didn't parse.
    pub dropped_rows: usize,
    /// Expected columns absent from the input header.
    pub missing_columns: Vec<String>,
}

impl History {
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// First synthetic order id: one past the largest historical id, or the
    /// fallback base when the input had no usable "Order ID" column.
    pub fn next_order_id(&self) -> i64 {
        if self.missing_columns.iter().any(|c| c == "Order ID") {
            return FALLBACK_START_ID;
        }
        self.orders
            .iter()
            .map(|o| o.order_id)
            .max()
            .map(|max| max + 1)
            .unwrap_or(FALLBACK_START_ID)
    }
}

/// Load and clean a historical order CSV.
///
/// Returns `InputNotFound` if the file is absent. Missing expected columns
/// produce a warning and degraded defaults, not a hard failure.
pub fn load_history(path: &Path) -> Result<History> {
    if !path.exists() {
        return Err(SaleSynthError::InputNotFound {
            path: path.display().to_string(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| SaleSynthError::InputRead {
            path: path.display().to_string(),
            source: e,
        })?;

    let headers = reader
        .headers()
        .map_err(|e| SaleSynthError::InputRead {
            path: path.display().to_string(),
            source: e,
        })?
        .clone();

    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim(), i))
        .collect();

    let missing_columns: Vec<String> = COLUMNS
        .iter()
        .filter(|c| !index.contains_key(**c))
        .map(|c| c.to_string())
        .collect();
    if !missing_columns.is_empty() {
        warn!(
            "Input is missing expected columns: {}. Proceeding, but output may be incomplete.",
            missing_columns.join(", ")
        );
    }

    let mut orders = Vec::new();
    let mut dropped_rows = 0usize;

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                dropped_rows += 1;
                continue;
            }
        };

        let field = |name: &str| -> Option<&str> {
            index.get(name).and_then(|&i| record.get(i)).map(str::trim)
        };

        // Rows without a parseable date carry no usable signal for either
        // the calendar distributions or the final sort.
        let order_date = match field("Order Date").and_then(parse_date) {
            Some(d) => d,
            None => {
                dropped_rows += 1;
                continue;
            }
        };

        // Core numerics must parse when their column exists; an absent
        // column degrades to zero for every row instead of dropping all.
        let mut core_ok = true;
        let mut core = |name: &str| -> f64 {
            if !index.contains_key(name) {
                return 0.0;
            }
            match field(name).and_then(|s| s.parse::<f64>().ok()) {
                Some(v) => v,
                None => {
                    core_ok = false;
                    0.0
                }
            }
        };
        let quantity = core("Quantity");
        let unit_price = core("Unit Price");
        let discount = core("Discount");
        if !core_ok {
            dropped_rows += 1;
            continue;
        }

        let text = |name: &str| field(name).unwrap_or("").to_string();

        orders.push(Order {
            order_id: field("Order ID")
                .and_then(|s| s.parse::<i64>().ok())
                .unwrap_or(0),
            order_date,
            customer_name: text("Customer Name"),
            region: text("Region"),
            city: text("City"),
            category: text("Category"),
            sub_category: text("Sub-Category"),
            product_name: text("Product Name"),
            quantity: quantity.round() as i64,
            unit_price,
            discount,
            sales: field("Sales")
                .and_then(|s| s.parse::<f64>().ok())
                .unwrap_or(f64::NAN),
            profit: field("Profit")
                .and_then(|s| s.parse::<f64>().ok())
                .unwrap_or(f64::NAN),
            payment_mode: text("Payment Mode"),
        });
    }

    if dropped_rows > 0 {
        warn!("Dropped {} rows with unparseable fields", dropped_rows);
    }
    debug!(
        "Loaded {} historical orders from {} (required numerics: {})",
        orders.len(),
        path.display(),
        REQUIRED_NUMERIC_COLUMNS.join(", ")
    );

    Ok(History {
        orders,
        dropped_rows,
        missing_columns,
    })
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    const HEADER: &str = "Order ID,Order Date,Customer Name,Region,City,Category,Sub-Category,Product Name,Quantity,Unit Price,Discount,Sales,Profit,Payment Mode";

    #[test]
    fn test_missing_file_is_fatal() {
        let err = load_history(Path::new("/no/such/file.csv")).unwrap_err();
        assert!(matches!(err, SaleSynthError::InputNotFound { .. }));
    }

    #[test]
    fn test_load_basic_rows() {
        let f = write_csv(&format!(
            "{HEADER}\n\
             1,2024-01-05,Amina Khan,South,Chennai,Furniture,Chairs,Desk Chair,2,100.0,10.0,180.0,27.0,Card\n\
             2,2024-02-10,Omar Patel,North,Delhi,Office,Paper,A4 Ream,5,4.5,0.0,22.5,4.5,UPI\n"
        ));
        let history = load_history(f.path()).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.dropped_rows, 0);
        assert!(history.missing_columns.is_empty());
        assert_eq!(history.orders[0].order_id, 1);
        assert_eq!(history.orders[0].quantity, 2);
        assert_eq!(history.next_order_id(), 3);
    }

    #[test]
    fn test_bad_date_and_numeric_rows_dropped() {
        let f = write_csv(&format!(
            "{HEADER}\n\
             1,not-a-date,A,South,Chennai,Furniture,Chairs,X,2,100.0,10.0,180.0,27.0,Card\n\
             2,2024-02-10,B,North,Delhi,Office,Paper,Y,oops,4.5,0.0,22.5,4.5,UPI\n\
             3,2024-03-01,C,North,Delhi,Office,Paper,Y,1,4.5,0.0,4.5,0.9,UPI\n"
        ));
        let history = load_history(f.path()).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.dropped_rows, 2);
        assert_eq!(history.orders[0].order_id, 3);
    }

    #[test]
    fn test_unparseable_sales_kept_as_nan() {
        let f = write_csv(&format!(
            "{HEADER}\n\
             1,2024-01-05,A,South,Chennai,Furniture,Chairs,X,2,100.0,10.0,,\u{20},Card\n"
        ));
        let history = load_history(f.path()).unwrap();
        assert_eq!(history.len(), 1);
        assert!(history.orders[0].sales.is_nan());
        assert!(history.orders[0].profit.is_nan());
    }

    #[test]
    fn test_missing_columns_warn_not_fail() {
        let f = write_csv(
            "Order Date,Region,Category,Sub-Category,Quantity,Unit Price,Discount\n\
             2024-01-05,South,Furniture,Chairs,2,100.0,10.0\n",
        );
        let history = load_history(f.path()).unwrap();
        assert_eq!(history.len(), 1);
        assert!(history.missing_columns.contains(&"Order ID".to_string()));
        assert!(history.missing_columns.contains(&"City".to_string()));
        // No Order ID column: ids fall back to the synthetic base.
        assert_eq!(history.next_order_id(), FALLBACK_START_ID);
    }

    #[test]
    fn test_next_order_id_empty_history() {
        let history = History {
            orders: vec![],
            dropped_rows: 0,
            missing_columns: vec![],
        };
        assert_eq!(history.next_order_id(), FALLBACK_START_ID);
    }

    #[test]
    fn test_alternate_date_format() {
        let f = write_csv(&format!(
            "{HEADER}\n\
             1,03/15/2024,A,South,Chennai,Furniture,Chairs,X,2,100.0,10.0,180.0,27.0,Card\n"
        ));
        let history = load_history(f.path()).unwrap();
        assert_eq!(
            history.orders[0].order_date,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn test_extra_columns_ignored() {
        let f = write_csv(&format!(
            "{HEADER},Notes\n\
             1,2024-01-05,A,South,Chennai,Furniture,Chairs,X,2,100.0,10.0,180.0,27.0,Card,hello\n"
        ));
        let history = load_history(f.path()).unwrap();
        assert_eq!(history.len(), 1);
        assert!(history.missing_columns.is_empty());
    }
}
