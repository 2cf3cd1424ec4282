pub mod categorical;
pub mod percentile;
pub mod segments;
