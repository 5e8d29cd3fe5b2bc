pub mod bucket_pattern;
pub mod reduction;
pub mod statistic;
