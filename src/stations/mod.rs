pub mod error;
pub mod points;
pub mod projection;
