pub mod error;
pub mod line_data;
pub mod line_plot;
