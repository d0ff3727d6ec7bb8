pub mod report;
pub mod writer;

pub use report::print_hourly_chart;
pub use writer::{write_hourly_summary, write_matrix_csv, OutputPaths};
