mod charts;
mod description;
mod tables;

pub use charts::{format_series_chart, print_series_chart};
pub use description::format_description;
pub use tables::{
    format_parameter_table, format_series_table, format_summary_table, print_parameter_table,
    print_series_table, print_summary_table, sample_indices,
};
