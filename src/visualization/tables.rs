use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::analysis::{SeriesStats, SeriesSummary};
use crate::models::{Parameters, SeriesResult};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn section(title: &str, width: usize) -> String {
    format!("\n{}\n{}\n", title.bold().green(), "=".repeat(width))
}

/// Format the parameters of a run as a string.
pub fn format_parameter_table(params: &Parameters) -> String {
    let mut output = section("Model Parameters", 50);

    let mut table = new_table(vec!["Parameter", "Value", "Unit"]);
    let rows = [
        ("Growth Rate (r)", params.growth_rate, "1/day"),
        ("Carrying Capacity (K)", params.carrying_capacity, "individuals"),
        ("Initial Population (P0)", params.initial_population, "individuals"),
        ("Seasonal Variation Factor", params.seasonal_factor, ""),
        ("Immigration Rate", params.immigration_rate, "individuals/day"),
        ("Noise Intensity", params.noise_intensity, ""),
    ];
    for (name, value, unit) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(value), Cell::new(unit)]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the parameters of a run.
pub fn print_parameter_table(params: &Parameters) {
    print!("{}", format_parameter_table(params));
}

fn stats_row(label: &str, stats: &SeriesStats) -> Vec<Cell> {
    vec![
        Cell::new(label),
        Cell::new(format!("{:.2}", stats.initial)),
        Cell::new(format!("{:.2}", stats.final_value)),
        Cell::new(format!("{:.2}", stats.min)),
        Cell::new(format!("{:.2}", stats.max)),
        Cell::new(format!("{:.2}", stats.mean)),
    ]
}

/// Format a run summary as a string.
pub fn format_summary_table(summary: &SeriesSummary) -> String {
    let mut output = section("Simulation Summary", 60);
    output.push_str(&format!(
        "{}\n",
        format!("Time points: {}", summary.points).dimmed()
    ));

    let mut table = new_table(vec!["Series", "Initial", "Final", "Min", "Max", "Mean"]);
    table.add_row(stats_row("Adaptive ODE", &summary.precise));
    table.add_row(stats_row("Euler", &summary.euler));
    table.add_row(stats_row("Stochastic", &summary.stochastic));
    output.push_str(&format!("{table}\n"));

    let mut comparison = new_table(vec!["Comparison", "Value"]);
    comparison.add_row(vec![
        Cell::new("Max |Euler - ODE|"),
        Cell::new(format!("{:.4}", summary.max_euler_deviation)),
    ]);
    comparison.add_row(vec![
        Cell::new("Final Euler relative error"),
        Cell::new(format!("{:.4}%", summary.final_euler_relative_error * 100.0)),
    ]);
    comparison.add_row(vec![
        Cell::new("Realized noise (std dev)"),
        Cell::new(match summary.realized_noise {
            Some(noise) => format!("{noise:.4}"),
            None => "N/A".to_string(),
        }),
    ]);
    output.push_str(&format!("{comparison}"));
    output
}

/// Print a run summary.
pub fn print_summary_table(summary: &SeriesSummary) {
    print!("{}", format_summary_table(summary));
}

/// Indices of `rows` points spread evenly over `len`, always including both ends.
///
/// `rows == 0` or `rows >= len` selects every point.
pub fn sample_indices(len: usize, rows: usize) -> Vec<usize> {
    if rows == 0 || rows >= len {
        return (0..len).collect();
    }
    if rows == 1 {
        return vec![0];
    }
    let mut indices: Vec<usize> = (0..rows)
        .map(|i| ((i as f64) * (len - 1) as f64 / (rows - 1) as f64).round() as usize)
        .collect();
    indices.dedup();
    indices
}

/// Format a sampled view of the series as a string.
pub fn format_series_table(time: &[f64], series: &SeriesResult, rows: usize) -> String {
    let mut output = section("Population Series", 60);

    if time.is_empty() {
        output.push_str("  No data available.\n");
        return output;
    }

    let mut table = new_table(vec!["Time (days)", "Adaptive ODE", "Euler", "Stochastic"]);
    for idx in sample_indices(time.len(), rows) {
        table.add_row(vec![
            Cell::new(format!("{:.1}", time[idx])),
            Cell::new(format!("{:.3}", series.precise[idx])),
            Cell::new(format!("{:.3}", series.euler[idx])),
            Cell::new(format!("{:.3}", series.stochastic[idx])),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print a sampled view of the series.
pub fn print_series_table(time: &[f64], series: &SeriesResult, rows: usize) {
    print!("{}", format_series_table(time, series, rows));
}
