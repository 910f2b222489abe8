use colored::Colorize;

use crate::models::SeriesResult;

const CHART_WIDTH: usize = 60;
const CHART_HEIGHT: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mark {
    Stochastic,
    Euler,
    Precise,
}

impl Mark {
    fn glyph(self) -> String {
        match self {
            Mark::Stochastic => ".".red().to_string(),
            Mark::Euler => "+".green().to_string(),
            Mark::Precise => "*".blue().to_string(),
        }
    }
}

/// Format a text line chart of the three series against time as a string.
///
/// Each column shows the series value at the nearest grid point. Where curves
/// overlap the adaptive solution is drawn on top, then Euler.
pub fn format_series_chart(time: &[f64], series: &SeriesResult) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Population Over Time".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(CHART_WIDTH + 12)));

    let finite = series
        .precise
        .iter()
        .chain(&series.euler)
        .chain(&series.stochastic)
        .copied()
        .filter(|v| v.is_finite());
    let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if time.is_empty() || lo > hi {
        output.push_str("  No data available.\n");
        return output;
    }
    let span = if hi > lo { hi - lo } else { 1.0 };

    let mut grid: Vec<Vec<Option<Mark>>> = vec![vec![None; CHART_WIDTH]; CHART_HEIGHT];
    let layers = [
        (Mark::Stochastic, &series.stochastic),
        (Mark::Euler, &series.euler),
        (Mark::Precise, &series.precise),
    ];
    let last = time.len() - 1;
    for (mark, values) in layers {
        for col in 0..CHART_WIDTH {
            let idx = if CHART_WIDTH > 1 {
                (col as f64 * last as f64 / (CHART_WIDTH - 1) as f64).round() as usize
            } else {
                0
            };
            let value = values[idx];
            if !value.is_finite() {
                continue;
            }
            let frac = (value - lo) / span;
            let row = ((1.0 - frac) * (CHART_HEIGHT - 1) as f64).round() as usize;
            grid[row.min(CHART_HEIGHT - 1)][col] = Some(mark);
        }
    }

    for (row, cells) in grid.iter().enumerate() {
        let label = match row {
            0 => format!("{hi:>10.1}"),
            r if r == CHART_HEIGHT - 1 => format!("{lo:>10.1}"),
            _ => " ".repeat(10),
        };
        let line: String = cells
            .iter()
            .map(|c| c.map(Mark::glyph).unwrap_or_else(|| " ".to_string()))
            .collect();
        output.push_str(&format!("{label} |{line}\n"));
    }

    output.push_str(&format!("{} +{}\n", " ".repeat(10), "-".repeat(CHART_WIDTH)));
    output.push_str(&format!(
        "{}  {:<width$}{:>8.0}\n",
        " ".repeat(10),
        format!("{:.0}", time[0]),
        time[last],
        width = CHART_WIDTH - 8
    ));
    output.push_str(&format!(
        "  {} Adaptive ODE   {} Euler   {} Stochastic   (x: time in days)\n",
        Mark::Precise.glyph(),
        Mark::Euler.glyph(),
        Mark::Stochastic.glyph()
    ));
    output
}

/// Print a text line chart of the three series.
pub fn print_series_chart(time: &[f64], series: &SeriesResult) {
    print!("{}", format_series_chart(time, series));
}
