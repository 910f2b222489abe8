use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
};
use tracing::info;

use crate::error::SimError;
use crate::models::SimulationRun;
use crate::visualization::format_description;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const TITLE: &str = "Population Growth Model";

const BODY_FONT_SIZE: f32 = 10.0;
const LINE_HEIGHT_MM: f32 = 5.0;
const WRAP_COLUMNS: usize = 95;

/// Rectangle on the page the chart is drawn into, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartFrame {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

impl ChartFrame {
    const PAGE: ChartFrame = ChartFrame {
        left: 30.0,
        bottom: 150.0,
        right: 190.0,
        top: 262.0,
    };
}

/// Data extent of a chart: [x_min, x_max] by [y_min, y_max].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    /// Extent of the time axis and of all finite values across the series.
    ///
    /// A flat or empty extent is widened so scaling never divides by zero.
    pub fn of(time: &[f64], series: &[&[f64]]) -> Self {
        let (mut x_min, mut x_max) = finite_extent(time.iter().copied());
        let (mut y_min, mut y_max) =
            finite_extent(series.iter().flat_map(|s| s.iter().copied()));
        if x_max <= x_min {
            x_min -= 0.5;
            x_max += 0.5;
        }
        if y_max <= y_min {
            y_min -= 1.0;
            y_max += 1.0;
        }
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }
}

fn finite_extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        (0.0, 0.0)
    } else {
        (min, max)
    }
}

/// Map a series onto page coordinates, dropping non-finite points.
pub fn scale_points(
    time: &[f64],
    values: &[f64],
    bounds: &Bounds,
    frame: &ChartFrame,
) -> Vec<(f32, f32)> {
    let width = (frame.right - frame.left) as f64;
    let height = (frame.top - frame.bottom) as f64;
    time.iter()
        .zip(values)
        .filter(|(t, v)| t.is_finite() && v.is_finite())
        .map(|(&t, &v)| {
            let x_frac = (t - bounds.x_min) / (bounds.x_max - bounds.x_min);
            let y_frac = (v - bounds.y_min) / (bounds.y_max - bounds.y_min);
            let x = frame.left as f64 + x_frac * width;
            let y = frame.bottom as f64 + y_frac * height;
            (x as f32, y as f32)
        })
        .collect()
}

/// Greedy word wrap. Words longer than `columns` get a line of their own.
pub fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if !current.is_empty() && current.len() + 1 + word.len() > columns {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    lines
}

fn report_err(e: impl std::fmt::Display) -> SimError {
    SimError::Report(e.to_string())
}

fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn polyline(layer: &PdfLayerReference, points: &[(f32, f32)], closed: bool) {
    if points.len() < 2 {
        return;
    }
    layer.add_line(Line {
        points: points
            .iter()
            .map(|&(x, y)| (Point::new(Mm(x), Mm(y)), false))
            .collect(),
        is_closed: closed,
    });
}

fn draw_chart(layer: &PdfLayerReference, run: &SimulationRun, font: &IndirectFontRef) {
    let frame = ChartFrame::PAGE;
    let time = run.time_grid.points();
    let series = &run.series;
    let bounds = Bounds::of(
        time,
        &[&series.precise, &series.euler, &series.stochastic],
    );

    layer.set_outline_color(rgb(0.0, 0.0, 0.0));
    layer.set_outline_thickness(0.5);
    polyline(
        layer,
        &[
            (frame.left, frame.bottom),
            (frame.right, frame.bottom),
            (frame.right, frame.top),
            (frame.left, frame.top),
        ],
        true,
    );

    let tick_labels = [
        (format!("{:.0}", bounds.x_min), frame.left - 2.0, frame.bottom - 5.0),
        (format!("{:.0}", bounds.x_max), frame.right - 8.0, frame.bottom - 5.0),
        (format!("{:.1}", bounds.y_min), frame.left - 18.0, frame.bottom),
        (format!("{:.1}", bounds.y_max), frame.left - 18.0, frame.top - 3.0),
    ];
    for (text, x, y) in tick_labels {
        layer.use_text(text, 8.0, Mm(x), Mm(y), font);
    }
    layer.use_text("Time (days)", 10.0, Mm(100.0), Mm(frame.bottom - 11.0), font);
    layer.use_text("Population Size", 10.0, Mm(frame.left), Mm(frame.top + 4.0), font);

    let curves = [
        (&series.stochastic, rgb(0.85, 0.1, 0.1), "With Stochastic Noise"),
        (&series.euler, rgb(0.1, 0.6, 0.1), "Euler's Method"),
        (&series.precise, rgb(0.1, 0.2, 0.85), "Adaptive ODE Solution"),
    ];

    layer.set_outline_thickness(0.6);
    for (idx, (values, color, label)) in curves.iter().enumerate() {
        layer.set_outline_color(color.clone());
        polyline(layer, &scale_points(time, values, &bounds, &frame), false);

        let y = frame.bottom - 20.0 - 6.0 * (curves.len() - 1 - idx) as f32;
        polyline(layer, &[(frame.left, y + 1.0), (frame.left + 10.0, y + 1.0)], false);
        layer.use_text(*label, 9.0, Mm(frame.left + 13.0), Mm(y), font);
    }
}

/// Write a PDF report: the chart of all three series followed by the textual
/// description of the run, paginated with a 15 mm bottom margin.
pub fn write_report(run: &SimulationRun, path: impl AsRef<Path>) -> Result<(), SimError> {
    run.check_alignment()?;
    let path = path.as_ref();

    let (doc, page, layer) =
        PdfDocument::new(TITLE, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Chart");
    let body = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(report_err)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(report_err)?;

    let mut current = doc.get_page(page).get_layer(layer);
    current.use_text(TITLE, 16.0, Mm(60.0), Mm(PAGE_HEIGHT_MM - MARGIN_MM), &bold);
    draw_chart(&current, run, &body);

    let mut y = 100.0;
    let mut pages = 1;
    for line in wrap_text(&format_description(&run.parameters), WRAP_COLUMNS) {
        if y < MARGIN_MM {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Text");
            current = doc.get_page(page).get_layer(layer);
            y = PAGE_HEIGHT_MM - MARGIN_MM;
            pages += 1;
        }
        current.use_text(line, BODY_FONT_SIZE, Mm(MARGIN_MM), Mm(y), &body);
        y -= LINE_HEIGHT_MM;
    }

    let file = File::create(path)?;
    doc.save(&mut BufWriter::new(file)).map_err(report_err)?;
    info!(path = %path.display(), pages, "PDF report written");
    Ok(())
}
