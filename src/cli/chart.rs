//! Plain-text line chart of a rate series.
use crate::core::metrics::DisplayPoint;
use chrono::{Datelike, NaiveDate};

const PLOT_MARK: char = '•';
const Y_LABEL_WIDTH: usize = 9;

/// `M/YYYY` tick label for a point date, or the raw date if unparseable.
pub fn axis_label(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date, "%d/%m/%Y"))
        .map(|d| format!("{}/{}", d.month(), d.year()))
        .unwrap_or_else(|_| date.to_string())
}

/// Picks one point per column, always keeping the first and last point.
fn sample(points: &[DisplayPoint], columns: usize) -> Vec<f64> {
    if points.len() <= columns || columns < 2 {
        return points.iter().map(|p| p.rate).collect();
    }
    let last = points.len() - 1;
    (0..columns)
        .map(|c| points[c * last / (columns - 1)].rate)
        .collect()
}

/// Renders `points` into `height` plot rows plus an x-axis line.
///
/// Returns no lines for an empty series.
pub fn render(points: &[DisplayPoint], width: usize, height: usize) -> Vec<String> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    let height = height.max(2);
    let columns = width.saturating_sub(Y_LABEL_WIDTH + 2).max(2);
    let values = sample(points, columns);

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    let mut grid = vec![vec![' '; values.len()]; height];
    for (col, value) in values.iter().enumerate() {
        let level = if span > 0.0 {
            ((value - min) / span * (height - 1) as f64).round() as usize
        } else {
            (height - 1) / 2
        };
        grid[height - 1 - level.min(height - 1)][col] = PLOT_MARK;
    }

    let mut lines: Vec<String> = grid
        .into_iter()
        .enumerate()
        .map(|(row, cells)| {
            let label = if row == 0 {
                format!("{max:.4}")
            } else if row == height - 1 {
                format!("{min:.4}")
            } else {
                String::new()
            };
            let plot: String = cells.into_iter().collect();
            format!("{label:>Y_LABEL_WIDTH$} │{}", plot.trim_end())
        })
        .collect();

    let start = axis_label(&first.date);
    let end = axis_label(&last.date);
    let gap = values.len().saturating_sub(start.len() + end.len()).max(1);
    lines.push(format!(
        "{:>Y_LABEL_WIDTH$} └{}",
        "",
        "─".repeat(values.len())
    ));
    lines.push(format!(
        "{:>Y_LABEL_WIDTH$}  {start}{}{end}",
        "",
        " ".repeat(gap)
    ));
    lines
}
