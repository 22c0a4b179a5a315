//! Derives display-ready points and summary metrics from a rate series.
use super::rates::RateRecord;
use serde::{Deserialize, Serialize};

/// How point dates are rendered for the chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// `YYYY-MM-DD`, as published.
    #[default]
    Iso,
    /// `dd/mm/yyyy`.
    Locale,
}

impl DateStyle {
    fn format_str(&self) -> &'static str {
        match self {
            DateStyle::Iso => "%Y-%m-%d",
            DateStyle::Locale => "%d/%m/%Y",
        }
    }
}

/// A rate record projected for charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayPoint {
    pub date: String,
    pub rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Positive,
    /// Zero change is reported here too.
    NonPositive,
}

/// Summary of a rate series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub current_rate: Option<f64>,
    /// Change between first and last point, in percent, two decimals.
    pub percentage_change: String,
    pub direction: Direction,
}

/// Projects records into chart points, one per record, order preserved.
pub fn project(records: &[RateRecord], style: DateStyle) -> Vec<DisplayPoint> {
    records
        .iter()
        .map(|r| DisplayPoint {
            date: r.effective_date.format(style.format_str()).to_string(),
            rate: r.mid,
        })
        .collect()
}

/// Rounds to two decimals, ties away from zero.
fn round_half_away(value: f64) -> f64 {
    if value.is_finite() {
        (value * 100.0).round() / 100.0
    } else {
        0.0
    }
}

/// Computes the latest rate and the change over the series.
pub fn derive(points: &[DisplayPoint]) -> DerivedMetrics {
    let current_rate = points.last().map(|p| p.rate);

    let change = match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() >= 2 && first.rate > 0.0 => {
            (last.rate - first.rate) / first.rate * 100.0
        }
        _ => 0.0,
    };
    let shown = round_half_away(change);
    let percentage_change = format!("{shown:.2}");
    // Direction follows the rounded figure the user sees.
    let direction = if shown > 0.0 {
        Direction::Positive
    } else {
        Direction::NonPositive
    };

    DerivedMetrics {
        current_rate,
        percentage_change,
        direction,
    }
}
