use super::{chart, ui};
use crate::core::dashboard::{Dashboard, DashboardState};
use crate::core::currency::QUOTE_CURRENCY;
use crate::core::metrics::{DateStyle, DerivedMetrics, Direction, DisplayPoint};
use crate::core::{Currency, RateProvider, RateWindow};
use anyhow::{Context, Result};
use chrono::Local;
use comfy_table::{Cell, CellAlignment};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

const CHART_HEIGHT: usize = 12;

/// How the dashboard is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShowOptions {
    pub json: bool,
    pub table: bool,
}

#[derive(Serialize)]
struct DashboardJson<'a> {
    currency: Currency,
    pair: String,
    points: &'a [DisplayPoint],
    metrics: &'a DerivedMetrics,
}

pub async fn run(
    provider: Arc<dyn RateProvider>,
    currency: Currency,
    window: RateWindow,
    date_style: DateStyle,
    options: ShowOptions,
) -> Result<()> {
    let dashboard = Dashboard::new(provider, currency, window, date_style);

    let spinner = ui::new_progress_bar(1);
    spinner.set_message(format!("Fetching {} rates", currency.pair()));
    let state = dashboard.select(currency).await;
    spinner.finish_and_clear();
    debug!(points = state.points().len(), "Dashboard loaded");

    if options.json {
        println!("{}", to_json(&state)?);
        return Ok(());
    }

    for line in render(&state, ui::term_width()) {
        println!("{line}");
    }
    if options.table {
        display_points(state.points());
    }
    Ok(())
}

fn to_json(state: &DashboardState) -> Result<String> {
    let metrics = state
        .metrics()
        .context("Dashboard has not finished loading")?;
    let payload = DashboardJson {
        currency: state.selection,
        pair: state.selection.pair(),
        points: state.points(),
        metrics,
    };
    serde_json::to_string_pretty(&payload).context("Failed to serialize dashboard")
}

/// Renders the summary tiles and chart for a loaded snapshot.
pub fn render(state: &DashboardState, width: usize) -> Vec<String> {
    let mut lines = vec![format!(
        "{}\n",
        ui::style_text(
            &format!("{} Exchange Rate", state.selection.pair()),
            ui::StyleType::Title
        )
    )];

    let Some(metrics) = state.metrics() else {
        lines.push("Loading data...".to_string());
        return lines;
    };

    let current = metrics
        .current_rate
        .map_or("N/A".to_string(), |r| format!("{r:.4} {QUOTE_CURRENCY}"));
    lines.push(format!(
        "{}  {}  {}",
        ui::style_text("Current Rate", ui::StyleType::Label),
        ui::style_text(&current, ui::StyleType::Value),
        ui::style_text(
            &Local::now().date_naive().format("%d/%m/%Y").to_string(),
            ui::StyleType::Subtle
        )
    ));

    let change = format!(
        "{} {}%",
        ui::direction_marker(metrics.direction),
        metrics.percentage_change
    );
    let change_style = match metrics.direction {
        Direction::Positive => ui::StyleType::Increase,
        Direction::NonPositive => ui::StyleType::Decrease,
    };
    lines.push(format!(
        "{}   {}\n",
        ui::style_text("Change", ui::StyleType::Label),
        ui::style_text(&change, change_style)
    ));

    if state.points().is_empty() {
        lines.push(ui::style_text("No rates available", ui::StyleType::Subtle));
    } else {
        lines.extend(chart::render(state.points(), width, CHART_HEIGHT));
    }
    lines
}

fn display_points(points: &[DisplayPoint]) {
    if points.is_empty() {
        return;
    }
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Date"), ui::header_cell("Rate")]);
    for point in points {
        table.add_row(vec![
            Cell::new(&point.date),
            Cell::new(format!("{:.4}", point.rate)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
}
