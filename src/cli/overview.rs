use super::ui;
use crate::core::metrics::{self, DateStyle, DerivedMetrics};
use crate::core::{Currency, RateProvider, RateWindow};
use anyhow::Result;
use comfy_table::Cell;
use futures::future::join_all;
use tracing::error;

struct OverviewRow {
    currency: Currency,
    metrics: DerivedMetrics,
    points: usize,
}

/// Fetches every supported currency and shows one summary row per pair.
pub async fn run(provider: &dyn RateProvider, window: RateWindow) -> Result<()> {
    let rows = collect(provider, window).await;
    display(&rows, window);
    Ok(())
}

async fn collect(
    provider: &dyn RateProvider,
    window: RateWindow,
) -> Vec<OverviewRow> {
    let pb = ui::new_progress_bar(Currency::ALL.len() as u64);
    let futures = Currency::ALL.iter().map(|currency| {
        let pb = pb.clone();
        async move {
            let records = match provider.fetch_rates(*currency, window).await {
                Ok(records) => records,
                Err(e) => {
                    error!(error = %e, %currency, "Failed to fetch rates");
                    Vec::new()
                }
            };
            pb.inc(1);
            let points = metrics::project(&records, DateStyle::Iso);
            OverviewRow {
                currency: *currency,
                metrics: metrics::derive(&points),
                points: points.len(),
            }
        }
    });
    let rows = join_all(futures).await;
    pb.finish_and_clear();
    rows
}

fn display(rows: &[OverviewRow], window: RateWindow) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Pair"),
        ui::header_cell("Currency"),
        ui::header_cell("Current Rate"),
        ui::header_cell(&format!("Change ({window})")),
        ui::header_cell("Quotes"),
    ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.currency.pair()),
            Cell::new(row.currency.label()),
            ui::format_optional_cell(row.metrics.current_rate, |r| format!("{r:.4}")),
            ui::change_cell(&row.metrics),
            Cell::new(row.points),
        ]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RateRecord;
    use crate::core::metrics::Direction;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct FixedProvider;

    #[async_trait]
    impl RateProvider for FixedProvider {
        async fn fetch_rates(
            &self,
            currency: Currency,
            _window: RateWindow,
        ) -> Result<Vec<RateRecord>> {
            let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
            match currency {
                Currency::Usd => Ok(vec![
                    RateRecord {
                        effective_date: day(2),
                        mid: 4.0,
                    },
                    RateRecord {
                        effective_date: day(3),
                        mid: 4.4,
                    },
                ]),
                Currency::Eur => Ok(Vec::new()),
                Currency::Uah => Err(anyhow!("timed out")),
            }
        }

        async fn fetch_current_rate(&self, _currency: Currency) -> Result<Option<f64>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_collect_covers_all_currencies() {
        let rows = collect(&FixedProvider, RateWindow::Days(365)).await;

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].currency, Currency::Usd);
        assert_eq!(rows[0].metrics.percentage_change, "10.00");
        assert_eq!(rows[0].metrics.direction, Direction::Positive);
        assert_eq!(rows[0].points, 2);

        assert_eq!(rows[1].metrics.current_rate, None);
        // A failed fetch shows up as an empty row.
        assert_eq!(rows[2].currency, Currency::Uah);
        assert_eq!(rows[2].points, 0);
    }
}
