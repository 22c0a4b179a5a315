use super::ui;
use crate::core::currency::QUOTE_CURRENCY;
use crate::core::{Currency, RateProvider};
use anyhow::Result;
use tracing::error;

/// Prints the most recently published rate for each requested currency.
pub async fn run(provider: &dyn RateProvider, currencies: &[Currency]) -> Result<()> {
    for currency in currencies {
        let rate = collect(provider, *currency).await;
        println!("{}", format_line(*currency, rate));
    }
    Ok(())
}

/// Latest rate for `currency`; a failed fetch is logged and shown as missing.
async fn collect(provider: &dyn RateProvider, currency: Currency) -> Option<f64> {
    match provider.fetch_current_rate(currency).await {
        Ok(rate) => rate,
        Err(e) => {
            error!(error = %e, %currency, "Failed to fetch current rate");
            None
        }
    }
}

fn format_line(currency: Currency, rate: Option<f64>) -> String {
    let value = match rate {
        Some(rate) => ui::style_text(&format!("{rate:.4} {QUOTE_CURRENCY}"), ui::StyleType::Value),
        None => ui::style_text("N/A", ui::StyleType::Subtle),
    };
    format!(
        "{}  {}",
        ui::style_text(&currency.pair(), ui::StyleType::Label),
        value
    )
}
