//! Rate series abstractions and core types

use super::currency::Currency;
use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// One day's quoted mid rate as published by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    #[serde(rename = "effectiveDate")]
    pub effective_date: NaiveDate,
    pub mid: f64,
}

/// Historical span to request rates for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateWindow {
    /// Calendar days back from today, sent as an explicit date range.
    Days(u32),
    /// The provider's own "last N quotations" shorthand.
    Last(u32),
}

impl RateWindow {
    pub fn days(n: u32) -> Result<Self> {
        if n == 0 {
            bail!("Lookback window must be a positive number of days");
        }
        Ok(RateWindow::Days(n))
    }

    pub fn last(n: u32) -> Result<Self> {
        if n == 0 {
            bail!("Number of quotations must be positive");
        }
        Ok(RateWindow::Last(n))
    }

    pub fn count(&self) -> u32 {
        match self {
            RateWindow::Days(n) | RateWindow::Last(n) => *n,
        }
    }

    /// Start and end dates of an explicit range ending at `today`.
    ///
    /// Returns `None` for the shorthand form, which carries no dates.
    pub fn date_range(&self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            RateWindow::Days(n) => {
                let start = today
                    .checked_sub_days(Days::new(u64::from(*n)))
                    .unwrap_or(NaiveDate::MIN);
                Some((start, today))
            }
            RateWindow::Last(_) => None,
        }
    }
}

impl Display for RateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateWindow::Days(n) => write!(f, "{n}d"),
            RateWindow::Last(n) => write!(f, "last {n}"),
        }
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the dated rate series for `currency` over `window`.
    ///
    /// A non-success response yields an empty series; transport and
    /// decoding failures are returned as errors.
    async fn fetch_rates(&self, currency: Currency, window: RateWindow)
    -> Result<Vec<RateRecord>>;

    /// Fetches the most recently published rate, if any.
    async fn fetch_current_rate(&self, currency: Currency) -> Result<Option<f64>>;
}
