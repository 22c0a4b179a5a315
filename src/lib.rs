pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{Currency, RateProvider, RateWindow};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub use cli::show::ShowOptions;

/// Lookback requested on the command line; falls back to the config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WindowArg {
    #[default]
    Configured,
    Days(u32),
    Last(u32),
}

impl WindowArg {
    fn resolve(self, config: &AppConfig) -> Result<RateWindow> {
        match self {
            WindowArg::Configured => RateWindow::days(config.lookback_days),
            WindowArg::Days(n) => RateWindow::days(n),
            WindowArg::Last(n) => RateWindow::last(n),
        }
    }
}

pub enum AppCommand {
    Show {
        currency: Option<Currency>,
        window: WindowArg,
        options: ShowOptions,
    },
    Overview {
        window: WindowArg,
    },
    Current {
        currency: Option<Currency>,
    },
    Currencies,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("ratewatch starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider: Arc<dyn RateProvider> = Arc::new(providers::nbp::NbpProvider::new(
        &config.providers.nbp.base_url,
    ));

    match command {
        AppCommand::Show {
            currency,
            window,
            options,
        } => {
            cli::show::run(
                provider,
                currency.unwrap_or(config.currency),
                window.resolve(&config)?,
                config.date_style,
                options,
            )
            .await
        }
        AppCommand::Overview { window } => {
            cli::overview::run(provider.as_ref(), window.resolve(&config)?).await
        }
        AppCommand::Current { currency } => {
            let currencies = match currency {
                Some(c) => vec![c],
                None => Currency::ALL.to_vec(),
            };
            cli::current::run(provider.as_ref(), &currencies).await
        }
        AppCommand::Currencies => {
            cli::currencies::run();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_arg_resolution() {
        let config = AppConfig {
            lookback_days: 90,
            ..AppConfig::default()
        };
        assert_eq!(
            WindowArg::Configured.resolve(&config).unwrap(),
            RateWindow::Days(90)
        );
        assert_eq!(
            WindowArg::Last(365).resolve(&config).unwrap(),
            RateWindow::Last(365)
        );
        assert!(WindowArg::Days(0).resolve(&config).is_err());

        let zero = AppConfig {
            lookback_days: 0,
            ..AppConfig::default()
        };
        assert!(WindowArg::Configured.resolve(&zero).is_err());
    }
}
