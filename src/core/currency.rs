//! Supported currencies quoted against the złoty

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Currency every rate is quoted in.
pub const QUOTE_CURRENCY: &str = "PLN";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Uah,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Eur, Currency::Uah];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Uah => "UAH",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Currency::Usd => "US Dollar",
            Currency::Eur => "Euro",
            Currency::Uah => "Ukrainian Hryvnia",
        }
    }

    /// Pair name as shown in titles, e.g. `EUR/PLN`.
    pub fn pair(&self) -> String {
        format!("{}/{}", self.code(), QUOTE_CURRENCY)
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "UAH" => Ok(Currency::Uah),
            _ => Err(anyhow::anyhow!("Unsupported currency: {}", s)),
        }
    }
}

impl TryFrom<String> for Currency {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> String {
        currency.code().to_string()
    }
}
