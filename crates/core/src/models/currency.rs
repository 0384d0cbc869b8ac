use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Supported display currencies, a fixed closed set.
///
/// `Fcfa` and `Xof` are two codes for the same real-world currency (the
/// West African CFA franc); `Xof` is the canonical one and also the base
/// currency all conversions are routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Fcfa,
    Eur,
    Usd,
    Xof,
    Gbp,
    Cad,
    Jpy,
    Chf,
}

impl Currency {
    /// Every supported code, aliases included.
    pub const ALL: [Currency; 8] = [
        Currency::Fcfa,
        Currency::Eur,
        Currency::Usd,
        Currency::Xof,
        Currency::Gbp,
        Currency::Cad,
        Currency::Jpy,
        Currency::Chf,
    ];

    /// Collapse aliases onto their canonical code (FCFA → XOF).
    #[must_use]
    pub fn canonical(self) -> Currency {
        match self {
            Currency::Fcfa => Currency::Xof,
            other => other,
        }
    }

    /// The base currency is displayed without fractional digits.
    #[must_use]
    pub fn is_zero_decimal(self) -> bool {
        self.canonical() == Currency::Xof
    }

    /// ISO-style code string ("XOF", "EUR", ...).
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Currency::Fcfa => "FCFA",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Xof => "XOF",
            Currency::Gbp => "GBP",
            Currency::Cad => "CAD",
            Currency::Jpy => "JPY",
            Currency::Chf => "CHF",
        }
    }

    /// Display symbol shown next to formatted amounts.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Fcfa | Currency::Xof => "FCFA",
            Currency::Eur => "€",
            Currency::Usd => "$",
            Currency::Gbp => "£",
            Currency::Cad => "C$",
            Currency::Jpy => "¥",
            Currency::Chf => "CHF",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FCFA" => Ok(Currency::Fcfa),
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            "XOF" => Ok(Currency::Xof),
            "GBP" => Ok(Currency::Gbp),
            "CAD" => Ok(Currency::Cad),
            "JPY" => Ok(Currency::Jpy),
            "CHF" => Ok(Currency::Chf),
            other => Err(CoreError::ValidationError(format!(
                "Unsupported currency code '{other}'"
            ))),
        }
    }
}
