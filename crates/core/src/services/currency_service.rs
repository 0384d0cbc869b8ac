use crate::models::currency::Currency;

/// Converts and formats monetary amounts between the supported currencies.
///
/// All conversions are routed through XOF as the base currency using a
/// fixed rate table: `amount → XOF → target`. Storing one rate per
/// currency instead of a full pairwise matrix means every conversion
/// carries two rate applications, each feeding the final 2-decimal
/// rounding.
pub struct CurrencyService;

/// Fixed exchange rates, expressed as units of XOF per one unit of the
/// currency. XOF itself (and its FCFA alias) is 1.
const EUR_TO_XOF: f64 = 655.957;
const USD_TO_XOF: f64 = 600.0;
const GBP_TO_XOF: f64 = 780.0;
const CAD_TO_XOF: f64 = 440.0;
const JPY_TO_XOF: f64 = 4.1;
const CHF_TO_XOF: f64 = 700.0;

fn rate_to_base(currency: Currency) -> f64 {
    match currency.canonical() {
        Currency::Xof => 1.0,
        Currency::Eur => EUR_TO_XOF,
        Currency::Usd => USD_TO_XOF,
        Currency::Gbp => GBP_TO_XOF,
        Currency::Cad => CAD_TO_XOF,
        Currency::Jpy => JPY_TO_XOF,
        Currency::Chf => CHF_TO_XOF,
        // canonical() never returns an alias
        Currency::Fcfa => 1.0,
    }
}

impl CurrencyService {
    pub fn new() -> Self {
        Self
    }

    /// Convert an amount between two supported currencies.
    ///
    /// Identical codes, and alias pairs like FCFA/XOF, are returned
    /// unchanged with no rounding, so no-op conversions never introduce
    /// drift. Everything else goes through the base currency and is
    /// rounded to 2 decimals, half away from zero. Total over the
    /// `Currency` enum; there is no error path.
    #[must_use]
    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> f64 {
        if from == to {
            return amount;
        }

        let from = from.canonical();
        let to = to.canonical();
        if from == to {
            return amount;
        }

        let amount_in_base = amount * rate_to_base(from);
        let result = amount_in_base / rate_to_base(to);

        (result * 100.0).round() / 100.0
    }

    /// Render an amount as a display string per currency convention:
    /// the zero-decimal base currency rounds to a whole number, every
    /// other currency gets exactly 2 fractional digits.
    #[must_use]
    pub fn format(&self, amount: f64, currency: Currency) -> String {
        if currency.is_zero_decimal() {
            format!("{:.0}", amount.round())
        } else {
            format!("{amount:.2}")
        }
    }
}

impl Default for CurrencyService {
    fn default() -> Self {
        Self::new()
    }
}
