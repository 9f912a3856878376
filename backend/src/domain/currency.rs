//! Currency reference data, conversion, and display formatting.
//!
//! The platform settles in US dollars; every other currency is described by a
//! static reference entry carrying its exchange rate relative to the base.
//! Conversion is pure: source amount to base units, base units to the
//! destination, rounded to two decimal places. Unknown codes fall back to a
//! rate of 1.0 (treated as the base currency) and are logged; see DESIGN.md
//! for the rationale of keeping the permissive fallback.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use super::money::Money;

/// ISO-4217 style currency code: three ASCII uppercase letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "USD")]
pub struct CurrencyCode(String);

/// Validation errors returned when parsing a [`CurrencyCode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrencyValidationError {
    /// Code is not exactly three characters.
    WrongLength,
    /// Code contains characters outside `A-Z`.
    InvalidCharacters,
}

impl fmt::Display for CurrencyValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength => write!(f, "currency code must be exactly three letters"),
            Self::InvalidCharacters => {
                write!(f, "currency code must contain only uppercase letters")
            }
        }
    }
}

impl std::error::Error for CurrencyValidationError {}

impl CurrencyCode {
    /// Validate and construct a currency code.
    pub fn new(code: impl AsRef<str>) -> Result<Self, CurrencyValidationError> {
        Self::from_owned(code.as_ref().to_owned())
    }

    /// The platform base (settlement) currency.
    #[must_use]
    pub fn base() -> Self {
        Self(BASE_CURRENCY.to_owned())
    }

    fn from_owned(code: String) -> Result<Self, CurrencyValidationError> {
        if code.chars().count() != 3 {
            return Err(CurrencyValidationError::WrongLength);
        }
        if !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(CurrencyValidationError::InvalidCharacters);
        }
        Ok(Self(code))
    }

    /// Borrow the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CurrencyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// How a currency renders fractional amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalStyle {
    /// Two decimal places, e.g. dollars and cents.
    TwoDecimal,
    /// No decimal places; amounts render as grouped integers.
    ZeroDecimal,
}

/// Static reference entry for one supported currency.
#[derive(Debug, Clone, Copy)]
pub struct Currency {
    /// Three-letter code.
    pub code: &'static str,
    /// Display symbol prefixed to formatted amounts.
    pub symbol: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Fractional rendering style.
    pub style: DecimalStyle,
    /// Exchange rate relative to the base currency.
    pub rate: f64,
}

/// Code of the base currency all rates are expressed against.
pub const BASE_CURRENCY: &str = "USD";

/// Supported currencies with their exchange rates relative to the base.
pub const CURRENCIES: [Currency; 20] = [
    Currency {
        code: "USD",
        symbol: "$",
        name: "US Dollar",
        style: DecimalStyle::TwoDecimal,
        rate: 1.0,
    },
    Currency {
        code: "INR",
        symbol: "₹",
        name: "Indian Rupee",
        style: DecimalStyle::TwoDecimal,
        rate: 83.12,
    },
    Currency {
        code: "EUR",
        symbol: "€",
        name: "Euro",
        style: DecimalStyle::TwoDecimal,
        rate: 0.92,
    },
    Currency {
        code: "GBP",
        symbol: "£",
        name: "British Pound",
        style: DecimalStyle::TwoDecimal,
        rate: 0.79,
    },
    Currency {
        code: "CAD",
        symbol: "C$",
        name: "Canadian Dollar",
        style: DecimalStyle::TwoDecimal,
        rate: 1.36,
    },
    Currency {
        code: "AUD",
        symbol: "A$",
        name: "Australian Dollar",
        style: DecimalStyle::TwoDecimal,
        rate: 1.53,
    },
    Currency {
        code: "JPY",
        symbol: "¥",
        name: "Japanese Yen",
        style: DecimalStyle::ZeroDecimal,
        rate: 149.50,
    },
    Currency {
        code: "CNY",
        symbol: "¥",
        name: "Chinese Yuan",
        style: DecimalStyle::TwoDecimal,
        rate: 7.24,
    },
    Currency {
        code: "CHF",
        symbol: "Fr",
        name: "Swiss Franc",
        style: DecimalStyle::TwoDecimal,
        rate: 0.88,
    },
    Currency {
        code: "SEK",
        symbol: "kr",
        name: "Swedish Krona",
        style: DecimalStyle::TwoDecimal,
        rate: 10.87,
    },
    Currency {
        code: "NZD",
        symbol: "NZ$",
        name: "New Zealand Dollar",
        style: DecimalStyle::TwoDecimal,
        rate: 1.67,
    },
    Currency {
        code: "SGD",
        symbol: "S$",
        name: "Singapore Dollar",
        style: DecimalStyle::TwoDecimal,
        rate: 1.34,
    },
    Currency {
        code: "HKD",
        symbol: "HK$",
        name: "Hong Kong Dollar",
        style: DecimalStyle::TwoDecimal,
        rate: 7.83,
    },
    Currency {
        code: "AED",
        symbol: "د.إ",
        name: "UAE Dirham",
        style: DecimalStyle::TwoDecimal,
        rate: 3.67,
    },
    Currency {
        code: "SAR",
        symbol: "ر.س",
        name: "Saudi Riyal",
        style: DecimalStyle::TwoDecimal,
        rate: 3.75,
    },
    Currency {
        code: "MXN",
        symbol: "$",
        name: "Mexican Peso",
        style: DecimalStyle::TwoDecimal,
        rate: 17.08,
    },
    Currency {
        code: "BRL",
        symbol: "R$",
        name: "Brazilian Real",
        style: DecimalStyle::TwoDecimal,
        rate: 4.98,
    },
    Currency {
        code: "ZAR",
        symbol: "R",
        name: "South African Rand",
        style: DecimalStyle::TwoDecimal,
        rate: 18.65,
    },
    Currency {
        code: "KRW",
        symbol: "₩",
        name: "South Korean Won",
        style: DecimalStyle::ZeroDecimal,
        rate: 1337.50,
    },
    Currency {
        code: "THB",
        symbol: "฿",
        name: "Thai Baht",
        style: DecimalStyle::TwoDecimal,
        rate: 35.80,
    },
];

/// Look up a currency reference entry by code.
#[must_use]
pub fn find_currency(code: &str) -> Option<&'static Currency> {
    CURRENCIES.iter().find(|currency| currency.code == code)
}

/// Default display currency for a two-letter country code.
///
/// Unknown countries map to the base currency.
#[must_use]
pub fn currency_for_country(country: &str) -> CurrencyCode {
    let code = match country {
        "US" => "USD",
        "IN" => "INR",
        "GB" => "GBP",
        "DE" | "FR" | "IT" | "ES" | "NL" | "BE" | "AT" | "PT" | "IE" | "GR" => "EUR",
        "CA" => "CAD",
        "AU" => "AUD",
        "JP" => "JPY",
        "CN" => "CNY",
        "CH" => "CHF",
        "SE" => "SEK",
        "NZ" => "NZD",
        "SG" => "SGD",
        "HK" => "HKD",
        "AE" => "AED",
        "SA" => "SAR",
        "MX" => "MXN",
        "BR" => "BRL",
        "ZA" => "ZAR",
        "KR" => "KRW",
        "TH" => "THB",
        _ => BASE_CURRENCY,
    };
    CurrencyCode(code.to_owned())
}

/// Stateless conversion and formatting over the static reference table.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrencyConverter;

impl CurrencyConverter {
    /// Create a converter over the built-in reference table.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn rate(code: &CurrencyCode) -> f64 {
        find_currency(code.as_str()).map_or_else(
            || {
                warn!(code = %code, "unknown currency code, treating as base currency");
                1.0
            },
            |currency| currency.rate,
        )
    }

    /// Convert an amount between two currencies, rounded to two decimals.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{CurrencyCode, CurrencyConverter, Money};
    ///
    /// let converter = CurrencyConverter::new();
    /// let usd = CurrencyCode::new("USD").expect("valid code");
    /// let eur = CurrencyCode::new("EUR").expect("valid code");
    /// let converted = converter.convert(Money::from_major(100), &usd, &eur);
    /// assert_eq!(converted.minor_units(), 9_200);
    /// ```
    #[must_use]
    pub fn convert(&self, amount: Money, from: &CurrencyCode, to: &CurrencyCode) -> Money {
        if from == to {
            return amount;
        }
        let base_amount = amount.to_major_f64() / Self::rate(from);
        Money::from_major_f64(base_amount * Self::rate(to))
    }

    /// Amount in integer minor units of the destination currency, as
    /// transmitted across the payment-gateway boundary.
    #[must_use]
    pub fn to_gateway_minor_units(
        &self,
        amount: Money,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> i64 {
        self.convert(amount, from, to).minor_units()
    }

    /// Render an amount in the given currency.
    ///
    /// Zero-decimal currencies round to a grouped whole number; everything
    /// else renders with exactly two decimals.
    #[must_use]
    pub fn format(&self, amount: Money, code: &CurrencyCode) -> String {
        match find_currency(code.as_str()) {
            Some(currency) if currency.style == DecimalStyle::ZeroDecimal => {
                let whole = amount.to_major_f64().round() as i64;
                format!("{}{}", currency.symbol, group_thousands(whole))
            }
            Some(currency) => format!("{}{}", currency.symbol, amount),
            None => format!("${amount}"),
        }
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for conversion rounding and formatting.

    use rstest::rstest;

    use super::*;

    fn code(raw: &str) -> CurrencyCode {
        CurrencyCode::new(raw).expect("valid currency code")
    }

    #[rstest]
    #[case("USD", "INR")]
    #[case("EUR", "GBP")]
    #[case("JPY", "KRW")]
    #[case("INR", "THB")]
    fn conversion_round_trips_within_tolerance(#[case] from: &str, #[case] to: &str) {
        let converter = CurrencyConverter::new();
        let original = Money::from_major(250);
        let there = converter.convert(original, &code(from), &code(to));
        let back = converter.convert(there, &code(to), &code(from));
        let drift = (back.minor_units() - original.minor_units()).abs();
        assert!(drift <= 1, "round trip {from}->{to} drifted by {drift} minor units");
    }

    #[test]
    fn identical_codes_short_circuit() {
        let converter = CurrencyConverter::new();
        let amount = Money::from_minor(123_456);
        assert_eq!(converter.convert(amount, &code("USD"), &code("USD")), amount);
    }

    #[test]
    fn unknown_codes_fall_back_to_base_rate() {
        let converter = CurrencyConverter::new();
        let amount = Money::from_major(10);
        assert_eq!(converter.convert(amount, &code("XXX"), &code("USD")), amount);
    }

    #[rstest]
    #[case(Money::from_major_f64(1234.5), "USD", "$1234.50")]
    #[case(Money::from_major_f64(1234.5), "JPY", "¥1,235")]
    #[case(Money::from_major(1_500_000), "KRW", "₩1,500,000")]
    #[case(Money::from_major_f64(42.4), "EUR", "€42.40")]
    fn formats_by_decimal_style(
        #[case] amount: Money,
        #[case] currency: &str,
        #[case] expected: &str,
    ) {
        let converter = CurrencyConverter::new();
        assert_eq!(converter.format(amount, &code(currency)), expected);
    }

    #[rstest]
    #[case("usd")]
    #[case("US")]
    #[case("DOLL")]
    fn rejects_malformed_codes(#[case] raw: &str) {
        assert!(CurrencyCode::new(raw).is_err());
    }

    #[test]
    fn country_map_defaults_to_base() {
        assert_eq!(currency_for_country("FR").as_str(), "EUR");
        assert_eq!(currency_for_country("ZZ").as_str(), BASE_CURRENCY);
    }
}
