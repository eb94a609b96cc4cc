//! Product prices in Brazilian reais.
//!
//! Prices are kept as integer centavos. On the wire they are plain decimal
//! numbers (`49.9`), the same shape the storefront forms submit.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A price in centavos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

impl Price {
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Convert a decimal amount, rounding to the nearest centavo.
    ///
    /// Returns `None` for non-finite amounts and for anything that does not
    /// round to at least one centavo.
    ///
    /// ```
    /// use geek_catalog::Price;
    /// assert_eq!(Price::from_decimal(49.99).map(|p| p.cents()), Some(4999));
    /// assert_eq!(Price::from_decimal(0.001), None);
    /// ```
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        let cents = (amount * 100.0).round();
        if cents < 1.0 || cents > i64::MAX as f64 {
            return None;
        }
        Some(Self(cents as i64))
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Storefront rendering: `R$ 1234,50`.
    pub fn display(&self) -> String {
        format!("R$ {},{:02}", self.0 / 100, self.0 % 100)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Price::from_decimal(amount)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid price {amount}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(49.99, 4999)]
    #[case(0.01, 1)]
    #[case(1234.5, 123450)]
    #[case(19.999, 2000)]
    fn test_from_decimal(#[case] amount: f64, #[case] cents: i64) {
        assert_eq!(Price::from_decimal(amount).unwrap().cents(), cents);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(0.004)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_from_decimal_rejects(#[case] amount: f64) {
        assert!(Price::from_decimal(amount).is_none());
    }

    #[rstest]
    #[case(4999, "R$ 49,99")]
    #[case(5, "R$ 0,05")]
    #[case(123450, "R$ 1234,50")]
    fn test_display(#[case] cents: i64, #[case] expected: &str) {
        assert_eq!(Price::from_cents(cents).display(), expected);
    }

    #[test]
    fn test_serde_as_decimal() {
        let price = Price::from_cents(35990);
        assert_eq!(serde_json::to_string(&price).unwrap(), "359.9");
        let parsed: Price = serde_json::from_str("359.9").unwrap();
        assert_eq!(parsed, price);
        assert!(serde_json::from_str::<Price>("-1").is_err());
    }
}
