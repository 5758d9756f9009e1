use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use strum::{AsRefStr, Display, EnumString, VariantArray};

/// Quantity units accepted by a composition line.
///
/// Volume units assume water-equivalent density. This is an approximation
/// shared by every client of the calculator and is kept as-is.
#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    G,
    Oz,
    Tsp,
    Tbsp,
    Cup,
}

impl Unit {
    pub fn grams_per_unit(&self) -> Decimal {
        match self {
            Unit::G => dec!(1.0),
            Unit::Oz => dec!(28.35),
            Unit::Tsp => dec!(5.0),
            Unit::Tbsp => dec!(15.0),
            Unit::Cup => dec!(240.0),
        }
    }

    /// `None` when the converted mass does not fit a `Decimal`.
    pub fn to_grams(&self, quantity: Decimal) -> Option<Decimal> {
        quantity.checked_mul(self.grams_per_unit())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(Unit::from_str("g").unwrap(), Unit::G);
        assert_eq!(Unit::from_str("TBSP").unwrap(), Unit::Tbsp);
        assert_eq!(Unit::from_str("Cup").unwrap(), Unit::Cup);
        assert!(Unit::from_str("ml").is_err());
        assert!(Unit::from_str("").is_err());
    }

    #[test]
    fn converts_with_fixed_table() {
        assert_eq!(Unit::G.to_grams(dec!(100)), Some(dec!(100)));
        assert_eq!(Unit::Oz.to_grams(dec!(2)), Some(dec!(56.70)));
        assert_eq!(Unit::Tsp.to_grams(dec!(1)), Some(dec!(5)));
        assert_eq!(Unit::Tbsp.to_grams(dec!(1)), Some(dec!(15)));
        assert_eq!(Unit::Cup.to_grams(dec!(1)), Some(dec!(240)));
        assert_eq!(Unit::Cup.to_grams(Decimal::MAX), None);
    }

    #[test]
    fn displays_lowercase() {
        assert_eq!(Unit::Tbsp.to_string(), "tbsp");
        assert_eq!(Unit::VARIANTS.len(), 5);
    }
}
