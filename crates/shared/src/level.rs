use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use strum::{AsRefStr, Display, EnumString, VariantArray};

/// Perceptual band of an umami concentration in mg/100g.
#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UmamiLevel {
    /// Below 10 mg/100g.
    SubThreshold,
    Biological,
    CulinaryOptimal,
    Strong,
    Overlimit,
    /// Receptor saturation, 2600 mg/100g and above.
    TheoreticalMax,
}

impl UmamiLevel {
    pub fn classify(mg_per_100g: Decimal) -> Self {
        if mg_per_100g < dec!(10) {
            Self::SubThreshold
        } else if mg_per_100g < dec!(80) {
            Self::Biological
        } else if mg_per_100g < dec!(300) {
            Self::CulinaryOptimal
        } else if mg_per_100g < dec!(500) {
            Self::Strong
        } else if mg_per_100g < dec!(2600) {
            Self::Overlimit
        } else {
            Self::TheoreticalMax
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SubThreshold => "Sub-threshold",
            Self::Biological => "Biological Range",
            Self::CulinaryOptimal => "Culinary Optimal",
            Self::Strong => "Strong Umami",
            Self::Overlimit => "Overlimit Zone",
            Self::TheoreticalMax => "Theoretical Maximum",
        }
    }

    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::SubThreshold => {
                "Umami is barely perceptible. Consider adding umami-rich ingredients such as mushrooms, tomatoes, or seaweed."
            }
            Self::Biological => {
                "Natural umami perception. Add mild umami boosters for better balance."
            }
            Self::CulinaryOptimal => {
                "Ideal balanced flavor zone. Maintain the current balance for best results."
            }
            Self::Strong => {
                "Very rich flavor near the practical upper culinary limit. Consider slightly reducing umami-heavy ingredients."
            }
            Self::Overlimit => {
                "Exceeding normal culinary range. Reduce umami-rich ingredients significantly to restore balance."
            }
            Self::TheoreticalMax => {
                "Deep umami saturation. Use dilution or add contrasting flavors for better harmony and complexity."
            }
        }
    }
}
