//! Aggregate umami metrics of a blend.
//!
//! Every line is converted to grams, its per-100g concentrations are scaled to
//! that mass and summed. The sums are normalised back to mg per 100 g of the
//! whole blend before weighting, so a blend reads on the same basis as a
//! single stored ingredient.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::Serialize;
use strum::{AsRefStr, Display, EnumString, VariantArray};
use umami_shared::{Error, MG_PER_G, RawChemistry, Result, UmamiLevel, Unit, euc_g};

const HUNDRED: Decimal = dec!(100);

/// Half-saturation of the amino-acid response, mg/100g.
const K_AA: Decimal = dec!(80);
const HILL_EXPONENT: Decimal = dec!(1.4);
const NUC_BOOST: Decimal = dec!(1.5);
/// Half-saturation of the nucleotide boost, mg/100g.
const K_NUC: Decimal = dec!(30);

/// Floor for the nucleotide side of the AA:Nuc ratio.
const RATIO_EPSILON: Decimal = dec!(0.001);
const OPTIMAL_RATIO_MIN: Decimal = dec!(0.6);
const OPTIMAL_RATIO_MAX: Decimal = dec!(1.6);

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
    Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SynergyZone {
    NeedsAa,
    Optimal,
    NeedsNuc,
}

impl SynergyZone {
    /// Zone of an AA:Nuc ratio, bounds of the optimal zone inclusive.
    pub fn classify(ratio: Decimal) -> Self {
        if ratio < OPTIMAL_RATIO_MIN {
            Self::NeedsAa
        } else if ratio <= OPTIMAL_RATIO_MAX {
            Self::Optimal
        } else {
            Self::NeedsNuc
        }
    }

    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::NeedsAa => "Add amino-rich ingredient (tomato, cheese, soy sauce).",
            Self::Optimal => "Optimal synergy ratio achieved.",
            Self::NeedsNuc => "Add nucleotide-rich ingredient (mushrooms, seafood, seaweed).",
        }
    }
}

/// An ingredient line with its chemistry resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Portion {
    pub id: i64,
    pub name: String,
    pub quantity: Decimal,
    pub unit: Unit,
    /// Concentrations in mg per 100 g of the ingredient.
    pub chemistry: RawChemistry,
}

/// What one line adds to the blend, in mg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub id: i64,
    pub name: String,
    pub quantity: Decimal,
    pub unit: Unit,
    pub quantity_grams: Decimal,
    pub contributions: RawChemistry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AaChart {
    pub glu: Decimal,
    pub asp: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NucChart {
    pub imp: Decimal,
    pub gmp: Decimal,
    pub amp: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub total_aa: Decimal,
    pub total_nuc: Decimal,
    pub total_synergy: Decimal,
}

/// Blend concentrations in mg/100g, per compound and weighted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub umami_aa: AaChart,
    pub umami_nuc: NucChart,
    pub breakdown: Breakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Concentrations {
    pub aa_mg_per_100g: Decimal,
    pub nuc_mg_per_100g: Decimal,
    pub aa_g_per_100g: Decimal,
    pub nuc_g_per_100g: Decimal,
    pub synergy_mg_per_100g: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Composition {
    pub total_weight: Decimal,
    /// Weighted amino acids of the blend, mg/100g.
    pub total_aa: Decimal,
    /// Weighted nucleotides of the blend, mg/100g.
    pub total_nuc: Decimal,
    /// EUC of the blend, mg/100g.
    pub total_synergy: Decimal,
    pub total_glu: Decimal,
    pub total_asp: Decimal,
    pub total_imp: Decimal,
    pub total_gmp: Decimal,
    pub total_amp: Decimal,
    pub ingredients: Vec<Contribution>,
    pub chart_data: ChartData,
    pub concentrations: Concentrations,
    pub pui: Decimal,
    pub aa_nuc_ratio: Decimal,
    pub synergy_zone: SynergyZone,
    pub synergy_suggestion: &'static str,
    pub synergy_level: UmamiLevel,
    pub synergy_level_label: &'static str,
    pub synergy_level_suggestion: &'static str,
}

/// Perceived Umami Index on a 0-100 scale from weighted mg/100g values.
pub fn perceived_umami_index(aa_mg: Decimal, nuc_mg: Decimal) -> Decimal {
    let p_aa = if aa_mg > Decimal::ZERO {
        // An overflowing power means the response is effectively zero.
        K_AA.checked_div(aa_mg)
            .and_then(|ratio| ratio.checked_powd(HILL_EXPONENT))
            .and_then(|power| Decimal::ONE.checked_add(power))
            .and_then(|denominator| Decimal::ONE.checked_div(denominator))
            .unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    let b_nuc = if nuc_mg > Decimal::ZERO {
        // Saturates at the full boost for nucleotide values near the range limit.
        let share = nuc_mg
            .checked_add(K_NUC)
            .and_then(|denominator| nuc_mg.checked_div(denominator))
            .unwrap_or(Decimal::ONE);
        Decimal::ONE + NUC_BOOST * share
    } else {
        Decimal::ONE
    };

    (p_aa * b_nuc).min(Decimal::ONE).max(Decimal::ZERO) * HUNDRED
}

fn too_large(field: impl Into<String>) -> Error {
    Error::invalid(field, "value is too large to compute the blend")
}

/// Aggregates the portions into one blend.
///
/// Fails with `InvalidInput` on `quantity` when the blend weighs nothing, and
/// on the offending line when a mass or concentration leaves the decimal range.
pub fn compose(portions: &[Portion]) -> Result<Composition> {
    let mut totals = RawChemistry::default();
    let mut total_weight = Decimal::ZERO;
    let mut ingredients = Vec::with_capacity(portions.len());

    for (index, portion) in portions.iter().enumerate() {
        let line = || too_large(format!("lines[{index}].quantity"));

        let grams = portion.unit.to_grams(portion.quantity).ok_or_else(line)?;
        let contributions = portion
            .chemistry
            .checked_scale(grams / HUNDRED)
            .ok_or_else(line)?;

        total_weight = total_weight.checked_add(grams).ok_or_else(line)?;
        totals = totals.checked_add(&contributions).ok_or_else(line)?;

        ingredients.push(Contribution {
            id: portion.id,
            name: portion.name.clone(),
            quantity: portion.quantity,
            unit: portion.unit,
            quantity_grams: grams,
            contributions,
        });
    }

    if total_weight <= Decimal::ZERO {
        return Err(Error::invalid(
            "quantity",
            "total weight must be greater than zero",
        ));
    }

    let blend = totals
        .try_map(|total_mg| total_mg.checked_div(total_weight)?.checked_mul(HUNDRED))
        .ok_or_else(|| too_large("quantity"))?;

    let aa_mg = blend.weighted_aa().ok_or_else(|| too_large("quantity"))?;
    let nuc_mg = blend.weighted_nuc().ok_or_else(|| too_large("quantity"))?;
    let aa_g = aa_mg / MG_PER_G;
    let nuc_g = nuc_mg / MG_PER_G;
    let euc_mg = euc_g(aa_g, nuc_g)
        .and_then(|euc| euc.checked_mul(MG_PER_G))
        .ok_or_else(|| too_large("quantity"))?;

    // Unbounded above; saturates at the largest representable ratio.
    let aa_nuc_ratio = aa_mg
        .checked_div(nuc_mg.max(RATIO_EPSILON))
        .unwrap_or(Decimal::MAX);
    let synergy_zone = SynergyZone::classify(aa_nuc_ratio);
    let synergy_level = UmamiLevel::classify(euc_mg);

    Ok(Composition {
        total_weight,
        total_aa: aa_mg,
        total_nuc: nuc_mg,
        total_synergy: euc_mg,
        total_glu: totals.glu,
        total_asp: totals.asp,
        total_imp: totals.imp,
        total_gmp: totals.gmp,
        total_amp: totals.amp,
        ingredients,
        chart_data: ChartData {
            umami_aa: AaChart {
                glu: blend.glu,
                asp: blend.asp,
            },
            umami_nuc: NucChart {
                imp: blend.imp,
                gmp: blend.gmp,
                amp: blend.amp,
            },
            breakdown: Breakdown {
                total_aa: aa_mg,
                total_nuc: nuc_mg,
                total_synergy: euc_mg,
            },
        },
        concentrations: Concentrations {
            aa_mg_per_100g: aa_mg,
            nuc_mg_per_100g: nuc_mg,
            aa_g_per_100g: aa_g,
            nuc_g_per_100g: nuc_g,
            synergy_mg_per_100g: euc_mg,
        },
        pui: perceived_umami_index(aa_mg, nuc_mg),
        aa_nuc_ratio,
        synergy_zone,
        synergy_suggestion: synergy_zone.suggestion(),
        synergy_level,
        synergy_level_label: synergy_level.label(),
        synergy_level_suggestion: synergy_level.suggestion(),
    })
}
