//! Umami chemistry of a single ingredient.
//!
//! Raw concentrations are milligrams per 100 g of ingredient. The three cached
//! values (`umami_aa`, `umami_nuc`, `umami_synergy`) are always derived from the
//! raw ones with the same weighting used by the composition calculator, so a
//! 100 g single-ingredient composition reports exactly the stored triple.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Relative umami potency of glutamate.
pub const GLU_WEIGHT: Decimal = dec!(1.0);
/// Relative umami potency of aspartate.
pub const ASP_WEIGHT: Decimal = dec!(0.077);
/// Relative umami potency of inosinate.
pub const IMP_WEIGHT: Decimal = dec!(1.0);
/// Relative umami potency of guanylate.
pub const GMP_WEIGHT: Decimal = dec!(2.3);
/// Relative umami potency of adenylate.
pub const AMP_WEIGHT: Decimal = dec!(0.18);
/// Synergy constant of the EUC equation, grams basis.
pub const SYNERGY_CONSTANT: Decimal = dec!(1218);
pub const MG_PER_G: Decimal = dec!(1000);

/// Equivalent Umami Concentration on the grams basis.
///
/// `aa_g` and `nuc_g` are weighted amino-acid and nucleotide masses in grams per
/// 100 g. Without both sides present there is no synergy term.
/// `None` when the result does not fit a `Decimal`.
pub fn euc_g(aa_g: Decimal, nuc_g: Decimal) -> Option<Decimal> {
    if aa_g > Decimal::ZERO && nuc_g > Decimal::ZERO {
        SYNERGY_CONSTANT
            .checked_mul(aa_g)?
            .checked_mul(nuc_g)?
            .checked_add(aa_g)
    } else {
        Some(aa_g.max(Decimal::ZERO))
    }
}

/// Sum of `value * weight` pairs, `None` on overflow.
fn weighted_sum(terms: &[(Decimal, Decimal)]) -> Option<Decimal> {
    terms.iter().try_fold(Decimal::ZERO, |sum, (value, weight)| {
        sum.checked_add(value.checked_mul(*weight)?)
    })
}

/// The five measured concentrations, mg per 100 g.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawChemistry {
    #[serde(default)]
    pub glu: Decimal,
    #[serde(default)]
    pub asp: Decimal,
    #[serde(default)]
    pub imp: Decimal,
    #[serde(default)]
    pub gmp: Decimal,
    #[serde(default)]
    pub amp: Decimal,
}

impl RawChemistry {
    pub fn new(glu: Decimal, asp: Decimal, imp: Decimal, gmp: Decimal, amp: Decimal) -> Self {
        Self {
            glu,
            asp,
            imp,
            gmp,
            amp,
        }
    }

    pub fn fields(&self) -> [(&'static str, Decimal); 5] {
        [
            ("glu", self.glu),
            ("asp", self.asp),
            ("imp", self.imp),
            ("gmp", self.gmp),
            ("amp", self.amp),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in self.fields() {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(Error::invalid(
                    field,
                    format!("concentration must not be negative, got {value}"),
                ));
            }
        }

        Ok(())
    }

    /// Weighted amino-acid concentration in the unit of the raw values.
    pub fn weighted_aa(&self) -> Option<Decimal> {
        weighted_sum(&[(self.glu, GLU_WEIGHT), (self.asp, ASP_WEIGHT)])
    }

    /// Weighted nucleotide concentration in the unit of the raw values.
    pub fn weighted_nuc(&self) -> Option<Decimal> {
        weighted_sum(&[
            (self.imp, IMP_WEIGHT),
            (self.gmp, GMP_WEIGHT),
            (self.amp, AMP_WEIGHT),
        ])
    }

    /// Applies `op` to every compound, `None` as soon as one overflows.
    pub fn try_map(&self, op: impl Fn(Decimal) -> Option<Decimal>) -> Option<Self> {
        Some(Self {
            glu: op(self.glu)?,
            asp: op(self.asp)?,
            imp: op(self.imp)?,
            gmp: op(self.gmp)?,
            amp: op(self.amp)?,
        })
    }

    pub fn checked_scale(&self, factor: Decimal) -> Option<Self> {
        self.try_map(|value| value.checked_mul(factor))
    }

    pub fn checked_add(&self, rhs: &Self) -> Option<Self> {
        Some(Self {
            glu: self.glu.checked_add(rhs.glu)?,
            asp: self.asp.checked_add(rhs.asp)?,
            imp: self.imp.checked_add(rhs.imp)?,
            gmp: self.gmp.checked_add(rhs.gmp)?,
            amp: self.amp.checked_add(rhs.amp)?,
        })
    }
}

/// Raw concentrations plus their cached derived values.
///
/// Fields are private: the derived values can only come from [`Chemistry::from_raw`]
/// or be loaded as-is from storage with [`Chemistry::from_stored`], where
/// [`Chemistry::is_consistent`] tells whether they still match the formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Chemistry {
    #[serde(flatten)]
    raw: RawChemistry,
    umami_aa: Decimal,
    umami_nuc: Decimal,
    umami_synergy: Decimal,
}

impl Default for Chemistry {
    fn default() -> Self {
        Self::zero()
    }
}

impl Chemistry {
    pub fn from_raw(raw: RawChemistry) -> Result<Self> {
        raw.validate()?;

        Self::derive(raw).ok_or_else(|| {
            Error::invalid("chemistry", "concentrations are too large to derive umami values")
        })
    }

    pub fn zero() -> Self {
        Self::from_stored(
            RawChemistry::default(),
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
        )
    }

    pub fn from_stored(
        raw: RawChemistry,
        umami_aa: Decimal,
        umami_nuc: Decimal,
        umami_synergy: Decimal,
    ) -> Self {
        Self {
            raw,
            umami_aa,
            umami_nuc,
            umami_synergy,
        }
    }

    fn derive(raw: RawChemistry) -> Option<Self> {
        let umami_aa = raw.weighted_aa()?;
        let umami_nuc = raw.weighted_nuc()?;
        let umami_synergy =
            euc_g(umami_aa / MG_PER_G, umami_nuc / MG_PER_G)?.checked_mul(MG_PER_G)?;

        Some(Self {
            raw,
            umami_aa,
            umami_nuc,
            umami_synergy,
        })
    }

    pub fn raw(&self) -> &RawChemistry {
        &self.raw
    }

    /// Weighted amino acids, mg/100g.
    pub fn umami_aa(&self) -> Decimal {
        self.umami_aa
    }

    /// Weighted nucleotides, mg/100g.
    pub fn umami_nuc(&self) -> Decimal {
        self.umami_nuc
    }

    /// EUC, mg/100g.
    pub fn umami_synergy(&self) -> Decimal {
        self.umami_synergy
    }

    /// `None` when the raw values are out of range for the formula.
    pub fn recomputed(&self) -> Option<Self> {
        Self::derive(self.raw)
    }

    pub fn is_consistent(&self) -> bool {
        self.recomputed().is_some_and(|fresh| fresh == *self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(glu: Decimal, asp: Decimal, imp: Decimal, gmp: Decimal, amp: Decimal) -> RawChemistry {
        RawChemistry::new(glu, asp, imp, gmp, amp)
    }

    #[test]
    fn water_has_no_umami() {
        let water = Chemistry::zero();
        assert_eq!(water.umami_aa(), Decimal::ZERO);
        assert_eq!(water.umami_nuc(), Decimal::ZERO);
        assert_eq!(water.umami_synergy(), Decimal::ZERO);
        assert!(water.is_consistent());
    }

    #[test]
    fn derives_weighted_values() {
        let chem = Chemistry::from_raw(raw(dec!(1000), dec!(100), dec!(200), dec!(100), dec!(50)))
            .unwrap();

        assert_eq!(chem.umami_aa(), dec!(1007.7));
        assert_eq!(chem.umami_nuc(), dec!(439));
        // 1.0077 + 1218 * 1.0077 * 0.439 = 539.8269054 g
        assert_eq!(chem.umami_synergy(), dec!(539826.9054));
    }

    #[test]
    fn no_synergy_term_without_nucleotides() {
        let chem = Chemistry::from_raw(raw(dec!(740), dec!(0), dec!(0), dec!(0), dec!(0))).unwrap();
        assert_eq!(chem.umami_synergy(), dec!(740));

        let chem = Chemistry::from_raw(raw(dec!(0), dec!(0), dec!(650), dec!(0), dec!(0))).unwrap();
        assert_eq!(chem.umami_synergy(), Decimal::ZERO);
    }

    #[test]
    fn rejects_negative_concentration() {
        let err = Chemistry::from_raw(raw(dec!(1), dec!(-0.5), dec!(0), dec!(0), dec!(0)))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "asp"));
    }

    #[test]
    fn stored_values_are_checked_against_formula() {
        let raw = raw(dec!(500), dec!(0), dec!(100), dec!(0), dec!(0));
        let fresh = Chemistry::from_raw(raw).unwrap();
        let stale = Chemistry::from_stored(raw, dec!(500), dec!(100), dec!(600));

        assert!(fresh.is_consistent());
        assert!(!stale.is_consistent());
        assert_eq!(stale.recomputed(), Some(fresh));
    }

    #[test]
    fn euc_is_monotonic_in_each_compound() {
        let base = raw(dec!(100), dec!(100), dec!(100), dec!(100), dec!(100));
        let reference = Chemistry::from_raw(base).unwrap().umami_synergy();

        for bump in [
            raw(dec!(1), dec!(0), dec!(0), dec!(0), dec!(0)),
            raw(dec!(0), dec!(1), dec!(0), dec!(0), dec!(0)),
            raw(dec!(0), dec!(0), dec!(1), dec!(0), dec!(0)),
            raw(dec!(0), dec!(0), dec!(0), dec!(1), dec!(0)),
            raw(dec!(0), dec!(0), dec!(0), dec!(0), dec!(1)),
        ] {
            let bumped = Chemistry::from_raw(base.checked_add(&bump).unwrap())
                .unwrap()
                .umami_synergy();
            assert!(bumped >= reference);
        }
    }

    #[test]
    fn oversized_concentrations_are_rejected() {
        let huge = Decimal::from_i128_with_scale(10i128.pow(28), 0);
        let err = Chemistry::from_raw(raw(huge, dec!(0), huge, dec!(0), dec!(0))).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "chemistry"));

        assert_eq!(euc_g(Decimal::MAX, dec!(1)), None);

        let aa_only = raw(Decimal::MAX, dec!(0), dec!(0), dec!(1), dec!(0));
        assert_eq!(aa_only.weighted_nuc(), Some(dec!(2.3)));

        let gmp_only = raw(dec!(0), dec!(0), dec!(0), Decimal::MAX, dec!(0));
        assert_eq!(gmp_only.weighted_nuc(), None);
    }
}
