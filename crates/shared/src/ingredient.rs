use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Chemistry, Error, RawChemistry, Result,
    tag::{infer_flavor_tags, infer_umami_tags, normalize_tags},
};

/// Traditional Chinese Medicine attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tcm {
    #[serde(default)]
    pub four_qi: Vec<String>,
    #[serde(default)]
    pub five_flavors: Vec<String>,
    #[serde(default)]
    pub meridians: Vec<String>,
    #[serde(default)]
    pub overview: Option<String>,
    /// 1.0 for curated records, lower when inferred.
    #[serde(default)]
    pub confidence: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flags {
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub umami_tags: Vec<String>,
    #[serde(default)]
    pub flavor_tags: Vec<String>,
}

/// A searchable name variant, never used for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientSummary {
    pub id: i64,
    pub base_name: String,
    pub display_name: Option<String>,
    pub category: Option<String>,
    pub chemistry: Chemistry,
    pub tcm: Tcm,
    pub flags: Flags,
}

impl IngredientSummary {
    /// Display name when present, base name otherwise.
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.base_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientDetail {
    #[serde(flatten)]
    pub summary: IngredientSummary,
    pub aliases: Vec<Alias>,
    /// Suggested extraction temperature in °C.
    pub extraction_temp: Option<Decimal>,
    /// Suggested extraction time in minutes.
    pub extraction_time: Option<i64>,
    pub cooking_overview: Option<String>,
}

/// Ingredient as supplied by an import or a seed.
///
/// Upserting it replaces the whole stored record. Chemistry is validated and
/// its derived values recomputed, tags are normalised, and umami/flavor tags
/// are inferred when none are given.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewIngredient {
    #[serde(default)]
    pub id: Option<i64>,
    pub base_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub extraction_temp: Option<Decimal>,
    #[serde(default)]
    pub extraction_time: Option<i64>,
    #[serde(default)]
    pub cooking_overview: Option<String>,
    #[serde(default)]
    pub chemistry: RawChemistry,
    #[serde(default)]
    pub tcm: Option<Tcm>,
    #[serde(default)]
    pub flags: Option<Flags>,
    #[serde(default)]
    pub aliases: Vec<Alias>,
}

impl NewIngredient {
    pub fn into_detail(self, id: i64) -> Result<IngredientDetail> {
        let base_name = self.base_name.trim().to_owned();
        if base_name.is_empty() {
            return Err(Error::invalid("base_name", "must not be empty"));
        }

        let chemistry = Chemistry::from_raw(self.chemistry)?;

        let tcm = match self.tcm {
            Some(tcm) => {
                let four_qi = trim_all(tcm.four_qi);
                if four_qi.is_empty() {
                    return Err(Error::invalid("tcm.four_qi", "must not be empty"));
                }

                if tcm.confidence < Decimal::ZERO || tcm.confidence > Decimal::ONE {
                    return Err(Error::invalid(
                        "tcm.confidence",
                        format!("must be within [0, 1], got {}", tcm.confidence),
                    ));
                }

                Tcm {
                    four_qi,
                    five_flavors: trim_all(tcm.five_flavors),
                    meridians: trim_all(tcm.meridians),
                    overview: tcm.overview,
                    confidence: tcm.confidence,
                }
            }
            None => Tcm::default(),
        };

        let flags = self.flags.unwrap_or_default();
        let mut umami_tags = normalize_tags(&flags.umami_tags);
        if umami_tags.is_empty() {
            umami_tags = infer_umami_tags(&chemistry);
        }

        let mut flavor_tags = normalize_tags(&flags.flavor_tags);
        if flavor_tags.is_empty() {
            flavor_tags = infer_flavor_tags(self.category.as_deref());
        }

        let flags = Flags {
            allergens: normalize_tags(&flags.allergens),
            dietary_restrictions: normalize_tags(&flags.dietary_restrictions),
            umami_tags,
            flavor_tags,
        };

        if self.extraction_time.is_some_and(|time| time < 0) {
            return Err(Error::invalid("extraction_time", "must not be negative"));
        }

        let aliases = self
            .aliases
            .into_iter()
            .filter_map(|alias| {
                let name = alias.name.trim().to_owned();
                (!name.is_empty()).then(|| Alias {
                    name,
                    language: alias.language,
                })
            })
            .collect();

        Ok(IngredientDetail {
            summary: IngredientSummary {
                id,
                base_name,
                display_name: non_blank(self.display_name),
                category: non_blank(self.category),
                chemistry,
                tcm,
                flags,
            },
            aliases,
            extraction_temp: self.extraction_temp,
            extraction_time: self.extraction_time,
            cooking_overview: non_blank(self.cooking_overview),
        })
    }

    /// The zero-umami reference ingredient.
    pub fn water() -> Self {
        Self {
            base_name: "water".to_owned(),
            display_name: Some("Water".to_owned()),
            category: Some("Base".to_owned()),
            tcm: Some(Tcm {
                four_qi: vec!["Neutral".to_owned()],
                five_flavors: vec!["None".to_owned()],
                meridians: vec![],
                overview: Some("Neutral energy; used to dilute concentration.".to_owned()),
                confidence: Decimal::ONE,
            }),
            flags: Some(Flags {
                dietary_restrictions: vec![
                    "vegan".to_owned(),
                    "vegetarian".to_owned(),
                    "pescatarian".to_owned(),
                ],
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

fn trim_all(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
