use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use umami_shared::{Error, Result, Unit};

/// One composition line as received on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct LineInput {
    pub ingredient_id: i64,
    pub quantity: Decimal,
    pub unit: String,
}

/// A validated composition line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub ingredient_id: i64,
    pub quantity: Decimal,
    pub unit: Unit,
}

impl Line {
    pub fn new(ingredient_id: i64, quantity: Decimal, unit: Unit) -> Self {
        Self {
            ingredient_id,
            quantity,
            unit,
        }
    }

    pub fn grams(&self) -> Option<Decimal> {
        self.unit.to_grams(self.quantity)
    }
}

impl LineInput {
    fn parse(self, index: usize) -> Result<Line> {
        let unit = Unit::from_str(self.unit.trim()).map_err(|_| {
            Error::invalid(
                format!("lines[{index}].unit"),
                format!("unknown unit `{}`, expected one of g, oz, tsp, tbsp, cup", self.unit),
            )
        })?;

        if self.quantity.is_sign_negative() && !self.quantity.is_zero() {
            return Err(Error::invalid(
                format!("lines[{index}].quantity"),
                format!("must not be negative, got {}", self.quantity),
            ));
        }

        let line = Line::new(self.ingredient_id, self.quantity, unit);
        if line.grams().is_none() {
            return Err(Error::invalid(
                format!("lines[{index}].quantity"),
                format!("{} {} is too large to convert to grams", self.quantity, unit),
            ));
        }

        Ok(line)
    }
}

/// Validates every line, reporting the first offending field.
pub fn parse_lines(inputs: Vec<LineInput>) -> Result<Vec<Line>> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| input.parse(index))
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn input(quantity: Decimal, unit: &str) -> LineInput {
        LineInput {
            ingredient_id: 1,
            quantity,
            unit: unit.to_owned(),
        }
    }

    #[test]
    fn accepts_units_case_insensitively() {
        let lines = parse_lines(vec![input(dec!(1), "Cup"), input(dec!(0), " TSP ")]).unwrap();

        assert_eq!(lines[0].unit, Unit::Cup);
        assert_eq!(lines[0].grams(), Some(dec!(240)));
        assert_eq!(lines[1].unit, Unit::Tsp);
        assert_eq!(lines[1].grams(), Some(dec!(0)));
    }

    #[test]
    fn reports_offending_line() {
        let err = parse_lines(vec![input(dec!(1), "g"), input(dec!(1), "ml")]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "lines[1].unit"));

        let err = parse_lines(vec![input(dec!(-2), "g")]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "lines[0].quantity"));
    }

    #[test]
    fn deserializes_numbers() {
        let inputs: Vec<LineInput> = serde_json::from_str(
            r#"[{"ingredient_id": 3, "quantity": 12.5, "unit": "g"}, {"ingredient_id": 4, "quantity": 2, "unit": "oz"}]"#,
        )
        .unwrap();

        let lines = parse_lines(inputs).unwrap();
        assert_eq!(lines[0].quantity, dec!(12.5));
        assert_eq!(lines[1].grams(), Some(dec!(56.70)));
    }

    #[test]
    fn rejects_quantities_beyond_decimal_range() {
        let inputs: Vec<LineInput> = serde_json::from_str(
            r#"[{"ingredient_id": 1, "quantity": 1e27, "unit": "g"}, {"ingredient_id": 1, "quantity": 1e27, "unit": "cup"}]"#,
        )
        .unwrap();

        let err = parse_lines(inputs).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "lines[1].quantity"));
    }
}
