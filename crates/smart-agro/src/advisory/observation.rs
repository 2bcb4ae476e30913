use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Attributes a knowledge-base criterion may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationField {
    SoilType,
    Ph,
    Rainfall,
    Temperature,
    Humidity,
    Nitrogen,
    Phosphorus,
    Potassium,
    Age,
    AnnualIncome,
    LandSize,
    LandOwnership,
    CasteCategory,
    HasBankAccount,
    AadhaarLinked,
    CropType,
}

impl ObservationField {
    pub const fn label(self) -> &'static str {
        match self {
            ObservationField::SoilType => "soil_type",
            ObservationField::Ph => "ph",
            ObservationField::Rainfall => "rainfall",
            ObservationField::Temperature => "temperature",
            ObservationField::Humidity => "humidity",
            ObservationField::Nitrogen => "nitrogen",
            ObservationField::Phosphorus => "phosphorus",
            ObservationField::Potassium => "potassium",
            ObservationField::Age => "age",
            ObservationField::AnnualIncome => "annual_income",
            ObservationField::LandSize => "land_size",
            ObservationField::LandOwnership => "land_ownership",
            ObservationField::CasteCategory => "caste_category",
            ObservationField::HasBankAccount => "bank_account",
            ObservationField::AadhaarLinked => "aadhaar_linked",
            ObservationField::CropType => "crop_type",
        }
    }
}

impl fmt::Display for ObservationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shape of a stored value, used when reporting type mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Decimal,
    Text,
    Boolean,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ValueKind::Decimal => "decimal",
            ValueKind::Text => "text",
            ValueKind::Boolean => "boolean",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationValue {
    Decimal(f64),
    Text(String),
    Boolean(bool),
}

impl ObservationValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            ObservationValue::Decimal(_) => ValueKind::Decimal,
            ObservationValue::Text(_) => ValueKind::Text,
            ObservationValue::Boolean(_) => ValueKind::Boolean,
        }
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            ObservationValue::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ObservationValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            ObservationValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }
}

/// Normalized snapshot of the inputs for one evaluation call.
///
/// Built once through [`ObservationBuilder`] and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Observation {
    values: BTreeMap<ObservationField, ObservationValue>,
}

impl Observation {
    pub fn builder() -> ObservationBuilder {
        ObservationBuilder::default()
    }

    pub fn get(&self, field: ObservationField) -> Option<&ObservationValue> {
        self.values.get(&field)
    }

    pub fn contains(&self, field: ObservationField) -> bool {
        self.values.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = ObservationField> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(ObservationField, ObservationValue)> for Observation {
    fn from_iter<I: IntoIterator<Item = (ObservationField, ObservationValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ObservationBuilder {
    values: BTreeMap<ObservationField, ObservationValue>,
}

impl ObservationBuilder {
    pub fn decimal(mut self, field: ObservationField, value: f64) -> Self {
        self.values.insert(field, ObservationValue::Decimal(value));
        self
    }

    pub fn text(mut self, field: ObservationField, value: impl Into<String>) -> Self {
        self.values.insert(field, ObservationValue::Text(value.into()));
        self
    }

    pub fn boolean(mut self, field: ObservationField, value: bool) -> Self {
        self.values.insert(field, ObservationValue::Boolean(value));
        self
    }

    pub fn build(self) -> Observation {
        Observation {
            values: self.values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_last_value_per_field() {
        let observation = Observation::builder()
            .decimal(ObservationField::Ph, 6.0)
            .decimal(ObservationField::Ph, 6.8)
            .text(ObservationField::SoilType, "sandy")
            .build();

        assert_eq!(observation.len(), 2);
        assert_eq!(
            observation.get(ObservationField::Ph).and_then(ObservationValue::as_decimal),
            Some(6.8)
        );
        assert!(!observation.contains(ObservationField::Rainfall));
    }
}
