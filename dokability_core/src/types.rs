//! Core domain types for the drink value calculator.
//!
//! This module defines the fundamental types used throughout the system:
//! - Volume units and volume options
//! - Metrics derived by the calculator
//! - Drink entries recorded in the ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Volume Types
// ============================================================================

/// Unit of volume accepted at the input boundary
///
/// Parsing is total: any tag other than `cl` or `l` is treated as `ml`,
/// which makes the milliliter conversion the identity fallback.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(into = "String", from = "String")]
pub enum VolumeUnit {
    #[default]
    Milliliter,
    Centiliter,
    Liter,
}

impl VolumeUnit {
    /// Multiplier that converts a magnitude in this unit to milliliters
    pub fn ml_factor(self) -> f64 {
        match self {
            VolumeUnit::Liter => 1000.0,
            VolumeUnit::Centiliter => 10.0,
            VolumeUnit::Milliliter => 1.0,
        }
    }

    /// Storage tag (`ml`, `cl`, `l`)
    pub fn as_str(self) -> &'static str {
        match self {
            VolumeUnit::Milliliter => "ml",
            VolumeUnit::Centiliter => "cl",
            VolumeUnit::Liter => "l",
        }
    }
}

impl From<&str> for VolumeUnit {
    fn from(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "l" => VolumeUnit::Liter,
            "cl" => VolumeUnit::Centiliter,
            _ => VolumeUnit::Milliliter,
        }
    }
}

impl From<String> for VolumeUnit {
    fn from(tag: String) -> Self {
        VolumeUnit::from(tag.as_str())
    }
}

impl From<VolumeUnit> for String {
    fn from(unit: VolumeUnit) -> Self {
        unit.as_str().to_string()
    }
}

impl fmt::Display for VolumeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A container size: magnitude, unit and display label (e.g. "33cl")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VolumeOption {
    pub value: f64,
    pub unit: VolumeUnit,
    pub label: String,
}

impl VolumeOption {
    /// Build an option with an explicit label
    pub fn new(value: f64, unit: VolumeUnit, label: impl Into<String>) -> Self {
        Self {
            value,
            unit,
            label: label.into(),
        }
    }

    /// Build an arbitrary (non-catalog) option, labelled like the catalog ones
    pub fn custom(value: f64, unit: VolumeUnit) -> Self {
        let suffix = match unit {
            VolumeUnit::Liter => "L",
            other => other.as_str(),
        };
        Self::new(value, unit, format!("{}{}", value, suffix))
    }

    /// Magnitude normalized to milliliters
    pub fn milliliters(&self) -> f64 {
        crate::calculator::to_milliliters(self.value, self.unit)
    }
}

// ============================================================================
// Calculator Output
// ============================================================================

/// Metrics derived from one (price, volume, unit, ABV) input
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct DerivedMetrics {
    pub volume_ml: f64,
    pub pure_alcohol_ml: f64,
    /// Currency per 10 ml of ethanol; 0 is a sentinel for "no alcohol"
    pub price_per_cl_alcohol: f64,
    pub ml_per_euro: f64,
    pub dokability_score: i32,
}

// ============================================================================
// Ledger Entries
// ============================================================================

/// A recorded drink
///
/// Entries are created by [`crate::Ledger::add`] only and are immutable
/// afterwards. The serialized shape is the durable storage record, so field
/// names are camelCase and the extended metrics are optional for records
/// written before they existed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrinkEntry {
    id: Uuid,
    name: String,
    #[serde(with = "lenient_f64")]
    price: f64,
    /// Always milliliters
    #[serde(with = "lenient_f64")]
    volume: f64,
    volume_unit: VolumeUnit,
    #[serde(with = "lenient_f64")]
    alcohol_percent: f64,
    #[serde(with = "lenient_f64")]
    pure_alcohol_ml: f64,
    #[serde(with = "lenient_f64")]
    price_per_cl_alcohol: f64,
    #[serde(
        default,
        with = "lenient_f64::option",
        skip_serializing_if = "Option::is_none"
    )]
    ml_per_euro: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dokability_score: Option<i32>,
    created_at: DateTime<Utc>,
}

/// Field bundle used by the ledger to stamp a new entry
pub(crate) struct NewDrinkEntry {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub volume: f64,
    pub volume_unit: VolumeUnit,
    pub alcohol_percent: f64,
    pub pure_alcohol_ml: f64,
    pub price_per_cl_alcohol: f64,
    pub ml_per_euro: Option<f64>,
    pub dokability_score: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<NewDrinkEntry> for DrinkEntry {
    fn from(new: NewDrinkEntry) -> Self {
        Self {
            id: new.id,
            name: new.name,
            price: new.price,
            volume: new.volume,
            volume_unit: new.volume_unit,
            alcohol_percent: new.alcohol_percent,
            pure_alcohol_ml: new.pure_alcohol_ml,
            price_per_cl_alcohol: new.price_per_cl_alcohol,
            ml_per_euro: new.ml_per_euro,
            dokability_score: new.dokability_score,
            created_at: new.created_at,
        }
    }
}

impl DrinkEntry {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Volume in milliliters
    pub fn volume_ml(&self) -> f64 {
        self.volume
    }

    /// Unit the volume was originally entered in
    pub fn volume_unit(&self) -> VolumeUnit {
        self.volume_unit
    }

    pub fn alcohol_percent(&self) -> f64 {
        self.alcohol_percent
    }

    pub fn pure_alcohol_ml(&self) -> f64 {
        self.pure_alcohol_ml
    }

    pub fn price_per_cl_alcohol(&self) -> f64 {
        self.price_per_cl_alcohol
    }

    pub fn ml_per_euro(&self) -> Option<f64> {
        self.ml_per_euro
    }

    pub fn dokability_score(&self) -> Option<i32> {
        self.dokability_score
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Serde codec for `f64` fields of the durable record
///
/// JSON has no representation for infinities or NaN and `serde_json` writes
/// them as `null`. Non-finite values are written as the strings `"Infinity"`,
/// `"-Infinity"` and `"NaN"` instead, and read back from those strings. A
/// `null` (as written by the browser for the same values) reads as NaN.
mod lenient_f64 {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Number(f64),
        Text(String),
    }

    fn from_wire<E: serde::de::Error>(wire: Option<Wire>) -> Result<f64, E> {
        match wire {
            None => Ok(f64::NAN),
            Some(Wire::Number(n)) => Ok(n),
            Some(Wire::Text(text)) => match text.as_str() {
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                "NaN" => Ok(f64::NAN),
                other => Err(E::custom(format!("invalid number '{}'", other))),
            },
        }
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_positive() {
            serializer.serialize_str("Infinity")
        } else {
            serializer.serialize_str("-Infinity")
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        from_wire(Option::<Wire>::deserialize(deserializer)?)
    }

    /// Same codec for optional fields; `null` reads as `None`
    pub mod option {
        use super::Wire;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<f64>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => super::serialize(v, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<f64>, D::Error> {
            match Option::<Wire>::deserialize(deserializer)? {
                None => Ok(None),
                wire => super::from_wire(wire).map(Some),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_parsing_defaults_to_ml() {
        assert_eq!(VolumeUnit::from("l"), VolumeUnit::Liter);
        assert_eq!(VolumeUnit::from("CL"), VolumeUnit::Centiliter);
        assert_eq!(VolumeUnit::from("ml"), VolumeUnit::Milliliter);
        assert_eq!(VolumeUnit::from("gallon"), VolumeUnit::Milliliter);
        assert_eq!(VolumeUnit::from(""), VolumeUnit::Milliliter);
    }

    #[test]
    fn test_unit_serializes_as_tag() {
        assert_eq!(serde_json::to_string(&VolumeUnit::Liter).unwrap(), "\"l\"");
        let unit: VolumeUnit = serde_json::from_str("\"cl\"").unwrap();
        assert_eq!(unit, VolumeUnit::Centiliter);
        let unknown: VolumeUnit = serde_json::from_str("\"pint\"").unwrap();
        assert_eq!(unknown, VolumeUnit::Milliliter);
    }

    #[test]
    fn test_custom_option_label() {
        assert_eq!(VolumeOption::custom(0.7, VolumeUnit::Liter).label, "0.7L");
        assert_eq!(VolumeOption::custom(250.0, VolumeUnit::Milliliter).label, "250ml");
        assert_eq!(VolumeOption::custom(33.0, VolumeUnit::Centiliter).label, "33cl");
    }

    #[test]
    fn test_non_finite_metrics_survive_json() {
        let entry: DrinkEntry = NewDrinkEntry {
            id: Uuid::new_v4(),
            name: "1L 1e308%".into(),
            price: 20.0,
            volume: 1000.0,
            volume_unit: VolumeUnit::Liter,
            alcohol_percent: 1e308,
            pure_alcohol_ml: f64::INFINITY,
            price_per_cl_alcohol: 0.0,
            ml_per_euro: Some(f64::INFINITY),
            dokability_score: Some(100),
            created_at: chrono::Utc::now(),
        }
        .into();

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"pureAlcoholMl\":\"Infinity\""));
        assert!(!json.contains("null"));

        let back: DrinkEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_browser_null_metrics_load() {
        let json = r#"{
            "id": "6f1c2a4e-8a53-4c4e-9d61-0b7e2f3a9c11",
            "name": "huge",
            "price": 20,
            "volume": 1000,
            "volumeUnit": "l",
            "alcoholPercent": 1e308,
            "pureAlcoholMl": null,
            "pricePerClAlcohol": 0,
            "mlPerEuro": null,
            "dokabilityScore": 100,
            "createdAt": "2025-03-01T18:30:00.000Z"
        }"#;

        let entry: DrinkEntry = serde_json::from_str(json).unwrap();
        assert!(entry.pure_alcohol_ml().is_nan());
        assert_eq!(entry.ml_per_euro(), None);
        assert_eq!(entry.price(), 20.0);
    }

    #[test]
    fn test_legacy_record_without_extended_metrics() {
        let json = r#"{
            "id": "6f1c2a4e-8a53-4c4e-9d61-0b7e2f3a9c11",
            "name": "33cl 4.7%",
            "price": 3.5,
            "volume": 330,
            "volumeUnit": "cl",
            "alcoholPercent": 4.7,
            "pureAlcoholMl": 15.51,
            "pricePerClAlcohol": 2.2566,
            "createdAt": "2025-03-01T18:30:00.000Z"
        }"#;

        let entry: DrinkEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.name(), "33cl 4.7%");
        assert_eq!(entry.volume_ml(), 330.0);
        assert_eq!(entry.volume_unit(), VolumeUnit::Centiliter);
        assert_eq!(entry.ml_per_euro(), None);
        assert_eq!(entry.dokability_score(), None);

        let written = serde_json::to_string(&entry).unwrap();
        assert!(written.contains("\"createdAt\""));
        assert!(!written.contains("mlPerEuro"));
    }
}
