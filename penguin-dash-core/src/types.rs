//! Core types for the penguin dashboard library
//!
//! This module defines the record shape of the dataset, the closed categorical
//! domains used by the filters, and the error type shared by every operation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result type for dashboard operations
pub type Result<T> = std::result::Result<T, DashError>;

/// Errors that can occur while driving the dashboard
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DashError {
    /// A value outside the declared domain/bounds of an input
    #[error("Invalid value for input `{name}`: {reason}")]
    InvalidInput { name: String, reason: String },

    /// Lookup of an input name the dashboard does not declare
    #[error("Unknown input: {0}")]
    UnknownInput(String),

    /// Lookup of an output slot the dashboard does not declare
    #[error("Unknown output: {0}")]
    UnknownOutput(String),

    /// A binding could not produce an artifact from the current state
    #[error("Cannot render `{output}`: {reason}")]
    Render { output: String, reason: String },
}

impl DashError {
    pub(crate) fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        DashError::InvalidInput {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn render(output: impl Into<String>, reason: impl Into<String>) -> Self {
        DashError::Render {
            output: output.into(),
            reason: reason.into(),
        }
    }
}

/// Penguin species observed in the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    Adelie,
    Gentoo,
    Chinstrap,
}

impl Species {
    /// Full domain, in the order the UI lists it
    pub const ALL: [Species; 3] = [Species::Adelie, Species::Gentoo, Species::Chinstrap];

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Adelie => "Adelie",
            Species::Gentoo => "Gentoo",
            Species::Chinstrap => "Chinstrap",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Species::ALL
            .into_iter()
            .find(|species| species.as_str() == s)
            .ok_or_else(|| format!("`{}` is not one of Adelie, Gentoo, Chinstrap", s))
    }
}

/// Islands of the Palmer Archipelago where penguins were observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Island {
    Torgersen,
    Biscoe,
    Dream,
}

impl Island {
    /// Full domain, in the order the UI lists it
    pub const ALL: [Island; 3] = [Island::Torgersen, Island::Biscoe, Island::Dream];

    pub fn as_str(&self) -> &'static str {
        match self {
            Island::Torgersen => "Torgersen",
            Island::Biscoe => "Biscoe",
            Island::Dream => "Dream",
        }
    }
}

impl fmt::Display for Island {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Island {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Island::ALL
            .into_iter()
            .find(|island| island.as_str() == s)
            .ok_or_else(|| format!("`{}` is not one of Torgersen, Biscoe, Dream", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "male"),
            Sex::Female => write!(f, "female"),
        }
    }
}

/// Numeric measurement columns a chart can be drawn over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    BillLengthMm,
    BillDepthMm,
    FlipperLengthMm,
    BodyMassG,
}

impl Attribute {
    /// Enumerated attribute list; the first entry is the default selection
    pub const ALL: [Attribute; 4] = [
        Attribute::BillLengthMm,
        Attribute::BillDepthMm,
        Attribute::FlipperLengthMm,
        Attribute::BodyMassG,
    ];

    /// Column name as used by the UI and in chart axes
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::BillLengthMm => "bill_length_mm",
            Attribute::BillDepthMm => "bill_depth_mm",
            Attribute::FlipperLengthMm => "flipper_length_mm",
            Attribute::BodyMassG => "body_mass_g",
        }
    }

    /// Human-readable axis label
    pub fn label(&self) -> &'static str {
        match self {
            Attribute::BillLengthMm => "Bill Length (mm)",
            Attribute::BillDepthMm => "Bill Depth (mm)",
            Attribute::FlipperLengthMm => "Flipper Length (mm)",
            Attribute::BodyMassG => "Body Mass (g)",
        }
    }

    /// Read this attribute from a record; `None` when the value is missing
    pub fn value(&self, record: &Record) -> Option<f64> {
        match self {
            Attribute::BillLengthMm => record.bill_length_mm,
            Attribute::BillDepthMm => record.bill_depth_mm,
            Attribute::FlipperLengthMm => record.flipper_length_mm,
            Attribute::BodyMassG => record.body_mass_g,
        }
    }
}

impl Default for Attribute {
    fn default() -> Self {
        Attribute::ALL[0]
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Attribute::ALL
            .into_iter()
            .find(|attribute| attribute.as_str() == s)
            .ok_or_else(|| format!("`{}` is not a numeric attribute", s))
    }
}

/// One observed penguin
///
/// Measurements may be missing for some individuals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub species: Species,
    pub island: Island,
    pub bill_length_mm: Option<f64>,
    pub bill_depth_mm: Option<f64>,
    pub flipper_length_mm: Option<f64>,
    pub body_mass_g: Option<f64>,
    pub sex: Option<Sex>,
    /// Study year the observation was made in
    pub year: u16,
}

impl Record {
    /// Create a record with no measurements
    pub fn new(species: Species, island: Island, year: u16) -> Self {
        Self {
            species,
            island,
            bill_length_mm: None,
            bill_depth_mm: None,
            flipper_length_mm: None,
            body_mass_g: None,
            sex: None,
            year,
        }
    }

    /// Builder method: set all four measurements
    pub fn with_measurements(
        mut self,
        bill_length_mm: f64,
        bill_depth_mm: f64,
        flipper_length_mm: f64,
        body_mass_g: f64,
    ) -> Self {
        self.bill_length_mm = Some(bill_length_mm);
        self.bill_depth_mm = Some(bill_depth_mm);
        self.flipper_length_mm = Some(flipper_length_mm);
        self.body_mass_g = Some(body_mass_g);
        self
    }

    /// Builder method: set the recorded sex
    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_parsing() {
        assert_eq!("Gentoo".parse::<Species>(), Ok(Species::Gentoo));
        assert_eq!("Dream".parse::<Island>(), Ok(Island::Dream));
        assert_eq!("body_mass_g".parse::<Attribute>(), Ok(Attribute::BodyMassG));

        assert!("gentoo".parse::<Species>().is_err());
        assert!("Anvers".parse::<Island>().is_err());
        assert!("species".parse::<Attribute>().is_err());
    }

    #[test]
    fn test_attribute_default_is_first_listed() {
        assert_eq!(Attribute::default(), Attribute::BillLengthMm);
    }

    #[test]
    fn test_attribute_reads_missing_values() {
        let empty = Record::new(Species::Adelie, Island::Torgersen, 2007);
        assert_eq!(Attribute::BodyMassG.value(&empty), None);

        let full = empty.with_measurements(39.1, 18.7, 181.0, 3750.0);
        assert_eq!(Attribute::BillLengthMm.value(&full), Some(39.1));
        assert_eq!(Attribute::FlipperLengthMm.value(&full), Some(181.0));
    }

    #[test]
    fn test_error_display() {
        let err = DashError::invalid("plotly_bin_count", "21 is above the maximum 20");
        assert_eq!(
            err.to_string(),
            "Invalid value for input `plotly_bin_count`: 21 is above the maximum 20"
        );
        assert_eq!(
            DashError::UnknownInput("nonexistent".into()).to_string(),
            "Unknown input: nonexistent"
        );
    }
}
