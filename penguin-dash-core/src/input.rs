//! Named user inputs, their domains, and the current Input State
//!
//! Every value is validated against its input's declared domain before it is
//! stored. Validation happens before any mutation, so a rejected value leaves
//! the state untouched.

use crate::types::{Attribute, DashError, Island, Result, Species};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The fixed set of inputs the UI layer can change
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InputName {
    #[serde(rename = "selectized_attribute")]
    SelectizedAttribute,
    #[serde(rename = "plotly_bin_count")]
    PlotlyBinCount,
    #[serde(rename = "seaborn_bin_count")]
    SeabornBinCount,
    #[serde(rename = "selected_species_list")]
    SelectedSpeciesList,
    #[serde(rename = "island_list")]
    IslandList,
}

impl InputName {
    pub const ALL: [InputName; 5] = [
        InputName::SelectizedAttribute,
        InputName::PlotlyBinCount,
        InputName::SeabornBinCount,
        InputName::SelectedSpeciesList,
        InputName::IslandList,
    ];

    /// Widget name used by the UI runtime
    pub fn as_str(&self) -> &'static str {
        match self {
            InputName::SelectizedAttribute => "selectized_attribute",
            InputName::PlotlyBinCount => "plotly_bin_count",
            InputName::SeabornBinCount => "seaborn_bin_count",
            InputName::SelectedSpeciesList => "selected_species_list",
            InputName::IslandList => "island_list",
        }
    }

    /// Dense index, used for per-input bookkeeping
    pub(crate) fn index(&self) -> usize {
        *self as usize
    }

    pub fn domain(&self) -> InputDomain {
        match self {
            InputName::SelectizedAttribute => InputDomain::Choice(&ATTRIBUTE_NAMES),
            InputName::PlotlyBinCount => InputDomain::Range { min: 1, max: 20 },
            InputName::SeabornBinCount => InputDomain::Range { min: 0, max: 100 },
            InputName::SelectedSpeciesList => InputDomain::Subset(&SPECIES_NAMES),
            InputName::IslandList => InputDomain::Subset(&ISLAND_NAMES),
        }
    }

    /// Value the input holds before any user interaction
    pub fn default_value(&self) -> InputValue {
        match self {
            InputName::SelectizedAttribute => InputValue::Attribute(Attribute::default()),
            InputName::PlotlyBinCount => InputValue::Count(10),
            InputName::SeabornBinCount => InputValue::Count(50),
            InputName::SelectedSpeciesList => InputValue::Species(Species::ALL.into_iter().collect()),
            InputName::IslandList => InputValue::Islands(Island::ALL.into_iter().collect()),
        }
    }
}

impl fmt::Display for InputName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputName {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self> {
        InputName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| DashError::UnknownInput(s.to_string()))
    }
}

const ATTRIBUTE_NAMES: [&str; 4] = [
    "bill_length_mm",
    "bill_depth_mm",
    "flipper_length_mm",
    "body_mass_g",
];
const SPECIES_NAMES: [&str; 3] = ["Adelie", "Gentoo", "Chinstrap"];
const ISLAND_NAMES: [&str; 3] = ["Torgersen", "Biscoe", "Dream"];

/// Declared domain of an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDomain {
    /// Exactly one of the listed values
    Choice(&'static [&'static str]),
    /// An integer within inclusive bounds
    Range { min: i64, max: i64 },
    /// Any subset (including the empty set) of the listed values
    Subset(&'static [&'static str]),
}

impl fmt::Display for InputDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputDomain::Choice(values) => write!(f, "one of {}", values.join(", ")),
            InputDomain::Range { min, max } => write!(f, "integer in [{}, {}]", min, max),
            InputDomain::Subset(values) => write!(f, "subset of {}", values.join(", ")),
        }
    }
}

/// Current value of one input
///
/// Serialized with an explicit `kind` tag so an empty species set and an
/// empty island set stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InputValue {
    Attribute(Attribute),
    Count(i64),
    Species(BTreeSet<Species>),
    Islands(BTreeSet<Island>),
}

impl InputValue {
    /// Parse the textual form a widget reports for `name`
    ///
    /// Sets are comma-separated; an empty (or all-blank) string is the empty set.
    pub fn parse(name: InputName, raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let invalid = |reason: String| DashError::invalid(name.as_str(), reason);

        match name {
            InputName::SelectizedAttribute => {
                raw.parse::<Attribute>().map(InputValue::Attribute).map_err(invalid)
            }
            InputName::PlotlyBinCount | InputName::SeabornBinCount => raw
                .parse::<i64>()
                .map(InputValue::Count)
                .map_err(|_| invalid(format!("`{}` is not an integer", raw))),
            InputName::SelectedSpeciesList => split_members(raw)
                .map(str::parse::<Species>)
                .collect::<std::result::Result<_, _>>()
                .map(InputValue::Species)
                .map_err(invalid),
            InputName::IslandList => split_members(raw)
                .map(str::parse::<Island>)
                .collect::<std::result::Result<_, _>>()
                .map(InputValue::Islands)
                .map_err(invalid),
        }
    }

    pub fn as_attribute(&self) -> Option<Attribute> {
        match self {
            InputValue::Attribute(attribute) => Some(*attribute),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<i64> {
        match self {
            InputValue::Count(count) => Some(*count),
            _ => None,
        }
    }

    pub fn as_species(&self) -> Option<&BTreeSet<Species>> {
        match self {
            InputValue::Species(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_islands(&self) -> Option<&BTreeSet<Island>> {
        match self {
            InputValue::Islands(set) => Some(set),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            InputValue::Attribute(_) => "an attribute",
            InputValue::Count(_) => "an integer",
            InputValue::Species(_) => "a species set",
            InputValue::Islands(_) => "an island set",
        }
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<T: fmt::Display>(items: impl Iterator<Item = T>) -> String {
            items.map(|item| item.to_string()).collect::<Vec<_>>().join(",")
        }

        match self {
            InputValue::Attribute(attribute) => write!(f, "{}", attribute),
            InputValue::Count(count) => write!(f, "{}", count),
            InputValue::Species(set) => f.write_str(&join(set.iter())),
            InputValue::Islands(set) => f.write_str(&join(set.iter())),
        }
    }
}

fn split_members(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|member| !member.is_empty())
}

/// Check `value` against the declared domain of `name`
pub fn validate(name: InputName, value: &InputValue) -> Result<()> {
    let shape_ok = matches!(
        (name, value),
        (InputName::SelectizedAttribute, InputValue::Attribute(_))
            | (InputName::PlotlyBinCount, InputValue::Count(_))
            | (InputName::SeabornBinCount, InputValue::Count(_))
            | (InputName::SelectedSpeciesList, InputValue::Species(_))
            | (InputName::IslandList, InputValue::Islands(_))
    );
    if !shape_ok {
        return Err(DashError::invalid(
            name.as_str(),
            format!("expected {}, got {}", name.domain(), value.kind()),
        ));
    }

    if let (InputDomain::Range { min, max }, InputValue::Count(count)) = (name.domain(), value) {
        if *count < min {
            return Err(DashError::invalid(
                name.as_str(),
                format!("{} is below the minimum {}", count, min),
            ));
        }
        if *count > max {
            return Err(DashError::invalid(
                name.as_str(),
                format!("{} is above the maximum {}", count, max),
            ));
        }
    }

    Ok(())
}

/// Current values of every input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    values: [InputValue; 5],
}

impl InputState {
    /// State with every input at its default
    pub fn new() -> Self {
        Self {
            values: InputName::ALL.map(|name| name.default_value()),
        }
    }

    pub fn get(&self, name: InputName) -> &InputValue {
        &self.values[name.index()]
    }

    /// Validate and store `value`; returns whether the stored value changed
    pub fn set(&mut self, name: InputName, value: InputValue) -> Result<bool> {
        validate(name, &value)?;
        let slot = &mut self.values[name.index()];
        if *slot == value {
            return Ok(false);
        }
        *slot = value;
        Ok(true)
    }

    pub fn attribute(&self) -> Attribute {
        self.get(InputName::SelectizedAttribute)
            .as_attribute()
            .unwrap_or_default()
    }

    pub fn plotly_bin_count(&self) -> i64 {
        self.count(InputName::PlotlyBinCount)
    }

    pub fn seaborn_bin_count(&self) -> i64 {
        self.count(InputName::SeabornBinCount)
    }

    pub fn species(&self) -> &BTreeSet<Species> {
        self.get(InputName::SelectedSpeciesList)
            .as_species()
            .unwrap_or(&EMPTY_SPECIES)
    }

    pub fn islands(&self) -> &BTreeSet<Island> {
        self.get(InputName::IslandList)
            .as_islands()
            .unwrap_or(&EMPTY_ISLANDS)
    }

    fn count(&self, name: InputName) -> i64 {
        self.get(name)
            .as_count()
            .or_else(|| name.default_value().as_count())
            .unwrap_or_default()
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

// `set` only ever stores values of the right shape; these back the accessors'
// unreachable fallbacks without allocating.
static EMPTY_SPECIES: BTreeSet<Species> = BTreeSet::new();
static EMPTY_ISLANDS: BTreeSet<Island> = BTreeSet::new();
