//! Dashboard configuration types
//!
//! A `DashboardConfig` describes the Input State a session starts from. Every
//! field is optional; anything left out keeps the input's default.

use crate::dashboard::Dashboard;
use crate::input::{validate, InputName, InputValue};
use crate::types::Result;
use serde::{Deserialize, Serialize};

/// Initial values for the dashboard inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Attribute the charts are drawn over
    #[serde(default)]
    pub attribute: Option<String>,

    #[serde(default)]
    pub plotly_bin_count: Option<i64>,

    #[serde(default)]
    pub seaborn_bin_count: Option<i64>,

    /// Selected species; an empty list selects nothing
    #[serde(default)]
    pub species: Option<Vec<String>>,

    /// Selected islands; an empty list selects nothing
    #[serde(default)]
    pub islands: Option<Vec<String>>,
}

impl DashboardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the charted attribute
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Builder method: set the plotly histogram bin count
    pub fn with_plotly_bins(mut self, bins: i64) -> Self {
        self.plotly_bin_count = Some(bins);
        self
    }

    /// Builder method: set the seaborn histogram bin count
    pub fn with_seaborn_bins(mut self, bins: i64) -> Self {
        self.seaborn_bin_count = Some(bins);
        self
    }

    /// Builder method: set the species filter
    pub fn with_species<S: Into<String>>(mut self, species: impl IntoIterator<Item = S>) -> Self {
        self.species = Some(species.into_iter().map(Into::into).collect());
        self
    }

    /// Builder method: set the island filter
    pub fn with_islands<S: Into<String>>(mut self, islands: impl IntoIterator<Item = S>) -> Self {
        self.islands = Some(islands.into_iter().map(Into::into).collect());
        self
    }

    /// Parse and validate every configured value
    pub fn initial_inputs(&self) -> Result<Vec<(InputName, InputValue)>> {
        let mut inputs = Vec::new();

        if let Some(attribute) = &self.attribute {
            inputs.push(parsed(InputName::SelectizedAttribute, attribute)?);
        }
        if let Some(bins) = self.plotly_bin_count {
            inputs.push(checked(InputName::PlotlyBinCount, InputValue::Count(bins))?);
        }
        if let Some(bins) = self.seaborn_bin_count {
            inputs.push(checked(InputName::SeabornBinCount, InputValue::Count(bins))?);
        }
        if let Some(species) = &self.species {
            inputs.push(parsed(InputName::SelectedSpeciesList, &species.join(","))?);
        }
        if let Some(islands) = &self.islands {
            inputs.push(parsed(InputName::IslandList, &islands.join(","))?);
        }

        Ok(inputs)
    }

    /// Apply the configuration to `dashboard`
    ///
    /// All values are validated first; on error the dashboard is left untouched.
    pub fn apply(&self, dashboard: &mut Dashboard) -> Result<()> {
        for (name, value) in self.initial_inputs()? {
            dashboard.set_input(name.as_str(), value)?;
        }
        Ok(())
    }
}

fn parsed(name: InputName, raw: &str) -> Result<(InputName, InputValue)> {
    checked(name, InputValue::parse(name, raw)?)
}

fn checked(name: InputName, value: InputValue) -> Result<(InputName, InputValue)> {
    validate(name, &value)?;
    Ok((name, value))
}
