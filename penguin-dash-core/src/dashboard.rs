//! Dashboard: the store plus its output slots
//!
//! This is the scheduling side of the host contract. After each input event it
//! reports which outputs must be redrawn, and it caches every output's artifact
//! against the inputs that output transitively reads.

use crate::dataset::Dataset;
use crate::input::{InputName, InputValue};
use crate::reactive::{DerivationId, InputChange, Memo, ReactiveStore};
use crate::render::{default_bindings, OutputKind, RenderArtifact, RenderBinding};
use crate::types::{DashError, Result};
use std::rc::Rc;

struct Slot {
    binding: Box<dyn RenderBinding>,
    cache: Memo<RenderArtifact>,
}

/// Description of one output slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputInfo {
    pub name: &'static str,
    pub kind: OutputKind,
    /// Every input the output's artifact depends on
    pub deps: Vec<InputName>,
}

pub struct Dashboard {
    store: ReactiveStore,
    slots: Vec<Slot>,
}

impl Dashboard {
    /// Dashboard over `dataset` with the five standard outputs
    pub fn new(dataset: Dataset) -> Self {
        Self::with_bindings(dataset, default_bindings())
    }

    pub fn with_bindings(dataset: Dataset, bindings: Vec<Box<dyn RenderBinding>>) -> Self {
        let slots = bindings
            .into_iter()
            .map(|binding| {
                // Every binding reads the Filtered View
                let deps = binding
                    .reads()
                    .iter()
                    .chain(DerivationId::FilteredView.deps())
                    .copied();
                Slot {
                    cache: Memo::new(deps).named(binding.name()),
                    binding,
                }
            })
            .collect();

        Self {
            store: ReactiveStore::new(dataset),
            slots,
        }
    }

    pub fn store(&self) -> &ReactiveStore {
        &self.store
    }

    pub fn outputs(&self) -> Vec<OutputInfo> {
        self.slots
            .iter()
            .map(|slot| OutputInfo {
                name: slot.binding.name(),
                kind: slot.binding.kind(),
                deps: slot.cache.deps().to_vec(),
            })
            .collect()
    }

    /// Apply one input event; returns the outputs that must be re-rendered
    pub fn set_input(&mut self, name: &str, value: InputValue) -> Result<Vec<&'static str>> {
        let change = self.store.set_input(name, value)?;
        Ok(self.invalidated_outputs(&change))
    }

    /// Parse `raw` as the widget's textual value, then apply it
    pub fn set_input_str(&mut self, name: &str, raw: &str) -> Result<Vec<&'static str>> {
        let input: InputName = name.parse()?;
        let value = InputValue::parse(input, raw)?;
        let change = self.store.set(input, value)?;
        Ok(self.invalidated_outputs(&change))
    }

    pub fn get_input(&self, name: &str) -> Result<&InputValue> {
        self.store.get_input(name)
    }

    fn invalidated_outputs(&self, change: &InputChange) -> Vec<&'static str> {
        if !change.changed {
            return Vec::new();
        }
        let view_invalidated = change.invalidated.contains(&DerivationId::FilteredView);
        self.slots
            .iter()
            .filter(|slot| view_invalidated || slot.binding.reads().contains(&change.name))
            .map(|slot| slot.binding.name())
            .collect()
    }

    /// Artifact for the output called `name`, rendered only if its inputs moved
    pub fn render(&mut self, name: &str) -> Result<Rc<RenderArtifact>> {
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.binding.name() == name)
            .ok_or_else(|| DashError::UnknownOutput(name.to_string()))?;

        let store = &self.store;
        let binding = &slot.binding;
        slot.cache
            .try_get_or_compute(store.versions(), || binding.render(store))
    }

    /// Render every slot in order; a failing slot does not stop the others
    pub fn render_all(&mut self) -> Vec<(&'static str, Result<Rc<RenderArtifact>>)> {
        let names: Vec<&'static str> = self.slots.iter().map(|slot| slot.binding.name()).collect();
        names
            .into_iter()
            .map(|name| (name, self.render(name)))
            .collect()
    }

    /// Number of times the output called `name` has been rendered
    pub fn render_count(&self, name: &str) -> Option<u64> {
        self.slots
            .iter()
            .find(|slot| slot.binding.name() == name)
            .map(|slot| slot.cache.computations())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard() -> Dashboard {
        Dashboard::new(Dataset::palmer_sample())
    }

    #[test]
    fn test_outputs_in_slot_order() {
        let names: Vec<_> = dashboard().outputs().iter().map(|o| o.name).collect();
        assert_eq!(
            names,
            vec![
                "penguins_dataTable",
                "penguins_dataGrid",
                "plotly",
                "plotHistogram",
                "plotly_scatterplot"
            ]
        );
    }

    #[test]
    fn test_output_deps_include_filter_inputs() {
        let outputs = dashboard().outputs();
        let plotly = outputs.iter().find(|o| o.name == "plotly").unwrap();
        assert_eq!(plotly.kind, OutputKind::InteractiveChart);
        assert!(plotly.deps.contains(&InputName::PlotlyBinCount));
        assert!(plotly.deps.contains(&InputName::IslandList));
        assert!(!plotly.deps.contains(&InputName::SeabornBinCount));
    }

    #[test]
    fn test_bin_count_invalidates_only_its_chart() {
        let mut dash = dashboard();
        assert_eq!(dash.set_input_str("plotly_bin_count", "5").unwrap(), vec!["plotly"]);
        assert_eq!(dash.set_input_str("seaborn_bin_count", "20").unwrap(), vec!["plotHistogram"]);
    }

    #[test]
    fn test_attribute_invalidates_charts() {
        let mut dash = dashboard();
        let stale = dash.set_input_str("selectized_attribute", "body_mass_g").unwrap();
        assert_eq!(stale, vec!["plotly", "plotHistogram", "plotly_scatterplot"]);
    }

    #[test]
    fn test_filter_change_invalidates_everything() {
        let mut dash = dashboard();
        let stale = dash.set_input_str("island_list", "Biscoe").unwrap();
        assert_eq!(stale.len(), 5);
        assert!(dash.set_input_str("island_list", "Biscoe").unwrap().is_empty());
    }

    #[test]
    fn test_render_is_memoized_per_output() {
        let mut dash = dashboard();
        for (name, result) in dash.render_all() {
            assert!(result.is_ok(), "{} failed", name);
        }

        dash.set_input_str("seaborn_bin_count", "10").unwrap();
        dash.render_all();

        assert_eq!(dash.render_count("plotHistogram"), Some(2));
        assert_eq!(dash.render_count("plotly"), Some(1));
        assert_eq!(dash.render_count("penguins_dataTable"), Some(1));
        assert_eq!(dash.store().recompute_count(), 1);
    }

    #[test]
    fn test_failing_slot_does_not_block_others() {
        let mut dash = dashboard();
        dash.set_input_str("seaborn_bin_count", "0").unwrap();

        let results = dash.render_all();
        for (name, result) in &results {
            if *name == "plotHistogram" {
                assert!(matches!(result, Err(DashError::Render { .. })));
            } else {
                assert!(result.is_ok(), "{} failed", name);
            }
        }
    }

    #[test]
    fn test_unknown_output() {
        let mut dash = dashboard();
        assert_eq!(
            dash.render("penguins_chart").unwrap_err(),
            DashError::UnknownOutput("penguins_chart".into())
        );
        assert_eq!(dash.render_count("penguins_chart"), None);
    }

    #[test]
    fn test_rejected_input_changes_nothing() {
        let mut dash = dashboard();
        dash.render_all();

        assert!(dash.set_input_str("plotly_bin_count", "21").is_err());
        assert!(dash.set_input_str("colour", "red").is_err());
        assert_eq!(dash.get_input("plotly_bin_count"), Ok(&InputValue::Count(10)));

        dash.render_all();
        assert_eq!(dash.render_count("plotly"), Some(1));
    }
}
