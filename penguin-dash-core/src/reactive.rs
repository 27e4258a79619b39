//! Reactive store: Input State plus memoized derivations
//!
//! Dependencies are declared explicitly. Each derivation lists the inputs it
//! reads, and each input carries a version counter that moves only when its
//! value actually changes. A derivation remembers the versions it last saw and
//! is stale exactly when one of them has moved since.
//!
//! Derivations are pull-based: `set_input` never recomputes anything, it only
//! makes the next read of an affected derivation recompute.

use crate::dataset::Dataset;
use crate::input::{InputName, InputState, InputValue};
use crate::types::{Island, Record, Result, Species};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::rc::Rc;

/// Per-input version counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputVersions {
    versions: [u64; 5],
}

impl InputVersions {
    pub fn get(&self, name: InputName) -> u64 {
        self.versions[name.index()]
    }

    fn bump(&mut self, name: InputName) {
        self.versions[name.index()] += 1;
    }

    fn snapshot(&self, deps: &[InputName]) -> Vec<u64> {
        deps.iter().map(|name| self.get(*name)).collect()
    }
}

/// A cached value with a static dependency list
#[derive(Debug)]
pub struct Memo<T> {
    label: &'static str,
    deps: Vec<InputName>,
    seen: Option<Vec<u64>>,
    value: Option<Rc<T>>,
    computations: u64,
}

impl<T> Memo<T> {
    pub fn new(deps: impl IntoIterator<Item = InputName>) -> Self {
        let mut deps: Vec<InputName> = deps.into_iter().collect();
        deps.sort();
        deps.dedup();
        Self {
            label: "memo",
            deps,
            seen: None,
            value: None,
            computations: 0,
        }
    }

    /// Builder method: name used when logging cache hits and recomputations
    pub fn named(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn deps(&self) -> &[InputName] {
        &self.deps
    }

    pub fn depends_on(&self, name: InputName) -> bool {
        self.deps.binary_search(&name).is_ok()
    }

    /// True when there is no cached value for the current dependency versions
    pub fn is_stale(&self, versions: &InputVersions) -> bool {
        match &self.seen {
            Some(seen) => self
                .deps
                .iter()
                .zip(seen)
                .any(|(name, seen)| versions.get(*name) != *seen),
            None => true,
        }
    }

    /// Return the cached value, recomputing it first if it is stale
    pub fn get_or_compute(&mut self, versions: &InputVersions, compute: impl FnOnce() -> T) -> Rc<T> {
        self.try_get_or_compute::<Infallible>(versions, || Ok(compute()))
            .unwrap_or_else(|never| match never {})
    }

    /// Like `get_or_compute`, for computations that can fail
    ///
    /// A failed computation leaves the memo stale, so the next read retries.
    pub fn try_get_or_compute<E>(
        &mut self,
        versions: &InputVersions,
        compute: impl FnOnce() -> std::result::Result<T, E>,
    ) -> std::result::Result<Rc<T>, E> {
        if !self.is_stale(versions) {
            if let Some(value) = &self.value {
                log::trace!("{} cache hit", self.label);
                return Ok(Rc::clone(value));
            }
        }

        log::debug!("{} recomputing", self.label);
        self.computations += 1;
        let value = Rc::new(compute()?);
        self.seen = Some(versions.snapshot(&self.deps));
        self.value = Some(Rc::clone(&value));
        Ok(value)
    }

    /// Number of times the value has been (re)computed
    pub fn computations(&self) -> u64 {
        self.computations
    }
}

/// Derivations the store maintains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivationId {
    FilteredView,
}

impl DerivationId {
    pub const ALL: [DerivationId; 1] = [DerivationId::FilteredView];

    /// Inputs the derivation reads
    pub fn deps(&self) -> &'static [InputName] {
        match self {
            DerivationId::FilteredView => &[InputName::SelectedSpeciesList, InputName::IslandList],
        }
    }

    /// Derivations that read `name`
    pub fn dependents_of(name: InputName) -> impl Iterator<Item = DerivationId> {
        DerivationId::ALL
            .into_iter()
            .filter(move |derivation| derivation.deps().contains(&name))
    }
}

impl fmt::Display for DerivationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DerivationId::FilteredView => write!(f, "filtered_view"),
        }
    }
}

/// Outcome of an accepted `set_input`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputChange {
    pub name: InputName,
    /// False when the new value equals the stored one
    pub changed: bool,
    /// Derivations whose cache no longer matches the Input State
    pub invalidated: Vec<DerivationId>,
}

/// Records matching the current species and island selections, in dataset order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilteredView {
    records: Vec<Record>,
}

impl FilteredView {
    /// Scan `dataset` once, keeping records whose species and island are both selected
    pub fn compute(
        dataset: &Dataset,
        species: &BTreeSet<Species>,
        islands: &BTreeSet<Island>,
    ) -> Self {
        let records = dataset
            .records()
            .iter()
            .filter(|record| species.contains(&record.species) && islands.contains(&record.island))
            .copied()
            .collect();
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Holds the dataset, the Input State and the cached derivations
pub struct ReactiveStore {
    dataset: Dataset,
    inputs: InputState,
    versions: InputVersions,
    filtered: RefCell<Memo<FilteredView>>,
}

impl ReactiveStore {
    /// Create a store over `dataset` with every input at its default
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            inputs: InputState::new(),
            versions: InputVersions::default(),
            filtered: RefCell::new(
                Memo::new(DerivationId::FilteredView.deps().iter().copied()).named("filtered_view"),
            ),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn inputs(&self) -> &InputState {
        &self.inputs
    }

    pub fn versions(&self) -> &InputVersions {
        &self.versions
    }

    /// Validate and store a new value for the input called `name`
    ///
    /// Nothing is recomputed here; derivations reading `name` become stale and
    /// are recomputed on their next read.
    pub fn set_input(&mut self, name: &str, value: InputValue) -> Result<InputChange> {
        let name: InputName = name.parse()?;
        self.set(name, value)
    }

    /// Typed form of `set_input`
    pub fn set(&mut self, name: InputName, value: InputValue) -> Result<InputChange> {
        let changed = self.inputs.set(name, value).map_err(|e| {
            log::warn!("Rejected value for {}: {}", name, e);
            e
        })?;

        if !changed {
            log::trace!("{} set to its current value, nothing invalidated", name);
            return Ok(InputChange {
                name,
                changed,
                invalidated: Vec::new(),
            });
        }

        self.versions.bump(name);
        let invalidated: Vec<DerivationId> = DerivationId::dependents_of(name).collect();
        log::debug!(
            "{} = {} (version {}), invalidated {:?}",
            name,
            self.inputs.get(name),
            self.versions.get(name),
            invalidated
        );

        Ok(InputChange {
            name,
            changed,
            invalidated,
        })
    }

    /// Current value of the input called `name`
    pub fn get_input(&self, name: &str) -> Result<&InputValue> {
        let name: InputName = name.parse()?;
        Ok(self.inputs.get(name))
    }

    /// The current Filtered View, recomputed only if the selections changed
    pub fn get_filtered_view(&self) -> Rc<FilteredView> {
        self.filtered.borrow_mut().get_or_compute(&self.versions, || {
            let view = FilteredView::compute(
                &self.dataset,
                self.inputs.species(),
                self.inputs.islands(),
            );
            log::debug!(
                "filtered_view recomputed: {} of {} records",
                view.len(),
                self.dataset.len()
            );
            view
        })
    }

    /// Whether `derivation` would recompute on its next read
    pub fn is_stale(&self, derivation: DerivationId) -> bool {
        match derivation {
            DerivationId::FilteredView => self.filtered.borrow().is_stale(&self.versions),
        }
    }

    /// Number of times the Filtered View has been computed
    pub fn recompute_count(&self) -> u64 {
        self.filtered.borrow().computations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Attribute;

    fn store() -> ReactiveStore {
        ReactiveStore::new(Dataset::palmer_sample())
    }

    #[test]
    fn test_memo_tracks_only_declared_deps() {
        let mut versions = InputVersions::default();
        let mut memo: Memo<u32> = Memo::new([InputName::IslandList]);

        assert!(memo.is_stale(&versions));
        assert_eq!(*memo.get_or_compute(&versions, || 1), 1);
        assert!(!memo.is_stale(&versions));

        versions.bump(InputName::PlotlyBinCount);
        assert!(!memo.is_stale(&versions));
        assert_eq!(*memo.get_or_compute(&versions, || 2), 1);

        versions.bump(InputName::IslandList);
        assert!(memo.is_stale(&versions));
        assert_eq!(*memo.get_or_compute(&versions, || 3), 3);
        assert_eq!(memo.computations(), 2);
    }

    #[test]
    fn test_failed_computation_stays_stale() {
        let versions = InputVersions::default();
        let mut memo: Memo<u32> = Memo::new([InputName::SeabornBinCount]);

        let result: std::result::Result<_, &str> = memo.try_get_or_compute(&versions, || Err("boom"));
        assert!(result.is_err());
        assert!(memo.is_stale(&versions));

        let value: std::result::Result<_, &str> = memo.try_get_or_compute(&versions, || Ok(7));
        assert_eq!(*value.unwrap(), 7);
    }

    #[test]
    fn test_named_memo_hit_skips_computation() {
        let versions = InputVersions::default();
        let mut memo: Memo<u32> = Memo::new([InputName::IslandList]).named("islands");
        assert_eq!(memo.label(), "islands");

        let mut calls = 0;
        for _ in 0..3 {
            memo.get_or_compute(&versions, || {
                calls += 1;
                calls
            });
        }
        assert_eq!(calls, 1);
        assert_eq!(memo.computations(), 1);
    }

    #[test]
    fn test_memo_dedups_deps() {
        let memo: Memo<()> = Memo::new([InputName::IslandList, InputName::IslandList]);
        assert_eq!(memo.deps(), &[InputName::IslandList]);
        assert!(memo.depends_on(InputName::IslandList));
        assert!(!memo.depends_on(InputName::SelectizedAttribute));
    }

    #[test]
    fn test_dependency_map() {
        let readers: Vec<_> = DerivationId::dependents_of(InputName::SelectedSpeciesList).collect();
        assert_eq!(readers, vec![DerivationId::FilteredView]);
        assert_eq!(DerivationId::dependents_of(InputName::SeabornBinCount).count(), 0);
    }

    #[test]
    fn test_first_read_computes_once() {
        let store = store();
        assert_eq!(store.recompute_count(), 0);
        let first = store.get_filtered_view();
        let second = store.get_filtered_view();
        assert_eq!(store.recompute_count(), 1);
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(first.len(), store.dataset().len());
    }

    #[test]
    fn test_unchanged_value_does_not_invalidate() {
        let mut store = store();
        store.get_filtered_view();

        let all_species = InputName::SelectedSpeciesList.default_value();
        let change = store.set_input("selected_species_list", all_species).unwrap();
        assert!(!change.changed);
        assert!(change.invalidated.is_empty());
        assert!(!store.is_stale(DerivationId::FilteredView));
    }

    #[test]
    fn test_attribute_change_reports_no_invalidation() {
        let mut store = store();
        let change = store
            .set_input("selectized_attribute", InputValue::Attribute(Attribute::BodyMassG))
            .unwrap();
        assert!(change.changed);
        assert!(change.invalidated.is_empty());
        assert_eq!(store.versions().get(InputName::SelectizedAttribute), 1);
    }

    #[test]
    fn test_set_input_is_lazy() {
        let mut store = store();
        store.get_filtered_view();
        store
            .set_input("island_list", InputValue::parse(InputName::IslandList, "Dream").unwrap())
            .unwrap();
        assert!(store.is_stale(DerivationId::FilteredView));
        assert_eq!(store.recompute_count(), 1);

        let view = store.get_filtered_view();
        assert_eq!(store.recompute_count(), 2);
        assert!(view.records().iter().all(|r| r.island == Island::Dream));
    }
}
