//! Penguin Dashboard Core Library
//!
//! The reactive core of an interactive data-exploration dashboard over the
//! Palmer penguins measurements.
//!
//! # Architecture
//!
//! - [`ReactiveStore`] holds the immutable dataset and the current value of
//!   each named input, and derives the Filtered View on demand. The view is
//!   memoized on per-input version counters and is recomputed only after the
//!   species or island selection actually changed.
//! - Render bindings ([`RenderBinding`]) turn the Filtered View and a few raw
//!   inputs into table and chart artifacts. They are pure and never mutate
//!   the store.
//! - [`Dashboard`] pairs the store with its output slots. It reports which
//!   outputs each input event invalidates and caches every slot's artifact.
//!
//! The library does NOT draw anything, schedule redraws on its own, or load
//! the dataset from disk. That is the hosting runtime's job (see
//! `penguin-dash-cli`).
//!
//! # Example Usage
//!
//! ```
//! use penguin_dash_core::{Dashboard, Dataset, InputValue};
//!
//! let mut dashboard = Dashboard::new(Dataset::palmer_sample());
//!
//! // A user unticks two islands
//! let stale = dashboard.set_input_str("island_list", "Dream").unwrap();
//! assert_eq!(stale.len(), 5);
//!
//! // A bin count change only touches its own chart
//! let stale = dashboard.set_input("plotly_bin_count", InputValue::Count(5)).unwrap();
//! assert_eq!(stale, vec!["plotly"]);
//!
//! for (name, artifact) in dashboard.render_all() {
//!     match artifact {
//!         Ok(artifact) => println!("{}: {:?}", name, artifact),
//!         Err(e) => eprintln!("{}: {}", name, e),
//!     }
//! }
//! ```

pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod input;
pub mod reactive;
pub mod render;
pub mod types;

// Re-export main types for convenience
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, OutputInfo};
pub use dataset::Dataset;
pub use input::{InputDomain, InputName, InputState, InputValue};
pub use reactive::{DerivationId, FilteredView, InputChange, Memo, ReactiveStore};
pub use render::{
    Cell, CountSeries, HistogramArtifact, OutputKind, PointSeries, RenderArtifact,
    RenderBinding, ScatterArtifact, TableArtifact, TableStyle,
};
pub use types::{Attribute, DashError, Island, Record, Result, Sex, Species};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: a fresh store shows the whole dataset
        let store = ReactiveStore::new(Dataset::palmer_sample());
        assert_eq!(store.get_filtered_view().len(), store.dataset().len());
    }
}
