//! Immutable base dataset
//!
//! The dataset is loaded once at startup and shared read-only for the lifetime
//! of the process. Cloning a `Dataset` clones a handle, not the rows; the
//! handle is single-threaded like the rest of the store.

use crate::types::{Island, Record, Sex, Species};
use std::rc::Rc;

/// Ordered, immutable sequence of records
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Rc<[Record]>,
}

impl Dataset {
    /// Wrap a set of records; their order is preserved by every derived view
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// A sample of the Palmer penguins dataset
    ///
    /// Covers every species/island pairing that occurs in the full dataset,
    /// including the rows whose measurements were never recorded.
    pub fn palmer_sample() -> Self {
        use Island::*;
        use Sex::*;
        use Species::*;

        let measured = |species, island, year, m: (f64, f64, f64, f64), sex| {
            Record::new(species, island, year)
                .with_measurements(m.0, m.1, m.2, m.3)
                .with_sex(sex)
        };

        Self::new(vec![
            measured(Adelie, Torgersen, 2007, (39.1, 18.7, 181.0, 3750.0), Male),
            measured(Adelie, Torgersen, 2007, (39.5, 17.4, 186.0, 3800.0), Female),
            measured(Adelie, Torgersen, 2007, (40.3, 18.0, 195.0, 3250.0), Female),
            Record::new(Adelie, Torgersen, 2007),
            measured(Adelie, Torgersen, 2007, (36.7, 19.3, 193.0, 3450.0), Female),
            measured(Adelie, Torgersen, 2007, (39.3, 20.6, 190.0, 3650.0), Male),
            measured(Adelie, Biscoe, 2007, (37.8, 18.3, 174.0, 3400.0), Female),
            measured(Adelie, Biscoe, 2007, (37.7, 18.7, 180.0, 3600.0), Male),
            measured(Adelie, Biscoe, 2008, (35.9, 19.2, 189.0, 3800.0), Female),
            measured(Adelie, Dream, 2007, (39.5, 16.7, 178.0, 3250.0), Female),
            measured(Adelie, Dream, 2007, (37.2, 18.1, 178.0, 3900.0), Male),
            measured(Adelie, Dream, 2008, (39.6, 18.8, 190.0, 4600.0), Male),
            measured(Gentoo, Biscoe, 2007, (46.1, 13.2, 211.0, 4500.0), Female),
            measured(Gentoo, Biscoe, 2007, (50.0, 16.3, 230.0, 5700.0), Male),
            measured(Gentoo, Biscoe, 2007, (48.7, 14.1, 210.0, 4450.0), Female),
            measured(Gentoo, Biscoe, 2008, (50.0, 15.2, 218.0, 5700.0), Male),
            measured(Gentoo, Biscoe, 2009, (47.6, 14.5, 215.0, 5400.0), Male),
            Record::new(Gentoo, Biscoe, 2009),
            measured(Chinstrap, Dream, 2007, (46.5, 17.9, 192.0, 3500.0), Female),
            measured(Chinstrap, Dream, 2007, (50.0, 19.5, 196.0, 3900.0), Male),
            measured(Chinstrap, Dream, 2008, (51.3, 19.2, 193.0, 3650.0), Male),
            measured(Chinstrap, Dream, 2009, (45.4, 18.7, 188.0, 3525.0), Female),
        ])
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_covers_every_species_and_island() {
        let dataset = Dataset::palmer_sample();
        for species in Species::ALL {
            assert!(dataset.records().iter().any(|r| r.species == species));
        }
        for island in Island::ALL {
            assert!(dataset.records().iter().any(|r| r.island == island));
        }
    }

    #[test]
    fn test_sample_contains_missing_measurements() {
        let dataset = Dataset::palmer_sample();
        assert!(dataset
            .records()
            .iter()
            .any(|r| r.body_mass_g.is_none() && r.sex.is_none()));
    }

    #[test]
    fn test_clone_shares_rows() {
        let dataset = Dataset::palmer_sample();
        let handle = dataset.clone();
        assert!(std::ptr::eq(dataset.records(), handle.records()));
        assert_eq!(Rc::strong_count(&dataset.records), 2);
    }
}
