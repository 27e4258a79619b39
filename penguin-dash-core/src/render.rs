//! Render bindings and the artifacts they produce
//!
//! A binding is a pure function of the Filtered View and a few raw inputs. It
//! never mutates the store, so invoking it twice on the same state yields the
//! same artifact. How an artifact is drawn is up to the hosting runtime; the
//! artifacts carry the data plus the titles and axis labels of each chart.

use crate::input::InputName;
use crate::reactive::{FilteredView, ReactiveStore};
use crate::types::{Attribute, DashError, Record, Result, Species};
use serde::Serialize;
use std::fmt;

/// Display widget family the runtime should pick for an output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    Tabular,
    InteractiveChart,
    StaticImage,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputKind::Tabular => write!(f, "tabular"),
            OutputKind::InteractiveChart => write!(f, "interactive-chart"),
            OutputKind::StaticImage => write!(f, "static-image"),
        }
    }
}

/// Something a binding produced for display in its slot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderArtifact {
    Table(TableArtifact),
    Histogram(HistogramArtifact),
    Scatter(ScatterArtifact),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStyle {
    /// Sortable table with a filter row
    DataTable,
    /// Spreadsheet-like grid
    DataGrid,
}

/// One table cell; `Missing` serializes as `null`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    Integer(i64),
    Missing,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Number(value) => write!(f, "{}", value),
            Cell::Integer(value) => write!(f, "{}", value),
            Cell::Missing => f.write_str("NaN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableArtifact {
    pub style: TableStyle,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

const TABLE_COLUMNS: [&str; 8] = [
    "species",
    "island",
    "bill_length_mm",
    "bill_depth_mm",
    "flipper_length_mm",
    "body_mass_g",
    "sex",
    "year",
];

impl TableArtifact {
    fn from_view(style: TableStyle, view: &FilteredView) -> Self {
        let number = |value: Option<f64>| value.map_or(Cell::Missing, Cell::Number);
        let rows = view
            .records()
            .iter()
            .map(|record| {
                vec![
                    Cell::Text(record.species.to_string()),
                    Cell::Text(record.island.to_string()),
                    number(record.bill_length_mm),
                    number(record.bill_depth_mm),
                    number(record.flipper_length_mm),
                    number(record.body_mass_g),
                    record.sex.map_or(Cell::Missing, |sex| Cell::Text(sex.to_string())),
                    Cell::Integer(i64::from(record.year)),
                ]
            })
            .collect();

        Self {
            style,
            columns: TABLE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }
}

/// Bin counts for one colored group of a histogram
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountSeries {
    pub label: String,
    pub counts: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramArtifact {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    /// Bin edges; bin `i` spans `edges[i]..edges[i + 1]`, the last bin is closed
    pub edges: Vec<f64>,
    pub series: Vec<CountSeries>,
}

impl HistogramArtifact {
    pub fn bin_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    /// Number of values counted across all series
    pub fn total(&self) -> u64 {
        self.series.iter().flat_map(|s| s.counts.iter()).sum()
    }
}

/// Points of one colored group of a scatterplot, as `[x, y]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointSeries {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterArtifact {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<PointSeries>,
}

/// Equal-width bin edges spanning the range of `values`
///
/// A degenerate range (all values equal) is widened to one unit so every
/// value still lands in a bin. No values means no bins.
pub fn equal_width_edges(values: &[f64], bins: usize) -> Vec<f64> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    (0..=bins)
        .map(|i| if i == bins { hi } else { lo + width * i as f64 })
        .collect()
}

/// Index of the bin containing `value`, judged against the reported edges
///
/// Values on the upper edge go in the last bin.
fn bin_index(value: f64, edges: &[f64]) -> usize {
    let bins = edges.len() - 1;
    edges[1..bins].partition_point(|edge| *edge <= value).min(bins - 1)
}

fn count_into(values: impl Iterator<Item = f64>, edges: &[f64]) -> Vec<u64> {
    let mut counts = vec![0; edges.len().saturating_sub(1)];
    if counts.is_empty() {
        return counts;
    }
    for value in values {
        counts[bin_index(value, edges)] += 1;
    }
    counts
}

/// Species present in `records`, in order of first appearance
fn species_in_order(records: &[Record]) -> Vec<Species> {
    let mut seen = Vec::new();
    for record in records {
        if !seen.contains(&record.species) {
            seen.push(record.species);
        }
    }
    seen
}

fn bin_count(output: &str, input: InputName, count: i64) -> Result<usize> {
    match usize::try_from(count) {
        Ok(bins) if bins > 0 => Ok(bins),
        _ => Err(DashError::render(
            output,
            format!("{} must be a positive bin count, got {}", input, count),
        )),
    }
}

/// A named producer of one output slot
pub trait RenderBinding {
    /// Stable slot name the UI displays the artifact under
    fn name(&self) -> &'static str;

    fn kind(&self) -> OutputKind;

    /// Raw inputs read in addition to the Filtered View
    fn reads(&self) -> &'static [InputName];

    fn render(&self, store: &ReactiveStore) -> Result<RenderArtifact>;
}

/// `penguins_dataTable`: the Filtered View as a data table
pub struct DataTableBinding;

impl RenderBinding for DataTableBinding {
    fn name(&self) -> &'static str {
        "penguins_dataTable"
    }

    fn kind(&self) -> OutputKind {
        OutputKind::Tabular
    }

    fn reads(&self) -> &'static [InputName] {
        &[]
    }

    fn render(&self, store: &ReactiveStore) -> Result<RenderArtifact> {
        let view = store.get_filtered_view();
        Ok(RenderArtifact::Table(TableArtifact::from_view(TableStyle::DataTable, &view)))
    }
}

/// `penguins_dataGrid`: the Filtered View as a data grid
pub struct DataGridBinding;

impl RenderBinding for DataGridBinding {
    fn name(&self) -> &'static str {
        "penguins_dataGrid"
    }

    fn kind(&self) -> OutputKind {
        OutputKind::Tabular
    }

    fn reads(&self) -> &'static [InputName] {
        &[]
    }

    fn render(&self, store: &ReactiveStore) -> Result<RenderArtifact> {
        let view = store.get_filtered_view();
        Ok(RenderArtifact::Table(TableArtifact::from_view(TableStyle::DataGrid, &view)))
    }
}

/// `plotly`: interactive histogram of the selected attribute, colored by species
pub struct PlotlyHistogramBinding;

impl RenderBinding for PlotlyHistogramBinding {
    fn name(&self) -> &'static str {
        "plotly"
    }

    fn kind(&self) -> OutputKind {
        OutputKind::InteractiveChart
    }

    fn reads(&self) -> &'static [InputName] {
        &[InputName::SelectizedAttribute, InputName::PlotlyBinCount]
    }

    fn render(&self, store: &ReactiveStore) -> Result<RenderArtifact> {
        let attribute = store.inputs().attribute();
        let bins = bin_count(
            self.name(),
            InputName::PlotlyBinCount,
            store.inputs().plotly_bin_count(),
        )?;
        let view = store.get_filtered_view();

        let values: Vec<f64> = view.records().iter().filter_map(|r| attribute.value(r)).collect();
        let edges = equal_width_edges(&values, bins);
        let series = species_in_order(view.records())
            .into_iter()
            .map(|species| CountSeries {
                label: species.to_string(),
                counts: count_into(
                    view.records()
                        .iter()
                        .filter(|r| r.species == species)
                        .filter_map(|r| attribute.value(r)),
                    &edges,
                ),
            })
            .collect();

        Ok(RenderArtifact::Histogram(HistogramArtifact {
            title: "Plotly Histogram".to_string(),
            x_label: attribute.as_str().to_string(),
            y_label: "Count".to_string(),
            alt_text: None,
            edges,
            series,
        }))
    }
}

/// `plotHistogram`: static histogram of the selected attribute
pub struct SeabornHistogramBinding;

impl RenderBinding for SeabornHistogramBinding {
    fn name(&self) -> &'static str {
        "plotHistogram"
    }

    fn kind(&self) -> OutputKind {
        OutputKind::StaticImage
    }

    fn reads(&self) -> &'static [InputName] {
        &[InputName::SelectizedAttribute, InputName::SeabornBinCount]
    }

    fn render(&self, store: &ReactiveStore) -> Result<RenderArtifact> {
        let attribute = store.inputs().attribute();
        let bins = bin_count(
            self.name(),
            InputName::SeabornBinCount,
            store.inputs().seaborn_bin_count(),
        )?;
        let view = store.get_filtered_view();

        let values: Vec<f64> = view.records().iter().filter_map(|r| attribute.value(r)).collect();
        let edges = equal_width_edges(&values, bins);
        let counts = count_into(values.iter().copied(), &edges);

        Ok(RenderArtifact::Histogram(HistogramArtifact {
            title: "Palmer Penguins".to_string(),
            x_label: attribute.as_str().to_string(),
            y_label: "Count".to_string(),
            alt_text: Some("A Seaborn histogram on penguin body mass in grams.".to_string()),
            edges,
            series: vec![CountSeries {
                label: "Count".to_string(),
                counts,
            }],
        }))
    }
}

/// `plotly_scatterplot`: selected attribute against body mass, colored by species
pub struct ScatterplotBinding;

impl RenderBinding for ScatterplotBinding {
    fn name(&self) -> &'static str {
        "plotly_scatterplot"
    }

    fn kind(&self) -> OutputKind {
        OutputKind::InteractiveChart
    }

    fn reads(&self) -> &'static [InputName] {
        &[InputName::SelectizedAttribute]
    }

    fn render(&self, store: &ReactiveStore) -> Result<RenderArtifact> {
        let x = store.inputs().attribute();
        let y = Attribute::BodyMassG;
        let view = store.get_filtered_view();

        let series = species_in_order(view.records())
            .into_iter()
            .map(|species| PointSeries {
                label: species.to_string(),
                points: view
                    .records()
                    .iter()
                    .filter(|r| r.species == species)
                    .filter_map(|r| Some([x.value(r)?, y.value(r)?]))
                    .collect(),
            })
            .collect();

        Ok(RenderArtifact::Scatter(ScatterArtifact {
            title: "Scatterplot".to_string(),
            x_label: x.label().to_string(),
            y_label: y.label().to_string(),
            series,
        }))
    }
}

/// The dashboard's bindings, in slot order
pub fn default_bindings() -> Vec<Box<dyn RenderBinding>> {
    vec![
        Box::new(DataTableBinding),
        Box::new(DataGridBinding),
        Box::new(PlotlyHistogramBinding),
        Box::new(SeabornHistogramBinding),
        Box::new(ScatterplotBinding),
    ]
}
