//! Artifact display
//!
//! Draws render artifacts as plain text for the terminal, or serializes them
//! as JSON for other tools.

use crate::config::OutputFormat;
use penguin_dash_core::{HistogramArtifact, OutputKind, RenderArtifact, ScatterArtifact, TableArtifact};
use serde::Serialize;
use std::io::{self, Write};

const BAR_WIDTH: u64 = 40;

#[derive(Serialize)]
struct JsonOutput<'a> {
    output: &'a str,
    kind: OutputKind,
    artifact: &'a RenderArtifact,
}

/// Write one output slot's artifact in the requested format
pub fn write_artifact(
    out: &mut impl Write,
    format: OutputFormat,
    name: &str,
    kind: OutputKind,
    artifact: &RenderArtifact,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let json = JsonOutput {
                output: name,
                kind,
                artifact,
            };
            serde_json::to_writer(&mut *out, &json)?;
            writeln!(out)
        }
        OutputFormat::Text => {
            writeln!(out, "── {} ({}) ──", name, kind)?;
            match artifact {
                RenderArtifact::Table(table) => write_table(out, table),
                RenderArtifact::Histogram(hist) => write_histogram(out, hist),
                RenderArtifact::Scatter(scatter) => write_scatter(out, scatter),
            }?;
            writeln!(out)
        }
    }
}

/// Write the error state shown in place of an output that failed to render
pub fn write_error(out: &mut impl Write, format: OutputFormat, name: &str, error: &str) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({ "output": name, "error": error });
            serde_json::to_writer(&mut *out, &json)?;
            writeln!(out)
        }
        OutputFormat::Text => writeln!(out, "── {} ──\n  ✗ {}\n", name, error),
    }
}

fn write_table(out: &mut impl Write, table: &TableArtifact) -> io::Result<()> {
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();

    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.len()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let line = |values: &[String]| {
        values
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{:<width$}", value, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    writeln!(out, "{}", line(&table.columns))?;
    writeln!(
        out,
        "{}",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-")
    )?;
    for row in &cells {
        writeln!(out, "{}", line(row))?;
    }
    writeln!(out, "({} rows)", cells.len())
}

fn write_histogram(out: &mut impl Write, hist: &HistogramArtifact) -> io::Result<()> {
    writeln!(out, "{}  [x: {}, y: {}]", hist.title, hist.x_label, hist.y_label)?;
    if hist.bin_count() == 0 {
        return writeln!(out, "  (no values)");
    }

    let totals: Vec<u64> = (0..hist.bin_count())
        .map(|bin| hist.series.iter().map(|s| s.counts[bin]).sum())
        .collect();
    let max = totals.iter().copied().max().unwrap_or(0).max(1);

    for (bin, total) in totals.iter().enumerate() {
        let breakdown = if hist.series.len() > 1 {
            hist.series
                .iter()
                .map(|s| format!("{} {}", s.label, s.counts[bin]))
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            total.to_string()
        };
        let bar = "#".repeat((total * BAR_WIDTH / max) as usize);
        writeln!(
            out,
            "  {:>9.2} – {:<9.2} |{:<width$}| {}",
            hist.edges[bin],
            hist.edges[bin + 1],
            bar,
            breakdown,
            width = BAR_WIDTH as usize
        )?;
    }
    Ok(())
}

fn write_scatter(out: &mut impl Write, scatter: &ScatterArtifact) -> io::Result<()> {
    writeln!(out, "{}  [x: {}, y: {}]", scatter.title, scatter.x_label, scatter.y_label)?;
    if scatter.series.is_empty() {
        return writeln!(out, "  (no points)");
    }
    for series in &scatter.series {
        let points = series
            .points
            .iter()
            .map(|[x, y]| format!("({}, {})", x, y))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "  {} ({} points): {}", series.label, series.points.len(), points)?;
    }
    Ok(())
}
