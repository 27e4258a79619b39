//! Penguin Dashboard CLI Application
//!
//! This is the command-line host for the penguin dashboard. It uses the
//! penguin-dash-core library and adds:
//! - Configuration loading (TOML)
//! - Input events from flags or an interactive prompt
//! - Re-rendering of the outputs each event invalidates
//! - Text and JSON display of artifacts

use anyhow::{Context, Result};
use clap::Parser;
use penguin_dash_core::{Dashboard, Dataset};
use std::io;
use std::path::PathBuf;

mod config;
mod report;
mod session;

use config::{AppConfig, OutputFormat};
use session::Session;

/// Penguin Dashboard - explore the Palmer penguins measurements
#[derive(Parser, Debug)]
#[command(name = "penguin-dash")]
#[command(about = "Filter the Palmer penguins data and render its tables and charts", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (dashboard.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Set an input before rendering (can be repeated), e.g. island_list=Dream,Biscoe
    #[arg(short, long, value_name = "NAME=VALUE", value_parser = parse_assignment)]
    set: Vec<(String, String)>,

    /// Output to render (can be repeated; default: all)
    #[arg(short, long, value_name = "OUTPUT")]
    render: Vec<String>,

    /// Output format (overrides the config file)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Read commands from stdin after the initial render
    #[arg(short, long)]
    interactive: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn parse_assignment(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got `{}`", raw))
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Penguin Dashboard CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using dashboard library v{}", penguin_dash_core::VERSION);

    let config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };
    let format = args.format.unwrap_or(config.output.format);

    let mut dashboard = Dashboard::new(Dataset::palmer_sample());
    config
        .dashboard
        .apply(&mut dashboard)
        .context("Failed to apply dashboard configuration")?;

    for (name, value) in &args.set {
        dashboard
            .set_input_str(name, value)
            .with_context(|| format!("Failed to set {}={}", name, value))?;
    }

    let mut session = Session::new(dashboard, format);
    log::debug!(
        "Dataset: {} records, filtered view: {} records",
        session.dashboard().store().dataset().len(),
        session.dashboard().store().get_filtered_view().len()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let requested: Vec<&str> = if args.render.is_empty() {
        config.output.outputs.iter().map(String::as_str).collect()
    } else {
        args.render.iter().map(String::as_str).collect()
    };
    if requested.is_empty() {
        session.render_all(&mut out)?;
    } else {
        session.render(&requested, &mut out)?;
    }

    if args.interactive {
        let stdin = io::stdin();
        session.run(stdin.lock(), &mut out, true)?;
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("island_list=Dream,Biscoe"),
            Ok(("island_list".to_string(), "Dream,Biscoe".to_string()))
        );
        assert_eq!(
            parse_assignment("selected_species_list="),
            Ok(("selected_species_list".to_string(), String::new()))
        );
        assert!(parse_assignment("plotly_bin_count").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "penguin-dash",
            "--set",
            "plotly_bin_count=5",
            "-r",
            "plotly",
            "--format",
            "json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.set, vec![("plotly_bin_count".to_string(), "5".to_string())]);
        assert_eq!(args.render, vec!["plotly".to_string()]);
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.verbose, 2);
        assert!(!args.interactive);
    }
}
