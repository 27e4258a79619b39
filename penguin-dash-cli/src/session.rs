//! Dashboard session: the hosting runtime
//!
//! Turns user commands into input events, re-renders the outputs each event
//! invalidates, and shows errors in place of artifacts instead of exiting.

use crate::config::OutputFormat;
use crate::report;
use anyhow::Result;
use penguin_dash_core::{Dashboard, InputName};
use std::io::{BufRead, Write};
use std::str::FromStr;

/// One line typed at the interactive prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { name: String, value: String },
    Get { name: String },
    /// Render one output, or all of them
    Render(Option<String>),
    Inputs,
    Outputs,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb {
            "" => Err(CommandError::Empty),
            "set" => {
                // The value may be empty: `set island_list` clears the selection
                let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if name.is_empty() {
                    return Err(CommandError::Usage("set <input> <value>"));
                }
                Ok(Command::Set {
                    name: name.to_string(),
                    value: value.trim().to_string(),
                })
            }
            "get" if !rest.is_empty() => Ok(Command::Get {
                name: rest.to_string(),
            }),
            "get" => Err(CommandError::Usage("get <input>")),
            "render" if rest.is_empty() => Ok(Command::Render(None)),
            "render" => Ok(Command::Render(Some(rest.to_string()))),
            "inputs" => Ok(Command::Inputs),
            "outputs" => Ok(Command::Outputs),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

const HELP: &str = "\
Commands:
  set <input> <value>   change an input (sets are comma-separated)
  get <input>           show an input's current value
  render [output]       render one output, or all of them
  inputs                list inputs with their domains and values
  outputs               list output slots
  help                  show this help
  quit                  leave the session";

pub struct Session {
    dashboard: Dashboard,
    format: OutputFormat,
}

impl Session {
    pub fn new(dashboard: Dashboard, format: OutputFormat) -> Self {
        Self { dashboard, format }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Render the named outputs in order; failures are shown, not returned
    pub fn render(&mut self, names: &[&str], out: &mut impl Write) -> Result<()> {
        let outputs = self.dashboard.outputs();
        for name in names {
            let Some(info) = outputs.iter().find(|o| o.name == *name) else {
                report::write_error(out, self.format, name, &format!("Unknown output: {}", name))?;
                continue;
            };
            match self.dashboard.render(name) {
                Ok(artifact) => report::write_artifact(out, self.format, name, info.kind, &artifact)?,
                Err(e) => {
                    log::warn!("{}", e);
                    report::write_error(out, self.format, name, &e.to_string())?
                }
            }
        }
        Ok(())
    }

    /// Render every output slot
    pub fn render_all(&mut self, out: &mut impl Write) -> Result<()> {
        let names: Vec<&'static str> = self.dashboard.outputs().iter().map(|o| o.name).collect();
        self.render(&names, out)
    }

    /// Execute one command; returns false when the session should end
    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<bool> {
        match command {
            Command::Set { name, value } => match self.dashboard.set_input_str(&name, &value) {
                Ok(stale) if stale.is_empty() => writeln!(out, "{} unchanged", name)?,
                Ok(stale) => {
                    log::info!("{} changed, re-rendering {:?}", name, stale);
                    self.render(&stale, out)?;
                }
                Err(e) => writeln!(out, "✗ {}", e)?,
            },
            Command::Get { name } => match self.dashboard.get_input(&name) {
                Ok(value) => writeln!(out, "{} = {}", name, value)?,
                Err(e) => writeln!(out, "✗ {}", e)?,
            },
            Command::Render(None) => self.render_all(out)?,
            Command::Render(Some(name)) => self.render(&[name.as_str()], out)?,
            Command::Inputs => {
                for name in InputName::ALL {
                    let value = self.dashboard.store().inputs().get(name);
                    writeln!(out, "  {:<22} = {:<28} ({})", name.as_str(), value.to_string(), name.domain())?;
                }
            }
            Command::Outputs => {
                for info in self.dashboard.outputs() {
                    let deps: Vec<&str> = info.deps.iter().map(|d| d.as_str()).collect();
                    writeln!(out, "  {:<20} {:<18} reads {}", info.name, info.kind.to_string(), deps.join(", "))?;
                }
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Read commands line by line until `quit` or end of input
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write, prompt: bool) -> Result<()> {
        let mut lines = input.lines();
        loop {
            if prompt {
                write!(out, "> ")?;
                out.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;

            match line.parse::<Command>() {
                Ok(command) => {
                    if !self.execute(command, out)? {
                        break;
                    }
                }
                Err(CommandError::Empty) => {}
                Err(e) => writeln!(out, "✗ {}", e)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use penguin_dash_core::Dataset;

    fn session() -> Session {
        Session::new(Dashboard::new(Dataset::palmer_sample()), OutputFormat::Text)
    }

    fn run(session: &mut Session, script: &str) -> String {
        let mut out = Vec::new();
        session.run(script.as_bytes(), &mut out, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "set island_list Dream, Biscoe".parse::<Command>(),
            Ok(Command::Set {
                name: "island_list".into(),
                value: "Dream, Biscoe".into()
            })
        );
        assert_eq!(
            "set selected_species_list".parse::<Command>(),
            Ok(Command::Set {
                name: "selected_species_list".into(),
                value: String::new()
            })
        );
        assert_eq!("render".parse::<Command>(), Ok(Command::Render(None)));
        assert_eq!("  render plotly ".parse::<Command>(), Ok(Command::Render(Some("plotly".into()))));
        assert_eq!("get".parse::<Command>(), Err(CommandError::Usage("get <input>")));
        assert_eq!("   ".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!("draw".parse::<Command>(), Err(CommandError::Unknown("draw".into())));
    }

    #[test]
    fn test_set_rerenders_only_invalidated_outputs() {
        let mut session = session();
        let out = run(&mut session, "set plotly_bin_count 4\n");
        assert!(out.contains("── plotly (interactive-chart) ──"));
        assert!(!out.contains("plotHistogram"));
        assert!(!out.contains("penguins_dataTable"));
    }

    #[test]
    fn test_same_value_reports_unchanged() {
        let mut session = session();
        let out = run(&mut session, "set plotly_bin_count 10\n");
        assert_eq!(out, "plotly_bin_count unchanged\n");
    }

    #[test]
    fn test_errors_do_not_end_session() {
        let mut session = session();
        let out = run(
            &mut session,
            "set plotly_bin_count 0\nget nonexistent\nfrobnicate\nget plotly_bin_count\n",
        );
        assert!(out.contains("✗ Invalid value for input `plotly_bin_count`: 0 is below the minimum 1"));
        assert!(out.contains("✗ Unknown input: nonexistent"));
        assert!(out.contains("✗ Unknown command `frobnicate`"));
        assert!(out.ends_with("plotly_bin_count = 10\n"));
    }

    #[test]
    fn test_render_error_is_displayed() {
        let mut session = session();
        let out = run(&mut session, "set seaborn_bin_count 0\n");
        assert!(out.contains("── plotHistogram ──\n  ✗ Cannot render `plotHistogram`"));
    }

    #[test]
    fn test_quit_stops_reading() {
        let mut session = session();
        let out = run(&mut session, "quit\nget island_list\n");
        assert!(out.is_empty());
    }

    #[test]
    fn test_unknown_output() {
        let mut session = session();
        let out = run(&mut session, "render histogram\n");
        assert!(out.contains("Unknown output: histogram"));
    }

    #[test]
    fn test_inputs_listing() {
        let mut session = session();
        let out = run(&mut session, "inputs\n");
        assert_eq!(out.lines().count(), 5);
        assert!(out.contains("integer in [1, 20]"));
        assert!(out.contains("Adelie,Gentoo,Chinstrap"));
    }
}
