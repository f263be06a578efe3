//! Command-line argument parsing for the dashboard-probe CLI.

use std::path::PathBuf;

/// Where a command reads its SSE text from.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Input::Stdin
        } else {
            Input::File(PathBuf::from(arg))
        }
    }
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Print every event of an SSE capture as a JSON line
    Parse(Input),
    /// Reduce an SSE capture to tool calls and content
    Deltas(Input),
    /// Query `/api/health/processes` on a running server
    Health { base_url: String },
    /// Bad or missing arguments; carries the complaint, if any
    Usage(Option<String>),
}

/// Parse command-line arguments and return the appropriate command.
///
/// ```
/// use dashboard_probe::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["dashboard-probe".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let args: Vec<String> = args.skip(1).collect();
    let Some(first) = args.first() else {
        return CliCommand::Usage(None);
    };

    match first.as_str() {
        "--version" | "-V" => CliCommand::Version,
        "parse" | "deltas" | "health" => {
            let operand = match args.as_slice() {
                [_, operand] => operand.as_str(),
                [_] => return CliCommand::Usage(Some(format!("`{}` needs an argument", first))),
                _ => return CliCommand::Usage(Some(format!("too many arguments to `{}`", first))),
            };
            match first.as_str() {
                "parse" => CliCommand::Parse(Input::from_arg(operand)),
                "deltas" => CliCommand::Deltas(Input::from_arg(operand)),
                _ => CliCommand::Health {
                    base_url: operand.to_string(),
                },
            }
        }
        other => CliCommand::Usage(Some(format!("unknown command `{}`", other))),
    }
}
