//! CLI module for dashboard-probe.
//!
//! Offline inspection of captured `text/event-stream` bodies and a quick
//! health probe of a running server.
//!
//! ```ignore
//! use dashboard_probe::cli::{parse_args, run_cli_command};
//!
//! let code = run_cli_command(parse_args(std::env::args())).await?;
//! std::process::exit(code);
//! ```

pub mod args;
pub mod commands;
pub mod version;

pub use args::{parse_args, CliCommand, Input};
pub use commands::USAGE;
pub use version::VERSION;

use color_eyre::Result;

/// Exit code for bad usage
pub const EXIT_USAGE: i32 = 2;

/// Run a command against stdout/stderr and return the process exit code.
pub async fn run_cli_command(command: CliCommand) -> Result<i32> {
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();

    match command {
        CliCommand::Version => {
            println!("{}", version::version_line());
        }
        CliCommand::Parse(input) => {
            let text = commands::read_input(&input)?;
            commands::run_parse(&text, &mut stdout.lock(), &mut stderr.lock())?;
        }
        CliCommand::Deltas(input) => {
            let text = commands::read_input(&input)?;
            commands::run_deltas(&text, &mut stdout.lock())?;
        }
        CliCommand::Health { base_url } => {
            let mut out = Vec::new();
            commands::run_health(&base_url, &mut out).await?;
            std::io::Write::write_all(&mut stdout.lock(), &out)?;
        }
        CliCommand::Usage(complaint) => {
            if let Some(complaint) = complaint {
                eprintln!("error: {}", complaint);
            }
            eprintln!("{}", USAGE);
            return Ok(EXIT_USAGE);
        }
    }
    Ok(0)
}
