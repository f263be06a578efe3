use color_eyre::Result;
use dashboard_probe::cli::{parse_args, run_cli_command};
use dashboard_probe::logging;

fn main() -> Result<()> {
    color_eyre::install()?;
    logging::init();

    let command = parse_args(std::env::args());
    tracing::debug!(?command, "Running command");

    let runtime = tokio::runtime::Runtime::new()?;
    let code = runtime.block_on(run_cli_command(command))?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
