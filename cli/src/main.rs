//! fleetspot - resolve fulfilled spot requests and propagate fleet group tags

use clap::Parser;
use fleetspot_cli::cli::Cli;
use fleetspot_cli::domain::SpotRequestError;
use fleetspot_cli::output::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json_errors = cli.json;

    if let Err(e) = cli.run().await {
        let code = e
            .downcast_ref::<SpotRequestError>()
            .map_or("error", SpotRequestError::kind);
        match json::format_error(&e.to_string(), code) {
            Ok(obj) if json_errors => eprintln!("{obj}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`, or `debug` with
/// `--verbose`).
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}
