//! Under Roof CLI binary entry point.

use tracing_subscriber::EnvFilter;
use underroof::cli::{format_error_help, Cli};

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_env("UNDERROOF_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();
    if let Err(e) = underroof::cli::commands::run(cli).await {
        eprintln!("Error: {}", format_error_help(&e));
        std::process::exit(1);
    }
}
