use attachurl_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Falls back to stderr when the state dir is not writable.
    let target = logging::init();
    tracing::debug!(?target, "logging initialized");

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("attachurl error: {:#}", err);
        std::process::exit(1);
    }
}
