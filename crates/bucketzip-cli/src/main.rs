use bucketzip_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; an unwritable state dir falls back to stderr.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("log file unavailable ({:#}); logging to stderr", err);
    }

    if let Err(err) = CliCommand::run_from_args().await {
        tracing::error!("{:#}", err);
        eprintln!("bucketzip error: {:#}", err);
        std::process::exit(1);
    }
}
