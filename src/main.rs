//! JSON-lines chess session service.
//!
//! Requests arrive on stdin, responses leave on stdout, logs go to stderr.
//! Set `RUST_LOG` to adjust verbosity (default `info`).

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chess_session::api::chess_service::ChessService;
use chess_session::api::stdio_loop::run_stdio_loop;
use chess_session::config::ServiceConfig;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "configuration rejected");
            return ExitCode::from(2);
        }
    };

    info!(
        engine = config.engine.as_ref().map(|e| e.path.as_str()).unwrap_or("none"),
        fallback = config.fallback_to_heuristic,
        "chess session service starting"
    );

    let service = ChessService::new(config);
    match run_stdio_loop(&service) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "stdio loop failed");
            ExitCode::FAILURE
        }
    }
}
