//! notmuch-neomutt: Open neomutt on the results of a notmuch search
//!
//! This launcher turns search terms from the command line into a `notmuch:`
//! mailbox URL and replaces itself with neomutt viewing that mailbox. The
//! pipeline can stop early to display the intermediate query, URL, or
//! command line instead of running it.
//!
//! # Architecture
//!
//! - [`main`]: Process entry point with logging setup and exit-code mapping
//! - [`cli`]: Two-stage argument parsing (normalization pre-pass, then clap)
//! - [`query`]: Search term joining and s-expression wrapping
//! - [`notmuch`]: Configuration access via `notmuch config get`
//! - [`mailbox`]: Percent-encoded mailbox URL rendering
//! - [`launch`]: Command assembly, display short-circuits, process replacement
//! - [`errors`]: Application error model with exit-code mapping

mod cli;
mod errors;
mod launch;
mod mailbox;
mod notmuch;
mod query;

use std::process;

use cli::Cli;
use errors::AppError;
use tracing_subscriber::EnvFilter;

/// Application entry point
///
/// Initializes tracing from the environment, parses the command line, and
/// hands off to [`launch::run`]. On success the process image has usually
/// been replaced by neomutt and this function never returns; the `--show*`
/// flags are the exception.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::from_env();
    if let Err(err) = launch::run(&cli) {
        report_and_exit(&err);
    }
}

/// Print a diagnostic to stderr and terminate with the mapped exit code
///
/// Usage errors carry an `Error:` prefix and configuration errors the
/// program name, both as clean one-liners. Anything else keeps its debug
/// representation as the diagnostic trail.
fn report_and_exit(err: &AppError) -> ! {
    match err {
        AppError::Usage(_) => eprintln!("Error: {err}"),
        AppError::Config(_) => eprintln!("{}: {err}", cli::prog_name()),
        _ => eprintln!("{}: {err:?}", cli::prog_name()),
    }
    process::exit(err.exit_code());
}
