//! tripquery CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`. Failures are printed
//! as a JSON error line and end the process with a non-zero status.

use tripquery::cli;

fn main() {
    if let Err(e) = cli::run() {
        let _ = cli::write_error(e.code(), &e.to_string());
        std::process::exit(1);
    }
}
