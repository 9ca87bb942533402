//! JSON output for the CLI
//!
//! - Output: one JSON object per line on stdout
//! - Errors: one JSON object on stdout, then non-zero exit

use std::io::{self, Write};

use serde::Serialize;

use super::errors::CliResult;

/// Write one value as a JSON line to stdout
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_json(&serde_json::json!({
        "status": "error",
        "code": code,
        "message": message,
    }))
}
