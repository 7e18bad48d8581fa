//! Shared helper for running platform utilities.

use std::process::Stdio;

use tokio::process::Command;

use crate::error::{Error, Result};

/// Run a program and return its stdout as text.
///
/// A non-zero exit with output is still a result: `lsof` and `findstr`-style
/// tools exit non-zero when a filter matches nothing. A non-zero exit with
/// empty stdout, or a failure to start the program, is an error.
pub(crate) async fn run(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| Error::CommandFailed(format!("Failed to run {}: {}", program, e)))?;

    if !output.status.success() && output.stdout.iter().all(u8::is_ascii_whitespace) {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::CommandFailed(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            stderr.trim()
        )));
    }

    // Command lines are not guaranteed to be UTF-8; keep the rows that are.
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
