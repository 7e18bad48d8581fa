//! Unix process enumeration using ps.

use tracing::debug;

use crate::adapters::command;
use crate::domain::RawRow;
use crate::error::Result;
use crate::ports::ProcessEnumeratorPort;

/// Arguments passed to `ps`; also used to recognize the listing's own row.
const PS_ARGS: [&str; 3] = ["-ww", "-eo", "pid,ppid,command"];

/// Unix process enumerator.
#[derive(Debug, Default)]
pub struct PsEnumerator;

impl PsEnumerator {
    /// Create a new ps enumerator.
    pub fn new() -> Self {
        Self
    }

    /// Split ps output into rows.
    ///
    /// Expected ps output format:
    /// ```text
    ///   PID  PPID COMMAND
    ///     1     0 /sbin/init
    ///  4242     1 node /srv/app/server.js --port 8080
    /// ```
    ///
    /// The header stays in the output; decoding drops it. The row for the
    /// `ps` invocation itself is removed.
    pub(crate) fn parse_ps_output(output: &str) -> Vec<RawRow> {
        let own_listing = PS_ARGS.join(" ");

        output
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter(|line| !line.contains(&own_listing))
            .map(|line| RawRow::Columns(line.to_string()))
            .collect()
    }
}

impl ProcessEnumeratorPort for PsEnumerator {
    /// List processes.
    ///
    /// Executes: `ps -ww -eo pid,ppid,command`
    ///
    /// `-ww` disables column truncation so full command lines come through.
    async fn enumerate(&self) -> Result<Vec<RawRow>> {
        let stdout = command::run("ps", &PS_ARGS).await?;
        let rows = Self::parse_ps_output(&stdout);
        debug!(rows = rows.len(), "ps listing complete");
        Ok(rows)
    }
}
