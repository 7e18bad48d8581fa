//! Linux socket table lookup using ss, falling back to lsof.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::address::split_host_port;
use super::lsof::LsofLookup;
use super::ports_owned_by;
use crate::adapters::command;
use crate::domain::ListeningPort;
use crate::error::Result;
use crate::ports::ListeningPortLookup;

fn pid_regex() -> &'static Regex {
    static PID_RE: OnceLock<Regex> = OnceLock::new();
    PID_RE.get_or_init(|| Regex::new(r"pid=(\d+)").expect("pid pattern is valid"))
}

/// Socket lookup backed by `ss`.
#[derive(Debug, Default)]
pub struct SsLookup {
    fallback: LsofLookup,
}

impl SsLookup {
    /// Create a new ss lookup.
    pub fn new() -> Self {
        Self {
            fallback: LsofLookup::new(),
        }
    }

    /// Parse ss output into listening ports.
    ///
    /// Expected ss output format:
    /// ```text
    /// LISTEN 0 4096 [::ffff:127.0.0.1]:63342 *:* users:(("rustrover",pid=53561,fd=54))
    /// LISTEN 0 511  0.0.0.0:3000 0.0.0.0:* users:(("node",pid=4242,fd=21),("node",pid=4243,fd=21))
    /// ```
    ///
    /// Sockets owned by other users have no `users:` column and are skipped.
    pub(crate) fn parse_ss_output(output: &str) -> Vec<ListeningPort> {
        let mut entries = Vec::new();

        for line in output.lines() {
            // Parse columns: [State] [Recv-Q] [Send-Q] [Local Address:Port] [Peer Address:Port] [Process]
            let components: Vec<&str> = line.split_whitespace().collect();
            if components.len() < 6 {
                continue;
            }

            let Some((_, port)) = split_host_port(components[3]) else {
                continue;
            };

            let process = components[5..].join(" ");
            for caps in pid_regex().captures_iter(&process) {
                if let Ok(pid) = caps[1].parse() {
                    entries.push(ListeningPort { pid, port });
                }
            }
        }

        entries
    }
}

impl ListeningPortLookup for SsLookup {
    /// Executes: `ss -Htlnp`
    ///
    /// Flags explained:
    /// -H, --no-header     Suppress header line
    /// -t, --tcp           display only TCP sockets
    /// -l, --listening     display listening sockets
    /// -n, --numeric       don't resolve service names
    /// -p, --processes     show process using socket
    async fn listening_ports(&self, pid: u32) -> Result<Vec<u16>> {
        match command::run("ss", &["-Htlnp"]).await {
            Ok(stdout) => Ok(ports_owned_by(&Self::parse_ss_output(&stdout), pid)),
            Err(e) => {
                debug!(pid, error = %e, "ss unavailable, trying lsof");
                self.fallback.listening_ports(pid).await
            }
        }
    }
}
