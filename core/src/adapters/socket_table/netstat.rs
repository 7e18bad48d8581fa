//! Windows socket table lookup using netstat.

use super::address::split_host_port;
use super::ports_owned_by;
use crate::adapters::command;
use crate::domain::ListeningPort;
use crate::error::Result;
use crate::ports::ListeningPortLookup;

/// Socket lookup backed by `netstat -ano`.
#[derive(Debug, Default)]
pub struct NetstatLookup;

impl NetstatLookup {
    /// Create a new netstat lookup.
    pub fn new() -> Self {
        Self
    }

    /// Parse the output of `netstat -ano` into listening ports.
    ///
    /// Example output:
    /// ```text
    /// Active Connections
    ///
    ///   Proto  Local Address          Foreign Address        State           PID
    ///   TCP    0.0.0.0:135            0.0.0.0:0              LISTENING       1020
    ///   TCP    [::]:445               [::]:0                 LISTENING       4
    ///   TCP    127.0.0.1:3000         0.0.0.0:0              LISTENING       5432
    /// ```
    ///
    /// The state column is localized on some systems, so a TCP row whose
    /// foreign port is 0 also counts as listening.
    pub(crate) fn parse_netstat_output(output: &str) -> Vec<ListeningPort> {
        let mut entries = Vec::new();

        for line in output.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();

            // Expected format: TCP, Local Address, Foreign Address, State, PID
            if parts.len() < 5 || parts[0] != "TCP" {
                continue;
            }

            let foreign_port = split_host_port(parts[2]).map(|(_, port)| port);
            if parts[3] != "LISTENING" && foreign_port != Some(0) {
                continue;
            }

            let Some((_, port)) = split_host_port(parts[1]) else {
                continue;
            };

            let pid: u32 = match parts[4].parse() {
                Ok(p) => p,
                Err(_) => continue,
            };

            entries.push(ListeningPort { pid, port });
        }

        entries
    }
}

impl ListeningPortLookup for NetstatLookup {
    /// Executes: `netstat -ano -p TCP` followed by `netstat -ano -p TCPv6`
    /// merged into one table.
    async fn listening_ports(&self, pid: u32) -> Result<Vec<u16>> {
        let mut stdout = command::run("netstat", &["-ano", "-p", "TCP"]).await?;
        // IPv6 sockets are listed separately; missing v6 support is not fatal.
        if let Ok(v6) = command::run("netstat", &["-ano", "-p", "TCPv6"]).await {
            stdout.push('\n');
            stdout.push_str(&v6);
        }
        Ok(ports_owned_by(&Self::parse_netstat_output(&stdout), pid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_netstat_output() {
        let output = r#"
Active Connections

  Proto  Local Address          Foreign Address        State           PID
  TCP    0.0.0.0:135            0.0.0.0:0              LISTENING       1020
  TCP    [::]:445               [::]:0                 LISTENING       4
  TCP    127.0.0.1:3000         0.0.0.0:0              LISTENING       5432
  TCP    127.0.0.1:3000         127.0.0.1:52100        ESTABLISHED     5432
  UDP    0.0.0.0:5353           *:*                                    2200
"#;

        let entries = NetstatLookup::parse_netstat_output(output);
        assert_eq!(
            entries,
            vec![
                ListeningPort { pid: 1020, port: 135 },
                ListeningPort { pid: 4, port: 445 },
                ListeningPort { pid: 5432, port: 3000 },
            ]
        );
    }

    #[test]
    fn test_localized_state() {
        let output = "  TCP    0.0.0.0:8080           0.0.0.0:0              ABHÖREN         777\n";
        let entries = NetstatLookup::parse_netstat_output(output);
        assert_eq!(ports_owned_by(&entries, 777), vec![8080]);
    }
}
