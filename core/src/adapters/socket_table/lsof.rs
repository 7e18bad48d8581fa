//! Socket table lookup using lsof (macOS, BSDs, and the Linux fallback).

use super::address::split_host_port;
use super::ports_owned_by;
use crate::adapters::command;
use crate::domain::ListeningPort;
use crate::error::Result;
use crate::ports::ListeningPortLookup;

/// Socket lookup backed by `lsof`.
#[derive(Debug, Default)]
pub struct LsofLookup;

impl LsofLookup {
    /// Create a new lsof lookup.
    pub fn new() -> Self {
        Self
    }

    /// Parse lsof output into listening ports.
    ///
    /// Expected lsof output format:
    /// ```text
    /// COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
    /// node     34805  code   19u  IPv6 0x3d8015e195af1f3f      0t0  TCP [::1]:3000 (LISTEN)
    /// ```
    pub(crate) fn parse_lsof_output(output: &str) -> Vec<ListeningPort> {
        let mut entries = Vec::new();

        for line in output.lines() {
            if !line.contains("(LISTEN)") {
                continue;
            }

            // Parse lsof columns: COMMAND PID USER FD TYPE DEVICE SIZE/OFF NODE NAME
            let components: Vec<&str> = line.split_whitespace().collect();
            if components.len() < 9 {
                continue;
            }

            let pid: u32 = match components[1].parse() {
                Ok(p) => p,
                Err(_) => continue,
            };

            // The NAME column is the last address-looking component; device
            // ids and offsets also contain hex but never a colon-port pair.
            let port = components[8..]
                .iter()
                .rev()
                .filter(|c| c.contains(':') && !c.starts_with("0x") && !c.starts_with("0t"))
                .find_map(|c| split_host_port(c).map(|(_, port)| port));

            if let Some(port) = port {
                entries.push(ListeningPort { pid, port });
            }
        }

        entries
    }
}

impl ListeningPortLookup for LsofLookup {
    /// Executes: `lsof -a -p PID -iTCP -sTCP:LISTEN -P -n`
    ///
    /// Flags explained:
    /// - -a: AND the selections below
    /// - -p PID: only this process
    /// - -iTCP -sTCP:LISTEN: only listening TCP sockets
    /// - -P -n: numeric ports and addresses
    async fn listening_ports(&self, pid: u32) -> Result<Vec<u16>> {
        let pid_arg = pid.to_string();
        let stdout = command::run(
            "lsof",
            &["-a", "-p", &pid_arg, "-iTCP", "-sTCP:LISTEN", "-P", "-n"],
        )
        .await?;
        Ok(ports_owned_by(&Self::parse_lsof_output(&stdout), pid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lsof_output() {
        let output = r#"COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
node     34805  code   19u  IPv6 0x3d8015e195af1f3f      0t0  TCP [::1]:3000 (LISTEN)
node     34805  code   20u  IPv4 0x1234567890abcdef      0t0  TCP *:9229 (LISTEN)
node     34805  code   21u  IPv4 0x1234567890abcdee      0t0  TCP 127.0.0.1:51000->127.0.0.1:3000 (ESTABLISHED)
"#;

        let entries = LsofLookup::parse_lsof_output(output);
        assert_eq!(
            entries,
            vec![
                ListeningPort { pid: 34805, port: 3000 },
                ListeningPort { pid: 34805, port: 9229 },
            ]
        );
    }

    #[test]
    fn test_ignores_other_pids() {
        let output = r#"COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
nginx        1  root    6u  IPv4 0x1234567890abcdef      0t0  TCP *:80 (LISTEN)
"#;

        let entries = LsofLookup::parse_lsof_output(output);
        assert_eq!(ports_owned_by(&entries, 1), vec![80]);
        assert!(ports_owned_by(&entries, 2).is_empty());
    }
}
