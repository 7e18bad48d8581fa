//! Platform-specific enumeration rows and their decoding.

use super::record::RawProcessLine;

/// A row as produced by a platform process listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRow {
    /// Whitespace-aligned columns: `PID PPID COMMAND...` (Unix `ps`).
    Columns(String),
    /// Comma-separated values: `Node,CommandLine,ParentProcessId,ProcessId`
    /// (Windows `wmic /format:csv`).
    Delimited(String),
    /// Already structured values (Windows CIM JSON).
    Structured {
        pid: Option<i64>,
        parent_pid: Option<i64>,
        command_line: Option<String>,
    },
}

impl RawRow {
    /// Decode into a [`RawProcessLine`].
    ///
    /// Header rows and rows without command text yield `None`. Ids that do not
    /// parse become absent instead of rejecting the row.
    pub fn decode(&self) -> Option<RawProcessLine> {
        match self {
            RawRow::Columns(line) => decode_columns(line),
            RawRow::Delimited(line) => decode_delimited(line),
            RawRow::Structured {
                pid,
                parent_pid,
                command_line,
            } => {
                let command_line = command_line.as_deref().map(str::trim).unwrap_or("");
                if command_line.is_empty() {
                    return None;
                }
                Some(RawProcessLine {
                    pid: pid.and_then(|p| u32::try_from(p).ok()),
                    parent_pid: parent_pid.and_then(|p| u32::try_from(p).ok()),
                    command_line: command_line.to_string(),
                })
            }
        }
    }
}

/// Split off the first whitespace-delimited field.
fn next_field(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(idx) => Some((&s[..idx], &s[idx..])),
        None => Some((s, "")),
    }
}

/// Decode `  PID  PPID command with   spacing`.
fn decode_columns(line: &str) -> Option<RawProcessLine> {
    let (pid, rest) = next_field(line)?;
    let (ppid, rest) = next_field(rest)?;
    let command_line = rest.trim();

    if command_line.is_empty() {
        return None;
    }

    // Header line
    if pid.eq_ignore_ascii_case("PID") && ppid.eq_ignore_ascii_case("PPID") {
        return None;
    }

    Some(RawProcessLine {
        pid: pid.parse().ok(),
        parent_pid: ppid.parse().ok(),
        command_line: command_line.to_string(),
    })
}

/// Decode `HOST,command line,PPID,PID`.
///
/// The command line may itself contain commas, so the id columns are taken
/// from the end.
fn decode_delimited(line: &str) -> Option<RawProcessLine> {
    let line = line.trim();
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 4 {
        return None;
    }

    let pid = fields[fields.len() - 1].trim();
    let ppid = fields[fields.len() - 2].trim();

    // Header line
    if pid == "ProcessId" {
        return None;
    }

    let command_line = fields[1..fields.len() - 2].join(",");
    let command_line = command_line.trim();
    if command_line.is_empty() {
        return None;
    }

    Some(RawProcessLine {
        pid: pid.parse().ok(),
        parent_pid: ppid.parse().ok(),
        command_line: command_line.to_string(),
    })
}
