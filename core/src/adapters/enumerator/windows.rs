//! Windows process enumeration using CIM (PowerShell) with a wmic fallback.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::adapters::command;
use crate::domain::RawRow;
use crate::error::{Error, Result};
use crate::ports::ProcessEnumeratorPort;

/// PowerShell pipeline producing a JSON array of processes.
const CIM_SCRIPT: &str = "Get-CimInstance Win32_Process | Select-Object ProcessId,ParentProcessId,CommandLine | ConvertTo-Json -Compress";

/// Marker identifying the wmic listing's own row.
const WMIC_MARKER: &str = "get ProcessId,ParentProcessId,CommandLine";

/// One process as serialized by `ConvertTo-Json`.
#[derive(Debug, Deserialize)]
struct CimProcess {
    #[serde(rename = "ProcessId")]
    process_id: Option<i64>,
    #[serde(rename = "ParentProcessId")]
    parent_process_id: Option<i64>,
    #[serde(rename = "CommandLine")]
    command_line: Option<String>,
}

/// Windows process enumerator.
#[derive(Debug, Default)]
pub struct WindowsEnumerator;

impl WindowsEnumerator {
    /// Create a new Windows enumerator.
    pub fn new() -> Self {
        Self
    }

    /// Parse `ConvertTo-Json` output into structured rows.
    ///
    /// PowerShell emits a bare object instead of an array when there is only
    /// one process.
    pub(crate) fn parse_cim_json(output: &str) -> Result<Vec<RawRow>> {
        let trimmed = output.trim();
        if trimmed.is_empty() {
            return Err(Error::ParseError("Empty CIM output".to_string()));
        }

        let processes: Vec<CimProcess> = if trimmed.starts_with('[') {
            serde_json::from_str(trimmed)?
        } else {
            vec![serde_json::from_str(trimmed)?]
        };

        Ok(processes
            .into_iter()
            .filter(|p| {
                !p.command_line
                    .as_deref()
                    .is_some_and(|c| c.contains("Get-CimInstance Win32_Process"))
            })
            .map(|p| RawRow::Structured {
                pid: p.process_id,
                parent_pid: p.parent_process_id,
                command_line: p.command_line,
            })
            .collect())
    }

    /// Split `wmic ... /format:csv` output into rows.
    ///
    /// Expected output format (columns are alphabetical, after the host name):
    /// ```text
    ///
    /// Node,CommandLine,ParentProcessId,ProcessId
    /// DESKTOP,C:\Windows\system32\svchost.exe -k DcomLaunch,640,812
    /// DESKTOP,"C:\Program Files\nodejs\node.exe" app.js,812,9120
    /// ```
    pub(crate) fn parse_wmic_csv(output: &str) -> Vec<RawRow> {
        output
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .filter(|line| !line.contains(WMIC_MARKER))
            .map(|line| RawRow::Delimited(line.to_string()))
            .collect()
    }

    async fn enumerate_cim(&self) -> Result<Vec<RawRow>> {
        let stdout = command::run(
            "powershell",
            &["-NoProfile", "-NonInteractive", "-Command", CIM_SCRIPT],
        )
        .await?;
        Self::parse_cim_json(&stdout)
    }

    async fn enumerate_wmic(&self) -> Result<Vec<RawRow>> {
        let stdout = command::run(
            "wmic",
            &["process", "get", "ProcessId,ParentProcessId,CommandLine", "/format:csv"],
        )
        .await?;
        Ok(Self::parse_wmic_csv(&stdout))
    }
}

impl ProcessEnumeratorPort for WindowsEnumerator {
    /// List processes, preferring CIM and falling back to wmic.
    async fn enumerate(&self) -> Result<Vec<RawRow>> {
        match self.enumerate_cim().await {
            Ok(rows) => {
                debug!(rows = rows.len(), "CIM listing complete");
                Ok(rows)
            }
            Err(e) => {
                warn!(error = %e, "CIM listing failed, falling back to wmic");
                self.enumerate_wmic().await
            }
        }
    }
}
