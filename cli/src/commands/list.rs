//! List command - show matching processes with their URL and path.

use anyhow::Result;
use psview_core::{scan_processes, Config, ProcessRecord, ScanOptions};

pub async fn run(options: &ScanOptions, config: &Config, json: bool) -> Result<()> {
    let records = scan_processes(options, config).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    print!("{}", format_table(&records));
    Ok(())
}

/// Render records as a plain-text table.
fn format_table(records: &[ProcessRecord]) -> String {
    if records.is_empty() {
        return "No matching processes found.\n".to_string();
    }

    // Table header
    let mut lines = vec![
        format!("{:<8} {:<8} {:<30} PATH", "PID", "TYPE", "URL"),
        "-".repeat(80),
    ];

    lines.extend(records.iter().map(|record| {
        let pid = record.pid.map_or_else(|| "-".to_string(), |p| p.to_string());
        format!(
            "{:<8} {:<8} {:<30} {}",
            pid,
            record.kind_label(),
            record.url.as_deref().unwrap_or("-"),
            record.path.as_deref().unwrap_or("-")
        )
    }));

    lines.push(String::new());
    lines.push(format!("Total: {} processes", records.len()));
    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pid: Option<u32>, url: Option<&str>, path: Option<&str>, node: bool) -> ProcessRecord {
        ProcessRecord {
            pid,
            parent_pid: Some(1),
            command_line: "node x".to_string(),
            is_node_like: node,
            url: url.map(str::to_string),
            path: path.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(format_table(&[]), "No matching processes found.\n");
    }

    #[test]
    fn test_table_rows() {
        let records = vec![
            record(Some(100), Some("http://localhost:8080"), Some("/srv/app/server.js"), true),
            record(None, None, None, false),
        ];

        let table = format_table(&records);
        let lines: Vec<&str> = table.lines().collect();

        assert!(lines[0].starts_with("PID"));
        assert!(lines[0].ends_with("PATH"));
        assert!(lines[2].starts_with("100      Node.js  http://localhost:8080"));
        assert!(lines[2].ends_with("/srv/app/server.js"));
        assert!(lines[3].starts_with("-        Other    -"));
        assert!(lines[3].ends_with(" -"));
        assert_eq!(lines.last().copied(), Some("Total: 2 processes"));
        assert_eq!(lines[1], "-".repeat(80));
        assert!(table.ends_with(" -\n\nTotal: 2 processes\n"));
    }
}
