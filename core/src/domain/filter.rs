//! Name-pattern filtering and scan options.

use serde::{Deserialize, Serialize};

/// Which processes survive enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NameFilter {
    /// Keep every process.
    All,
    /// Keep processes whose command line contains the pattern, ignoring case.
    Pattern(String),
}

impl NameFilter {
    /// Create a pattern filter.
    pub fn pattern(pattern: impl Into<String>) -> Self {
        NameFilter::Pattern(pattern.into())
    }

    /// Check whether a command line passes the filter.
    pub fn matches(&self, command_line: &str) -> bool {
        match self {
            NameFilter::All => true,
            NameFilter::Pattern(p) => command_line.to_lowercase().contains(&p.to_lowercase()),
        }
    }
}

impl Default for NameFilter {
    fn default() -> Self {
        NameFilter::pattern(crate::domain::INTERPRETER)
    }
}

/// Options for one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOptions {
    /// Name filter applied to the raw command lines.
    pub filter: NameFilter,
    /// Drop records for which no URL was found.
    #[serde(default)]
    pub url_only: bool,
}
