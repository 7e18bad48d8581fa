//! Process records flowing through the normalizer.

use serde::{Deserialize, Serialize};

use super::classifier::{is_launcher, INTERPRETER};
use super::tokenizer::tokenize;

/// One process as reported by the enumeration collaborator, in a
/// platform-independent shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProcessLine {
    /// Process ID, absent when the platform value could not be parsed.
    pub pid: Option<u32>,
    /// Parent process ID, absent when the platform value could not be parsed.
    pub parent_pid: Option<u32>,
    /// Full command line, never empty.
    pub command_line: String,
}

/// A listening TCP port owned by a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListeningPort {
    pub pid: u32,
    pub port: u16,
}

/// Final, normalized record for one process.
///
/// Serialized with the keys `pid`, `ppid`, `command`, `isNode`, `url` and
/// `path`. `url` and `path` are best-effort guesses; `None` is an expected
/// outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid: Option<u32>,

    #[serde(rename = "ppid")]
    pub parent_pid: Option<u32>,

    #[serde(rename = "command")]
    pub command_line: String,

    #[serde(rename = "isNode")]
    pub is_node_like: bool,

    pub url: Option<String>,

    pub path: Option<String>,
}

impl ProcessRecord {
    /// Short label for the process kind, used by table output.
    pub fn kind_label(&self) -> &'static str {
        if self.is_node_like {
            "Node.js"
        } else {
            "Other"
        }
    }
}

/// Check whether a command line belongs to the interpreter ecosystem.
///
/// True when the command line mentions the interpreter by name, or when it is
/// run through a package-manager launcher (`npm run build` runs node even
/// though the word never appears).
pub fn is_node_like(command_line: &str) -> bool {
    command_line.to_lowercase().contains(INTERPRETER)
        || tokenize(command_line).iter().any(|t| is_launcher(t))
}
