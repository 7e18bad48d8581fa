//! psview Core Library
//!
//! Lists local processes and, for each one, guesses the service URL it is
//! serving and the source path it is running. Provides functionality to:
//! - Tokenize and classify command lines (interpreter, launcher, flags, paths)
//! - Extract the entry-point path behind interpreter and package-manager shims
//! - Infer a service URL from the command line or the live socket table
//! - Normalize platform process listings into uniform records
//!
//! # Architecture
//! This library follows hexagonal architecture (ports & adapters):
//! - `domain`: Pure command-line heuristics and data models
//! - `ports`: Trait definitions (interfaces)
//! - `adapters`: External system implementations
//! - `application`: Use case services
//!
//! # Platform Support
//! - Linux: `ps` for processes, `ss` (or `lsof`) for sockets
//! - macOS and other Unix: `ps` and `lsof`
//! - Windows: PowerShell CIM (or `wmic`) and `netstat`

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

// Re-export domain types (primary API)
pub use domain::{
    extract_path, tokenize, ListeningPort, NameFilter, ProcessRecord, RawProcessLine, RawRow,
    ScanOptions,
};

// Re-export other commonly used types
pub use adapters::{PlatformEnumerator, PlatformSocketTable};
pub use application::{extract_url, Normalizer, ProcessService};
pub use config::{Config, ConfigStore};
pub use error::{Error, Result};
pub use ports::{ListeningPortLookup, ProcessEnumeratorPort};

/// Scan processes on this machine with the platform collaborators.
pub async fn scan_processes(options: &ScanOptions, config: &Config) -> Result<Vec<ProcessRecord>> {
    ProcessService::platform(config).scan(options).await
}
