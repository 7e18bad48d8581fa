//! Socket table adapters.
//!
//! Platform-specific implementations of the listening-port lookup. Parsers
//! are compiled on every platform; the platform only picks the implementation.

mod address;
#[cfg_attr(not(unix), allow(dead_code))]
mod lsof;
#[cfg_attr(not(windows), allow(dead_code))]
mod netstat;
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
mod ss;

pub use lsof::LsofLookup;
pub use netstat::NetstatLookup;
pub use ss::SsLookup;

use crate::domain::ListeningPort;
use crate::error::Result;
use crate::ports::ListeningPortLookup;

/// Ports owned by `pid`, in table order, without duplicates.
///
/// A socket bound on both IPv4 and IPv6 shows up twice with the same port.
pub(crate) fn ports_owned_by(entries: &[ListeningPort], pid: u32) -> Vec<u16> {
    let mut ports: Vec<u16> = Vec::new();
    for entry in entries.iter().filter(|e| e.pid == pid) {
        if !ports.contains(&entry.port) {
            ports.push(entry.port);
        }
    }
    ports
}

/// The socket table lookup for the current platform.
pub struct PlatformSocketTable {
    #[cfg(target_os = "linux")]
    inner: SsLookup,

    #[cfg(all(unix, not(target_os = "linux")))]
    inner: LsofLookup,

    #[cfg(windows)]
    inner: NetstatLookup,
}

impl PlatformSocketTable {
    /// Create a new socket table lookup for the current platform.
    pub fn new() -> Self {
        Self {
            #[cfg(target_os = "linux")]
            inner: SsLookup::new(),

            #[cfg(all(unix, not(target_os = "linux")))]
            inner: LsofLookup::new(),

            #[cfg(windows)]
            inner: NetstatLookup::new(),
        }
    }
}

impl Default for PlatformSocketTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ListeningPortLookup for PlatformSocketTable {
    async fn listening_ports(&self, pid: u32) -> Result<Vec<u16>> {
        self.inner.listening_ports(pid).await
    }
}
