//! Socket table port (interface).

use crate::error::Result;

/// Port for looking up the TCP ports a process is listening on.
///
/// Implementations handle platform-specific details (ss, lsof, netstat).
/// Callers treat any error as "no information".
pub trait ListeningPortLookup: Send + Sync {
    /// Listening ports owned by `pid`, in the order the socket table reports them.
    fn listening_ports(
        &self,
        pid: u32,
    ) -> impl std::future::Future<Output = Result<Vec<u16>>> + Send;
}
