//! Service URL extraction with live socket-table fallback.

use tracing::debug;

use crate::domain::{infer_url, localhost_url, UrlHint};
use crate::ports::ListeningPortLookup;

/// How a process's URL is settled before any socket lookup runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UrlPlan {
    /// The command line alone decides the URL (possibly none).
    Settled(Option<String>),
    /// The socket table must be consulted for this pid.
    Lookup(u32),
}

/// Decide from the command line whether a URL is known or needs a lookup.
///
/// Lookups are only planned for interpreter processes with a known pid.
pub(crate) fn plan_url(command_line: &str, pid: Option<u32>) -> UrlPlan {
    match (infer_url(command_line), pid) {
        (UrlHint::Found(url), _) => UrlPlan::Settled(Some(url)),
        (UrlHint::NeedsLookup, Some(pid)) => UrlPlan::Lookup(pid),
        (UrlHint::NeedsLookup, None) | (UrlHint::Unknown, _) => UrlPlan::Settled(None),
    }
}

/// First port `pid` is listening on, or `None` if the lookup fails or finds nothing.
pub(crate) async fn first_listening_port<L: ListeningPortLookup>(lookup: &L, pid: u32) -> Option<u16> {
    match lookup.listening_ports(pid).await {
        Ok(ports) => ports.first().copied(),
        Err(e) => {
            debug!(pid, error = %e, "socket lookup failed");
            None
        }
    }
}

/// Extract the best-guess service URL for a process.
///
/// Static hints in the command line win; the socket table is only consulted
/// for interpreter processes with a known pid. Lookup failures are "no URL".
/// `Normalizer` is the batched form of this, sharing `plan_url`.
pub async fn extract_url<L: ListeningPortLookup>(
    command_line: &str,
    pid: Option<u32>,
    lookup: &L,
) -> Option<String> {
    match plan_url(command_line, pid) {
        UrlPlan::Settled(url) => url,
        UrlPlan::Lookup(pid) => first_listening_port(lookup, pid).await.map(localhost_url),
    }
}
