//! Local address parsing shared by the socket-table parsers.

/// Split a socket address into host and port.
///
/// Handles the formats the socket tools print:
/// - IPv4: "127.0.0.1:3000" or "*:8080"
/// - IPv6: "\[::1]:3000" or "\[::ffff:127.0.0.1]:8080"
/// - lsof's "localhost:3000" when names are not suppressed
pub(crate) fn split_host_port(address: &str) -> Option<(&str, u16)> {
    if address.starts_with('[') {
        let bracket_end = address.find(']')?;
        let port_str = address[bracket_end + 1..].strip_prefix(':')?;
        let port = port_str.parse().ok()?;
        return Some((&address[..=bracket_end], port));
    }

    let last_colon = address.rfind(':')?;
    let port = address[last_colon + 1..].parse().ok()?;
    let host = &address[..last_colon];
    Some((if host.is_empty() { "*" } else { host }, port))
}
