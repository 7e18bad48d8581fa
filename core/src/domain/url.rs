//! Static service URL inference from a command line.
//!
//! Only the cheap, text-based steps live here. The live socket-table lookup
//! is driven by `application::extract_url` when this returns
//! [`UrlHint::NeedsLookup`].

use std::sync::OnceLock;

use regex::Regex;

use super::classifier::INTERPRETER;

/// URL assumed for processes that look like a web framework but give no port.
pub const FRAMEWORK_DEFAULT_URL: &str = "http://localhost:3000";

/// Outcome of inspecting a command line for a service URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlHint {
    /// The command line itself names the URL.
    Found(String),
    /// Nothing explicit, but the process is interpreter-like and its
    /// listening sockets should be checked.
    NeedsLookup,
    /// No URL can be inferred.
    Unknown,
}

fn port_flag_regex() -> &'static Regex {
    static PORT_RE: OnceLock<Regex> = OnceLock::new();
    PORT_RE.get_or_init(|| Regex::new(r"(?:--port|--listen|-p)\s+(\d+)").expect("port pattern is valid"))
}

fn literal_url_regex() -> &'static Regex {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    URL_RE.get_or_init(|| Regex::new(r"https?://\S+").expect("url pattern is valid"))
}

fn framework_regex() -> &'static Regex {
    static FRAMEWORK_RE: OnceLock<Regex> = OnceLock::new();
    FRAMEWORK_RE.get_or_init(|| Regex::new(r"express|app\.listen|server\.listen").expect("framework pattern is valid"))
}

/// Format a local HTTP URL for a port.
pub fn localhost_url(port: u16) -> String {
    format!("http://localhost:{}", port)
}

/// Inspect a command line for URL hints, in priority order:
///
/// 1. `--port N`, `--listen N` or `-p N`
/// 2. a literal `http://` or `https://` URL
/// 3. a web framework hint (`express`, `app.listen`, `server.listen`)
/// 4. the interpreter name, meaning the socket table should be consulted
pub fn infer_url(command_line: &str) -> UrlHint {
    if let Some(port) = port_flag_regex()
        .captures_iter(command_line)
        .find_map(|caps| caps[1].parse::<u16>().ok())
    {
        return UrlHint::Found(localhost_url(port));
    }

    if let Some(m) = literal_url_regex().find(command_line) {
        return UrlHint::Found(m.as_str().to_string());
    }

    if framework_regex().is_match(command_line) {
        return UrlHint::Found(FRAMEWORK_DEFAULT_URL.to_string());
    }

    if command_line.to_lowercase().contains(INTERPRETER) {
        return UrlHint::NeedsLookup;
    }

    UrlHint::Unknown
}
