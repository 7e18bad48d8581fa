//! Token classification predicates.
//!
//! Every predicate takes a single, already unquoted token and is pure. A token
//! that nothing recognizes simply fails every check.

use std::sync::OnceLock;

use regex::Regex;

/// Name of the interpreter whose processes this tool is interested in.
pub const INTERPRETER: &str = "node";

/// Flags that evaluate code given on the command line instead of a file.
pub const INLINE_EVAL_FLAGS: &[&str] = &["-e", "-p", "--eval"];

/// Directory under which installed dependencies live.
pub const DEPENDENCY_DIR: &str = "node_modules";

/// Interpreter flags recognized while walking a command line.
const INTERPRETER_FLAGS: &[&str] = &[
    "--inspect-brk",
    "--inspect-port",
    "--inspect-wait",
    "--inspect",
    "--require",
    "-r",
    "--eval",
    "-e",
    "--print",
    "-p",
    "--experimental-loader",
    "--loader",
    "--import",
    "--trace-warnings",
    "--trace-deprecation",
    "--trace-uncaught",
    "--no-warnings",
    "--no-deprecation",
    "--enable-source-maps",
    "--max-old-space-size",
    "--env-file",
    "--title",
    "--watch",
];

/// Flags that take their value as the following token unless written `--flag=value`.
const ARGUMENT_FLAGS: &[&str] = &[
    "--require",
    "-r",
    "--eval",
    "-e",
    "--print",
    "-p",
    "--experimental-loader",
    "--loader",
    "--import",
    "--title",
];

/// Package-manager front ends, matched against the file name of the token.
const LAUNCHER_NAMES: &[&str] = &[
    "npm", "npm.cmd", "npx", "npx.cmd", "yarn", "yarn.cmd", "yarnpkg", "pnpm", "pnpm.cmd", "pnpx",
    "pnpx.cmd",
];

/// Characteristic fragments of launcher scripts run through the interpreter.
const LAUNCHER_FRAGMENTS: &[&str] = &[
    "npm-cli.js",
    "npx-cli.js",
    "yarn.js",
    "yarn.cjs",
    "pnpm.cjs",
    "pnpm.js",
];

/// Source file extensions that mark a token as a script path.
const SOURCE_EXTENSIONS: &[&str] = &[
    ".js", ".mjs", ".cjs", ".jsx", ".ts", ".mts", ".cts", ".tsx", ".json", ".coffee",
];

fn flag_regex() -> &'static Regex {
    static FLAG_RE: OnceLock<Regex> = OnceLock::new();
    FLAG_RE.get_or_init(|| {
        let alternatives = INTERPRETER_FLAGS
            .iter()
            .map(|f| regex::escape(f))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!("^(?:{})(?:=|$)", alternatives)).expect("flag pattern is valid")
    })
}

fn flag_prefix_regex() -> &'static Regex {
    static PREFIX_RE: OnceLock<Regex> = OnceLock::new();
    PREFIX_RE.get_or_init(|| Regex::new(r"^--?[A-Za-z0-9][A-Za-z0-9_-]*=").expect("prefix pattern is valid"))
}

fn interpreter_segment_regex() -> &'static Regex {
    static SEGMENT_RE: OnceLock<Regex> = OnceLock::new();
    SEGMENT_RE.get_or_init(|| Regex::new(r"[/\\]node(?:\.exe)?(?:[/\\]|$)").expect("segment pattern is valid"))
}

/// File name part of a token, after the last `/` or `\`.
fn file_name(token: &str) -> &str {
    token.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(token)
}

/// Check whether a token names the interpreter executable.
///
/// Matches `node`, `node.exe`, anything ending in either (`/usr/bin/node`,
/// `ts-node`), paths inside a `nodejs` install directory, and paths with a
/// `node` segment such as `~/.nvm/versions/node/v20/bin/x`.
pub fn is_interpreter_executable(token: &str) -> bool {
    let lower = token.to_lowercase();
    lower.ends_with(INTERPRETER)
        || lower.ends_with("node.exe")
        || lower.contains("/nodejs/")
        || lower.contains("\\nodejs\\")
        || interpreter_segment_regex().is_match(&lower)
}

/// Check whether a token is a package-manager launcher (npm, yarn, pnpm, ...).
pub fn is_launcher(token: &str) -> bool {
    let lower = token.to_lowercase();
    let name = file_name(&lower);
    LAUNCHER_NAMES.contains(&name) || LAUNCHER_FRAGMENTS.iter().any(|f| lower.contains(f))
}

/// Check whether a token is a known interpreter flag, with or without `=value`.
pub fn is_interpreter_flag(token: &str) -> bool {
    flag_regex().is_match(token)
}

/// Check whether a token is one of the inline evaluation flags.
pub fn is_inline_eval_flag(token: &str) -> bool {
    INLINE_EVAL_FLAGS.contains(&token)
}

/// Check whether an interpreter flag takes the next token as its value.
///
/// `--require=x` carries its value inline and therefore consumes nothing.
pub fn flag_consumes_next_argument(token: &str) -> bool {
    !token.contains('=') && ARGUMENT_FLAGS.contains(&token)
}

/// Strip a leading `--flag=` prefix, returning the value part.
pub fn strip_flag_prefix(token: &str) -> &str {
    match flag_prefix_regex().find(token) {
        Some(m) => &token[m.end()..],
        None => token,
    }
}

/// Check whether a token (or the value of a `--flag=value` token) looks like a file path.
pub fn looks_like_file_path(token: &str) -> bool {
    let value = strip_flag_prefix(token);
    if value.contains('/') || value.contains('\\') {
        return true;
    }
    let lower = value.to_lowercase();
    SOURCE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext) && lower.len() > ext.len())
}

/// Check whether a token is written as a flag.
pub fn is_flag(token: &str) -> bool {
    token.starts_with('-')
}
