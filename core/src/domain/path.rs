//! Source path extraction.
//!
//! Finds the script or entry point a process is running, skipping past the
//! interpreter, its flags and any package-manager launcher.

use super::classifier::{
    flag_consumes_next_argument, is_flag, is_inline_eval_flag, is_interpreter_executable,
    is_interpreter_flag, is_launcher, looks_like_file_path, strip_flag_prefix, DEPENDENCY_DIR,
};
use super::tokenizer::tokenize;

/// Path reported for processes that evaluate code passed on the command line.
pub const INLINE_PATH: &str = "inline";

/// Extract the best-guess source path from a command line.
///
/// Returns `None` only when the command line has no tokens at all.
///
/// # Examples
/// ```
/// use psview_core::domain::extract_path;
///
/// assert_eq!(extract_path("node --inspect app/index.js").as_deref(), Some("app/index.js"));
/// assert_eq!(extract_path("npm run dev").as_deref(), Some("dev"));
/// assert_eq!(extract_path("node -e \"console.log(1)\"").as_deref(), Some("inline"));
/// ```
pub fn extract_path(command_line: &str) -> Option<String> {
    let tokens = tokenize(command_line);
    let first = tokens.first()?;

    if let Some(script) = launcher_script(&tokens) {
        return Some(script);
    }

    let interpreter = tokens.iter().position(|t| is_interpreter_executable(t));
    let start = interpreter.map_or(0, |i| i + 1);

    let mut i = start;
    while i < tokens.len() {
        let token = &tokens[i];
        if is_interpreter_flag(token) {
            if is_inline_eval_flag(token) {
                return Some(INLINE_PATH.to_string());
            }
            if flag_consumes_next_argument(token) {
                i += 1;
            }
        } else if !is_launcher(token) && looks_like_file_path(token) {
            return Some(truncate_at_dependency_dir(strip_flag_prefix(token)));
        }
        i += 1;
    }

    let fallback = match interpreter {
        Some(idx) => tokens[idx + 1..].iter().find(|t| !is_flag(t)).unwrap_or(first),
        None => first,
    };
    Some(truncate_at_dependency_dir(fallback))
}

/// Script name passed to the first package-manager launcher, if any.
///
/// `npm run dev` and `yarn --silent run build` name the script after `run`;
/// `yarn start` names it directly after the launcher.
fn launcher_script(tokens: &[String]) -> Option<String> {
    let pos = tokens.iter().position(|t| is_launcher(t))?;
    let rest = &tokens[pos + 1..];

    if let Some(run) = rest.iter().position(|t| t == "run") {
        if let Some(script) = rest.get(run + 1).filter(|t| !is_flag(t)) {
            return Some(script.clone());
        }
    }

    rest.first().filter(|t| !is_flag(t)).cloned()
}

/// Cut a path at the dependency directory so it points at the project, not
/// at an installed package. Trailing separators are trimmed from what is left.
///
/// A relative path that starts inside the dependency directory has no project
/// part and becomes empty.
pub fn truncate_at_dependency_dir(path: &str) -> String {
    let Some(idx) = path.to_ascii_lowercase().find(DEPENDENCY_DIR) else {
        return path.to_string();
    };

    path[..idx].trim_end_matches(|c| c == '/' || c == '\\').to_string()
}
