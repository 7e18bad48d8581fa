//! Command-line tokenizer.

/// Split a raw command line into tokens.
///
/// Whitespace separates tokens unless it sits inside a quoted region. A `"`
/// or `'` opens a quoted region that is closed by the same character; the
/// quote characters are dropped from the output. An unterminated quote keeps
/// the rest of the line quoted. Empty tokens (e.g. from `""`) are never
/// emitted.
///
/// # Examples
/// ```
/// use psview_core::domain::tokenize;
///
/// assert_eq!(tokenize(r#"a "b c" d"#), vec!["a", "b c", "d"]);
/// assert!(tokenize("").is_empty());
/// ```
pub fn tokenize(command_line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in command_line.chars() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
