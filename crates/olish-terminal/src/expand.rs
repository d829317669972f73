//! Token expansion: escape decoding, `~` and `$VAR` substitution.

use crate::state::SystemState;

/// Escape decoder run on each raw token before substitution.
pub type Sanitizer = fn(&str) -> String;

/// Default decoder: `\n`, `\t`, `\r`, `\\` and `\"`.
///
/// Unknown escapes and a trailing backslash are kept verbatim. `\$` is
/// left for substitution, which turns it into a literal `$`.
pub fn decode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            },
            None => out.push('\\'),
        }
    }
    out
}

pub(crate) fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Expand one raw token against the session.
pub fn expand(raw: &str, state: &SystemState) -> String {
    let sanitized = (state.sanitizer)(raw);

    let with_home = match sanitized.strip_prefix('~') {
        Some(rest) => format!("/{}{rest}", state.home().join("/")),
        None => sanitized,
    };

    substitute_variables(&with_home, state)
}

/// Replace every `$NAME` with its value; unset names become empty.
///
/// `\$` yields a literal `$` and starts no name.
fn substitute_variables(input: &str, state: &SystemState) -> String {
    let mut result = String::with_capacity(input.len());
    let mut name: Option<String> = None;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if let Some(captured) = name.as_mut() {
            if is_word_char(ch) {
                captured.push(ch);
                continue;
            }
            result.push_str(state.var(captured).unwrap_or_default());
            name = None;
        }
        if ch == '\\' && chars.peek() == Some(&'$') {
            chars.next();
            result.push('$');
        } else if ch == '$' {
            name = Some(String::new());
        } else {
            result.push(ch);
        }
    }
    if let Some(captured) = name {
        result.push_str(state.var(&captured).unwrap_or_default());
    }
    result
}
