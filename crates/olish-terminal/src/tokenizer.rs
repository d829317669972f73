//! Line splitting: `;`-separated commands of space-separated tokens.
//!
//! Double quotes group spaces and `;` into a single token and are removed.
//! Backslash escapes are left in place for the expansion step.

use olish_types::error::{Result, SyntaxError};

/// One raw token as typed, with quotes stripped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Token {
    pub text: String,
    /// Whether any part of the token was inside double quotes.
    pub quoted: bool,
}

impl Token {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            quoted: false,
        }
    }

    /// Non-empty text, or an explicit `""`.
    fn is_present(&self) -> bool {
        self.quoted || !self.text.is_empty()
    }
}

/// Split a line into commands.
///
/// With `tolerate_partial` an unterminated quote is accepted and the token
/// and command being typed are always kept, even when empty, so the result
/// is never empty and its last token is the one under the cursor.
pub fn split(line: &str, tolerate_partial: bool) -> Result<Vec<Vec<Token>>> {
    let mut commands = Vec::new();
    let mut command: Vec<Token> = Vec::new();
    let mut token = Token::default();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                token.quoted = true;
            },
            ' ' if !in_quotes => {
                if token.is_present() {
                    command.push(std::mem::take(&mut token));
                }
            },
            ';' if !in_quotes => {
                if token.is_present() {
                    command.push(std::mem::take(&mut token));
                }
                if !command.is_empty() {
                    commands.push(std::mem::take(&mut command));
                }
            },
            _ => token.text.push(ch),
        }
    }

    if in_quotes && !tolerate_partial {
        return Err(SyntaxError::UnmatchedQuotes.into());
    }
    if tolerate_partial || token.is_present() {
        command.push(token);
    }
    if tolerate_partial || !command.is_empty() {
        commands.push(command);
    }
    Ok(commands)
}
