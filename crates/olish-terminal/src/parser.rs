//! Classification of a command's tokens into name, arguments and
//! redirections.

use olish_types::error::{Result, SyntaxError};

use crate::expand::expand;
use crate::state::SystemState;
use crate::tokenizer::Token;

/// How a redirection writes its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    /// `>`
    Overwrite,
    /// `>>`
    Append,
}

/// An output redirection with its already-expanded target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub target: String,
    pub mode: RedirectMode,
}

/// A command ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
    pub redirections: Vec<Redirection>,
}

fn redirect_mode(token: &Token) -> Option<RedirectMode> {
    if token.quoted {
        return None;
    }
    match token.text.as_str() {
        ">" => Some(RedirectMode::Overwrite),
        ">>" => Some(RedirectMode::Append),
        _ => None,
    }
}

/// Reject a command whose last token is a redirection operator.
///
/// Needs no session state, so a whole line can be checked before any of
/// its commands run.
pub fn check(tokens: &[Token]) -> Result<()> {
    match tokens.split_first() {
        Some((_, rest)) if rest.last().and_then(redirect_mode).is_some() => {
            Err(SyntaxError::MissingRedirectTarget.into())
        },
        _ => Ok(()),
    }
}

/// Expand and classify one command's tokens.
///
/// Unquoted arguments that expand to nothing are dropped; `""` survives
/// as an empty argument.
pub fn parse(tokens: &[Token], state: &SystemState) -> Result<ParsedCommand> {
    check(tokens)?;
    let Some((first, rest)) = tokens.split_first() else {
        return Ok(ParsedCommand::default());
    };

    let mut parsed = ParsedCommand {
        name: expand(&first.text, state),
        ..ParsedCommand::default()
    };

    let mut iter = rest.iter();
    while let Some(token) = iter.next() {
        if let Some(mode) = redirect_mode(token) {
            let target = iter
                .next()
                .ok_or(SyntaxError::MissingRedirectTarget)?;
            parsed.redirections.push(Redirection {
                target: expand(&target.text, state),
                mode,
            });
            continue;
        }
        let arg = expand(&token.text, state);
        if arg.is_empty() && !token.quoted {
            continue;
        }
        parsed.args.push(arg);
    }
    Ok(parsed)
}
