//! Error types for oli-shell.

use std::fmt;
use std::io;

/// A malformed input line. Aborts the whole line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("unmatched quotes")]
    UnmatchedQuotes,

    #[error("syntax error near unexpected token `newline'")]
    MissingRedirectTarget,
}

/// Why a path could not be used for the requested operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    NoSuchFileOrDirectory,
    NotADirectory,
    IsADirectory,
    NotAFile,
    FileExists,
    CannotRemoveRoot,
}

impl fmt::Display for ResolutionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NoSuchFileOrDirectory => "no such file or directory",
            Self::NotADirectory => "not a directory",
            Self::IsADirectory => "is a directory",
            Self::NotAFile => "not a file",
            Self::FileExists => "file exists",
            Self::CannotRemoveRoot => "cannot remove root directory",
        };
        f.write_str(text)
    }
}

/// Errors produced by the oli-shell core.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("{kind}{}", path_suffix(.path))]
    Resolution { kind: ResolutionKind, path: String },

    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("{0}")]
    Usage(String),

    #[error("{0}: read-only variable")]
    ReadOnlyVariable(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn path_suffix(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(": {path}")
    }
}

impl ShellError {
    /// Build a resolution failure for `path`.
    pub fn resolution(kind: ResolutionKind, path: impl Into<String>) -> Self {
        Self::Resolution {
            kind,
            path: path.into(),
        }
    }

    /// The resolution kind, if this is a resolution failure.
    pub fn resolution_kind(&self) -> Option<ResolutionKind> {
        match self {
            Self::Resolution { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShellError>;
