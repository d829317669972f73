//! Command interpreter for oli-shell.
//!
//! A line is split into `;`-separated commands, each command's tokens are
//! expanded and classified into a name, arguments and redirections, and the
//! name is dispatched through a `CommandRegistry`. The same tokenizer drives
//! tab completion. All state lives in an explicitly passed `SystemState`.

mod commands;
mod completion;
mod env_commands;
pub mod expand;
mod file_commands;
mod interpreter;
pub mod parser;
pub mod redirect;
mod state;
pub mod tokenizer;

/// Register all built-in commands into a registry.
pub use commands::register_builtins;
/// Path-based candidates for argument completion.
pub use completion::path_completions;
/// A single executable command trait.
pub use interpreter::Command;
/// Output produced by a command.
pub use interpreter::CommandOutput;
/// Registry of available commands with dispatch.
pub use interpreter::CommandRegistry;
/// Record of one executed input line.
pub use interpreter::HistoryEntry;
/// Session state passed to every command.
pub use state::{EnvironmentVariable, SystemState};
