//! Built-in commands for oli-shell.

use olish_types::error::{ResolutionKind, Result, ShellError};
use olish_vfs::NodeKind;

use crate::completion::single_operand;
use crate::interpreter::{Command, CommandOutput, CommandRegistry};
use crate::state::SystemState;

/// Register all built-in commands into a registry.
pub fn register_builtins(reg: &mut CommandRegistry) {
    reg.register(Box::new(NoopCmd));
    reg.register(Box::new(HelpCmd));
    reg.register(Box::new(CdCmd));
    reg.register(Box::new(PwdCmd));
    reg.register(Box::new(EchoCmd));
    reg.register(Box::new(LsCmd));
    crate::file_commands::register_file_commands(reg);
    crate::env_commands::register_env_commands(reg);
}

pub(crate) fn missing_argument() -> ShellError {
    ShellError::Usage("missing argument".to_string())
}

// ---------------------------------------------------------------------------
// (empty)
// ---------------------------------------------------------------------------

/// What an empty command name dispatches to.
struct NoopCmd;
impl Command for NoopCmd {
    fn name(&self) -> &str {
        ""
    }
    fn description(&self) -> &str {
        "No command entered."
    }
    fn usage(&self) -> &str {
        ""
    }
    fn hidden(&self) -> bool {
        true
    }
    fn execute(&self, _args: &[&str], _state: &mut SystemState) -> Result<CommandOutput> {
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

struct HelpCmd;
impl Command for HelpCmd {
    fn name(&self) -> &str {
        "help"
    }
    fn description(&self) -> &str {
        "List available commands."
    }
    fn usage(&self) -> &str {
        "help [command]"
    }
    fn execute(&self, _args: &[&str], _state: &mut SystemState) -> Result<CommandOutput> {
        // The registry intercepts `help` since the listing needs it.
        Ok(CommandOutput::Text(
            "Use 'help' at the prompt for a list of commands.".to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// cd
// ---------------------------------------------------------------------------

struct CdCmd;
impl Command for CdCmd {
    fn name(&self) -> &str {
        "cd"
    }
    fn description(&self) -> &str {
        "Set the shell's current directory."
    }
    fn usage(&self) -> &str {
        "cd <dir>"
    }
    fn execute(&self, args: &[&str], state: &mut SystemState) -> Result<CommandOutput> {
        let target = args.first().copied().ok_or_else(missing_argument)?;
        let node = state.resolve(target).ok_or_else(|| {
            ShellError::resolution(ResolutionKind::NoSuchFileOrDirectory, target)
        })?;
        if !state.tree.kind(node).is_some_and(NodeKind::is_container) {
            return Err(ShellError::resolution(ResolutionKind::NotADirectory, target));
        }
        state.cwd = state.tree.path_of(node);
        Ok(CommandOutput::None)
    }
    fn completions(&self, args: &[String], state: &SystemState) -> Vec<String> {
        single_operand(args, state, true)
    }
}

// ---------------------------------------------------------------------------
// pwd
// ---------------------------------------------------------------------------

struct PwdCmd;
impl Command for PwdCmd {
    fn name(&self) -> &str {
        "pwd"
    }
    fn description(&self) -> &str {
        "Print the current working directory."
    }
    fn usage(&self) -> &str {
        "pwd"
    }
    fn execute(&self, _args: &[&str], state: &mut SystemState) -> Result<CommandOutput> {
        Ok(CommandOutput::Text(state.current_directory_path(false)))
    }
}

// ---------------------------------------------------------------------------
// echo
// ---------------------------------------------------------------------------

struct EchoCmd;
impl Command for EchoCmd {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "Output to the terminal."
    }
    fn usage(&self) -> &str {
        "echo [text...]"
    }
    fn execute(&self, args: &[&str], _state: &mut SystemState) -> Result<CommandOutput> {
        Ok(CommandOutput::Text(args.join(" ")))
    }
}

// ---------------------------------------------------------------------------
// ls
// ---------------------------------------------------------------------------

struct LsCmd;
impl Command for LsCmd {
    fn name(&self) -> &str {
        "ls"
    }
    fn description(&self) -> &str {
        "List directory contents."
    }
    fn usage(&self) -> &str {
        "ls [dir]"
    }
    fn execute(&self, args: &[&str], state: &mut SystemState) -> Result<CommandOutput> {
        let target = args.first().copied().unwrap_or("");
        let node = state.resolve(target).ok_or_else(|| {
            ShellError::resolution(ResolutionKind::NoSuchFileOrDirectory, target)
        })?;
        if state.tree.kind(node) == Some(NodeKind::File) {
            return Ok(CommandOutput::Text(target.to_string()));
        }
        let names: Vec<&str> = state
            .tree
            .children(node)
            .iter()
            .filter_map(|&child| state.tree.name(child))
            .collect();
        if names.is_empty() {
            return Ok(CommandOutput::None);
        }
        Ok(CommandOutput::Text(names.join(" ")))
    }
    fn completions(&self, args: &[String], state: &SystemState) -> Vec<String> {
        single_operand(args, state, true)
    }
}
