//! Environment commands: env, export.

use olish_types::error::{Result, ShellError};

use crate::expand::is_word_char;
use crate::interpreter::{Command, CommandOutput, CommandRegistry};
use crate::state::SystemState;

fn is_variable_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_word_char)
}

fn render_env(state: &SystemState) -> CommandOutput {
    let lines: Vec<String> = state
        .vars()
        .into_iter()
        .map(|(name, var)| format!("{name}={}", var.value))
        .collect();
    if lines.is_empty() {
        CommandOutput::None
    } else {
        CommandOutput::Text(lines.join("\n"))
    }
}

// ---------------------------------------------------------------------------
// env
// ---------------------------------------------------------------------------

struct EnvCmd;
impl Command for EnvCmd {
    fn name(&self) -> &str {
        "env"
    }
    fn description(&self) -> &str {
        "Print environment variables."
    }
    fn usage(&self) -> &str {
        "env"
    }
    fn execute(&self, _args: &[&str], state: &mut SystemState) -> Result<CommandOutput> {
        Ok(render_env(state))
    }
}

// ---------------------------------------------------------------------------
// export
// ---------------------------------------------------------------------------

struct ExportCmd;
impl Command for ExportCmd {
    fn name(&self) -> &str {
        "export"
    }
    fn description(&self) -> &str {
        "Set environment variables."
    }
    fn usage(&self) -> &str {
        "export NAME=value..."
    }
    fn execute(&self, args: &[&str], state: &mut SystemState) -> Result<CommandOutput> {
        if args.is_empty() {
            return Ok(render_env(state));
        }
        for arg in args {
            let (name, value) = arg
                .split_once('=')
                .ok_or_else(|| ShellError::Usage("usage: export NAME=value".to_string()))?;
            if !is_variable_name(name) {
                return Err(ShellError::Usage(format!("invalid variable name: {name}")));
            }
            state.set_var(name, value)?;
            log::debug!("export {name}");
        }
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Register environment commands.
pub fn register_env_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(EnvCmd));
    reg.register(Box::new(ExportCmd));
}
