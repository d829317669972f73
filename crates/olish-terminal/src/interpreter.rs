//! Command trait, registry, and dispatch logic.
//!
//! A line is split into `;`-separated commands which run independently:
//! a failing or unknown command contributes its message to the output and
//! the next command still runs. Only syntax errors abort the whole line.

use std::collections::HashMap;
use std::time::SystemTime;

use olish_types::error::{Result, ShellError};

use crate::parser::{self, ParsedCommand};
use crate::redirect;
use crate::state::SystemState;
use crate::tokenizer;

/// Prefix for messages produced by the shell itself.
const SHELL_NAME: &str = "oli-shell";

/// Output produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Plain text.
    Text(String),
    /// Command produced no visible output.
    None,
}

impl CommandOutput {
    /// The text carried, empty for `None`.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::None => String::new(),
        }
    }
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "ls \[path\]").
    fn usage(&self) -> &str;

    /// Hidden commands stay invocable but are left out of `help` and
    /// name completion.
    fn hidden(&self) -> bool {
        false
    }

    /// Execute the command with the given arguments.
    fn execute(&self, args: &[&str], state: &mut SystemState) -> Result<CommandOutput>;

    /// Candidates for the last of `args`, the argument being typed.
    fn completions(&self, _args: &[String], _state: &SystemState) -> Vec<String> {
        Vec::new()
    }
}

/// Record of one executed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The line as typed.
    pub command: String,
    /// Working directory label before the line ran.
    pub directory: String,
    pub output: String,
    pub timestamp: SystemTime,
}

/// Registry of available commands with dispatch.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register a command. Replaces any existing command with the same name.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| &**c)
    }

    /// Return a sorted list of visible (name, description) pairs.
    pub fn list_commands(&self) -> Vec<(&str, &str)> {
        let mut cmds: Vec<(&str, &str)> = self
            .commands
            .values()
            .filter(|c| !c.hidden())
            .map(|c| (c.name(), c.description()))
            .collect();
        cmds.sort_by_key(|(name, _)| *name);
        cmds
    }

    /// Run a line and wrap the result in a history record.
    pub fn execute_command(
        &self,
        input: &str,
        timestamp: SystemTime,
        state: &mut SystemState,
    ) -> HistoryEntry {
        let directory = state.current_directory_path(true);
        let output = self.execute(input, state);
        HistoryEntry {
            command: input.to_string(),
            directory,
            output,
            timestamp,
        }
    }

    /// Parse and execute a line, returning the combined output.
    ///
    /// Never fails: every error is rendered into the returned text.
    pub fn execute(&self, line: &str, state: &mut SystemState) -> String {
        match self.execute_line(line, state) {
            Ok(output) => output,
            Err(e) => {
                log::warn!("rejected line {line:?}: {e}");
                format!("{SHELL_NAME}: {e}")
            },
        }
    }

    fn execute_line(&self, line: &str, state: &mut SystemState) -> Result<String> {
        let commands = tokenizer::split(line, false)?;
        for tokens in &commands {
            parser::check(tokens)?;
        }

        let mut combined_output = Vec::new();
        for tokens in &commands {
            // Expansion happens per command so earlier commands can
            // affect later ones.
            let parsed = parser::parse(tokens, state)?;
            let output = self.run_parsed(&parsed, state);
            if !output.is_empty() {
                combined_output.push(output);
            }
        }
        Ok(combined_output.join("\n"))
    }

    /// Dispatch one parsed command and apply its redirections.
    fn run_parsed(&self, parsed: &ParsedCommand, state: &mut SystemState) -> String {
        let args: Vec<&str> = parsed.args.iter().map(String::as_str).collect();
        log::debug!("dispatch {:?} {:?}", parsed.name, args);

        let text = match self.dispatch(&parsed.name, &args, state) {
            Ok(output) => output.into_text(),
            Err(e @ ShellError::CommandNotFound(_)) => return e.to_string(),
            Err(e) => return format!("{}: {e}", parsed.name),
        };

        if parsed.redirections.is_empty() {
            return text;
        }
        for redirection in &parsed.redirections {
            if let Err(e) = redirect::apply(redirection, &text, state) {
                return format!("{SHELL_NAME}: {e}");
            }
            log::debug!("redirected output to {}", redirection.target);
        }
        String::new()
    }

    fn dispatch(&self, name: &str, args: &[&str], state: &mut SystemState) -> Result<CommandOutput> {
        // `help` needs the registry itself.
        if name == "help" && self.commands.contains_key(name) {
            return self.execute_help(args);
        }
        match self.commands.get(name) {
            Some(cmd) => cmd.execute(args, state),
            None => Err(ShellError::CommandNotFound(name.to_string())),
        }
    }

    /// Built-in help with access to the registry.
    fn execute_help(&self, args: &[&str]) -> Result<CommandOutput> {
        if let Some(&name) = args.first() {
            return match self.commands.get(name) {
                Some(cmd) => Ok(CommandOutput::Text(format!(
                    "{}: {}\nUsage: {}",
                    cmd.name(),
                    cmd.description(),
                    cmd.usage()
                ))),
                None => Err(ShellError::CommandNotFound(name.to_string())),
            };
        }
        let mut out = String::from("Available commands:");
        for (name, desc) in self.list_commands() {
            out.push_str(&format!("\n{name}: {desc}"));
        }
        Ok(CommandOutput::Text(out))
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register_builtins;
    use olish_types::config::SessionConfig;

    struct EchoCmd;
    impl Command for EchoCmd {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Print arguments"
        }
        fn usage(&self) -> &str {
            "echo [text...]"
        }
        fn execute(&self, args: &[&str], _state: &mut SystemState) -> Result<CommandOutput> {
            Ok(CommandOutput::Text(args.join(" ")))
        }
    }

    struct FailCmd;
    impl Command for FailCmd {
        fn name(&self) -> &str {
            "fail"
        }
        fn description(&self) -> &str {
            "Always fails"
        }
        fn usage(&self) -> &str {
            "fail"
        }
        fn hidden(&self) -> bool {
            true
        }
        fn execute(&self, _args: &[&str], _state: &mut SystemState) -> Result<CommandOutput> {
            Err(ShellError::Usage("boom".to_string()))
        }
    }

    fn setup() -> (CommandRegistry, SystemState) {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(EchoCmd));
        reg.register(Box::new(FailCmd));
        let state = SystemState::from_config(&SessionConfig::default()).unwrap();
        (reg, state)
    }

    #[test]
    fn register_and_execute() {
        let (reg, mut state) = setup();
        assert_eq!(reg.execute("echo hello world", &mut state), "hello world");
    }

    #[test]
    fn empty_input() {
        let (reg, mut state) = setup();
        assert_eq!(reg.execute("", &mut state), "");
        assert_eq!(reg.execute("   ", &mut state), "");
    }

    #[test]
    fn unknown_command() {
        let (reg, mut state) = setup();
        assert_eq!(reg.execute("frob a b", &mut state), "frob: command not found");
    }

    #[test]
    fn names_are_case_sensitive() {
        let (reg, mut state) = setup();
        assert_eq!(reg.execute("ECHO x", &mut state), "ECHO: command not found");
    }

    #[test]
    fn unknown_command_does_not_abort_siblings() {
        let (reg, mut state) = setup();
        assert_eq!(
            reg.execute("echo a; frob; echo b", &mut state),
            "a\nfrob: command not found\nb"
        );
    }

    #[test]
    fn command_error_is_prefixed_with_name() {
        let (reg, mut state) = setup();
        assert_eq!(reg.execute("fail; echo after", &mut state), "fail: boom\nafter");
    }

    #[test]
    fn unmatched_quotes_abort_line() {
        let (reg, mut state) = setup();
        assert_eq!(
            reg.execute(r#"echo a; echo "b"#, &mut state),
            "oli-shell: unmatched quotes"
        );
    }

    #[test]
    fn missing_target_aborts_whole_line() {
        let (reg, mut state) = setup();
        let out = reg.execute("echo a > first; echo b >", &mut state);
        assert!(out.starts_with("oli-shell: "));
        assert!(out.contains("newline"));
        assert!(state.resolve("first").is_none());
    }

    #[test]
    fn empty_outputs_are_skipped_in_join() {
        let (reg, mut state) = setup();
        assert_eq!(reg.execute(r#"echo a; echo; echo b"#, &mut state), "a\nb");
    }

    #[test]
    fn redirect_write_and_append() {
        let (reg, mut state) = setup();
        assert_eq!(reg.execute("echo hi > out.txt", &mut state), "");
        reg.execute("echo there >> out.txt", &mut state);
        let id = state.resolve("out.txt").unwrap();
        assert_eq!(state.tree.content(id), Some("hithere"));
    }

    #[test]
    fn multiple_redirections_each_receive_output() {
        let (reg, mut state) = setup();
        reg.execute("echo x > a > b", &mut state);
        for name in ["a", "b"] {
            let id = state.resolve(name).unwrap();
            assert_eq!(state.tree.content(id), Some("x"));
        }
    }

    #[test]
    fn failed_redirection_skips_the_rest() {
        let (reg, mut state) = setup();
        let out = reg.execute("echo x > projects > later; echo next", &mut state);
        assert_eq!(out, "oli-shell: is a directory: projects\nnext");
        assert!(state.resolve("later").is_none());
    }

    #[test]
    fn failed_command_is_not_redirected() {
        let (reg, mut state) = setup();
        let out = reg.execute("fail > log", &mut state);
        assert_eq!(out, "fail: boom");
        assert!(state.resolve("log").is_none());
    }

    #[test]
    fn history_entry_records_directory_before_run() {
        let mut reg = CommandRegistry::new();
        register_builtins(&mut reg);
        let mut state = SystemState::from_config(&SessionConfig::default()).unwrap();
        let now = SystemTime::now();
        let entry = reg.execute_command("cd projects; pwd", now, &mut state);
        assert_eq!(entry.command, "cd projects; pwd");
        assert_eq!(entry.directory, "~");
        assert_eq!(entry.output, "/home/oli/projects");
        assert_eq!(entry.timestamp, now);
        let next = reg.execute_command("pwd", now, &mut state);
        assert_eq!(next.directory, "~/projects");
    }

    #[test]
    fn list_commands_sorted_and_visible() {
        let (reg, _) = setup();
        let cmds = reg.list_commands();
        assert_eq!(cmds, vec![("echo", "Print arguments")]);
    }

    #[test]
    fn hidden_commands_remain_invocable() {
        let (reg, mut state) = setup();
        assert!(reg.get("fail").is_some());
        assert_eq!(reg.execute("fail", &mut state), "fail: boom");
    }

    #[test]
    fn register_replaces_existing_command() {
        struct Loud;
        impl Command for Loud {
            fn name(&self) -> &str {
                "echo"
            }
            fn description(&self) -> &str {
                "Shout"
            }
            fn usage(&self) -> &str {
                "echo"
            }
            fn execute(&self, args: &[&str], _state: &mut SystemState) -> Result<CommandOutput> {
                Ok(CommandOutput::Text(args.join(" ").to_uppercase()))
            }
        }
        let (mut reg, mut state) = setup();
        reg.register(Box::new(Loud));
        assert_eq!(reg.execute("echo hi", &mut state), "HI");
    }

    #[test]
    fn unicode_args() {
        let (reg, mut state) = setup();
        assert_eq!(reg.execute("echo héllo 世界", &mut state), "héllo 世界");
    }
}
