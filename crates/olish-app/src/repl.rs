use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::time::SystemTime;

use anyhow::Result;
use olish_terminal::{CommandRegistry, HistoryEntry, SystemState};

/// Number of executed lines kept in the history.
pub const HISTORY_LIMIT: usize = 100;

const COMPLETE_PREFIX: &str = ":complete ";
const HISTORY_COMMAND: &str = ":history";

/// What an input line asks the front end to do.
#[derive(Debug, PartialEq, Eq)]
enum Request<'l> {
    Complete(&'l str),
    History,
    Execute(&'l str),
}

fn classify(line: &str) -> Request<'_> {
    if let Some(partial) = line.strip_suffix('\t') {
        Request::Complete(partial)
    } else if let Some(partial) = line.strip_prefix(COMPLETE_PREFIX) {
        Request::Complete(partial)
    } else if line.trim() == HISTORY_COMMAND {
        Request::History
    } else {
        Request::Execute(line)
    }
}

/// Line-oriented front end over a registry and session.
pub struct Repl<'a> {
    registry: &'a CommandRegistry,
    history: VecDeque<HistoryEntry>,
}

impl<'a> Repl<'a> {
    pub fn new(registry: &'a CommandRegistry) -> Self {
        Self {
            registry,
            history: VecDeque::with_capacity(HISTORY_LIMIT),
        }
    }

    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    pub fn prompt(state: &SystemState) -> String {
        format!("oli-shell:{}$ ", state.current_directory_path(true))
    }

    /// Handle one line and return the text to print.
    pub fn handle_line(&mut self, line: &str, state: &mut SystemState) -> String {
        match classify(line) {
            Request::Complete(partial) => self.registry.complete(partial, state).join("\n"),
            Request::History => self
                .history()
                .enumerate()
                .map(|(i, entry)| format!("{:>4}  {}  {}", i + 1, entry.directory, entry.command))
                .collect::<Vec<_>>()
                .join("\n"),
            Request::Execute(input) => {
                let entry = self
                    .registry
                    .execute_command(input, SystemTime::now(), state);
                let output = entry.output.clone();
                self.record(entry);
                output
            },
        }
    }

    fn record(&mut self, entry: HistoryEntry) {
        if entry.command.trim().is_empty() {
            return;
        }
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(entry);
    }

    /// Read lines until end of input, printing a prompt before each.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        state: &mut SystemState,
        input: R,
        mut out: W,
    ) -> Result<()> {
        write!(out, "{}", Self::prompt(state))?;
        out.flush()?;
        for line in input.lines() {
            let line = line?;
            let output = self.handle_line(&line, state);
            if !output.is_empty() {
                writeln!(out, "{output}")?;
            }
            write!(out, "{}", Self::prompt(state))?;
            out.flush()?;
        }
        writeln!(out)?;
        log::info!("End of input after {} recorded lines", self.history.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session_setup::build_session;
    use olish_types::config::SessionConfig;

    fn session() -> (CommandRegistry, SystemState) {
        build_session(&SessionConfig::default()).unwrap()
    }

    #[test]
    fn classify_requests() {
        assert_eq!(classify("cd pro\t"), Request::Complete("cd pro"));
        assert_eq!(classify(":complete ca"), Request::Complete("ca"));
        assert_eq!(classify(" :history "), Request::History);
        assert_eq!(classify("ls"), Request::Execute("ls"));
    }

    #[test]
    fn executes_and_records() {
        let (registry, mut state) = session();
        let mut repl = Repl::new(&registry);
        assert_eq!(repl.handle_line("cd projects; pwd", &mut state), "/home/oli/projects");
        let entries: Vec<_> = repl.history().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].directory, "~");
        assert_eq!(Repl::prompt(&state), "oli-shell:~/projects$ ");
    }

    #[test]
    fn completion_does_not_execute() {
        let (registry, mut state) = session();
        let mut repl = Repl::new(&registry);
        assert_eq!(repl.handle_line("cd pro\t", &mut state), "cd projects/");
        assert_eq!(state.cwd, vec!["home", "oli"]);
        assert_eq!(repl.history().count(), 0);
    }

    #[test]
    fn history_is_bounded() {
        let (registry, mut state) = session();
        let mut repl = Repl::new(&registry);
        for i in 0..HISTORY_LIMIT + 5 {
            repl.handle_line(&format!("echo {i}"), &mut state);
        }
        assert_eq!(repl.history().count(), HISTORY_LIMIT);
        assert_eq!(repl.history().next().unwrap().command, "echo 5");
        let listing = repl.handle_line(":history", &mut state);
        assert!(listing.starts_with("   1  ~  echo 5"));
    }

    #[test]
    fn blank_lines_are_not_recorded() {
        let (registry, mut state) = session();
        let mut repl = Repl::new(&registry);
        assert_eq!(repl.handle_line("   ", &mut state), "");
        assert_eq!(repl.history().count(), 0);
    }

    #[test]
    fn run_prints_prompts_and_output() {
        let (registry, mut state) = session();
        let mut repl = Repl::new(&registry);
        let input = b"echo hi\ncd projects\nfrob\n" as &[u8];
        let mut out = Vec::new();
        repl.run(&mut state, input, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "oli-shell:~$ hi\n\
             oli-shell:~$ oli-shell:~/projects$ frob: command not found\n\
             oli-shell:~/projects$ \n"
        );
    }
}
