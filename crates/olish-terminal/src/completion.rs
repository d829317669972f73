//! Tab completion over partially typed lines.

use olish_vfs::split_parent;

use crate::expand::expand;
use crate::interpreter::CommandRegistry;
use crate::state::SystemState;
use crate::tokenizer::{self, Token};

impl CommandRegistry {
    /// Full-line candidates that complete the last token of `line`.
    ///
    /// The first token of the last command completes against command
    /// names; later tokens are delegated to that command's completions.
    pub fn complete(&self, line: &str, state: &SystemState) -> Vec<String> {
        let Ok(mut commands) = tokenizer::split(line, true) else {
            return Vec::new();
        };
        let Some(last) = commands.last() else {
            return Vec::new();
        };

        let candidates = if last.len() <= 1 {
            let partial = last.first().map_or("", |t| t.text.as_str());
            self.name_completions(partial)
        } else {
            let args: Vec<String> = last[1..].iter().map(|t| t.text.clone()).collect();
            self.get(&last[0].text)
                .map(|cmd| cmd.completions(&args, state))
                .unwrap_or_default()
        };

        candidates
            .into_iter()
            .map(|candidate| {
                if let Some(token) = commands.last_mut().and_then(|c| c.last_mut()) {
                    *token = Token::new(&candidate);
                }
                serialize(&commands)
            })
            .collect()
    }

    /// Visible command names starting with `partial`, sorted.
    pub fn name_completions(&self, partial: &str) -> Vec<String> {
        self.list_commands()
            .into_iter()
            .map(|(name, _)| name)
            .filter(|name| name.starts_with(partial))
            .map(str::to_string)
            .collect()
    }
}

/// Whether a token must be re-quoted to survive another `split`.
///
/// Tokens typed in quotes stay quoted so `""` and a quoted `>` keep their
/// meaning; candidates are quoted when they contain a separator.
fn needs_quotes(token: &Token) -> bool {
    token.quoted || token.text.contains([' ', ';'])
}

/// Rebuild a line from commands, re-quoting tokens where needed.
fn serialize(commands: &[Vec<Token>]) -> String {
    commands
        .iter()
        .map(|command| {
            command
                .iter()
                .map(|token| {
                    if needs_quotes(token) {
                        format!("\"{}\"", token.text)
                    } else {
                        token.text.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Children of the partial path's directory whose names extend it.
///
/// Directories carry a trailing `/` so completion can continue into them.
/// The directory part is expanded before lookup (`~`, `$HOME/...`) while
/// candidates keep the text as typed; a bare `~` completes like `~/`.
pub fn path_completions(partial: &str, state: &SystemState, directories_only: bool) -> Vec<String> {
    let partial = if partial == "~" { "~/" } else { partial };
    let (dir, stem, prefix) = match partial.rfind('/') {
        Some(i) => (split_parent(partial).0, &partial[i + 1..], &partial[..=i]),
        None => ("", partial, ""),
    };
    let Some(dir_node) = state.resolve(&expand(dir, state)) else {
        return Vec::new();
    };

    let mut candidates: Vec<String> = state
        .tree
        .children(dir_node)
        .iter()
        .filter_map(|&child| {
            let name = state.tree.name(child)?;
            let kind = state.tree.kind(child)?;
            if !name.starts_with(stem) || (directories_only && !kind.is_container()) {
                return None;
            }
            let suffix = if kind.is_container() { "/" } else { "" };
            Some(format!("{prefix}{name}{suffix}"))
        })
        .collect();
    candidates.sort();
    candidates
}

/// Complete only when exactly one operand is being typed.
pub(crate) fn single_operand(args: &[String], state: &SystemState, directories_only: bool) -> Vec<String> {
    match args {
        [partial] => path_completions(partial, state, directories_only),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register_builtins;
    use olish_types::config::SessionConfig;
    use olish_vfs::NodeKind;

    fn kind_of(state: &SystemState, path: &str) -> Option<NodeKind> {
        state.resolve(path).and_then(|id| state.tree.kind(id))
    }

    fn setup() -> (CommandRegistry, SystemState) {
        let mut reg = CommandRegistry::new();
        register_builtins(&mut reg);
        let state = SystemState::from_config(&SessionConfig::default()).unwrap();
        (reg, state)
    }

    #[test]
    fn command_names_by_prefix() {
        let (reg, state) = setup();
        assert_eq!(reg.complete("c", &state), vec!["cat", "cd"]);
    }

    #[test]
    fn empty_line_lists_visible_commands() {
        let (reg, state) = setup();
        let all = reg.complete("", &state);
        assert!(all.contains(&"help".to_string()));
        assert!(!all.contains(&String::new()));
        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(all, sorted);
    }

    #[test]
    fn name_completion_is_case_sensitive() {
        let (reg, state) = setup();
        assert!(reg.complete("C", &state).is_empty());
    }

    #[test]
    fn name_completion_after_semicolon() {
        let (reg, state) = setup();
        assert_eq!(reg.complete("ls; pw", &state), vec!["ls; pwd"]);
    }

    #[test]
    fn cd_completes_directories_only() {
        let (reg, state) = setup();
        assert_eq!(reg.complete("cd ", &state), vec!["cd projects/"]);
    }

    #[test]
    fn cat_completes_files_and_directories() {
        let (reg, state) = setup();
        assert_eq!(
            reg.complete("cat ", &state),
            vec![
                "cat change_log.txt",
                "cat description.txt",
                "cat projects/"
            ]
        );
        assert_eq!(reg.complete("cat d", &state), vec!["cat description.txt"]);
    }

    #[test]
    fn nested_path_completion_keeps_prefix() {
        let (reg, state) = setup();
        assert_eq!(
            reg.complete("cat projects/s", &state),
            vec!["cat projects/sites.txt"]
        );
        assert_eq!(
            reg.complete("cat ~/projects/", &state),
            vec!["cat ~/projects/sites.txt"]
        );
        assert_eq!(reg.complete("cd /h", &state), vec!["cd /home/"]);
    }

    #[test]
    fn unknown_or_plain_commands_have_no_argument_candidates() {
        let (reg, state) = setup();
        assert!(reg.complete("frob x", &state).is_empty());
        assert!(reg.complete("echo x", &state).is_empty());
    }

    #[test]
    fn second_operand_not_completed_for_single_operand_commands() {
        let (reg, state) = setup();
        assert!(reg.complete("cd projects ", &state).is_empty());
    }

    #[test]
    fn prior_commands_are_preserved() {
        let (reg, state) = setup();
        assert_eq!(
            reg.complete(r#"echo "a b"; cat pro"#, &state),
            vec![r#"echo "a b"; cat projects/"#]
        );
    }

    #[test]
    fn candidates_with_spaces_are_quoted() {
        let (reg, mut state) = setup();
        reg.execute(r#"mkdir "my dir""#, &mut state);
        assert_eq!(kind_of(&state, "my dir"), Some(NodeKind::Directory));
        assert_eq!(
            reg.complete(r#"cd "my"#, &state),
            vec![r#"cd "my dir/""#]
        );
    }

    #[test]
    fn missing_directory_has_no_candidates() {
        let (_, state) = setup();
        assert!(path_completions("nope/x", &state, false).is_empty());
    }

    #[test]
    fn quoted_semicolon_stays_quoted() {
        let (reg, mut state) = setup();
        let completed = reg.complete(r#"echo "a;b"; pw"#, &state);
        assert_eq!(completed, vec![r#"echo "a;b"; pwd"#]);
        assert_eq!(reg.execute(&completed[0], &mut state), "a;b\n/home/oli");
    }

    #[test]
    fn explicit_empty_argument_survives() {
        let (reg, mut state) = setup();
        let completed = reg.complete(r#"echo "" x; pw"#, &state);
        assert_eq!(completed, vec![r#"echo "" x; pwd"#]);
        assert_eq!(reg.execute(&completed[0], &mut state), " x\n/home/oli");
    }

    #[test]
    fn bare_tilde_completes_home() {
        let (reg, state) = setup();
        assert_eq!(reg.complete("cd ~", &state), vec!["cd ~/projects/"]);
    }

    #[test]
    fn variable_in_directory_part_is_expanded() {
        let (reg, state) = setup();
        assert_eq!(
            reg.complete("cat $HOME/pr", &state),
            vec!["cat $HOME/projects/"]
        );
    }

    #[test]
    fn rm_completes_after_flags() {
        let (reg, state) = setup();
        assert_eq!(reg.complete("rm -r pro", &state), vec!["rm -r projects/"]);
    }
}
