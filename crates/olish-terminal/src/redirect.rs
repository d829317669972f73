//! Writing command output into files.

use olish_types::error::{ResolutionKind, Result, ShellError};
use olish_vfs::{NodeKind, split_parent};

use crate::parser::{RedirectMode, Redirection};
use crate::state::SystemState;

/// Write `text` to the redirection target, creating the file if needed.
pub fn apply(redirection: &Redirection, text: &str, state: &mut SystemState) -> Result<()> {
    let target = redirection.target.as_str();
    let node = match state.resolve(target) {
        Some(id) => id,
        None => {
            let (prefix, name) = split_parent(target);
            let parent = state.resolve(prefix).ok_or_else(|| {
                ShellError::resolution(ResolutionKind::NoSuchFileOrDirectory, target)
            })?;
            if state.tree.kind(parent) == Some(NodeKind::File) {
                return Err(ShellError::resolution(ResolutionKind::NotADirectory, target));
            }
            log::debug!("redirect: creating {target}");
            state.tree.create_file(parent, name, "")?
        },
    };

    if state.tree.kind(node) != Some(NodeKind::File) {
        return Err(ShellError::resolution(ResolutionKind::IsADirectory, target));
    }
    match redirection.mode {
        RedirectMode::Overwrite => state.tree.write(node, text),
        RedirectMode::Append => state.tree.append(node, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use olish_types::config::SessionConfig;

    fn state() -> SystemState {
        SystemState::from_config(&SessionConfig::default()).unwrap()
    }

    fn redirect(target: &str, mode: RedirectMode) -> Redirection {
        Redirection {
            target: target.to_string(),
            mode,
        }
    }

    fn content(state: &SystemState, path: &str) -> String {
        let id = state.resolve(path).unwrap();
        state.tree.content(id).unwrap().to_string()
    }

    #[test]
    fn creates_missing_file() {
        let mut state = state();
        apply(&redirect("new.txt", RedirectMode::Overwrite), "hello", &mut state).unwrap();
        assert_eq!(content(&state, "new.txt"), "hello");
    }

    #[test]
    fn creates_in_nested_directory() {
        let mut state = state();
        apply(&redirect("projects/log", RedirectMode::Append), "x", &mut state).unwrap();
        assert_eq!(content(&state, "/home/oli/projects/log"), "x");
    }

    #[test]
    fn creates_under_root() {
        let mut state = state();
        apply(&redirect("/top", RedirectMode::Overwrite), "t", &mut state).unwrap();
        assert_eq!(content(&state, "/top"), "t");
    }

    #[test]
    fn overwrite_replaces() {
        let mut state = state();
        apply(&redirect("f", RedirectMode::Overwrite), "first", &mut state).unwrap();
        apply(&redirect("f", RedirectMode::Overwrite), "second", &mut state).unwrap();
        assert_eq!(content(&state, "f"), "second");
    }

    #[test]
    fn append_concatenates() {
        let mut state = state();
        apply(&redirect("f", RedirectMode::Overwrite), "a", &mut state).unwrap();
        apply(&redirect("f", RedirectMode::Append), "b", &mut state).unwrap();
        assert_eq!(content(&state, "f"), "ab");
    }

    #[test]
    fn missing_parent_fails() {
        let mut state = state();
        let err = apply(&redirect("nope/f", RedirectMode::Overwrite), "x", &mut state)
            .unwrap_err();
        assert_eq!(
            err.resolution_kind(),
            Some(ResolutionKind::NoSuchFileOrDirectory)
        );
    }

    #[test]
    fn parent_is_file_fails() {
        let mut state = state();
        let err = apply(
            &redirect("description.txt/f", RedirectMode::Overwrite),
            "x",
            &mut state,
        )
        .unwrap_err();
        assert_eq!(err.resolution_kind(), Some(ResolutionKind::NotADirectory));
    }

    #[test]
    fn directory_target_fails() {
        let mut state = state();
        let err = apply(&redirect("projects", RedirectMode::Overwrite), "x", &mut state)
            .unwrap_err();
        assert_eq!(err.resolution_kind(), Some(ResolutionKind::IsADirectory));
        assert!(state.resolve("projects").is_some());
    }
}
