//! Filesystem commands: cat, mkdir, touch, rm.

use olish_types::error::{ResolutionKind, Result, ShellError};
use olish_vfs::{NodeId, NodeKind, split_parent};

use crate::commands::missing_argument;
use crate::completion::{path_completions, single_operand};
use crate::interpreter::{Command, CommandOutput, CommandRegistry};
use crate::state::SystemState;

/// Report tree errors against the path the user typed.
fn at(target: &str) -> impl FnOnce(ShellError) -> ShellError + '_ {
    move |err| match err {
        ShellError::Resolution { kind, .. } => ShellError::resolution(kind, target),
        other => other,
    }
}

fn resolve_existing(state: &SystemState, target: &str) -> Result<NodeId> {
    state
        .resolve(target)
        .ok_or_else(|| ShellError::resolution(ResolutionKind::NoSuchFileOrDirectory, target))
}

/// Resolve the directory a new entry named by `target` would live in.
fn creation_parent<'t>(state: &SystemState, target: &'t str) -> Result<(NodeId, &'t str)> {
    let (prefix, name) = split_parent(target);
    let parent = resolve_existing(state, prefix)?;
    if state.tree.kind(parent) == Some(NodeKind::File) {
        return Err(ShellError::resolution(ResolutionKind::NotADirectory, target));
    }
    Ok((parent, name))
}

// ---------------------------------------------------------------------------
// cat
// ---------------------------------------------------------------------------

struct CatCmd;
impl Command for CatCmd {
    fn name(&self) -> &str {
        "cat"
    }
    fn description(&self) -> &str {
        "Print file contents."
    }
    fn usage(&self) -> &str {
        "cat <file...>"
    }
    fn execute(&self, args: &[&str], state: &mut SystemState) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(missing_argument());
        }
        let mut parts = Vec::with_capacity(args.len());
        for &target in args {
            let node = resolve_existing(state, target)?;
            let content = state
                .tree
                .content(node)
                .ok_or_else(|| ShellError::resolution(ResolutionKind::NotAFile, target))?;
            parts.push(content);
        }
        Ok(CommandOutput::Text(parts.join("\n")))
    }
    fn completions(&self, args: &[String], state: &SystemState) -> Vec<String> {
        single_operand(args, state, false)
    }
}

// ---------------------------------------------------------------------------
// mkdir
// ---------------------------------------------------------------------------

struct MkdirCmd;

impl MkdirCmd {
    /// Create every missing directory along `target`.
    fn make_parents(state: &mut SystemState, target: &str) -> Result<()> {
        let mut segments = target.split('/').peekable();
        let mut current = match segments.peek() {
            Some(&"~") => {
                segments.next();
                resolve_existing(state, "~")?
            },
            Some(&"") => {
                segments.next();
                state.tree.root()
            },
            _ => resolve_existing(state, "")?,
        };
        for segment in segments {
            if state.tree.kind(current) == Some(NodeKind::File) {
                return Err(ShellError::resolution(ResolutionKind::NotADirectory, target));
            }
            current = match segment {
                "" | "." => current,
                ".." => state.tree.parent(current).unwrap_or(current),
                name => match state.tree.child(current, name) {
                    Some(existing) => existing,
                    None => state.tree.create_dir(current, name).map_err(at(target))?,
                },
            };
        }
        if state.tree.kind(current) == Some(NodeKind::File) {
            return Err(ShellError::resolution(ResolutionKind::FileExists, target));
        }
        Ok(())
    }

    fn make_one(state: &mut SystemState, target: &str) -> Result<()> {
        let trimmed = target.trim_end_matches('/');
        if trimmed.is_empty() || state.resolve(trimmed).is_some() {
            return Err(ShellError::resolution(ResolutionKind::FileExists, target));
        }
        let (parent, name) = creation_parent(state, trimmed)?;
        state.tree.create_dir(parent, name).map_err(at(target))?;
        Ok(())
    }
}

impl Command for MkdirCmd {
    fn name(&self) -> &str {
        "mkdir"
    }
    fn description(&self) -> &str {
        "Make directories."
    }
    fn usage(&self) -> &str {
        "mkdir [-p] <dir...>"
    }
    fn execute(&self, args: &[&str], state: &mut SystemState) -> Result<CommandOutput> {
        let parents = args.first() == Some(&"-p");
        let targets = if parents { &args[1..] } else { args };
        if targets.is_empty() {
            return Err(missing_argument());
        }
        for &target in targets {
            if parents {
                Self::make_parents(state, target)?;
            } else {
                Self::make_one(state, target)?;
            }
        }
        Ok(CommandOutput::None)
    }
    fn completions(&self, args: &[String], state: &SystemState) -> Vec<String> {
        single_operand(args, state, true)
    }
}

// ---------------------------------------------------------------------------
// touch
// ---------------------------------------------------------------------------

struct TouchCmd;
impl Command for TouchCmd {
    fn name(&self) -> &str {
        "touch"
    }
    fn description(&self) -> &str {
        "Create empty files."
    }
    fn usage(&self) -> &str {
        "touch <file...>"
    }
    fn execute(&self, args: &[&str], state: &mut SystemState) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(missing_argument());
        }
        for &target in args {
            if state.resolve(target).is_some() {
                return Err(ShellError::resolution(ResolutionKind::FileExists, target));
            }
            let (parent, name) = creation_parent(state, target)?;
            state.tree.create_file(parent, name, "").map_err(at(target))?;
        }
        Ok(CommandOutput::None)
    }
    fn completions(&self, args: &[String], state: &SystemState) -> Vec<String> {
        single_operand(args, state, false)
    }
}

// ---------------------------------------------------------------------------
// rm
// ---------------------------------------------------------------------------

struct RmCmd;
impl Command for RmCmd {
    fn name(&self) -> &str {
        "rm"
    }
    fn description(&self) -> &str {
        "Remove files or directories."
    }
    fn usage(&self) -> &str {
        "rm [-rf] <path...>"
    }
    fn execute(&self, args: &[&str], state: &mut SystemState) -> Result<CommandOutput> {
        let mut recursive = false;
        let mut force = false;
        let mut targets = Vec::new();
        for &arg in args {
            match arg.strip_prefix('-') {
                Some(flags) if !flags.is_empty() => {
                    for flag in flags.chars() {
                        match flag {
                            'r' => recursive = true,
                            'f' => force = true,
                            other => {
                                return Err(ShellError::Usage(format!(
                                    "invalid option -- '{other}'"
                                )));
                            },
                        }
                    }
                },
                _ => targets.push(arg),
            }
        }
        if targets.is_empty() {
            return Err(missing_argument());
        }

        for target in targets {
            let Some(node) = state.resolve(target) else {
                if force {
                    continue;
                }
                return Err(ShellError::resolution(
                    ResolutionKind::NoSuchFileOrDirectory,
                    target,
                ));
            };
            match state.tree.kind(node) {
                Some(NodeKind::Root) => {
                    return Err(ShellError::resolution(ResolutionKind::CannotRemoveRoot, target));
                },
                Some(NodeKind::Directory) if !recursive => {
                    return Err(ShellError::resolution(ResolutionKind::IsADirectory, target));
                },
                _ => {},
            }
            state.remove_node(node).map_err(at(target))?;
            log::debug!("rm: removed {target}");
        }
        Ok(CommandOutput::None)
    }
    fn completions(&self, args: &[String], state: &SystemState) -> Vec<String> {
        match args.last() {
            Some(partial) if !partial.starts_with('-') => path_completions(partial, state, false),
            _ => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Register filesystem commands.
pub fn register_file_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(CatCmd));
    reg.register(Box::new(MkdirCmd));
    reg.register(Box::new(TouchCmd));
    reg.register(Box::new(RmCmd));
}
