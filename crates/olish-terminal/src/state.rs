//! Session state: the tree, working/home directories and environment.

use std::collections::HashMap;

use olish_types::config::{SeedNode, SessionConfig};
use olish_types::error::{ResolutionKind, Result, ShellError};
use olish_vfs::{NodeId, NodeKind, Tree, render_path, render_with_home};

use crate::expand::{Sanitizer, decode_escapes};

/// An entry in the environment table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentVariable {
    pub value: String,
    pub mutable: bool,
}

/// All mutable state of one shell session.
#[derive(Debug)]
pub struct SystemState {
    /// The filesystem.
    pub tree: Tree,
    /// Current directory as segments below the root.
    pub cwd: Vec<String>,
    /// Home directory as segments below the root. Fixed for the session.
    home: Vec<String>,
    env: HashMap<String, EnvironmentVariable>,
    /// Escape decoding applied to every token before expansion.
    pub sanitizer: Sanitizer,
}

impl SystemState {
    /// An empty session: a bare root which is also home.
    pub fn new() -> Self {
        Self {
            tree: Tree::new(),
            cwd: Vec::new(),
            home: Vec::new(),
            env: HashMap::new(),
            sanitizer: decode_escapes,
        }
    }

    /// Build a session from a seed configuration.
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        let SeedNode::Root { children, .. } = &config.root else {
            return Err(ShellError::Config(format!(
                "top-level node must be the root, found `{}`",
                config.root.name()
            )));
        };

        let mut tree = Tree::new();
        let root = tree.root();
        for child in children {
            seed(&mut tree, root, child)?;
        }

        let home = config.home_segments()?;
        let cwd = config.cwd_segments()?;
        for (label, path) in [("home", &home), ("cwd", &cwd)] {
            let is_dir = tree
                .lookup(path)
                .and_then(|id| tree.kind(id))
                .is_some_and(NodeKind::is_container);
            if !is_dir {
                return Err(ShellError::Config(format!(
                    "{label} directory does not exist: {}",
                    render_path(path)
                )));
            }
        }

        let env = config
            .env
            .iter()
            .map(|(name, var)| {
                (
                    name.clone(),
                    EnvironmentVariable {
                        value: var.value.clone(),
                        mutable: var.mutable,
                    },
                )
            })
            .collect();

        log::info!(
            "session created: {} nodes, home {}",
            tree.len(),
            render_path(&home)
        );
        Ok(Self {
            tree,
            cwd,
            home,
            env,
            sanitizer: decode_escapes,
        })
    }

    pub fn home(&self) -> &[String] {
        &self.home
    }

    /// Resolve a path relative to this session's directories.
    pub fn resolve(&self, path: &str) -> Option<NodeId> {
        self.tree.resolve(path, &self.cwd, &self.home)
    }

    /// The current directory node.
    pub fn cwd_node(&self) -> Option<NodeId> {
        self.tree.lookup(&self.cwd)
    }

    /// Render the current directory, optionally abbreviating home as `~`.
    pub fn current_directory_path(&self, replace_home: bool) -> String {
        if replace_home {
            render_with_home(&self.cwd, &self.home)
        } else {
            render_path(&self.cwd)
        }
    }

    /// Remove a node, re-anchoring the current directory if it was inside.
    pub fn remove_node(&mut self, id: NodeId) -> Result<()> {
        let parent = self.tree.remove(id)?;
        if self.cwd_node().is_none() {
            self.cwd = self.tree.path_of(parent);
            log::debug!("current directory re-anchored to {}", render_path(&self.cwd));
        }
        Ok(())
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.env.get(name).map(|v| v.value.as_str())
    }

    /// Assign a variable. Existing immutable variables cannot change.
    pub fn set_var(&mut self, name: &str, value: &str) -> Result<()> {
        match self.env.get_mut(name) {
            Some(var) if !var.mutable => Err(ShellError::ReadOnlyVariable(name.to_string())),
            Some(var) => {
                var.value = value.to_string();
                Ok(())
            },
            None => {
                self.env.insert(
                    name.to_string(),
                    EnvironmentVariable {
                        value: value.to_string(),
                        mutable: true,
                    },
                );
                Ok(())
            },
        }
    }

    /// All variables sorted by name.
    pub fn vars(&self) -> Vec<(&str, &EnvironmentVariable)> {
        let mut vars: Vec<_> = self.env.iter().map(|(k, v)| (k.as_str(), v)).collect();
        vars.sort_by_key(|(k, _)| *k);
        vars
    }
}

impl Default for SystemState {
    fn default() -> Self {
        Self::new()
    }
}

fn seed(tree: &mut Tree, parent: NodeId, node: &SeedNode) -> Result<()> {
    let created = match node {
        SeedNode::Root { .. } => {
            return Err(ShellError::Config(
                "only the top-level node may be the root".to_string(),
            ));
        },
        SeedNode::File { name, content } => tree.create_file(parent, name, content),
        SeedNode::Directory { name, children } => {
            tree.create_dir(parent, name).and_then(|dir| {
                for child in children {
                    seed(tree, dir, child)?;
                }
                Ok(dir)
            })
        },
    };
    match created {
        Ok(_) => Ok(()),
        Err(ShellError::Resolution {
            kind: ResolutionKind::FileExists,
            path,
        }) => Err(ShellError::Config(format!("duplicate entry: {path}"))),
        Err(e) => Err(e),
    }
}
