//! Session configuration: the seed filesystem and environment table.
//!
//! A session starts from a nested, serializable description of the tree
//! (`SeedNode`) plus the environment variables and home directory. The
//! default reproduces the stock portfolio content; alternatives can be
//! loaded from TOML or JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShellError};

/// One node of the seed filesystem, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SeedNode {
    Root {
        #[serde(default)]
        name: String,
        #[serde(default)]
        children: Vec<SeedNode>,
    },
    Directory {
        name: String,
        #[serde(default)]
        children: Vec<SeedNode>,
    },
    File {
        name: String,
        #[serde(default)]
        content: String,
    },
}

impl SeedNode {
    /// Convenience constructor for a file seed.
    pub fn file(name: &str, content: &str) -> Self {
        Self::File {
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    /// Convenience constructor for a directory seed.
    pub fn dir(name: &str, children: Vec<SeedNode>) -> Self {
        Self::Directory {
            name: name.to_string(),
            children,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Root { name, .. } | Self::Directory { name, .. } | Self::File { name, .. } => {
                name
            },
        }
    }
}

/// Seed value for an environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVarSeed {
    pub value: String,
    #[serde(default)]
    pub mutable: bool,
}

impl EnvVarSeed {
    fn fixed(value: &str) -> Self {
        Self {
            value: value.to_string(),
            mutable: false,
        }
    }

    fn editable(value: &str) -> Self {
        Self {
            value: value.to_string(),
            mutable: true,
        }
    }
}

/// Everything needed to start a shell session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Absolute path of the home directory.
    pub home: String,
    /// Starting directory; the home directory when absent.
    pub cwd: Option<String>,
    /// Initial environment table.
    pub env: BTreeMap<String, EnvVarSeed>,
    /// The filesystem tree; must be a `root` node.
    pub root: SeedNode,
}

impl SessionConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        log::debug!("parsed TOML session config (home = {})", config.home);
        Ok(config)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        log::debug!("parsed JSON session config (home = {})", config.home);
        Ok(config)
    }

    /// Home directory as path segments below the root.
    pub fn home_segments(&self) -> Result<Vec<String>> {
        absolute_segments(&self.home)
    }

    /// Starting directory as path segments below the root.
    pub fn cwd_segments(&self) -> Result<Vec<String>> {
        match &self.cwd {
            Some(cwd) => absolute_segments(cwd),
            None => self.home_segments(),
        }
    }
}

/// Split an absolute path into its non-empty segments.
fn absolute_segments(path: &str) -> Result<Vec<String>> {
    if !path.starts_with('/') {
        return Err(ShellError::Config(format!("path must be absolute: {path}")));
    }
    Ok(path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}

const DESCRIPTION: &str = "I am currently studying engineering at Harvey Mudd College and \
expecting to graduate in 2028. This past summer, I was an intern at NASA Jet Propulsion \
Laboratory in Pasadena CA in the RF Electronics Group working on radar hardware test automation.";

const CHANGE_LOG: &str = "Most recently I added more bash accurate command parsing and support \
to create new files/add content to them using > and >>\n\nI recently added tab completion to \
the shell (activate by pressing Tab).\n\nFor the future, I really need to add more \
content/project descriptions/photos etc. I'm also interested to add more commands and flesh \
out the tab completion more.";

const SITES: &str = "Some of my projects are hosted on my site site: \
<a href=\"https://sites.olihowe.com/\">https://sites.olihowe.com/</a>";

impl Default for SessionConfig {
    fn default() -> Self {
        let mut env = BTreeMap::new();
        env.insert("USER".to_string(), EnvVarSeed::fixed("oli"));
        env.insert("HOME".to_string(), EnvVarSeed::fixed("/home/oli"));
        env.insert("SHELL".to_string(), EnvVarSeed::fixed("/bin/oli-shell"));
        env.insert("NAME".to_string(), EnvVarSeed::editable("Oliver Howe"));
        env.insert(
            "WEBSITE".to_string(),
            EnvVarSeed::editable("<a href=\"https://olihowe.com\">https://olihowe.com</a>"),
        );
        env.insert(
            "EMAIL".to_string(),
            EnvVarSeed::editable(
                "<a href=\"mailto:oliver@olihowe.com\">oliver@olihowe.com</a>",
            ),
        );
        env.insert(
            "GITHUB".to_string(),
            EnvVarSeed::editable(
                "<a href=\"https://github.com/ohowe1\">https://github.com/ohowe1</a>",
            ),
        );
        env.insert(
            "LINKEDIN".to_string(),
            EnvVarSeed::editable(
                "<a href=\"https://linkedin.com/in/oliver-howe\">\
                 https://linkedin.com/in/oliver-howe</a>",
            ),
        );

        let root = SeedNode::Root {
            name: String::new(),
            children: vec![SeedNode::dir(
                "home",
                vec![SeedNode::dir(
                    "oli",
                    vec![
                        SeedNode::file("description.txt", DESCRIPTION),
                        SeedNode::file("change_log.txt", CHANGE_LOG),
                        SeedNode::dir("projects", vec![SeedNode::file("sites.txt", SITES)]),
                    ],
                )],
            )],
        };

        Self {
            home: "/home/oli".to_string(),
            cwd: None,
            env,
            root,
        }
    }
}
