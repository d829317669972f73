//! In-memory virtual filesystem for oli-shell.
//!
//! The tree is an arena of nodes. Parents own their children through
//! ordered child lists; each child keeps a plain index back to its parent
//! which is only used for `..` traversal and path reconstruction.

mod path;
mod tree;

pub use path::{render_path, render_with_home, split_parent};
pub use tree::{NodeId, NodeKind, Tree};
