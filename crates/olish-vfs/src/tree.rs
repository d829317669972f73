//! Arena-backed filesystem tree.

use olish_types::error::{ResolutionKind, Result, ShellError};

/// Handle to a node in a [`Tree`].
///
/// Handles are only meaningful for the tree that issued them and may be
/// reused after the node is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// The three node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Directory,
    File,
}

impl NodeKind {
    /// Root and directories can hold children.
    pub fn is_container(self) -> bool {
        matches!(self, Self::Root | Self::Directory)
    }
}

#[derive(Debug)]
enum Body {
    Container(Vec<NodeId>),
    File(String),
}

#[derive(Debug)]
struct Node {
    name: String,
    kind: NodeKind,
    parent: Option<NodeId>,
    body: Body,
}

/// An owned filesystem tree with exactly one root.
#[derive(Debug)]
pub struct Tree {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
}

const ROOT: NodeId = NodeId(0);

impl Tree {
    /// Create a tree holding only the root.
    pub fn new() -> Self {
        let root = Node {
            name: String::new(),
            kind: NodeKind::Root,
            parent: None,
            body: Body::Container(Vec::new()),
        };
        Self {
            slots: vec![Some(root)],
            free: Vec::new(),
        }
    }

    /// The unique root node.
    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Always false: the root cannot be removed.
    pub fn is_empty(&self) -> bool {
        false
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(|n| n.kind)
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.name.as_str())
    }

    /// Parent of a node; `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children in insertion order. Files have none.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id).map(|n| &n.body) {
            Some(Body::Container(children)) => children,
            _ => &[],
        }
    }

    /// Content of a file node.
    pub fn content(&self, id: NodeId) -> Option<&str> {
        match self.node(id).map(|n| &n.body) {
            Some(Body::File(content)) => Some(content),
            _ => None,
        }
    }

    /// Find a direct child by name.
    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| self.name(c) == Some(name))
    }

    /// Create an empty directory under `parent`.
    pub fn create_dir(&mut self, parent: NodeId, name: &str) -> Result<NodeId> {
        self.insert(parent, name, NodeKind::Directory, Body::Container(Vec::new()))
    }

    /// Create a file under `parent`.
    pub fn create_file(&mut self, parent: NodeId, name: &str, content: &str) -> Result<NodeId> {
        self.insert(parent, name, NodeKind::File, Body::File(content.to_string()))
    }

    fn insert(&mut self, parent: NodeId, name: &str, kind: NodeKind, body: Body) -> Result<NodeId> {
        if name.is_empty() || name == "." || name == ".." || name.contains('/') {
            return Err(ShellError::Usage(format!("invalid name: {name}")));
        }
        match self.kind(parent) {
            None => return Err(ShellError::resolution(ResolutionKind::NoSuchFileOrDirectory, name)),
            Some(NodeKind::File) => {
                return Err(ShellError::resolution(ResolutionKind::NotADirectory, name));
            },
            Some(_) => {},
        }
        if self.child(parent, name).is_some() {
            return Err(ShellError::resolution(ResolutionKind::FileExists, name));
        }

        let node = Node {
            name: name.to_string(),
            kind,
            parent: Some(parent),
            body,
        };
        let id = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                NodeId(slot)
            },
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            },
        };
        if let Some(Node {
            body: Body::Container(children),
            ..
        }) = self.node_mut(parent)
        {
            children.push(id);
        }
        Ok(id)
    }

    fn file_content_mut(&mut self, id: NodeId) -> Result<&mut String> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| ShellError::resolution(ResolutionKind::NoSuchFileOrDirectory, ""))?;
        match &mut node.body {
            Body::File(content) => Ok(content),
            Body::Container(_) => Err(ShellError::resolution(
                ResolutionKind::IsADirectory,
                node.name.clone(),
            )),
        }
    }

    /// Replace a file's content.
    pub fn write(&mut self, id: NodeId, text: &str) -> Result<()> {
        let content = self.file_content_mut(id)?;
        content.clear();
        content.push_str(text);
        Ok(())
    }

    /// Append to a file's content.
    pub fn append(&mut self, id: NodeId, text: &str) -> Result<()> {
        self.file_content_mut(id)?.push_str(text);
        Ok(())
    }

    /// Detach `id` from its parent and drop its whole subtree.
    ///
    /// Returns the former parent.
    pub fn remove(&mut self, id: NodeId) -> Result<NodeId> {
        let parent = match self.node(id) {
            None => {
                return Err(ShellError::resolution(ResolutionKind::NoSuchFileOrDirectory, ""));
            },
            Some(Node { parent: None, .. }) => {
                return Err(ShellError::resolution(ResolutionKind::CannotRemoveRoot, ""));
            },
            Some(Node {
                parent: Some(parent),
                ..
            }) => *parent,
        };

        if let Some(Node {
            body: Body::Container(children),
            ..
        }) = self.node_mut(parent)
        {
            children.retain(|&c| c != id);
        }

        // Free the subtree through the owning child lists.
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.slots[next.0].take() {
                if let Body::Container(children) = node.body {
                    pending.extend(children);
                }
                self.free.push(next.0);
            }
        }
        log::debug!("removed subtree at slot {}", id.0);
        Ok(parent)
    }

    /// Segment names from the root down to `id`. The root's path is empty.
    pub fn path_of(&self, id: NodeId) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.node(c)) {
            if node.kind == NodeKind::Root {
                break;
            }
            path.push(node.name.clone());
            current = node.parent;
        }
        path.reverse();
        path
    }

    /// Walk `segments` starting at `start`.
    ///
    /// `.` and empty segments are no-ops, `..` moves to the parent (a no-op
    /// at the root), anything else must name a child. Fails as soon as a
    /// segment remains while standing on a file.
    pub fn walk<'s, I>(&self, start: NodeId, segments: I) -> Option<NodeId>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let mut current = start;
        self.node(current)?;
        for segment in segments {
            if self.kind(current)? == NodeKind::File {
                return None;
            }
            match segment {
                "" | "." => {},
                ".." => {
                    if let Some(parent) = self.parent(current) {
                        current = parent;
                    }
                },
                name => current = self.child(current, name)?,
            }
        }
        Some(current)
    }

    /// Look up a canonical segment path from the root.
    pub fn lookup<S: AsRef<str>>(&self, segments: &[S]) -> Option<NodeId> {
        self.walk(ROOT, segments.iter().map(|s| s.as_ref()))
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
