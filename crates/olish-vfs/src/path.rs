//! Path resolution and rendering.

use crate::tree::{NodeId, Tree};

impl Tree {
    /// Resolve `path` against the current and home directories.
    ///
    /// An empty path is the current directory. A leading `~` segment starts
    /// from `home`, a leading `/` from the root, anything else from `cwd`.
    pub fn resolve<S: AsRef<str>>(&self, path: &str, cwd: &[S], home: &[S]) -> Option<NodeId> {
        let cwd_node = self.lookup(cwd);
        if path.is_empty() {
            return cwd_node;
        }

        let mut segments = path.split('/').peekable();
        let start = match segments.peek() {
            Some(&"~") => {
                segments.next();
                self.lookup(home)?
            },
            Some(&"") => {
                segments.next();
                self.root()
            },
            _ => cwd_node?,
        };
        self.walk(start, segments)
    }
}

/// Render a segment path as `/a/b/c`; the root renders as `/`.
pub fn render_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for segment in segments {
        out.push('/');
        out.push_str(segment.as_ref());
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Render a segment path, abbreviating a leading `home` prefix as `~`.
pub fn render_with_home<S: AsRef<str>>(segments: &[S], home: &[S]) -> String {
    let under_home = segments.len() >= home.len()
        && segments
            .iter()
            .zip(home)
            .all(|(a, b)| a.as_ref() == b.as_ref());
    if !under_home {
        return render_path(segments);
    }
    let mut out = String::from("~");
    for segment in &segments[home.len()..] {
        out.push('/');
        out.push_str(segment.as_ref());
    }
    out
}

/// Split a target into the parent path and the final name.
///
/// `"/x"` yields `("/", "x")` and a bare `"x"` yields `("", "x")`, which
/// resolves to the current directory.
pub fn split_parent(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(0) => ("/", &path[1..]),
        Some(i) => (&path[..i], &path[i + 1..]),
        None => ("", path),
    }
}
