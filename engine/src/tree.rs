//! Traversable namespace model.
//!
//! An optional hierarchical overlay in which command sets are mounted at
//! virtual directory paths. The shell navigates it like a filesystem: a
//! path-qualified first token (`/bin/create`) switches the active command
//! set to whatever is mounted at the directory before resolving the final
//! segment as the command word, and `cd`/`ls` built-ins expose the same
//! hierarchy interactively.
//!
//! There is no fixed path convention beyond the `/` separator; models may
//! interpret relative paths against their current folder however suits the
//! hierarchy they expose.

use std::collections::HashMap;

use command_shell_core::CommandSet;

use crate::tokenizer::{Tokenizer, Unescaping};

/// One entry in a directory listing.
#[derive(Debug, Clone)]
pub enum TreeNode {
    /// A plain leaf entry, identified by its label.
    Leaf(String),
    /// A command set mounted under a label.
    Mount(String, CommandSet),
}

impl TreeNode {
    /// Leaf entry with the given label.
    pub fn leaf(label: impl Into<String>) -> Self {
        TreeNode::Leaf(label.into())
    }

    /// Mounted command set with the given label.
    pub fn mount(label: impl Into<String>, commands: CommandSet) -> Self {
        TreeNode::Mount(label.into(), commands)
    }

    /// The entry's display label.
    pub fn label(&self) -> &str {
        match self {
            TreeNode::Leaf(label) => label,
            TreeNode::Mount(label, _) => label,
        }
    }

    /// The mounted command set, for mount entries.
    pub fn commands(&self) -> Option<&CommandSet> {
        match self {
            TreeNode::Leaf(_) => None,
            TreeNode::Mount(_, set) => Some(set),
        }
    }
}

/// Hierarchical namespace navigated by the shell.
///
/// Paths are opaque strings owned by the model; the engine only rebuilds
/// them from `/`-separated segments and queries listings.
pub trait TreeModel {
    /// Stores the current folder.
    fn set_current(&mut self, path: &str);

    /// The current folder, shown in the prompt.
    fn current(&self) -> String;

    /// Whether any entry exists at the path.
    fn exists(&self, path: &str) -> bool;

    /// Lists the entries at the path. Unknown paths list empty.
    fn list(&self, path: &str) -> Vec<TreeNode>;

    /// Whether the path denotes a folder (a non-empty listing).
    fn is_folder(&self, path: &str) -> bool;
}

/// Map-backed [`TreeModel`]: an explicit `path → entries` table.
///
/// `.` and `./` list the current folder.
///
/// # Examples
///
/// ```
/// use command_shell_engine::{MapTreeModel, TreeModel, TreeNode};
///
/// let mut model = MapTreeModel::new();
/// model.insert("/", vec![TreeNode::leaf("bin")]);
/// model.insert("/bin/", vec![TreeNode::leaf("file1")]);
///
/// assert!(model.is_folder("/bin/"));
/// assert_eq!(model.current(), "/");
/// ```
#[derive(Debug, Default)]
pub struct MapTreeModel {
    current: String,
    entries: HashMap<String, Vec<TreeNode>>,
}

impl MapTreeModel {
    /// Creates an empty model rooted at `/`.
    pub fn new() -> Self {
        Self {
            current: "/".to_string(),
            entries: HashMap::new(),
        }
    }

    /// Mounts the given entries at a path.
    pub fn insert(&mut self, path: impl Into<String>, nodes: Vec<TreeNode>) {
        self.entries.insert(path.into(), nodes);
    }
}

impl TreeModel for MapTreeModel {
    fn set_current(&mut self, path: &str) {
        self.current = path.to_string();
    }

    fn current(&self) -> String {
        self.current.clone()
    }

    fn exists(&self, path: &str) -> bool {
        self.entries.contains_key(self.effective(path))
    }

    fn list(&self, path: &str) -> Vec<TreeNode> {
        self.entries
            .get(self.effective(path))
            .cloned()
            .unwrap_or_default()
    }

    fn is_folder(&self, path: &str) -> bool {
        !self.list(path).is_empty()
    }
}

impl MapTreeModel {
    fn effective<'a>(&'a self, path: &'a str) -> &'a str {
        if path == "." || path == "./" {
            &self.current
        } else {
            path
        }
    }
}

/// Rewrites a path-qualified input and switches the active command set.
///
/// When the first token contains the path separator it is split with
/// escaping disabled (backslash cannot escape `/` in paths), all but the
/// last segment are rebuilt into a directory path preserving the
/// absolute/relative distinction, the active set's commands are replaced by
/// the union of every mount listed at that path, and the first token is
/// rewritten to the final segment. Otherwise the active set reverts to the
/// embedded set plus whatever is mounted at the current folder, so a prior
/// `cd` makes a folder's commands available under their bare names.
pub(crate) fn switch_by_path(
    args: &mut [String],
    tree: &dyn TreeModel,
    embedded: &CommandSet,
    active: &mut CommandSet,
) {
    let Some(first) = args.first() else {
        return;
    };

    if !first.contains('/') {
        *active = embedded.clone();
        for node in tree.list(&tree.current()) {
            if let Some(set) = node.commands() {
                for command in set.commands() {
                    active.push(command.clone());
                }
            }
        }
        return;
    }

    let mut segments = Vec::new();
    let mut tokenizer = Tokenizer::new(first, '/').with_unescaping(Unescaping::Off);
    while let Some(segment) = tokenizer.next_token() {
        segments.push(segment);
    }
    let Some(last) = segments.last().cloned() else {
        // nothing but separators; leave the input for normal resolution
        return;
    };

    let mut path = if first.starts_with('/') {
        String::from("/")
    } else {
        String::new()
    };
    for segment in &segments[..segments.len() - 1] {
        path.push_str(segment);
        path.push('/');
    }

    let mut commands = Vec::new();
    for node in tree.list(&path) {
        if let Some(set) = node.commands() {
            commands.extend(set.commands().iter().cloned());
        }
    }
    tracing::debug!(path = %path, mounted = commands.len(), "switched command set by path");

    active.set_commands(commands);
    args[0] = last;
}
