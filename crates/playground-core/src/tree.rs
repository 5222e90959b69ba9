//! File tree model.
//!
//! A [`Forest`] is an ordered list of root-level [`FileNode`]s. Every node
//! carries its full path, which always equals the parent's path plus the
//! node name, with a trailing `/` for folders. Root-level nodes hang off
//! [`ROOT_PATH`].
//!
//! Mutations addressed at an unknown id leave the forest untouched and
//! report `false`/`None`; they never fail.

use crate::language::language_for;
use playground_util::Identifier;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

/// Path of the forest root.
pub const ROOT_PATH: &str = "/";

/// Kind of a file tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Folder => "folder",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific node data. Serialized inline, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeBody {
    File {
        #[serde(default)]
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    Folder {
        #[serde(default)]
        children: Vec<FileNode>,
    },
}

/// A file or folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileNode {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(flatten)]
    pub body: NodeBody,
}

impl FileNode {
    /// Create a node with a fresh id below `parent_path`.
    pub fn new(name: &str, kind: NodeKind, parent_path: &str) -> Self {
        let body = match kind {
            NodeKind::File => NodeBody::File {
                content: String::new(),
                language: Some(language_for(name).to_string()),
            },
            NodeKind::Folder => NodeBody::Folder {
                children: Vec::new(),
            },
        };
        Self {
            id: Identifier::node(),
            name: name.to_string(),
            path: child_path(parent_path, name, kind),
            body,
        }
    }

    /// Create a root-level file with content.
    pub fn file(name: &str, content: impl Into<String>) -> Self {
        let mut node = Self::new(name, NodeKind::File, ROOT_PATH);
        node.set_content(content);
        node
    }

    /// Replace the id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::File { .. } => NodeKind::File,
            NodeBody::Folder { .. } => NodeKind::Folder,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind() == NodeKind::Folder
    }

    /// File content; `None` for folders.
    pub fn content(&self) -> Option<&str> {
        match &self.body {
            NodeBody::File { content, .. } => Some(content),
            NodeBody::Folder { .. } => None,
        }
    }

    /// Set file content. Returns `false` for folders.
    pub fn set_content(&mut self, new_content: impl Into<String>) -> bool {
        match &mut self.body {
            NodeBody::File { content, .. } => {
                *content = new_content.into();
                true
            }
            NodeBody::Folder { .. } => false,
        }
    }

    /// Language tag; `None` for folders.
    pub fn language(&self) -> Option<&str> {
        match &self.body {
            NodeBody::File { language, .. } => language.as_deref(),
            NodeBody::Folder { .. } => None,
        }
    }

    /// Children; `None` for files.
    pub fn children(&self) -> Option<&[FileNode]> {
        match &self.body {
            NodeBody::Folder { children } => Some(children),
            NodeBody::File { .. } => None,
        }
    }

    /// This node and every descendant, depth first.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![std::slice::from_ref(self).iter()],
        }
    }

    /// Recompute this node's path under `parent_path`, and its subtree's.
    fn rebase(&mut self, parent_path: &str) {
        self.path = child_path(parent_path, &self.name, self.kind());
        if let NodeBody::Folder { children } = &mut self.body {
            for child in children {
                child.rebase(&self.path);
            }
        }
    }
}

/// Depth-first, pre-order iterator over nodes.
pub struct Walk<'a> {
    stack: Vec<std::slice::Iter<'a, FileNode>>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a FileNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(node) => {
                    if let Some(children) = node.children() {
                        self.stack.push(children.iter());
                    }
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Path of a child called `name` under the folder at `parent_path`.
pub fn child_path(parent_path: &str, name: &str, kind: NodeKind) -> String {
    let parent = normalize_folder_path(parent_path);
    match kind {
        NodeKind::File => format!("{parent}{name}"),
        NodeKind::Folder => format!("{parent}{name}/"),
    }
}

/// Path of the folder containing the node at `path`.
pub fn parent_path_of(path: &str) -> &str {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    match trimmed.rfind('/') {
        Some(i) => &trimmed[..=i],
        None => ROOT_PATH,
    }
}

/// Normalize a folder path to `/segment/.../`. Empty input is the root.
pub fn normalize_folder_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        ROOT_PATH.to_string()
    } else {
        format!("/{trimmed}/")
    }
}

/// An ordered collection of root-level trees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    nodes: Vec<FileNode>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root-level nodes in storage order.
    pub fn nodes(&self) -> &[FileNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<FileNode> {
        self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node, depth first.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![self.nodes.iter()],
        }
    }

    /// Create a node named `name` as the last child of the folder at
    /// `parent_path` (or at the root for `/`).
    ///
    /// Duplicate names are allowed. Returns `None` without changes when the
    /// trimmed name is not a valid node name or no folder has that path.
    pub fn create(&mut self, name: &str, kind: NodeKind, parent_path: &str) -> Option<FileNode> {
        let name = valid_name(name)?;

        let parent = normalize_folder_path(parent_path);
        let node = FileNode::new(name, kind, &parent);
        let created = node.clone();

        if parent == ROOT_PATH {
            self.nodes.push(node);
        } else {
            children_at_mut(&mut self.nodes, &parent)?.push(node);
        }
        Some(created)
    }

    /// Rename a node and rewrite the paths of its subtree.
    ///
    /// Files get their language re-derived from the new name. Sibling name
    /// collisions are not checked. Returns `false` when the trimmed name is
    /// not a valid node name or the id is unknown.
    pub fn rename(&mut self, id: &str, new_name: &str) -> bool {
        let Some(name) = valid_name(new_name) else {
            return false;
        };
        let Some(node) = find_in_mut(&mut self.nodes, id) else {
            return false;
        };

        let parent = parent_path_of(&node.path).to_string();
        node.name = name.to_string();
        if let NodeBody::File { language, .. } = &mut node.body {
            *language = Some(language_for(name).to_string());
        }
        node.rebase(&parent);
        true
    }

    /// Remove a node and its subtree, returning it.
    pub fn delete(&mut self, id: &str) -> Option<FileNode> {
        remove_in(&mut self.nodes, id)
    }

    /// First node with this id, depth first.
    pub fn find(&self, id: &str) -> Option<&FileNode> {
        self.walk().find(|n| n.id == id)
    }

    /// Node at exactly this path. Folder paths match with or without the
    /// trailing `/`.
    pub fn find_by_path(&self, path: &str) -> Option<&FileNode> {
        let as_folder = normalize_folder_path(path);
        self.walk().find(|n| {
            n.path == path || (n.is_folder() && normalize_folder_path(&n.path) == as_folder)
        })
    }

    /// Root-level node with this name.
    pub fn find_by_name(&self, name: &str) -> Option<&FileNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Replace the node with the same id, keeping its position.
    ///
    /// The replacement's path is recomputed from its position, so a stale
    /// path in `node` cannot break the path invariant.
    pub fn update(&mut self, node: FileNode) -> bool {
        let Some(slot) = find_in_mut(&mut self.nodes, &node.id) else {
            return false;
        };
        let parent = parent_path_of(&slot.path).to_string();
        *slot = node;
        slot.rebase(&parent);
        true
    }

    /// Set the content of a file. Returns `false` for unknown ids and folders.
    pub fn set_content(&mut self, id: &str, content: impl Into<String>) -> bool {
        find_in_mut(&mut self.nodes, id).is_some_and(|node| node.set_content(content))
    }

    /// Move a node to the end of the folder at `new_parent_path`.
    ///
    /// Returns `false` without changes if the id or target folder is unknown,
    /// or if the target is the node itself or one of its descendants.
    pub fn move_node(&mut self, id: &str, new_parent_path: &str) -> bool {
        let target = normalize_folder_path(new_parent_path);
        let Some(node) = self.find(id) else {
            return false;
        };

        let into_own_subtree = node
            .walk()
            .any(|n| n.is_folder() && normalize_folder_path(&n.path) == target);
        if into_own_subtree {
            return false;
        }
        if target != ROOT_PATH && children_at(&self.nodes, &target).is_none() {
            return false;
        }

        let Some(mut node) = self.delete(id) else {
            return false;
        };
        node.rebase(&target);
        match children_at_mut(&mut self.nodes, &target) {
            Some(children) => children.push(node),
            None => self.nodes.push(node),
        }
        true
    }

    /// Children of the folder at `parent_path` in display order: folders
    /// first, then by name. Storage order is not changed.
    pub fn display_order(&self, parent_path: &str) -> Vec<&FileNode> {
        let parent = normalize_folder_path(parent_path);
        let children: &[FileNode] = if parent == ROOT_PATH {
            &self.nodes
        } else {
            children_at(&self.nodes, &parent).unwrap_or_default()
        };

        sorted_for_display(children)
    }

    /// Number of root-level entries.
    pub fn file_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether every node's path matches its position.
    pub fn paths_consistent(&self) -> bool {
        fn check(nodes: &[FileNode], parent: &str) -> bool {
            nodes.iter().all(|node| {
                node.path == child_path(parent, &node.name, node.kind())
                    && node.children().map_or(true, |c| check(c, &node.path))
            })
        }
        check(&self.nodes, ROOT_PATH)
    }

    /// Whether no id appears twice.
    pub fn has_unique_ids(&self) -> bool {
        let mut seen = HashSet::new();
        self.walk().all(|n| seen.insert(n.id.as_str()))
    }
}

impl From<Vec<FileNode>> for Forest {
    fn from(nodes: Vec<FileNode>) -> Self {
        Self { nodes }
    }
}

/// Trimmed name, if usable as a path segment.
fn valid_name(name: &str) -> Option<&str> {
    let name = name.trim();
    (!name.is_empty() && !name.contains('/')).then_some(name)
}

/// Siblings in explorer order: folders first, then by name ignoring case.
pub fn sorted_for_display(siblings: &[FileNode]) -> Vec<&FileNode> {
    let mut sorted: Vec<&FileNode> = siblings.iter().collect();
    sorted.sort_by(|a, b| display_cmp(a, b));
    sorted
}

fn display_cmp(a: &FileNode, b: &FileNode) -> Ordering {
    match (a.is_folder(), b.is_folder()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    }
}

fn children_at<'a>(nodes: &'a [FileNode], folder_path: &str) -> Option<&'a [FileNode]> {
    for node in nodes {
        if let NodeBody::Folder { children } = &node.body {
            if normalize_folder_path(&node.path) == folder_path {
                return Some(children);
            }
            if let Some(found) = children_at(children, folder_path) {
                return Some(found);
            }
        }
    }
    None
}

fn children_at_mut<'a>(
    nodes: &'a mut [FileNode],
    folder_path: &str,
) -> Option<&'a mut Vec<FileNode>> {
    for node in nodes.iter_mut() {
        let matches = normalize_folder_path(&node.path) == folder_path;
        if let NodeBody::Folder { children } = &mut node.body {
            if matches {
                return Some(children);
            }
            if let Some(found) = children_at_mut(children, folder_path) {
                return Some(found);
            }
        }
    }
    None
}

fn find_in_mut<'a>(nodes: &'a mut [FileNode], id: &str) -> Option<&'a mut FileNode> {
    for node in nodes.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let NodeBody::Folder { children } = &mut node.body {
            if let Some(found) = find_in_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

fn remove_in(nodes: &mut Vec<FileNode>, id: &str) -> Option<FileNode> {
    if let Some(pos) = nodes.iter().position(|n| n.id == id) {
        return Some(nodes.remove(pos));
    }
    for node in nodes.iter_mut() {
        if let NodeBody::Folder { children } = &mut node.body {
            if let Some(removed) = remove_in(children, id) {
                return Some(removed);
            }
        }
    }
    None
}
