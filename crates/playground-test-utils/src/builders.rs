//! Builders for test forests.

use playground_core::tree::{normalize_folder_path, parent_path_of, NodeBody, NodeKind, ROOT_PATH};
use playground_core::{FileNode, Forest};

/// Builds a [`Forest`] from full paths.
///
/// Folders must be added before their contents. Ids are assigned in
/// order as `"n1"`, `"n2"`, ... so tests can refer to them.
///
/// # Example
///
/// ```rust
/// use playground_test_utils::builders::ForestBuilder;
///
/// let forest = ForestBuilder::new()
///     .folder("/src/")
///     .file("/src/main.js", "console.log('hi')")
///     .file("/index.html", "<html></html>")
///     .build();
///
/// assert_eq!(forest.find("n2").unwrap().path, "/src/main.js");
/// ```
#[derive(Default)]
pub struct ForestBuilder {
    entries: Vec<(String, NodeKind, Option<String>)>,
}

impl ForestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file at `path` with `content`.
    pub fn file(mut self, path: &str, content: impl Into<String>) -> Self {
        self.entries
            .push((path.to_string(), NodeKind::File, Some(content.into())));
        self
    }

    /// Add a folder at `path`.
    pub fn folder(mut self, path: &str) -> Self {
        self.entries
            .push((normalize_folder_path(path), NodeKind::Folder, None));
        self
    }

    /// Build the forest.
    ///
    /// # Panics
    ///
    /// Panics if an entry's parent folder was not added first.
    pub fn build(self) -> Forest {
        let mut nodes = Vec::new();
        for (index, (path, kind, content)) in self.entries.into_iter().enumerate() {
            let parent = parent_path_of(&path).to_string();
            let name = path
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or_default();

            let mut node = FileNode::new(name, kind, &parent).with_id(format!("n{}", index + 1));
            if let Some(content) = content {
                node.set_content(content);
            }
            if insert(&mut nodes, &parent, node).is_err() {
                panic!("no parent folder for {path}");
            }
        }
        Forest::from(nodes)
    }
}

fn insert(nodes: &mut Vec<FileNode>, parent: &str, node: FileNode) -> Result<(), FileNode> {
    if parent == ROOT_PATH {
        nodes.push(node);
        return Ok(());
    }
    let Some(folder) = nodes
        .iter_mut()
        .find(|n| n.is_folder() && parent.starts_with(n.path.as_str()))
    else {
        return Err(node);
    };
    let NodeBody::Folder { children } = &mut folder.body else {
        return Err(node);
    };
    if folder.path == parent {
        children.push(node);
        Ok(())
    } else {
        insert(children, parent, node)
    }
}
