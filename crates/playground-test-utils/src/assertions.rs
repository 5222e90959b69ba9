//! Assertion helpers for common test patterns.

use playground_core::tree::child_path;
use playground_core::{FileNode, Forest};
use playground_exec::BufferTerminal;

/// Assert that every node's path matches its position in the forest.
pub fn assert_paths_consistent(forest: &Forest) {
    fn check(nodes: &[FileNode], parent: &str) {
        for node in nodes {
            let expected = child_path(parent, &node.name, node.kind());
            assert_eq!(
                node.path, expected,
                "node {} ({}) has path {:?}, expected {:?}",
                node.id, node.name, node.path, expected
            );
            if let Some(children) = node.children() {
                check(children, &node.path);
            }
        }
    }
    check(forest.nodes(), "/");
}

/// Assert that a terminal shows `line` as one of its lines.
pub fn assert_terminal_line(terminal: &BufferTerminal, line: &str) {
    assert!(
        terminal.has_line(line),
        "terminal has no line {:?}.\nActual output:\n{}",
        line,
        terminal.text()
    );
}

/// Assert that no node with `id` is left in the forest.
pub fn assert_absent(forest: &Forest, id: &str) {
    assert!(
        forest.find(id).is_none(),
        "node {id} is still in the forest"
    );
}
