//! File tree command handlers.

use super::context::Session;
use anyhow::{bail, Context as _};
use playground_core::tree::{normalize_folder_path, parent_path_of, sorted_for_display, ROOT_PATH};
use playground_core::{FileNode, Forest, NodeKind, RunResult};
use playground_exec::WriterTerminal;
use std::io::Read;
use std::path::Path;

/// List root-level entries in display order.
pub fn handle_ls(session: &mut Session) {
    let files = session.playground.files();
    if files.is_empty() {
        println!("No files in project.");
    }
    for node in files.display_order(ROOT_PATH) {
        println!("- {} ({})", node.name, node.kind());
    }
    session.flush_notices();
}

/// Print the whole tree.
pub fn handle_tree(session: &mut Session, ids: bool) {
    print!("{}", render_tree(session.playground.files(), ids));
    session.flush_notices();
}

/// Indented tree, folders first, each folder suffixed with `/`.
pub fn render_tree(files: &Forest, ids: bool) -> String {
    fn render(siblings: &[FileNode], depth: usize, ids: bool, out: &mut String) {
        for node in sorted_for_display(siblings) {
            let indent = "  ".repeat(depth);
            let suffix = if node.is_folder() { "/" } else { "" };
            if ids {
                out.push_str(&format!("{indent}{}{suffix}  [{}]\n", node.name, node.id));
            } else {
                out.push_str(&format!("{indent}{}{suffix}\n", node.name));
            }
            if let Some(children) = node.children() {
                render(children, depth + 1, ids, out);
            }
        }
    }

    let mut out = String::new();
    render(files.nodes(), 0, ids, &mut out);
    out
}

pub fn handle_cat(session: &mut Session, target: &str) -> anyhow::Result<()> {
    let node = session.playground.resolve(target)?;
    let Some(content) = node.content() else {
        bail!("{} is a folder", node.path);
    };
    println!("{content}");
    session.flush_notices();
    Ok(())
}

/// Create a file or folder at a full path such as `/src/app.ts`.
pub async fn handle_new(mut session: Session, path: &str, folder: bool) -> anyhow::Result<()> {
    let (parent, name, kind) = split_new_path(path, folder)?;
    let created = session
        .playground
        .create(&name, kind, &parent)
        .await
        .with_context(|| format!("could not create {path}: no folder at {parent}"))?;
    println!("{}", created.id);
    session.finish().await
}

/// Parent folder, name and kind for a new node path.
fn split_new_path(path: &str, folder: bool) -> anyhow::Result<(String, String, NodeKind)> {
    let (full, kind) = if folder {
        (normalize_folder_path(path), NodeKind::Folder)
    } else {
        let trimmed = path.trim();
        let full = if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        };
        (full, NodeKind::File)
    };

    let name = full.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    if name.is_empty() || (full.ends_with('/') && kind == NodeKind::File) {
        bail!("invalid path: {path:?}");
    }
    Ok((parent_path_of(&full).to_string(), name.to_string(), kind))
}

pub async fn handle_rm(mut session: Session, target: &str) -> anyhow::Result<()> {
    let id = session.playground.resolve(target)?.id.clone();
    session.playground.delete(&id).await;
    session.finish().await
}

pub async fn handle_rename(mut session: Session, target: &str, name: &str) -> anyhow::Result<()> {
    let id = session.playground.resolve(target)?.id.clone();
    if !session.playground.rename(&id, name).await {
        bail!("invalid name: {name:?}");
    }
    session.finish().await
}

pub async fn handle_mv(mut session: Session, target: &str, folder: &str) -> anyhow::Result<()> {
    let id = session.playground.resolve(target)?.id.clone();
    if !session.playground.move_node(&id, folder).await {
        bail!("cannot move {target} to {folder}");
    }
    session.finish().await
}

/// Replace a file's content from a string, a file, or stdin.
pub async fn handle_write(
    mut session: Session,
    target: &str,
    content: Option<String>,
    from_file: Option<&Path>,
) -> anyhow::Result<()> {
    let content = match (content, from_file) {
        (Some(content), _) => content,
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("could not read {}", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let node = session.playground.resolve(target)?;
    if node.is_folder() {
        bail!("{} is a folder", node.path);
    }
    let id = node.id.clone();
    session.playground.write(&id, content).await;
    session.finish().await
}

/// Add a local file to the project root.
pub async fn handle_upload(mut session: Session, path: &Path) -> anyhow::Result<()> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("no file name in {}", path.display()))?;
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("could not read {}", path.display()))?;

    let node = session
        .playground
        .upload(name, content)
        .await
        .with_context(|| format!("could not add {name}"))?;
    println!("{}", node.id);
    session.finish().await
}

/// Run a file. Web files print the composed preview document.
pub async fn handle_run(mut session: Session, target: Option<&str>) -> anyhow::Result<()> {
    if let Some(target) = target {
        let id = session.playground.resolve(target)?.id.clone();
        session.playground.select(Some(&id)).await;
    }

    let mut terminal = WriterTerminal::new(std::io::stdout());
    let result = session.playground.run(&mut terminal).await;
    session.flush_notices();

    match result {
        Some(RunResult::Preview(html)) => println!("{html}"),
        Some(RunResult::Executed(outcome)) => tracing::debug!(?outcome, "run finished"),
        None => bail!("no file selected"),
    }
    session.finish().await
}

pub fn handle_preview(session: &mut Session) {
    println!("{}", session.playground.preview());
    session.flush_notices();
}

pub fn handle_status(session: &mut Session) {
    println!("{}", session.playground.status());
    if let Some(file) = session.playground.active_file() {
        println!("Active: {}", describe(file));
    }
    session.flush_notices();
}

fn describe(node: &FileNode) -> String {
    format!("{} [{}]", node.path, node.id)
}
