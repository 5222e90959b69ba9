//! Sharing, login and version history handlers.

use super::context::Session;
use anyhow::Context as _;
use playground_core::Snapshot;

/// Share the project and print the link.
pub async fn handle_share(mut session: Session) -> anyhow::Result<()> {
    let link = session.playground.share().await?;
    println!("{}", link.url);
    println!("Shared id: {}", link.id);
    session.finish().await
}

/// Write local changes to the shared project.
pub async fn handle_push(mut session: Session) -> anyhow::Result<()> {
    let result = session.playground.save_shared_changes().await;
    session.flush_notices();
    Ok(result?)
}

/// Reload the shared project from the store.
pub async fn handle_pull(mut session: Session) -> anyhow::Result<()> {
    let result = session.playground.pull_shared_changes().await;
    session.flush_notices();
    Ok(result?)
}

pub async fn handle_login(mut session: Session, user: &str) -> anyhow::Result<()> {
    session.playground.login(user).await?;
    let user = session.playground.user().unwrap_or_default();
    println!(
        "Logged in as {user} ({} saved version(s))",
        session.playground.history().len()
    );
    session.finish().await
}

pub async fn handle_logout(mut session: Session) -> anyhow::Result<()> {
    match session.playground.user().map(str::to_string) {
        Some(user) => {
            session.playground.logout().await?;
            println!("Logged out {user}");
        }
        None => println!("Not logged in"),
    }
    session.finish().await
}

pub async fn handle_save_version(mut session: Session) -> anyhow::Result<()> {
    let result = session.playground.save_version().await;
    session.flush_notices();
    let snapshot = result?;
    println!("Saved version at {}", format_timestamp(&snapshot));
    Ok(())
}

/// List saved versions, newest first.
pub fn handle_history(session: &mut Session) -> anyhow::Result<()> {
    let user = session
        .playground
        .user()
        .context("not logged in; run `codeplayground login <name>` first")?;

    let history = session.playground.history();
    if history.is_empty() {
        println!("No saved versions for {user}.");
    }
    for (index, snapshot) in history.entries().iter().enumerate() {
        println!("{}", format_entry(index, snapshot));
    }
    session.flush_notices();
    Ok(())
}

/// Restore a saved version and make it the current project.
pub async fn handle_restore(mut session: Session, index: usize) -> anyhow::Result<()> {
    session.playground.load_version(index).await?;
    println!("Restored version {index}");
    session.finish().await
}

fn format_entry(index: usize, snapshot: &Snapshot) -> String {
    format!(
        "{index:>3}  {}  {} file(s)  theme {}",
        format_timestamp(snapshot),
        snapshot.files.file_count(),
        snapshot.theme
    )
}

fn format_timestamp(snapshot: &Snapshot) -> String {
    snapshot
        .captured_at()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown time".to_string())
}
