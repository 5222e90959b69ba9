//! Export and import command handlers.

use super::context::Session;
use anyhow::Context as _;
use std::path::Path;

/// Export the project as JSON to a file or stdout.
pub async fn handle_export(mut session: Session, output: Option<&Path>) -> anyhow::Result<()> {
    let json = session.playground.export()?;
    match output {
        Some(path) => {
            tokio::fs::write(path, &json)
                .await
                .with_context(|| format!("could not write {}", path.display()))?;
            eprintln!("Exported project to {}", path.display());
        }
        None => println!("{json}"),
    }
    session.flush_notices();
    Ok(())
}

/// Replace the project with an exported JSON file.
pub async fn handle_import(mut session: Session, input: &Path) -> anyhow::Result<()> {
    let json = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("could not read {}", input.display()))?;

    let result = session.playground.import(&json).await;
    session.flush_notices();
    result?;
    session.finish().await
}
