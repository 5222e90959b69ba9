//! Theme, extension and editor settings handlers.

use super::context::Session;
use anyhow::bail;
use playground_core::extensions;
use playground_core::theme::{find_theme, THEMES};
use serde_json::Value;

/// List themes, or switch the project theme.
pub async fn handle_theme(mut session: Session, name: Option<&str>) -> anyhow::Result<()> {
    let Some(name) = name else {
        let current = session.playground.theme();
        for theme in THEMES {
            let marker = if theme.name == current { "*" } else { " " };
            println!(
                "{marker} {:<16} {:<16} {}",
                theme.name,
                theme.display_name(),
                theme.editor_base.as_str()
            );
        }
        session.flush_notices();
        return Ok(());
    };

    if find_theme(name).is_none() {
        bail!("unknown theme: {name}");
    }
    session.playground.set_theme(name).await;
    session.finish().await
}

pub fn handle_ext_list(session: &mut Session) {
    for ext in session.playground.extensions() {
        let mark = if ext.enabled { "x" } else { " " };
        println!("[{mark}] {:<16} {}", ext.id, ext.name);
    }
    session.flush_notices();
}

pub async fn handle_ext_toggle(mut session: Session, id: &str) -> anyhow::Result<()> {
    match session.playground.toggle_extension(id).await? {
        Some(true) => println!("Enabled {id}"),
        Some(false) => println!("Disabled {id}"),
        None => bail!("unknown extension: {id}"),
    }
    session.finish().await
}

pub fn handle_ext_search(term: &str) {
    let found = extensions::search(term);
    if found.is_empty() {
        println!("No extensions match {term:?}.");
    }
    for ext in found {
        println!("{:<16} {}: {}", ext.id, ext.name, ext.description);
    }
}

/// Print one setting, or all of them.
pub async fn handle_settings_get(session: &mut Session, key: Option<&str>) -> anyhow::Result<()> {
    let settings = session.playground.persistence().load_settings().await;
    match key {
        Some(key) => match settings.get(key)? {
            Some(value) => println!("{value}"),
            None => bail!("unknown setting: {key}"),
        },
        None => println!("{}", serde_json::to_string_pretty(&settings)?),
    }
    session.flush_notices();
    Ok(())
}

/// Set a setting. The value is read as JSON, falling back to a string.
pub async fn handle_settings_set(session: &mut Session, key: &str, raw: &str) -> anyhow::Result<()> {
    let persistence = session.playground.persistence();
    let mut settings = persistence.load_settings().await;
    settings.set(key, parse_setting_value(raw))?;
    persistence.save_settings(&settings).await?;
    session.flush_notices();
    Ok(())
}

fn parse_setting_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_setting_value() {
        assert_eq!(parse_setting_value("18"), Value::from(18));
        assert_eq!(parse_setting_value("false"), Value::from(false));
        assert_eq!(parse_setting_value("Fira Code"), Value::from("Fira Code"));
    }
}
