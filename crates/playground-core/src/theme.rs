//! Built-in themes.

use serde::{Deserialize, Serialize};

/// Theme used when none is stored.
pub const DEFAULT_THEME: &str = "dark";

/// Base palette of the code editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditorBase {
    #[serde(rename = "vs-dark")]
    Dark,
    #[serde(rename = "vs-light")]
    Light,
}

impl EditorBase {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorBase::Dark => "vs-dark",
            EditorBase::Light => "vs-light",
        }
    }
}

/// A selectable theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Stored name, e.g. `solarizedDark`.
    pub name: &'static str,
    pub editor_base: EditorBase,
}

impl Theme {
    /// Name for display: the stored name with its first letter capitalized.
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

const fn theme(name: &'static str, editor_base: EditorBase) -> Theme {
    Theme { name, editor_base }
}

/// Every built-in theme.
pub const THEMES: &[Theme] = &[
    theme("dark", EditorBase::Dark),
    theme("light", EditorBase::Light),
    theme("dracula", EditorBase::Dark),
    theme("monokai", EditorBase::Dark),
    theme("solarizedDark", EditorBase::Dark),
    theme("solarizedLight", EditorBase::Light),
    theme("githubDark", EditorBase::Dark),
    theme("githubLight", EditorBase::Light),
    theme("nord", EditorBase::Dark),
    theme("cyberpunk", EditorBase::Dark),
    theme("synthwave", EditorBase::Dark),
    theme("oceanBlue", EditorBase::Dark),
    theme("forest", EditorBase::Dark),
    theme("sunset", EditorBase::Light),
    theme("midnight", EditorBase::Dark),
    // Follows the host preference; dark until one is known
    theme("system", EditorBase::Dark),
];

/// Look up a built-in theme by name.
pub fn find_theme(name: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|t| t.name == name)
}

/// Editor base for a theme name. Unknown names use the dark base.
pub fn editor_base(name: &str) -> EditorBase {
    find_theme(name).map_or(EditorBase::Dark, |t| t.editor_base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog() {
        assert_eq!(THEMES.len(), 16);
        assert!(find_theme(DEFAULT_THEME).is_some());
        assert!(find_theme("Dracula").is_none());
    }

    #[test]
    fn test_editor_base() {
        assert_eq!(editor_base("sunset"), EditorBase::Light);
        assert_eq!(editor_base("nord"), EditorBase::Dark);
        assert_eq!(editor_base("unknown"), EditorBase::Dark);
        assert_eq!(EditorBase::Light.as_str(), "vs-light");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(find_theme("oceanBlue").unwrap().display_name(), "OceanBlue");
        assert_eq!(find_theme("dark").unwrap().display_name(), "Dark");
    }
}
