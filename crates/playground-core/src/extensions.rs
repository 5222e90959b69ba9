//! Extension catalog and enabled flags.

use serde::{Deserialize, Serialize};

/// An extension with its enabled flag, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnabledExtension {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub enabled_by_default: bool,
}

/// Extensions offered by the store.
pub const CATALOG: &[Extension] = &[
    Extension {
        id: "prettier",
        name: "Code Formatter (Prettier)",
        description: "Automatically formats your code for consistency.",
        enabled_by_default: false,
    },
    Extension {
        id: "linting",
        name: "Linting (ESLint)",
        description: "Highlights potential errors and stylistic issues.",
        enabled_by_default: false,
    },
    Extension {
        id: "autocomplete",
        name: "Intelligent Autocomplete",
        description: "Provides smart code suggestions as you type.",
        enabled_by_default: true,
    },
    Extension {
        id: "git-integration",
        name: "Git Integration",
        description: "Basic Git commands and status indicators.",
        enabled_by_default: false,
    },
    Extension {
        id: "live-share",
        name: "Live Share",
        description: "Collaborate in real-time with others.",
        enabled_by_default: false,
    },
];

/// The catalog with default flags.
pub fn default_states() -> Vec<EnabledExtension> {
    CATALOG
        .iter()
        .map(|ext| EnabledExtension {
            id: ext.id.to_string(),
            name: ext.name.to_string(),
            enabled: ext.enabled_by_default,
            config: None,
        })
        .collect()
}

/// The catalog with flags taken from `saved` where present.
///
/// Saved entries for extensions no longer in the catalog are dropped.
pub fn merge_saved(saved: &[EnabledExtension]) -> Vec<EnabledExtension> {
    default_states()
        .into_iter()
        .map(|mut ext| {
            if let Some(s) = saved.iter().find(|s| s.id == ext.id) {
                ext.enabled = s.enabled;
                ext.config = s.config.clone();
            }
            ext
        })
        .collect()
}

/// Flip an extension's flag. Returns the new flag, or `None` if the id is
/// not in the list.
pub fn toggle(states: &mut [EnabledExtension], id: &str) -> Option<bool> {
    let ext = states.iter_mut().find(|e| e.id == id)?;
    ext.enabled = !ext.enabled;
    Some(ext.enabled)
}

/// Catalog entries whose name or description contains `term`, ignoring case.
pub fn search(term: &str) -> Vec<&'static Extension> {
    let term = term.to_lowercase();
    CATALOG
        .iter()
        .filter(|ext| {
            ext.name.to_lowercase().contains(&term)
                || ext.description.to_lowercase().contains(&term)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let states = default_states();
        assert_eq!(states.len(), 5);
        let enabled: Vec<_> = states.iter().filter(|e| e.enabled).map(|e| e.id.as_str()).collect();
        assert_eq!(enabled, vec!["autocomplete"]);
    }

    #[test]
    fn test_merge_saved() {
        let saved = vec![
            EnabledExtension {
                id: "prettier".into(),
                name: "old name".into(),
                enabled: true,
                config: None,
            },
            EnabledExtension {
                id: "retired".into(),
                name: "Retired".into(),
                enabled: true,
                config: None,
            },
        ];
        let merged = merge_saved(&saved);
        assert_eq!(merged.len(), 5);
        let prettier = merged.iter().find(|e| e.id == "prettier").unwrap();
        assert!(prettier.enabled);
        assert_eq!(prettier.name, "Code Formatter (Prettier)");
    }

    #[test]
    fn test_toggle() {
        let mut states = default_states();
        assert_eq!(toggle(&mut states, "live-share"), Some(true));
        assert_eq!(toggle(&mut states, "live-share"), Some(false));
        assert_eq!(toggle(&mut states, "missing"), None);
    }

    #[test]
    fn test_search() {
        let ids: Vec<_> = search("GIT").iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["git-integration"]);
        let ids: Vec<_> = search("code").iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["prettier", "autocomplete"]);
        assert_eq!(search("").len(), 5);
    }

    #[test]
    fn test_persisted_shape() {
        let json = serde_json::to_value(&default_states()[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "prettier", "name": "Code Formatter (Prettier)", "enabled": false})
        );
    }
}
