//! The default project, and project export/import.

use crate::error::{CoreResult, ImportError};
use crate::extensions::EnabledExtension;
use crate::theme::DEFAULT_THEME;
use crate::tree::{FileNode, Forest};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name recorded in exported project files.
pub const PROJECT_NAME: &str = "CodePlayground Project";
/// Format version of exported project files.
pub const PROJECT_FORMAT_VERSION: &str = "1.0.0";

const DEFAULT_INDEX_HTML: &str = include_str!("../assets/default/index.html");
const DEFAULT_STYLE_CSS: &str = include_str!("../assets/default/style.css");
const DEFAULT_SCRIPT_JS: &str = include_str!("../assets/default/script.js");

/// Id of the file selected when the default project is opened.
pub const DEFAULT_ACTIVE_ID: &str = "1";

/// The starter project: `index.html`, `style.css` and `script.js` at the
/// root, with ids `1`, `2` and `3`.
pub fn default_project() -> Forest {
    Forest::from(vec![
        FileNode::file("index.html", DEFAULT_INDEX_HTML).with_id("1"),
        FileNode::file("style.css", DEFAULT_STYLE_CSS).with_id("2"),
        FileNode::file("script.js", DEFAULT_SCRIPT_JS).with_id("3"),
    ])
}

/// An exported project document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    pub files: Forest,
    pub theme: String,
    pub enabled_extensions: Vec<EnabledExtension>,
    pub metadata: ProjectMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub name: String,
    /// ISO-8601 export time.
    pub created: String,
    pub version: String,
}

impl ProjectFile {
    /// Build an export of the given state, stamped now.
    pub fn new(files: &Forest, theme: &str, enabled_extensions: &[EnabledExtension]) -> Self {
        Self {
            files: files.clone(),
            theme: theme.to_string(),
            enabled_extensions: enabled_extensions.to_vec(),
            metadata: ProjectMetadata {
                name: PROJECT_NAME.to_string(),
                created: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                version: PROJECT_FORMAT_VERSION.to_string(),
            },
        }
    }

    /// Pretty-printed JSON document.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// State read from a project document, ready to replace the current state.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedProject {
    pub files: Forest,
    /// The first root entry, if any.
    pub active_file_id: Option<String>,
    pub theme: String,
    pub enabled_extensions: Vec<EnabledExtension>,
}

/// Parse a project document.
///
/// Only `files` is required. A missing theme means the default theme and
/// missing or unreadable extensions mean none are enabled.
pub fn parse_project(json: &str) -> Result<ImportedProject, ImportError> {
    let mut doc: Value =
        serde_json::from_str(json).map_err(|e| ImportError::Parse(e.to_string()))?;

    let files = match doc.get_mut("files").map(Value::take) {
        None | Some(Value::Null) => return Err(ImportError::MissingFiles),
        Some(files) => serde_json::from_value::<Forest>(files)
            .map_err(|e| ImportError::Parse(format!("files: {e}")))?,
    };

    let theme = doc
        .get("theme")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_THEME)
        .to_string();

    let enabled_extensions = doc
        .get_mut("enabledExtensions")
        .map(Value::take)
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();

    Ok(ImportedProject {
        active_file_id: files.nodes().first().map(|n| n.id.clone()),
        files,
        theme,
        enabled_extensions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::default_states;

    #[test]
    fn test_default_project() {
        let project = default_project();
        let names: Vec<&str> = project.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["index.html", "style.css", "script.js"]);

        let index = project.find(DEFAULT_ACTIVE_ID).unwrap();
        assert_eq!(index.path, "/index.html");
        assert_eq!(index.language(), Some("html"));
        assert!(index
            .content()
            .unwrap()
            .contains(r#"<link rel="stylesheet" href="style.css">"#));
        assert_eq!(project.find("3").unwrap().language(), Some("javascript"));
        assert!(project.paths_consistent());
    }

    #[test]
    fn test_export_shape() {
        let export = ProjectFile::new(&default_project(), "nord", &default_states());
        let json: Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();

        assert_eq!(json["theme"], "nord");
        assert_eq!(json["files"].as_array().unwrap().len(), 3);
        assert_eq!(json["files"][0]["type"], "file");
        assert_eq!(json["enabledExtensions"][0]["id"], "prettier");
        assert_eq!(json["metadata"]["name"], "CodePlayground Project");
        assert_eq!(json["metadata"]["version"], "1.0.0");
        assert!(json["metadata"]["created"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_export_then_parse() {
        let export = ProjectFile::new(&default_project(), "nord", &default_states());
        let imported = parse_project(&export.to_json().unwrap()).unwrap();

        assert_eq!(imported.files, default_project());
        assert_eq!(imported.active_file_id.as_deref(), Some("1"));
        assert_eq!(imported.theme, "nord");
        assert_eq!(imported.enabled_extensions, default_states());
    }

    #[test]
    fn test_minimal_document() {
        let imported = parse_project(
            r#"{"files": [{"id": "a", "name": "x.py", "type": "file", "path": "/x.py"}]}"#,
        )
        .unwrap();
        assert_eq!(imported.theme, "dark");
        assert!(imported.enabled_extensions.is_empty());
        assert_eq!(imported.active_file_id.as_deref(), Some("a"));
        assert_eq!(imported.files.find("a").unwrap().content(), Some(""));
    }

    #[test]
    fn test_empty_files_is_accepted() {
        let imported = parse_project(r#"{"files": []}"#).unwrap();
        assert!(imported.files.is_empty());
        assert!(imported.active_file_id.is_none());
    }

    #[test]
    fn test_rejections() {
        assert!(matches!(
            parse_project("not json"),
            Err(ImportError::Parse(_))
        ));
        assert!(matches!(
            parse_project(r#"{"theme": "dark"}"#),
            Err(ImportError::MissingFiles)
        ));
        assert!(matches!(
            parse_project(r#"{"files": null}"#),
            Err(ImportError::MissingFiles)
        ));
        assert!(matches!(
            parse_project(r#"{"files": "index.html"}"#),
            Err(ImportError::Parse(_))
        ));
    }
}
