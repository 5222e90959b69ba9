//! Editor settings.

use crate::error::CoreResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Editor, terminal and preview preferences.
///
/// Stored as one camelCase JSON object. Keys this version does not know are
/// kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorSettings {
    // Editor
    pub font_size: u32,
    pub font_family: String,
    pub theme: String,
    pub tab_size: u32,
    pub word_wrap: bool,
    pub line_numbers: bool,
    pub minimap: bool,
    pub auto_save: bool,

    // Language
    pub default_language: String,
    pub auto_detect_language: bool,
    pub format_on_save: bool,
    pub linting: bool,

    // Terminal
    pub terminal_font_size: u32,
    pub terminal_theme: String,
    pub shell_path: String,

    // Assistant
    pub ai_provider: String,
    pub ai_auto_complete: bool,
    pub ai_suggestions: bool,

    // Performance
    /// Megabytes.
    pub max_file_size: u32,
    /// Milliseconds.
    pub preview_refresh_rate: u32,
    pub enable_hot_reload: bool,

    // Security
    pub sandbox_mode: bool,
    pub allow_file_upload: bool,
    /// Megabytes.
    pub max_upload_size: u32,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            font_size: 14,
            font_family: "JetBrains Mono".to_string(),
            theme: crate::theme::DEFAULT_THEME.to_string(),
            tab_size: 2,
            word_wrap: true,
            line_numbers: true,
            minimap: true,
            auto_save: true,
            default_language: "javascript".to_string(),
            auto_detect_language: true,
            format_on_save: true,
            linting: true,
            terminal_font_size: 12,
            terminal_theme: "dark".to_string(),
            shell_path: "/bin/bash".to_string(),
            ai_provider: "gpt-4".to_string(),
            ai_auto_complete: true,
            ai_suggestions: true,
            max_file_size: 10,
            preview_refresh_rate: 500,
            enable_hot_reload: true,
            sandbox_mode: true,
            allow_file_upload: true,
            max_upload_size: 50,
            extra: Map::new(),
        }
    }
}

impl EditorSettings {
    /// Value of a setting by its JSON key.
    pub fn get(&self, key: &str) -> CoreResult<Option<Value>> {
        let Value::Object(map) = serde_json::to_value(self)? else {
            return Ok(None);
        };
        Ok(map.get(key).cloned())
    }

    /// Set a setting by its JSON key.
    ///
    /// The value must have the setting's type; unknown keys are stored as-is.
    pub fn set(&mut self, key: &str, value: Value) -> CoreResult<()> {
        let mut map = match serde_json::to_value(&*self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        map.insert(key.to_string(), value);
        *self = serde_json::from_value(Value::Object(map))?;
        Ok(())
    }
}
