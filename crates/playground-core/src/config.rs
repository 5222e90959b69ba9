//! Configuration management for codeplayground.
//!
//! Configuration is loaded from multiple sources and merged:
//! 1. Global config: `~/.config/codeplayground/config.json`
//! 2. Environment variable: `CODEPLAYGROUND_CONFIG_CONTENT`
//! 3. Project config: `codeplayground.jsonc` or `codeplayground.json` in the project directory
//!
//! Supports JSONC (JSON with comments) and variable substitution:
//! - `{env:VAR_NAME}` - Substitute environment variable
//! - `{file:path}` - Substitute file contents

use crate::error::{ConfigError, CoreResult};
use playground_exec::ExecConfig;
use playground_util::log::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

/// Environment variable holding inline config content.
pub const CONFIG_CONTENT_ENV: &str = "CODEPLAYGROUND_CONFIG_CONTENT";

/// File name written by [`PlaygroundConfig::save`].
pub const PROJECT_CONFIG_FILE: &str = "codeplayground.json";

const GLOBAL_CONFIG_FILES: &[&str] = &["config.json", "codeplayground.json", "codeplayground.jsonc"];
const PROJECT_CONFIG_FILES: &[&str] = &["codeplayground.jsonc", PROJECT_CONFIG_FILE];

pub const DEFAULT_AUTOSAVE_INTERVAL_MS: u64 = 5000;
pub const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 1000;
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const DEFAULT_SHARE_ORIGIN: &str = "http://localhost:3000";

static VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

fn var_regex() -> &'static regex::Regex {
    VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\{(env|file):([^}]+)\}")
            .expect("Invalid regex pattern - this is a compile-time constant")
    })
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    /// JSON Schema reference.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Theme for new projects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub autosave: Option<AutosaveConfig>,

    /// Number of saved versions kept per user. `0` keeps all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_limit: Option<usize>,

    /// Origin that share links are built on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_origin: Option<String>,

    /// Where the key/value store lives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exec: Option<ExecConfig>,
}

/// Autosave timing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Period of the recurring save.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,

    /// Quiet time after a change before it is saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,
}

impl AutosaveConfig {
    pub fn merge(mut self, other: Self) -> Self {
        if other.enabled.is_some() {
            self.enabled = other.enabled;
        }
        if other.interval_ms.is_some() {
            self.interval_ms = other.interval_ms;
        }
        if other.debounce_ms.is_some() {
            self.debounce_ms = other.debounce_ms;
        }
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(
            self.interval_ms
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_AUTOSAVE_INTERVAL_MS),
        )
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms.unwrap_or(DEFAULT_AUTOSAVE_DEBOUNCE_MS))
    }
}

impl PlaygroundConfig {
    /// Load configuration from all sources.
    ///
    /// Loading order (later sources override earlier):
    /// 1. Global config from `~/.config/codeplayground/`
    /// 2. `CODEPLAYGROUND_CONFIG_CONTENT` environment variable
    /// 3. Project config from `project_dir`
    pub async fn load(project_dir: Option<&Path>) -> CoreResult<(Self, Vec<PathBuf>)> {
        let mut config = PlaygroundConfig::default();
        let mut sources = Vec::new();

        if let Some(global_dir) = Self::global_config_dir() {
            if let Some(path) = first_existing(&global_dir, GLOBAL_CONFIG_FILES) {
                config = config.merge(Self::load_file(&path).await?);
                sources.push(path);
            }
        }

        if let Ok(content) = std::env::var(CONFIG_CONTENT_ENV) {
            config = config.merge(Self::parse_jsonc(&content, "<env>")?);
        }

        if let Some(dir) = project_dir {
            if let Some(path) = first_existing(dir, PROJECT_CONFIG_FILES) {
                config = config.merge(Self::load_file(&path).await?);
                sources.push(path);
            }
        }

        tracing::debug!(sources = sources.len(), "configuration loaded");
        Ok((config, sources))
    }

    /// Get the global config directory.
    ///
    /// On Unix, prefers `~/.config/codeplayground` when it exists.
    pub fn global_config_dir() -> Option<PathBuf> {
        #[cfg(unix)]
        {
            if let Some(home) = dirs::home_dir() {
                let xdg_config = home.join(".config").join("codeplayground");
                if xdg_config.exists() {
                    return Some(xdg_config);
                }
            }
        }

        playground_util::path::config_dir()
    }

    /// Load configuration from a file.
    pub async fn load_file(path: &Path) -> CoreResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let content = Self::substitute_variables(&content, path)?;
        Self::parse_jsonc(&content, &path.display().to_string())
    }

    fn parse_jsonc(content: &str, source: &str) -> CoreResult<Self> {
        let stripped = Self::strip_comments(content);

        serde_json::from_str(&stripped).map_err(|e| {
            ConfigError::InvalidJson {
                path: source.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Strip `//` and `/* */` comments outside of strings.
    fn strip_comments(input: &str) -> String {
        let mut result = String::with_capacity(input.len());
        let mut chars = input.chars().peekable();
        let mut in_string = false;
        let mut escape_next = false;

        while let Some(c) = chars.next() {
            if escape_next {
                result.push(c);
                escape_next = false;
                continue;
            }

            if c == '\\' && in_string {
                result.push(c);
                escape_next = true;
                continue;
            }

            if c == '"' {
                in_string = !in_string;
                result.push(c);
                continue;
            }

            if in_string {
                result.push(c);
                continue;
            }

            if c == '/' {
                match chars.peek() {
                    Some('/') => {
                        chars.next();
                        for c in chars.by_ref() {
                            if c == '\n' {
                                result.push('\n');
                                break;
                            }
                        }
                        continue;
                    }
                    Some('*') => {
                        chars.next();
                        let mut prev = ' ';
                        for c in chars.by_ref() {
                            if prev == '*' && c == '/' {
                                break;
                            }
                            // Keep line numbers in parse errors
                            if c == '\n' {
                                result.push('\n');
                            }
                            prev = c;
                        }
                        continue;
                    }
                    _ => {}
                }
            }

            result.push(c);
        }

        result
    }

    /// Substitute `{env:VAR}` and `{file:path}` references. File paths are
    /// relative to the config file.
    fn substitute_variables(content: &str, config_path: &Path) -> CoreResult<String> {
        let config_dir = config_path.parent().unwrap_or(Path::new("."));

        let mut result = content.to_string();
        for cap in var_regex().captures_iter(content) {
            let (Some(full_match), Some(kind), Some(value)) = (cap.get(0), cap.get(1), cap.get(2))
            else {
                continue;
            };
            let value = value.as_str();

            let replacement = match kind.as_str() {
                "env" => std::env::var(value).map_err(|_| ConfigError::EnvVarNotFound {
                    name: value.to_string(),
                })?,
                "file" => {
                    let file_path = config_dir.join(value);
                    std::fs::read_to_string(&file_path)
                        .map_err(|_| ConfigError::FileRefNotFound {
                            path: file_path.display().to_string(),
                        })?
                        .trim()
                        .to_string()
                }
                _ => continue,
            };

            result = result.replace(full_match.as_str(), &replacement);
        }

        Ok(result)
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(mut self, other: Self) -> Self {
        if other.schema.is_some() {
            self.schema = other.schema;
        }
        if other.theme.is_some() {
            self.theme = other.theme;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
        if other.history_limit.is_some() {
            self.history_limit = other.history_limit;
        }
        if other.share_origin.is_some() {
            self.share_origin = other.share_origin;
        }
        if other.data_dir.is_some() {
            self.data_dir = other.data_dir;
        }

        self.autosave = match (self.autosave, other.autosave) {
            (Some(base), Some(other)) => Some(base.merge(other)),
            (base, None) => base,
            (None, other) => other,
        };
        self.exec = merge_option(self.exec, other.exec);

        self
    }

    pub fn theme(&self) -> &str {
        self.theme.as_deref().unwrap_or(crate::theme::DEFAULT_THEME)
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT)
    }

    pub fn share_origin(&self) -> &str {
        self.share_origin.as_deref().unwrap_or(DEFAULT_SHARE_ORIGIN)
    }

    pub fn autosave(&self) -> AutosaveConfig {
        self.autosave.clone().unwrap_or_default()
    }

    pub fn exec(&self) -> ExecConfig {
        self.exec.clone().unwrap_or_default()
    }
}

fn first_existing(dir: &Path, names: &[&str]) -> Option<PathBuf> {
    names.iter().map(|name| dir.join(name)).find(|p| p.exists())
}

fn merge_option<T>(base: Option<T>, other: Option<T>) -> Option<T> {
    match (base, other) {
        (_, Some(o)) => Some(o),
        (b, None) => b,
    }
}
