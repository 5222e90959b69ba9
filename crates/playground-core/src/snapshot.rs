//! Point-in-time captures of a project.

use crate::theme::DEFAULT_THEME;
use crate::tree::Forest;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A persisted capture of the forest, active selection and theme.
///
/// Snapshots are values: capturing deep-copies the forest and nothing
/// mutates a snapshot afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub files: Forest,
    #[serde(default)]
    pub active_file_id: Option<String>,
    /// Capture instant, epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

impl Snapshot {
    /// Capture the given state now.
    pub fn capture(files: &Forest, active_file_id: Option<&str>, theme: &str) -> Self {
        Self {
            files: files.clone(),
            active_file_id: active_file_id.map(str::to_string),
            timestamp: Utc::now().timestamp_millis(),
            theme: theme.to_string(),
        }
    }

    /// Capture instant as a date, if the timestamp is representable.
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    /// The active file id, if it names a node in this snapshot.
    pub fn resolved_active_id(&self) -> Option<&str> {
        let id = self.active_file_id.as_deref()?;
        self.files.find(id).map(|n| n.id.as_str())
    }
}

/// Version history of one user, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a snapshot, dropping the oldest entries beyond `limit`.
    /// A limit of `0` keeps everything.
    pub fn prepend(&mut self, snapshot: Snapshot, limit: usize) {
        self.entries.insert(0, snapshot);
        if limit > 0 {
            self.entries.truncate(limit);
        }
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{FileNode, NodeKind};

    fn forest() -> Forest {
        let mut forest = Forest::new();
        forest.create("index.html", NodeKind::File, "/");
        forest
    }

    #[test]
    fn test_capture_is_deep_copy() {
        let mut files = forest();
        let id = files.nodes()[0].id.clone();
        let snapshot = Snapshot::capture(&files, Some(&id), "dark");

        files.set_content(&id, "changed");
        assert_eq!(snapshot.files.find(&id).unwrap().content(), Some(""));
        assert!(snapshot.timestamp > 0);
        assert!(snapshot.captured_at().is_some());
    }

    #[test]
    fn test_record_json_shape() {
        let files = Forest::from(vec![FileNode::file("a.js", "1").with_id("1")]);
        let snapshot = Snapshot {
            files,
            active_file_id: None,
            timestamp: 1_700_000_000_000,
            theme: "nord".to_string(),
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["activeFileId"], serde_json::Value::Null);
        assert_eq!(json["timestamp"], 1_700_000_000_000_i64);
        assert_eq!(json["theme"], "nord");
        assert_eq!(json["files"][0]["id"], "1");
    }

    #[test]
    fn test_missing_theme_defaults_to_dark() {
        let snapshot: Snapshot =
            serde_json::from_str(r#"{"files": [], "activeFileId": null, "timestamp": 5}"#).unwrap();
        assert_eq!(snapshot.theme, "dark");
    }

    #[test]
    fn test_resolved_active_id() {
        let files = forest();
        let id = files.nodes()[0].id.clone();
        let snapshot = Snapshot::capture(&files, Some(&id), "dark");
        assert_eq!(snapshot.resolved_active_id(), Some(id.as_str()));

        let dangling = Snapshot::capture(&files, Some("gone"), "dark");
        assert_eq!(dangling.resolved_active_id(), None);
    }

    #[test]
    fn test_history_is_newest_first_and_bounded() {
        let mut history = History::new();
        for i in 0..5 {
            let mut s = Snapshot::capture(&Forest::new(), None, "dark");
            s.timestamp = i;
            history.prepend(s, 3);
        }
        assert_eq!(history.len(), 3);
        let stamps: Vec<i64> = history.entries().iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps, vec![4, 3, 2]);
    }

    #[test]
    fn test_history_unbounded_with_zero_limit() {
        let mut history = History::new();
        for _ in 0..60 {
            history.prepend(Snapshot::capture(&Forest::new(), None, "dark"), 0);
        }
        assert_eq!(history.len(), 60);
        assert!(history.get(59).is_some());
        assert!(history.get(60).is_none());
    }
}
