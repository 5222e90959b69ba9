//! Application state.
//!
//! [`Playground`] owns everything a session works on: the forest, the
//! selection, theme, extensions, the shared id and the logged-in user. All
//! storage access goes through its [`Persistence`] service, and every user
//! facing message is published as a [`Notice`] on the bus.

use crate::autosave::Autosave;
use crate::bus::{Bus, SelectionChanged, ThemeChanged, TreeChange, TreeChanged};
use crate::config::{AutosaveConfig, PlaygroundConfig, DEFAULT_SHARE_ORIGIN};
use crate::error::{CoreError, CoreResult};
use crate::extensions::{self, EnabledExtension};
use crate::identity::{validate_username, StorageIdentity};
use crate::language::{is_web_language, PLAIN_TEXT};
use crate::notice::Notice;
use crate::persistence::{Persistence, SaveRequest};
use crate::preview::compose_preview;
use crate::project::{default_project, parse_project, ProjectFile, DEFAULT_ACTIVE_ID};
use crate::snapshot::{History, Snapshot};
use crate::terminal;
use crate::theme::DEFAULT_THEME;
use crate::tree::{FileNode, Forest, NodeKind};
use chrono::{DateTime, TimeZone, Utc};
use playground_exec::{RunOutcome, Simulator, TerminalSurface};
use playground_storage::Storage;
use std::fmt;
use tracing::{debug, info, warn};

/// A link to a shared project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub id: String,
    pub url: String,
}

/// What [`Playground::run`] did with the active file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    /// Web files render in the preview; this is the composed document.
    Preview(String),
    /// The file went through the execution simulator.
    Executed(RunOutcome),
}

/// Status bar summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Name and language of the open file.
    pub active: Option<(String, String)>,
    pub file_count: usize,
    pub last_saved: Option<DateTime<Utc>>,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.active {
            Some((name, language)) => write!(f, "{name} ({language})")?,
            None => f.write_str("No file open")?,
        }
        write!(f, " | Files: {}", self.file_count)?;
        if let Some(saved) = self.last_saved {
            write!(f, " | Last saved: {}", saved.format("%H:%M:%S"))?;
        }
        Ok(())
    }
}

/// The state of one playground session.
pub struct Playground<S> {
    files: Forest,
    active_file_id: Option<String>,
    theme: String,
    extensions: Vec<EnabledExtension>,
    shared_id: Option<String>,
    user: Option<String>,
    history: History,
    last_saved: Option<i64>,

    bus: Bus,
    persistence: Persistence<S>,
    simulator: Simulator,
    autosave: Option<Autosave>,
    share_origin: String,
}

impl<S: Storage> Playground<S> {
    /// Create an empty session. Call [`open`](Self::open) to load state.
    pub fn new(persistence: Persistence<S>, bus: Bus) -> Self {
        Self {
            files: Forest::new(),
            active_file_id: None,
            theme: DEFAULT_THEME.to_string(),
            extensions: extensions::default_states(),
            shared_id: None,
            user: None,
            history: History::new(),
            last_saved: None,
            bus,
            persistence,
            simulator: Simulator::default(),
            autosave: None,
            share_origin: DEFAULT_SHARE_ORIGIN.to_string(),
        }
    }

    /// Apply the session-level parts of a configuration.
    pub fn with_config(mut self, config: &PlaygroundConfig) -> Self {
        self.theme = config.theme().to_string();
        self.share_origin = config.share_origin().to_string();
        self.simulator = Simulator::new(config.exec().capabilities());
        self
    }

    pub fn with_simulator(mut self, simulator: Simulator) -> Self {
        self.simulator = simulator;
        self
    }

    pub fn with_share_origin(mut self, origin: impl Into<String>) -> Self {
        self.share_origin = origin.into();
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn files(&self) -> &Forest {
        &self.files
    }

    pub fn active_file_id(&self) -> Option<&str> {
        self.active_file_id.as_deref()
    }

    pub fn active_file(&self) -> Option<&FileNode> {
        self.files.find(self.active_file_id.as_deref()?)
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn extensions(&self) -> &[EnabledExtension] {
        &self.extensions
    }

    pub fn shared_id(&self) -> Option<&str> {
        self.shared_id.as_deref()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Version history of the logged-in user, newest first.
    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    /// Find a node by id, full path, or root-level name.
    pub fn resolve(&self, target: &str) -> CoreResult<&FileNode> {
        self.files
            .find(target)
            .or_else(|| self.files.find_by_path(target))
            .or_else(|| self.files.find_by_name(target))
            .ok_or_else(|| CoreError::PathNotFound(target.to_string()))
    }

    /// Whose key the session reads and writes.
    pub fn identity(&self) -> StorageIdentity {
        StorageIdentity::resolve(self.shared_id.as_deref(), self.user.as_deref())
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.last_saved?).single()
    }

    pub fn status(&self) -> Status {
        Status {
            active: self.active_file().map(|f| {
                (
                    f.name.clone(),
                    f.language().unwrap_or(PLAIN_TEXT).to_string(),
                )
            }),
            file_count: self.files.file_count(),
            last_saved: self.last_saved(),
        }
    }

    /// The current state, as a save would write it.
    pub fn save_request(&self) -> SaveRequest {
        self.save_request_for(self.identity())
    }

    fn save_request_for(&self, identity: StorageIdentity) -> SaveRequest {
        SaveRequest {
            identity,
            files: self.files.clone(),
            active_file_id: self.active_file_id.clone(),
            theme: self.theme.clone(),
            extensions: self.extensions.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Startup and saving
    // ------------------------------------------------------------------

    /// Load the startup state.
    ///
    /// A shared id wins if its project exists; otherwise the last logged-in
    /// user's autosave, then the anonymous autosave, then the default
    /// project.
    pub async fn open(&mut self, shared_id: Option<&str>) -> CoreResult<()> {
        let mut loaded = false;

        if let Some(id) = shared_id {
            let identity = StorageIdentity::Shared(id.to_string());
            match self.persistence.load(&identity).await {
                Some(snapshot) => {
                    self.apply_snapshot(snapshot).await;
                    self.shared_id = Some(id.to_string());
                    loaded = true;
                    self.notice(Notice::info(
                        "Shared project loaded",
                        "This project was loaded from a shared link.",
                    ))
                    .await;
                }
                None => {
                    self.notice(Notice::destructive(
                        "Shared project not found",
                        "No shared project data found for this link. Loading default project.",
                    ))
                    .await;
                }
            }
        }

        if !loaded {
            if let Some(user) = self.persistence.last_user().await {
                self.user = Some(user.clone());
                match self
                    .persistence
                    .load(&StorageIdentity::User(user.clone()))
                    .await
                {
                    Some(snapshot) => {
                        self.apply_snapshot(snapshot).await;
                        self.notice(Notice::info(
                            "Project restored",
                            format!("Welcome back, {user}! Your previous work has been restored."),
                        ))
                        .await;
                    }
                    None => self.fall_back_to_default().await,
                }
                self.history = self.persistence.load_history(&user).await;
            } else {
                match self.persistence.load(&StorageIdentity::Anonymous).await {
                    Some(snapshot) => {
                        self.apply_snapshot(snapshot).await;
                        self.notice(Notice::info(
                            "Project restored",
                            "Your previous work has been restored from auto-save.",
                        ))
                        .await;
                    }
                    None => self.fall_back_to_default().await,
                }
            }
        }

        if let Some(saved) = self.persistence.load_extensions().await {
            self.extensions = extensions::merge_saved(&saved);
        }

        info!(identity = %self.identity(), files = self.files.file_count(), "playground opened");
        Ok(())
    }

    /// Replace the state with the default project and save it.
    pub async fn load_default_project(&mut self) -> CoreResult<()> {
        self.files = default_project();
        self.active_file_id = Some(DEFAULT_ACTIVE_ID.to_string());
        self.theme = DEFAULT_THEME.to_string();
        self.tree_changed(TreeChange::Replaced, None, None).await;
        self.save().await
    }

    /// Load the default project while opening. A failed save is logged
    /// and the session continues unsaved.
    async fn fall_back_to_default(&mut self) {
        if let Err(e) = self.load_default_project().await {
            warn!(identity = %self.identity(), error = %e, "could not save default project");
        }
    }

    /// Write the current state under the session identity now.
    pub async fn save(&mut self) -> CoreResult<()> {
        let snapshot = self.persistence.save(&self.save_request(), false).await?;
        self.last_saved = Some(snapshot.timestamp);
        Ok(())
    }

    /// Start saving changes in the background.
    pub fn enable_autosave(&mut self, config: &AutosaveConfig)
    where
        S: 'static,
    {
        self.autosave = Some(Autosave::spawn(self.persistence.clone(), config));
        self.schedule_autosave();
    }

    /// Number of background writes so far.
    pub fn autosave_count(&self) -> u64 {
        self.autosave.as_ref().map_or(0, Autosave::save_count)
    }

    /// Stop background saving. Unsaved changes are not written.
    pub async fn shutdown(&mut self) {
        if let Some(autosave) = self.autosave.take() {
            autosave.shutdown().await;
        }
    }

    async fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.active_file_id = snapshot.resolved_active_id().map(str::to_string);
        self.theme = if snapshot.theme.is_empty() {
            DEFAULT_THEME.to_string()
        } else {
            snapshot.theme
        };
        self.last_saved = Some(snapshot.timestamp);
        self.files = snapshot.files;
        self.tree_changed(TreeChange::Replaced, None, None).await;
    }

    fn schedule_autosave(&self) {
        if let Some(autosave) = &self.autosave {
            autosave.notify(self.save_request());
        }
    }

    async fn tree_changed(&self, change: TreeChange, node_id: Option<&str>, kind: Option<NodeKind>) {
        self.bus
            .publish(TreeChanged {
                change,
                node_id: node_id.map(str::to_string),
                kind,
            })
            .await;
        self.schedule_autosave();
    }

    async fn notice(&self, notice: Notice) {
        if notice.is_destructive() {
            warn!(title = %notice.title, description = %notice.description, "notice");
        } else {
            debug!(title = %notice.title, description = %notice.description, "notice");
        }
        self.bus.publish(notice).await;
    }

    // ------------------------------------------------------------------
    // Tree edits
    // ------------------------------------------------------------------

    /// Create a file or folder under `parent_path`. New files are selected.
    pub async fn create(&mut self, name: &str, kind: NodeKind, parent_path: &str) -> Option<FileNode> {
        let node = self.files.create(name, kind, parent_path)?;
        if kind == NodeKind::File {
            self.select(Some(&node.id)).await;
        }
        self.tree_changed(TreeChange::Created, Some(&node.id), Some(kind))
            .await;

        let what = match kind {
            NodeKind::File => "File",
            NodeKind::Folder => "Folder",
        };
        self.notice(Notice::info(
            format!("{what} created"),
            format!("{} has been created successfully", node.name),
        ))
        .await;
        Some(node)
    }

    pub async fn rename(&mut self, id: &str, new_name: &str) -> bool {
        if !self.files.rename(id, new_name) {
            return false;
        }
        let kind = self.files.find(id).map(FileNode::kind);
        self.tree_changed(TreeChange::Renamed, Some(id), kind).await;
        true
    }

    /// Delete a node and its subtree. Deleting the active file (or a folder
    /// containing it) clears the selection.
    pub async fn delete(&mut self, id: &str) -> Option<FileNode> {
        let removed = self.files.delete(id)?;

        let active_removed = self
            .active_file_id
            .as_deref()
            .is_some_and(|active| removed.walk().any(|n| n.id == active));
        if active_removed {
            self.select(None).await;
        }

        self.tree_changed(TreeChange::Deleted, Some(id), Some(removed.kind()))
            .await;
        self.notice(Notice::info(
            "File deleted",
            "The file has been removed from your project",
        ))
        .await;
        Some(removed)
    }

    pub async fn move_node(&mut self, id: &str, new_parent_path: &str) -> bool {
        if !self.files.move_node(id, new_parent_path) {
            return false;
        }
        let kind = self.files.find(id).map(FileNode::kind);
        self.tree_changed(TreeChange::Moved, Some(id), kind).await;
        true
    }

    /// Replace a node by id (the editor's write path). The node becomes
    /// the selection.
    pub async fn update(&mut self, node: FileNode) -> bool {
        let id = node.id.clone();
        let kind = node.kind();
        if !self.files.update(node) {
            return false;
        }
        self.select(Some(&id)).await;
        self.tree_changed(TreeChange::Updated, Some(&id), Some(kind))
            .await;
        true
    }

    /// Set a file's content.
    pub async fn write(&mut self, id: &str, content: impl Into<String>) -> bool {
        let Some(mut node) = self.files.find(id).cloned() else {
            return false;
        };
        if !node.set_content(content) {
            return false;
        }
        self.update(node).await
    }

    /// Select a node, or clear the selection. Unknown ids are ignored.
    pub async fn select(&mut self, id: Option<&str>) -> bool {
        let next = match id {
            Some(id) if self.files.find(id).is_some() => Some(id.to_string()),
            Some(_) => return false,
            None => None,
        };
        if next != self.active_file_id {
            self.active_file_id = next;
            self.bus
                .publish(SelectionChanged {
                    active_file_id: self.active_file_id.clone(),
                })
                .await;
            self.schedule_autosave();
        }
        true
    }

    /// Add a root-level file with the given content.
    pub async fn upload(&mut self, name: &str, content: impl Into<String>) -> Option<FileNode> {
        let node = self.create(name, NodeKind::File, "/").await?;
        self.files.set_content(&node.id, content);
        self.tree_changed(TreeChange::Updated, Some(&node.id), Some(NodeKind::File))
            .await;
        self.notice(Notice::info(
            "Files uploaded",
            "1 file(s) uploaded successfully",
        ))
        .await;
        self.files.find(&node.id).cloned()
    }

    // ------------------------------------------------------------------
    // Theme and extensions
    // ------------------------------------------------------------------

    pub async fn set_theme(&mut self, theme: &str) {
        if self.theme == theme {
            return;
        }
        self.theme = theme.to_string();
        self.bus
            .publish(ThemeChanged {
                theme: self.theme.clone(),
            })
            .await;
        self.schedule_autosave();
    }

    /// Flip an extension and persist the list. Returns the new flag.
    pub async fn toggle_extension(&mut self, id: &str) -> CoreResult<Option<bool>> {
        let Some(enabled) = extensions::toggle(&mut self.extensions, id) else {
            return Ok(None);
        };
        self.persistence.save_extensions(&self.extensions).await?;
        self.schedule_autosave();
        Ok(Some(enabled))
    }

    // ------------------------------------------------------------------
    // Sharing
    // ------------------------------------------------------------------

    /// Save the project under a new shared id and switch to it.
    pub async fn share(&mut self) -> CoreResult<ShareLink> {
        let id = uuid::Uuid::new_v4().to_string();
        self.shared_id = Some(id.clone());
        self.save().await?;

        let link = ShareLink {
            url: format!("{}?sharedId={}", self.share_origin, id),
            id,
        };
        info!(shared_id = %link.id, "project shared");
        self.notice(Notice::info(
            "Share link copied!",
            format!(
                "Share this URL: {} (Note: This is a client-side simulation. Real-time sync requires a backend.)",
                link.url
            ),
        ))
        .await;
        Ok(link)
    }

    /// Write the current state to the shared project.
    pub async fn save_shared_changes(&mut self) -> CoreResult<()> {
        if self.shared_id.is_none() {
            self.notice(Notice::destructive(
                "Not in shared mode",
                "You are not in a shared project to save changes.",
            ))
            .await;
            return Err(CoreError::NotShared);
        }

        self.save().await?;
        self.notice(Notice::info(
            "Changes saved to shared project",
            "Your changes have been saved to the shared project. Other collaborators can now pull them.",
        ))
        .await;
        Ok(())
    }

    /// Replace the state with the shared project's saved state.
    pub async fn pull_shared_changes(&mut self) -> CoreResult<()> {
        let Some(id) = self.shared_id.clone() else {
            self.notice(Notice::destructive(
                "Not in shared mode",
                "You are not in a shared project to pull changes.",
            ))
            .await;
            return Err(CoreError::NotShared);
        };

        match self
            .persistence
            .load(&StorageIdentity::Shared(id.clone()))
            .await
        {
            Some(snapshot) => {
                self.apply_snapshot(snapshot).await;
                self.notice(Notice::info(
                    "Latest changes pulled",
                    "The project has been updated with the latest changes from the shared link.",
                ))
                .await;
                Ok(())
            }
            None => {
                self.notice(Notice::destructive(
                    "Shared project data not found",
                    "Could not find shared project data in your browser's storage.",
                ))
                .await;
                Err(CoreError::SharedProjectNotFound(id))
            }
        }
    }

    // ------------------------------------------------------------------
    // Users and versions
    // ------------------------------------------------------------------

    /// Log in. The user's saved project is loaded if there is one;
    /// otherwise the current project is saved for them.
    pub async fn login(&mut self, user: &str) -> CoreResult<()> {
        let user = validate_username(user)?.to_string();

        // Nothing changes until the user's project is stored and remembered.
        let identity = StorageIdentity::User(user.clone());
        let saved = self.persistence.load(&identity).await;
        let fresh = match saved {
            Some(_) => None,
            None => Some(
                self.persistence
                    .save(&self.save_request_for(identity), false)
                    .await?,
            ),
        };
        self.persistence.remember_user(&user).await?;

        self.user = Some(user.clone());
        match (saved, fresh) {
            (Some(snapshot), _) => self.apply_snapshot(snapshot).await,
            (None, Some(snapshot)) => self.last_saved = Some(snapshot.timestamp),
            (None, None) => {}
        }

        self.history = self.persistence.load_history(&user).await;
        info!(user = %user, versions = self.history.len(), "logged in");
        Ok(())
    }

    /// Log out and go back to the anonymous project.
    pub async fn logout(&mut self) -> CoreResult<()> {
        let Some(user) = self.user.take() else {
            return Ok(());
        };
        self.persistence.forget_user().await?;
        self.history = History::new();

        match self.persistence.load(&StorageIdentity::Anonymous).await {
            Some(snapshot) => self.apply_snapshot(snapshot).await,
            None => self.load_default_project().await?,
        }
        info!(user = %user, "logged out");
        Ok(())
    }

    /// Save the current state as a new version in the user's history.
    pub async fn save_version(&mut self) -> CoreResult<Snapshot> {
        let Some(user) = self.user.clone() else {
            self.notice(Notice::destructive(
                "Login required",
                "Please log in to save project versions.",
            ))
            .await;
            return Err(CoreError::LoginRequired);
        };

        let snapshot = self
            .persistence
            .save(&self.save_request_for(StorageIdentity::User(user.clone())), true)
            .await?;
        self.last_saved = Some(snapshot.timestamp);
        self.history = self.persistence.load_history(&user).await;

        self.notice(Notice::info(
            "Project version saved",
            "A snapshot of your current project has been saved to history.",
        ))
        .await;
        Ok(snapshot)
    }

    /// Replace the state with a version from the history (0 is newest).
    pub async fn load_version(&mut self, index: usize) -> CoreResult<()> {
        let snapshot = self
            .history
            .get(index)
            .cloned()
            .ok_or(CoreError::VersionNotFound(index))?;
        self.apply_snapshot(snapshot).await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Export and import
    // ------------------------------------------------------------------

    /// The project as an export document.
    pub fn export(&self) -> CoreResult<String> {
        let json = ProjectFile::new(&self.files, &self.theme, &self.extensions).to_json()?;
        info!(files = self.files.file_count(), bytes = json.len(), "project exported");
        Ok(json)
    }

    /// Replace the project with an export document.
    ///
    /// Nothing changes if the document is rejected. The session leaves
    /// shared mode.
    pub async fn import(&mut self, json: &str) -> CoreResult<()> {
        let imported = match parse_project(json) {
            Ok(imported) => imported,
            Err(e) => {
                warn!(error = %e, "project import rejected");
                self.notice(Notice::destructive(
                    "Import failed",
                    "Invalid project file format",
                ))
                .await;
                return Err(e.into());
            }
        };

        self.files = imported.files;
        self.active_file_id = imported.active_file_id;
        self.theme = imported.theme;
        self.extensions = extensions::merge_saved(&imported.enabled_extensions);
        self.shared_id = None;

        info!(files = self.files.file_count(), "project imported");
        self.tree_changed(TreeChange::Replaced, None, None).await;
        self.notice(Notice::info(
            "Project imported",
            "Your project has been loaded successfully",
        ))
        .await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Running
    // ------------------------------------------------------------------

    /// Run the active file: web files go to the preview, everything else
    /// through the simulator into `terminal`. With native evaluation
    /// enabled, javascript is evaluated instead of previewed. `None` if
    /// nothing is selected.
    pub async fn run(&self, terminal: &mut dyn TerminalSurface) -> Option<RunResult> {
        let Some(file) = self.active_file() else {
            self.notice(Notice::destructive(
                "No file selected",
                "Please select a file to run.",
            ))
            .await;
            return None;
        };

        let evaluate = self.simulator.capabilities().native_eval
            && file.language() == Some("javascript");
        if !evaluate && file.language().is_some_and(is_web_language) {
            self.notice(Notice::info(
                "Web project previewed",
                "Live preview updated with latest changes.",
            ))
            .await;
            return Some(RunResult::Preview(self.preview()));
        }

        let outcome = terminal::run_node(file, &self.simulator, terminal);
        self.notice(Notice::info(
            "Code execution simulated",
            format!("Running {} in terminal.", file.name),
        ))
        .await;
        Some(RunResult::Executed(outcome))
    }

    /// The composed preview document.
    pub fn preview(&self) -> String {
        compose_preview(&self.files)
    }

    /// Execute a terminal command line against the project.
    pub fn terminal(&self, line: &str, surface: &mut dyn TerminalSurface) -> Option<RunOutcome> {
        terminal::execute(line, &self.files, &self.simulator, surface)
    }
}
