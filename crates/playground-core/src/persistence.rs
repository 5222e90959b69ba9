//! Persistence service.
//!
//! All reads and writes of project state go through [`Persistence`]. Reads
//! never fail: absent or malformed data is reported as "nothing saved" and
//! logged.

use crate::bus::{Bus, ProjectSaved};
use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::error::CoreResult;
use crate::extensions::EnabledExtension;
use crate::identity::{
    user_history_key, StorageIdentity, EXTENSIONS_KEY, LAST_USER_KEY, SETTINGS_KEY,
};
use crate::settings::EditorSettings;
use crate::snapshot::{History, Snapshot};
use crate::tree::Forest;
use playground_storage::Storage;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything a save writes.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub identity: StorageIdentity,
    pub files: Forest,
    pub active_file_id: Option<String>,
    pub theme: String,
    pub extensions: Vec<EnabledExtension>,
}

impl SaveRequest {
    fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.files, self.active_file_id.as_deref(), &self.theme)
    }
}

/// Reads and writes snapshots, history and preferences.
pub struct Persistence<S> {
    storage: Arc<S>,
    bus: Bus,
    history_limit: usize,
}

impl<S> Clone for Persistence<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            bus: self.bus.clone(),
            history_limit: self.history_limit,
        }
    }
}

impl<S: Storage> Persistence<S> {
    pub fn new(storage: Arc<S>, bus: Bus) -> Self {
        Self {
            storage,
            bus,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Keep at most `limit` versions per user. `0` keeps all.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Write a snapshot of `request` under its identity's key, plus the
    /// extension list.
    ///
    /// With `version_save`, a logged-in user's snapshot is also prepended to
    /// their history. Shared and anonymous identities have no history.
    pub async fn save(&self, request: &SaveRequest, version_save: bool) -> CoreResult<Snapshot> {
        let snapshot = request.snapshot();
        let key = request.identity.autosave_key();

        self.storage.write(&[key.as_str()], &snapshot).await?;
        self.storage
            .write(&[EXTENSIONS_KEY], &request.extensions)
            .await?;

        let versioned = match request.identity.history_user() {
            Some(user) if version_save => {
                let history_key = user_history_key(user);
                let mut history = self.load_history(user).await;
                history.prepend(snapshot.clone(), self.history_limit);
                self.storage.write(&[history_key.as_str()], &history).await?;
                true
            }
            _ => false,
        };

        debug!(
            identity = %request.identity,
            key = %key,
            files = request.files.file_count(),
            versioned,
            "project saved"
        );

        self.bus
            .publish(ProjectSaved {
                key,
                timestamp: snapshot.timestamp,
                version: versioned,
            })
            .await;

        Ok(snapshot)
    }

    /// The snapshot saved for `identity`, if any.
    pub async fn load(&self, identity: &StorageIdentity) -> Option<Snapshot> {
        let key = identity.autosave_key();
        let snapshot = self.read_or_absent::<Snapshot>(&key).await?;
        debug!(identity = %identity, key = %key, "project loaded");
        Some(snapshot)
    }

    /// Version history of `user`, newest first. Empty if none is saved.
    pub async fn load_history(&self, user: &str) -> History {
        self.read_or_absent(&user_history_key(user))
            .await
            .unwrap_or_default()
    }

    /// Remember `user` as the last one logged in.
    pub async fn remember_user(&self, user: &str) -> CoreResult<()> {
        self.storage.write(&[LAST_USER_KEY], &user).await?;
        info!(user, "user remembered");
        Ok(())
    }

    pub async fn last_user(&self) -> Option<String> {
        self.read_or_absent::<String>(LAST_USER_KEY)
            .await
            .filter(|u| !u.trim().is_empty())
    }

    pub async fn forget_user(&self) -> CoreResult<()> {
        self.storage.remove(&[LAST_USER_KEY]).await?;
        Ok(())
    }

    /// Saved extension states, if any.
    pub async fn load_extensions(&self) -> Option<Vec<EnabledExtension>> {
        self.read_or_absent(EXTENSIONS_KEY).await
    }

    pub async fn save_extensions(&self, extensions: &[EnabledExtension]) -> CoreResult<()> {
        self.storage.write(&[EXTENSIONS_KEY], &extensions).await?;
        Ok(())
    }

    /// Saved editor settings, or the defaults.
    pub async fn load_settings(&self) -> EditorSettings {
        self.read_or_absent(SETTINGS_KEY).await.unwrap_or_default()
    }

    pub async fn save_settings(&self, settings: &EditorSettings) -> CoreResult<()> {
        self.storage.write(&[SETTINGS_KEY], settings).await?;
        Ok(())
    }

    /// Read a value; any failure counts as absent.
    async fn read_or_absent<T: DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        match self.storage.read::<T>(&[key]).await {
            Ok(value) => value,
            Err(e) if e.is_malformed() => {
                warn!(key, error = %e, "ignoring malformed stored data");
                None
            }
            Err(e) => {
                warn!(key, error = %e, "storage read failed");
                None
            }
        }
    }
}
