//! Event bus for inter-component communication.
//!
//! Components publish typed events without knowing who listens. Each event
//! type has its own broadcast channel, created on first subscribe.
//!
//! # Example
//!
//! ```ignore
//! let bus = Bus::new();
//!
//! let mut rx = bus.subscribe::<Notice>().await;
//! tokio::spawn(async move {
//!     while let Ok(notice) = rx.recv().await {
//!         println!("{}: {}", notice.title, notice.description);
//!     }
//! });
//!
//! bus.publish(Notice::info("Saved", "Project saved")).await;
//! ```

use crate::tree::NodeKind;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::RwLock;

const DEFAULT_CAPACITY: usize = 256;

/// Trait for events that can be published on the bus.
pub trait Event: Clone + Send + Sync + 'static {
    /// Event type name for serialization/logging.
    fn event_type() -> &'static str;
}

/// The event bus.
#[derive(Clone)]
pub struct Bus {
    inner: Arc<BusInner>,
}

struct BusInner {
    /// Typed channels by TypeId.
    channels: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl Bus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                channels: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Publish an event to all subscribers.
    pub async fn publish<E: Event>(&self, event: E) {
        let channels = self.inner.channels.read().await;
        let sender = channels
            .get(&TypeId::of::<E>())
            .and_then(|s| s.downcast_ref::<broadcast::Sender<E>>());
        match sender {
            // No receivers is fine
            Some(tx) => {
                let _ = tx.send(event);
            }
            None => tracing::trace!(event = E::event_type(), "no subscribers"),
        }
    }

    /// Subscribe to events of type E.
    pub async fn subscribe<E: Event>(&self) -> broadcast::Receiver<E> {
        let type_id = TypeId::of::<E>();

        {
            let channels = self.inner.channels.read().await;
            if let Some(sender) = channels.get(&type_id) {
                if let Some(tx) = sender.downcast_ref::<broadcast::Sender<E>>() {
                    return tx.subscribe();
                }
            }
        }

        let mut channels = self.inner.channels.write().await;
        // Another subscriber may have raced us here
        if let Some(tx) = channels
            .get(&type_id)
            .and_then(|s| s.downcast_ref::<broadcast::Sender<E>>())
        {
            return tx.subscribe();
        }
        let (tx, rx) = broadcast::channel::<E>(DEFAULT_CAPACITY);
        channels.insert(type_id, Box::new(tx));
        rx
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Built-in Event Types
// ============================================================================

/// How the tree changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeChange {
    Created,
    Renamed,
    Deleted,
    Moved,
    Updated,
    /// The whole forest was replaced (load, import, restore).
    Replaced,
}

/// The file tree changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeChanged {
    pub change: TreeChange,
    /// Affected node, if a single one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
}

impl Event for TreeChanged {
    fn event_type() -> &'static str {
        "tree.changed"
    }
}

/// A snapshot was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSaved {
    /// Storage key written.
    pub key: String,
    /// Epoch milliseconds of the snapshot.
    pub timestamp: i64,
    /// Whether the snapshot was also added to the user's history.
    pub version: bool,
}

impl Event for ProjectSaved {
    fn event_type() -> &'static str {
        "project.saved"
    }
}

/// The active theme changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeChanged {
    pub theme: String,
}

impl Event for ThemeChanged {
    fn event_type() -> &'static str {
        "theme.changed"
    }
}

/// The selected file changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionChanged {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_file_id: Option<String>,
}

impl Event for SelectionChanged {
    fn event_type() -> &'static str {
        "selection.changed"
    }
}
