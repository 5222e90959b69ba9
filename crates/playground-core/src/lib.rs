//! Core functionality for codeplayground.
//!
//! This crate provides:
//! - The file tree model ([`Forest`], [`FileNode`])
//! - Snapshots, version history and storage identities
//! - The persistence service and background autosave
//! - Project export/import and the default project
//! - Preview composition and the terminal command dispatcher
//! - Extensions, editor settings and themes
//! - Configuration and the event bus
//! - The application state object ([`Playground`])

pub mod autosave;
pub mod bus;
pub mod config;
pub mod error;
pub mod extensions;
pub mod identity;
pub mod language;
pub mod notice;
pub mod persistence;
pub mod playground;
pub mod preview;
pub mod project;
pub mod settings;
pub mod snapshot;
pub mod terminal;
pub mod theme;
pub mod tree;

pub use autosave::Autosave;
pub use bus::{Bus, Event};
pub use config::{AutosaveConfig, PlaygroundConfig};
pub use error::{ConfigError, CoreError, CoreResult, ImportError};
pub use extensions::EnabledExtension;
pub use identity::StorageIdentity;
pub use notice::{Notice, NoticeLevel};
pub use persistence::{Persistence, SaveRequest};
pub use playground::{Playground, RunResult, ShareLink, Status};
pub use preview::compose_preview;
pub use project::{default_project, parse_project, ImportedProject, ProjectFile};
pub use settings::EditorSettings;
pub use snapshot::{History, Snapshot};
pub use tree::{FileNode, Forest, NodeKind};
