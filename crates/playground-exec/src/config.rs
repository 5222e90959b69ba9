//! Configuration types for execution settings.

use serde::{Deserialize, Serialize};

/// Execution configuration, as found under `exec` in the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExecConfig {
    /// Evaluate JavaScript/TypeScript in-process (default: false).
    ///
    /// This is not a sandbox. Scripts share the host console.
    pub native_eval: bool,
}

impl ExecConfig {
    /// Capabilities granted by this configuration.
    pub fn capabilities(&self) -> ExecCapabilities {
        ExecCapabilities {
            native_eval: self.native_eval,
        }
    }
}

/// Capabilities granted to a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecCapabilities {
    /// Allow host-side script evaluation (explicitly unsafe)
    pub native_eval: bool,
}

impl ExecCapabilities {
    /// Simulated dump only. This is the default.
    pub fn simulated() -> Self {
        Self::default()
    }

    /// Allow native evaluation.
    pub fn native() -> Self {
        Self { native_eval: true }
    }
}
