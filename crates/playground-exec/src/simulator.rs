//! The execution simulator.
//!
//! Dispatch is by language tag, in this order:
//!
//! 1. `javascript`/`typescript`: evaluated by the [`ScriptEngine`] when
//!    native evaluation is granted, with console output captured
//! 2. `python`: never executed, the source is echoed
//! 3. `html`/`css`: redirected to the preview
//! 4. anything else: reported as not executable, the source is echoed

use crate::config::ExecCapabilities;
use crate::console::Console;
use crate::engine::{ConsoleScriptEngine, ScriptEngine};
use crate::terminal::TerminalSurface;
use std::sync::Arc;
use tracing::{debug, info};

/// A file handed to the simulator.
#[derive(Debug, Clone, Copy)]
pub struct ScriptFile<'a> {
    pub name: &'a str,
    pub language: Option<&'a str>,
    pub content: Option<&'a str>,
}

impl<'a> ScriptFile<'a> {
    pub fn new(name: &'a str, language: Option<&'a str>, content: Option<&'a str>) -> Self {
        Self {
            name,
            language,
            content,
        }
    }

    fn language_or_unknown(&self) -> &'a str {
        self.language.unwrap_or("unknown")
    }

    /// Source text, or the empty-file marker.
    fn dump(&self) -> &'a str {
        match self.content {
            Some(c) if !c.is_empty() => c,
            _ => "Empty file",
        }
    }
}

/// How a run was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The script was evaluated to completion.
    Evaluated,
    /// The script raised an error, which was written to the terminal.
    Faulted,
    /// Execution was simulated (source echoed).
    Simulated,
    /// The file belongs to the preview.
    Preview,
    /// The file type cannot be executed.
    Unsupported,
}

/// Runs files against a terminal surface.
pub struct Simulator {
    capabilities: ExecCapabilities,
    engine: Arc<dyn ScriptEngine>,
    console: Arc<Console>,
}

impl Simulator {
    /// Create a simulator with the built-in engine and a fresh console.
    pub fn new(capabilities: ExecCapabilities) -> Self {
        Self {
            capabilities,
            engine: Arc::new(ConsoleScriptEngine),
            console: Arc::new(Console::new()),
        }
    }

    /// Use another script engine.
    pub fn with_engine(mut self, engine: Arc<dyn ScriptEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Use a shared console.
    pub fn with_console(mut self, console: Arc<Console>) -> Self {
        self.console = console;
        self
    }

    pub fn capabilities(&self) -> ExecCapabilities {
        self.capabilities
    }

    pub fn console(&self) -> &Arc<Console> {
        &self.console
    }

    /// Run a file, writing all output to `terminal`.
    pub fn run(&self, file: &ScriptFile<'_>, terminal: &mut dyn TerminalSurface) -> RunOutcome {
        let language = file.language_or_unknown();
        info!(file = file.name, language, "running file");

        terminal.write_line(&format!("> Running {} ({})...", file.name, language));
        terminal.write_line("--- Output ---");

        let outcome = match language {
            "javascript" | "typescript" if self.capabilities.native_eval => {
                self.evaluate(file, terminal)
            }
            "python" => {
                terminal.write_line("Python execution simulated. (Actual execution not supported)");
                terminal.write_line(&format!("Content: \n{}", file.dump()));
                RunOutcome::Simulated
            }
            "html" | "css" => {
                terminal.write_line("HTML/CSS files are rendered in the Preview panel.");
                RunOutcome::Preview
            }
            other => {
                terminal.write_line(&format!("Cannot execute files of type: {other}."));
                terminal.write_line(&format!("Content: \n{}", file.dump()));
                RunOutcome::Unsupported
            }
        };

        terminal.write_line("--- End Output ---");
        debug!(file = file.name, ?outcome, "run finished");
        outcome
    }

    fn evaluate(&self, file: &ScriptFile<'_>, terminal: &mut dyn TerminalSurface) -> RunOutcome {
        let source = file.content.unwrap_or_default();

        let capture = self.console.capture();
        let result = self.engine.eval(source, &self.console);
        let captured = capture.output();
        drop(capture);

        match result {
            Ok(()) if captured.is_empty() => {
                terminal.write_line("Execution completed. No console output.");
                RunOutcome::Evaluated
            }
            Ok(()) => {
                terminal.write_line(&captured);
                RunOutcome::Evaluated
            }
            Err(e) => {
                debug!(engine = self.engine.name(), error = %e, "script faulted");
                terminal.write_line(&format!("Error during execution: {e}"));
                RunOutcome::Faulted
            }
        }
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(ExecCapabilities::default())
    }
}
