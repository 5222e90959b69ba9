//! Execution simulator for codeplayground.
//!
//! Running a file never spawns a process. Depending on the granted
//! [`ExecCapabilities`] and the file's language, a run either evaluates the
//! script in-process through a [`ScriptEngine`] (host-only, no isolation) or
//! produces a simulated dump of the source. All output goes to a
//! [`TerminalSurface`].
//!
//! # Example
//!
//! ```rust
//! use playground_exec::{BufferTerminal, ExecCapabilities, ScriptFile, Simulator};
//!
//! let simulator = Simulator::new(ExecCapabilities::native());
//! let mut terminal = BufferTerminal::new();
//! let file = ScriptFile::new("script.js", Some("javascript"), Some("console.log('hi')"));
//!
//! simulator.run(&file, &mut terminal);
//! assert!(terminal.has_line("hi"));
//! ```

pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod simulator;
pub mod terminal;

pub use config::{ExecCapabilities, ExecConfig};
pub use console::{Console, ConsoleCapture, ConsoleMethod, ConsoleSink};
pub use engine::{ConsoleScriptEngine, ScriptEngine};
pub use error::{ExecError, ExecResult};
pub use simulator::{RunOutcome, ScriptFile, Simulator};
pub use terminal::{BufferTerminal, TerminalSurface, WriterTerminal};
