//! Host console with swappable sinks.
//!
//! Scripts write through a [`Console`]. A run captures output by swapping the
//! `log`, `error` and `warn` sinks for recording ones with
//! [`Console::capture`]; the returned guard puts the originals back when it
//! is dropped, also when the script faults or the engine panics.

use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

/// A console output function.
pub type ConsoleSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Console methods a script can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleMethod {
    Log,
    Info,
    Warn,
    Error,
}

impl ConsoleMethod {
    /// All methods.
    pub const ALL: [ConsoleMethod; 4] = [Self::Log, Self::Info, Self::Warn, Self::Error];

    /// Parse a method name as written after `console.`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "log" => Some(Self::Log),
            "info" => Some(Self::Info),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Prefix used for captured lines of this method.
    ///
    /// `None` means the method is not captured.
    fn capture_prefix(&self) -> Option<&'static str> {
        match self {
            Self::Log => Some(""),
            Self::Error => Some("ERROR: "),
            Self::Warn => Some("WARN: "),
            Self::Info => None,
        }
    }
}

impl fmt::Display for ConsoleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
struct Sinks {
    log: ConsoleSink,
    info: ConsoleSink,
    warn: ConsoleSink,
    error: ConsoleSink,
}

impl Sinks {
    fn get(&self, method: ConsoleMethod) -> &ConsoleSink {
        match method {
            ConsoleMethod::Log => &self.log,
            ConsoleMethod::Info => &self.info,
            ConsoleMethod::Warn => &self.warn,
            ConsoleMethod::Error => &self.error,
        }
    }

    fn get_mut(&mut self, method: ConsoleMethod) -> &mut ConsoleSink {
        match method {
            ConsoleMethod::Log => &mut self.log,
            ConsoleMethod::Info => &mut self.info,
            ConsoleMethod::Warn => &mut self.warn,
            ConsoleMethod::Error => &mut self.error,
        }
    }
}

/// The console scripts print to.
pub struct Console {
    sinks: RwLock<Sinks>,
}

impl Console {
    /// Create a console that forwards every method to `tracing`.
    pub fn new() -> Self {
        Self {
            sinks: RwLock::new(Sinks {
                log: Arc::new(|text| tracing::info!(target: "console", method = "log", "{text}")),
                info: Arc::new(|text| tracing::info!(target: "console", method = "info", "{text}")),
                warn: Arc::new(|text| tracing::warn!(target: "console", "{text}")),
                error: Arc::new(|text| tracing::error!(target: "console", "{text}")),
            }),
        }
    }

    /// Create a console where every method writes to the same sink.
    pub fn with_sink(sink: ConsoleSink) -> Self {
        Self {
            sinks: RwLock::new(Sinks {
                log: sink.clone(),
                info: sink.clone(),
                warn: sink.clone(),
                error: sink,
            }),
        }
    }

    /// Current sink for a method.
    pub fn sink(&self, method: ConsoleMethod) -> ConsoleSink {
        let sinks = self.sinks.read().unwrap_or_else(|e| e.into_inner());
        sinks.get(method).clone()
    }

    /// Install a sink for a method, returning the previous one.
    pub fn replace(&self, method: ConsoleMethod, sink: ConsoleSink) -> ConsoleSink {
        let mut sinks = self.sinks.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(sinks.get_mut(method), sink)
    }

    /// Write a line through a method.
    pub fn emit(&self, method: ConsoleMethod, text: &str) {
        // Call outside the lock so a sink may use the console itself.
        let sink = self.sink(method);
        sink(text);
    }

    /// Start capturing `log`, `error` and `warn` output.
    ///
    /// Captured text is still forwarded to the sinks that were installed
    /// before the capture started.
    pub fn capture(&self) -> ConsoleCapture<'_> {
        let buffer = Arc::new(Mutex::new(String::new()));
        let mut originals = Vec::new();

        for method in ConsoleMethod::ALL {
            let Some(prefix) = method.capture_prefix() else {
                continue;
            };
            let original = self.sink(method);
            let forward = original.clone();
            let buf = buffer.clone();
            let recording: ConsoleSink = Arc::new(move |text: &str| {
                if let Ok(mut out) = buf.lock() {
                    out.push_str(prefix);
                    out.push_str(text);
                    out.push('\n');
                }
                forward(text);
            });
            self.replace(method, recording);
            originals.push((method, original));
        }

        ConsoleCapture {
            console: self,
            originals,
            buffer,
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}

/// Scoped capture of console output. Restores the original sinks on drop.
pub struct ConsoleCapture<'a> {
    console: &'a Console,
    originals: Vec<(ConsoleMethod, ConsoleSink)>,
    buffer: Arc<Mutex<String>>,
}

impl ConsoleCapture<'_> {
    /// Output captured so far, one `\n`-terminated line per call.
    pub fn output(&self) -> String {
        self.buffer
            .lock()
            .map(|out| out.clone())
            .unwrap_or_default()
    }
}

impl Drop for ConsoleCapture<'_> {
    fn drop(&mut self) {
        for (method, original) in self.originals.drain(..) {
            self.console.replace(method, original);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_console() -> (Console, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let console = Console::with_sink(Arc::new(move |text: &str| {
            seen_clone.lock().unwrap().push(text.to_string());
        }));
        (console, seen)
    }

    #[test]
    fn test_method_parse() {
        assert_eq!(ConsoleMethod::parse("log"), Some(ConsoleMethod::Log));
        assert_eq!(ConsoleMethod::parse("warn"), Some(ConsoleMethod::Warn));
        assert_eq!(ConsoleMethod::parse("table"), None);
        assert_eq!(ConsoleMethod::Error.to_string(), "error");
    }

    #[test]
    fn test_capture_prefixes_and_forwards() {
        let (console, seen) = recording_console();
        {
            let capture = console.capture();
            console.emit(ConsoleMethod::Log, "hi");
            console.emit(ConsoleMethod::Error, "bad");
            console.emit(ConsoleMethod::Warn, "careful");
            assert_eq!(capture.output(), "hi\nERROR: bad\nWARN: careful\n");
        }
        assert_eq!(*seen.lock().unwrap(), vec!["hi", "bad", "careful"]);
    }

    #[test]
    fn test_info_is_not_captured() {
        let (console, seen) = recording_console();
        let capture = console.capture();
        console.emit(ConsoleMethod::Info, "fyi");
        assert_eq!(capture.output(), "");
        drop(capture);
        assert_eq!(*seen.lock().unwrap(), vec!["fyi"]);
    }

    #[test]
    fn test_drop_restores_original_sinks() {
        let console = Console::new();
        let before: Vec<ConsoleSink> = ConsoleMethod::ALL
            .iter()
            .map(|m| console.sink(*m))
            .collect();

        {
            let _capture = console.capture();
            assert!(!Arc::ptr_eq(&console.sink(ConsoleMethod::Log), &before[0]));
            assert!(Arc::ptr_eq(&console.sink(ConsoleMethod::Info), &before[1]));
        }

        for (method, original) in ConsoleMethod::ALL.iter().zip(&before) {
            assert!(Arc::ptr_eq(&console.sink(*method), original), "{method}");
        }
    }

    #[test]
    fn test_restores_after_panic() {
        let console = Console::new();
        let before = console.sink(ConsoleMethod::Error);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _capture = console.capture();
            panic!("engine blew up");
        }));

        assert!(result.is_err());
        assert!(Arc::ptr_eq(&console.sink(ConsoleMethod::Error), &before));
    }

    #[test]
    fn test_nested_capture_unwinds_in_order() {
        let (console, _seen) = recording_console();
        let before = console.sink(ConsoleMethod::Log);
        {
            let outer = console.capture();
            {
                let inner = console.capture();
                console.emit(ConsoleMethod::Log, "both");
                assert_eq!(inner.output(), "both\n");
            }
            console.emit(ConsoleMethod::Log, "outer only");
            assert_eq!(outer.output(), "both\nouter only\n");
        }
        assert!(Arc::ptr_eq(&console.sink(ConsoleMethod::Log), &before));
    }
}
