//! Console sinks survive faulting and panicking engines.

use playground_exec::{
    BufferTerminal, Console, ConsoleMethod, ExecCapabilities, ExecError, ExecResult, RunOutcome,
    ScriptEngine, ScriptFile, Simulator,
};
use std::sync::Arc;

struct PanickingEngine;

impl ScriptEngine for PanickingEngine {
    fn name(&self) -> &str {
        "panicking"
    }

    fn eval(&self, _source: &str, console: &Console) -> ExecResult<()> {
        console.emit(ConsoleMethod::Log, "partial");
        panic!("engine failure");
    }
}

struct FaultingEngine;

impl ScriptEngine for FaultingEngine {
    fn name(&self) -> &str {
        "faulting"
    }

    fn eval(&self, _source: &str, console: &Console) -> ExecResult<()> {
        console.emit(ConsoleMethod::Warn, "about to fail");
        Err(ExecError::fault("x is not a function"))
    }
}

fn sinks(console: &Console) -> Vec<Arc<dyn Fn(&str) + Send + Sync>> {
    ConsoleMethod::ALL.iter().map(|m| console.sink(*m)).collect()
}

fn assert_same_sinks(console: &Console, before: &[Arc<dyn Fn(&str) + Send + Sync>]) {
    for (method, original) in ConsoleMethod::ALL.iter().zip(before) {
        assert!(
            Arc::ptr_eq(&console.sink(*method), original),
            "console.{method} was not restored"
        );
    }
}

#[test]
fn test_console_restored_after_successful_run() {
    let simulator = Simulator::new(ExecCapabilities::native());
    let before = sinks(simulator.console());

    let mut terminal = BufferTerminal::new();
    let file = ScriptFile::new("script.js", Some("javascript"), Some("console.log(\"hi\")"));
    assert_eq!(simulator.run(&file, &mut terminal), RunOutcome::Evaluated);

    assert!(terminal.has_line("hi"));
    assert_same_sinks(simulator.console(), &before);
}

#[test]
fn test_console_restored_after_fault() {
    let simulator = Simulator::new(ExecCapabilities::native()).with_engine(Arc::new(FaultingEngine));
    let before = sinks(simulator.console());

    let mut terminal = BufferTerminal::new();
    let file = ScriptFile::new("a.js", Some("javascript"), Some(""));
    assert_eq!(simulator.run(&file, &mut terminal), RunOutcome::Faulted);

    assert!(terminal.has_line("Error during execution: x is not a function"));
    assert_same_sinks(simulator.console(), &before);
}

#[test]
fn test_console_restored_after_engine_panic() {
    let simulator =
        Simulator::new(ExecCapabilities::native()).with_engine(Arc::new(PanickingEngine));
    let before = sinks(simulator.console());

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let mut terminal = BufferTerminal::new();
        let file = ScriptFile::new("a.js", Some("javascript"), Some(""));
        simulator.run(&file, &mut terminal);
    }));

    assert!(result.is_err());
    assert_same_sinks(simulator.console(), &before);
}

#[test]
fn test_shared_console_sees_forwarded_output() {
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink_seen = seen.clone();
    let console = Arc::new(Console::with_sink(Arc::new(move |text: &str| {
        sink_seen.lock().unwrap().push(text.to_string());
    })));
    let simulator = Simulator::new(ExecCapabilities::native()).with_console(console.clone());

    let mut terminal = BufferTerminal::new();
    let file = ScriptFile::new("a.js", Some("javascript"), Some("console.log('one'); console.info('two')"));
    simulator.run(&file, &mut terminal);

    assert_eq!(*seen.lock().unwrap(), vec!["one", "two"]);
    assert!(terminal.has_line("one"));
    assert!(!terminal.has_line("two"));
}
