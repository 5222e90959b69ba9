//! Terminal command dispatcher.
//!
//! Commands act on the root level of the project, the way the terminal
//! panel shows it.

use crate::language::PLAIN_TEXT;
use crate::tree::{FileNode, Forest};
use playground_exec::{RunOutcome, ScriptFile, Simulator, TerminalSurface};
use tracing::debug;

pub const PROMPT: &str = "$ ";

/// A parsed terminal command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    Ls,
    Cat(Option<&'a str>),
    Clear,
    Run(Option<&'a str>),
    Unknown(&'a str),
    Empty,
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let mut parts = line.split_whitespace();
        let Some(cmd) = parts.next() else {
            return Command::Empty;
        };
        let arg = parts.next();

        match cmd {
            "help" => Command::Help,
            "ls" => Command::Ls,
            "cat" => Command::Cat(arg),
            "clear" => Command::Clear,
            "run" => Command::Run(arg),
            _ => Command::Unknown(line),
        }
    }
}

/// Write the banner shown when a terminal opens.
pub fn write_welcome(terminal: &mut dyn TerminalSurface) {
    terminal.write_line("Welcome to CodePlayground Terminal!");
    terminal.write_line("Type `help` for commands.\n");
}

/// Execute one command line. Returns the run outcome for `run`.
pub fn execute(
    line: &str,
    files: &Forest,
    simulator: &Simulator,
    terminal: &mut dyn TerminalSurface,
) -> Option<RunOutcome> {
    let command = Command::parse(line);
    debug!(?command, "terminal command");

    match command {
        Command::Empty => {}
        Command::Help => {
            terminal.write_line("Available commands:");
            terminal.write_line("  `ls` - List files");
            terminal.write_line("  `cat <filename>` - Display file content");
            terminal.write_line("  `clear` - Clear terminal");
            terminal.write_line("  `run <filename>` - Simulate running a file (JS/TS only)");
        }
        Command::Ls => {
            if files.is_empty() {
                terminal.write_line("No files in project.");
            }
            for node in files.nodes() {
                terminal.write_line(&format!("- {} ({})", node.name, node.kind()));
            }
        }
        Command::Cat(None) => terminal.write_line("Usage: `cat <filename>`"),
        Command::Cat(Some(name)) => match files.find_by_name(name) {
            Some(node) => {
                terminal.write_line(&format!("--- Content of {} ---", node.name));
                match node.content() {
                    Some(content) if !content.is_empty() => terminal.write_line(content),
                    _ => terminal.write_line("File is empty."),
                }
                terminal.write_line("--------------------");
            }
            None => terminal.write_line(&format!("File not found: {name}")),
        },
        Command::Clear => terminal.clear(),
        Command::Run(None) => terminal.write_line("Usage: `run <filename>`"),
        Command::Run(Some(name)) => match files.find_by_name(name) {
            Some(node) => return Some(run_node(node, simulator, terminal)),
            None => terminal.write_line(&format!("File not found: {name}")),
        },
        Command::Unknown(line) => terminal.write_line(&format!("Unknown command: {line}")),
    }
    None
}

/// Run a node through the simulator.
pub fn run_node(
    node: &FileNode,
    simulator: &Simulator,
    terminal: &mut dyn TerminalSurface,
) -> RunOutcome {
    let language = if node.is_folder() {
        None
    } else {
        Some(node.language().unwrap_or(PLAIN_TEXT))
    };
    simulator.run(
        &ScriptFile::new(&node.name, language, node.content()),
        terminal,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;
    use playground_exec::{BufferTerminal, ExecCapabilities};

    fn files() -> Forest {
        let mut files = Forest::from(vec![
            FileNode::file("main.py", "print('hi')"),
            FileNode::file("empty.txt", ""),
        ]);
        files.create("src", NodeKind::Folder, "/");
        files
    }

    fn exec(line: &str, files: &Forest) -> BufferTerminal {
        let mut term = BufferTerminal::new();
        execute(line, files, &Simulator::default(), &mut term);
        term
    }

    #[test]
    fn test_parse() {
        assert_eq!(Command::parse("  ls "), Command::Ls);
        assert_eq!(Command::parse("cat a.js"), Command::Cat(Some("a.js")));
        assert_eq!(Command::parse("run"), Command::Run(None));
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("rm -rf /"), Command::Unknown("rm -rf /"));
    }

    #[test]
    fn test_help() {
        let term = exec("help", &files());
        assert_eq!(term.writes()[0], "Available commands:");
        assert!(term.has_line("  `run <filename>` - Simulate running a file (JS/TS only)"));
    }

    #[test]
    fn test_ls() {
        let term = exec("ls", &files());
        assert_eq!(
            term.writes(),
            &["- main.py (file)", "- empty.txt (file)", "- src (folder)"]
        );
        assert!(exec("ls", &Forest::new()).has_line("No files in project."));
    }

    #[test]
    fn test_cat() {
        let term = exec("cat main.py", &files());
        assert_eq!(
            term.writes(),
            &["--- Content of main.py ---", "print('hi')", "--------------------"]
        );
        assert!(exec("cat empty.txt", &files()).has_line("File is empty."));
        assert!(exec("cat", &files()).has_line("Usage: `cat <filename>`"));
        assert!(exec("cat nope", &files()).has_line("File not found: nope"));
    }

    #[test]
    fn test_clear() {
        let mut term = BufferTerminal::new();
        term.write_line("old");
        execute("clear", &files(), &Simulator::default(), &mut term);
        assert!(term.writes().is_empty());
    }

    #[test]
    fn test_run() {
        let mut term = BufferTerminal::new();
        let outcome = execute("run main.py", &files(), &Simulator::default(), &mut term);
        assert_eq!(outcome, Some(RunOutcome::Simulated));
        assert!(term.has_line("print('hi')"));

        assert!(exec("run", &files()).has_line("Usage: `run <filename>`"));
        assert!(exec("run ghost.js", &files()).has_line("File not found: ghost.js"));
    }

    #[test]
    fn test_run_javascript_with_native_eval() {
        let files = Forest::from(vec![FileNode::file("a.js", "console.log('yo')")]);
        let sim = Simulator::new(ExecCapabilities::native());
        let mut term = BufferTerminal::new();
        let outcome = execute("run a.js", &files, &sim, &mut term);
        assert_eq!(outcome, Some(RunOutcome::Evaluated));
        assert!(term.has_line("yo"));
    }

    #[test]
    fn test_unknown_and_empty() {
        assert!(exec("make all", &files()).has_line("Unknown command: make all"));
        assert!(exec("   ", &files()).writes().is_empty());
    }

    #[test]
    fn test_welcome() {
        let mut term = BufferTerminal::new();
        write_welcome(&mut term);
        assert!(term.has_line("Welcome to CodePlayground Terminal!"));
        assert!(term.has_line("Type `help` for commands."));
    }
}
