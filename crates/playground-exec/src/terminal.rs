//! Terminal display surfaces.

use std::io::Write;

/// Somewhere run output and command responses are written to.
pub trait TerminalSurface {
    /// Write text followed by a line break. `text` may itself span lines.
    fn write_line(&mut self, text: &str);

    /// Clear the display.
    fn clear(&mut self);
}

/// In-memory terminal, keeping every write.
#[derive(Debug, Clone, Default)]
pub struct BufferTerminal {
    writes: Vec<String>,
}

impl BufferTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each `write_line` call, in order.
    pub fn writes(&self) -> &[String] {
        &self.writes
    }

    /// The display split into individual lines.
    pub fn lines(&self) -> Vec<&str> {
        self.writes.iter().flat_map(|w| w.split('\n')).collect()
    }

    /// Whether some display line equals `line` exactly.
    pub fn has_line(&self, line: &str) -> bool {
        self.lines().iter().any(|l| *l == line)
    }

    /// Full display text.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for w in &self.writes {
            out.push_str(w);
            out.push('\n');
        }
        out
    }
}

impl TerminalSurface for BufferTerminal {
    fn write_line(&mut self, text: &str) {
        self.writes.push(text.to_string());
    }

    fn clear(&mut self) {
        self.writes.clear();
    }
}

/// Terminal backed by an `io::Write`, such as stdout.
pub struct WriterTerminal<W: Write> {
    out: W,
}

impl<W: Write> WriterTerminal<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TerminalSurface for WriterTerminal<W> {
    fn write_line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!(error = %e, "terminal write failed");
        }
    }

    fn clear(&mut self) {
        // ANSI: clear screen, cursor home
        let _ = write!(self.out, "\x1b[2J\x1b[H");
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_splits_multiline_writes() {
        let mut term = BufferTerminal::new();
        term.write_line("Content: \nprint('x')");
        term.write_line("done");

        assert_eq!(term.writes().len(), 2);
        assert_eq!(term.lines(), vec!["Content: ", "print('x')", "done"]);
        assert!(term.has_line("print('x')"));
        assert_eq!(term.text(), "Content: \nprint('x')\ndone\n");
    }

    #[test]
    fn test_buffer_clear() {
        let mut term = BufferTerminal::new();
        term.write_line("a");
        term.clear();
        assert!(term.writes().is_empty());
    }

    #[test]
    fn test_writer_terminal() {
        let mut term = WriterTerminal::new(Vec::new());
        term.write_line("hello");
        term.write_line("world");
        let out = String::from_utf8(term.into_inner()).unwrap();
        assert_eq!(out, "hello\nworld\n");
    }
}
