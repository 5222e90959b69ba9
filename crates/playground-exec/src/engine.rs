//! Script engines for host-side evaluation.
//!
//! Evaluation through a [`ScriptEngine`] runs against the host [`Console`]
//! with no isolation. It is only reachable when
//! [`ExecCapabilities::native_eval`](crate::ExecCapabilities) is granted.

use crate::console::{Console, ConsoleMethod};
use crate::error::{ExecError, ExecResult};

/// An interpreter for playground scripts.
pub trait ScriptEngine: Send + Sync {
    /// Engine name, for logs.
    fn name(&self) -> &str;

    /// Evaluate `source`, printing through `console`.
    ///
    /// A script error is returned as [`ExecError::Fault`].
    fn eval(&self, source: &str, console: &Console) -> ExecResult<()>;
}

/// Built-in engine for console-only scripts.
///
/// Understands `console.log/info/warn/error(...)` calls whose arguments are
/// string, number, boolean, `null` or `undefined` literals, `throw new
/// Error("...")`, and `//` or `/* */` comments. Every other top-level
/// statement is skipped without effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleScriptEngine;

impl ScriptEngine for ConsoleScriptEngine {
    fn name(&self) -> &str {
        "console"
    }

    fn eval(&self, source: &str, console: &Console) -> ExecResult<()> {
        let mut scanner = Scanner::new(source);
        loop {
            scanner.skip_trivia();
            if scanner.at_end() {
                return Ok(());
            }
            scanner.statement(console)?;
        }
    }
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Eat a keyword only when it is not the prefix of a longer identifier.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let rest = self.rest();
        if !rest.starts_with(keyword) {
            return false;
        }
        let next = rest[keyword.len()..].chars().next();
        if next.is_some_and(is_ident_char) {
            return false;
        }
        self.pos += keyword.len();
        true
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Whitespace, comments and empty statements.
    fn skip_trivia(&mut self) {
        loop {
            self.skip_ws();
            if self.eat("//") {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else if self.eat("/*") {
                self.skip_block_comment();
            } else if !self.eat(";") {
                return;
            }
        }
    }

    /// Called just past `/*`. An unclosed comment runs to the end.
    fn skip_block_comment(&mut self) {
        match self.rest().find("*/") {
            Some(end) => self.pos += end + 2,
            None => self.pos = self.src.len(),
        }
    }

    fn ident(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn statement(&mut self, console: &Console) -> ExecResult<()> {
        let start = self.pos;

        if self.eat_keyword("console") {
            self.skip_ws();
            if self.eat(".") {
                self.skip_ws();
                let name = self.ident();
                self.skip_ws();
                if self.eat("(") {
                    let method = ConsoleMethod::parse(name).ok_or_else(|| {
                        ExecError::fault(format!("console.{name} is not a function"))
                    })?;
                    let args = self.arguments()?;
                    console.emit(method, &args.join(" "));
                    return Ok(());
                }
            }
        } else if self.eat_keyword("throw") {
            self.skip_ws();
            if self.eat_keyword("new") {
                self.skip_ws();
            }
            if self.peek().is_some_and(is_quote) {
                return Err(ExecError::fault(self.value()?));
            }
            let _class = self.ident();
            self.skip_ws();
            let message = if self.eat("(") {
                self.arguments()?.into_iter().next().unwrap_or_default()
            } else {
                String::new()
            };
            return Err(ExecError::fault(message));
        }

        self.pos = start;
        self.skip_statement();
        Ok(())
    }

    /// Comma separated literal arguments up to the closing parenthesis.
    fn arguments(&mut self) -> ExecResult<Vec<String>> {
        let mut args = Vec::new();
        loop {
            self.skip_ws();
            if self.eat(")") {
                return Ok(args);
            }
            args.push(self.value()?);
            self.skip_ws();
            if self.eat(",") {
                continue;
            }
            if self.eat(")") {
                return Ok(args);
            }
            return Err(self.unexpected());
        }
    }

    /// A literal, rendered the way `String(value)` would.
    fn value(&mut self) -> ExecResult<String> {
        match self.peek() {
            Some(q) if is_quote(q) => self.string(q),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '.' => self.number(),
            Some(c) if is_ident_char(c) => {
                let word = self.ident();
                match word {
                    "true" | "false" | "null" | "undefined" => Ok(word.to_string()),
                    "NaN" | "Infinity" => Ok(word.to_string()),
                    _ => Err(ExecError::fault(format!("{word} is not defined"))),
                }
            }
            _ => Err(self.unexpected()),
        }
    }

    fn string(&mut self, quote: char) -> ExecResult<String> {
        self.bump();
        let mut out = String::new();
        while let Some(c) = self.bump() {
            if c == quote {
                return Ok(out);
            }
            if c == '\\' {
                match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('0') => out.push('\0'),
                    Some(other) => out.push(other),
                    None => break,
                }
            } else if c == '\n' && quote != '`' {
                break;
            } else {
                out.push(c);
            }
        }
        Err(ExecError::fault("Invalid or unexpected token"))
    }

    fn number(&mut self) -> ExecResult<String> {
        let start = self.pos;
        self.eat("-");
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
        {
            self.bump();
        }
        let text = self.src[start..self.pos].replace('_', "");
        let value: f64 = text
            .parse()
            .map_err(|_| ExecError::fault("Invalid or unexpected token"))?;
        Ok(format_number(value))
    }

    fn unexpected(&self) -> ExecError {
        match self.peek() {
            Some(c) => ExecError::fault(format!("Unexpected token '{c}'")),
            None => ExecError::fault("Unexpected end of input"),
        }
    }

    /// Skip to the end of the current statement: a `;` or newline outside
    /// of brackets and strings.
    fn skip_statement(&mut self) {
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            match c {
                q if is_quote(q) => {
                    let _ = self.string(q);
                    continue;
                }
                '/' if self.rest().starts_with("//") => {
                    if depth == 0 {
                        return;
                    }
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                    continue;
                }
                '/' if self.rest().starts_with("/*") => {
                    self.pos += 2;
                    self.skip_block_comment();
                    continue;
                }
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth = depth.saturating_sub(1),
                ';' | '\n' if depth == 0 => {
                    self.bump();
                    return;
                }
                _ => {}
            }
            self.bump();
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\'' | '`')
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn run(source: &str) -> (ExecResult<()>, Vec<String>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = seen.clone();
        let console = Console::with_sink(Arc::new(move |text: &str| {
            sink_seen.lock().unwrap().push(text.to_string());
        }));
        let result = ConsoleScriptEngine.eval(source, &console);
        let lines = seen.lock().unwrap().clone();
        (result, lines)
    }

    #[test]
    fn test_console_log_string() {
        let (result, lines) = run(r#"console.log("hi")"#);
        assert!(result.is_ok());
        assert_eq!(lines, vec!["hi"]);
    }

    #[test]
    fn test_multiple_args_joined_with_space() {
        let (_, lines) = run("console.log('sum:', 3, true, null);");
        assert_eq!(lines, vec!["sum: 3 true null"]);
    }

    #[test]
    fn test_numbers_render_like_strings() {
        let (_, lines) = run("console.log(1.0, 2.5, -4)");
        assert_eq!(lines, vec!["1 2.5 -4"]);
    }

    #[test]
    fn test_comments_and_other_statements_are_skipped() {
        let source = r#"
// Welcome
const greeting = "a; b";
/* block
   comment */
function add(a, b) {
  return a + b;
}
console.info("done")
"#;
        let (result, lines) = run(source);
        assert!(result.is_ok());
        assert_eq!(lines, vec!["done"]);
    }

    #[test]
    fn test_throw_new_error_is_fault() {
        let (result, lines) = run("console.log('before');\nthrow new Error(\"boom\");\nconsole.log('after')");
        assert_eq!(lines, vec!["before"]);
        let err = result.unwrap_err();
        assert!(err.is_fault());
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_throw_string() {
        let (result, _) = run("throw 'plain'");
        assert_eq!(result.unwrap_err().to_string(), "plain");
    }

    #[test]
    fn test_unknown_identifier_is_reference_error() {
        let (result, _) = run("console.log(missing)");
        assert_eq!(result.unwrap_err().to_string(), "missing is not defined");
    }

    #[test]
    fn test_unknown_console_method() {
        let (result, _) = run("console.table('x')");
        assert_eq!(
            result.unwrap_err().to_string(),
            "console.table is not a function"
        );
    }

    #[test]
    fn test_escapes_in_strings() {
        let (_, lines) = run(r#"console.log("a\tb", 'it\'s')"#);
        assert_eq!(lines, vec!["a\tb it's"]);
    }

    #[test]
    fn test_unterminated_string() {
        let (result, _) = run("console.log(\"oops)");
        assert!(result.unwrap_err().is_fault());
    }

    #[test]
    fn test_trailing_comment_with_quote() {
        let (result, lines) = run("let a = 1 // don't\nconsole.log('next')");
        assert!(result.is_ok());
        assert_eq!(lines, vec!["next"]);
    }

    #[test]
    fn test_block_comment_with_quote_inside_statement() {
        let (result, lines) = run("let a = 1 /* don't */\nconsole.log('x')");
        assert!(result.is_ok());
        assert_eq!(lines, vec!["x"]);

        let (result, lines) = run("let b = f(/* it's\n  multi-line */ 2)\nconsole.log('y')");
        assert!(result.is_ok());
        assert_eq!(lines, vec!["y"]);
    }

    #[test]
    fn test_empty_source() {
        let (result, lines) = run("");
        assert!(result.is_ok());
        assert!(lines.is_empty());
    }

    #[test]
    fn test_identifier_prefixed_by_keyword_is_not_keyword() {
        let (result, lines) = run("consoleHelper.log('x')\nthrowaway = 1");
        assert!(result.is_ok());
        assert!(lines.is_empty());
    }
}
